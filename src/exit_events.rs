use chrono::Utc;
use pxscope_core::orchestrator::ShellSignal;
use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{append_shutdown_log, shell_dispatch, ShellState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitRequestDecision {
    AllowExit,
    DeferToWindowPolicy,
}

/// An explicit exit code or a quit already in progress ends the process; the runtime's own
/// request after the last window closes goes through the orchestrator's keep-alive policy.
fn decide_exit_request(code: Option<i32>, is_quitting: bool) -> ExitRequestDecision {
    if code.is_some() || is_quitting {
        ExitRequestDecision::AllowExit
    } else {
        ExitRequestDecision::DeferToWindowPolicy
    }
}

pub(crate) fn persist_client_state(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    let mut session = match state.session() {
        Ok(session) => session,
        Err(error) => {
            append_shutdown_log(&format!("skipping state flush: {error}"));
            return;
        }
    };

    match session.persist_on_exit(Utc::now()) {
        Ok(Some(location)) => {
            append_shutdown_log(&format!("client state saved, error log written to {location}"));
        }
        Ok(None) => append_shutdown_log("client state saved"),
        Err(error) => append_shutdown_log(&format!("failed to save client state: {error}")),
    }
}

pub(crate) fn handle_exit_requested(
    app_handle: &AppHandle,
    code: Option<i32>,
    api: &ExitRequestApi,
) {
    let is_quitting = app_handle.state::<ShellState>().is_quitting();
    match decide_exit_request(code, is_quitting) {
        ExitRequestDecision::AllowExit => {
            append_shutdown_log(&format!("exit requested with code {code:?}"));
        }
        ExitRequestDecision::DeferToWindowPolicy => {
            api.prevent_exit();
            shell_dispatch::dispatch_signal(app_handle, ShellSignal::AllWindowsClosed);
        }
    }
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    app_handle.state::<ShellState>().mark_quitting();
    persist_client_state(app_handle);
    append_shutdown_log("desktop process exiting");
    log::logger().flush();
}
