use std::sync::atomic::Ordering;

use pxscope_core::orchestrator::{ShellCommand, ShellSignal, MAIN_WINDOW, SPLASH_WINDOW};
use tauri::{AppHandle, Manager, Window, WindowEvent};

use crate::{
    append_desktop_log, append_shutdown_log, append_startup_log, exit_events, main_window,
    tray_setup, window_actions, ShellState,
};

/// Feeds a signal to the orchestrator and carries out the commands it returns.
///
/// The orchestrator lock is released before any command runs, so commands may dispatch
/// follow-up signals.
pub(crate) fn dispatch_signal(app_handle: &AppHandle, signal: ShellSignal) {
    let commands = {
        let state = app_handle.state::<ShellState>();
        let mut orchestrator = match state.orchestrator() {
            Ok(orchestrator) => orchestrator,
            Err(error) => {
                append_desktop_log(&format!("dropping signal {signal:?}: {error}"));
                return;
            }
        };
        orchestrator.handle(signal)
    };

    for command in commands {
        apply_command(app_handle, command);
    }
}

fn apply_command(app_handle: &AppHandle, command: ShellCommand) {
    match command {
        ShellCommand::CreateSplash => {
            if let Err(error) = main_window::create_splash_window(app_handle) {
                report_window_failure(app_handle, SPLASH_WINDOW, error);
            }
        }
        ShellCommand::InitTray => {
            let signal = match tray_setup::setup_tray(app_handle) {
                Ok(()) => ShellSignal::TrayReady,
                Err(error) => ShellSignal::TrayFailed(error),
            };
            dispatch_signal(app_handle, signal);
        }
        ShellCommand::CreateMain => {
            app_handle
                .state::<ShellState>()
                .main_maximized
                .store(false, Ordering::Relaxed);
            if let Err(error) = main_window::create_main_window(app_handle) {
                report_window_failure(app_handle, MAIN_WINDOW, error);
            }
        }
        ShellCommand::DestroySplash => {
            main_window::destroy_window(app_handle, SPLASH_WINDOW, append_desktop_log);
        }
        ShellCommand::ShowMain => {
            window_actions::show_main_window(app_handle, append_desktop_log);
        }
        ShellCommand::ScheduleResizeNudge { delay } => {
            window_actions::schedule_resize_nudge(app_handle, delay, append_desktop_log);
        }
        ShellCommand::DestroyWindow(label) => {
            main_window::destroy_window(app_handle, &label, append_desktop_log);
        }
        ShellCommand::Exit(reason) => {
            app_handle.state::<ShellState>().mark_quitting();
            append_shutdown_log(&format!("{}, exiting desktop process", reason.describe()));
            app_handle.exit(0);
        }
        ShellCommand::Abort(reason) => {
            app_handle.state::<ShellState>().mark_quitting();
            append_startup_log(&format!("fatal startup failure: {reason}"));
            log::error!("{reason}");
            app_handle.exit(1);
        }
    }
}

fn report_window_failure(app_handle: &AppHandle, label: &str, reason: String) {
    dispatch_signal(
        app_handle,
        ShellSignal::WindowCreationFailed {
            label: label.to_string(),
            reason,
        },
    );
}

pub(crate) fn handle_window_event(window: &Window, event: &WindowEvent) {
    let app_handle = window.app_handle();
    match window.label() {
        MAIN_WINDOW => match event {
            WindowEvent::Resized(_) => {
                let Ok(maximized) = window.is_maximized() else {
                    return;
                };
                let state = app_handle.state::<ShellState>();
                let was_maximized = state.main_maximized.swap(maximized, Ordering::Relaxed);
                if window_actions::is_unmaximize_transition(was_maximized, maximized) {
                    dispatch_signal(app_handle, ShellSignal::MainUnmaximized);
                }
            }
            WindowEvent::Destroyed => {
                append_desktop_log("main window destroyed");
                exit_events::persist_client_state(app_handle);
                dispatch_signal(app_handle, ShellSignal::MainClosed);
            }
            _ => {}
        },
        SPLASH_WINDOW => {}
        label => {
            if matches!(event, WindowEvent::Destroyed) {
                dispatch_signal(app_handle, ShellSignal::SecondaryClosed(label.to_string()));
            }
        }
    }
}
