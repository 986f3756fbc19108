use std::time::Duration;

use pxscope_core::orchestrator::{resize_nudge_widths, MAIN_WINDOW};
use tauri::{AppHandle, Manager, PhysicalSize};

use crate::{main_window, AtomicFlagGuard, ShellState};

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    main_window::show_main_window(app_handle, &log);
}

pub fn toggle_maximize_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW) else {
        log("toggle_maximize_main_window skipped: main window not found");
        return;
    };

    let result = match window.is_maximized() {
        Ok(true) => window.unmaximize(),
        Ok(false) => window.maximize(),
        Err(error) => {
            log(&format!("failed to read main window maximize state: {error}"));
            return;
        }
    };
    if let Err(error) = result {
        log(&format!("failed to toggle main window maximize state: {error}"));
    }
}

/// A resize reports an unmaximize when the window was maximized before it and is not now.
pub(crate) fn is_unmaximize_transition(was_maximized: bool, maximized: bool) -> bool {
    was_maximized && !maximized
}

const RESTORE_ATTEMPTS: usize = 2;

/// Applies the nudge widths through `set_width`. The original width is always restored,
/// even when the widening step fails, and a failed restore is retried once.
pub(crate) fn apply_resize_nudge<S, F>(width: u32, mut set_width: S, log: F)
where
    S: FnMut(u32) -> Result<(), String>,
    F: Fn(&str),
{
    let [nudged, original] = resize_nudge_widths(width);
    if let Err(error) = set_width(nudged) {
        log(&format!("failed to apply resize nudge: {error}"));
    }

    for attempt in 1..=RESTORE_ATTEMPTS {
        match set_width(original) {
            Ok(()) => return,
            Err(error) => log(&format!(
                "failed to restore main window width (attempt {attempt}): {error}"
            )),
        }
    }
}

/// Widens the main window by one unit and restores it after `delay`, forcing a redraw.
///
/// Only one nudge runs at a time; overlapping requests are dropped.
pub fn schedule_resize_nudge<F>(app_handle: &AppHandle, delay: Duration, log: F)
where
    F: Fn(&str) + Send + 'static,
{
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        let state = app_handle.state::<ShellState>();
        let Some(_guard) = AtomicFlagGuard::try_set(&state.resize_nudge_in_progress) else {
            log("resize nudge skipped: previous nudge still running");
            return;
        };

        tokio::time::sleep(delay).await;
        let Some(window) = app_handle.get_webview_window(MAIN_WINDOW) else {
            return;
        };
        let size = match window.inner_size() {
            Ok(size) => size,
            Err(error) => {
                log(&format!("failed to read main window size for resize nudge: {error}"));
                return;
            }
        };

        apply_resize_nudge(
            size.width,
            |width| {
                window
                    .set_size(PhysicalSize::new(width, size.height))
                    .map_err(|error| error.to_string())
            },
            &log,
        );
    });
}
