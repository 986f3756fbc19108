use pxscope_core::orchestrator::ShellSignal;
use tauri::AppHandle;

use crate::{append_desktop_log, append_shutdown_log, main_window, shell_dispatch, tray_actions};

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleDevtools) => {
            main_window::toggle_main_devtools(app_handle, append_desktop_log);
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            append_shutdown_log("tray quit requested");
            shell_dispatch::dispatch_signal(app_handle, ShellSignal::QuitRequested);
        }
        None => {}
    }
}
