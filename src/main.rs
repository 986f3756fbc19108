#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod desktop_bridge_commands;
mod exit_events;
mod logging;
mod main_window;
mod runtime_paths;
mod shell_dispatch;
mod shell_locale;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AtomicFlagGuard, BridgeResult, ShellState, TrayMenuState};
pub(crate) use logging::{append_desktop_log, append_shutdown_log, append_startup_log};

fn main() {
    app_runtime::run();
}
