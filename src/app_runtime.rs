use pxscope_core::orchestrator::{ShellSignal, MAIN_WINDOW};
use tauri::{webview::PageLoadEvent, Manager, RunEvent};

use crate::{
    append_desktop_log, append_startup_log, exit_events, logging, runtime_paths, shell_dispatch,
    ShellState,
};

pub(crate) fn run() {
    let data_root = runtime_paths::default_data_root();
    let setup_data_root = data_root.clone();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, argv, _cwd| {
            append_desktop_log(&format!("second instance launched with {argv:?}"));
            shell_dispatch::dispatch_signal(app, ShellSignal::Activated);
        }))
        .plugin(logging::build_log_plugin(&data_root))
        .plugin(tauri_plugin_process::init())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_announce_mode,
            crate::desktop_bridge_commands::desktop_bridge_get_settings,
            crate::desktop_bridge_commands::desktop_bridge_apply_settings,
            crate::desktop_bridge_commands::desktop_bridge_get_accounts,
            crate::desktop_bridge_commands::desktop_bridge_save_account,
            crate::desktop_bridge_commands::desktop_bridge_load_auth,
            crate::desktop_bridge_commands::desktop_bridge_save_auth,
            crate::desktop_bridge_commands::desktop_bridge_navigate,
            crate::desktop_bridge_commands::desktop_bridge_navigate_section,
            crate::desktop_bridge_commands::desktop_bridge_set_navigation_loading,
            crate::desktop_bridge_commands::desktop_bridge_navigation_state,
            crate::desktop_bridge_commands::desktop_bridge_push_error,
            crate::desktop_bridge_commands::desktop_bridge_get_locale_bundle,
            crate::desktop_bridge_commands::desktop_bridge_open_secondary_window,
            crate::desktop_bridge_commands::desktop_bridge_toggle_maximize,
        ])
        .on_window_event(shell_dispatch::handle_window_event)
        .on_page_load(|webview, payload| {
            if !matches!(payload.event(), PageLoadEvent::Finished) {
                return;
            }
            append_desktop_log(&format!(
                "page-load finished in {}: {}",
                webview.label(),
                payload.url()
            ));
            if webview.window().label() == MAIN_WINDOW {
                shell_dispatch::dispatch_signal(webview.app_handle(), ShellSignal::MainReady);
            }
        })
        .setup(move |app| {
            append_startup_log("desktop process starting");
            append_startup_log(&format!("data root: {}", setup_data_root.display()));
            append_startup_log(&format!(
                "desktop log path: {}",
                logging::desktop_log_path(&setup_data_root).display()
            ));

            let shell_state = match ShellState::new(&setup_data_root) {
                Ok(state) => state,
                Err(error) => {
                    append_startup_log(&format!("failed to load client state: {error}"));
                    log::logger().flush();
                    std::process::exit(1);
                }
            };
            app.manage(shell_state);

            shell_dispatch::dispatch_signal(app.handle(), ShellSignal::Launch);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                shell_dispatch::dispatch_signal(app_handle, ShellSignal::Activated);
            }
            _ => {}
        });
}
