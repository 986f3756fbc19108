use pxscope_core::orchestrator::ShellSignal;
use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, shell_dispatch, tray_actions, tray_labels, tray_menu_handler,
    TrayMenuState, TRAY_ID,
};

pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let texts = tray_labels::tray_texts(app_handle)?;

    let title_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TITLE,
        &texts.title,
        false,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray title menu item: {error}"))?;
    let devtools_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_DEVTOOLS,
        &texts.devtools,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray devtools menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        &texts.quit,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[&title_item, &separator, &devtools_item, &quit_item],
    )
    .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        devtools_item: devtools_item.clone(),
        quit_item: quit_item.clone(),
    }) {
        append_desktop_log("tray menu state already exists, skipping manage");
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(&texts.tooltip)
        .icon(tauri::include_image!("./icons/icon.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                shell_dispatch::dispatch_signal(tray.app_handle(), ShellSignal::TrayClicked);
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    Ok(())
}
