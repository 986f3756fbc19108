use pxscope_core::{
    orchestrator::{BootMode, ShellSignal},
    AccountBook, AccountRecord, AccountUpsert, LocaleBundle, Navigation, NavigationSnapshot,
    Settings, SettingsPatch,
};
use serde_json::Value;
use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, main_window, shell_dispatch, tray_labels, window_actions, BridgeResult,
    ShellState,
};

fn log_rejected_navigation<E: std::fmt::Debug>(target: &str, rejected: E) {
    append_desktop_log(&format!("navigation to '{target}' rejected: {rejected:?}"));
}

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_announce_mode(app_handle: AppHandle, mode: u8) {
    shell_dispatch::dispatch_signal(&app_handle, ShellSignal::BootMode(BootMode::from_flag(mode)));
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_settings(app_handle: AppHandle) -> Result<Settings, String> {
    let state = app_handle.state::<ShellState>();
    let session = state.session()?;
    Ok(session.settings().clone())
}

#[tauri::command]
pub(crate) fn desktop_bridge_apply_settings(
    app_handle: AppHandle,
    patch: SettingsPatch,
) -> Result<Settings, String> {
    let state = app_handle.state::<ShellState>();
    let (settings, language_changed) = {
        let mut session = state.session()?;
        let previous_language = session.settings().language.clone();
        let settings = session.apply_settings_patch(patch).clone();
        let language_changed = settings.language != previous_language;
        (settings, language_changed)
    };

    if language_changed {
        append_desktop_log(&format!("language changed to {}", settings.language));
        tray_labels::update_tray_menu_labels(&app_handle, append_desktop_log);
    }
    Ok(settings)
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_accounts(app_handle: AppHandle) -> Result<AccountBook, String> {
    let state = app_handle.state::<ShellState>();
    let session = state.session()?;
    Ok(session.accounts().clone())
}

#[tauri::command]
pub(crate) fn desktop_bridge_save_account(
    app_handle: AppHandle,
    record: AccountRecord,
) -> BridgeResult {
    let state = app_handle.state::<ShellState>();
    let mut session = match state.session() {
        Ok(session) => session,
        Err(error) => return BridgeResult::failed(error),
    };

    let id = record.id.clone();
    match session.save_account(record) {
        AccountUpsert::Merged => append_desktop_log(&format!("account {id} updated")),
        AccountUpsert::Appended => append_desktop_log(&format!("account {id} added")),
    }
    BridgeResult::ok()
}

#[tauri::command]
pub(crate) fn desktop_bridge_load_auth(app_handle: AppHandle) -> Result<Option<Value>, String> {
    let state = app_handle.state::<ShellState>();
    let mut session = state.session()?;
    Ok(session.load_auth())
}

#[tauri::command]
pub(crate) fn desktop_bridge_save_auth(app_handle: AppHandle, auth: Value) -> BridgeResult {
    let state = app_handle.state::<ShellState>();
    let result = state.session().and_then(|mut session| session.save_auth(&auth));
    BridgeResult::from(result)
}

/// Returns `None` when the navigation was rejected and the current route is unchanged.
#[tauri::command]
pub(crate) fn desktop_bridge_navigate(
    app_handle: AppHandle,
    path: String,
) -> Result<Option<Navigation>, String> {
    let state = app_handle.state::<ShellState>();
    let mut session = state.session()?;
    match session.navigate(&path) {
        Ok(navigation) => Ok(Some(navigation)),
        Err(rejected) => {
            log_rejected_navigation(&path, rejected);
            Ok(None)
        }
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_navigate_section(
    app_handle: AppHandle,
    section: String,
) -> Result<Option<Navigation>, String> {
    let state = app_handle.state::<ShellState>();
    let mut session = state.session()?;
    match session.navigate_section(&section) {
        Ok(navigation) => Ok(Some(navigation)),
        Err(rejected) => {
            log_rejected_navigation(&section, rejected);
            Ok(None)
        }
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_set_navigation_loading(
    app_handle: AppHandle,
    loading: bool,
) -> BridgeResult {
    let state = app_handle.state::<ShellState>();
    let result = state
        .session()
        .map(|mut session| session.set_navigation_loading(loading));
    BridgeResult::from(result)
}

#[tauri::command]
pub(crate) fn desktop_bridge_navigation_state(
    app_handle: AppHandle,
) -> Result<NavigationSnapshot, String> {
    let state = app_handle.state::<ShellState>();
    let session = state.session()?;
    Ok(session.navigation().snapshot())
}

#[tauri::command]
pub(crate) fn desktop_bridge_push_error(
    app_handle: AppHandle,
    kind: String,
    detail: Value,
) -> BridgeResult {
    let state = app_handle.state::<ShellState>();
    let result = state
        .session()
        .map(|mut session| session.push_error(&kind, detail));
    BridgeResult::from(result)
}

/// Bundle for `locale`, or for the configured language when none is given.
#[tauri::command]
pub(crate) fn desktop_bridge_get_locale_bundle(
    app_handle: AppHandle,
    locale: Option<String>,
) -> Result<Option<LocaleBundle>, String> {
    let state = app_handle.state::<ShellState>();
    let mut session = state.session()?;
    let key = locale.unwrap_or_else(|| session.settings().language.clone());
    Ok(session
        .locale_bundle(&key)
        .map(|bundle| bundle.as_ref().clone()))
}

#[tauri::command]
pub(crate) async fn desktop_bridge_open_secondary_window(
    app_handle: AppHandle,
    label: String,
    url: String,
) -> BridgeResult {
    if let Err(error) = main_window::create_secondary_window(&app_handle, &label, &url) {
        append_desktop_log(&format!("failed to open secondary window: {error}"));
        return BridgeResult::failed(error);
    }

    shell_dispatch::dispatch_signal(&app_handle, ShellSignal::SecondaryOpened(label));
    BridgeResult::ok()
}

#[tauri::command]
pub(crate) fn desktop_bridge_toggle_maximize(app_handle: AppHandle) {
    window_actions::toggle_maximize_main_window(&app_handle, append_desktop_log);
}
