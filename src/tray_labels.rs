use tauri::{menu::MenuItem, AppHandle, Manager};

use crate::{tray_actions, ShellState, TrayMenuState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayTexts {
    pub title: String,
    pub tooltip: String,
    pub devtools: String,
    pub quit: String,
}

/// Tray texts in the language currently configured by the user.
pub fn tray_texts(app_handle: &AppHandle) -> Result<TrayTexts, String> {
    let state = app_handle.state::<ShellState>();
    let mut session = state.session()?;
    Ok(TrayTexts {
        title: session.text("tray.title"),
        tooltip: session.text("tray.tooltip"),
        devtools: session.text("tray.devtools"),
        quit: session.text("tray.quit"),
    })
}

fn set_menu_text_safe<F>(item: &MenuItem<tauri::Wry>, text: &str, item_name: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = item.set_text(text) {
        log(&format!(
            "failed to update tray menu text for {}: {}",
            item_name, error
        ));
    }
}

pub fn update_tray_menu_labels<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };

    let texts = match tray_texts(app_handle) {
        Ok(texts) => texts,
        Err(error) => {
            log(&format!("failed to resolve tray texts: {error}"));
            return;
        }
    };

    set_menu_text_safe(
        &tray_state.devtools_item,
        &texts.devtools,
        tray_actions::TRAY_MENU_TOGGLE_DEVTOOLS,
        &log,
    );
    set_menu_text_safe(
        &tray_state.quit_item,
        &texts.quit,
        tray_actions::TRAY_MENU_QUIT,
        &log,
    );
}
