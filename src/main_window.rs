use std::path::PathBuf;

use pxscope_core::orchestrator::{MAIN_WINDOW, SPLASH_WINDOW};
use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindowBuilder};

use crate::{
    MAIN_WINDOW_MIN_SIZE, MAIN_WINDOW_PAGE, MAIN_WINDOW_SIZE, SPLASH_WINDOW_PAGE,
    SPLASH_WINDOW_SIZE,
};

const WINDOW_TITLE: &str = "Pxscope";

pub(crate) fn create_splash_window(app_handle: &AppHandle) -> Result<(), String> {
    let (width, height) = SPLASH_WINDOW_SIZE;
    WebviewWindowBuilder::new(
        app_handle,
        SPLASH_WINDOW,
        WebviewUrl::App(PathBuf::from(SPLASH_WINDOW_PAGE)),
    )
    .title(WINDOW_TITLE)
    .inner_size(width, height)
    .center()
    .decorations(false)
    .resizable(false)
    .skip_taskbar(true)
    .build()
    .map(|_| ())
    .map_err(|error| format!("Failed to create splash window: {error}"))
}

/// The main window starts hidden and is shown once its page has loaded.
pub(crate) fn create_main_window(app_handle: &AppHandle) -> Result<(), String> {
    let (width, height) = MAIN_WINDOW_SIZE;
    let (min_width, min_height) = MAIN_WINDOW_MIN_SIZE;
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW,
        WebviewUrl::App(PathBuf::from(MAIN_WINDOW_PAGE)),
    )
    .title(WINDOW_TITLE)
    .inner_size(width, height)
    .min_inner_size(min_width, min_height)
    .center()
    .decorations(false)
    .visible(false)
    .build()
    .map(|_| ())
    .map_err(|error| format!("Failed to create main window: {error}"))
}

pub(crate) fn parse_secondary_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing secondary window URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

pub(crate) fn validate_secondary_label(label: &str) -> Result<(), String> {
    if label == MAIN_WINDOW || label == SPLASH_WINDOW {
        return Err(format!("Window label '{label}' is reserved."));
    }
    let valid = !label.is_empty()
        && label
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(format!("Invalid window label '{label}'."))
    }
}

/// Secondary windows load remote pages in the background and are never shown.
pub(crate) fn create_secondary_window(
    app_handle: &AppHandle,
    label: &str,
    raw_url: &str,
) -> Result<(), String> {
    validate_secondary_label(label)?;
    let url = parse_secondary_url(raw_url)?;
    if app_handle.get_webview_window(label).is_some() {
        return Err(format!("Window '{label}' already exists."));
    }

    WebviewWindowBuilder::new(app_handle, label, WebviewUrl::External(url))
        .visible(false)
        .build()
        .map(|_| ())
        .map_err(|error| format!("Failed to create window '{label}': {error}"))
}

pub(crate) fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub(crate) fn destroy_window<F>(app_handle: &AppHandle, label: &str, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(label) else {
        log(&format!("destroy skipped: window '{label}' not found"));
        return;
    };

    if let Err(error) = window.destroy() {
        log(&format!("failed to destroy window '{label}': {error}"));
    }
}

pub(crate) fn toggle_main_devtools<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW) else {
        log("toggle_main_devtools skipped: main window not found");
        return;
    };

    if window.is_devtools_open() {
        window.close_devtools();
    } else {
        window.open_devtools();
    }
}
