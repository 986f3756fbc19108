use std::{
    env,
    path::{Path, PathBuf},
};

use log::{Level, LevelFilter};
use tauri::{plugin::TauriPlugin, Runtime};
use tauri_plugin_log::{Target, TargetKind};

use crate::{DESKTOP_LOG_NAME, LOG_LEVEL_ENV};

const STARTUP_TARGET: &str = "startup";
const DESKTOP_TARGET: &str = "desktop";
const SHUTDOWN_TARGET: &str = "shutdown";

pub(crate) fn desktop_log_dir(data_root: &Path) -> PathBuf {
    data_root.join("logs")
}

/// File the log plugin writes to inside [`desktop_log_dir`].
pub(crate) fn desktop_log_path(data_root: &Path) -> PathBuf {
    desktop_log_dir(data_root).join(format!("{DESKTOP_LOG_NAME}.log"))
}

pub(crate) fn parse_level_filter(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

fn format_log_line(timestamp: &str, level: Level, target: &str, message: &str) -> String {
    format!("[{timestamp}] [{level}] [{target}] {message}")
}

/// Log sink for the whole process: `<root>/logs/desktop.log` plus stdout, level from
/// `PXSCOPE_LOG`. Records emitted before the plugin's setup runs are dropped.
pub(crate) fn build_log_plugin<R: Runtime>(data_root: &Path) -> TauriPlugin<R> {
    let level = parse_level_filter(env::var(LOG_LEVEL_ENV).ok().as_deref());
    tauri_plugin_log::Builder::new()
        .clear_targets()
        .targets([
            Target::new(TargetKind::Folder {
                path: desktop_log_dir(data_root),
                file_name: Some(DESKTOP_LOG_NAME.to_string()),
            }),
            Target::new(TargetKind::Stdout),
        ])
        .level(level)
        .level_for("tao", LevelFilter::Warn)
        .level_for("wry", LevelFilter::Warn)
        .format(|out, message, record| {
            let timestamp = chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S%.3f")
                .to_string();
            out.finish(format_args!(
                "{}",
                format_log_line(
                    &timestamp,
                    record.level(),
                    record.target(),
                    &message.to_string()
                )
            ))
        })
        .build()
}

pub(crate) fn append_startup_log(message: &str) {
    log::info!(target: STARTUP_TARGET, "{message}");
}

pub(crate) fn append_desktop_log(message: &str) {
    log::info!(target: DESKTOP_TARGET, "{message}");
}

pub(crate) fn append_shutdown_log(message: &str) {
    log::info!(target: SHUTDOWN_TARGET, "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_log_lives_under_the_logs_directory() {
        let root = Path::new("/data/pxscope");
        assert_eq!(desktop_log_dir(root), PathBuf::from("/data/pxscope/logs"));
        assert_eq!(
            desktop_log_path(root),
            PathBuf::from("/data/pxscope/logs/desktop.log")
        );
    }

    #[test]
    fn level_filter_defaults_to_info() {
        assert_eq!(parse_level_filter(None), LevelFilter::Info);
        assert_eq!(parse_level_filter(Some("verbose")), LevelFilter::Info);
        assert_eq!(parse_level_filter(Some(" debug ")), LevelFilter::Debug);
        assert_eq!(parse_level_filter(Some("OFF")), LevelFilter::Off);
    }

    #[test]
    fn log_lines_carry_timestamp_level_and_target() {
        assert_eq!(
            format_log_line("2026-10-19 08:00:00.000", Level::Warn, "startup", "tray ready"),
            "[2026-10-19 08:00:00.000] [WARN] [startup] tray ready"
        );
    }
}
