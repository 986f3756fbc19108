use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use pxscope_core::{
    store::SETTINGS_KEY, ClientSession, FileStorage, HostPlatform, LocaleCache, RouteTable,
    SettingsPatch, StaticBundles, WindowOrchestrator,
};
use tauri::menu::MenuItem;

use crate::shell_locale;

pub(crate) type DesktopSession = ClientSession<FileStorage, StaticBundles>;

#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) devtools_item: MenuItem<tauri::Wry>,
    pub(crate) quit_item: MenuItem<tauri::Wry>,
}

pub(crate) struct ShellState {
    pub(crate) session: Mutex<DesktopSession>,
    pub(crate) orchestrator: Mutex<WindowOrchestrator>,
    pub(crate) main_maximized: AtomicBool,
    pub(crate) resize_nudge_in_progress: AtomicBool,
    pub(crate) is_quitting: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(data_root: &Path) -> Result<Self, String> {
        let storage = FileStorage::new(data_root);
        let first_run = !storage.item_path(SETTINGS_KEY).exists();
        let mut session = ClientSession::bootstrap(
            storage,
            RouteTable::standard(),
            LocaleCache::new(shell_locale::bundle_source()),
        )?;

        if first_run {
            if let Some(locale) = shell_locale::locale_from_env() {
                crate::append_startup_log(&format!("first run, seeding language {locale}"));
                session.apply_settings_patch(SettingsPatch {
                    language: Some(locale.to_string()),
                    ..SettingsPatch::default()
                });
            }
        }

        Ok(Self {
            session: Mutex::new(session),
            orchestrator: Mutex::new(WindowOrchestrator::new(HostPlatform::current())),
            main_maximized: AtomicBool::new(false),
            resize_nudge_in_progress: AtomicBool::new(false),
            is_quitting: AtomicBool::new(false),
        })
    }

    pub(crate) fn session(&self) -> Result<MutexGuard<'_, DesktopSession>, String> {
        self.session
            .lock()
            .map_err(|_| "Client session lock poisoned.".to_string())
    }

    pub(crate) fn orchestrator(&self) -> Result<MutexGuard<'_, WindowOrchestrator>, String> {
        self.orchestrator
            .lock()
            .map_err(|_| "Window orchestrator lock poisoned.".to_string())
    }

    pub(crate) fn mark_quitting(&self) {
        self.is_quitting.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Relaxed)
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), String>> for BridgeResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(error) => Self::failed(error),
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn atomic_flag_guard_try_set_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn bridge_result_from_result_keeps_the_reason() {
        let failed = BridgeResult::from(Err("disk full".to_string()));
        assert!(!failed.ok);
        assert_eq!(failed.reason.as_deref(), Some("disk full"));
        assert!(BridgeResult::from(Ok(())).ok);
    }

    #[test]
    fn shell_state_bootstraps_from_an_empty_data_root() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let state = ShellState::new(temp_dir.path()).expect("state should bootstrap");

        let session = state.session().expect("session lock");
        assert_eq!(
            session.navigation().current_route(),
            pxscope_core::navigation::DEFAULT_ROUTE
        );
        assert!(!state.is_quitting());
    }
}
