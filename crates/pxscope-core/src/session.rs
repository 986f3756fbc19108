use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    accounts::{AccountBook, AccountRecord, AccountUpsert},
    locale::{BundleSource, LocaleBundle, LocaleCache},
    navigation::{Navigation, NavigationEngine, NavigationRejected, RouteTable, DEFAULT_ROUTE},
    settings::{Settings, SettingsPatch},
    store::{PersistentStore, StorageBackend, ACCOUNTS_KEY, AUTH_KEY, SETTINGS_KEY},
};

/// Everything the UI context owns: preferences, accounts, navigation and text.
pub struct ClientSession<B, S> {
    store: PersistentStore<B>,
    settings: Settings,
    accounts: AccountBook,
    navigation: NavigationEngine,
    locales: LocaleCache<S>,
}

impl<B: StorageBackend, S: BundleSource> ClientSession<B, S> {
    /// Loads persisted state and restores the last route.
    pub fn bootstrap(backend: B, table: RouteTable, locales: LocaleCache<S>) -> Result<Self, String> {
        let mut store = PersistentStore::new(backend);
        let settings = store.load(SETTINGS_KEY, Settings::default());
        let accounts = store.load(ACCOUNTS_KEY, AccountBook::default());

        let mut navigation = NavigationEngine::new(table, DEFAULT_ROUTE)?;
        match navigation.navigate(&settings.route) {
            Ok(restored) => log::info!("restored route {}", restored.to),
            Err(rejected) => log::warn!(
                "could not restore route '{}': {:?}",
                settings.route,
                rejected
            ),
        }

        log::info!(
            "client session ready: language={} accounts={} recovered_errors={}",
            settings.language,
            accounts.len(),
            store.errors().len()
        );
        Ok(Self {
            store,
            settings,
            accounts,
            navigation,
            locales,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn accounts(&self) -> &AccountBook {
        &self.accounts
    }

    pub fn navigation(&self) -> &NavigationEngine {
        &self.navigation
    }

    pub fn store(&self) -> &PersistentStore<B> {
        &self.store
    }

    pub fn apply_settings_patch(&mut self, patch: SettingsPatch) -> &Settings {
        self.settings.apply_patch(patch);
        &self.settings
    }

    pub fn save_account(&mut self, record: AccountRecord) -> AccountUpsert {
        self.accounts.upsert(record)
    }

    pub fn load_auth(&mut self) -> Option<Value> {
        self.store.load_raw(AUTH_KEY)
    }

    /// Credentials are written as soon as they change rather than at exit.
    pub fn save_auth(&mut self, auth: &Value) -> Result<(), String> {
        self.store.save(AUTH_KEY, auth)
    }

    pub fn push_error(&mut self, kind: &str, detail: Value) {
        self.store.append_error(kind, detail);
    }

    pub fn navigate(&mut self, requested: &str) -> Result<Navigation, NavigationRejected> {
        self.navigation.navigate(requested)
    }

    pub fn navigate_section(&mut self, section: &str) -> Result<Navigation, NavigationRejected> {
        self.navigation.navigate_section(section)
    }

    pub fn set_navigation_loading(&mut self, loading: bool) {
        self.navigation.set_loading(loading);
    }

    pub fn locale_bundle(&mut self, key: &str) -> Option<Arc<LocaleBundle>> {
        self.locales.get(key)
    }

    /// Message at `path` in the configured language.
    pub fn text(&mut self, path: &str) -> String {
        self.locales.translate(&self.settings.language, path)
    }

    /// Saves settings and accounts, then flushes the error log. Every step is attempted.
    pub fn persist_on_exit(&mut self, now: DateTime<Utc>) -> Result<Option<String>, String> {
        let current_route = self.navigation.current_route();
        if self.navigation.table().contains(current_route) {
            self.settings.route = current_route.to_string();
        }

        let mut failures = Vec::new();
        if let Err(error) = self.store.save(SETTINGS_KEY, &self.settings) {
            failures.push(error);
        }
        if let Err(error) = self.store.save(ACCOUNTS_KEY, &self.accounts) {
            failures.push(error);
        }
        let flushed = match self.store.flush(now) {
            Ok(location) => location,
            Err(error) => {
                failures.push(error);
                None
            }
        };

        if failures.is_empty() {
            Ok(flushed)
        } else {
            Err(failures.join("; "))
        }
    }
}
