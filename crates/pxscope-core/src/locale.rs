use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use serde::Serialize;
use serde_json::Value;

pub const FALLBACK_LOCALE: &str = "en-US";

/// Messages for one locale, addressed by dotted paths such as `discovery.illusts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocaleBundle {
    messages: Value,
}

impl LocaleBundle {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let messages: Value = serde_json::from_str(raw)
            .map_err(|error| format!("Failed to parse locale bundle: {error}"))?;
        if !messages.is_object() {
            return Err("Locale bundle root must be an object".to_string());
        }
        Ok(Self { messages })
    }

    pub fn lookup(&self, path: &str) -> Option<&str> {
        path.split('.')
            .try_fold(&self.messages, |node, segment| node.get(segment))?
            .as_str()
    }
}

pub trait BundleSource {
    fn known_keys(&self) -> Vec<String>;
    fn load_bundle(&self, key: &str) -> Result<LocaleBundle, String>;
}

/// Bundles compiled into the binary as raw JSON text, parsed on first use.
#[derive(Debug, Clone, Copy)]
pub struct StaticBundles {
    bundles: &'static [(&'static str, &'static str)],
}

impl StaticBundles {
    pub const fn new(bundles: &'static [(&'static str, &'static str)]) -> Self {
        Self { bundles }
    }
}

impl BundleSource for StaticBundles {
    fn known_keys(&self) -> Vec<String> {
        self.bundles.iter().map(|(key, _)| key.to_string()).collect()
    }

    fn load_bundle(&self, key: &str) -> Result<LocaleBundle, String> {
        let (_, raw) = self
            .bundles
            .iter()
            .find(|(known, _)| *known == key)
            .ok_or_else(|| format!("No locale bundle named '{key}'"))?;
        LocaleBundle::from_json(raw)
    }
}

/// Write-once-per-key cache of locale bundles. Nothing is ever evicted.
pub struct LocaleCache<S> {
    source: S,
    known: BTreeSet<String>,
    loaded: HashMap<String, Arc<LocaleBundle>>,
}

impl<S: BundleSource> LocaleCache<S> {
    pub fn new(source: S) -> Self {
        let known = source.known_keys().into_iter().collect();
        Self {
            source,
            known,
            loaded: HashMap::new(),
        }
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.known.contains(key)
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.loaded.contains_key(key)
    }

    pub fn known_keys(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    /// Unknown keys pass through without loading anything.
    pub fn get(&mut self, key: &str) -> Option<Arc<LocaleBundle>> {
        if let Some(bundle) = self.loaded.get(key) {
            return Some(Arc::clone(bundle));
        }
        if !self.known.contains(key) {
            return None;
        }

        match self.source.load_bundle(key) {
            Ok(bundle) => {
                log::debug!("loaded locale bundle '{key}'");
                let bundle = Arc::new(bundle);
                self.loaded.insert(key.to_string(), Arc::clone(&bundle));
                Some(bundle)
            }
            Err(error) => {
                log::warn!("failed to load locale bundle '{key}': {error}");
                None
            }
        }
    }

    /// Message at `path` in `locale`, then in the fallback locale, then the path itself.
    pub fn translate(&mut self, locale: &str, path: &str) -> String {
        for key in [locale, FALLBACK_LOCALE] {
            if let Some(text) = self
                .get(key)
                .and_then(|bundle| bundle.lookup(path).map(str::to_string))
            {
                return text;
            }
        }
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    const BUNDLES: &[(&str, &str)] = &[
        ("en-US", r#"{ "tray": { "quit": "Quit", "devtools": "Developer Tools" } }"#),
        ("zh-CN", r#"{ "tray": { "quit": "退出" } }"#),
        ("broken", "{ nope"),
    ];

    struct CountingSource {
        inner: StaticBundles,
        loads: RefCell<Vec<String>>,
    }

    impl BundleSource for CountingSource {
        fn known_keys(&self) -> Vec<String> {
            self.inner.known_keys()
        }

        fn load_bundle(&self, key: &str) -> Result<LocaleBundle, String> {
            self.loads.borrow_mut().push(key.to_string());
            self.inner.load_bundle(key)
        }
    }

    fn counting_cache() -> LocaleCache<CountingSource> {
        LocaleCache::new(CountingSource {
            inner: StaticBundles::new(BUNDLES),
            loads: RefCell::new(Vec::new()),
        })
    }

    #[test]
    fn known_keys_load_once() {
        let mut cache = counting_cache();
        assert!(!cache.is_loaded("zh-CN"));

        let first = cache.get("zh-CN").expect("bundle should load");
        let second = cache.get("zh-CN").expect("bundle should be cached");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_loaded("zh-CN"));
        assert_eq!(*cache.source.loads.borrow(), vec!["zh-CN".to_string()]);
    }

    #[test]
    fn unknown_keys_pass_through_untouched() {
        let mut cache = counting_cache();
        assert!(cache.get("fr-FR").is_none());
        assert!(!cache.is_loaded("fr-FR"));
        assert!(cache.source.loads.borrow().is_empty());
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache = counting_cache();
        assert!(cache.get("broken").is_none());
        assert!(cache.get("broken").is_none());
        assert!(!cache.is_loaded("broken"));
        assert_eq!(cache.source.loads.borrow().len(), 2);
    }

    #[test]
    fn translate_falls_back_to_english_then_to_the_path() {
        let mut cache = LocaleCache::new(StaticBundles::new(BUNDLES));
        assert_eq!(cache.translate("zh-CN", "tray.quit"), "退出");
        assert_eq!(cache.translate("zh-CN", "tray.devtools"), "Developer Tools");
        assert_eq!(cache.translate("ja-JP", "tray.quit"), "Quit");
        assert_eq!(cache.translate("en-US", "tray.missing"), "tray.missing");
        assert!(!cache.is_loaded("ja-JP"));
    }

    #[test]
    fn bundle_roots_must_be_objects() {
        assert!(LocaleBundle::from_json("[]").is_err());
        let bundle = LocaleBundle::from_json(r#"{ "a": { "b": "c" } }"#).expect("valid bundle");
        assert_eq!(bundle.lookup("a.b"), Some("c"));
        assert_eq!(bundle.lookup("a"), None);
    }
}
