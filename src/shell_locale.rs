use std::env;

use pxscope_core::StaticBundles;

use crate::LOCALE_ENV;

const LOCALE_BUNDLES: &[(&str, &str)] = &[
    ("en-US", include_str!("../i18n/en-US.json")),
    ("zh-CN", include_str!("../i18n/zh-CN.json")),
    ("ja-JP", include_str!("../i18n/ja-JP.json")),
];

pub(crate) fn bundle_source() -> StaticBundles {
    StaticBundles::new(LOCALE_BUNDLES)
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some((known, _)) = LOCALE_BUNDLES.iter().find(|(key, _)| *key == raw) {
        return Some(*known);
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("zh") {
        return Some("zh-CN");
    }
    if lowered.starts_with("ja") {
        return Some("ja-JP");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}

/// Locale suggested by the environment, used to seed the language on first run.
pub(crate) fn locale_from_env() -> Option<&'static str> {
    [LOCALE_ENV, "LC_ALL", "LANG"]
        .into_iter()
        .filter_map(|key| env::var(key).ok())
        .find_map(|value| normalize_shell_locale(&value))
}

#[cfg(test)]
mod tests {
    use pxscope_core::{BundleSource, LocaleCache};

    use super::*;

    #[test]
    fn every_shipped_bundle_parses() {
        let source = bundle_source();
        for key in source.known_keys() {
            source
                .load_bundle(&key)
                .unwrap_or_else(|error| panic!("bundle {key} should parse: {error}"));
        }
    }

    #[test]
    fn tray_labels_exist_in_the_fallback_bundle() {
        let mut cache = LocaleCache::new(bundle_source());
        assert_eq!(cache.translate("en-US", "tray.quit"), "Quit");
        assert_eq!(cache.translate("zh-CN", "tray.devtools"), "开发者工具");
        assert_eq!(cache.translate("ja-JP", "tray.title"), "Pxscope");
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("EN_us"), Some("en-US"));
        assert_eq!(normalize_shell_locale("zh_TW.UTF-8"), Some("zh-CN"));
        assert_eq!(normalize_shell_locale("ja_JP"), Some("ja-JP"));
        assert_eq!(normalize_shell_locale("fr-FR"), None);
        assert_eq!(normalize_shell_locale("  "), None);
    }
}
