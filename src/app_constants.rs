pub(crate) const TRAY_ID: &str = "pxscope-tray";
pub(crate) const DESKTOP_LOG_NAME: &str = "desktop";
pub(crate) const DEFAULT_DATA_DIR: &str = ".pxscope";

pub(crate) const ROOT_DIR_ENV: &str = "PXSCOPE_ROOT";
pub(crate) const LOCALE_ENV: &str = "PXSCOPE_LOCALE";
pub(crate) const LOG_LEVEL_ENV: &str = "PXSCOPE_LOG";

pub(crate) const MAIN_WINDOW_PAGE: &str = "index.html";
pub(crate) const SPLASH_WINDOW_PAGE: &str = "splash.html";

pub(crate) const MAIN_WINDOW_SIZE: (f64, f64) = (800.0, 600.0);
pub(crate) const MAIN_WINDOW_MIN_SIZE: (f64, f64) = (600.0, 400.0);
pub(crate) const SPLASH_WINDOW_SIZE: (f64, f64) = (350.0, 350.0);
