//! Host-independent logic of the Pxscope desktop client: route resolution, persisted
//! client state, locale bundles and the window lifecycle state machine.

pub mod accounts;
pub mod error_log;
pub mod locale;
pub mod navigation;
pub mod orchestrator;
pub mod session;
pub mod settings;
pub mod store;

pub use accounts::{AccountBook, AccountRecord, AccountUpsert};
pub use error_log::{ErrorLog, ErrorLogEntry};
pub use locale::{BundleSource, LocaleBundle, LocaleCache, StaticBundles};
pub use navigation::{
    Navigation, NavigationEngine, NavigationRejected, NavigationSnapshot, RouteTable,
    SlideDirection, Transition,
};
pub use orchestrator::{
    BootMode, ExitReason, HostPlatform, ShellCommand, ShellPhase, ShellSignal, WindowOrchestrator,
};
pub use session::ClientSession;
pub use settings::{Settings, SettingsPatch};
pub use store::{FileStorage, MemoryStorage, PersistentStore, StorageBackend};
