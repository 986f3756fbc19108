//! Window lifecycle state machine.
//!
//! The windowing host feeds [`ShellSignal`]s in and executes the [`ShellCommand`]s that
//! come back. Nothing here touches a real window, so the whole lifecycle is testable.

use std::time::Duration;

pub const SPLASH_WINDOW: &str = "splash";
pub const MAIN_WINDOW: &str = "main";

/// Delay before the post-unmaximize redraw nudge.
pub const RESIZE_NUDGE_DELAY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Windows leaves stale pixels behind after unmaximizing a frameless window.
    pub fn needs_resize_nudge(self) -> bool {
        self == Self::Windows
    }

    /// macOS apps conventionally stay alive with no windows open.
    pub fn keeps_running_without_windows(self) -> bool {
        self == Self::MacOs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Production,
    Development,
}

impl BootMode {
    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 {
            Self::Production
        } else {
            Self::Development
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPhase {
    Starting,
    TrayInit,
    MainLoading,
    Ready,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellSignal {
    Launch,
    TrayReady,
    TrayFailed(String),
    WindowCreationFailed { label: String, reason: String },
    MainReady,
    MainUnmaximized,
    MainClosed,
    SecondaryOpened(String),
    SecondaryClosed(String),
    AllWindowsClosed,
    TrayClicked,
    Activated,
    QuitRequested,
    BootMode(BootMode),
}

/// Why the shell is exiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    AllWindowsClosed,
    QuitRequested,
}

impl ExitReason {
    pub fn describe(self) -> &'static str {
        match self {
            Self::AllWindowsClosed => "all windows closed",
            Self::QuitRequested => "quit requested from the tray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    CreateSplash,
    InitTray,
    /// Create the main window hidden; it is shown once it reports ready.
    CreateMain,
    DestroySplash,
    ShowMain,
    ScheduleResizeNudge { delay: Duration },
    DestroyWindow(String),
    Exit(ExitReason),
    /// Fatal startup failure.
    Abort(String),
}

/// Widths for the redraw nudge: one unit wider, then back. Net change is zero.
pub fn resize_nudge_widths(width: u32) -> [u32; 2] {
    [width.saturating_add(1), width]
}

#[derive(Debug)]
pub struct WindowOrchestrator {
    platform: HostPlatform,
    phase: ShellPhase,
    boot_mode: Option<BootMode>,
    splash_open: bool,
    main_open: bool,
    resize_nudge_armed: bool,
    secondary_windows: Vec<String>,
}

impl WindowOrchestrator {
    pub fn new(platform: HostPlatform) -> Self {
        Self {
            platform,
            phase: ShellPhase::Starting,
            boot_mode: None,
            splash_open: false,
            main_open: false,
            resize_nudge_armed: false,
            secondary_windows: Vec::new(),
        }
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn boot_mode(&self) -> Option<BootMode> {
        self.boot_mode
    }

    pub fn is_main_open(&self) -> bool {
        self.main_open
    }

    pub fn secondary_windows(&self) -> &[String] {
        &self.secondary_windows
    }

    pub fn handle(&mut self, signal: ShellSignal) -> Vec<ShellCommand> {
        match signal {
            ShellSignal::Launch => {
                if self.phase != ShellPhase::Starting {
                    log::warn!("ignoring launch signal in phase {:?}", self.phase);
                    return Vec::new();
                }
                self.splash_open = true;
                self.main_open = true;
                self.phase = ShellPhase::TrayInit;
                vec![
                    ShellCommand::CreateSplash,
                    ShellCommand::InitTray,
                    ShellCommand::CreateMain,
                ]
            }
            ShellSignal::TrayReady => {
                if self.phase == ShellPhase::TrayInit {
                    self.phase = ShellPhase::MainLoading;
                }
                Vec::new()
            }
            ShellSignal::TrayFailed(reason) => {
                vec![ShellCommand::Abort(format!(
                    "tray initialization failed: {reason}"
                ))]
            }
            ShellSignal::WindowCreationFailed { label, reason } => {
                vec![ShellCommand::Abort(format!(
                    "failed to create window '{label}': {reason}"
                ))]
            }
            ShellSignal::MainReady => self.on_main_ready(),
            ShellSignal::MainUnmaximized => {
                if self.main_open && self.resize_nudge_armed && self.platform.needs_resize_nudge() {
                    vec![ShellCommand::ScheduleResizeNudge {
                        delay: RESIZE_NUDGE_DELAY,
                    }]
                } else {
                    Vec::new()
                }
            }
            ShellSignal::MainClosed => self.on_main_closed(),
            ShellSignal::SecondaryOpened(label) => {
                if !self.secondary_windows.contains(&label) {
                    self.secondary_windows.push(label);
                }
                Vec::new()
            }
            ShellSignal::SecondaryClosed(label) => {
                self.secondary_windows.retain(|known| *known != label);
                Vec::new()
            }
            ShellSignal::AllWindowsClosed => {
                if self.platform.keeps_running_without_windows() {
                    Vec::new()
                } else {
                    vec![ShellCommand::Exit(ExitReason::AllWindowsClosed)]
                }
            }
            ShellSignal::TrayClicked | ShellSignal::Activated => self.reopen_main(),
            ShellSignal::QuitRequested => {
                self.phase = ShellPhase::Closing;
                vec![ShellCommand::Exit(ExitReason::QuitRequested)]
            }
            ShellSignal::BootMode(mode) => {
                log::info!("ui announced boot mode {mode:?}");
                self.boot_mode = Some(mode);
                Vec::new()
            }
        }
    }

    fn on_main_ready(&mut self) -> Vec<ShellCommand> {
        if !matches!(self.phase, ShellPhase::TrayInit | ShellPhase::MainLoading) {
            return Vec::new();
        }

        let mut commands = Vec::with_capacity(2);
        if self.splash_open {
            self.splash_open = false;
            commands.push(ShellCommand::DestroySplash);
        }
        commands.push(ShellCommand::ShowMain);
        self.phase = ShellPhase::Ready;
        self.resize_nudge_armed = true;
        commands
    }

    fn on_main_closed(&mut self) -> Vec<ShellCommand> {
        self.phase = ShellPhase::Closing;
        self.main_open = false;
        self.resize_nudge_armed = false;

        let mut commands: Vec<ShellCommand> = self
            .secondary_windows
            .drain(..)
            .rev()
            .map(ShellCommand::DestroyWindow)
            .collect();
        if self.splash_open {
            self.splash_open = false;
            commands.push(ShellCommand::DestroySplash);
        }
        commands
    }

    fn reopen_main(&mut self) -> Vec<ShellCommand> {
        if self.main_open {
            return vec![ShellCommand::ShowMain];
        }
        self.main_open = true;
        self.phase = ShellPhase::MainLoading;
        vec![ShellCommand::CreateMain]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_orchestrator(platform: HostPlatform) -> WindowOrchestrator {
        let mut orchestrator = WindowOrchestrator::new(platform);
        orchestrator.handle(ShellSignal::Launch);
        orchestrator.handle(ShellSignal::TrayReady);
        orchestrator.handle(ShellSignal::MainReady);
        orchestrator
    }

    #[test]
    fn launch_shows_splash_and_starts_tray_and_main_together() {
        let mut orchestrator = WindowOrchestrator::new(HostPlatform::Linux);

        assert_eq!(
            orchestrator.handle(ShellSignal::Launch),
            vec![
                ShellCommand::CreateSplash,
                ShellCommand::InitTray,
                ShellCommand::CreateMain,
            ]
        );
        assert_eq!(orchestrator.phase(), ShellPhase::TrayInit);

        orchestrator.handle(ShellSignal::TrayReady);
        assert_eq!(orchestrator.phase(), ShellPhase::MainLoading);

        assert_eq!(
            orchestrator.handle(ShellSignal::MainReady),
            vec![ShellCommand::DestroySplash, ShellCommand::ShowMain]
        );
        assert_eq!(orchestrator.phase(), ShellPhase::Ready);
    }

    #[test]
    fn second_launch_is_ignored() {
        let mut orchestrator = ready_orchestrator(HostPlatform::Linux);
        assert!(orchestrator.handle(ShellSignal::Launch).is_empty());
    }

    #[test]
    fn main_ready_before_tray_ready_still_hands_off() {
        let mut orchestrator = WindowOrchestrator::new(HostPlatform::Linux);
        orchestrator.handle(ShellSignal::Launch);

        assert_eq!(
            orchestrator.handle(ShellSignal::MainReady),
            vec![ShellCommand::DestroySplash, ShellCommand::ShowMain]
        );
        orchestrator.handle(ShellSignal::TrayReady);
        assert_eq!(orchestrator.phase(), ShellPhase::Ready);
    }

    #[test]
    fn later_page_loads_do_not_reshow_the_window() {
        let mut orchestrator = ready_orchestrator(HostPlatform::Linux);
        assert!(orchestrator.handle(ShellSignal::MainReady).is_empty());
    }

    #[test]
    fn startup_failures_abort() {
        let mut orchestrator = WindowOrchestrator::new(HostPlatform::Linux);
        orchestrator.handle(ShellSignal::Launch);

        assert!(matches!(
            orchestrator.handle(ShellSignal::TrayFailed("no tray".to_string())).as_slice(),
            [ShellCommand::Abort(reason)] if reason.contains("no tray")
        ));
        assert!(matches!(
            orchestrator
                .handle(ShellSignal::WindowCreationFailed {
                    label: MAIN_WINDOW.to_string(),
                    reason: "no webview".to_string(),
                })
                .as_slice(),
            [ShellCommand::Abort(reason)] if reason.contains("main")
        ));
    }

    #[test]
    fn unmaximize_nudges_only_on_windows_after_ready() {
        let mut windows = WindowOrchestrator::new(HostPlatform::Windows);
        windows.handle(ShellSignal::Launch);
        assert!(windows.handle(ShellSignal::MainUnmaximized).is_empty());

        windows.handle(ShellSignal::MainReady);
        assert_eq!(
            windows.handle(ShellSignal::MainUnmaximized),
            vec![ShellCommand::ScheduleResizeNudge {
                delay: RESIZE_NUDGE_DELAY
            }]
        );

        let mut linux = ready_orchestrator(HostPlatform::Linux);
        assert!(linux.handle(ShellSignal::MainUnmaximized).is_empty());
    }

    #[test]
    fn resize_nudge_has_zero_net_width_change() {
        for width in [0, 1, 600, 800, 1920, u32::MAX] {
            let [wider, restored] = resize_nudge_widths(width);
            assert!(wider >= width);
            assert_eq!(restored, width);
        }
        assert_eq!(resize_nudge_widths(800), [801, 800]);
    }

    #[test]
    fn closing_main_destroys_secondary_windows_newest_first() {
        let mut orchestrator = ready_orchestrator(HostPlatform::Windows);
        for label in ["render-1", "render-2", "render-3"] {
            orchestrator.handle(ShellSignal::SecondaryOpened(label.to_string()));
        }
        orchestrator.handle(ShellSignal::SecondaryClosed("render-2".to_string()));

        assert_eq!(
            orchestrator.handle(ShellSignal::MainClosed),
            vec![
                ShellCommand::DestroyWindow("render-3".to_string()),
                ShellCommand::DestroyWindow("render-1".to_string()),
            ]
        );
        assert!(orchestrator.secondary_windows().is_empty());
        assert_eq!(orchestrator.phase(), ShellPhase::Closing);
        assert!(orchestrator.handle(ShellSignal::MainUnmaximized).is_empty());
    }

    #[test]
    fn closing_main_before_ready_also_drops_the_splash() {
        let mut orchestrator = WindowOrchestrator::new(HostPlatform::Linux);
        orchestrator.handle(ShellSignal::Launch);
        assert_eq!(
            orchestrator.handle(ShellSignal::MainClosed),
            vec![ShellCommand::DestroySplash]
        );
    }

    #[test]
    fn all_windows_closed_exits_except_on_macos() {
        let mut linux = ready_orchestrator(HostPlatform::Linux);
        assert_eq!(
            linux.handle(ShellSignal::AllWindowsClosed),
            vec![ShellCommand::Exit(ExitReason::AllWindowsClosed)]
        );

        let mut mac = ready_orchestrator(HostPlatform::MacOs);
        assert!(mac.handle(ShellSignal::AllWindowsClosed).is_empty());
    }

    #[test]
    fn activation_recreates_a_torn_down_main_window() {
        let mut orchestrator = ready_orchestrator(HostPlatform::MacOs);
        assert_eq!(orchestrator.handle(ShellSignal::Activated), vec![ShellCommand::ShowMain]);

        orchestrator.handle(ShellSignal::MainClosed);
        assert!(!orchestrator.is_main_open());
        assert_eq!(orchestrator.handle(ShellSignal::Activated), vec![ShellCommand::CreateMain]);
        assert_eq!(orchestrator.phase(), ShellPhase::MainLoading);

        assert_eq!(orchestrator.handle(ShellSignal::MainReady), vec![ShellCommand::ShowMain]);
        assert_eq!(orchestrator.phase(), ShellPhase::Ready);
    }

    #[test]
    fn tray_click_shows_the_main_window() {
        let mut orchestrator = ready_orchestrator(HostPlatform::Linux);
        assert_eq!(orchestrator.handle(ShellSignal::TrayClicked), vec![ShellCommand::ShowMain]);
    }

    #[test]
    fn quit_and_boot_mode_signals() {
        let mut orchestrator = ready_orchestrator(HostPlatform::Linux);
        assert_eq!(orchestrator.boot_mode(), None);

        assert!(orchestrator
            .handle(ShellSignal::BootMode(BootMode::from_flag(1)))
            .is_empty());
        assert_eq!(orchestrator.boot_mode(), Some(BootMode::Development));
        assert_eq!(BootMode::from_flag(0), BootMode::Production);

        assert_eq!(
            orchestrator.handle(ShellSignal::QuitRequested),
            vec![ShellCommand::Exit(ExitReason::QuitRequested)]
        );
        assert_eq!(orchestrator.phase(), ShellPhase::Closing);
    }

    #[test]
    fn exit_reasons_describe_their_origin() {
        assert_eq!(ExitReason::AllWindowsClosed.describe(), "all windows closed");
        assert_eq!(
            ExitReason::QuitRequested.describe(),
            "quit requested from the tray"
        );
    }
}
