pub const TRAY_MENU_TITLE: &str = "tray_title";
pub const TRAY_MENU_TOGGLE_DEVTOOLS: &str = "tray_toggle_devtools";
pub const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    ToggleDevtools,
    Quit,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<TrayMenuAction> {
    match menu_id {
        TRAY_MENU_TOGGLE_DEVTOOLS => Some(TrayMenuAction::ToggleDevtools),
        TRAY_MENU_QUIT => Some(TrayMenuAction::Quit),
        _ => None,
    }
}
