//! UI state shared by the chat and dashboard screens.
//!
//! DESIGN
//! ======
//! A plain value mutated through [`UiAction`]s. Sessions borrow it per call
//! instead of owning it, and failures land in a capped notification list.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// Most notifications kept; older ones fall off the end.
pub const MAX_NOTIFICATIONS: usize = 10;

/// App-wide UI state: sidebar flag, composer text, theme, selections and
/// notifications.
///
/// Owned by whoever drives the screen and mutated only through
/// [`UiState::apply`].
#[derive(Clone, Debug)]
pub struct UiState {
    pub sidebar_open: bool,
    pub input_text: String,
    pub is_online: bool,
    pub theme: Theme,
    pub selected_dashboard_id: Option<String>,
    pub selected_conversation_id: Option<String>,
    /// Newest first.
    pub notifications: Vec<Notification>,
    next_notification_id: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: false,
            input_text: String::new(),
            is_online: true,
            theme: Theme::Light,
            selected_dashboard_id: None,
            selected_conversation_id: None,
            notifications: Vec::new(),
            next_notification_id: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiAction {
    SetSidebarOpen(bool),
    ToggleSidebar,
    SetInputText(String),
    ClearInput,
    SetOnline(bool),
    SetTheme(Theme),
    SelectDashboard(Option<String>),
    SelectConversation(Option<String>),
    Notify { kind: NotificationKind, message: String },
    DismissNotification(u64),
    ClearNotifications,
}

impl UiState {
    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SetSidebarOpen(open) => self.sidebar_open = open,
            UiAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            UiAction::SetInputText(text) => self.input_text = text,
            UiAction::ClearInput => self.input_text.clear(),
            UiAction::SetOnline(online) => self.is_online = online,
            UiAction::SetTheme(theme) => self.theme = theme,
            UiAction::SelectDashboard(id) => self.selected_dashboard_id = id,
            UiAction::SelectConversation(id) => self.selected_conversation_id = id,
            UiAction::Notify { kind, message } => {
                let id = self.next_notification_id;
                self.next_notification_id += 1;
                self.notifications
                    .insert(0, Notification { id, kind, message });
                self.notifications.truncate(MAX_NOTIFICATIONS);
            }
            UiAction::DismissNotification(id) => self.notifications.retain(|n| n.id != id),
            UiAction::ClearNotifications => self.notifications.clear(),
        }
    }

    /// Shorthand for an error notification.
    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.apply(UiAction::Notify { kind: NotificationKind::Error, message: message.into() });
    }
}
