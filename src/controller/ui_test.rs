use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn ui_state_default_is_closed_online_light() {
    let state = UiState::default();
    assert!(!state.sidebar_open);
    assert!(state.is_online);
    assert_eq!(state.theme, Theme::Light);
    assert!(state.input_text.is_empty());
    assert!(state.selected_conversation_id.is_none());
    assert!(state.notifications.is_empty());
}

// =============================================================
// Actions
// =============================================================

#[test]
fn sidebar_actions() {
    let mut state = UiState::default();
    state.apply(UiAction::ToggleSidebar);
    assert!(state.sidebar_open);
    state.apply(UiAction::SetSidebarOpen(false));
    assert!(!state.sidebar_open);
}

#[test]
fn input_actions() {
    let mut state = UiState::default();
    state.apply(UiAction::SetInputText("hello".into()));
    assert_eq!(state.input_text, "hello");
    state.apply(UiAction::ClearInput);
    assert!(state.input_text.is_empty());
}

#[test]
fn selection_and_theme_actions() {
    let mut state = UiState::default();
    state.apply(UiAction::SelectConversation(Some("2".into())));
    state.apply(UiAction::SelectDashboard(Some("1".into())));
    state.apply(UiAction::SetTheme(Theme::Dark));
    state.apply(UiAction::SetOnline(false));
    assert_eq!(state.selected_conversation_id.as_deref(), Some("2"));
    assert_eq!(state.selected_dashboard_id.as_deref(), Some("1"));
    assert_eq!(state.theme, Theme::Dark);
    assert!(!state.is_online);
}

// =============================================================
// Notifications
// =============================================================

#[test]
fn notifications_are_newest_first() {
    let mut state = UiState::default();
    state.apply(UiAction::Notify { kind: NotificationKind::Info, message: "first".into() });
    state.notify_error("second");
    assert_eq!(state.notifications[0].message, "second");
    assert_eq!(state.notifications[0].kind, NotificationKind::Error);
    assert_eq!(state.notifications[1].message, "first");
    assert_ne!(state.notifications[0].id, state.notifications[1].id);
}

#[test]
fn notifications_are_capped() {
    let mut state = UiState::default();
    for i in 0..15 {
        state.apply(UiAction::Notify { kind: NotificationKind::Info, message: format!("n{i}") });
    }
    assert_eq!(state.notifications.len(), MAX_NOTIFICATIONS);
    assert_eq!(state.notifications[0].message, "n14");
    assert_eq!(state.notifications[9].message, "n5");
}

#[test]
fn dismiss_and_clear_notifications() {
    let mut state = UiState::default();
    state.notify_error("a");
    state.notify_error("b");
    let id = state.notifications[1].id;
    state.apply(UiAction::DismissNotification(id));
    assert_eq!(state.notifications.len(), 1);
    assert_eq!(state.notifications[0].message, "b");
    state.apply(UiAction::ClearNotifications);
    assert!(state.notifications.is_empty());
}
