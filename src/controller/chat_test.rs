use super::*;
use crate::controller::ui::NotificationKind;
use crate::services::conversation;
use crate::state::{AppState, test_helpers};

fn session(state: &AppState) -> (ChatSession, mpsc::UnboundedReceiver<RevealEvent>) {
    ChatSession::new(Arc::new(state.clone()), SidebarConfig::default(), RevealTimings::default())
}

async fn drive(session: &mut ChatSession, ui: &mut UiState, rx: &mut mpsc::UnboundedReceiver<RevealEvent>) {
    while session.is_turn_active() {
        let event = rx.recv().await.unwrap();
        session.apply_event(ui, event);
    }
}

fn message_count(session: &ChatSession, id: &str) -> usize {
    session
        .conversations()
        .iter()
        .find(|c| c.id == id)
        .map_or(0, |c| c.messages.len())
}

// =============================================================
// Loading and selection
// =============================================================

#[tokio::test]
async fn load_selects_first_conversation() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();

    chat.load(&mut ui).await.unwrap();
    assert_eq!(chat.conversations().len(), 3);
    assert_eq!(ui.selected_conversation_id.as_deref(), Some("1"));
    assert_eq!(chat.current_conversation(&ui).unwrap().title, "Portfolio Analysis");
}

#[tokio::test]
async fn load_keeps_existing_selection() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    ui.apply(UiAction::SelectConversation(Some("2".into())));

    chat.load(&mut ui).await.unwrap();
    assert_eq!(ui.selected_conversation_id.as_deref(), Some("2"));
}

#[tokio::test]
async fn select_conversation_closes_sidebar() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    chat.open_sidebar(&mut ui);
    assert!(ui.sidebar_open);

    let cmd = chat.select_conversation(&mut ui, "3");
    assert!(!cmd.open);
    assert_eq!(cmd.duration, Duration::from_millis(300));
    assert!(!ui.sidebar_open);
    assert_eq!(ui.selected_conversation_id.as_deref(), Some("3"));
}

#[tokio::test]
async fn create_conversation_selects_it() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();

    let created = chat.create_conversation(&mut ui).await.unwrap();
    assert_eq!(created.title, NEW_CONVERSATION_TITLE);
    assert_eq!(ui.selected_conversation_id.as_deref(), Some(created.id.as_str()));
    assert_eq!(chat.conversations().len(), 4);
}

#[tokio::test]
async fn delete_selected_conversation_falls_back_to_first() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();

    chat.delete_conversation(&mut ui, "1").await.unwrap();
    assert_eq!(ui.selected_conversation_id.as_deref(), Some("2"));

    chat.delete_conversation(&mut ui, "2").await.unwrap();
    chat.delete_conversation(&mut ui, "3").await.unwrap();
    assert_eq!(ui.selected_conversation_id, None);
}

#[tokio::test]
async fn delete_missing_conversation_notifies() {
    let state = AppState::default();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();

    let err = chat.delete_conversation(&mut ui, "404").await.unwrap_err();
    assert!(matches!(err, ChatError::Store(StoreError::NotFound(_))));
    assert_eq!(ui.notifications.len(), 1);
    assert_eq!(ui.notifications[0].kind, NotificationKind::Error);
}

#[tokio::test]
async fn rename_updates_cache() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();

    chat.rename_conversation(&mut ui, "2", "Renamed").await.unwrap();
    assert_eq!(chat.conversations()[1].title, "Renamed");
}

// =============================================================
// Submission
// =============================================================

#[tokio::test]
async fn submit_rejects_blank_input() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();

    ui.apply(UiAction::SetInputText("   ".into()));
    assert_eq!(chat.submit(&mut ui).await, Err(ChatError::EmptyInput));
}

#[tokio::test]
async fn submit_requires_selection() {
    let state = AppState::default();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    ui.apply(UiAction::SetInputText("hello".into()));
    assert_eq!(chat.submit(&mut ui).await, Err(ChatError::NoConversation));
}

#[tokio::test]
async fn submit_to_vanished_conversation_fails_and_notifies() {
    let state = AppState::default();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    ui.apply(UiAction::SelectConversation(Some("7".into())));
    ui.apply(UiAction::SetInputText("hello".into()));

    let err = chat.submit(&mut ui).await.unwrap_err();
    assert!(matches!(err, ChatError::SubmissionFailed(StoreError::NotFound(_))));
    assert!(!chat.is_turn_active());
    assert_eq!(ui.notifications.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn submit_runs_turn_to_completion() {
    let state = test_helpers::test_app_state();
    let (mut chat, mut rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();
    let before = message_count(&chat, "1");

    ui.apply(UiAction::SetInputText("  Show me portfolio performance ".into()));
    let turn_id = chat.submit(&mut ui).await.unwrap();
    assert!(ui.input_text.is_empty());
    assert_eq!(chat.turn_view().unwrap().turn_id, turn_id);
    assert!(!chat.turn_view().unwrap().thinking);

    let event = rx.recv().await.unwrap();
    chat.apply_event(&mut ui, event);
    assert!(chat.turn_view().unwrap().thinking);

    drive(&mut chat, &mut ui, &mut rx).await;
    assert!(chat.turn_view().is_none());
    assert_eq!(message_count(&chat, "1"), before + 2);

    let last = chat.current_conversation(&ui).unwrap().messages.last().unwrap();
    assert!(last.content.ends_with("Here's a chart to visualize the data:"));
    assert!(last.chart_data.is_some());
    assert!(ui.notifications.is_empty());
}

#[tokio::test(start_paused = true)]
async fn second_submit_while_running_is_rejected() {
    let state = test_helpers::test_app_state();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();

    ui.apply(UiAction::SetInputText("first".into()));
    chat.submit(&mut ui).await.unwrap();
    ui.apply(UiAction::SetInputText("second".into()));
    assert_eq!(chat.submit(&mut ui).await, Err(ChatError::TurnInProgress));
    assert_eq!(ui.input_text, "second");
}

#[tokio::test(start_paused = true)]
async fn switching_conversation_cancels_turn() {
    let state = test_helpers::test_app_state();
    let (mut chat, mut rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();
    let before = message_count(&chat, "1");

    ui.apply(UiAction::SetInputText("hello".into()));
    chat.submit(&mut ui).await.unwrap();
    let event = rx.recv().await.unwrap();
    chat.apply_event(&mut ui, event);

    chat.select_conversation(&mut ui, "2");
    assert!(!chat.is_turn_active());

    tokio::time::sleep(Duration::from_secs(10)).await;
    while let Ok(event) = rx.try_recv() {
        chat.apply_event(&mut ui, event);
    }
    assert_eq!(message_count(&chat, "1"), before + 1);
    let stored = conversation::get_conversation(&state, "1").await.unwrap();
    assert_eq!(stored.messages.len(), before + 1);
}

#[tokio::test(start_paused = true)]
async fn reselecting_current_conversation_keeps_turn() {
    let state = test_helpers::test_app_state();
    let (mut chat, mut rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();
    let before = message_count(&chat, "1");

    ui.apply(UiAction::SetInputText("hello".into()));
    chat.submit(&mut ui).await.unwrap();
    let event = rx.recv().await.unwrap();
    chat.apply_event(&mut ui, event);
    chat.open_sidebar(&mut ui);

    let cmd = chat.select_conversation(&mut ui, "1");
    assert!(!cmd.open);
    assert!(!ui.sidebar_open);
    assert!(chat.is_turn_active());

    drive(&mut chat, &mut ui, &mut rx).await;
    assert_eq!(message_count(&chat, "1"), before + 2);
    let stored = conversation::get_conversation(&state, "1").await.unwrap();
    assert_eq!(stored.messages.len(), before + 2);
}

#[tokio::test(start_paused = true)]
async fn failed_reply_notifies_and_clears_turn() {
    let state = AppState::default();
    let id = test_helpers::seed_conversation(&state, "Doomed").await;
    let (mut chat, mut rx) = session(&state);
    let mut ui = UiState::default();
    chat.load(&mut ui).await.unwrap();

    ui.apply(UiAction::SetInputText("hello".into()));
    chat.submit(&mut ui).await.unwrap();
    conversation::delete_conversation(&state, &id).await.unwrap();

    drive(&mut chat, &mut ui, &mut rx).await;
    assert!(chat.turn_view().is_none());
    assert_eq!(ui.notifications.len(), 1);
    assert!(ui.notifications[0].message.starts_with("Reply failed"));
}

// =============================================================
// Sidebar
// =============================================================

#[tokio::test]
async fn sidebar_gesture_syncs_ui_flag() {
    let state = AppState::default();
    let (mut chat, _rx) = session(&state);
    let mut ui = UiState::default();

    assert_eq!(
        chat.drag_sidebar(DragUpdate { translation_x: 200.0, translation_y: 0.0 }),
        Some(200.0)
    );
    let cmd = chat.release_sidebar(&mut ui, DragEnd { translation_x: 200.0, translation_y: 0.0, velocity_x: 0.0 });
    assert!(cmd.open);
    assert!(ui.sidebar_open);
    assert_eq!(chat.tick_sidebar(Duration::from_secs(1)), 300.0);

    chat.toggle_sidebar(&mut ui);
    assert!(!ui.sidebar_open);
    assert!(!chat.sidebar().is_open());
}
