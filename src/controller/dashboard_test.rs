use super::*;
use crate::state::{AppState, test_helpers};

async fn loaded(state: &AppState) -> (DashboardSession, UiState) {
    let mut session = DashboardSession::new(Arc::new(state.clone()));
    let mut ui = UiState::default();
    session.load(&mut ui).await.unwrap();
    (session, ui)
}

fn ids(widgets: &[Widget]) -> Vec<&str> {
    widgets.iter().map(|w| w.id.as_str()).collect()
}

// =============================================================
// Dashboards
// =============================================================

#[tokio::test]
async fn load_selects_first_dashboard() {
    let state = test_helpers::test_app_state();
    let (session, ui) = loaded(&state).await;
    assert_eq!(session.dashboards().len(), 2);
    assert_eq!(session.selected(&ui).unwrap().name, "Investment Portfolio");
    assert_eq!(session.widgets(&ui).len(), 2);
}

#[tokio::test]
async fn create_dashboard_trims_and_selects() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;

    let created = session.create_dashboard(&mut ui, "  Crypto  ").await.unwrap();
    assert_eq!(created.name, "Crypto");
    assert_eq!(session.selected(&ui).unwrap().id, created.id);
    assert!(session.widgets(&ui).is_empty());
}

#[tokio::test]
async fn create_dashboard_rejects_blank_name() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;
    assert_eq!(
        session.create_dashboard(&mut ui, "   ").await,
        Err(DashboardSessionError::EmptyName)
    );
    assert_eq!(session.dashboards().len(), 2);
}

#[tokio::test]
async fn delete_selected_falls_back_to_first_remaining() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;

    session.delete_selected_dashboard(&mut ui).await.unwrap();
    assert_eq!(session.selected(&ui).unwrap().name, "Market Analysis");

    session.delete_selected_dashboard(&mut ui).await.unwrap();
    assert!(ui.selected_dashboard_id.is_none());
    assert_eq!(
        session.delete_selected_dashboard(&mut ui).await,
        Err(DashboardSessionError::NoDashboard)
    );
}

// =============================================================
// Widgets
// =============================================================

#[tokio::test]
async fn add_and_delete_widget() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;

    let widget = session.add_widget(&mut ui, " Revenue ").await.unwrap();
    assert_eq!(widget.title, "Revenue");
    assert_eq!(session.widgets(&ui).len(), 3);

    session.delete_widget(&mut ui, &widget.id).await.unwrap();
    assert_eq!(session.widgets(&ui).len(), 2);
}

#[tokio::test]
async fn add_widget_rejects_blank_title() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;
    assert_eq!(session.add_widget(&mut ui, "").await, Err(DashboardSessionError::EmptyTitle));
}

#[tokio::test]
async fn delete_missing_widget_notifies() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;

    let err = session.delete_widget(&mut ui, "404").await.unwrap_err();
    assert!(matches!(err, DashboardSessionError::Store(StoreError::NotFound(_))));
    assert_eq!(ui.notifications.len(), 1);
}

// =============================================================
// Edit mode
// =============================================================

#[tokio::test]
async fn confirm_edit_persists_new_order() {
    let state = AppState::default();
    let id = test_helpers::seed_dashboard(&state, "Main", 3).await;
    let (mut session, mut ui) = loaded(&state).await;
    assert_eq!(ui.selected_dashboard_id.as_deref(), Some(id.as_str()));
    let original: Vec<String> = session.widgets(&ui).iter().map(|w| w.id.clone()).collect();

    session.enter_edit_mode(&ui).unwrap();
    session.move_widget(0, 2).unwrap();
    let expected = vec![original[1].as_str(), original[2].as_str(), original[0].as_str()];
    assert_eq!(ids(session.widgets(&ui)), expected);

    session.confirm_edit(&mut ui).await.unwrap();
    assert!(!session.is_editing());
    assert_eq!(ids(session.widgets(&ui)), expected);

    let stored = DashboardStore::get_dashboard(&state, &id).await.unwrap();
    assert_eq!(ids(&stored.widgets), expected);
}

#[tokio::test]
async fn cancel_edit_restores_order() {
    let state = AppState::default();
    test_helpers::seed_dashboard(&state, "Main", 3).await;
    let (mut session, mut ui) = loaded(&state).await;
    let original: Vec<String> = session.widgets(&ui).iter().map(|w| w.id.clone()).collect();

    session.enter_edit_mode(&ui).unwrap();
    session.move_widget(2, 0).unwrap();
    session.cancel_edit();

    let after: Vec<String> = session.widgets(&ui).iter().map(|w| w.id.clone()).collect();
    assert_eq!(after, original);
    assert!(session.confirm_edit(&mut ui).await.is_err());
}

#[tokio::test]
async fn move_widget_checks_bounds_and_mode() {
    let state = AppState::default();
    test_helpers::seed_dashboard(&state, "Main", 2).await;
    let (mut session, ui) = loaded(&state).await;

    assert_eq!(session.move_widget(0, 1), Err(DashboardSessionError::NotEditing));
    session.enter_edit_mode(&ui).unwrap();
    assert_eq!(
        session.move_widget(0, 2),
        Err(DashboardSessionError::InvalidMove { from: 0, to: 2, len: 2 })
    );
}

#[tokio::test]
async fn selecting_another_dashboard_leaves_edit_mode() {
    let state = test_helpers::test_app_state();
    let (mut session, mut ui) = loaded(&state).await;
    session.enter_edit_mode(&ui).unwrap();
    let other = session.dashboards()[1].id.clone();
    session.select_dashboard(&mut ui, &other);
    assert!(!session.is_editing());
    assert_eq!(session.selected(&ui).unwrap().id, other);
}
