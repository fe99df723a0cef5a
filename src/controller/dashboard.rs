//! Dashboard session: dashboard list, widgets and the reorder edit mode.
//!
//! Edit mode works on a snapshot of the selected dashboard's widgets.
//! Moves only touch the snapshot; confirming sends the new order to the
//! store, cancelling throws the snapshot away.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ui::{UiAction, UiState};
use crate::rpc::ErrorCode;
use crate::store::{DashboardStore, StoreError};
use crate::types::{Dashboard, Widget};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardSessionError {
    #[error("dashboard name is empty")]
    EmptyName,
    #[error("widget title is empty")]
    EmptyTitle,
    #[error("no dashboard selected")]
    NoDashboard,
    #[error("not in edit mode")]
    NotEditing,
    #[error("cannot move widget {from} to {to}: {len} widgets")]
    InvalidMove { from: usize, to: usize, len: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for DashboardSessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyTitle => "E_INVALID_INPUT",
            Self::NoDashboard => "E_NO_DASHBOARD",
            Self::NotEditing => "E_NOT_EDITING",
            Self::InvalidMove { .. } => "E_INVALID_MOVE",
            Self::Store(err) => err.error_code(),
        }
    }
}

#[derive(Debug, Clone)]
struct EditState {
    dashboard_id: String,
    widgets: Vec<Widget>,
}

pub struct DashboardSession {
    store: Arc<dyn DashboardStore>,
    dashboards: Vec<Dashboard>,
    edit: Option<EditState>,
}

impl DashboardSession {
    #[must_use]
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self { store, dashboards: Vec::new(), edit: None }
    }

    #[must_use]
    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    #[must_use]
    pub fn selected<'a>(&'a self, ui: &UiState) -> Option<&'a Dashboard> {
        let id = ui.selected_dashboard_id.as_deref()?;
        self.dashboards.iter().find(|d| d.id == id)
    }

    /// Widgets as displayed: the edit snapshot while editing, otherwise the
    /// selected dashboard's widgets.
    #[must_use]
    pub fn widgets<'a>(&'a self, ui: &UiState) -> &'a [Widget] {
        if let Some(edit) = &self.edit {
            return &edit.widgets;
        }
        self.selected(ui)
            .map(|d| d.widgets.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Fetch dashboards and make sure one is selected.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::Store`] when the list cannot be fetched.
    pub async fn load(&mut self, ui: &mut UiState) -> Result<(), DashboardSessionError> {
        let dashboards = self
            .store
            .list_dashboards()
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.dashboards = dashboards;
        if self.selected(ui).is_none() {
            self.select_first(ui);
        }
        debug!(count = self.dashboards.len(), "dashboards loaded");
        Ok(())
    }

    /// Select a dashboard. Leaves edit mode without saving.
    pub fn select_dashboard(&mut self, ui: &mut UiState, id: &str) {
        self.edit = None;
        ui.apply(UiAction::SelectDashboard(Some(id.to_owned())));
    }

    /// Create a dashboard and select it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::EmptyName`] for a blank name and
    /// [`DashboardSessionError::Store`] when the store refuses.
    pub async fn create_dashboard(&mut self, ui: &mut UiState, name: &str) -> Result<Dashboard, DashboardSessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardSessionError::EmptyName);
        }
        let created = self
            .store
            .create_dashboard(name)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.dashboards.push(created.clone());
        self.select_dashboard(ui, &created.id);
        info!(dashboard_id = %created.id, "dashboard created");
        Ok(created)
    }

    /// Delete the selected dashboard and select the first remaining one.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::NoDashboard`] when nothing is
    /// selected and [`DashboardSessionError::Store`] when the store refuses.
    pub async fn delete_selected_dashboard(&mut self, ui: &mut UiState) -> Result<(), DashboardSessionError> {
        let id = self.selected_id(ui)?;
        self.store
            .delete_dashboard(&id)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.dashboards.retain(|d| d.id != id);
        self.edit = None;
        self.select_first(ui);
        Ok(())
    }

    /// Add a line-chart widget to the selected dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::EmptyTitle`],
    /// [`DashboardSessionError::NoDashboard`] or
    /// [`DashboardSessionError::Store`].
    pub async fn add_widget(&mut self, ui: &mut UiState, title: &str) -> Result<Widget, DashboardSessionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DashboardSessionError::EmptyTitle);
        }
        let id = self.selected_id(ui)?;
        let widget = self
            .store
            .add_widget(&id, title)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        if let Some(dashboard) = self.dashboard_mut(&id) {
            dashboard.widgets.push(widget.clone());
        }
        if let Some(edit) = self.edit.as_mut().filter(|e| e.dashboard_id == id) {
            edit.widgets.push(widget.clone());
        }
        Ok(widget)
    }

    /// Remove a widget from the selected dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::NoDashboard`] or
    /// [`DashboardSessionError::Store`], including a missing widget.
    pub async fn delete_widget(&mut self, ui: &mut UiState, widget_id: &str) -> Result<(), DashboardSessionError> {
        let id = self.selected_id(ui)?;
        self.store
            .delete_widget(&id, widget_id)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        if let Some(dashboard) = self.dashboard_mut(&id) {
            dashboard.widgets.retain(|w| w.id != widget_id);
        }
        if let Some(edit) = self.edit.as_mut() {
            edit.widgets.retain(|w| w.id != widget_id);
        }
        Ok(())
    }

    // =========================================================================
    // EDIT MODE
    // =========================================================================

    /// Snapshot the selected dashboard's widgets for reordering.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::NoDashboard`] when nothing is selected.
    pub fn enter_edit_mode(&mut self, ui: &UiState) -> Result<(), DashboardSessionError> {
        let dashboard = self.selected(ui).ok_or(DashboardSessionError::NoDashboard)?;
        self.edit = Some(EditState { dashboard_id: dashboard.id.clone(), widgets: dashboard.widgets.clone() });
        Ok(())
    }

    /// Move the widget at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::NotEditing`] outside edit mode and
    /// [`DashboardSessionError::InvalidMove`] for out-of-range positions.
    pub fn move_widget(&mut self, from: usize, to: usize) -> Result<(), DashboardSessionError> {
        let edit = self.edit.as_mut().ok_or(DashboardSessionError::NotEditing)?;
        let len = edit.widgets.len();
        if from >= len || to >= len {
            return Err(DashboardSessionError::InvalidMove { from, to, len });
        }
        let widget = edit.widgets.remove(from);
        edit.widgets.insert(to, widget);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Save the snapshot order and leave edit mode. On failure edit mode is
    /// kept so the user can retry or cancel.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardSessionError::NotEditing`] outside edit mode and
    /// [`DashboardSessionError::Store`] when the store refuses.
    pub async fn confirm_edit(&mut self, ui: &mut UiState) -> Result<(), DashboardSessionError> {
        let edit = self.edit.clone().ok_or(DashboardSessionError::NotEditing)?;
        let ids: Vec<String> = edit.widgets.iter().map(|w| w.id.clone()).collect();
        self.store
            .reorder_widgets(&edit.dashboard_id, &ids)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        if let Some(dashboard) = self.dashboard_mut(&edit.dashboard_id) {
            dashboard.widgets = edit.widgets;
        }
        self.edit = None;
        info!(dashboard_id = %edit.dashboard_id, widgets = ids.len(), "widgets reordered");
        Ok(())
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn selected_id(&self, ui: &UiState) -> Result<String, DashboardSessionError> {
        self.selected(ui)
            .map(|d| d.id.clone())
            .ok_or(DashboardSessionError::NoDashboard)
    }

    fn select_first(&mut self, ui: &mut UiState) {
        let first = self.dashboards.first().map(|d| d.id.clone());
        ui.apply(UiAction::SelectDashboard(first));
    }

    fn dashboard_mut(&mut self, id: &str) -> Option<&mut Dashboard> {
        self.dashboards.iter_mut().find(|d| d.id == id)
    }
}

fn fail(ui: &mut UiState, err: DashboardSessionError) -> DashboardSessionError {
    warn!(code = err.error_code(), error = %err, "dashboard operation failed");
    ui.notify_error(err.to_string());
    err
}
