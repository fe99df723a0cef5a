//! Dashboard service: mock dashboard and widget CRUD.
//!
//! DESIGN
//! ======
//! Same locking discipline as the conversation service. New widgets get
//! four weeks of random sample data and a random palette color; there is no
//! real data source behind them.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use rand::Rng;
use time::OffsetDateTime;
use tracing::info;

use crate::state::AppState;
use crate::types::{ChartColor, ChartData, ChartDataset, Dashboard, Widget, WidgetKind};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("dashboard not found: {0}")]
    NotFound(String),
    #[error("widget {widget_id} not found on dashboard {dashboard_id}")]
    WidgetNotFound { dashboard_id: String, widget_id: String },
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl crate::rpc::ErrorCode for DashboardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_DASHBOARD_NOT_FOUND",
            Self::WidgetNotFound { .. } => "E_WIDGET_NOT_FOUND",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
        }
    }
}

// =============================================================================
// QUERIES
// =============================================================================

pub async fn list_dashboards(state: &AppState) -> Vec<Dashboard> {
    state.dashboards.read().await.dashboards.clone()
}

/// Fetch one dashboard with its widgets.
///
/// # Errors
///
/// Returns [`DashboardError::NotFound`] for an unknown id.
pub async fn get_dashboard(state: &AppState, id: &str) -> Result<Dashboard, DashboardError> {
    let table = state.dashboards.read().await;
    table
        .find(id)
        .cloned()
        .ok_or_else(|| DashboardError::NotFound(id.to_owned()))
}

// =============================================================================
// DASHBOARD MUTATIONS
// =============================================================================

/// Create an empty dashboard.
///
/// # Errors
///
/// Returns [`DashboardError::InvalidInput`] for a blank name.
pub async fn create_dashboard(state: &AppState, name: &str) -> Result<Dashboard, DashboardError> {
    if name.trim().is_empty() {
        return Err(DashboardError::InvalidInput("dashboard name is empty"));
    }
    let mut table = state.dashboards.write().await;
    let dashboard = Dashboard {
        id: table.ids.mint(),
        name: name.to_owned(),
        created_at: OffsetDateTime::now_utc(),
        widgets: Vec::new(),
    };
    table.dashboards.push(dashboard.clone());
    info!(dashboard_id = %dashboard.id, "dashboard created");
    Ok(dashboard)
}

/// Delete a dashboard and all of its widgets.
///
/// # Errors
///
/// Returns [`DashboardError::NotFound`] for an unknown id.
pub async fn delete_dashboard(state: &AppState, id: &str) -> Result<(), DashboardError> {
    let mut table = state.dashboards.write().await;
    let Some(index) = table.dashboards.iter().position(|d| d.id == id) else {
        return Err(DashboardError::NotFound(id.to_owned()));
    };
    table.dashboards.remove(index);
    info!(dashboard_id = %id, "dashboard deleted");
    Ok(())
}

// =============================================================================
// WIDGET MUTATIONS
// =============================================================================

/// Sample data for a new widget: four weekly points in `0..100`.
pub fn sample_widget_data(rng: &mut impl Rng) -> ChartData {
    let data = (0..4).map(|_| f64::from(rng.random_range(0u8..100))).collect();
    let color = ChartColor::WIDGET_PALETTE[rng.random_range(0..ChartColor::WIDGET_PALETTE.len())];
    ChartData {
        labels: (1..=4).map(|week| format!("Week {week}")).collect(),
        datasets: vec![ChartDataset { data, color }],
    }
}

/// Append a widget to a dashboard.
///
/// # Errors
///
/// Returns [`DashboardError::InvalidInput`] for a blank title and
/// [`DashboardError::NotFound`] for an unknown dashboard.
pub async fn add_widget(
    state: &AppState,
    dashboard_id: &str,
    title: &str,
    kind: WidgetKind,
) -> Result<Widget, DashboardError> {
    if title.trim().is_empty() {
        return Err(DashboardError::InvalidInput("widget title is empty"));
    }
    let mut table = state.dashboards.write().await;
    let index = table
        .dashboards
        .iter()
        .position(|d| d.id == dashboard_id)
        .ok_or_else(|| DashboardError::NotFound(dashboard_id.to_owned()))?;
    let id = table.ids.mint();
    let dashboard = &mut table.dashboards[index];

    let widget = Widget { id, title: title.to_owned(), kind, data: sample_widget_data(&mut rand::rng()) };
    dashboard.widgets.push(widget.clone());
    info!(%dashboard_id, widget_id = %widget.id, "widget added");
    Ok(widget)
}

/// Remove one widget from a dashboard.
///
/// # Errors
///
/// Returns [`DashboardError::NotFound`] for an unknown dashboard and
/// [`DashboardError::WidgetNotFound`] for an unknown widget.
pub async fn delete_widget(state: &AppState, dashboard_id: &str, widget_id: &str) -> Result<(), DashboardError> {
    let mut table = state.dashboards.write().await;
    let dashboard = table
        .find_mut(dashboard_id)
        .ok_or_else(|| DashboardError::NotFound(dashboard_id.to_owned()))?;
    let Some(index) = dashboard.widgets.iter().position(|w| w.id == widget_id) else {
        return Err(DashboardError::WidgetNotFound {
            dashboard_id: dashboard_id.to_owned(),
            widget_id: widget_id.to_owned(),
        });
    };
    dashboard.widgets.remove(index);
    info!(%dashboard_id, %widget_id, "widget deleted");
    Ok(())
}

/// Replace the widget order with `widget_ids`.
///
/// Ids that do not name a widget on the dashboard are skipped, and widgets
/// whose id is not listed are dropped. Returns the new order.
///
/// # Errors
///
/// Returns [`DashboardError::NotFound`] for an unknown dashboard.
pub async fn reorder_widgets(
    state: &AppState,
    dashboard_id: &str,
    widget_ids: &[String],
) -> Result<Vec<Widget>, DashboardError> {
    let mut table = state.dashboards.write().await;
    let dashboard = table
        .find_mut(dashboard_id)
        .ok_or_else(|| DashboardError::NotFound(dashboard_id.to_owned()))?;

    let mut remaining = std::mem::take(&mut dashboard.widgets);
    let mut reordered = Vec::with_capacity(widget_ids.len());
    for id in widget_ids {
        if let Some(index) = remaining.iter().position(|w| &w.id == id) {
            reordered.push(remaining.remove(index));
        }
    }
    if !remaining.is_empty() {
        info!(%dashboard_id, dropped = remaining.len(), "reorder dropped unlisted widgets");
    }
    dashboard.widgets = reordered;
    Ok(dashboard.widgets.clone())
}
