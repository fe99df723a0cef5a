//! Dashboard procedures.

use axum::http::StatusCode;

use super::{Failure, decode, encode, unknown_procedure};
use crate::rpc::{
    AddWidgetInput, CreateDashboardInput, DeleteWidgetInput, IdInput, Procedure, ReorderWidgetsInput, RpcError,
    SuccessOutput,
};
use crate::services::dashboard::{self, DashboardError};
use crate::state::AppState;

pub(crate) fn dashboard_error_to_status(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::NotFound(_) | DashboardError::WidgetNotFound { .. } => StatusCode::NOT_FOUND,
        DashboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    }
}

fn failure(err: DashboardError) -> Failure {
    (dashboard_error_to_status(&err), RpcError::from_err(&err))
}

pub(crate) async fn dispatch(
    state: &AppState,
    procedure: Procedure,
    input: serde_json::Value,
) -> Result<serde_json::Value, Failure> {
    match procedure {
        Procedure::DashboardsGetAll => encode(dashboard::list_dashboards(state).await),
        Procedure::DashboardsGetById => {
            let IdInput { id } = decode(input)?;
            let found = dashboard::get_dashboard(state, &id).await.map_err(failure)?;
            encode(found)
        }
        Procedure::DashboardsCreate => {
            let CreateDashboardInput { name } = decode(input)?;
            let created = dashboard::create_dashboard(state, &name)
                .await
                .map_err(failure)?;
            encode(created)
        }
        Procedure::DashboardsDelete => {
            let IdInput { id } = decode(input)?;
            dashboard::delete_dashboard(state, &id).await.map_err(failure)?;
            encode(SuccessOutput { success: true })
        }
        Procedure::DashboardsAddWidget => {
            let AddWidgetInput { dashboard_id, title, kind } = decode(input)?;
            let widget = dashboard::add_widget(state, &dashboard_id, &title, kind)
                .await
                .map_err(failure)?;
            encode(widget)
        }
        Procedure::DashboardsDeleteWidget => {
            let DeleteWidgetInput { dashboard_id, widget_id } = decode(input)?;
            dashboard::delete_widget(state, &dashboard_id, &widget_id)
                .await
                .map_err(failure)?;
            encode(SuccessOutput { success: true })
        }
        Procedure::DashboardsReorderWidgets => {
            let ReorderWidgetsInput { dashboard_id, widget_ids } = decode(input)?;
            dashboard::reorder_widgets(state, &dashboard_id, &widget_ids)
                .await
                .map_err(failure)?;
            encode(SuccessOutput { success: true })
        }
        other => Err(unknown_procedure(other.name())),
    }
}
