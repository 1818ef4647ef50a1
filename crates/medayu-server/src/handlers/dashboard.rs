//! Manager dashboard.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::auth::ManagerSession;
use crate::error::INTERNAL_ERROR_MESSAGE;
use crate::schema::account::DashboardData;
use crate::schema::common::Page;
use crate::state::AppState;

/// `GET /manager/dashboard`
///
/// Every other page falls back here on failure, so this one answers a
/// plain 500 instead of redirecting.
pub async fn dashboard(
    State(state): State<AppState>,
    ManagerSession { mut ctx, manager }: ManagerSession,
) -> Response {
    let result = state.service.lock().await.dashboard();
    match result {
        Ok(counts) => {
            let page = Page::new(Some(&manager), &mut ctx, DashboardData { counts });
            ctx.render(page)
        }
        Err(err) => {
            tracing::error!(error = %err, "could not load dashboard");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
        }
    }
}
