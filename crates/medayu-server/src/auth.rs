//! Extractor for routes that require a signed-in manager.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use medayu_core::Manager;

use crate::error::{ContentError, INTERNAL_ERROR_MESSAGE};
use crate::session::RequestContext;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

/// The session of a signed-in manager.
///
/// Rejects with a redirect to the login page carrying an error flash when
/// no manager is bound, or when the bound account no longer exists.
pub struct ManagerSession {
    pub ctx: RequestContext,
    pub manager: Manager,
}

impl FromRequestParts<AppState> for ManagerSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut ctx = RequestContext::from_headers(state.sessions.clone(), &parts.headers);
        let Some(id) = ctx.manager() else {
            ctx.error(ContentError::Unauthenticated.user_message());
            return Err(ctx.redirect(LOGIN_PATH));
        };

        let found = {
            let service = state.service.lock().await;
            service.manager(id)
        };
        match found {
            Ok(manager) => Ok(ManagerSession { ctx, manager }),
            Err(ContentError::NotFound(_)) => {
                tracing::warn!(manager = %id, "session bound to a missing manager");
                ctx.sign_out();
                ctx.error(ContentError::Unauthenticated.user_message());
                Err(ctx.redirect(LOGIN_PATH))
            }
            Err(err) => {
                tracing::error!(error = %err, "could not load session manager");
                Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE,
                )
                    .into_response())
            }
        }
    }
}
