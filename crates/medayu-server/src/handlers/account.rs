//! Login, logout and password change.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;

use medayu_core::password;

use super::{reject, DASHBOARD_PATH};
use crate::auth::{ManagerSession, LOGIN_PATH};
use crate::schema::account::{LoginData, LoginForm, PasswordForm, PasswordPageData};
use crate::schema::common::Page;
use crate::session::RequestContext;
use crate::state::AppState;

const PASSWORD_PATH: &str = "/manager/password";

/// `GET /`
pub async fn home() -> Response {
    Redirect::to(DASHBOARD_PATH).into_response()
}

/// `GET /login`
///
/// A session that is already signed in goes straight to the dashboard.
pub async fn login_page(mut ctx: RequestContext) -> Response {
    if ctx.manager().is_some() {
        return ctx.redirect(DASHBOARD_PATH);
    }
    let page = Page::new(None, &mut ctx, LoginData {});
    ctx.render(page)
}

/// `POST /login` (urlencoded `email`, `password`)
pub async fn login(
    State(state): State<AppState>,
    mut ctx: RequestContext,
    Form(form): Form<LoginForm>,
) -> Response {
    let result = state.service.lock().await.authenticate(&form);
    match result {
        Ok(manager) => {
            tracing::info!(manager = %manager.id, "manager signed in");
            ctx.sign_in(manager.id);
            ctx.success("Login successful");
            ctx.redirect(DASHBOARD_PATH)
        }
        Err(err) => {
            if !err.is_internal() {
                ctx.keep_form(&form.values());
            }
            reject(ctx, err, LOGIN_PATH, LOGIN_PATH)
        }
    }
}

/// `POST /logout`
pub async fn logout(mut ctx: RequestContext) -> Response {
    if let Some(id) = ctx.manager() {
        tracing::info!(manager = %id, "manager signed out");
    }
    ctx.sign_out();
    ctx.success("Logout successful");
    ctx.redirect(LOGIN_PATH)
}

/// `GET /manager/password`
pub async fn password_page(ManagerSession { mut ctx, manager }: ManagerSession) -> Response {
    let data = PasswordPageData {
        min_length: password::MIN_LENGTH,
    };
    let page = Page::new(Some(&manager), &mut ctx, data);
    ctx.render(page)
}

/// `POST /manager/password` (urlencoded `current_password`, `new_password`,
/// `confirm_password`)
pub async fn change_password(
    State(state): State<AppState>,
    ManagerSession { mut ctx, manager }: ManagerSession,
    Form(form): Form<PasswordForm>,
) -> Response {
    let result = state
        .service
        .lock()
        .await
        .change_password(manager.id, &form);
    match result {
        Ok(()) => {
            ctx.success("Password changed");
            ctx.redirect(DASHBOARD_PATH)
        }
        Err(err) => reject(ctx, err, PASSWORD_PATH, PASSWORD_PATH),
    }
}
