//! Handlers shared by the supervisor, advisor and partner listings.
//!
//! The router binds one [`ProfileKind`] per route prefix and passes it in.

use axum::extract::Multipart;
use axum::response::Response;

use medayu_core::{ProfileId, ProfileKind};

use super::{read_multipart, reject, DASHBOARD_PATH};
use crate::auth::ManagerSession;
use crate::error::ContentError;
use crate::schema::common::Page;
use crate::schema::profiles::{ProfileForm, ProfileFormData};
use crate::state::AppState;

fn list_path(kind: ProfileKind) -> String {
    format!("/manager/{}/list", kind.slug())
}

fn create_form_path(kind: ProfileKind) -> String {
    format!("/manager/{}/create-form", kind.slug())
}

fn edit_form_path(kind: ProfileKind, id: ProfileId) -> String {
    format!("/manager/{}/edit-form/{}", kind.slug(), id)
}

/// `GET /manager/{kind}/list`
pub async fn list(kind: ProfileKind, state: AppState, session: ManagerSession) -> Response {
    let ManagerSession { mut ctx, manager } = session;
    let result = state.service.lock().await.list_profiles(kind);
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, DASHBOARD_PATH, DASHBOARD_PATH),
    }
}

/// `GET /manager/{kind}/create-form`
pub async fn create_form(kind: ProfileKind, session: ManagerSession) -> Response {
    let ManagerSession { mut ctx, manager } = session;
    let page = Page::new(Some(&manager), &mut ctx, ProfileFormData { kind, profile: None });
    ctx.render(page)
}

/// `POST /manager/{kind}/create` (multipart `name`, `photo`)
pub async fn create(
    kind: ProfileKind,
    state: AppState,
    session: ManagerSession,
    multipart: Multipart,
) -> Response {
    let ManagerSession { mut ctx, .. } = session;
    let form = match read_multipart(multipart).await {
        Ok(parts) => ProfileForm::from_multipart(parts),
        Err(err) => return reject(ctx, err, &create_form_path(kind), &list_path(kind)),
    };
    let values = form.values();

    let result = state.service.lock().await.create_profile(kind, form);
    match result {
        Ok(_) => {
            ctx.success(format!("{} added", kind.label()));
            ctx.redirect(&list_path(kind))
        }
        Err(err) => {
            if !err.is_internal() {
                ctx.keep_form(&values);
            }
            reject(ctx, err, &create_form_path(kind), &list_path(kind))
        }
    }
}

/// `GET /manager/{kind}/edit-form/{id}`
pub async fn edit_form(
    kind: ProfileKind,
    state: AppState,
    id: ProfileId,
    session: ManagerSession,
) -> Response {
    let ManagerSession { mut ctx, manager } = session;
    let result = state.service.lock().await.profile_edit_form(kind, id);
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, &list_path(kind), &list_path(kind)),
    }
}

/// `POST /manager/{kind}/update/{id}` (multipart `name`, optional `photo`)
pub async fn update(
    kind: ProfileKind,
    state: AppState,
    id: ProfileId,
    session: ManagerSession,
    multipart: Multipart,
) -> Response {
    let ManagerSession { mut ctx, .. } = session;
    let back_to = edit_form_path(kind, id);
    let form = match read_multipart(multipart).await {
        Ok(parts) => ProfileForm::from_multipart(parts),
        Err(err) => return reject(ctx, err, &back_to, &list_path(kind)),
    };
    let values = form.values();

    let result = state.service.lock().await.update_profile(kind, id, form);
    match result {
        Ok(_) => {
            ctx.success(format!("{} updated", kind.label()));
            ctx.redirect(&list_path(kind))
        }
        Err(err @ ContentError::NotFound(_)) => reject(ctx, err, &list_path(kind), &list_path(kind)),
        Err(err) => {
            if !err.is_internal() {
                ctx.keep_form(&values);
            }
            reject(ctx, err, &back_to, &list_path(kind))
        }
    }
}

/// `POST /manager/{kind}/delete/{id}`
pub async fn delete(
    kind: ProfileKind,
    state: AppState,
    id: ProfileId,
    session: ManagerSession,
) -> Response {
    let ManagerSession { mut ctx, .. } = session;
    let result = state.service.lock().await.delete_profile(kind, id);
    match result {
        Ok(_) => {
            ctx.success(format!("{} deleted", kind.label()));
            ctx.redirect(&list_path(kind))
        }
        Err(err) => reject(ctx, err, &list_path(kind), &list_path(kind)),
    }
}
