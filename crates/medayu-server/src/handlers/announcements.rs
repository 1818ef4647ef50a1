//! Announcement handlers.

use axum::extract::{Multipart, Path, State};
use axum::response::Response;

use medayu_core::AnnouncementId;

use super::{read_multipart, reject, DASHBOARD_PATH};
use crate::auth::ManagerSession;
use crate::error::ContentError;
use crate::schema::announcements::{AnnouncementForm, AnnouncementFormData};
use crate::schema::common::Page;
use crate::state::AppState;

const LIST_PATH: &str = "/manager/announcements/list";
const CREATE_FORM_PATH: &str = "/manager/announcements/create-form";

/// `GET /manager/announcements/list`
pub async fn list(
    State(state): State<AppState>,
    ManagerSession { mut ctx, manager }: ManagerSession,
) -> Response {
    let result = state.service.lock().await.list_announcements();
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, DASHBOARD_PATH, DASHBOARD_PATH),
    }
}

/// `GET /manager/announcements/create-form`
pub async fn create_form(ManagerSession { mut ctx, manager }: ManagerSession) -> Response {
    let page = Page::new(
        Some(&manager),
        &mut ctx,
        AnnouncementFormData { announcement: None },
    );
    ctx.render(page)
}

/// `POST /manager/announcements/create` (multipart `title`, `body`, optional `photo`)
pub async fn create(
    State(state): State<AppState>,
    ManagerSession { mut ctx, .. }: ManagerSession,
    multipart: Multipart,
) -> Response {
    let form = match read_multipart(multipart).await {
        Ok(parts) => AnnouncementForm::from_multipart(parts),
        Err(err) => return reject(ctx, err, CREATE_FORM_PATH, LIST_PATH),
    };
    let values = form.values();

    let result = state.service.lock().await.create_announcement(form);
    match result {
        Ok(_) => {
            ctx.success("Announcement added");
            ctx.redirect(LIST_PATH)
        }
        Err(err) => {
            if !err.is_internal() {
                ctx.keep_form(&values);
            }
            reject(ctx, err, CREATE_FORM_PATH, LIST_PATH)
        }
    }
}

/// `GET /manager/announcements/edit-form/{id}`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ManagerSession { mut ctx, manager }: ManagerSession,
) -> Response {
    let result = state
        .service
        .lock()
        .await
        .announcement_edit_form(AnnouncementId(id));
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, LIST_PATH, LIST_PATH),
    }
}

/// `POST /manager/announcements/update/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ManagerSession { mut ctx, .. }: ManagerSession,
    multipart: Multipart,
) -> Response {
    let back_to = format!("/manager/announcements/edit-form/{}", id);
    let form = match read_multipart(multipart).await {
        Ok(parts) => AnnouncementForm::from_multipart(parts),
        Err(err) => return reject(ctx, err, &back_to, LIST_PATH),
    };
    let values = form.values();

    let result = state
        .service
        .lock()
        .await
        .update_announcement(AnnouncementId(id), form);
    match result {
        Ok(_) => {
            ctx.success("Announcement updated");
            ctx.redirect(LIST_PATH)
        }
        Err(err @ ContentError::NotFound(_)) => reject(ctx, err, LIST_PATH, LIST_PATH),
        Err(err) => {
            if !err.is_internal() {
                ctx.keep_form(&values);
            }
            reject(ctx, err, &back_to, LIST_PATH)
        }
    }
}

/// `POST /manager/announcements/delete/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ManagerSession { mut ctx, .. }: ManagerSession,
) -> Response {
    let result = state
        .service
        .lock()
        .await
        .delete_announcement(AnnouncementId(id));
    match result {
        Ok(_) => {
            ctx.success("Announcement deleted");
            ctx.redirect(LIST_PATH)
        }
        Err(err) => reject(ctx, err, LIST_PATH, LIST_PATH),
    }
}
