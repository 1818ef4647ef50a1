//! Carousel handlers (list, create, edit, update, delete).

use axum::extract::{Multipart, Path, State};
use axum::response::Response;

use medayu_core::SlideId;

use super::{read_multipart, reject, DASHBOARD_PATH};
use crate::auth::ManagerSession;
use crate::error::ContentError;
use crate::schema::carousel::SlideForm;
use crate::schema::common::Page;
use crate::state::AppState;

const LIST_PATH: &str = "/manager/carousel/list";
const CREATE_FORM_PATH: &str = "/manager/carousel/create-form";

fn edit_form_path(id: i64) -> String {
    format!("/manager/carousel/edit-form/{}", id)
}

/// `GET /manager/carousel/list`
pub async fn list(
    State(state): State<AppState>,
    ManagerSession { mut ctx, manager }: ManagerSession,
) -> Response {
    let result = state.service.lock().await.list_slides();
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, DASHBOARD_PATH, DASHBOARD_PATH),
    }
}

/// `GET /manager/carousel/create-form`
///
/// Redirects back to the list once the carousel is full.
pub async fn create_form(
    State(state): State<AppState>,
    ManagerSession { mut ctx, manager }: ManagerSession,
) -> Response {
    let result = state.service.lock().await.slide_create_form();
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, LIST_PATH, LIST_PATH),
    }
}

/// `POST /manager/carousel/create` (multipart `image`, `ordinal`)
pub async fn create(
    State(state): State<AppState>,
    ManagerSession { mut ctx, .. }: ManagerSession,
    multipart: Multipart,
) -> Response {
    let form = match read_multipart(multipart).await {
        Ok(parts) => SlideForm::from_multipart(parts),
        Err(err) => return reject(ctx, err, CREATE_FORM_PATH, LIST_PATH),
    };
    let values = form.values();

    let result = state.service.lock().await.create_slide(form);
    match result {
        Ok(slide) => {
            ctx.success(format!("Photo added at position {}", slide.ordinal));
            ctx.redirect(LIST_PATH)
        }
        Err(err @ ContentError::CapacityExceeded) => reject(ctx, err, LIST_PATH, LIST_PATH),
        Err(err) => {
            if !err.is_internal() {
                ctx.keep_form(&values);
            }
            reject(ctx, err, CREATE_FORM_PATH, LIST_PATH)
        }
    }
}

/// `GET /manager/carousel/edit-form/{id}`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ManagerSession { mut ctx, manager }: ManagerSession,
) -> Response {
    let result = state.service.lock().await.slide_edit_form(SlideId(id));
    match result {
        Ok(data) => {
            let page = Page::new(Some(&manager), &mut ctx, data);
            ctx.render(page)
        }
        Err(err) => reject(ctx, err, LIST_PATH, LIST_PATH),
    }
}

/// `POST /manager/carousel/update/{id}` (multipart `ordinal`, optional `image`)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ManagerSession { mut ctx, .. }: ManagerSession,
    multipart: Multipart,
) -> Response {
    let back_to = edit_form_path(id);
    let form = match read_multipart(multipart).await {
        Ok(parts) => SlideForm::from_multipart(parts),
        Err(err) => return reject(ctx, err, &back_to, LIST_PATH),
    };
    let values = form.values();

    let result = state.service.lock().await.update_slide(SlideId(id), form);
    match result {
        Ok(_) => {
            ctx.success("Photo updated");
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

/// `POST /manager/carousel/delete/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ManagerSession { mut ctx, .. }: ManagerSession,
) -> Response {
    let result = state.service.lock().await.delete_slide(SlideId(id));
    match result {
        Ok(_) => {
            ctx.success("Photo deleted");
            ctx.redirect(LIST_PATH)
        }
        Err(err) => reject(ctx, err, LIST_PATH, LIST_PATH),
    }
}
