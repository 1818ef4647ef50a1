//! HTTP handler modules for the manager backend.
//!
//! Handlers are thin: they read the form, acquire the service lock, delegate
//! to [`ContentService`](crate::service::ContentService), and answer with
//! either a JSON page model or a `303` redirect carrying a one-shot message.
//! No content rules live here.

pub mod account;
pub mod announcements;
pub mod carousel;
pub mod dashboard;
pub mod profiles;

use axum::extract::Multipart;
use axum::response::Response;

use crate::error::ContentError;
use crate::schema::common::MultipartForm;
use crate::session::RequestContext;
use crate::uploads::Upload;

pub const DASHBOARD_PATH: &str = "/manager/dashboard";

/// Reads every part of a multipart body.
///
/// File inputs left empty (no bytes) are skipped so the service sees no
/// upload at all.
pub(crate) async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm, ContentError> {
    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ContentError::MalformedForm(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        match file_name {
            Some(original_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ContentError::MalformedForm(e.to_string()))?;
                if bytes.is_empty() {
                    continue;
                }
                form.insert_file(
                    name,
                    Upload {
                        original_name,
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ContentError::MalformedForm(e.to_string()))?;
                form.insert_text(name, value);
            }
        }
    }
    Ok(form)
}

/// Redirects with the error's message.
///
/// Validation failures go back to `back_to`; internal failures are logged
/// and sent to `fallback` with the generic message.
pub(crate) fn reject(mut ctx: RequestContext, err: ContentError, back_to: &str, fallback: &str) -> Response {
    ctx.error(err.user_message());
    if err.is_internal() {
        tracing::error!(error = %err, "request failed");
        ctx.redirect(fallback)
    } else {
        tracing::debug!(error = %err, "request rejected");
        ctx.redirect(back_to)
    }
}
