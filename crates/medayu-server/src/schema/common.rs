//! Shared page envelope and the parsed multipart body.

use std::collections::HashMap;

use serde::Serialize;

use medayu_core::{Manager, ManagerId};

use crate::session::{Flash, RequestContext};
use crate::uploads::Upload;

/// The signed-in manager as shown in page chrome.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerView {
    pub id: ManagerId,
    pub name: String,
    pub email: String,
}

impl From<&Manager> for ManagerView {
    fn from(manager: &Manager) -> Self {
        ManagerView {
            id: manager.id,
            name: manager.name.clone(),
            email: manager.email.clone(),
        }
    }
}

/// Standard page envelope.
///
/// `messages` and `form` are the one-shot session values, consumed when the
/// page is built.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerView>,
    pub messages: Vec<Flash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<serde_json::Value>,
    pub data: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(manager: Option<&Manager>, ctx: &mut RequestContext, data: T) -> Self {
        Page {
            manager: manager.map(ManagerView::from),
            messages: ctx.take_flashes(),
            form: ctx.take_form(),
            data,
        }
    }
}

/// Text fields and file parts of a multipart form.
///
/// A file input left empty by the browser arrives as a part with no name
/// and no bytes; such parts are never stored here.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl MultipartForm {
    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, upload: Upload) {
        self.files.insert(name.into(), upload);
    }

    /// The field's value, or an empty string if it was not sent.
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}
