//! Announcement page models and form.

use serde::Serialize;

use medayu_core::{Announcement, AnnouncementId};

use super::common::MultipartForm;
use crate::uploads::{ImageDir, Upload};

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementView {
    pub id: AnnouncementId,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl AnnouncementView {
    pub fn new(announcement: Announcement, dir: &ImageDir) -> Self {
        AnnouncementView {
            id: announcement.id,
            photo_url: announcement.photo.as_deref().map(|p| dir.url_for(p)),
            title: announcement.title,
            body: announcement.body,
            photo: announcement.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementListData {
    pub announcements: Vec<AnnouncementView>,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementFormData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement: Option<AnnouncementView>,
}

/// Multipart fields `title`, `body` and the optional `photo`.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementForm {
    pub title: String,
    pub body: String,
    pub photo: Option<Upload>,
}

impl AnnouncementForm {
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        AnnouncementForm {
            title: form.text("title"),
            body: form.text("body"),
            photo: form.take_file("photo"),
        }
    }

    pub fn values(&self) -> serde_json::Value {
        serde_json::json!({ "title": self.title, "body": self.body })
    }
}
