//! Supervisor, advisor and partner page models and form.

use serde::Serialize;

use medayu_core::{Profile, ProfileId, ProfileKind};

use super::common::MultipartForm;
use crate::uploads::{ImageDir, Upload};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub name: String,
    pub photo: String,
    pub photo_url: String,
}

impl ProfileView {
    pub fn new(profile: Profile, dir: &ImageDir) -> Self {
        ProfileView {
            id: profile.id,
            photo_url: dir.url_for(&profile.photo),
            name: profile.name,
            photo: profile.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileListData {
    pub kind: ProfileKind,
    pub profiles: Vec<ProfileView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileFormData {
    pub kind: ProfileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileView>,
}

/// Multipart fields `name` and `photo`.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub photo: Option<Upload>,
}

impl ProfileForm {
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        ProfileForm {
            name: form.text("name"),
            photo: form.take_file("photo"),
        }
    }

    pub fn values(&self) -> serde_json::Value {
        serde_json::json!({ "name": self.name })
    }
}
