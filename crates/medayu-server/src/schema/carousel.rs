//! Carousel page models and form.

use serde::Serialize;

use medayu_core::{CarouselSlide, Ordinal, SlideId};

use super::common::MultipartForm;
use crate::uploads::{ImageDir, Upload};

#[derive(Debug, Clone, Serialize)]
pub struct SlideView {
    pub id: SlideId,
    pub ordinal: Ordinal,
    pub image_file_name: String,
    pub image_url: String,
}

impl SlideView {
    pub fn new(slide: CarouselSlide, dir: &ImageDir) -> Self {
        SlideView {
            id: slide.id,
            ordinal: slide.ordinal,
            image_url: dir.url_for(&slide.image_file_name),
            image_file_name: slide.image_file_name,
        }
    }
}

/// `GET /manager/carousel/list`
#[derive(Debug, Serialize)]
pub struct SlideListData {
    pub slides: Vec<SlideView>,
    pub capacity: u8,
    pub is_full: bool,
}

/// `GET /manager/carousel/create-form` and `/edit-form/{id}`.
///
/// For an edit, `available_ordinals` includes the slide's own ordinal.
#[derive(Debug, Serialize)]
pub struct SlideFormData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<SlideView>,
    pub available_ordinals: Vec<Ordinal>,
}

/// Multipart fields `image` and `ordinal`.
#[derive(Debug, Clone, Default)]
pub struct SlideForm {
    pub ordinal: String,
    pub image: Option<Upload>,
}

impl SlideForm {
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        SlideForm {
            ordinal: form.text("ordinal"),
            image: form.take_file("image"),
        }
    }

    /// Values re-populated after a rejected submission.
    pub fn values(&self) -> serde_json::Value {
        serde_json::json!({ "ordinal": self.ordinal })
    }
}
