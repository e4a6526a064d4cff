use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::post::image::StagedImage;

/// Post as stored by the backend. The client only ever holds a transient
/// copy; `id`, `image_url` and the timestamps are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the image slot of a draft currently renders as: either the stored
/// image of the post being edited, or a data URL derived from a staged file.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Remote(String),
    DataUrl(String),
}

impl Preview {
    pub fn as_str(&self) -> &str {
        match self {
            Preview::Remote(url) | Preview::DataUrl(url) => url,
        }
    }
}

/// In-progress, unsaved post data. Owned exclusively by the [`PostForm`]
/// that created it and destroyed (re-seeded) when the form closes.
///
/// [`PostForm`]: crate::post::form::PostForm
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub staged: Option<StagedImage>,
    pub preview: Option<Preview>,
}

impl PostDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from an existing post for editing. The stored image
    /// stays on the server; only its URL is carried over for display.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            staged: None,
            preview: Some(Preview::Remote(post.image_url.clone())),
        }
    }
}

/// A field of the post form that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Title,
    Description,
    Image,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Image => "image",
        }
    }
}

/// Per-field validation messages. Each field holds at most one message;
/// the first violation recorded for a field wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}
