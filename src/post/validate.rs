//! Draft validation for the post form.
//!
//! All rules are evaluated independently so every violated field gets a
//! message in one pass; nothing here talks to the network.

use crate::post::models::{Field, FieldErrors, PostDraft};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const IMAGE_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Media types the backend accepts for the image part.
pub const ACCEPTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// Validate a draft. `editing` relaxes the image requirement: an edit may
/// keep the image already stored on the server.
///
/// Per field the first violated rule wins; for a staged image the size
/// check runs before the media-type check.
pub fn validate(draft: &PostDraft, editing: bool) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.add(Field::Title, "A title is required");
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.add(Field::Title, "Titles are limited to 100 characters");
    }

    let description = draft.description.trim();
    if description.is_empty() {
        errors.add(Field::Description, "A description is required");
    } else if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.add(Field::Description, "Descriptions are limited to 500 characters");
    }

    if !editing && draft.staged.is_none() {
        errors.add(Field::Image, "An image is required");
    }

    if let Some(staged) = &draft.staged {
        if staged.len > IMAGE_MAX_BYTES {
            errors.add(Field::Image, "The image exceeds the 10 MiB size limit");
        } else if !ACCEPTED_IMAGE_TYPES.contains(&staged.content_type.as_str()) {
            errors.add(
                Field::Image,
                "Only JPEG, PNG, WebP and GIF images are supported",
            );
        }
    }

    errors
}
