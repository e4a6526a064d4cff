//! The post form: draft ownership and the submission state machine.

use std::path::Path;
use std::sync::Arc;

use crate::backend::{BackendError, PostBackend, PostPayload};
use crate::post::image::{stage_image, ImageError, StagedImage};
use crate::post::models::{Field, FieldErrors, Post, PostDraft, Preview};
use crate::post::validate::validate;

const SUBMIT_FAILED_MESSAGE: &str = "The post could not be saved. Please try again.";

/// Where a submission currently stands. `Failed` is retryable and, like
/// `Idle`, leaves the controls unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("the draft has validation errors")]
    Validation,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the post could not be saved")]
    Backend(#[source] BackendError),
}

/// Orchestrates one modal session: seeds the draft, feeds edits into it,
/// validates, submits, and resets. The draft is owned here exclusively
/// and never mutated while a submission is in flight.
pub struct PostForm {
    backend: Arc<dyn PostBackend>,
    existing: Option<Post>,
    draft: PostDraft,
    errors: FieldErrors,
    phase: SubmitPhase,
    banner: Option<&'static str>,
}

impl PostForm {
    /// Open the form for a new post with an empty draft.
    pub fn create(backend: Arc<dyn PostBackend>) -> Self {
        Self {
            backend,
            existing: None,
            draft: PostDraft::new(),
            errors: FieldErrors::new(),
            phase: SubmitPhase::Idle,
            banner: None,
        }
    }

    /// Open the form for editing, seeded from the existing post.
    pub fn edit(backend: Arc<dyn PostBackend>, post: Post) -> Self {
        Self {
            backend,
            draft: PostDraft::from_post(&post),
            existing: Some(post),
            errors: FieldErrors::new(),
            phase: SubmitPhase::Idle,
            banner: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// True exactly while the backend call is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Submit and cancel controls are disabled while loading; this is the
    /// mutual exclusion that rules out a reentrant submit.
    pub fn controls_locked(&self) -> bool {
        self.is_loading()
    }

    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn description(&self) -> &str {
        &self.draft.description
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.draft.preview.as_ref()
    }

    pub fn staged_image(&self) -> Option<&StagedImage> {
        self.draft.staged.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Generic failure message after a backend error, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        if self.controls_locked() {
            return;
        }
        self.draft.title = title.into();
        self.errors.clear(Field::Title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        if self.controls_locked() {
            return;
        }
        self.draft.description = description.into();
        self.errors.clear(Field::Description);
    }

    /// Stage a local file and swap it in together with its preview.
    ///
    /// The swap happens only after the preview derivation completed, so a
    /// failed read leaves the previously staged image untouched and a new
    /// selection fully replaces the old one.
    pub async fn select_image(&mut self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        if self.controls_locked() {
            log::debug!("ignoring image selection while a submission is in flight");
            return Ok(());
        }
        let staging = stage_image(path).await?;
        self.draft.staged = Some(staging.image);
        self.draft.preview = Some(Preview::DataUrl(staging.preview_data_url));
        self.errors.clear(Field::Image);
        Ok(())
    }

    /// Drop the staged file and its preview. When editing, the preview
    /// falls back to the image already stored on the server.
    pub fn clear_image(&mut self) {
        if self.controls_locked() {
            return;
        }
        self.draft.staged = None;
        self.draft.preview = self
            .existing
            .as_ref()
            .map(|post| Preview::Remote(post.image_url.clone()));
        self.errors.clear(Field::Image);
    }

    /// Run the draft through validation and, if clean, submit it.
    ///
    /// On success the returned post is handed to the caller and the form
    /// closes (draft re-seeded). On a backend failure the draft is kept
    /// intact so the user can retry.
    pub async fn submit(&mut self) -> Result<Post, SubmitError> {
        if self.is_loading() {
            return Err(SubmitError::InFlight);
        }

        self.banner = None;
        self.phase = SubmitPhase::Validating;
        self.errors = validate(&self.draft, self.is_editing());
        if !self.errors.is_empty() {
            log::debug!("submission blocked by {} field error(s)", self.errors.len());
            self.phase = SubmitPhase::Idle;
            return Err(SubmitError::Validation);
        }

        self.phase = SubmitPhase::Submitting;
        let payload = PostPayload {
            title: self.draft.title.trim().to_string(),
            description: self.draft.description.trim().to_string(),
            image: self.draft.staged.clone(),
        };

        let result = match &self.existing {
            Some(post) => self.backend.update_post(&post.id, payload).await,
            None => self.backend.create_post(payload).await,
        };

        match result {
            Ok(post) => {
                self.phase = SubmitPhase::Succeeded;
                log::info!("post {} saved", post.id);
                self.close();
                Ok(post)
            }
            Err(e) => {
                log::error!("submission failed: {}", e);
                self.phase = SubmitPhase::Failed;
                self.banner = Some(SUBMIT_FAILED_MESSAGE);
                Err(SubmitError::Backend(e))
            }
        }
    }

    /// Close the modal session: re-seed the draft from the post being
    /// edited (or back to empty) and clear all transient state.
    pub fn close(&mut self) {
        self.draft = match &self.existing {
            Some(post) => PostDraft::from_post(post),
            None => PostDraft::new(),
        };
        self.errors = FieldErrors::new();
        self.banner = None;
        self.phase = SubmitPhase::Idle;
    }
}
