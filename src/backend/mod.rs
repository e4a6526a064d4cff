//! Persistence backend collaborator.
//!
//! The client never talks to storage directly; it hands a [`PostPayload`]
//! to whatever implements [`PostBackend`]. The HTTP implementation lives
//! in [`http`].

pub mod http;

use async_trait::async_trait;

use crate::post::image::StagedImage;
use crate::post::models::Post;

pub use http::HttpPostBackend;

/// The multipart payload of a submission: trimmed text fields plus the
/// staged image. `image` is `None` only when editing, in which case the
/// server keeps the stored image untouched.
#[derive(Debug, Clone)]
pub struct PostPayload {
    pub title: String,
    pub description: String,
    pub image: Option<StagedImage>,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected the request with status {0}")]
    Status(reqwest::StatusCode),
    #[error("response could not be decoded: {0}")]
    Decode(String),
    #[error("staged image could not be opened for upload: {0}")]
    Image(#[from] std::io::Error),
}

#[async_trait]
pub trait PostBackend: Send + Sync {
    async fn create_post(&self, payload: PostPayload) -> Result<Post, BackendError>;

    async fn update_post(&self, id: &str, payload: PostPayload) -> Result<Post, BackendError>;
}
