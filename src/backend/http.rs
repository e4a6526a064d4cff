//! HTTP implementation of the persistence backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio_util::codec::{BytesCodec, FramedRead};

use super::{BackendError, PostBackend, PostPayload};
use crate::post::image::StagedImage;
use crate::post::models::Post;

pub struct HttpPostBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPostBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn post_from_response(response: reqwest::Response) -> Result<Post, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }
        response
            .json::<Post>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Build the wire form. Field names are fixed by the backend contract:
/// `title`, `description`, and optionally `image`.
async fn multipart_form(payload: PostPayload) -> Result<Form, BackendError> {
    let mut form = Form::new()
        .text("title", payload.title)
        .text("description", payload.description);

    if let Some(image) = payload.image {
        form = form.part("image", image_part(&image).await?);
    }

    Ok(form)
}

/// Stream the staged file from disk rather than buffering it; the length
/// is carried so the request gets a proper content length.
async fn image_part(image: &StagedImage) -> Result<Part, BackendError> {
    let file = tokio::fs::File::open(&image.path).await?;
    let stream = FramedRead::new(file, BytesCodec::new());
    let part = Part::stream_with_length(Body::wrap_stream(stream), image.len)
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)?;
    Ok(part)
}

#[async_trait]
impl PostBackend for HttpPostBackend {
    async fn create_post(&self, payload: PostPayload) -> Result<Post, BackendError> {
        let url = format!("{}/api/posts", self.base_url);
        log::debug!("POST {}", url);
        let form = multipart_form(payload).await?;
        let response = self.client.post(&url).multipart(form).send().await?;
        Self::post_from_response(response).await
    }

    async fn update_post(&self, id: &str, payload: PostPayload) -> Result<Post, BackendError> {
        let url = format!("{}/api/posts/{}", self.base_url, id);
        log::debug!("PUT {}", url);
        let form = multipart_form(payload).await?;
        let response = self.client.put(&url).multipart(form).send().await?;
        Self::post_from_response(response).await
    }
}
