//! Headless client engine for a post manager: session-gated access,
//! draft validation, image staging, and multipart submission against an
//! external backend and identity provider.

pub mod auth;
pub mod backend;
pub mod config;
pub mod post;
pub mod session;

pub use crate::auth::{AuthError, AuthOutcome, AuthPhase, Session, SignInForm};
pub use crate::backend::{BackendError, HttpPostBackend, PostBackend, PostPayload};
pub use crate::config::ClientConfig;
pub use crate::post::{Field, FieldErrors, Post, PostForm, SubmitError, SubmitPhase};
pub use crate::session::{compute_affordances, Affordances, SessionProvider};
