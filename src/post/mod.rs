pub mod form;
pub mod image;
pub mod models;
pub mod validate;

pub use form::*;
pub use image::*;
pub use models::*;
pub use validate::*;
