//! Pictor studio SDK.
//!
//! This crate provides the image generation client, the attribution lookup
//! client, the input classifier and the session controller that ties them
//! together.

mod about;
mod attribution;
pub mod classify;
mod client;
mod error;
pub mod http;
mod image;
mod session;

pub use about::{APP_NAME_ENV, AppInfo, DEFAULT_APP_NAME, LOADING_MESSAGE};
pub use attribution::{AttributionEntry, AttributionLookup, AttributionService};
pub use classify::{InputKind, classify};
pub use client::{
    env, Client, ClientBuilder, DEFAULT_ATTRIBUTION_URL, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{Error, Result};
pub use image::{
    DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE, GenerationRequest, ImageData, ImageGenerator,
    ImageService,
};
pub use session::{GenerationState, Overlay, Session, Submitted};
