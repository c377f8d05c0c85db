//! # Overview
//!
//! This crate builds [Gravatar](https://gravatar.com) avatar URLs, profile
//! URLs and `<img>` tags from email addresses, choosing http or https to match
//! the incoming request. It never contacts Gravatar itself.
//!
//! The plain functions at the crate root target gravatar.com and take the
//! request's security as an explicit [`SecureConnection`]. For other domains
//! or size limits, configure a [`Gravatar`] through [`GravatarBuilder`].
//!
//! ```rust
//! use tower_gravatar::{default_image, AvatarOptions, Rating};
//!
//! let options = AvatarOptions::new()
//!     .size(200)
//!     .default_image(default_image::IDENTICON)
//!     .rating(Rating::PG);
//!
//! let url = tower_gravatar::avatar_url("MyEmailAddress@example.com", &options, &true);
//! assert_eq!(
//!     url,
//!     "https://secure.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?s=200&d=identicon&r=PG"
//! );
//! ```
//!
//! # Usage with an `axum` application
//!
//! [`GravatarLayer`] determines whether each request is secure and hands
//! handlers a [`RequestGravatar`] through the request extensions.
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//!
//! use axum::{response::Html, routing::get, Extension, Router};
//! use tower_gravatar::{AvatarOptions, Gravatar, GravatarLayer, HtmlAttributes, RequestGravatar};
//!
//! async fn index(Extension(gravatar): Extension<RequestGravatar>) -> Html<String> {
//!     let attributes = HtmlAttributes::from_iter([("alt", "Avatar")]);
//!     Html(gravatar.image_tag(
//!         "MyEmailAddress@example.com",
//!         &AvatarOptions::new(),
//!         &attributes,
//!     ))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Router::new()
//!         .route("/", get(index))
//!         .layer(GravatarLayer::new(Gravatar::new()));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
//!     let listener = tokio::net::TcpListener::bind(&addr).await?;
//!     axum::serve(listener, app.into_make_service()).await?;
//!
//!     Ok(())
//! }
//! ```
#![warn(
    clippy::all,
    nonstandard_style,
    future_incompatible,
    missing_docs,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

mod connection;
pub mod default_image;
mod gravatar;
mod hash;
mod image_tag;
mod options;
pub mod profile_format;
mod rating;
mod service;

pub use connection::SecureConnection;
pub use gravatar::{
    ConfigError, Gravatar, GravatarBuilder, AVATAR_PATH, GRAVATAR_DOMAIN, GRAVATAR_SECURE_DOMAIN,
    PROFILE_PATH,
};
pub use hash::{hash, GravatarHash, HASH_LENGTH};
pub use image_tag::HtmlAttributes;
pub use options::{
    AvatarOptions, ImageSize, ProfileOptions, DEFAULT_IMAGE_SIZE, LEGACY_MAX_IMAGE_SIZE,
    MAX_IMAGE_SIZE, MIN_IMAGE_SIZE,
};
pub use rating::{ParseRatingError, Rating};
pub use service::{GravatarLayer, GravatarService, RequestGravatar};

const GRAVATAR: Gravatar = Gravatar::new();

/// Returns the gravatar.com avatar URL for `email`.
///
/// See [`Gravatar::avatar_url`].
pub fn avatar_url<C>(email: &str, options: &AvatarOptions, connection: &C) -> String
where
    C: SecureConnection + ?Sized,
{
    GRAVATAR.avatar_url(email, options, connection)
}

/// Returns the gravatar.com profile URL for `email`.
///
/// See [`Gravatar::profile_url`].
pub fn profile_url<C>(email: &str, options: &ProfileOptions, connection: &C) -> String
where
    C: SecureConnection + ?Sized,
{
    GRAVATAR.profile_url(email, options, connection)
}

/// Returns an `<img>` tag displaying the gravatar.com avatar for `email`.
///
/// See [`Gravatar::image_tag`].
pub fn image_tag<C>(
    email: &str,
    options: &AvatarOptions,
    attributes: &HtmlAttributes,
    connection: &C,
) -> String
where
    C: SecureConnection + ?Sized,
{
    GRAVATAR.image_tag(email, options, attributes, connection)
}
