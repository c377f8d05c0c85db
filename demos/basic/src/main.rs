use std::net::SocketAddr;

use axum::{
    extract::Query,
    response::{Html, Json},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_gravatar::{
    default_image, profile_format, AvatarOptions, GravatarBuilder, GravatarLayer, HtmlAttributes,
    ImageSize, ProfileOptions, Rating, RequestGravatar,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Deserialize)]
struct Params {
    email: Option<String>,
    // Signed and wide so out-of-range sizes reach the clamping instead of a 400.
    size: Option<i64>,
}

fn image_size(size: Option<i64>, default: ImageSize) -> ImageSize {
    size.map_or(default, |size| {
        ImageSize::try_from(size.max(0)).unwrap_or(ImageSize::MAX)
    })
}

async fn index(
    Extension(gravatar): Extension<RequestGravatar>,
    Query(params): Query<Params>,
) -> Html<String> {
    let email = params.email.unwrap_or_default();
    let options = AvatarOptions::new()
        .size(image_size(params.size, 120))
        .default_image(default_image::IDENTICON)
        .rating(Rating::PG);
    let attributes = HtmlAttributes::from_iter([("alt", "Avatar"), ("class", "avatar")]);

    let tag = gravatar.image_tag(&email, &options, &attributes);
    let profile = gravatar.profile_url(&email, &ProfileOptions::new());

    Html(format!(
        r#"<!doctype html><html><body>{tag}<p><a href="{profile}">Profile</a></p></body></html>"#
    ))
}

async fn urls(
    Extension(gravatar): Extension<RequestGravatar>,
    Query(params): Query<Params>,
) -> Json<Vec<String>> {
    let email = params.email.unwrap_or_default();
    let avatar = AvatarOptions::new().size(image_size(params.size, 80));

    Json(vec![
        gravatar.avatar_url(&email, &avatar),
        gravatar.avatar_url(&email, &avatar.clone().add_extension(true)),
        gravatar.profile_url(&email, &ProfileOptions::new().extension(profile_format::JSON)),
        gravatar.profile_url(&email, &ProfileOptions::new().extension(profile_format::VCF)),
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
            |_| "demo_basic=debug,tower_gravatar=trace".into(),
        )))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    let gravatar = GravatarBuilder::new().set_max_image_size(512).build();

    let app = Router::new()
        .route("/", get(index))
        .route("/urls", get(urls))
        .layer(ServiceBuilder::new().layer(GravatarLayer::new(gravatar)));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!(%addr, "Open http://{addr}/?email=you@example.com to view an avatar");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use tower_gravatar::{Gravatar, MAX_IMAGE_SIZE, MIN_IMAGE_SIZE};

    use super::*;

    #[test]
    fn out_of_range_sizes_are_clamped() {
        let gravatar = Gravatar::new();
        let clamped = |size| gravatar.clamp_image_size(image_size(Some(size), 80));

        assert_eq!(clamped(-5), MIN_IMAGE_SIZE);
        assert_eq!(clamped(99_999_999_999), MAX_IMAGE_SIZE);
        assert_eq!(clamped(200), 200);
        assert_eq!(image_size(None, 80), 80);
    }
}
