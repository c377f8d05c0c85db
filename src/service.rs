use std::{
    sync::Arc,
    task::{Context, Poll},
};

use http::Request;
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    connection::SecureConnection,
    gravatar::Gravatar,
    image_tag::HtmlAttributes,
    options::{AvatarOptions, ProfileOptions},
};

/// [`Gravatar`] bound to the security of a single request.
///
/// Inserted into request extensions by [`GravatarService`], so handlers can
/// build URLs matching the request's protocol without inspecting it
/// themselves.
#[derive(Debug, Clone)]
pub struct RequestGravatar {
    gravatar: Arc<Gravatar>,
    secure: bool,
}

impl RequestGravatar {
    /// Create a [`RequestGravatar`] from a [`Gravatar`] and a connection.
    pub fn new(gravatar: Arc<Gravatar>, connection: &impl SecureConnection) -> Self {
        Self {
            gravatar,
            secure: connection.is_secure(),
        }
    }

    /// Returns the avatar URL for `email`.
    ///
    /// See [`Gravatar::avatar_url`].
    pub fn avatar_url(&self, email: &str, options: &AvatarOptions) -> String {
        self.gravatar.avatar_url(email, options, &self.secure)
    }

    /// Returns the profile URL for `email`.
    ///
    /// See [`Gravatar::profile_url`].
    pub fn profile_url(&self, email: &str, options: &ProfileOptions) -> String {
        self.gravatar.profile_url(email, options, &self.secure)
    }

    /// Returns an `<img>` tag displaying the avatar for `email`.
    ///
    /// See [`Gravatar::image_tag`].
    pub fn image_tag(
        &self,
        email: &str,
        options: &AvatarOptions,
        attributes: &HtmlAttributes,
    ) -> String {
        self.gravatar
            .image_tag(email, options, attributes, &self.secure)
    }
}

impl SecureConnection for RequestGravatar {
    fn is_secure(&self) -> bool {
        self.secure
    }
}

/// Layer that applies [`GravatarService`].
///
/// # Example
///
/// ```rust
/// use tower_gravatar::{Gravatar, GravatarLayer};
///
/// let layer = GravatarLayer::new(Gravatar::new()).trust_forwarded_headers(false);
/// ```
#[derive(Debug, Clone)]
pub struct GravatarLayer {
    gravatar: Arc<Gravatar>,
    trust_forwarded_headers: bool,
}

impl GravatarLayer {
    /// Create a new [`GravatarLayer`] with the provided [`Gravatar`].
    pub fn new(gravatar: Gravatar) -> Self {
        Self {
            gravatar: Arc::new(gravatar),
            trust_forwarded_headers: true,
        }
    }

    /// Configure whether `X-Forwarded-Proto` and `Forwarded` headers count
    /// towards a secure request.
    ///
    /// Enabled by default. Disable it when the service is not behind a proxy
    /// that sets these headers; only the request URI's scheme is then used.
    pub fn trust_forwarded_headers(self, trust_forwarded_headers: bool) -> Self {
        Self {
            trust_forwarded_headers,
            ..self
        }
    }
}

impl<S> Layer<S> for GravatarLayer {
    type Service = GravatarService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GravatarService {
            inner,
            gravatar: Arc::clone(&self.gravatar),
            trust_forwarded_headers: self.trust_forwarded_headers,
        }
    }
}

/// Middleware inserting a [`RequestGravatar`] into each request's extensions.
#[derive(Debug, Clone)]
pub struct GravatarService<S> {
    inner: S,
    gravatar: Arc<Gravatar>,
    trust_forwarded_headers: bool,
}

impl<S, ReqBody> Service<Request<ReqBody>> for GravatarService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let secure = if self.trust_forwarded_headers {
            req.is_secure()
        } else {
            req.uri().is_secure()
        };
        tracing::trace!(uri = %req.uri(), secure, "resolved request security");

        let request_gravatar = RequestGravatar::new(Arc::clone(&self.gravatar), &secure);
        req.extensions_mut().insert(request_gravatar);

        self.inner.call(req)
    }
}
