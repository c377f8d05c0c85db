use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::instrument;
use url::Url;

use crate::{
    connection::SecureConnection,
    hash::GravatarHash,
    image_tag::{HtmlAttributes, ImageTag},
    options::{
        AvatarOptions, AvatarQuery, ImageSize, ProfileOptions, ProfileQuery, MAX_IMAGE_SIZE,
        MIN_IMAGE_SIZE,
    },
};

/// Gravatar domain used over plain http.
pub const GRAVATAR_DOMAIN: &str = "http://www.gravatar.com";

/// Gravatar domain used over https.
pub const GRAVATAR_SECURE_DOMAIN: &str = "https://secure.gravatar.com";

/// Path under which avatars are served.
pub const AVATAR_PATH: &str = "/avatar/";

/// Path under which profiles are served.
pub const PROFILE_PATH: &str = "/";

const AVATAR_EXTENSION: &str = "jpg";

// Profile extensions are a single path segment.
const EXTENSION: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Error raised when configuring a [`Gravatar`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The domain's scheme does not match the transport it is configured for.
    #[error("expected `{expected}` domain, got scheme `{found}`")]
    Scheme {
        /// Scheme required for this domain.
        expected: &'static str,
        /// Scheme of the supplied URL.
        found: String,
    },

    /// The domain has no host.
    #[error("domain `{0}` has no host")]
    MissingHost(String),

    /// The domain carries a path, query, or fragment.
    #[error("domain `{0}` must not have a path, query, or fragment")]
    NotAnOrigin(String),
}

/// Builder of Gravatar avatar and profile URLs.
///
/// [`Gravatar::new`] targets gravatar.com; use [`GravatarBuilder`] for other
/// domains or size limits.
///
/// # Example
///
/// ```rust
/// use tower_gravatar::{AvatarOptions, Gravatar, ProfileOptions};
///
/// let gravatar = Gravatar::new();
///
/// let url = gravatar.avatar_url("MyEmailAddress@example.com", &AvatarOptions::new(), &false);
/// assert_eq!(
///     url,
///     "http://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?s=80"
/// );
///
/// let url = gravatar.profile_url("MyEmailAddress@example.com", &ProfileOptions::new(), &true);
/// assert_eq!(
///     url,
///     "https://secure.gravatar.com/0bc83cb571cd1c50ba6f3e8a78ef1346"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gravatar {
    domain: Cow<'static, str>,
    secure_domain: Cow<'static, str>,
    max_image_size: ImageSize,
}

impl Gravatar {
    /// Create a [`Gravatar`] for gravatar.com.
    pub const fn new() -> Self {
        Self {
            domain: Cow::Borrowed(GRAVATAR_DOMAIN),
            secure_domain: Cow::Borrowed(GRAVATAR_SECURE_DOMAIN),
            max_image_size: MAX_IMAGE_SIZE,
        }
    }

    /// Returns the largest image size URLs will request.
    pub const fn max_image_size(&self) -> ImageSize {
        self.max_image_size
    }

    /// Clamps `size` to the supported range.
    pub fn clamp_image_size(&self, size: ImageSize) -> ImageSize {
        let clamped = size.clamp(MIN_IMAGE_SIZE, self.max_image_size);
        if clamped != size {
            tracing::debug!(requested = size, clamped, "image size out of range");
        }
        clamped
    }

    /// Returns the avatar URL for `email`.
    ///
    /// The query always starts with the clamped size `s`, followed, when set,
    /// by the default image `d`, the rating `r` and the force-default flag
    /// `f`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tower_gravatar::{default_image, AvatarOptions, Gravatar, Rating};
    ///
    /// let options = AvatarOptions::new()
    ///     .size(4096)
    ///     .default_image(default_image::RETRO)
    ///     .rating(Rating::G)
    ///     .add_extension(true);
    ///
    /// let url = Gravatar::new().avatar_url("jsmith@example.org", &options, &true);
    /// assert_eq!(
    ///     url,
    ///     "https://secure.gravatar.com/avatar/5cc22172821c12cd0c014ed7af99ae6f.jpg?s=2048&d=retro&r=G"
    /// );
    /// ```
    #[instrument(level = "trace", skip_all, fields(size = options.size), ret)]
    pub fn avatar_url<C>(&self, email: &str, options: &AvatarOptions, connection: &C) -> String
    where
        C: SecureConnection + ?Sized,
    {
        let secure = options.force_secure || connection.is_secure();
        let extension = options.add_extension.then_some(AVATAR_EXTENSION);
        let base = self.base_url(email, AVATAR_PATH, extension, secure);

        let query = AvatarQuery {
            size: self.clamp_image_size(options.size),
            default_image: options.default_image.as_deref(),
            rating: options.rating,
            force_default: options.force_default,
        };

        format!("{base}?{query}")
    }

    /// Returns the profile URL for `email`.
    ///
    /// Only the caller's parameters make up the query; without any, the URL
    /// has no query at all.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tower_gravatar::{profile_format, Gravatar, ProfileOptions};
    ///
    /// let options = ProfileOptions::new()
    ///     .extension(profile_format::JSON)
    ///     .parameter("callback", "alert");
    ///
    /// let url = Gravatar::new().profile_url("jsmith@example.org", &options, &false);
    /// assert_eq!(
    ///     url,
    ///     "http://www.gravatar.com/5cc22172821c12cd0c014ed7af99ae6f.json?callback=alert"
    /// );
    /// ```
    #[instrument(level = "trace", skip_all, ret)]
    pub fn profile_url<C>(&self, email: &str, options: &ProfileOptions, connection: &C) -> String
    where
        C: SecureConnection + ?Sized,
    {
        let secure = options.force_secure || connection.is_secure();
        let mut url = self.base_url(email, PROFILE_PATH, options.extension.as_deref(), secure);

        if !options.parameters.is_empty() {
            url.push('?');
            url.push_str(&ProfileQuery(&options.parameters).to_string());
        }

        url
    }

    /// Returns an `<img>` tag displaying the avatar for `email`.
    ///
    /// The `src` attribute is always [`Gravatar::avatar_url`] for the same
    /// arguments; a `src` among `attributes` is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tower_gravatar::{AvatarOptions, Gravatar, HtmlAttributes};
    ///
    /// let attributes = HtmlAttributes::from_iter([("alt", "Avatar"), ("src", "ignored.png")]);
    /// let tag = Gravatar::new().image_tag(
    ///     "jsmith@example.org",
    ///     &AvatarOptions::new().size(40),
    ///     &attributes,
    ///     &false,
    /// );
    /// assert_eq!(
    ///     tag,
    ///     r#"<img src="http://www.gravatar.com/avatar/5cc22172821c12cd0c014ed7af99ae6f?s=40" alt="Avatar" />"#
    /// );
    /// ```
    pub fn image_tag<C>(
        &self,
        email: &str,
        options: &AvatarOptions,
        attributes: &HtmlAttributes,
        connection: &C,
    ) -> String
    where
        C: SecureConnection + ?Sized,
    {
        ImageTag::new(self.avatar_url(email, options, connection), attributes).to_string()
    }

    fn base_url(&self, email: &str, path: &str, extension: Option<&str>, secure: bool) -> String {
        let domain = if secure {
            &self.secure_domain
        } else {
            &self.domain
        };
        let hash = GravatarHash::from_email(email);

        match extension.map(str::trim).filter(|ext| !ext.is_empty()) {
            Some(ext) => format!(
                "{domain}{path}{hash}.{}",
                utf8_percent_encode(ext, EXTENSION)
            ),
            None => format!("{domain}{path}{hash}"),
        }
    }
}

impl Default for Gravatar {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Gravatar`].
///
/// # Example
///
/// ```rust
/// use tower_gravatar::{AvatarOptions, GravatarBuilder, LEGACY_MAX_IMAGE_SIZE};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let gravatar = GravatarBuilder::new()
///     .set_secure_domain("https://gravatar.example.com".parse()?)?
///     .set_max_image_size(LEGACY_MAX_IMAGE_SIZE)
///     .build();
///
/// let url = gravatar.avatar_url("", &AvatarOptions::new().size(600), &true);
/// assert_eq!(url, "https://gravatar.example.com/avatar/?s=512");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GravatarBuilder {
    gravatar: Gravatar,
}

impl GravatarBuilder {
    /// Create a new [`GravatarBuilder`] starting from gravatar.com.
    pub const fn new() -> Self {
        Self {
            gravatar: Gravatar::new(),
        }
    }

    /// Configure the domain used over plain http.
    ///
    /// The URL must use the `http` scheme and consist of an origin only.
    pub fn set_domain(self, domain: Url) -> Result<Self, ConfigError> {
        let domain = origin(&domain, "http")?;
        Ok(Self {
            gravatar: Gravatar {
                domain: Cow::Owned(domain),
                ..self.gravatar
            },
        })
    }

    /// Configure the domain used over https.
    ///
    /// The URL must use the `https` scheme and consist of an origin only.
    pub fn set_secure_domain(self, secure_domain: Url) -> Result<Self, ConfigError> {
        let secure_domain = origin(&secure_domain, "https")?;
        Ok(Self {
            gravatar: Gravatar {
                secure_domain: Cow::Owned(secure_domain),
                ..self.gravatar
            },
        })
    }

    /// Configure the largest image size URLs will request.
    ///
    /// Values below [`MIN_IMAGE_SIZE`] are raised to it.
    pub fn set_max_image_size(self, max_image_size: ImageSize) -> Self {
        Self {
            gravatar: Gravatar {
                max_image_size: max_image_size.max(MIN_IMAGE_SIZE),
                ..self.gravatar
            },
        }
    }

    /// Build the [`Gravatar`].
    pub fn build(self) -> Gravatar {
        self.gravatar
    }
}

impl Default for GravatarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn origin(url: &Url, expected: &'static str) -> Result<String, ConfigError> {
    if url.scheme() != expected {
        return Err(ConfigError::Scheme {
            expected,
            found: url.scheme().to_owned(),
        });
    }

    if !url.has_host() {
        return Err(ConfigError::MissingHost(url.to_string()));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::NotAnOrigin(url.to_string()));
    }

    Ok(url.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_image, profile_format, Rating, LEGACY_MAX_IMAGE_SIZE};

    const EMAIL: &str = "MyEmailAddress@example.com";
    const HASH: &str = "0bc83cb571cd1c50ba6f3e8a78ef1346";

    fn avatar(options: &AvatarOptions) -> Url {
        Gravatar::new()
            .avatar_url(EMAIL, options, &false)
            .parse()
            .unwrap()
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn size_is_clamped() {
        let cases = [
            (MIN_IMAGE_SIZE - 1, MIN_IMAGE_SIZE),
            (MIN_IMAGE_SIZE, MIN_IMAGE_SIZE),
            (1024, 1024),
            (MAX_IMAGE_SIZE, MAX_IMAGE_SIZE),
            (MAX_IMAGE_SIZE + 1, MAX_IMAGE_SIZE),
        ];
        for (size, expected) in cases {
            let url = avatar(&AvatarOptions::new().size(size));
            assert_eq!(query_value(&url, "s"), Some(expected.to_string()));
        }
    }

    #[test]
    fn legacy_max_size() {
        let gravatar = GravatarBuilder::new()
            .set_max_image_size(LEGACY_MAX_IMAGE_SIZE)
            .build();
        assert_eq!(gravatar.clamp_image_size(513), 512);
        assert_eq!(gravatar.clamp_image_size(200), 200);
        assert_eq!(
            GravatarBuilder::new().set_max_image_size(0).build().max_image_size(),
            MIN_IMAGE_SIZE
        );
    }

    #[test]
    fn protocol_follows_connection() {
        let gravatar = Gravatar::new();
        let options = AvatarOptions::new();

        let url: Url = gravatar.avatar_url(EMAIL, &options, &true).parse().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("secure.gravatar.com"));

        let url: Url = gravatar.avatar_url(EMAIL, &options, &false).parse().unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("www.gravatar.com"));

        let url: Url = gravatar
            .avatar_url(EMAIL, &options.force_secure(true), &false)
            .parse()
            .unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn extension_toggle() {
        let url = avatar(&AvatarOptions::new().add_extension(true));
        assert_eq!(url.path(), format!("/avatar/{HASH}.jpg"));

        let url = avatar(&AvatarOptions::new());
        assert_eq!(url.path(), format!("/avatar/{HASH}"));
    }

    #[test]
    fn rating_code() {
        for (rating, code) in [
            (Rating::G, "G"),
            (Rating::PG, "PG"),
            (Rating::R, "R"),
            (Rating::X, "X"),
        ] {
            let url = avatar(&AvatarOptions::new().rating(rating));
            assert_eq!(query_value(&url, "r").as_deref(), Some(code));
        }
        assert_eq!(query_value(&avatar(&AvatarOptions::new()), "r"), None);
    }

    #[test]
    fn force_default() {
        let url = avatar(&AvatarOptions::new().force_default(true));
        assert_eq!(query_value(&url, "f").as_deref(), Some("y"));
        assert_eq!(query_value(&avatar(&AvatarOptions::new()), "f"), None);
    }

    #[test]
    fn default_image_round_trips() {
        let fallback = "http://example.com/logo.jpg?x=1&y=2";
        let url = avatar(&AvatarOptions::new().default_image(fallback));
        assert_eq!(query_value(&url, "d").as_deref(), Some(fallback));
        assert_eq!(url.query_pairs().count(), 2);

        let url = avatar(&AvatarOptions::new().default_image(" "));
        assert_eq!(query_value(&url, "d"), None);
    }

    #[test]
    fn full_avatar_url() {
        let options = AvatarOptions::new()
            .size(100)
            .default_image(default_image::MYSTERY_MAN)
            .rating(Rating::PG)
            .force_default(true);
        assert_eq!(
            Gravatar::new().avatar_url(EMAIL, &options, &false),
            format!("http://www.gravatar.com/avatar/{HASH}?s=100&d=mm&r=PG&f=y")
        );
    }

    #[test]
    fn blank_email() {
        let url = Gravatar::new().avatar_url("  ", &AvatarOptions::new(), &false);
        assert_eq!(url, "http://www.gravatar.com/avatar/?s=80");
        assert!(url.parse::<Url>().is_ok());

        let url = Gravatar::new().profile_url("", &ProfileOptions::new(), &false);
        assert_eq!(url, "http://www.gravatar.com/");
    }

    #[test]
    fn urls_are_well_formed() {
        let gravatar = Gravatar::new();
        for secure in [false, true] {
            for fallback in [None, Some(default_image::IDENTICON), Some("http://example.com/a b.png")] {
                for add_extension in [false, true] {
                    let mut options = AvatarOptions::new()
                        .add_extension(add_extension)
                        .force_default(secure)
                        .rating(Rating::X);
                    options.default_image = fallback.map(str::to_owned);
                    let url: Url = gravatar.avatar_url(EMAIL, &options, &secure).parse().unwrap();
                    assert!(url.has_host());
                    assert!(url.path().starts_with(AVATAR_PATH));
                }
            }

            for extension in [None, Some(profile_format::QR), Some("weird ext/")] {
                let mut options = ProfileOptions::new().parameter("a b", "c&d=e");
                options.extension = extension.map(str::to_owned);
                let url: Url = gravatar.profile_url(EMAIL, &options, &secure).parse().unwrap();
                assert!(url.has_host());
                assert_eq!(url.path_segments().map(Iterator::count), Some(1));
                assert_eq!(query_value(&url, "a b").as_deref(), Some("c&d=e"));
            }
        }
    }

    #[test]
    fn profile_formats() {
        let gravatar = Gravatar::new();
        for format in [
            profile_format::JSON,
            profile_format::XML,
            profile_format::VCF,
            profile_format::QR,
        ] {
            let url = gravatar.profile_url(EMAIL, &ProfileOptions::new().extension(format), &false);
            assert_eq!(url, format!("http://www.gravatar.com/{HASH}.{format}"));
        }

        let url = gravatar.profile_url(EMAIL, &ProfileOptions::new().extension("  "), &false);
        assert_eq!(url, format!("http://www.gravatar.com/{HASH}"));
    }

    #[test]
    fn profile_parameters_keep_order() {
        let options = ProfileOptions::new()
            .parameter("Callback", "javascriptCallback")
            .parameter("Size", 80);
        let url = Gravatar::new().profile_url(EMAIL, &options, &true);
        assert_eq!(
            url,
            format!("https://secure.gravatar.com/{HASH}?Callback=javascriptCallback&Size=80")
        );
    }

    #[test]
    fn builder_validates_domains() {
        let err = GravatarBuilder::new()
            .set_domain("https://www.gravatar.com".parse().unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Scheme {
                expected: "http",
                found: "https".into()
            }
        );

        let err = GravatarBuilder::new()
            .set_secure_domain("https://secure.gravatar.com/avatar".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAnOrigin(_)));

        let gravatar = GravatarBuilder::new()
            .set_domain("http://localhost:8080/".parse().unwrap())
            .unwrap()
            .build();
        assert_eq!(
            gravatar.profile_url("", &ProfileOptions::new(), &false),
            "http://localhost:8080/"
        );
    }
}
