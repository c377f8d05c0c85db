use crate::Rating;

/// Avatar size in pixels.
pub type ImageSize = u32;

/// Smallest image size Gravatar serves.
pub const MIN_IMAGE_SIZE: ImageSize = 1;

/// Largest image size Gravatar serves.
pub const MAX_IMAGE_SIZE: ImageSize = 2048;

/// Largest image size of the earlier Gravatar API.
///
/// Select it with [`GravatarBuilder::set_max_image_size`] to keep URLs within
/// the old bounds.
///
/// [`GravatarBuilder::set_max_image_size`]: crate::GravatarBuilder::set_max_image_size
pub const LEGACY_MAX_IMAGE_SIZE: ImageSize = 512;

/// Image size used when none is given, matching Gravatar's own default.
pub const DEFAULT_IMAGE_SIZE: ImageSize = 80;

/// Options for avatar URLs and image tags.
///
/// # Example
///
/// ```rust
/// use tower_gravatar::{default_image, AvatarOptions, Rating};
///
/// let options = AvatarOptions::new()
///     .size(120)
///     .default_image(default_image::IDENTICON)
///     .rating(Rating::PG);
///
/// assert_eq!(options.size, 120);
/// assert!(!options.force_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarOptions {
    /// Requested size; clamped to the supported range when the URL is built.
    pub size: ImageSize,

    /// Fallback image: one of the [`default_image`](crate::default_image)
    /// names or the URL of an image. Blank values are ignored.
    pub default_image: Option<String>,

    /// Highest content rating to serve.
    pub rating: Option<Rating>,

    /// Append `.jpg` to the avatar path.
    pub add_extension: bool,

    /// Always serve the default image, even if an avatar exists.
    pub force_default: bool,

    /// Use https regardless of the connection.
    pub force_secure: bool,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_IMAGE_SIZE,
            default_image: None,
            rating: None,
            add_extension: false,
            force_default: false,
            force_secure: false,
        }
    }
}

impl AvatarOptions {
    /// Create [`AvatarOptions`] with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image size.
    pub fn size(self, size: ImageSize) -> Self {
        Self { size, ..self }
    }

    /// Set fallback image.
    pub fn default_image(self, default_image: impl Into<String>) -> Self {
        Self {
            default_image: Some(default_image.into()),
            ..self
        }
    }

    /// Set content rating.
    pub fn rating(self, rating: Rating) -> Self {
        Self {
            rating: Some(rating),
            ..self
        }
    }

    /// Configure the `.jpg` extension.
    pub fn add_extension(self, add_extension: bool) -> Self {
        Self {
            add_extension,
            ..self
        }
    }

    /// Configure forcing the default image.
    pub fn force_default(self, force_default: bool) -> Self {
        Self {
            force_default,
            ..self
        }
    }

    /// Configure forcing https.
    pub fn force_secure(self, force_secure: bool) -> Self {
        Self {
            force_secure,
            ..self
        }
    }
}

/// Options for profile URLs.
///
/// # Example
///
/// ```rust
/// use tower_gravatar::{profile_format, ProfileOptions};
///
/// let options = ProfileOptions::new()
///     .extension(profile_format::JSON)
///     .parameter("callback", "handleProfile");
///
/// assert_eq!(options.parameters.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOptions {
    /// Format extension, such as those in
    /// [`profile_format`](crate::profile_format). Blank values are ignored.
    pub extension: Option<String>,

    /// Query parameters, rendered in insertion order.
    pub parameters: Vec<(String, String)>,

    /// Use https regardless of the connection.
    pub force_secure: bool,
}

impl ProfileOptions {
    /// Create empty [`ProfileOptions`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set format extension.
    pub fn extension(self, extension: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
            ..self
        }
    }

    /// Append a query parameter.
    pub fn parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.push((key.into(), value.to_string()));
        self
    }

    /// Configure forcing https.
    pub fn force_secure(self, force_secure: bool) -> Self {
        Self {
            force_secure,
            ..self
        }
    }
}

/// Query string of an avatar URL, without the leading `?`.
#[derive(Debug)]
pub(crate) struct AvatarQuery<'a> {
    pub size: ImageSize,
    pub default_image: Option<&'a str>,
    pub rating: Option<Rating>,
    pub force_default: bool,
}

impl std::fmt::Display for AvatarQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s={}", self.size)?;

        if let Some(default_image) = self.default_image.filter(|d| !d.trim().is_empty()) {
            write!(f, "&d={}", urlencoding::encode(default_image))?;
        }

        if let Some(rating) = self.rating {
            write!(f, "&r={}", rating)?;
        }

        if self.force_default {
            f.write_str("&f=y")?;
        }

        Ok(())
    }
}

/// Query string of a profile URL, without the leading `?`.
#[derive(Debug)]
pub(crate) struct ProfileQuery<'a>(pub &'a [(String, String)]);

impl std::fmt::Display for ProfileQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut params_iter = self.0.iter();

        if let Some((key, value)) = params_iter.next() {
            write!(
                f,
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
            for (key, value) in params_iter {
                write!(
                    f,
                    "&{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )?;
            }
        }

        Ok(())
    }
}
