//! Named fallback images which Gravatar serves when an email address has no
//! avatar registered.
//!
//! Any of these may be passed as [`AvatarOptions::default_image`], as may the
//! URL of an image of your own.
//!
//! [`AvatarOptions::default_image`]: crate::AvatarOptions::default_image

/// Do not serve an image; respond with HTTP 404 (File Not Found) instead.
pub const NOT_FOUND: &str = "404";

/// Mystery man: a cartoon-style silhouetted outline of a person. Does not vary
/// by email hash.
pub const MYSTERY_MAN: &str = "mm";

/// A geometric pattern based on the email hash.
pub const IDENTICON: &str = "identicon";

/// A generated "monster" with different colors, faces, etc.
pub const MONSTER_ID: &str = "monsterid";

/// Generated faces with differing features and backgrounds.
pub const WAVATAR: &str = "wavatar";

/// 8-bit arcade-style pixelated faces.
pub const RETRO: &str = "retro";

/// A transparent PNG image.
pub const BLANK: &str = "blank";

/// All of the named fallback images.
pub const ALL: &[&str] = &[
    NOT_FOUND,
    MYSTERY_MAN,
    IDENTICON,
    MONSTER_ID,
    WAVATAR,
    RETRO,
    BLANK,
];
