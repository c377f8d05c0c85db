//! Formats in which a Gravatar profile can be requested.
//!
//! Pass one of these as [`ProfileOptions::extension`]; without an extension
//! the profile URL points at the HTML profile page.
//!
//! [`ProfileOptions::extension`]: crate::ProfileOptions::extension

/// Profile data as JSON.
pub const JSON: &str = "json";

/// Profile data as XML.
pub const XML: &str = "xml";

/// Profile as a vCard.
pub const VCF: &str = "vcf";

/// QR code image linking to the profile.
pub const QR: &str = "qr";
