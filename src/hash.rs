use md5::{Digest, Md5};

/// Length of a non-empty [`GravatarHash`], in hexadecimal characters.
pub const HASH_LENGTH: usize = 32;

/// Hash identifying a Gravatar account.
///
/// This is the lowercase hexadecimal MD5 digest of a normalized email address,
/// always 32 characters long, or empty when no email address was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GravatarHash(String);

impl GravatarHash {
    /// Hashes the provided email address.
    ///
    /// The address is trimmed and lowercased before hashing, so surrounding
    /// whitespace and letter case never change the result. Blank input yields
    /// an empty hash.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tower_gravatar::GravatarHash;
    ///
    /// let hash = GravatarHash::from_email(" MyEmailAddress@example.com ");
    /// assert_eq!(hash.as_str(), "0bc83cb571cd1c50ba6f3e8a78ef1346");
    ///
    /// assert!(GravatarHash::from_email("   ").is_empty());
    /// ```
    pub fn from_email(email: &str) -> Self {
        let email = email.trim();
        if email.is_empty() {
            return Self::default();
        }

        // Per-character mapping, without the context-sensitive final sigma.
        let email: String = email.chars().flat_map(char::to_lowercase).collect();

        let mut hasher = Md5::new();
        hasher.update(email.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Returns the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when no email address was hashed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the hash, returning the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for GravatarHash {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for GravatarHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashes an email address for use with Gravatar.
///
/// Shorthand for [`GravatarHash::from_email`].
pub fn hash(email: &str) -> GravatarHash {
    GravatarHash::from_email(email)
}
