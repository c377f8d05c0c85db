use std::str::FromStr;

/// Content rating filter for avatars.
///
/// Gravatar serves an avatar only when its rating is at or below the requested
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    /// Suitable for display on all websites with any audience type.
    G,
    /// May contain rude gestures, provocatively dressed individuals, lesser
    /// swear words, or mild violence.
    PG,
    /// May contain harsh profanity, intense violence, nudity, or hard drug use.
    R,
    /// May contain hardcore sexual imagery or extremely disturbing violence.
    X,
}

impl Rating {
    /// Code used for the `r` query parameter.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Rating::G => "G",
            Rating::PG => "PG",
            Rating::R => "R",
            Rating::X => "X",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Rating`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rating `{0}`, expected one of G, PG, R or X")]
pub struct ParseRatingError(String);

impl FromStr for Rating {
    type Err = ParseRatingError;

    /// Parses a rating code, ignoring letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" => Ok(Rating::G),
            "pg" => Ok(Rating::PG),
            "r" => Ok(Rating::R),
            "x" => Ok(Rating::X),
            _ => Err(ParseRatingError(s.to_owned())),
        }
    }
}
