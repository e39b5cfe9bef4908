//! Login identifier - a name or an email address, decided by syntax

use std::fmt;

use validator::ValidateEmail;

/// The field a login attempt is matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Name(String),
}

impl LoginIdentifier {
    /// Classify a raw identifier. Anything that passes the email syntax
    /// check is an email; everything else is treated as a name.
    pub fn classify(raw: &str) -> Self {
        let candidate = raw.trim().to_owned();
        if candidate.validate_email() {
            Self::Email(candidate)
        } else {
            Self::Name(candidate)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(value) | Self::Name(value) => value,
        }
    }

    #[inline]
    pub fn is_email(&self) -> bool {
        matches!(self, Self::Email(_))
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(_) => f.write_str("email"),
            Self::Name(_) => f.write_str("name"),
        }
    }
}
