//! Reliability module - how far a fact has been corroborated

/// Reliability classification of a fact
///
/// Variants are declared weakest first so the derived ordering reads
/// `Unverified < PossiblyTrue < LikelyTrue < Verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reliability {
    /// No corroboration at all
    Unverified,

    /// Plausible, weakly supported
    PossiblyTrue,

    /// Supported by more than one source
    LikelyTrue,

    /// Confirmed
    Verified,
}

impl Reliability {
    /// Get the reliability name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::Unverified => "unverified",
            Reliability::PossiblyTrue => "possibly-true",
            Reliability::LikelyTrue => "likely-true",
            Reliability::Verified => "verified",
        }
    }

    /// Parse a reliability from a string; `_` and `-` are interchangeable
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "unverified" => Some(Reliability::Unverified),
            "possibly-true" => Some(Reliability::PossiblyTrue),
            "likely-true" => Some(Reliability::LikelyTrue),
            "verified" => Some(Reliability::Verified),
            _ => None,
        }
    }
}

impl std::str::FromStr for Reliability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid reliability: {}", s))
    }
}

impl std::fmt::Display for Reliability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reliability_ordering() {
        assert!(Reliability::Unverified < Reliability::PossiblyTrue);
        assert!(Reliability::PossiblyTrue < Reliability::LikelyTrue);
        assert!(Reliability::LikelyTrue < Reliability::Verified);
    }

    #[test]
    fn test_reliability_parse() {
        assert_eq!(Reliability::parse("verified"), Some(Reliability::Verified));
        assert_eq!(Reliability::parse("Likely_True"), Some(Reliability::LikelyTrue));
        assert_eq!(Reliability::parse("possibly-true"), Some(Reliability::PossiblyTrue));
        assert_eq!(Reliability::parse("rumour"), None);
        assert!("rumour".parse::<Reliability>().is_err());
    }

    #[test]
    fn test_reliability_display_roundtrip() {
        for r in [
            Reliability::Unverified,
            Reliability::PossiblyTrue,
            Reliability::LikelyTrue,
            Reliability::Verified,
        ] {
            assert_eq!(Reliability::parse(&r.to_string()), Some(r));
        }
    }
}
