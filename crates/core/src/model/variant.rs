use std::fmt;

use serde::{Serialize, Serializer};

/// One arm of the A/B comparison.
///
/// Every distinct label becomes its own partition: labels other than
/// `baseline`/`enhanced` are kept verbatim in `Other`, and a missing or
/// non-string label lands in `Unknown`. The derived ordering puts the two
/// known arms first and `Unknown` last, which is the order reports list them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Baseline,
    Enhanced,
    Other(String),
    Unknown,
}

impl Variant {
    pub const UNKNOWN_LABEL: &'static str = "unknown";

    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("baseline") => Self::Baseline,
            Some("enhanced") => Self::Enhanced,
            Some(Self::UNKNOWN_LABEL) | None => Self::Unknown,
            Some(other) => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Enhanced => "enhanced",
            Variant::Other(label) => label,
            Variant::Unknown => Self::UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
