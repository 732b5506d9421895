use serde::{Deserialize, Serialize};

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Categorical level of a question.
///
/// The bucket index (`Easy = 0`, `Medium = 1`, `Hard = 2`) is the value plotted
/// on the difficulty trajectory and the slot used by per-bucket series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All buckets in index order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parses the exact label written by the session client.
    ///
    /// Returns `None` for anything else; callers treat that as "unknown".
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Easy" => Some(Self::Easy),
            "Medium" => Some(Self::Medium),
            "Hard" => Some(Self::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}
