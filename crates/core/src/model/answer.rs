use serde_json::Value;

use crate::model::Difficulty;

/// One answered question within a session, in the order it was answered.
///
/// `difficulty` is `None` when the logged label is missing or not one of
/// `Easy`/`Medium`/`Hard`; the event still keeps its slot in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub difficulty: Option<Difficulty>,
    pub correct: bool,
}

impl AnsweredQuestion {
    #[must_use]
    pub fn new(difficulty: Option<Difficulty>, correct: bool) -> Self {
        Self {
            difficulty,
            correct,
        }
    }

    /// Decodes one element of `answeredQuestions`.
    ///
    /// Anything other than a JSON `true` under `correct` counts as incorrect.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let difficulty = value
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::from_label);
        let correct = value
            .get("correct")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Self::new(difficulty, correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_known_difficulty() {
        let q = AnsweredQuestion::from_value(&json!({"difficulty": "Hard", "correct": true}));
        assert_eq!(q, AnsweredQuestion::new(Some(Difficulty::Hard), true));
    }

    #[test]
    fn unknown_difficulty_and_missing_correct_are_tolerated() {
        let q = AnsweredQuestion::from_value(&json!({"difficulty": "Expert"}));
        assert_eq!(q, AnsweredQuestion::new(None, false));

        let q = AnsweredQuestion::from_value(&json!(null));
        assert_eq!(q, AnsweredQuestion::new(None, false));
    }
}
