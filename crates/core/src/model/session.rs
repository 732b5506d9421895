use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::model::lenient;
use crate::model::{AnsweredQuestion, Difficulty, Variant};

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// Line shape as written by the ingestion endpoint.
///
/// Every field is optional and decoded leniently; defaults follow the record
/// contract (zero for scalars, `None` for structure).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    #[serde(default, deserialize_with = "lenient::label")]
    variant: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    overall_accuracy: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    final_score: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    best_streak: u32,
    #[serde(default, deserialize_with = "lenient::number")]
    avg_response_time_ms: f64,
    #[serde(default, deserialize_with = "lenient::accuracy_map")]
    accuracy_by_difficulty: BTreeMap<Difficulty, f64>,
    #[serde(default, deserialize_with = "lenient::answered")]
    answered_questions: Option<Vec<AnsweredQuestion>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    questions: Option<u32>,
}

//
// ─── SESSION RECORD ────────────────────────────────────────────────────────────
//

/// One completed (or partially completed) learning session.
///
/// Values are passed through as logged: accuracies outside `[0, 1]` are not
/// clamped. `answered_questions` is `None` when the session did not log
/// per-question detail, which is distinct from logging an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub variant: Variant,
    pub overall_accuracy: f64,
    pub final_score: f64,
    pub best_streak: u32,
    pub avg_response_time_ms: f64,
    pub accuracy_by_difficulty: BTreeMap<Difficulty, f64>,
    pub answered_questions: Option<Vec<AnsweredQuestion>>,
    pub timestamp: Option<DateTime<Utc>>,
    pub questions: Option<u32>,
}

impl SessionRecord {
    /// Empty record for the given arm; every scalar starts at zero.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self::from_wire(variant, WireRecord::default())
    }

    /// Parses one line of the record log.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Blank` for whitespace-only lines,
    /// `ParseError::Json` if the line is not JSON, and
    /// `ParseError::NotAnObject` if it is JSON but not an object.
    pub fn parse_line(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Blank);
        }
        let value: Value = serde_json::from_str(line)?;
        Self::from_value(value)
    }

    /// Builds a record from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::NotAnObject` unless `value` is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let found = match &value {
            Value::Object(_) => None,
            Value::Null => Some("null"),
            Value::Bool(_) => Some("bool"),
            Value::Number(_) => Some("number"),
            Value::String(_) => Some("string"),
            Value::Array(_) => Some("array"),
        };
        if let Some(found) = found {
            return Err(ParseError::NotAnObject { found });
        }
        let wire: WireRecord = serde_json::from_value(value)?;
        let variant = Variant::from_label(wire.variant.as_deref());
        Ok(Self::from_wire(variant, wire))
    }

    fn from_wire(variant: Variant, wire: WireRecord) -> Self {
        Self {
            variant,
            overall_accuracy: wire.overall_accuracy,
            final_score: wire.final_score,
            best_streak: wire.best_streak,
            avg_response_time_ms: wire.avg_response_time_ms,
            accuracy_by_difficulty: wire.accuracy_by_difficulty,
            answered_questions: wire.answered_questions,
            timestamp: wire.timestamp,
            questions: wire.questions,
        }
    }

    #[must_use]
    pub fn with_overall_accuracy(mut self, accuracy: f64) -> Self {
        self.overall_accuracy = accuracy;
        self
    }

    #[must_use]
    pub fn with_answered_questions(mut self, answered: Vec<AnsweredQuestion>) -> Self {
        self.answered_questions = Some(answered);
        self
    }

    /// Per-question events, or an empty slice when none were logged.
    #[must_use]
    pub fn answered(&self) -> &[AnsweredQuestion] {
        self.answered_questions.as_deref().unwrap_or_default()
    }
}
