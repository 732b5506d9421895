//! Cross-session interaction timeline.
//!
//! Concatenates the per-question events of every session of one arm into a
//! single sequence. The result is a synthetic "super-session" used for trend
//! plots; it says nothing about sessions being concurrent or related.

use pal_core::model::{AnsweredQuestion, Difficulty, SessionRecord, Variant};

/// Parallel difficulty and correctness series, one slot per answered question.
///
/// Order is session order (as read from the store) then answer order within
/// each session. Events with an unknown difficulty keep their slot as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionTimeline {
    pub chosen_difficulty: Vec<Option<Difficulty>>,
    pub correctness: Vec<bool>,
    /// Sessions of the target arm that logged a per-question list.
    pub sessions: usize,
}

impl InteractionTimeline {
    /// Flattens the `answeredQuestions` of every `target` record.
    ///
    /// Records of other arms and records without per-question detail are
    /// skipped.
    #[must_use]
    pub fn build<'a, I>(records: I, target: &Variant) -> Self
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut timeline = Self::default();
        for record in records.into_iter().filter(|r| &r.variant == target) {
            let Some(answered) = record.answered_questions.as_deref() else {
                continue;
            };
            timeline.sessions += 1;
            for event in answered {
                timeline.push(*event);
            }
        }
        timeline
    }

    /// Timeline of a single uninterrupted run of events.
    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = AnsweredQuestion>) -> Self {
        let mut timeline = Self::default();
        for event in events {
            timeline.push(event);
        }
        timeline.sessions = usize::from(!timeline.is_empty());
        timeline
    }

    pub fn push(&mut self, event: AnsweredQuestion) {
        self.chosen_difficulty.push(event.difficulty);
        self.correctness.push(event.correct);
    }

    /// Keeps only the first `limit` interactions.
    pub fn truncate(&mut self, limit: usize) {
        self.chosen_difficulty.truncate(limit);
        self.correctness.truncate(limit);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen_difficulty.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen_difficulty.is_empty()
    }

    pub fn events(&self) -> impl Iterator<Item = AnsweredQuestion> + '_ {
        self.chosen_difficulty
            .iter()
            .zip(&self.correctness)
            .map(|(&difficulty, &correct)| AnsweredQuestion::new(difficulty, correct))
    }

    /// Bucket indices (`Easy = 0`, `Medium = 1`, `Hard = 2`), `None` for unknown.
    #[must_use]
    pub fn bucket_indices(&self) -> Vec<Option<usize>> {
        self.chosen_difficulty
            .iter()
            .map(|d| d.map(Difficulty::index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pal_core::model::Difficulty::{Easy, Hard, Medium};

    fn q(difficulty: Option<Difficulty>, correct: bool) -> AnsweredQuestion {
        AnsweredQuestion::new(difficulty, correct)
    }

    fn session(variant: Variant, events: Vec<AnsweredQuestion>) -> SessionRecord {
        SessionRecord::new(variant).with_answered_questions(events)
    }

    #[test]
    fn concatenates_sessions_in_read_order() {
        let records = vec![
            session(Variant::Enhanced, vec![q(Some(Easy), true), q(Some(Medium), false)]),
            session(Variant::Baseline, vec![q(Some(Hard), true)]),
            session(Variant::Enhanced, vec![q(Some(Hard), true)]),
        ];

        let timeline = InteractionTimeline::build(&records, &Variant::Enhanced);

        assert_eq!(timeline.chosen_difficulty, vec![Some(Easy), Some(Medium), Some(Hard)]);
        assert_eq!(timeline.correctness, vec![true, false, true]);
        assert_eq!(timeline.sessions, 2);
    }

    #[test]
    fn unknown_difficulty_keeps_its_slot() {
        let records = vec![session(
            Variant::Enhanced,
            vec![q(Some(Easy), true), q(None, true), q(Some(Hard), false)],
        )];

        let timeline = InteractionTimeline::build(&records, &Variant::Enhanced);

        assert_eq!(timeline.bucket_indices(), vec![Some(0), None, Some(2)]);
        assert_eq!(timeline.correctness, vec![true, true, false]);
    }

    #[test]
    fn sessions_without_detail_contribute_nothing() {
        let records = vec![
            SessionRecord::new(Variant::Enhanced),
            session(Variant::Enhanced, vec![]),
        ];

        let timeline = InteractionTimeline::build(&records, &Variant::Enhanced);

        assert!(timeline.is_empty());
        assert_eq!(timeline.sessions, 1);
    }

    #[test]
    fn truncate_keeps_series_parallel() {
        let mut timeline = InteractionTimeline::from_events([
            q(Some(Easy), true),
            q(Some(Medium), true),
            q(Some(Hard), false),
        ]);

        timeline.truncate(2);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.correctness.len(), 2);
        assert_eq!(timeline.events().last(), Some(q(Some(Medium), true)));
    }
}
