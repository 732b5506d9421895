mod answer;
mod difficulty;
mod lenient;
mod session;
mod variant;

pub use answer::AnsweredQuestion;
pub use difficulty::Difficulty;
pub use session::SessionRecord;
pub use variant::Variant;
