#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod time;

pub use error::ParseError;
pub use time::Clock;
