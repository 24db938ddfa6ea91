//! Flight Query Validation
//!
//! Checks inbound flight queries against the vocabularies observed while
//! training, before any of them reaches the feature projector.

mod error;
mod validator;
mod vocabulary;

pub use error::ValidationError;
pub use validator::{VocabularyValidator, MONTH_RANGE};
pub use vocabulary::AirlineVocabulary;
