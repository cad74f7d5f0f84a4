//! Message-processing pipeline: keyword matching, operator alerting,
//! response generation and composition.

pub mod alert;
pub mod compose;
pub mod generator;
pub mod keywords;
pub mod processor;
pub mod types;

pub use alert::AlertDispatcher;
pub use compose::compose_reply;
pub use generator::{GenerationResult, ResponseGenerator};
pub use keywords::KeywordMatcher;
pub use processor::MessagePipeline;
pub use types::Command;
