mod extract;

pub use extract::{AnswerExtractor, ExtractOptions, Extraction};
