/// A topic pattern related error
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum TopicError {
    #[error("Invalid topic pattern: {pattern:?}")]
    InvalidPattern { pattern: String },

    #[error("Topic pattern already registered: {pattern:?}")]
    DuplicatePattern { pattern: String },

    #[error("Topic pattern {pattern:?} has {expected} placeholders but {actual} values were given")]
    PlaceholderMismatch {
        pattern: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot substitute {value:?} into topic pattern {pattern:?}")]
    InvalidValue { pattern: String, value: String },
}
