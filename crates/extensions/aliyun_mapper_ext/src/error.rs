use topic_matcher::TopicError;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("The raw topic and the raw payload must not be empty")]
    EmptyInput,

    #[error("The product key and the device name must not be empty")]
    MissingIdentity,

    #[error("No registered topic pattern matches {topic:?}")]
    InvalidTopic { topic: String },

    #[error("The topic pattern {pattern:?} expects {expected} parameters, got {actual}")]
    MalformedParams {
        pattern: String,
        expected: usize,
        actual: usize,
    },

    #[error("No translation rule is registered for the topic pattern {pattern:?}")]
    UnsupportedPattern { pattern: String },

    #[error("Invalid username: {username:?}, expected `<device_name>&<product_key>`")]
    InvalidUsername { username: String },

    #[error(transparent)]
    FromTopic(#[from] TopicError),

    #[error(transparent)]
    FromSerdeJson(#[from] serde_json::Error),
}

impl ConversionError {
    /// A stable name for the class of error, reported to the callers
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::EmptyInput => "EmptyInput",
            ConversionError::MissingIdentity => "MissingIdentity",
            ConversionError::InvalidTopic { .. } => "InvalidTopic",
            ConversionError::MalformedParams { .. } | ConversionError::FromTopic(_) => {
                "MalformedParams"
            }
            ConversionError::UnsupportedPattern { .. } => "UnsupportedPattern",
            ConversionError::InvalidUsername { .. } => "InvalidUsername",
            ConversionError::FromSerdeJson(_) => "Serialization",
        }
    }
}
