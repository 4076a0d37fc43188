//! Matching of concrete MQTT topics against a fixed set of topic patterns.
//!
//! A pattern is an MQTT topic filter: `/` separated segments where `+` stands
//! for exactly one segment and a trailing `#` stands for any number of
//! remaining segments. Matching a topic returns the pattern that accepted it
//! along with the values bound to its wildcard segments, left to right.
//!
//! ```
//! use topic_matcher::TopicMatcher;
//!
//! let mut matcher = TopicMatcher::new();
//! matcher.add("/sys/+/+/thing/event/property/post").unwrap();
//! matcher.add("/sys/+/+/thing/event/+/post").unwrap();
//!
//! let found = matcher.matches("/sys/PK/DN/thing/event/alarm/post").unwrap();
//! assert_eq!(found.pattern.as_str(), "/sys/+/+/thing/event/+/post");
//! assert_eq!(found.params, vec!["PK", "DN", "alarm"]);
//! ```

mod errors;
mod matcher;
mod pattern;

pub use errors::TopicError;
pub use matcher::MatchResult;
pub use matcher::TopicMatcher;
pub use pattern::Segment;
pub use pattern::TopicPattern;
pub use pattern::MULTI_LEVEL_WILDCARD;
pub use pattern::SINGLE_LEVEL_WILDCARD;
