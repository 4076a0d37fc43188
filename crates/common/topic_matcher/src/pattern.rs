use crate::errors::TopicError;
use std::fmt;
use std::str::FromStr;

pub const SINGLE_LEVEL_WILDCARD: &str = "+";
pub const MULTI_LEVEL_WILDCARD: &str = "#";

/// One `/` separated level of a topic pattern
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Segment {
    Literal(String),
    /// `+`, matches exactly one level
    SingleLevel,
    /// `#`, matches all the remaining levels (possibly none)
    MultiLevel,
}

impl Segment {
    fn parse(segment: &str) -> Segment {
        match segment {
            SINGLE_LEVEL_WILDCARD => Segment::SingleLevel,
            MULTI_LEVEL_WILDCARD => Segment::MultiLevel,
            literal => Segment::Literal(literal.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

/// An MQTT topic pattern, identified by its original string
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TopicPattern {
    pattern: String,
    segments: Vec<Segment>,
}

impl TopicPattern {
    /// Check if the pattern is a valid MQTT topic filter and build a new topic pattern.
    pub fn new(pattern: &str) -> Result<TopicPattern, TopicError> {
        if rumqttc::valid_filter(pattern) {
            Ok(TopicPattern::new_unchecked(pattern))
        } else {
            Err(TopicError::InvalidPattern {
                pattern: pattern.to_string(),
            })
        }
    }

    /// Build a new topic pattern, assuming the pattern is valid
    pub fn new_unchecked(pattern: &str) -> TopicPattern {
        let segments = pattern.split('/').map(Segment::parse).collect();
        TopicPattern {
            pattern: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The number of values captured when a topic matches this pattern,
    /// which is also the number of values expected by [TopicPattern::fill].
    pub fn wildcard_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_wildcard()).count()
    }

    fn ends_with_multi_level(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::MultiLevel))
    }

    /// Match a concrete topic against this pattern.
    ///
    /// Returns the values bound to the wildcard segments, in order,
    /// or `None` if the topic is not accepted by this pattern.
    pub fn capture(&self, topic: &str) -> Option<Vec<String>> {
        let levels: Vec<&str> = topic.split('/').collect();
        self.capture_levels(&levels)
    }

    pub(crate) fn capture_levels(&self, levels: &[&str]) -> Option<Vec<String>> {
        if self.ends_with_multi_level() {
            if levels.len() + 1 < self.segments.len() {
                return None;
            }
        } else if levels.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::with_capacity(self.wildcard_count());
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    if levels[i] != literal {
                        return None;
                    }
                }
                Segment::SingleLevel => params.push(levels[i].to_string()),
                Segment::MultiLevel => {
                    params.push(levels[i..].join("/"));
                    break;
                }
            }
        }

        Some(params)
    }

    /// Build a concrete topic by substituting the wildcard segments with the given values,
    /// left to right.
    ///
    /// The number of values must be exactly the number of wildcard segments,
    /// so the resulting topic never contains a leftover wildcard.
    ///
    /// ```
    /// use topic_matcher::TopicPattern;
    ///
    /// let pattern = TopicPattern::new("fogcloud/+/+/thing/up/event/+/post").unwrap();
    /// assert_eq!(
    ///     pattern.fill(&["PK", "DN", "alarm"]).unwrap(),
    ///     "fogcloud/PK/DN/thing/up/event/alarm/post"
    /// );
    /// assert!(pattern.fill(&["PK", "DN"]).is_err());
    /// ```
    pub fn fill(&self, values: &[&str]) -> Result<String, TopicError> {
        let expected = self.wildcard_count();
        if values.len() != expected {
            return Err(TopicError::PlaceholderMismatch {
                pattern: self.pattern.clone(),
                expected,
                actual: values.len(),
            });
        }

        let mut values = values.iter();
        let mut levels = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let level = match segment {
                Segment::Literal(literal) => literal.as_str(),
                wildcard => {
                    let value = values.next().copied().unwrap_or_default();
                    let accepted = match wildcard {
                        Segment::MultiLevel => rumqttc::valid_topic(value),
                        _ => is_valid_level(value),
                    };
                    if !accepted {
                        return Err(TopicError::InvalidValue {
                            pattern: self.pattern.clone(),
                            value: value.to_string(),
                        });
                    }
                    value
                }
            };
            levels.push(level);
        }

        Ok(levels.join("/"))
    }
}

fn is_valid_level(value: &str) -> bool {
    !value.contains(['/', '+', '#'])
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl AsRef<str> for TopicPattern {
    fn as_ref(&self) -> &str {
        &self.pattern
    }
}

impl FromStr for TopicPattern {
    type Err = TopicError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        TopicPattern::new(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    #[test_case("fogcloud/+/+/thing/up/property/post")]
    #[test_case("/sys/+/+/thing/event/+/post")]
    #[test_case("a/b/#")]
    #[test_case("#")]
    #[test_case("plain/topic")]
    fn check_valid_pattern(pattern: &str) {
        assert!(TopicPattern::new(pattern).is_ok());
    }

    #[test_case("")]
    #[test_case("a/#/b")]
    #[test_case("a/b+/c")]
    #[test_case("a/b#")]
    fn check_invalid_pattern(pattern: &str) {
        assert_matches!(
            TopicPattern::new(pattern),
            Err(TopicError::InvalidPattern { .. })
        );
    }

    #[test]
    fn segments_keep_their_position() {
        let pattern = TopicPattern::new("/sys/+/thing/#").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("".to_string()),
                Segment::Literal("sys".to_string()),
                Segment::SingleLevel,
                Segment::Literal("thing".to_string()),
                Segment::MultiLevel,
            ]
        );
        assert_eq!(pattern.wildcard_count(), 2);
    }

    #[test_case("a/+/c", "a/b/c", Some(vec!["b"]))]
    #[test_case("a/+/c", "a/b/d", None)]
    #[test_case("a/+/c", "a/b/c/d", None)]
    #[test_case("a/+/c", "a/b", None)]
    #[test_case("a/+/+", "a/b/c", Some(vec!["b", "c"]))]
    #[test_case("a/+", "a/", Some(vec![""]))]
    #[test_case("a/#", "a", Some(vec![""]))]
    #[test_case("a/#", "a/b/c", Some(vec!["b/c"]))]
    #[test_case("+/b/#", "x/b/c/d", Some(vec!["x", "c/d"]))]
    #[test_case("a/#", "b/c", None)]
    fn capture_wildcard_values(pattern: &str, topic: &str, expected: Option<Vec<&str>>) {
        let pattern = TopicPattern::new(pattern).unwrap();
        let expected: Option<Vec<String>> =
            expected.map(|values| values.into_iter().map(String::from).collect());
        assert_eq!(pattern.capture(topic), expected);
    }

    #[test]
    fn fill_replaces_placeholders_left_to_right() {
        let pattern = TopicPattern::new("fogcloud/+/+/thing/up/property/post").unwrap();
        assert_eq!(
            pattern.fill(&["PK", "DN"]).unwrap(),
            "fogcloud/PK/DN/thing/up/property/post"
        );
    }

    #[test]
    fn fill_without_placeholders() {
        let pattern = TopicPattern::new("a/b/c").unwrap();
        assert_eq!(pattern.fill(&[]).unwrap(), "a/b/c");
    }

    #[test_case(&["PK"] ; "too few values")]
    #[test_case(&["PK", "DN", "temperature", "extra"] ; "too many values")]
    fn fill_rejects_a_wrong_number_of_values(values: &[&str]) {
        let pattern = TopicPattern::new("fogcloud/+/+/thing/up/event/+/post").unwrap();
        assert_eq!(
            pattern.fill(values),
            Err(TopicError::PlaceholderMismatch {
                pattern: "fogcloud/+/+/thing/up/event/+/post".to_string(),
                expected: 3,
                actual: values.len(),
            })
        );
    }

    #[test_case("a/b")]
    #[test_case("+")]
    #[test_case("#")]
    fn fill_rejects_values_spanning_levels(value: &str) {
        let pattern = TopicPattern::new("x/+/y").unwrap();
        assert_matches!(pattern.fill(&[value]), Err(TopicError::InvalidValue { .. }));
    }

    #[test]
    fn fill_multi_level_accepts_nested_levels() {
        let pattern = TopicPattern::new("x/+/#").unwrap();
        assert_eq!(pattern.fill(&["a", "b/c"]).unwrap(), "x/a/b/c");
    }

    #[test]
    fn capture_then_fill_gives_back_the_topic() {
        let pattern = TopicPattern::new("/sys/+/+/thing/event/+/post").unwrap();
        let topic = "/sys/PK/DN/thing/event/temperature/post";
        let params = pattern.capture(topic).unwrap();
        let values: Vec<&str> = params.iter().map(String::as_str).collect();
        assert_eq!(pattern.fill(&values).unwrap(), topic);
    }
}
