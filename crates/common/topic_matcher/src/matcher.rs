use crate::errors::TopicError;
use crate::pattern::TopicPattern;

/// An ordered set of topic patterns.
///
/// Patterns are registered once, before the matcher is shared, and the set is read-only afterwards.
/// When several patterns accept the same topic, the first registered one wins.
#[derive(Debug, Clone, Default)]
pub struct TopicMatcher {
    patterns: Vec<TopicPattern>,
}

/// The pattern accepting a topic and the values bound to its wildcard segments
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MatchResult<'a> {
    pub pattern: &'a TopicPattern,
    pub params: Vec<String>,
}

impl TopicMatcher {
    /// An empty matcher
    pub fn new() -> Self {
        TopicMatcher::default()
    }

    /// Check if the pattern is valid and add it to this matcher.
    pub fn add(&mut self, pattern: &str) -> Result<(), TopicError> {
        let pattern = TopicPattern::new(pattern)?;
        if self.patterns.contains(&pattern) {
            return Err(TopicError::DuplicatePattern {
                pattern: pattern.to_string(),
            });
        }
        self.patterns.push(pattern);
        Ok(())
    }

    pub fn patterns(&self) -> &[TopicPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Find the first registered pattern accepting the given topic.
    ///
    /// An empty topic, or a topic containing wildcards, is never accepted.
    pub fn matches(&self, topic: &str) -> Option<MatchResult<'_>> {
        if topic.is_empty() || !rumqttc::valid_topic(topic) {
            return None;
        }

        let levels: Vec<&str> = topic.split('/').collect();
        self.patterns.iter().find_map(|pattern| {
            pattern
                .capture_levels(&levels)
                .map(|params| MatchResult { pattern, params })
        })
    }

    /// Check if the given topic is accepted by one of the patterns.
    pub fn accept_topic(&self, topic: &str) -> bool {
        self.matches(topic).is_some()
    }
}

impl TryFrom<Vec<&str>> for TopicMatcher {
    type Error = TopicError;

    fn try_from(patterns: Vec<&str>) -> Result<Self, Self::Error> {
        let mut matcher = TopicMatcher::new();
        for pattern in patterns.into_iter() {
            matcher.add(pattern)?
        }
        Ok(matcher)
    }
}
