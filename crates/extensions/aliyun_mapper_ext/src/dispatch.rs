use crate::error::ConversionError;
use crate::topics::*;
use std::collections::HashMap;
use topic_matcher::TopicError;
use topic_matcher::TopicPattern;

/// Which way a rule translates payloads
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    AliyunToFog,
    FogToAliyun,
}

/// The `method` set on the destination payload
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Method {
    /// Left empty, hence omitted from fogcloud payloads
    Empty,
    Fixed(&'static str),
    /// `thing.event.<event name>.post`, using the event name captured from the source topic
    EventPost,
}

impl Method {
    pub fn resolve(&self, event_name: Option<&str>) -> String {
        match (self, event_name) {
            (Method::Empty, _) => String::new(),
            (Method::Fixed(method), _) => method.to_string(),
            (Method::EventPost, Some(event)) => format!("thing.event.{event}.post"),
            (Method::EventPost, None) => String::new(),
        }
    }
}

/// How messages published on a source topic pattern are translated.
///
/// The destination topic is built from the product key, the device name
/// and then the source parameters captured after those two, e.g. the event name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TranslationRule {
    pub source: TopicPattern,
    pub destination: TopicPattern,
    pub expected_params: usize,
    pub direction: Direction,
    pub method: Method,
}

/// Number of leading source parameters replaced by the request product key and device name
const IDENTITY_PARAMS: usize = 2;

impl TranslationRule {
    pub fn new(
        source: &str,
        destination: &str,
        expected_params: usize,
        direction: Direction,
        method: Method,
    ) -> Result<Self, TopicError> {
        Ok(TranslationRule {
            source: TopicPattern::new(source)?,
            destination: TopicPattern::new(destination)?,
            expected_params,
            direction,
            method,
        })
    }

    fn check_params(&self, params: &[String]) -> Result<(), ConversionError> {
        if params.len() != self.expected_params {
            return Err(ConversionError::MalformedParams {
                pattern: self.source.to_string(),
                expected: self.expected_params,
                actual: params.len(),
            });
        }
        Ok(())
    }

    /// The source parameters carried over to the destination topic
    fn carried_params<'a>(&self, params: &'a [String]) -> &'a [String] {
        params.get(IDENTITY_PARAMS..).unwrap_or_default()
    }

    /// The event name captured by an event post topic
    pub fn event_name<'a>(&self, params: &'a [String]) -> Option<&'a str> {
        self.carried_params(params).first().map(String::as_str)
    }

    pub fn destination_topic(
        &self,
        product_key: &str,
        device_name: &str,
        params: &[String],
    ) -> Result<String, ConversionError> {
        self.check_params(params)?;

        let mut values = vec![product_key, device_name];
        values.extend(self.carried_params(params).iter().map(String::as_str));

        self.destination
            .fill(&values)
            .map_err(|err| match err {
                TopicError::PlaceholderMismatch {
                    expected, actual, ..
                } => ConversionError::MalformedParams {
                    pattern: self.destination.to_string(),
                    expected,
                    actual,
                },
                err => err.into(),
            })
    }
}

/// The translation rules, indexed by source topic pattern
#[derive(Debug, Clone)]
pub struct DispatchTable {
    rules: HashMap<String, TranslationRule>,
}

impl DispatchTable {
    pub fn empty() -> Self {
        DispatchTable {
            rules: HashMap::new(),
        }
    }

    /// Register a rule, replacing any previous rule for the same source pattern
    pub fn insert(&mut self, rule: TranslationRule) {
        self.rules.insert(rule.source.to_string(), rule);
    }

    pub fn rule_for(&self, pattern: &TopicPattern) -> Option<&TranslationRule> {
        self.rules.get(pattern.as_str())
    }

    pub fn rules(&self) -> impl Iterator<Item = &TranslationRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The built-in rules between the Aliyun and fogcloud uplink topics.
///
/// The fogcloud service replies are matched but have no Aliyun counterpart.
impl Default for DispatchTable {
    fn default() -> Self {
        let rules = [
            (
                ALIYUN_PROPERTY_POST,
                FOG_PROPERTY_POST,
                2,
                Direction::AliyunToFog,
                Method::Empty,
            ),
            (
                ALIYUN_EVENT_POST,
                FOG_EVENT_POST,
                3,
                Direction::AliyunToFog,
                Method::Empty,
            ),
            (
                FOG_PROPERTY_POST,
                ALIYUN_PROPERTY_POST,
                2,
                Direction::FogToAliyun,
                Method::Fixed("thing.event.property.post"),
            ),
            (
                FOG_EVENT_POST,
                ALIYUN_EVENT_POST,
                3,
                Direction::FogToAliyun,
                Method::EventPost,
            ),
        ];

        let mut table = DispatchTable::empty();
        for (source, destination, expected_params, direction, method) in rules {
            let rule =
                TranslationRule::new(source, destination, expected_params, direction, method)
                    .expect("Failed to build the built-in translation rules");
            table.insert(rule);
        }
        table
    }
}
