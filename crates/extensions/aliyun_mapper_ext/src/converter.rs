use crate::dispatch::Direction;
use crate::dispatch::DispatchTable;
use crate::dispatch::TranslationRule;
use crate::error::ConversionError;
use crate::payload::encode_payload;
use crate::payload::AliyunJson;
use crate::payload::FogJson;
use crate::topics::uplink_matcher;
use clock::unix_millis;
use clock::Clock;
use clock::WallClock;
use serde::Deserialize;
use serde::Serialize;
use topic_matcher::TopicMatcher;
use topic_matcher::TopicPattern;
use tracing::debug;

/// A message published by a device, along with the identity of this device
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UplinkRequest {
    pub product_key: String,
    pub device_name: String,
    pub device_id: String,
    pub raw_topic: String,
    pub raw_payload: String,
}

/// The translated message
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UplinkResponse {
    #[serde(rename = "fog_topic")]
    pub topic: String,
    /// Base64 encoded JSON
    #[serde(rename = "fog_payload")]
    pub payload: String,
}

/// Translates uplink messages using a fixed set of topic patterns and translation rules.
///
/// The converter is built once at start-up and then only read,
/// so it can be shared by concurrent requests.
pub struct UplinkConverter {
    matcher: TopicMatcher,
    rules: DispatchTable,
    clock: Box<dyn Clock>,
}

impl Default for UplinkConverter {
    fn default() -> Self {
        UplinkConverter::with_clock(Box::new(WallClock))
    }
}

impl UplinkConverter {
    pub fn new(matcher: TopicMatcher, rules: DispatchTable, clock: Box<dyn Clock>) -> Self {
        UplinkConverter {
            matcher,
            rules,
            clock,
        }
    }

    /// A converter for the built-in uplink topics and translation rules
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        UplinkConverter::new(uplink_matcher(), DispatchTable::default(), clock)
    }

    pub fn matcher(&self) -> &TopicMatcher {
        &self.matcher
    }

    pub fn rules(&self) -> &DispatchTable {
        &self.rules
    }

    /// Translate the topic and payload of an uplink message
    pub fn convert(&self, request: &UplinkRequest) -> Result<UplinkResponse, ConversionError> {
        debug!(
            raw_topic = %request.raw_topic,
            raw_payload = %request.raw_payload,
            device_id = %request.device_id,
            "Translating uplink message"
        );

        if request.raw_topic.is_empty() || request.raw_payload.is_empty() {
            return Err(ConversionError::EmptyInput);
        }

        if request.product_key.is_empty() || request.device_name.is_empty() {
            return Err(ConversionError::MissingIdentity);
        }

        let matched =
            self.matcher
                .matches(&request.raw_topic)
                .ok_or_else(|| ConversionError::InvalidTopic {
                    topic: request.raw_topic.clone(),
                })?;

        if let [product_key, device_name, ..] = matched.params.as_slice() {
            if product_key != &request.product_key || device_name != &request.device_name {
                debug!(
                    "The topic {} was published for {product_key}/{device_name}, translating it for {}/{}",
                    request.raw_topic, request.product_key, request.device_name
                );
            }
        }

        self.translate(
            matched.pattern,
            &matched.params,
            &request.product_key,
            &request.device_name,
            &request.raw_payload,
        )
    }

    /// Translate a message whose topic has already been matched
    pub fn translate(
        &self,
        pattern: &TopicPattern,
        params: &[String],
        product_key: &str,
        device_name: &str,
        raw_payload: &str,
    ) -> Result<UplinkResponse, ConversionError> {
        let rule =
            self.rules
                .rule_for(pattern)
                .ok_or_else(|| ConversionError::UnsupportedPattern {
                    pattern: pattern.to_string(),
                })?;

        let topic = rule.destination_topic(product_key, device_name, params)?;
        let payload = self.convert_payload(rule, params, raw_payload)?;

        Ok(UplinkResponse { topic, payload })
    }

    fn convert_payload(
        &self,
        rule: &TranslationRule,
        params: &[String],
        raw_payload: &str,
    ) -> Result<String, ConversionError> {
        let method = rule.method.resolve(rule.event_name(params));
        match rule.direction {
            Direction::AliyunToFog => {
                let timestamp = unix_millis(self.clock.now());
                let fog = AliyunJson::from_lax_str(raw_payload).into_fog(method, timestamp);
                encode_payload(&fog)
            }
            Direction::FogToAliyun => {
                let aliyun = FogJson::from_lax_str(raw_payload).into_aliyun(method);
                encode_payload(&aliyun)
            }
        }
    }
}
