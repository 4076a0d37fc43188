use topic_matcher::TopicMatcher;

pub const FOG_PROPERTY_POST: &str = "fogcloud/+/+/thing/up/property/post";
pub const FOG_EVENT_POST: &str = "fogcloud/+/+/thing/up/event/+/post";
pub const FOG_SERVICE_REPLY: &str = "fogcloud/+/+/thing/up/service/+/reply";

pub const ALIYUN_PROPERTY_POST: &str = "/sys/+/+/thing/event/property/post";
pub const ALIYUN_EVENT_POST: &str = "/sys/+/+/thing/event/+/post";

/// The uplink topics, in matching precedence order.
///
/// The property post topics must stay ahead of the event post topics,
/// as `property` is also a valid event name.
pub const UPLINK_TOPICS: [&str; 5] = [
    FOG_PROPERTY_POST,
    FOG_EVENT_POST,
    FOG_SERVICE_REPLY,
    ALIYUN_PROPERTY_POST,
    ALIYUN_EVENT_POST,
];

pub fn uplink_matcher() -> TopicMatcher {
    UPLINK_TOPICS
        .to_vec()
        .try_into()
        .expect("Failed to register the uplink topic patterns")
}
