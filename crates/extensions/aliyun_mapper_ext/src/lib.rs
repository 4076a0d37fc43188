//! Translation of device uplink messages between the Aliyun IoT schema and the fogcloud schema.
//!
//! A raw topic is first matched against the topics registered by [topics::uplink_matcher].
//! The matched pattern then selects a [TranslationRule] from the [DispatchTable],
//! which builds the destination topic and remaps the payload.

mod converter;
mod credentials;
mod dispatch;
mod error;
pub mod payload;
pub mod topics;

pub use converter::UplinkConverter;
pub use converter::UplinkRequest;
pub use converter::UplinkResponse;
pub use credentials::DeviceIdentity;
pub use dispatch::DispatchTable;
pub use dispatch::Direction;
pub use dispatch::Method;
pub use dispatch::TranslationRule;
pub use error::ConversionError;
