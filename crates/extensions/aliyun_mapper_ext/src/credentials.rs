use crate::error::ConversionError;
use std::str::FromStr;

/// The product key and device name identifying a device on both platforms.
///
/// Devices authenticate with an MQTT username of the form `<device_name>&<product_key>`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeviceIdentity {
    pub product_key: String,
    pub device_name: String,
}

impl DeviceIdentity {
    /// Use the given product key and device name, unless one is missing and a username is provided.
    ///
    /// Fails with [ConversionError::MissingIdentity] if neither provides a complete identity.
    pub fn resolve(
        product_key: &str,
        device_name: &str,
        username: Option<&str>,
    ) -> Result<Self, ConversionError> {
        if !product_key.is_empty() && !device_name.is_empty() {
            return Ok(DeviceIdentity {
                product_key: product_key.to_string(),
                device_name: device_name.to_string(),
            });
        }

        match username {
            Some(username) => username.parse(),
            None => Err(ConversionError::MissingIdentity),
        }
    }
}

impl FromStr for DeviceIdentity {
    type Err = ConversionError;

    fn from_str(username: &str) -> Result<Self, Self::Err> {
        match username.split('&').collect::<Vec<_>>().as_slice() {
            [device_name, product_key] if !device_name.is_empty() && !product_key.is_empty() => {
                Ok(DeviceIdentity {
                    product_key: product_key.to_string(),
                    device_name: device_name.to_string(),
                })
            }
            _ => Err(ConversionError::InvalidUsername {
                username: username.to_string(),
            }),
        }
    }
}
