//! Static configuration for a recipient.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::policy::RelayPolicy;
use crate::recipient::RelayRecipient;

/// Identity settings a recipient is built from.
///
/// The hub is deliberately absent: it is set through
/// [`RelayRecipient::initialize`], which validates it.
///
/// # Examples
///
/// ```
/// use relay_recipient::{AcceptAll, RecipientConfig};
///
/// let config: RecipientConfig = serde_json::from_str(r#"{
///     "address": "0x0202020202020202020202020202020202020202",
///     "owner": "0x0101010101010101010101010101010101010101"
/// }"#).unwrap();
///
/// let recipient = config.build(AcceptAll);
/// assert_eq!(recipient.hub(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientConfig {
    /// The recipient's own identity, used as the key for hub balance queries
    pub address: Address,
    /// The identity allowed to re-point the hub
    pub owner: Address,
}

impl RecipientConfig {
    /// Builds an unconfigured recipient governed by `policy`.
    pub fn build<P: RelayPolicy>(self, policy: P) -> RelayRecipient<P> {
        RelayRecipient::new(self.address, self.owner, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::AcceptAll;

    #[test]
    fn config_round_trips_through_json() {
        let config = RecipientConfig {
            address: Address::new([0x02; 20]),
            owner: Address::new([0x01; 20]),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"0x0202020202020202020202020202020202020202\""));

        let back: RecipientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn bad_address_fails_to_deserialize() {
        let result = serde_json::from_str::<RecipientConfig>(
            r#"{"address": "0x1234", "owner": "0x0101010101010101010101010101010101010101"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn build_uses_configured_identities() {
        let config = RecipientConfig {
            address: Address::new([0x02; 20]),
            owner: Address::new([0x01; 20]),
        };
        let recipient = config.build(AcceptAll);

        assert_eq!(recipient.address(), config.address);
        assert_eq!(recipient.owner(), config.owner);
    }
}
