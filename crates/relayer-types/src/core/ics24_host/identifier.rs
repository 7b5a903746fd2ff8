use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use super::error::ValidationError;
use super::validate::{
    validate_chain_identifier, validate_channel_identifier, validate_client_identifier,
    validate_port_identifier,
};

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident, $validate:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Get this identifier as a borrowed `&str`
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get this identifier as a borrowed byte slice
            pub fn as_bytes(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $validate(s).map(|_| Self(s.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                $validate(&s)?;
                Ok(Self(s))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str().eq(other)
            }
        }
    };
}

define_identifier!(
    /// Identifies one ledger of a relay path. Only used for bookkeeping and
    /// logging; it must stay stable for the duration of a relay run.
    ChainId,
    validate_chain_identifier
);

define_identifier!(
    /// Identifier of the light client a ledger keeps for its counterparty.
    ClientId,
    validate_client_identifier
);

define_identifier!(PortId, validate_port_identifier);

define_identifier!(ChannelId, validate_channel_identifier);

impl ChannelId {
    const PREFIX: &'static str = "channel-";

    /// Builds the canonical `channel-{counter}` identifier.
    pub fn new(counter: u64) -> Self {
        Self(format!("{}{}", Self::PREFIX, counter))
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self("transfer".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn channel_id_counter_format() {
        assert_eq!(ChannelId::new(7).as_str(), "channel-7");
        assert!(ChannelId::from_str(ChannelId::new(7).as_str()).is_ok());
    }

    #[test]
    fn identifiers_reject_separator() {
        assert!(PortId::from_str("trans/fer").is_err());
        assert!(ChainId::from_str("ibc/0").is_err());
    }

    #[test]
    fn client_id_roundtrips_through_string() {
        let id = ClientId::from_str("07-tendermint-0").unwrap();
        let raw: String = id.clone().into();

        assert_eq!(ClientId::try_from(raw).unwrap(), id);
    }
}
