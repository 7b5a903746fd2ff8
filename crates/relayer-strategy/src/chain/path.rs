use core::fmt::{Display, Error as FmtError, Formatter};

use serde_derive::{Deserialize, Serialize};

use ibc_relay_types::core::ics24_host::identifier::{ChainId, ChannelId, ClientId, PortId};

/// One end of a relayed path: the ledger, the client it holds for the
/// counterparty, and the channel end packets are sent and received on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PathEnd {
    pub chain_id: ChainId,
    pub client_id: ClientId,
    pub port_id: PortId,
    pub channel_id: ChannelId,
}

impl PathEnd {
    pub fn new(chain_id: ChainId, client_id: ClientId, port_id: PortId, channel_id: ChannelId) -> Self {
        Self {
            chain_id,
            client_id,
            port_id,
            channel_id,
        }
    }
}

impl Display for PathEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "[{}]port{{{}}}", self.chain_id, self.port_id)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn display_names_chain_and_port() {
        let end = PathEnd::new(
            "ibc-0".parse().unwrap(),
            "07-tendermint-0".parse().unwrap(),
            PortId::default(),
            ChannelId::new(0),
        );

        assert_eq!(end.to_string(), "[ibc-0]port{transfer}");
    }
}
