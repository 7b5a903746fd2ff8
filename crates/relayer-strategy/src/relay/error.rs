use flex_error::define_error;

use ibc_relay_types::core::ics04_channel::packet::Sequence;
use ibc_relay_types::core::ics24_host::identifier::ChainId;
use ibc_relay_types::Height;

use crate::error::Error;
use crate::relay::cycle::RelayState;

define_error! {
    RelayError {
        QueryRetriesExhausted
            {
                chain_id: ChainId,
                query: String,
                height: Height,
                attempts: u32
            }
            [ Error ]
            | e | {
                format_args!("[{}]@{{{}}} - {} failed after {} attempt(s)",
                    e.chain_id, e.height, e.query, e.attempts)
            },

        Query
            {
                chain_id: ChainId,
                query: String,
                height: Height
            }
            [ Error ]
            | e | {
                format_args!("[{}]@{{{}}} - {} failed",
                    e.chain_id, e.height, e.query)
            },

        QueryContext
            { chain_id: ChainId }
            [ Error ]
            | e | {
                format_args!("failed to get the query context for chain {}", e.chain_id)
            },

        BuildMessage
            {
                chain_id: ChainId,
                sequence: Sequence,
                height: Height
            }
            [ Error ]
            | e | {
                format_args!("[{}]@{{{}}} - failed to build message for packet {}",
                    e.chain_id, e.height, e.sequence)
            },

        Signer
            { chain_id: ChainId }
            [ Error ]
            | e | {
                format_args!("failed to get the relayer account on chain {}", e.chain_id)
            },

        UpdateClient
            {
                src_chain_id: ChainId,
                dst_chain_id: ChainId
            }
            [ Error ]
            | e | {
                format_args!("failed to build client update headers of {} for {}",
                    e.src_chain_id, e.dst_chain_id)
            },

        Submit
            { chain_id: ChainId }
            [ Error ]
            | e | {
                format_args!("failed to submit messages to chain {}", e.chain_id)
            },

        MessageTooLarge
            {
                chain_id: ChainId,
                size: usize,
                max_tx_size: usize
            }
            | e | {
                format_args!("message of {} bytes for chain {} exceeds the maximum transaction size of {} bytes",
                    e.size, e.chain_id, e.max_tx_size)
            },

        Setup
            { chain_id: ChainId }
            [ Error ]
            | e | {
                format_args!("failed to set up chain {} for relaying", e.chain_id)
            },

        InvalidTransition
            {
                from: RelayState,
                to: RelayState
            }
            | e | {
                format_args!("invalid relay state transition from {} to {}",
                    e.from, e.to)
            },
    }
}
