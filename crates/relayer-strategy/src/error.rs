//! Errors reported by the ledger collaborators consumed by the strategy.

use flex_error::{define_error, TraceError};

use ibc_relay_types::core::ics04_channel::error::Error as ChannelError;
use ibc_relay_types::core::ics24_host::identifier::ChainId;
use ibc_relay_types::proofs::ProofError;
use ibc_relay_types::signer::SignerError;

define_error! {
    Error {
        Rpc
            { chain_id: ChainId, reason: String }
            | e | { format_args!("RPC error to chain {}: {}", e.chain_id, e.reason) },

        Query
            { query: String, reason: String }
            | e | { format_args!("query {} failed: {}", e.query, e.reason) },

        EmptyResponse
            { chain_id: ChainId, query: String }
            | e | {
                format_args!("no error on {} for {}, however response is nil",
                    e.query, e.chain_id)
            },

        Submit
            { chain_id: ChainId, reason: String }
            | e | {
                format_args!("transaction rejected by chain {}: {}",
                    e.chain_id, e.reason)
            },

        Signer
            [ SignerError ]
            | _ | { "failed to get the relayer account" },

        Types
            [ ChannelError ]
            | _ | { "invalid packet data" },

        Proof
            [ ProofError ]
            | _ | { "invalid proof" },

        Other
            [ TraceError<eyre::Report> ]
            | _ | { "other error" },
    }
}

impl Error {
    /// Whether retrying the same read may succeed.
    ///
    /// Transport failures and missing responses are transient; malformed
    /// data and rejected transactions are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.detail(),
            ErrorDetail::Rpc(_)
                | ErrorDetail::Query(_)
                | ErrorDetail::EmptyResponse(_)
                | ErrorDetail::Other(_)
        )
    }
}

impl From<eyre::Report> for Error {
    fn from(e: eyre::Report) -> Self {
        Error::other(e)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn transport_failures_are_retryable() {
        let chain_id: ChainId = "ibc-0".parse().unwrap();

        assert!(Error::rpc(chain_id.clone(), "connection reset".to_string()).is_retryable());
        assert!(Error::empty_response(chain_id, "query_packet_commitments".to_string())
            .is_retryable());
        assert!(Error::other(eyre::eyre!("timeout")).is_retryable());
    }

    #[test]
    fn malformed_data_is_not_retryable() {
        assert!(!Error::proof(ProofError::empty_proof()).is_retryable());
        assert!(!Error::signer(SignerError::empty_signer()).is_retryable());
    }
}
