use async_trait::async_trait;

use ibc_proto::google::protobuf::Any;
use ibc_relay_types::core::ics24_host::identifier::ChainId;

use crate::chain::context::{QueryContext, QueryProofContext};
use crate::chain::endpoint::ChainEndpoint;
use crate::error::Error;

/// Tracks the latest headers of both ends of a path.
///
/// Supplies the heights queries are made at and the headers that bring
/// one ledger's client of the other up to date.
#[async_trait]
pub trait HeaderSynchronizer: Send + Sync {
    fn query_context(&self, chain_id: &ChainId) -> Result<QueryContext, Error>;

    /// Proof contexts are derived from the latest height using the
    /// configured [`ProofHeightOffset`](crate::config::ProofHeightOffset).
    fn query_proof_context(&self, chain_id: &ChainId) -> Result<QueryProofContext, Error>;

    /// Headers of `src` that `dst` needs to verify proofs taken at the
    /// current proof context of `src`, oldest first. Empty when the client
    /// on `dst` is already current.
    async fn setup_headers_for_update(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
    ) -> Result<Vec<Any>, Error>;

    /// Hint that a query on the path failed and the tracked headers may be
    /// stale. Best effort; failures are not reported.
    fn notify_query_failure(&self, src: &dyn ChainEndpoint, dst: &dyn ChainEndpoint);
}
