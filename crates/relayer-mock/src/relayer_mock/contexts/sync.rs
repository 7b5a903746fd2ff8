use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eyre::eyre;

use ibc_proto::google::protobuf::Any;
use ibc_relay_strategy::chain::context::{QueryContext, QueryProofContext};
use ibc_relay_strategy::chain::endpoint::ChainEndpoint;
use ibc_relay_strategy::config::ProofHeightOffset;
use ibc_relay_strategy::error::Error;
use ibc_relay_strategy::sync::HeaderSynchronizer;
use ibc_relay_types::core::ics24_host::identifier::ChainId;

use crate::relayer_mock::contexts::chain::{mock_header, MockChain};
use crate::relayer_mock::util::mutex::MutexUtil;

/// Header synchronizer over a set of [`MockChain`]s.
///
/// A client update is produced when the destination's client of the
/// source is below the source's current proof height, and carries the
/// source's latest height.
pub struct MockSynchronizer {
    chains: Vec<Arc<MockChain>>,
    proof_height_offset: ProofHeightOffset,
    header_requests: Mutex<Vec<(ChainId, ChainId)>>,
    failure_notifications: Mutex<Vec<(ChainId, ChainId)>>,
}

impl MockSynchronizer {
    pub fn new(chains: Vec<Arc<MockChain>>, proof_height_offset: ProofHeightOffset) -> Self {
        Self {
            chains,
            proof_height_offset,
            header_requests: Mutex::new(vec![]),
            failure_notifications: Mutex::new(vec![]),
        }
    }

    /// `(src, dst)` of every client update request, in order.
    pub fn header_requests(&self) -> Result<Vec<(ChainId, ChainId)>, Error> {
        Ok(self.header_requests.acquire_mutex()?.clone())
    }

    /// `(src, dst)` of every query failure notification, in order.
    pub fn failure_notifications(&self) -> Result<Vec<(ChainId, ChainId)>, Error> {
        Ok(self.failure_notifications.acquire_mutex()?.clone())
    }

    fn chain(&self, chain_id: &ChainId) -> Result<&MockChain, Error> {
        self.chains
            .iter()
            .find(|chain| chain.id() == chain_id)
            .map(|chain| chain.as_ref())
            .ok_or_else(|| Error::other(eyre!("unknown chain {chain_id}")))
    }
}

#[async_trait]
impl HeaderSynchronizer for MockSynchronizer {
    fn query_context(&self, chain_id: &ChainId) -> Result<QueryContext, Error> {
        Ok(QueryContext::new(self.chain(chain_id)?.latest_height()?))
    }

    fn query_proof_context(&self, chain_id: &ChainId) -> Result<QueryProofContext, Error> {
        let latest = self.chain(chain_id)?.latest_height()?;

        QueryProofContext::below_latest(latest, self.proof_height_offset)
            .map_err(|e| Error::other(eyre!("{e}")))
    }

    async fn setup_headers_for_update(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
    ) -> Result<Vec<Any>, Error> {
        self.header_requests
            .acquire_mutex()?
            .push((src.id().clone(), dst.id().clone()));

        let proof_height = self.query_proof_context(src.id())?.height();
        let client_height = self.chain(dst.id())?.client_height()?;

        if client_height >= proof_height {
            return Ok(vec![]);
        }

        let latest = self.chain(src.id())?.latest_height()?;

        Ok(vec![mock_header(latest)])
    }

    fn notify_query_failure(&self, src: &dyn ChainEndpoint, dst: &dyn ChainEndpoint) {
        if let Ok(mut notifications) = self.failure_notifications.acquire_mutex() {
            notifications.push((src.id().clone(), dst.id().clone()));
        }
    }
}
