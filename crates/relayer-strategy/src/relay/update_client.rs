use ibc_proto::google::protobuf::Any;
use ibc_relay_types::core::ics02_client::msgs::update_client::MsgUpdateClient;
use ibc_relay_types::tx_msg::Msg;

use crate::chain::endpoint::ChainEndpoint;
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayEvent, RelayObserver};
use crate::sync::HeaderSynchronizer;

/// `MsgUpdateClient`s that bring the client of `src` on `dst` up to date,
/// signed by the relayer account on `dst`. Empty when the client is
/// already current.
pub async fn update_client_msgs(
    src: &dyn ChainEndpoint,
    dst: &dyn ChainEndpoint,
    sync: &dyn HeaderSynchronizer,
) -> Result<Vec<Any>, RelayError> {
    let headers = sync
        .setup_headers_for_update(src, dst)
        .await
        .map_err(|e| RelayError::update_client(src.id().clone(), dst.id().clone(), e))?;

    if headers.is_empty() {
        return Ok(vec![]);
    }

    let signer = dst
        .get_signer()
        .map_err(|e| RelayError::signer(dst.id().clone(), e))?;

    let client_id = &dst.path().client_id;

    Ok(headers
        .into_iter()
        .map(|header| MsgUpdateClient::new(client_id.clone(), header, signer.clone()).to_any())
        .collect())
}

/// Place the client updates `dst` needs ahead of `msgs`, the messages
/// bound to `dst`. Nothing is asked of the synchronizer when `msgs` is
/// empty. Returns the number of update messages prepended.
pub async fn prepend_update_client(
    msgs: &mut Vec<Any>,
    src: &dyn ChainEndpoint,
    dst: &dyn ChainEndpoint,
    sync: &dyn HeaderSynchronizer,
    observer: &dyn RelayObserver,
) -> Result<usize, RelayError> {
    if msgs.is_empty() {
        return Ok(0);
    }

    let updates = update_client_msgs(src, dst, sync).await?;
    let count = prepend(msgs, updates);

    if count > 0 {
        observer.on_event(RelayEvent::UpdateClientPrepended {
            src_chain_id: src.id().clone(),
            dst_chain_id: dst.id().clone(),
            client_id: dst.path().client_id.clone(),
            count,
        });
    }

    Ok(count)
}

fn prepend(msgs: &mut Vec<Any>, updates: Vec<Any>) -> usize {
    let count = updates.len();
    msgs.splice(0..0, updates);
    count
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn any(type_url: &str) -> Any {
        Any {
            type_url: type_url.to_string(),
            value: vec![],
        }
    }

    #[test]
    fn updates_go_before_delivery_messages() {
        let mut msgs = vec![any("recv6"), any("recv7")];

        let count = prepend(&mut msgs, vec![any("update1"), any("update2")]);

        assert_eq!(count, 2);
        assert_eq!(
            msgs.iter().map(|m| m.type_url.as_str()).collect::<Vec<_>>(),
            vec!["update1", "update2", "recv6", "recv7"]
        );
    }

    #[test]
    fn no_updates_leaves_messages_untouched() {
        let mut msgs = vec![any("recv6")];

        assert_eq!(prepend(&mut msgs, vec![]), 0);
        assert_eq!(msgs, vec![any("recv6")]);
    }
}
