use std::collections::BTreeSet;

use ibc_relay_strategy::chain::endpoint::ChainEndpoint;
use ibc_relay_strategy::error::Error;
use ibc_relay_strategy::relay::error::RelayErrorDetail;
use ibc_relay_strategy::relay::observer::RelayEvent;
use ibc_relay_strategy::relay::sequences::RelaySequences;
use ibc_relay_types::core::ics04_channel::packet::Sequence;

use crate::tests::util::context::{
    build_mock_relay_context, build_mock_relay_context_with_config, sequences, test_config,
    CURRENT_CLIENT_HEIGHT,
};

#[test_log::test(tokio::test)]
async fn committed_but_unreceived_packets_are_outstanding() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[5, 6, 7])?;
    ctx.chain_b.receive_packets(&ctx.chain_a, &[5])?;

    let outstanding = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert_eq!(outstanding, RelaySequences::new(sequences(&[6, 7]), vec![]));

    Ok(())
}

#[test_log::test(tokio::test)]
async fn nothing_committed_nothing_outstanding() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    let outstanding = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert!(outstanding.is_empty());
    assert!(ctx.sync.failure_notifications()?.is_empty());
    assert!(ctx.sync.header_requests()?.is_empty());

    Ok(())
}

#[test_log::test(tokio::test)]
async fn outstanding_sequences_match_set_difference() -> Result<(), Error> {
    // (committed on A, committed on B, received on A, received on B)
    let cases: [(&[u64], &[u64], &[u64], &[u64]); 5] = [
        (&[1, 2, 3], &[], &[], &[]),
        (&[1, 2, 3], &[], &[], &[1, 2, 3]),
        (&[1, 2, 3, 4], &[7, 8], &[8], &[2, 4]),
        (&[], &[1, 2], &[], &[]),
        (&[10, 11, 12], &[20, 21], &[20, 21], &[11]),
    ];

    for (committed_a, committed_b, received_a, received_b) in cases {
        let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

        ctx.chain_a.send_packets(&ctx.chain_b, committed_a)?;
        ctx.chain_b.send_packets(&ctx.chain_a, committed_b)?;
        ctx.chain_a.receive_packets(&ctx.chain_b, received_a)?;
        ctx.chain_b.receive_packets(&ctx.chain_a, received_b)?;

        let outstanding = ctx
            .strategy
            .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
            .await
            .unwrap();

        let difference = |committed: &[u64], received: &[u64]| -> BTreeSet<Sequence> {
            committed
                .iter()
                .filter(|sequence| !received.contains(sequence))
                .copied()
                .map(Sequence::from)
                .collect()
        };

        assert_eq!(
            outstanding.src.iter().copied().collect::<BTreeSet<_>>(),
            difference(committed_a, received_b)
        );
        assert_eq!(
            outstanding.dst.iter().copied().collect::<BTreeSet<_>>(),
            difference(committed_b, received_a)
        );
    }

    Ok(())
}

#[test_log::test(tokio::test)]
async fn reconciliation_is_idempotent() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[1, 2, 3])?;
    ctx.chain_b.send_packets(&ctx.chain_a, &[4])?;
    ctx.chain_b.receive_packets(&ctx.chain_a, &[2])?;

    let first = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    let second = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, RelaySequences::new(sequences(&[1, 3]), sequences(&[4])));

    Ok(())
}

#[test_log::test(tokio::test)]
async fn nil_responses_are_retried_transparently() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[5, 6, 7])?;
    ctx.chain_b.receive_packets(&ctx.chain_a, &[5])?;

    let expected = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    ctx.chain_a
        .faults(|faults| faults.nil_commitment_responses = 2)?;

    let outstanding = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert_eq!(outstanding, expected);

    let retries = ctx.observer.count(|event| {
        matches!(event, RelayEvent::QueryRetry { chain_id, .. } if chain_id == ctx.chain_a.id())
    });
    assert_eq!(retries, 2);
    assert_eq!(ctx.sync.failure_notifications()?.len(), 2);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn exhausted_retries_fail_the_reconciliation() -> Result<(), Error> {
    let mut config = test_config();
    config.query.retry.max_attempts = 3;

    let ctx = build_mock_relay_context_with_config(CURRENT_CLIENT_HEIGHT, config)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[1])?;
    ctx.chain_b
        .faults(|faults| faults.commitment_query_failures = 10)?;

    let e = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap_err();

    match e.detail() {
        RelayErrorDetail::QueryRetriesExhausted(e) => {
            assert_eq!(e.chain_id, *ctx.chain_b.id());
            assert_eq!(e.attempts, 3);
        }
        _ => panic!("unexpected error: {e}"),
    }

    assert_eq!(ctx.chain_b.state()?.commitment_queries, 3);
    assert_eq!(ctx.sync.failure_notifications()?.len(), 3);

    Ok(())
}

#[test_log::test(tokio::test)]
async fn unreceived_queries_are_skipped_without_candidates() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_b.send_packets(&ctx.chain_a, &[3])?;
    ctx.chain_a.receive_packets(&ctx.chain_b, &[3])?;

    let outstanding = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert!(outstanding.is_empty());

    Ok(())
}

#[test_log::test(tokio::test)]
async fn written_acknowledgements_of_committed_packets_are_outstanding() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[1, 2, 3])?;
    ctx.chain_b.receive_packets(&ctx.chain_a, &[1, 2])?;

    let outstanding = ctx
        .strategy
        .unrelayed_acknowledgements(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert_eq!(outstanding, RelaySequences::new(vec![], sequences(&[1, 2])));

    Ok(())
}

#[test_log::test(tokio::test)]
async fn failed_unreceived_query_fails_the_reconciliation() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[1, 2])?;
    ctx.chain_b.send_packets(&ctx.chain_a, &[3])?;
    ctx.chain_a
        .faults(|faults| faults.unreceived_query_failures = 1)?;

    let e = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap_err();

    match e.detail() {
        RelayErrorDetail::Query(e) => {
            assert_eq!(e.chain_id, *ctx.chain_a.id());
            assert_eq!(e.query, "query unreceived packets");
        }
        _ => panic!("unexpected error: {e}"),
    }

    // Unreceived queries are not retried, and the next reconciliation
    // starts over.
    assert_eq!(
        ctx.observer
            .count(|event| matches!(event, RelayEvent::QueryRetry { .. })),
        0
    );

    let outstanding = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap();

    assert_eq!(
        outstanding,
        RelaySequences::new(sequences(&[1, 2]), sequences(&[3]))
    );

    Ok(())
}

#[test_log::test(tokio::test)]
async fn undecodable_commitments_are_not_retried() -> Result<(), Error> {
    let ctx = build_mock_relay_context(CURRENT_CLIENT_HEIGHT)?;

    ctx.chain_a.send_packets(&ctx.chain_b, &[1])?;
    ctx.chain_a
        .faults(|faults| faults.invalid_commitment_responses = 1)?;

    let e = ctx
        .strategy
        .unrelayed_sequences(ctx.chain_a.as_ref(), ctx.chain_b.as_ref(), &ctx.sync)
        .await
        .unwrap_err();

    match e.detail() {
        RelayErrorDetail::Query(e) => {
            assert_eq!(e.chain_id, *ctx.chain_a.id());
            assert_eq!(e.query, "query packet commitments");
        }
        _ => panic!("unexpected error: {e}"),
    }

    assert_eq!(ctx.chain_a.state()?.commitment_queries, 1);
    assert_eq!(
        ctx.observer
            .count(|event| matches!(event, RelayEvent::QueryRetry { .. })),
        0
    );
    assert!(ctx.sync.failure_notifications()?.is_empty());

    Ok(())
}
