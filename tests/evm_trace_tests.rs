//! Integration tests for call tree reconstruction on a real EVM
//!
//! Each test seeds hand-assembled contracts into an in-memory database, runs
//! one transaction through `TraceEvm` with a `CallTracer` attached, and checks
//! both the reconstructed tree and what the scan worker reported.
//!
//! # Test Coverage
//! - Delegate calls into trusted and untrusted code
//! - Scan gating for transactions without nested calls
//! - Reverting and faulting sub-calls
//! - Faults in the top-level call after a sub-call returned
//! - Call instructions that halt before entering the callee
//! - Contract creation transactions and nested creations
//! - Inspector reset between transactions

mod common;

use alloy::primitives::{Bytes, TxKind, U256};
use common::*;
use revm::database::{CacheDB, EmptyDB};
use revm_safe_trace::{
    config::{TracerConfig, SAFE_MASTER_COPY},
    create_evm_with_tracer,
    scanner::{service::ScanStats, sink::ChannelSink},
    CallError, CallKind, CallTracer, MatchReport, SimulationTx, TracedCall,
};
use tokio::sync::mpsc::UnboundedReceiver;

fn call_entry() -> SimulationTx {
    SimulationTx {
        caller: SENDER,
        transact_to: TxKind::Call(ENTRY),
        value: U256::ZERO,
        data: Bytes::new(),
    }
}

/// Runs `txs` against `db`, then shuts the scan worker down
async fn run(
    db: CacheDB<EmptyDB>,
    txs: Vec<SimulationTx>,
) -> (Vec<(bool, TracedCall)>, ScanStats, UnboundedReceiver<MatchReport>) {
    let (sink, receiver) = ChannelSink::channel();
    let (tracer, service) = CallTracer::spawn(TracerConfig::default(), sink).unwrap();
    let mut evm = create_evm_with_tracer(db, tracer);

    let mut traces = Vec::new();
    for tx in txs {
        let (result, trace) = evm.process_transaction(tx).unwrap();
        traces.push((result.is_success(), trace.expect("top-level call traced")));
    }

    // The tracer inside the EVM holds a queue handle
    drop(evm);
    let stats = service.join().await.unwrap();
    (traces, stats, receiver)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delegate_to_trusted_code_is_reported() {
    let db = seeded_db(&[
        (ENTRY, delegate_to(SAFE_MASTER_COPY, STOP)),
        (SAFE_MASTER_COPY, STOP.to_vec()),
    ]);
    let (traces, stats, mut receiver) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(*success);
    assert!(trace.is_success());
    assert_eq!(trace.max_depth, 2);
    assert_eq!(trace.root.kind, CallKind::Call);
    assert_eq!((trace.root.from, trace.root.to), (SENDER, ENTRY));
    assert_eq!(trace.root.value, Some(U256::ZERO));

    let delegate = &trace.root.children[0];
    assert_eq!(delegate.kind, CallKind::DelegateCall);
    assert_eq!((delegate.from, delegate.to), (ENTRY, SAFE_MASTER_COPY));
    assert_eq!(delegate.value, None);

    assert_eq!(stats.scanned, 1);
    assert_eq!(stats.matches, 1);
    let report = receiver.recv().await.unwrap();
    assert_eq!(report.trace_address, vec![0]);
    assert_eq!(report.to_string(), format!("DELEGATECALL: {ENTRY} -> {SAFE_MASTER_COPY}"));
    assert!(receiver.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delegate_to_untrusted_code_is_not_reported() {
    let db = seeded_db(&[
        (ENTRY, delegate_to(UNTRUSTED, STOP)),
        (UNTRUSTED, STOP.to_vec()),
    ]);
    let (traces, stats, mut receiver) = run(db, vec![call_entry()]).await;

    assert_eq!(traces[0].1.root.children.len(), 1);
    assert_eq!(stats.scanned, 1);
    assert_eq!(stats.matches, 0);
    assert!(receiver.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_flat_transaction_is_not_scanned() {
    let db = seeded_db(&[(ENTRY, STOP.to_vec())]);
    let (traces, stats, _receiver) = run(db, vec![call_entry()]).await;

    let trace = &traces[0].1;
    assert_eq!(trace.max_depth, 1);
    assert!(!trace.is_scannable());
    assert!(trace.root.children.is_empty());
    assert_eq!(
        stats,
        ScanStats {
            received: 1,
            skipped: 1,
            scanned: 0,
            matches: 0,
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reverting_sub_call_is_isolated() {
    let db = seeded_db(&[(ENTRY, call_to(CHILD, STOP)), (CHILD, REVERT.to_vec())]);
    let (traces, _, _) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(*success);
    assert!(trace.root.is_success());
    assert_eq!(trace.root.children.len(), 1);
    assert_eq!(trace.root.children[0].kind, CallKind::Call);
    assert_eq!(trace.root.children[0].to, CHILD);
    assert_eq!(trace.root.children[0].error, Some(CallError::Reverted));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_faulting_sub_call_is_isolated() {
    let db = seeded_db(&[(ENTRY, call_to(CHILD, STOP)), (CHILD, INVALID.to_vec())]);
    let (traces, _, _) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(*success);
    assert!(trace.root.is_success());
    assert!(matches!(
        trace.root.children[0].error,
        Some(CallError::Halted(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_root_fault_after_sub_call() {
    let db = seeded_db(&[(ENTRY, call_to(CHILD, INVALID)), (CHILD, STOP.to_vec())]);
    let (traces, _, _) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(!*success);
    assert!(matches!(trace.root.error, Some(CallError::Halted(_))));
    assert!(matches!(trace.failure, Some(CallError::Halted(_))));
    assert_eq!(trace.root.children.len(), 1);
    assert!(trace.root.children[0].is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_root_revert_is_reported() {
    let db = seeded_db(&[(ENTRY, REVERT.to_vec())]);
    let (traces, _, _) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(!*success);
    assert_eq!(trace.root.error, Some(CallError::Reverted));
    assert_eq!(trace.failure, Some(CallError::Reverted));
    // Empty revert data carries no reason
    assert_eq!(trace.revert_reason, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_halted_delegate_in_root_opens_no_frame() {
    let db = seeded_db(&[
        (ENTRY, call_to(CHILD, &oversized_delegate_to(SAFE_MASTER_COPY, STOP))),
        (CHILD, STOP.to_vec()),
        (SAFE_MASTER_COPY, STOP.to_vec()),
    ]);
    let (traces, stats, mut receiver) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(!*success);
    assert!(matches!(trace.root.error, Some(CallError::Halted(_))));
    assert!(matches!(trace.failure, Some(CallError::Halted(_))));
    // Only the completed CALL, no frame for the delegate that never ran
    assert_eq!(trace.root.children.len(), 1);
    assert_eq!(trace.root.children[0].kind, CallKind::Call);
    assert_eq!(trace.root.children[0].to, CHILD);
    assert!(trace.root.children[0].is_success());

    assert_eq!(stats.scanned, 1);
    assert_eq!(stats.matches, 0);
    assert!(receiver.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_halted_delegate_in_sub_call_fails_only_that_call() {
    let db = seeded_db(&[
        (ENTRY, call_to(CHILD, STOP)),
        (CHILD, oversized_delegate_to(SAFE_MASTER_COPY, STOP)),
        (SAFE_MASTER_COPY, STOP.to_vec()),
    ]);
    let (traces, stats, mut receiver) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(*success);
    assert!(trace.root.is_success());
    assert_eq!(trace.root.subtree_size(), 2);
    let child = &trace.root.children[0];
    assert_eq!(child.to, CHILD);
    assert!(matches!(child.error, Some(CallError::Halted(_))));
    assert!(child.children.is_empty());

    assert_eq!(stats.matches, 0);
    assert!(receiver.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nested_creations_target_creator() {
    let db = seeded_db(&[(ENTRY, CREATE_BOTH.to_vec())]);
    let (traces, stats, _) = run(db, vec![call_entry()]).await;

    let (success, trace) = &traces[0];
    assert!(*success);
    // Nested creations never overwrite the root target
    assert_eq!((trace.root.kind, trace.root.to), (CallKind::Call, ENTRY));

    let children = &trace.root.children;
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].kind, CallKind::Create);
    assert_eq!(children[1].kind, CallKind::Create2);
    for created in children {
        assert_eq!((created.from, created.to), (ENTRY, ENTRY));
        assert!(created.is_success());
        assert_eq!(created.value, None);
    }
    assert_eq!(stats.matches, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_contract_creation_root() {
    let db = seeded_db(&[]);
    let tx = SimulationTx {
        caller: SENDER,
        transact_to: TxKind::Create,
        value: U256::ZERO,
        data: Bytes::from_static(STOP),
    };
    let (traces, stats, _) = run(db, vec![tx]).await;

    let (success, trace) = &traces[0];
    assert!(*success);
    assert_eq!(trace.root.kind, CallKind::Create);
    assert_eq!(trace.root.from, SENDER);
    assert_eq!(trace.root.to, SENDER.create(0));
    assert_eq!(stats.skipped, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_each_transaction_gets_a_fresh_tree() {
    let db = seeded_db(&[
        (ENTRY, delegate_to(SAFE_MASTER_COPY, STOP)),
        (SAFE_MASTER_COPY, STOP.to_vec()),
    ]);
    let (traces, stats, mut receiver) = run(db, vec![call_entry(), call_entry()]).await;

    for (success, trace) in &traces {
        assert!(*success);
        assert_eq!(trace.root.subtree_size(), 2);
    }
    assert_eq!(stats.received, 2);
    assert_eq!(stats.matches, 2);
    assert!(receiver.recv().await.is_some());
    assert!(receiver.recv().await.is_some());
}
