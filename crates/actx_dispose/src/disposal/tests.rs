use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::executor::block_on;
use pretty_assertions::assert_eq;

use super::*;

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[test]
fn body_runs_once() {
    let disposal = Disposal::new();
    let runs = counter();
    for _ in 0..3 {
        let runs = Arc::clone(&runs);
        let result = disposal.dispose_with(move || {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });
        assert_eq!(result, Ok(true));
    }
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(disposal.is_disposed());
}

#[test]
fn events_fire_in_order() {
    let disposal = Disposal::new();
    let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let _a = {
        let log = Arc::clone(&log);
        disposal.disposing().subscribe(move |()| log.lock().push("disposing"))
    };
    let _b = {
        let log = Arc::clone(&log);
        disposal.disposed().subscribe(move |()| log.lock().push("disposed"))
    };

    let body_log = Arc::clone(&log);
    let result = disposal.dispose_with(move || {
        body_log.lock().push("body");
        Ok(true)
    });

    assert_eq!(result, Ok(true));
    assert_eq!(*log.lock(), vec!["disposing", "body", "disposed"]);
}

#[test]
fn deferred_disposal_can_be_retried() {
    let disposal = Disposal::new();
    assert_eq!(disposal.dispose_with(|| Ok(false)), Ok(false));
    assert_eq!(disposal.state(), DisposalState::Live);
    assert_eq!(disposal.dispose_with(|| Ok(true)), Ok(true));
    assert!(disposal.is_disposed());
}

#[test]
fn failed_disposal_stays_live() {
    let disposal = Disposal::new();
    let result = disposal.dispose_with(|| Err(DisposeError::failed("boom")));
    assert_eq!(result, Err(DisposeError::failed("boom")));
    assert_eq!(disposal.state(), DisposalState::Live);
}

#[test]
fn reentrant_disposal_is_rejected() {
    let disposal = Arc::new(Disposal::new());
    let inner = Arc::clone(&disposal);
    let result = disposal.dispose_with(move || {
        assert_eq!(
            inner.dispose_with(|| Ok(true)),
            Err(DisposeError::AlreadyDisposing)
        );
        Ok(true)
    });
    assert_eq!(result, Ok(true));
}

#[test]
fn async_disposal_completes() {
    let disposal = Disposal::new();
    let token = CancellationToken::new();
    let result = block_on(disposal.dispose_async_with(&token, || async { Ok(()) }));
    assert_eq!(result, Ok(()));
    assert!(disposal.is_disposed());
}

#[test]
fn cancelled_before_start_leaves_object_untouched() {
    let disposal = Disposal::new();
    let token = CancellationToken::new();
    token.cancel();
    let runs = counter();
    let body_runs = Arc::clone(&runs);
    let result = block_on(disposal.dispose_async_with(&token, move || {
        body_runs.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    }));

    assert_eq!(result, Err(DisposeError::Cancelled));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(disposal.state(), DisposalState::Live);
}

#[test]
fn cancellation_observed_by_body_returns_to_live() {
    let disposal = Disposal::new();
    let token = CancellationToken::new();
    let body_token = token.clone();
    let result = block_on(disposal.dispose_async_with(&token, move || async move {
        body_token.cancel();
        body_token.check()
    }));

    assert_eq!(result, Err(DisposeError::Cancelled));
    assert_eq!(disposal.state(), DisposalState::Live);

    let fresh = CancellationToken::new();
    assert_eq!(
        block_on(disposal.dispose_async_with(&fresh, || async { Ok(()) })),
        Ok(())
    );
    assert!(disposal.is_disposed());
}
