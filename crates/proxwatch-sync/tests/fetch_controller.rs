//! Fetch controller behavior under deterministic (paused) time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proxwatch_api::ApiError;
use proxwatch_sync::FetchController;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn producer_runs_once_per_refetch_plus_initial() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let controller = FetchController::new("c1".to_string(), move |_key: String| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(42u32)
        }
    });

    sleep(Duration::from_millis(1)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let state = controller.state();
    assert_eq!(state.data, Some(42));
    assert!(!state.loading);
    assert!(state.error.is_none());

    controller.refetch();
    controller.refetch();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // the key is never mutated as a side effect
    assert_eq!(controller.key(), "c1");
}

#[tokio::test(start_paused = true)]
async fn later_initiated_attempt_wins_even_if_it_settles_first() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let n = attempts.clone();

    // Attempt 1 is slow and stale; attempt 2 is fast and fresh.
    let controller = FetchController::new("c1", move |_key: &'static str| {
        let attempt = n.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt == 1 {
                sleep(Duration::from_millis(100)).await;
                Ok::<_, ApiError>("slow-old")
            } else {
                sleep(Duration::from_millis(10)).await;
                Ok("fast-new")
            }
        }
    });

    // initiated while attempt 1 is still in flight
    controller.refetch();

    // let both settle; attempt 1 settles last but must be discarded
    sleep(Duration::from_millis(200)).await;
    let state = controller.state();
    assert_eq!(state.data, Some("fast-new"));
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_refetch_keeps_previous_data() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let n = attempts.clone();

    let controller = FetchController::new(7u32, move |_key: u32| {
        let attempt = n.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt == 1 {
                Ok::<_, ApiError>("healthy")
            } else {
                Err(ApiError::Transport("connection refused".to_string()))
            }
        }
    });

    sleep(Duration::from_millis(1)).await;
    assert_eq!(controller.state().data, Some("healthy"));

    controller.refetch();
    sleep(Duration::from_millis(1)).await;

    let state = controller.state();
    assert_eq!(state.data, Some("healthy"), "stale data must be retained");
    assert!(!state.loading);
    assert!(matches!(state.error, Some(ApiError::Transport(_))));
}

#[tokio::test(start_paused = true)]
async fn first_ever_failure_leaves_data_absent() {
    let controller = FetchController::new(0u8, |_key: u8| async {
        Err::<u32, _>(ApiError::Transport("no route to host".to_string()))
    });

    sleep(Duration::from_millis(1)).await;
    let state = controller.state();
    assert!(state.data.is_none());
    assert!(!state.loading);
    assert!(state.error.is_some());
    assert!(controller.last_updated().is_none());
}

#[tokio::test(start_paused = true)]
async fn refetch_clears_error_and_sets_loading_immediately() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let n = attempts.clone();

    let controller = FetchController::new((), move |_key: ()| {
        let attempt = n.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt == 1 {
                Err::<u32, _>(ApiError::Transport("boom".to_string()))
            } else {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    });

    sleep(Duration::from_millis(1)).await;
    assert!(controller.state().error.is_some());

    controller.refetch();
    // observed synchronously, before the new attempt settles
    let state = controller.state();
    assert!(state.loading);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn key_change_resets_state_before_new_attempt_settles() {
    let controller = FetchController::new("a", move |key: &'static str| async move {
        if key == "a" {
            sleep(Duration::from_millis(5)).await;
            Ok::<_, ApiError>("data-for-a")
        } else {
            std::future::pending::<()>().await;
            unreachable!()
        }
    });

    sleep(Duration::from_millis(20)).await;
    assert_eq!(controller.state().data, Some("data-for-a"));
    assert!(controller.last_updated().is_some());

    controller.set_key("b");

    // synchronous reset, no await in between
    let state = controller.state();
    assert!(state.data.is_none());
    assert!(state.loading);
    assert!(state.error.is_none());
    assert_eq!(controller.key(), "b");
    assert!(controller.last_updated().is_none());
}

#[tokio::test(start_paused = true)]
async fn in_flight_result_for_old_key_is_discarded() {
    let controller = FetchController::new("a", move |key: &'static str| async move {
        if key == "a" {
            // still in flight when the key changes
            sleep(Duration::from_millis(50)).await;
            Ok::<_, ApiError>("data-for-a")
        } else {
            std::future::pending::<()>().await;
            unreachable!()
        }
    });

    sleep(Duration::from_millis(10)).await;
    controller.set_key("b");

    // let the old key's attempt settle; it lost its right to write
    sleep(Duration::from_millis(100)).await;
    let state = controller.state();
    assert!(state.data.is_none());
    assert!(state.loading);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn unchanged_key_is_a_no_op() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let controller = FetchController::new("a".to_string(), move |_key: String| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(1u8)
        }
    });

    sleep(Duration::from_millis(1)).await;
    assert!(!controller.set_key("a".to_string()));
    sleep(Duration::from_millis(1)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state().data, Some(1));
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_every_settle() {
    let controller =
        FetchController::new(0u32, |_key: u32| async { Ok::<_, ApiError>("fresh") });
    let mut rx = controller.subscribe();

    loop {
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        if state.is_settled() {
            assert_eq!(state.data, Some("fresh"));
            break;
        }
    }
}
