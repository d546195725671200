use std::time::Duration;

use async_trait::async_trait;
use fanpipe::error::Result;
use fanpipe::pipeline::cancel::CancelToken;
use fanpipe::pipeline::pipe::Pipe;
use fanpipe::pipeline::runtime::Runtime;
use tokio::sync::mpsc::{Receiver, Sender};

struct NeverEnding;

#[async_trait]
impl Pipe<(), ()> for NeverEnding {
    async fn process(
        &self,
        mut input: Receiver<()>,
        _output: Sender<()>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        let _ = input.recv().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            }
        }

        Ok(())
    }
}

#[tokio::test]
async fn cancel_stops_pipeline() -> Result<()> {
    let rt = Runtime::new().buffer(8);
    let (tx, _rx, cancel, handle) = rt.spawn(NeverEnding);

    tx.send(()).await.ok();
    cancel.cancel();

    // must finish quickly; hanging here is the failure mode
    handle.await??;
    Ok(())
}

#[tokio::test]
async fn repeated_cancel_is_a_noop() {
    let token = CancelToken::default();
    token.cancel();
    token.cancel();
    token.cancel();
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn concurrent_cancel_is_safe() {
    let token = CancelToken::default();

    let mut triggers = Vec::new();
    for _ in 0..8 {
        let token = token.clone();
        triggers.push(tokio::spawn(async move { token.cancel() }));
    }
    for trigger in triggers {
        trigger.await.expect("trigger task panicked");
    }

    assert!(token.is_cancelled());
}

#[tokio::test]
async fn all_waiters_observe_the_transition() {
    let token = CancelToken::default();

    let mut waiters = Vec::new();
    for _ in 0..4 {
        let token = token.clone();
        waiters.push(tokio::spawn(async move { token.cancelled().await }));
    }

    // Let waiters park before triggering.
    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    for waiter in waiters {
        tokio::time::timeout(Duration::from_millis(300), waiter)
            .await
            .expect("waiter missed the cancellation")
            .expect("waiter task panicked");
    }
}

#[tokio::test]
async fn waiting_after_cancel_returns_immediately() {
    let token = CancelToken::default();
    token.cancel();

    tokio::time::timeout(Duration::from_millis(100), token.cancelled())
        .await
        .expect("cancelled() must resolve immediately on a triggered token");
}

#[tokio::test]
async fn cancel_racing_registration_is_not_lost() {
    // Hammer the cancel()/cancelled() race; a lost wakeup shows up as a hang.
    for _ in 0..200 {
        let token = CancelToken::default();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };
        let trigger = {
            let token = token.clone();
            tokio::spawn(async move { token.cancel() })
        };

        tokio::time::timeout(Duration::from_millis(500), waiter)
            .await
            .expect("waiter lost a racing cancellation")
            .expect("waiter task panicked");
        trigger.await.expect("trigger task panicked");
    }
}
