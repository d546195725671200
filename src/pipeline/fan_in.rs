use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;

use crate::pipeline::cancel::CancelToken;

/// Merge K independent streams into one.
///
/// One forwarding task runs per input; each forwards until its input closes,
/// cancellation fires, or the merged consumer goes away. The merged stream
/// closes exactly once, when the last forwarder drops its sender. Items from
/// different inputs interleave in no particular order; items from the same
/// input keep their relative order.
///
/// The returned handle resolves once every forwarder has finished, which is
/// the moment the merged stream is closed. With no inputs the merged stream
/// closes immediately.
pub fn fan_in<T: Send + 'static>(
    cancel: &CancelToken,
    inputs: Vec<Receiver<T>>,
    buffer: usize,
) -> (Receiver<T>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<T>(buffer.max(1));

    let mut forwarders = Vec::with_capacity(inputs.len());
    for mut input in inputs {
        let tx = tx.clone();
        let cancel = cancel.clone();
        forwarders.push(tokio::spawn(async move {
            loop {
                let item = tokio::select! {
                    _ = cancel.cancelled() => break,
                    msg = input.recv() => {
                        let Some(item) = msg else { break; };
                        item
                    }
                };
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = tx.send(item) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        }));
    }
    drop(tx);

    let supervisor = tokio::spawn(async move {
        for forwarder in forwarders {
            let _ = forwarder.await;
        }
    });

    (rx, supervisor)
}
