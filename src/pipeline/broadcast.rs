use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

use crate::pipeline::cancel::CancelToken;

/// Duplicate one stream into `n` independent streams.
///
/// A single reader delivers each item to every output before pulling the
/// next, so the whole set advances at the pace of its slowest consumer. That
/// stall is the back-pressure policy; there is no buffering beyond the
/// per-output channel capacity.
///
/// All outputs close together when the input closes or cancellation fires.
/// An output whose consumer disappears mid-stream is dropped from the
/// delivery set; once the last consumer of a non-empty set is gone the
/// reader stops and the upstream observes ordinary closure. With `n == 0`
/// the reader drains the input to closure and forwards nothing.
pub fn broadcast<T: Clone + Send + 'static>(
    cancel: &CancelToken,
    mut input: Receiver<T>,
    n: usize,
    buffer: usize,
) -> (Vec<Receiver<T>>, JoinHandle<()>) {
    let mut senders: Vec<Sender<T>> = Vec::with_capacity(n);
    let mut receivers = Vec::with_capacity(n);
    for _ in 0..n {
        let (tx, rx) = mpsc::channel::<T>(buffer.max(1));
        senders.push(tx);
        receivers.push(rx);
    }

    let had_consumers = n > 0;
    let cancel = cancel.clone();
    let reader = tokio::spawn(async move {
        'read: loop {
            let item = tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(item) = msg else { break; };
                    item
                }
            };

            let mut idx = 0;
            while idx < senders.len() {
                let sent = tokio::select! {
                    _ = cancel.cancelled() => break 'read,
                    sent = senders[idx].send(item.clone()) => sent,
                };
                if sent.is_ok() {
                    idx += 1;
                } else {
                    senders.remove(idx);
                }
            }

            if had_consumers && senders.is_empty() {
                break;
            }
        }
    });

    (receivers, reader)
}
