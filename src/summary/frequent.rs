use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

/// Counts word occurrences and emits the `top` most frequent, joined with
/// `", "`, once the input is exhausted.
///
/// The sort is stable and descending by count; ties keep first-seen order.
/// Fewer distinct words than `top` emits the whole distinct set.
/// Cancellation before exhaustion emits nothing.
pub struct FrequentWords {
    top: usize,
}

impl FrequentWords {
    pub fn new(top: usize) -> Self {
        Self { top }
    }
}

#[async_trait]
impl Pipe<String, String> for FrequentWords {
    fn stage_name(&self) -> &'static str {
        "frequent_words"
    }

    async fn process(
        &self,
        mut input: Receiver<String>,
        output: Sender<String>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(tracing::Level::DEBUG, event = "fanpipe.cancelled", stage = "frequent_words", where_ = "recv", "fanpipe.cancelled");
                    return Ok(());
                },
                msg = input.recv() => {
                    let Some(word) = msg else { break; };
                    let count = counts.entry(word.clone()).or_insert(0);
                    if *count == 0 {
                        order.push(word);
                    }
                    *count += 1;
                }
            }
        }

        // A cancellation racing the input closure must still win: emit only
        // on a clean exhaustion.
        if cancel.is_cancelled() {
            return Ok(());
        }

        order.sort_by(|a, b| {
            let ca = counts.get(a).copied().unwrap_or(0);
            let cb = counts.get(b).copied().unwrap_or(0);
            cb.cmp(&ca)
        });
        let top = self.top.min(order.len());
        let line = order[..top].join(", ");

        tokio::select! {
            _ = cancel.cancelled() => {}
            sent = output.send(line) => {
                let _ = sent;
            }
        }
        Ok(())
    }
}
