use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

/// Accumulates distinct words and emits the `top` longest, joined with
/// `", "`, once the input is exhausted.
///
/// The sort is stable and descending by length, so equally long words keep
/// their first-seen order. Fewer distinct words than `top` emits the whole
/// distinct set. Cancellation before exhaustion emits nothing.
pub struct LongestWords {
    top: usize,
}

impl LongestWords {
    pub fn new(top: usize) -> Self {
        Self { top }
    }
}

#[async_trait]
impl Pipe<String, String> for LongestWords {
    fn stage_name(&self) -> &'static str {
        "longest_words"
    }

    async fn process(
        &self,
        mut input: Receiver<String>,
        output: Sender<String>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let mut distinct: Vec<String> = Vec::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(tracing::Level::DEBUG, event = "fanpipe.cancelled", stage = "longest_words", where_ = "recv", "fanpipe.cancelled");
                    return Ok(());
                },
                msg = input.recv() => {
                    let Some(word) = msg else { break; };
                    if seen.insert(word.clone()) {
                        distinct.push(word);
                    }
                }
            }
        }

        // A cancellation racing the input closure must still win: emit only
        // on a clean exhaustion.
        if cancel.is_cancelled() {
            return Ok(());
        }

        distinct.sort_by(|a, b| b.len().cmp(&a.len()));
        let top = self.top.min(distinct.len());
        let line = distinct[..top].join(", ");

        tokio::select! {
            _ = cancel.cancelled() => {}
            sent = output.send(line) => {
                let _ = sent;
            }
        }
        Ok(())
    }
}
