use std::ops::RangeInclusive;

use async_trait::async_trait;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

/// Generates one URL per integer in `range` by substituting it into the
/// `{}` placeholder of `pattern`.
pub struct UrlRange {
    pattern: String,
    range: RangeInclusive<u32>,
}

impl UrlRange {
    pub fn new(pattern: impl Into<String>, range: RangeInclusive<u32>) -> Self {
        Self {
            pattern: pattern.into(),
            range,
        }
    }
}

#[async_trait]
impl Pipe<(), String> for UrlRange {
    fn stage_name(&self) -> &'static str {
        "url_range"
    }

    async fn process(
        &self,
        mut input: Receiver<()>,
        output: Sender<String>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = input.recv() => {}
        }

        for i in self.range.clone() {
            let url = self.pattern.replace("{}", &i.to_string());
            tokio::select! {
                _ = cancel.cancelled() => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(tracing::Level::DEBUG, event = "fanpipe.cancelled", stage = "url_range", where_ = "send", "fanpipe.cancelled");
                    return Ok(());
                },
                sent = output.send(url) => {
                    if sent.is_err() {
                        #[cfg(feature = "tracing")]
                        tracing::event!(tracing::Level::INFO, event = "fanpipe.downstream.closed", stage = "url_range", "fanpipe.downstream.closed");
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}
