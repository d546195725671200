use async_trait::async_trait;
use bytes::Bytes;
use regex::Regex;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::{Error, Result};
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

const WORD_PATTERN: &str = "[a-zA-Z]+";

/// Splits page bodies into lowercased words, one output item per match.
///
/// A page with no matches emits nothing, which is a valid outcome. Bodies
/// are decoded lossily, so stray non-UTF-8 bytes cannot fail the stage.
#[derive(Debug)]
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Self {
        // The default pattern is a compile-time constant.
        Self {
            pattern: Regex::new(WORD_PATTERN).expect("default word pattern compiles"),
        }
    }

    /// Tokenize with a custom pattern instead of `[a-zA-Z]+`.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern =
            Regex::new(pattern).map_err(|err| Error::stage("tokenize", err.to_string()))?;
        Ok(Self { pattern })
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipe<Bytes, String> for WordTokenizer {
    fn stage_name(&self) -> &'static str {
        "tokenize"
    }

    async fn process(
        &self,
        mut input: Receiver<Bytes>,
        output: Sender<String>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        loop {
            let data = tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(data) = msg else { break; };
                    data
                }
            };

            let text = String::from_utf8_lossy(&data);
            for word in self.pattern.find_iter(&text) {
                let word = word.as_str().to_ascii_lowercase();
                tokio::select! {
                    _ = cancel.cancelled() => {
                        #[cfg(feature = "tracing")]
                        tracing::event!(tracing::Level::DEBUG, event = "fanpipe.cancelled", stage = "tokenize", where_ = "send", "fanpipe.cancelled");
                        return Ok(());
                    },
                    sent = output.send(word) => {
                        if sent.is_err() {
                            #[cfg(feature = "tracing")]
                            tracing::event!(tracing::Level::INFO, event = "fanpipe.downstream.closed", stage = "tokenize", "fanpipe.downstream.closed");
                            return Ok(());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
