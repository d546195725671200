use async_trait::async_trait;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

/// Forward the first `quota` items, then shut the producer side down.
///
/// Two ways out: the input closes before the quota is met, in which case the
/// output simply closes and `upstream` is left alone; or the quota is
/// reached, in which case the output closes *and* `upstream` is triggered so
/// every stage feeding this one stops instead of producing work nobody will
/// consume.
///
/// `upstream` must be a different token instance from whatever governs the
/// stages downstream of the take, otherwise capping production would also
/// kill the consumers still working through the forwarded items. Triggering
/// goes through [`CancelToken::cancel`], so a concurrent trigger from
/// elsewhere stays a safe no-op.
pub struct TakePipe {
    quota: usize,
    upstream: CancelToken,
}

impl TakePipe {
    pub fn new(quota: usize, upstream: CancelToken) -> Self {
        Self { quota, upstream }
    }
}

#[async_trait]
impl<T: Send + 'static> Pipe<T, T> for TakePipe {
    fn stage_name(&self) -> &'static str {
        "take"
    }

    async fn process(
        &self,
        mut input: Receiver<T>,
        output: Sender<T>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        let mut remaining = self.quota;

        while remaining > 0 {
            let item = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                msg = input.recv() => {
                    // Input exhausted under quota: close the output, leave
                    // the upstream signal untouched.
                    let Some(item) = msg else { return Ok(()); };
                    item
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                sent = output.send(item) => {
                    if sent.is_err() {
                        #[cfg(feature = "tracing")]
                        tracing::event!(tracing::Level::INFO, event = "fanpipe.downstream.closed", stage = "take", "fanpipe.downstream.closed");
                        return Ok(());
                    }
                }
            }
            remaining -= 1;
        }

        #[cfg(feature = "tracing")]
        tracing::event!(
            tracing::Level::DEBUG,
            event = "fanpipe.take.quota_reached",
            quota = self.quota,
            "fanpipe.take.quota_reached"
        );
        self.upstream.cancel();
        Ok(())
    }
}
