use async_trait::async_trait;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;

/// A pipeline stage: consumes `I` items, produces `O` items.
///
/// A stage runs until its input closes or `cancel` fires, whichever comes
/// first. Dropping `output` on return is what closes the downstream stream,
/// so a stage must simply return when it is done. Every potentially blocking
/// channel operation inside `process` must race `cancel`.
#[async_trait]
pub trait Pipe<I: Send + 'static, O: Send + 'static>: Send + Sync {
    /// Stage label used in spans and events.
    fn stage_name(&self) -> &'static str {
        "stage"
    }

    async fn process(
        &self,
        input: Receiver<I>,
        output: Sender<O>,
        buffer: usize,
        cancel: CancelToken,
    ) -> Result<()>;
}
