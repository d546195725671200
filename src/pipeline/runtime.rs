use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

pub struct Runtime {
    buffer: usize,
}

impl Runtime {
    pub fn new() -> Self {
        Self { buffer: 128 }
    }

    pub fn buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Spawn a standalone pipe with fresh endpoints and its own token.
    pub fn spawn<I, O, P>(
        &self,
        pipe: P,
    ) -> (
        mpsc::Sender<I>,
        mpsc::Receiver<O>,
        CancelToken,
        JoinHandle<Result<()>>,
    )
    where
        I: Send + 'static,
        O: Send + 'static,
        P: Pipe<I, O> + Send + Sync + 'static,
    {
        let (tx_in, rx_in) = mpsc::channel::<I>(self.buffer);
        let cancel = CancelToken::default();
        let (rx_out, handle) = self.attach(&cancel, rx_in, pipe);
        (tx_in, rx_out, cancel, handle)
    }

    /// Spawn a pipe onto an existing input stream, under a caller-owned
    /// token. This is the graph-wiring entry point: the caller decides which
    /// cancellation scope the stage belongs to.
    pub fn attach<I, O, P>(
        &self,
        cancel: &CancelToken,
        input: mpsc::Receiver<I>,
        pipe: P,
    ) -> (mpsc::Receiver<O>, JoinHandle<Result<()>>)
    where
        I: Send + 'static,
        O: Send + 'static,
        P: Pipe<I, O> + Send + Sync + 'static,
    {
        let (tx_out, rx_out) = mpsc::channel::<O>(self.buffer);
        let buffer = self.buffer;
        let cancel = cancel.clone();

        #[cfg(feature = "tracing")]
        let handle = {
            use tracing::Instrument;
            let stage = pipe.stage_name();
            let span = tracing::info_span!("fanpipe.stage", stage = stage, buffer = buffer);
            tokio::spawn(
                async move { pipe.process(input, tx_out, buffer, cancel).await }.instrument(span),
            )
        };

        #[cfg(not(feature = "tracing"))]
        let handle = tokio::spawn(async move { pipe.process(input, tx_out, buffer, cancel).await });

        (rx_out, handle)
    }

    /// Attach a source stage, delivering its start signal up front.
    pub fn source<O, P>(
        &self,
        cancel: &CancelToken,
        pipe: P,
    ) -> (mpsc::Receiver<O>, JoinHandle<Result<()>>)
    where
        O: Send + 'static,
        P: Pipe<(), O> + Send + Sync + 'static,
    {
        let (tx_start, rx_start) = mpsc::channel::<()>(1);
        // Capacity 1 on an empty channel, cannot fail.
        let _ = tx_start.try_send(());
        drop(tx_start);
        self.attach(cancel, rx_start, pipe)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
