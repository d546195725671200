use async_trait::async_trait;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;

/// map: I -> N
pub struct MapPipe<F>(pub F);

#[async_trait]
impl<I, N, F> Pipe<I, N> for MapPipe<F>
where
    I: Send + 'static,
    N: Send + 'static,
    F: Fn(I) -> N + Send + Sync + 'static,
{
    fn stage_name(&self) -> &'static str {
        "map"
    }

    async fn process(
        &self,
        mut input: Receiver<I>,
        output: Sender<N>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(v) = msg else { break; };
                    if output.send((self.0)(v)).await.is_err() {
                        #[cfg(feature = "tracing")]
                        tracing::event!(tracing::Level::INFO, event = "fanpipe.downstream.closed", stage = "map", "fanpipe.downstream.closed");
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct FilterPipe<P>(pub P);

#[async_trait]
impl<T, P> Pipe<T, T> for FilterPipe<P>
where
    T: Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn stage_name(&self) -> &'static str {
        "filter"
    }

    async fn process(
        &self,
        mut input: Receiver<T>,
        output: Sender<T>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(v) = msg else { break; };
                    if (self.0)(&v) && output.send(v).await.is_err() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// filter_map: I -> Option<N>; `None` drops the item.
pub struct FilterMapPipe<F>(pub F);

#[async_trait]
impl<I, N, F> Pipe<I, N> for FilterMapPipe<F>
where
    I: Send + 'static,
    N: Send + 'static,
    F: Fn(I) -> Option<N> + Send + Sync + 'static,
{
    fn stage_name(&self) -> &'static str {
        "filter_map"
    }

    async fn process(
        &self,
        mut input: Receiver<I>,
        output: Sender<N>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(v) = msg else { break; };
                    let Some(mapped) = (self.0)(v) else { continue; };
                    if output.send(mapped).await.is_err() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct InspectPipe<F>(pub F);

#[async_trait]
impl<T, F> Pipe<T, T> for InspectPipe<F>
where
    T: Send + 'static,
    F: Fn(&T) + Send + Sync + 'static,
{
    fn stage_name(&self) -> &'static str {
        "inspect"
    }

    async fn process(
        &self,
        mut input: Receiver<T>,
        output: Sender<T>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(v) = msg else { break; };
                    (self.0)(&v);
                    if output.send(v).await.is_err() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
