#[cfg(feature = "http")]
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::Result;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::pipe::Pipe;
use crate::pipeline::shared::SharedReceiver;

/// Retrieval collaborator: turns a URL into a raw page body.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// One fetched page. A failed fetch travels through the stream as a value
/// instead of tearing the stage down, so a single bad document never kills
/// its sibling fetchers or the rest of the pipeline.
pub struct Page {
    pub url: String,
    pub body: Result<Bytes>,
}

/// Source-shaped download stage. A pool of these shares one URL queue via
/// [`SharedReceiver`]; whichever member is idle picks up the next URL.
pub struct FetchPipe<F> {
    urls: SharedReceiver<String>,
    fetcher: Arc<F>,
}

impl<F> FetchPipe<F> {
    pub fn new(urls: SharedReceiver<String>, fetcher: Arc<F>) -> Self {
        Self { urls, fetcher }
    }
}

#[async_trait]
impl<F> Pipe<(), Page> for FetchPipe<F>
where
    F: Fetch + 'static,
{
    fn stage_name(&self) -> &'static str {
        "fetch"
    }

    async fn process(
        &self,
        mut input: Receiver<()>,
        output: Sender<Page>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = input.recv() => {}
        }

        loop {
            let url = tokio::select! {
                _ = cancel.cancelled() => break,
                msg = self.urls.recv() => {
                    let Some(url) = msg else { break; };
                    url
                }
            };

            let body = tokio::select! {
                _ = cancel.cancelled() => break,
                body = self.fetcher.fetch(&url) => body,
            };

            let page = Page { url, body };
            tokio::select! {
                _ = cancel.cancelled() => break,
                sent = output.send(page) => {
                    if sent.is_err() {
                        #[cfg(feature = "tracing")]
                        tracing::event!(tracing::Level::INFO, event = "fanpipe.downstream.closed", stage = "fetch", "fanpipe.downstream.closed");
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Forwards successful page bodies, drops failures with a diagnostic.
pub struct DiscardFailures;

#[async_trait]
impl Pipe<Page, Bytes> for DiscardFailures {
    fn stage_name(&self) -> &'static str {
        "discard_failures"
    }

    async fn process(
        &self,
        mut input: Receiver<Page>,
        output: Sender<Bytes>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                msg = input.recv() => {
                    let Some(page) = msg else { break; };
                    match page.body {
                        Ok(body) => {
                            if output.send(body).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            #[cfg(feature = "tracing")]
                            tracing::event!(
                                tracing::Level::WARN,
                                event = "fanpipe.fetch.failed",
                                url = %page.url,
                                error = %err,
                                "fanpipe.fetch.failed"
                            );
                            #[cfg(not(feature = "tracing"))]
                            let _ = err;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
