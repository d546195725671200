use std::sync::Arc;

use crate::error::{Error, Result};
use crate::fetch::{DiscardFailures, Fetch, FetchPipe};
use crate::pipeline::broadcast::broadcast;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::chain::PipeExt;
use crate::pipeline::fan_in::fan_in;
use crate::pipeline::pipe::Pipe;
use crate::pipeline::runtime::Runtime;
use crate::pipeline::shared::SharedReceiver;
use crate::pipeline::take::TakePipe;
use crate::summary::frequent::FrequentWords;
use crate::summary::longest::LongestWords;
use crate::token::words::WordTokenizer;

pub struct ReportConfig {
    /// Parallel download stages competing for the URL queue.
    pub fetchers: usize,
    /// Word-stream cap; reaching it shuts the producer side down.
    pub word_cap: usize,
    /// Entries in each summary.
    pub top: usize,
    /// Channel capacity between stages. 1 keeps handoff synchronous.
    pub buffer: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fetchers: 20,
            word_cap: 10_000,
            top: 10,
            buffer: 1,
        }
    }
}

pub struct Report {
    pub longest: String,
    pub frequent: String,
}

/// Wire and run the full word-summary topology:
///
/// ```text
/// urls -> fetch xK -> fan-in -> discard failures -> tokenize
///      -> take(word_cap) -> broadcast(2) -> {longest, frequent}
/// ```
///
/// Two cancellation scopes are in play. The producer side up to and
/// including the take runs under an internal upstream token, which the take
/// triggers when the word cap is reached. Everything after the broadcast
/// runs under the caller's `shutdown` token, so capping production never
/// cuts off the sinks mid-aggregation. An external `shutdown` is forwarded
/// to the upstream scope, stopping both sides.
///
/// Every stage task is joined before returning; the first stage error wins.
/// If `shutdown` fires before both summaries are produced, the result is
/// [`Error::Cancelled`].
pub async fn run<S, F>(
    urls: S,
    fetcher: Arc<F>,
    config: ReportConfig,
    shutdown: CancelToken,
) -> Result<Report>
where
    S: Pipe<(), String> + Send + Sync + 'static,
    F: Fetch + 'static,
{
    let rt = Runtime::new().buffer(config.buffer);
    let upstream = CancelToken::default();

    let watcher = {
        let shutdown = shutdown.clone();
        let upstream = upstream.clone();
        tokio::spawn(async move {
            shutdown.cancelled().await;
            upstream.cancel();
        })
    };

    let (urls_rx, urls_handle) = rt.source(&upstream, urls);
    let url_queue = SharedReceiver::new(urls_rx);

    let mut stage_handles = vec![urls_handle];
    let mut page_rxs = Vec::with_capacity(config.fetchers);
    for _ in 0..config.fetchers {
        let (rx, handle) = rt.source(&upstream, FetchPipe::new(url_queue.clone(), fetcher.clone()));
        page_rxs.push(rx);
        stage_handles.push(handle);
    }

    let (pages_rx, fan_in_handle) = fan_in(&upstream, page_rxs, config.buffer);

    let (words_rx, words_handle) =
        rt.attach(&upstream, pages_rx, DiscardFailures.pipe(WordTokenizer::new()));
    stage_handles.push(words_handle);

    let (capped_rx, take_handle) = rt.attach(
        &upstream,
        words_rx,
        TakePipe::new(config.word_cap, upstream.clone()),
    );
    stage_handles.push(take_handle);

    let (branches, broadcast_handle) = broadcast(&shutdown, capped_rx, 2, config.buffer);
    let mut branches = branches.into_iter();
    let (Some(longest_in), Some(frequent_in)) = (branches.next(), branches.next()) else {
        return Err(Error::pipeline("broadcast returned too few outputs"));
    };

    let (mut longest_rx, longest_handle) =
        rt.attach(&shutdown, longest_in, LongestWords::new(config.top));
    let (mut frequent_rx, frequent_handle) =
        rt.attach(&shutdown, frequent_in, FrequentWords::new(config.top));
    stage_handles.push(longest_handle);
    stage_handles.push(frequent_handle);

    let (longest, frequent) = tokio::join!(longest_rx.recv(), frequent_rx.recv());

    // Quiescence: every stage task must have ended by now; a stage error
    // takes precedence over the summary values.
    for handle in stage_handles {
        handle.await??;
    }
    fan_in_handle.await?;
    broadcast_handle.await?;
    watcher.abort();

    match (longest, frequent) {
        (Some(longest), Some(frequent)) => Ok(Report { longest, frequent }),
        _ => Err(Error::Cancelled),
    }
}
