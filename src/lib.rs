//! # fanpipe
//!
//! **Cancellable fan-out/fan-in streaming pipelines in Rust.**
//!
//! `fanpipe` is a Rust crate for composing **concurrent**, **cancellable**
//! pipeline graphs out of small stage primitives: sources, transforms,
//! many-to-one merges, one-to-many broadcasts, and bounded takes that shut
//! their producers down the moment enough data has flowed.
//!
//! It is designed around a few hard requirements:
//!
//! - bounded channels everywhere (back-pressure, not buffering)
//! - prompt, race-free cancellation across arbitrary fan-out/fan-in shapes
//! - no leaked tasks: when a pipeline returns, its stages have returned
//! - composable, generically typed stages
//!
//! ## Core Model
//!
//! A stage implements the [`Pipe`] trait and talks to its neighbours through
//! bounded Tokio channels. Linear sections compose with [`PipeExt`]; graph
//! sections (merging parallel producers, duplicating a stream) are wired
//! with [`fan_in`] and [`broadcast`], which work on channel endpoints
//! directly. [`TakePipe`] caps a stream and triggers an upstream
//! [`CancelToken`] when its quota is met.
//!
//! ```text
//! urls -> fetch x20 -> fan-in -> tokenize -> take(10k) -> broadcast(2) -> sinks
//! ```
//!
//! ## Example
//!
//! The word-summary topology, end to end:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fanpipe::fetch::http::HttpFetch;
//! use fanpipe::pipeline::cancel::CancelToken;
//! use fanpipe::report::{self, ReportConfig};
//! use fanpipe::source::urls::UrlRange;
//!
//! #[tokio::main]
//! async fn main() -> fanpipe::error::Result<()> {
//!     let urls = UrlRange::new("https://rfc-editor.org/rfc/rfc{}.txt", 100..=130);
//!     let fetcher = Arc::new(HttpFetch::new());
//!     let shutdown = CancelToken::default();
//!
//!     let report = report::run(urls, fetcher, ReportConfig::default(), shutdown).await?;
//!
//!     println!("Longest words: {}", report.longest);
//!     println!("Most frequent words: {}", report.frequent);
//!     Ok(())
//! }
//! ```
//!
//! ## Cancellation Contract
//!
//! Every blocking channel operation inside a stage races a [`CancelToken`],
//! so no task stays parked once its scope is cancelled. Triggering a token
//! is idempotent: concurrent triggers collapse into one transition and every
//! waiter observes it, including waiters that subscribe afterwards.
//!
//! Topologies that cap a stream use **two** token instances: an upstream one
//! scoped to the producer side (owned and triggered by the take stage) and a
//! downstream one scoped to the consumer side (owned by the caller). Hitting
//! the cap stops production without cutting off consumers still working
//! through the items that already made it past the cap.
//!
//! ## API Contracts
//!
//! - Streams are closed exactly once, by their producing stage returning.
//! - A stage that cannot send because downstream closed exits gracefully.
//! - Fan-in preserves per-input order; cross-input order is unspecified.
//! - Broadcast delivers each item to every output before reading the next;
//!   the slowest consumer paces the set.
//! - Failed fetches travel through the stream as typed [`Page`] values; one
//!   bad document never kills sibling fetchers.
//!
//! ## Observability
//!
//! With the default `tracing` feature each stage runs inside a
//! `fanpipe.stage` span and emits structured events such as
//! `fanpipe.cancelled`, `fanpipe.downstream.closed`,
//! `fanpipe.take.quota_reached`, and `fanpipe.fetch.failed`.
//!
//! Minimal subscriber setup:
//!
//! ```ignore
//! use tracing_subscriber::fmt;
//!
//! fn main() {
//!     fmt()
//!         .with_target(false)
//!         .with_env_filter("fanpipe=info")
//!         .init();
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing` *(default)*: structured spans and events per stage.
//! - `http` *(default)*: the [`HttpFetch`] collaborator and the `fanpipe`
//!   binary.
//!
//! [`Pipe`]: pipeline::pipe::Pipe
//! [`PipeExt`]: pipeline::chain::PipeExt
//! [`fan_in`]: pipeline::fan_in::fan_in
//! [`broadcast`]: pipeline::broadcast::broadcast
//! [`TakePipe`]: pipeline::take::TakePipe
//! [`CancelToken`]: pipeline::cancel::CancelToken
//! [`Page`]: fetch::Page
//! [`HttpFetch`]: fetch::http::HttpFetch

pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod summary;
pub mod token;

pub mod prelude {
    //! Convenient imports for most `fanpipe` users.

    pub use crate::pipeline::broadcast::broadcast;
    pub use crate::pipeline::cancel::CancelToken;
    pub use crate::pipeline::chain::PipeExt;
    pub use crate::pipeline::fan_in::fan_in;
    pub use crate::pipeline::pipe::Pipe;
    pub use crate::pipeline::runtime::Runtime;
    pub use crate::pipeline::take::TakePipe;
}
