use std::sync::Arc;

use fanpipe::error::Result;
use fanpipe::fetch::http::HttpFetch;
use fanpipe::pipeline::cancel::CancelToken;
use fanpipe::report::{self, ReportConfig};
use fanpipe::source::urls::UrlRange;

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fanpipe=info")),
        )
        .init();

    let urls = UrlRange::new("https://rfc-editor.org/rfc/rfc{}.txt", 100..=130);
    let fetcher = Arc::new(HttpFetch::new());
    let shutdown = CancelToken::default();

    let report = report::run(urls, fetcher, ReportConfig::default(), shutdown).await?;

    println!("Longest words: {}", report.longest);
    println!("Most frequent words: {}", report.frequent);
    Ok(())
}
