use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::queries;
use crate::telemetry::{self, ctx::LogCtx};
use crate::telemetry::ops::search::{Phase, Search};
use crate::util::throttle::DelayArgs;
use crate::youtube::fetch::Fetcher;
use crate::youtube::initial_data::extract_initial_data;
use crate::youtube::search::{build_search_url, channels_from_initial_data};

#[derive(clap::Args, Debug, Clone, Default)]
pub struct SearchCmd {
    /// Search query; repeat to replace the built-in list
    #[arg(long = "query")] pub queries: Vec<String>,
    #[arg(long)] pub max_queries: Option<usize>,
    #[command(flatten)] pub delay: DelayArgs,
}

#[derive(Serialize)]
struct SearchResult {
    queries: usize,
    channels: Vec<String>,
}

/// Channels listed on the results page of one query. Empty when the page
/// could not be fetched or carried no initial data.
pub async fn search_channels(fetcher: &Fetcher, log: &LogCtx<Search>, query: &str) -> BTreeSet<String> {
    let url = build_search_url(query);
    let html = {
        let _f = log.span_kv(&Phase::FetchResults, [("url", url.clone())]).entered();
        fetcher.fetch_html(&url).await
    };
    let Some(html) = html else { return BTreeSet::new() };

    let _p = log.span(&Phase::ParseResults).entered();
    match extract_initial_data(&html) {
        Some(data) => channels_from_initial_data(&data),
        None => { log.warn_kv("⚠️ ytInitialData missing", [("query", query.to_string())]); BTreeSet::new() }
    }
}

/// Run every query in order and merge what they find.
pub async fn collect_all_channels(fetcher: &Fetcher, log: &LogCtx<Search>, queries: &[String]) -> BTreeSet<String> {
    let mut all = BTreeSet::new();
    for q in queries {
        let _q = log.span_kv(&Phase::Query, [("query", q.clone())]).entered();
        let found = search_channels(fetcher, log, q).await;
        let before = all.len();
        all.extend(found.iter().cloned());
        log.query_summary(q, found.len(), all.len(), all.len() - before);
    }
    all
}

pub async fn run(args: SearchCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::search();
    let queries = queries::select(&args.queries, args.max_queries);
    let _g = log.root_span_kv([
        ("queries", queries.len().to_string()),
        ("min_delay_ms", args.delay.min_delay_ms.to_string()),
        ("max_delay_ms", args.delay.max_delay_ms.to_string()),
    ]).entered();

    let fetcher = Fetcher::new(args.delay.throttle())?;
    let channels = collect_all_channels(&fetcher, &log, &queries).await;

    if telemetry::config::json_mode() {
        let result = SearchResult { queries: queries.len(), channels: channels.into_iter().collect() };
        log.result_timed(&result, started.elapsed())?;
    } else {
        for c in &channels { println!("{}", c); }
        log.info(format!("✅ {} unique channels from {} queries", channels.len(), queries.len()));
    }
    Ok(())
}
