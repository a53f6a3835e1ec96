use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::channel::{process_channel, ViewSource};
use crate::config::ScoutConfig;
use crate::export::{export, Exported};
use crate::queries;
use crate::record::ChannelRecord;
use crate::search::collect_all_channels;
use crate::telemetry;
use crate::telemetry::ops::run::Phase;
use crate::util::throttle::DelayArgs;
use crate::youtube::fetch::Fetcher;

pub const DEFAULT_STEM: &str = "channels_auto_ru";

#[derive(clap::Args, Debug, Clone)]
pub struct RunCmd {
    /// Directory the CSV and XLSX files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// File name (without extension) shared by both exports
    #[arg(long, default_value = DEFAULT_STEM)]
    pub stem: String,
    /// Search query; repeat to replace the built-in list
    #[arg(long = "query")]
    pub queries: Vec<String>,
    #[arg(long)] pub max_queries: Option<usize>,
    #[arg(long)] pub max_channels: Option<usize>,
    #[command(flatten)] pub delay: DelayArgs,
    /// Estimate 30-day views from the videos tab when no API key is set
    #[arg(long, default_value_t = false)]
    pub html_recency: bool,
    /// Print what would run and exit without network I/O
    #[arg(long, default_value_t = false)]
    pub plan: bool,
}

impl Default for RunCmd {
    fn default() -> Self {
        RunCmd {
            out_dir: PathBuf::from("."),
            stem: DEFAULT_STEM.to_string(),
            queries: Vec::new(),
            max_queries: None,
            max_channels: None,
            delay: DelayArgs::default(),
            html_recency: false,
            plan: false,
        }
    }
}

#[derive(Serialize)]
struct RunPlan {
    queries: Vec<String>,
    max_channels: Option<usize>,
    views_source: &'static str,
    min_delay_ms: u64,
    max_delay_ms: u64,
    csv: PathBuf,
    xlsx: PathBuf,
}

#[derive(Serialize)]
struct RunResult {
    discovered: usize,
    processed: usize,
    skipped: usize,
    exported: Option<Exported>,
}

fn views_source(cfg: &ScoutConfig, html_recency: bool) -> &'static str {
    match (cfg.stats_enabled(), html_recency) {
        (true, _) => "api",
        (false, true) => "html",
        (false, false) => "off",
    }
}

/// Sorted, capped processing order.
fn processing_order(channels: impl IntoIterator<Item = String>, max: Option<usize>) -> Vec<String> {
    let mut ordered: Vec<String> = channels.into_iter().collect();
    ordered.sort();
    ordered.dedup();
    if let Some(n) = max { ordered.truncate(n); }
    ordered
}

pub async fn run(cfg: &ScoutConfig, args: RunCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::run();
    let queries = queries::select(&args.queries, args.max_queries);
    let _g = log.root_span_kv([
        ("queries", queries.len().to_string()),
        ("max_channels", format!("{:?}", args.max_channels)),
        ("out_dir", args.out_dir.display().to_string()),
        ("stem", args.stem.clone()),
        ("views", views_source(cfg, args.html_recency).to_string()),
    ]).entered();

    if args.plan {
        let _p = log.span(&Phase::Plan).entered();
        let plan = RunPlan {
            queries: queries.clone(),
            max_channels: args.max_channels,
            views_source: views_source(cfg, args.html_recency),
            min_delay_ms: args.delay.min_delay_ms,
            max_delay_ms: args.delay.max_delay_ms,
            csv: args.out_dir.join(format!("{}.csv", args.stem)),
            xlsx: args.out_dir.join(format!("{}.xlsx", args.stem)),
        };
        if telemetry::config::json_mode() {
            log.plan(&plan)?;
        } else {
            println!("Plan: {} queries, views from {}", plan.queries.len(), plan.views_source);
            println!("  → {}", plan.csv.display());
            println!("  → {}", plan.xlsx.display());
        }
        return Ok(());
    }

    log.info("🚀 Collecting auto-related YouTube channels");
    let fetcher = Fetcher::new(args.delay.throttle())?;

    let channels = {
        let _d = log.span_kv(&Phase::Discover, [("queries", queries.len().to_string())]).entered();
        collect_all_channels(&fetcher, &telemetry::search(), &queries).await
    };
    let discovered = channels.len();
    log.info_kv("🔎 Total unique channels discovered", [("channels", discovered.to_string())]);

    let order = processing_order(channels, args.max_channels);
    let channel_log = telemetry::channel();
    let views = ViewSource::from_config(cfg, args.html_recency, &channel_log)?;

    let mut rows: Vec<ChannelRecord> = Vec::with_capacity(order.len());
    let mut skipped = 0usize;
    {
        let _p = log.span_kv(&Phase::Process, [("channels", order.len().to_string())]).entered();
        let total = order.len();
        for (i, url) in order.iter().enumerate() {
            log.info(format!("📺 [{}/{}] {}", i + 1, total, url));
            match process_channel(&fetcher, &views, &channel_log, url).await {
                Ok(rec) => rows.push(rec),
                Err(e) => { skipped += 1; log.warn_kv("⚠️ skipping channel", [("url", url.clone()), ("error", e.to_string())]); }
            }
        }
    }

    let exported = {
        let _e = log.span(&Phase::Export).entered();
        let out = export(&args.out_dir, &args.stem, &rows)?;
        match &out {
            Some(x) => log.info(format!("💾 Saved {} rows to {} and {}", x.rows, x.csv.display(), x.xlsx.display())),
            None => log.warn("⚠️ No data collected; nothing to export"),
        }
        out
    };

    log.totals(discovered, rows.len(), skipped);
    if telemetry::config::json_mode() {
        let result = RunResult { discovered, processed: rows.len(), skipped, exported };
        log.result_timed(&result, started.elapsed())?;
    }
    log.info("✅ Done");
    Ok(())
}
