use std::time::Instant;

use anyhow::{bail, Context, Result};
use url::Url;

use crate::config::ScoutConfig;
use crate::extract::profile::parse_about_page;
use crate::record::ChannelRecord;
use crate::telemetry::{self, ctx::LogCtx};
use crate::telemetry::ops::channel::{Channel, Phase};
use crate::util::throttle::DelayArgs;
use crate::youtube::data_api::DataApi;
use crate::youtube::fetch::Fetcher;
use crate::youtube::initial_data::extract_initial_data;
use crate::youtube::tab_url;
use crate::youtube::videos::{has_video_titles, recent_views};

#[derive(clap::Args, Debug, Clone)]
pub struct ChannelCmd {
    /// Channel URL, e.g. https://www.youtube.com/@handle
    pub url: String,
    /// Estimate 30-day views from the videos tab when no API key is set
    #[arg(long, default_value_t = false)]
    pub html_recency: bool,
    #[command(flatten)] pub delay: DelayArgs,
}

/// Where "Views Last 30 Days" comes from for a batch.
pub enum ViewSource {
    Api(DataApi),
    Html,
    Off,
}

impl ViewSource {
    /// Logs a warning when no statistics source is available.
    pub fn from_config(cfg: &ScoutConfig, html_recency: bool, log: &LogCtx<Channel>) -> Result<Self> {
        if let Some(api) = DataApi::from_config(cfg)? { return Ok(ViewSource::Api(api)); }
        if html_recency {
            log.warn("⚠️ YOUTUBE_API_KEY not set; estimating 30-day views from the videos tab");
            Ok(ViewSource::Html)
        } else {
            log.warn("⚠️ YOUTUBE_API_KEY not set; 'Views Last 30 Days' will be empty");
            Ok(ViewSource::Off)
        }
    }
}

/// Fetch and parse one channel. An unreachable about page still yields a
/// record carrying the URL; only a malformed URL is an error.
pub async fn process_channel(fetcher: &Fetcher, views: &ViewSource, log: &LogCtx<Channel>, channel_url: &str) -> Result<ChannelRecord> {
    let parsed = Url::parse(channel_url).with_context(|| format!("invalid channel url {:?}", channel_url))?;
    if !matches!(parsed.scheme(), "http" | "https") { bail!("unsupported scheme in {}", channel_url); }

    let about = tab_url(channel_url, "about");
    let html = {
        let _f = log.span_kv(&Phase::FetchAbout, [("url", about.clone())]).entered();
        fetcher.fetch_html(&about).await
    };

    let mut rec = match html {
        Some(html) => { let _e = log.span(&Phase::Extract).entered(); parse_about_page(channel_url, &html) }
        None => ChannelRecord::bare(channel_url),
    };

    rec.views_last_30_days = match views {
        ViewSource::Api(api) => { let _s = log.span(&Phase::Stats).entered(); api.views_last_30_days(fetcher, channel_url).await }
        ViewSource::Html => views_from_videos_tab(fetcher, log, channel_url).await,
        ViewSource::Off => String::new(),
    };
    Ok(rec)
}

async fn views_from_videos_tab(fetcher: &Fetcher, log: &LogCtx<Channel>, channel_url: &str) -> String {
    let _r = log.span(&Phase::Recency).entered();
    let Some(html) = fetcher.fetch_html(&tab_url(channel_url, "videos")).await else { return String::new() };
    let Some(data) = extract_initial_data(&html) else {
        log.warn_kv("⚠️ ytInitialData missing on videos tab", [("channel", channel_url.to_string())]);
        return String::new();
    };
    match recent_views(&data) {
        Some(total) => total.to_string(),
        None => {
            if !has_video_titles(&data) { log.debug(format!("no video renderers on {}", channel_url)); }
            String::new()
        }
    }
}

pub async fn run(cfg: &ScoutConfig, args: ChannelCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::channel();
    let _g = log.root_span_kv([
        ("url", args.url.clone()),
        ("html_recency", args.html_recency.to_string()),
        ("stats", cfg.stats_enabled().to_string()),
    ]).entered();

    let fetcher = Fetcher::new(args.delay.throttle())?;
    let views = ViewSource::from_config(cfg, args.html_recency, &log)?;
    let rec = process_channel(&fetcher, &views, &log, &args.url).await?;

    if telemetry::config::json_mode() {
        log.result_timed(&rec, started.elapsed())?;
    } else {
        println!("{}", serde_json::to_string_pretty(&rec)?);
        log.info(format!("✅ Parsed {}", rec.channel_url));
    }
    Ok(())
}
