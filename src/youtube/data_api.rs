// YouTube Data API v3: channel id resolution and recent view totals.

use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use super::fetch::Fetcher;
use super::initial_data::{extract_initial_data, str_at, walk_for_key};
use super::tab_url;
use crate::config::{ScoutConfig, API_TIMEOUT};
use crate::util::time::published_after_recent;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const MAX_SEARCH_PAGES: usize = 3;
const MAX_VIDEO_IDS: usize = 100;
const STATS_BATCH: usize = 50;

static CHANNEL_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/channel/([A-Za-z0-9_-]+)").expect("static regex"));
static HANDLE_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/@([^/?#]+)").expect("static regex"));
static USER_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/user/([^/?#]+)").expect("static regex"));
static CUSTOM_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/c/([^/?#]+)").expect("static regex"));
static CHANNEL_URL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/channel/(UC[\w-]+)").expect("static regex"));
static RAW_EXTERNAL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""externalId":"(UC[\w-]+)""#).expect("static regex"));
static RAW_CHANNEL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""channelId":"(UC[\w-]+)""#).expect("static regex"));

/// How a channel URL names its channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(String),
    Handle(String),
    User(String),
    Custom(String),
    Unknown,
}

impl ChannelRef {
    pub fn from_url(channel_url: &str) -> Self {
        let path = Url::parse(channel_url).map(|u| u.path().to_string()).unwrap_or_else(|_| channel_url.to_string());
        Self::from_path(&path)
    }

    pub fn from_path(path: &str) -> Self {
        let cap = |re: &Regex| re.captures(path).and_then(|c| c.get(1)).map(|m| decode(m.as_str()));
        if let Some(id) = cap(&*CHANNEL_PATH).filter(|id| id.starts_with("UC")) {
            return ChannelRef::Id(id);
        }
        if let Some(h) = cap(&*HANDLE_PATH) { return ChannelRef::Handle(h); }
        if let Some(u) = cap(&*USER_PATH) { return ChannelRef::User(u); }
        if let Some(c) = cap(&*CUSTOM_PATH) { return ChannelRef::Custom(c); }
        ChannelRef::Unknown
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s).map(|c| c.into_owned()).unwrap_or_else(|_| s.to_string())
}

fn items(data: &Value) -> &[Value] {
    data.get("items").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// First `UC…` id among `items[].id.channelId` / `items[].channelId`.
pub fn first_channel_id(data: &Value) -> Option<String> {
    items(data).iter().find_map(|item| {
        let id = item.pointer("/id/channelId").and_then(Value::as_str)
            .or_else(|| item.get("channelId").and_then(Value::as_str))?;
        id.starts_with("UC").then(|| id.to_string())
    })
}

/// Channel id from a channel page: metadata renderer first, then any
/// `externalId`/`channelId` in the page data, then the raw HTML.
pub fn channel_id_from_page(html: &str) -> Option<String> {
    if let Some(data) = extract_initial_data(html) {
        let external = str_at(&data, "/metadata/channelMetadataRenderer/externalId");
        if external.starts_with("UC") { return Some(external); }

        let channel_url = str_at(&data, "/metadata/channelMetadataRenderer/channelUrl");
        if let Some(c) = CHANNEL_URL_ID.captures(&channel_url) { return Some(c[1].to_string()); }

        for key in ["externalId", "channelId"] {
            let hit = walk_for_key(&data, key).into_iter()
                .filter_map(Value::as_str)
                .find(|v| v.starts_with("UC"));
            if let Some(id) = hit { return Some(id.to_string()); }
        }
    }
    [&*RAW_EXTERNAL_ID, &*RAW_CHANNEL_ID]
        .iter()
        .find_map(|re| re.captures(html).map(|c| c[1].to_string()))
}

pub fn video_ids_from_search(data: &Value) -> Vec<String> {
    items(data).iter()
        .filter_map(|item| item.pointer("/id/videoId").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Sum of `items[].statistics.viewCount` (sent as decimal strings).
pub fn sum_view_counts(data: &Value) -> u64 {
    items(data).iter()
        .filter_map(|item| item.pointer("/statistics/viewCount"))
        .filter_map(|v| match v {
            Value::String(s) => s.parse::<u64>().ok(),
            other => other.as_u64(),
        })
        .sum()
}

pub struct DataApi {
    client: Client,
    key: String,
}

impl DataApi {
    /// None when no key is configured.
    pub fn from_config(cfg: &ScoutConfig) -> Result<Option<Self>> {
        let Some(key) = cfg.api_key.clone() else { return Ok(None) };
        let client = Client::builder().timeout(API_TIMEOUT).build().context("build api client")?;
        Ok(Some(DataApi { client, key }))
    }

    async fn try_get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", API_BASE, endpoint);
        let data: Value = self.client.get(&url)
            .query(params)
            .query(&[("key", self.key.as_str())])
            .send().await?
            .error_for_status()?
            .json().await?;
        if !data.is_object() { bail!("{} returned a non-object response", endpoint); }
        if let Some(err) = data.get("error") {
            warn!(endpoint, error = %err, "Data API returned error");
        }
        Ok(data)
    }

    /// Failures are logged and come back as `Value::Null`.
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Value {
        match self.try_get(endpoint, params).await {
            Ok(v) => v,
            Err(e) => { warn!(endpoint, error = %e, "Data API request failed"); Value::Null }
        }
    }

    pub async fn resolve_channel_id(&self, fetcher: &Fetcher, channel_url: &str) -> Option<String> {
        match ChannelRef::from_url(channel_url) {
            ChannelRef::Id(id) => return Some(id),
            ChannelRef::Handle(handle) => {
                for candidate in [handle.clone(), format!("@{}", handle)] {
                    let data = self.get("channels", &[("part", "id".into()), ("forHandle", candidate)]).await;
                    if let Some(id) = first_channel_id(&data) { return Some(id); }
                }
            }
            ChannelRef::User(user) => {
                let data = self.get("channels", &[("part", "id".into()), ("forUsername", user)]).await;
                if let Some(id) = first_channel_id(&data) { return Some(id); }
            }
            ChannelRef::Custom(name) => {
                let data = self.get("search", &[
                    ("part", "id".into()),
                    ("type", "channel".into()),
                    ("q", name),
                    ("maxResults", "3".into()),
                ]).await;
                if let Some(id) = first_channel_id(&data) { return Some(id); }
            }
            ChannelRef::Unknown => {}
        }

        for page in [channel_url.to_string(), tab_url(channel_url, "about")] {
            let Some(html) = fetcher.fetch_html(&page).await else { continue };
            if let Some(id) = channel_id_from_page(&html) { return Some(id); }
        }
        warn!(channel_url, "no channel id; 30-day views unavailable");
        None
    }

    async fn recent_video_ids(&self, channel_id: &str) -> Vec<String> {
        let published_after = published_after_recent();
        let mut ids: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_SEARCH_PAGES {
            let mut params: Vec<(&str, String)> = vec![
                ("part", "id".into()),
                ("channelId", channel_id.to_string()),
                ("publishedAfter", published_after.clone()),
                ("type", "video".into()),
                ("order", "date".into()),
                ("maxResults", STATS_BATCH.to_string()),
            ];
            if let Some(t) = &page_token { params.push(("pageToken", t.clone())); }

            let data = self.get("search", &params).await;
            ids.extend(video_ids_from_search(&data));
            page_token = data.get("nextPageToken").and_then(Value::as_str).filter(|t| !t.is_empty()).map(str::to_string);
            if page_token.is_none() || ids.len() >= MAX_VIDEO_IDS { break; }
        }
        ids
    }

    /// Total views of videos published in the last 30 days, "" when unknown or zero.
    pub async fn views_last_30_days(&self, fetcher: &Fetcher, channel_url: &str) -> String {
        let Some(channel_id) = self.resolve_channel_id(fetcher, channel_url).await else { return String::new() };

        let ids = self.recent_video_ids(&channel_id).await;
        if ids.is_empty() {
            info!(channel_url, "no videos in the last 30 days");
            return String::new();
        }

        let mut total = 0u64;
        for batch in ids.chunks(STATS_BATCH) {
            let stats = self.get("videos", &[("part", "statistics".into()), ("id", batch.join(","))]).await;
            total += sum_view_counts(&stats);
        }
        if total > 0 { total.to_string() } else { String::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn channel_ref_table() {
        let cases = [
            ("https://www.youtube.com/channel/UCabc-_1", ChannelRef::Id("UCabc-_1".into())),
            ("https://www.youtube.com/channel/HCxyz", ChannelRef::Unknown),
            ("https://www.youtube.com/@garage54", ChannelRef::Handle("garage54".into())),
            ("https://www.youtube.com/@%D0%B3%D0%B0%D1%80%D0%B0%D0%B6/about", ChannelRef::Handle("гараж".into())),
            ("https://www.youtube.com/user/AutoPlus", ChannelRef::User("AutoPlus".into())),
            ("https://www.youtube.com/c/Drom", ChannelRef::Custom("Drom".into())),
            ("https://www.youtube.com/results", ChannelRef::Unknown),
        ];
        for (url, want) in cases {
            assert_eq!(ChannelRef::from_url(url), want, "url {}", url);
        }
    }

    #[test]
    fn first_channel_id_accepts_both_shapes() {
        let search = json!({"items": [{"id": {"kind": "youtube#channel", "channelId": "UC1"}}]});
        assert_eq!(first_channel_id(&search).as_deref(), Some("UC1"));
        let channels = json!({"items": [{"id": "UC2"}, {"channelId": "UC3"}]});
        assert_eq!(first_channel_id(&channels).as_deref(), Some("UC3"));
        assert_eq!(first_channel_id(&json!({"items": [{"channelId": "HC1"}]})), None);
        assert_eq!(first_channel_id(&Value::Null), None);
    }

    #[test]
    fn channel_id_from_page_fallbacks() {
        let meta = r#"<script>var ytInitialData = {"metadata":{"channelMetadataRenderer":{"externalId":"UCmeta"}}};</script>"#;
        assert_eq!(channel_id_from_page(meta).as_deref(), Some("UCmeta"));

        let url_only = r#"<script>var ytInitialData = {"metadata":{"channelMetadataRenderer":{"channelUrl":"https://www.youtube.com/channel/UCurl"}}};</script>"#;
        assert_eq!(channel_id_from_page(url_only).as_deref(), Some("UCurl"));

        let nested = r#"<script>var ytInitialData = {"header":{"x":{"channelId":"UCnested"}}};</script>"#;
        assert_eq!(channel_id_from_page(nested).as_deref(), Some("UCnested"));

        let raw = r#"<div data-x='{"channelId":"UCraw"}'></div>"#;
        assert_eq!(channel_id_from_page(raw).as_deref(), Some("UCraw"));

        assert_eq!(channel_id_from_page("<html></html>"), None);
    }

    #[test]
    fn search_ids_and_view_sums() {
        let search = json!({"items": [{"id": {"videoId": "a"}}, {"id": {"channelId": "UC"}}, {"id": {"videoId": "b"}}]});
        assert_eq!(video_ids_from_search(&search), vec!["a", "b"]);

        let stats = json!({"items": [
            {"statistics": {"viewCount": "1200"}},
            {"statistics": {"viewCount": "oops"}},
            {"statistics": {}},
            {"statistics": {"viewCount": 300}}
        ]});
        assert_eq!(sum_view_counts(&stats), 1500);
        assert_eq!(sum_view_counts(&json!({"error": {"code": 403}})), 0);
    }
}
