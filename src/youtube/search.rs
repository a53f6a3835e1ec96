use std::collections::BTreeSet;

use serde_json::Value;
use url::form_urlencoded;

use super::initial_data::{str_at, walk_for_key};
use super::BASE_URL;

// Results filter "channels only"; YouTube expects it double-encoded.
const CHANNEL_FILTER: &str = "EgIQAg%253D%253D";

pub fn build_search_url(query: &str) -> String {
    let q: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}/results?search_query={}&sp={}", BASE_URL, q, CHANNEL_FILTER)
}

/// Canonical URL of a `channelRenderer`: its canonical base URL when present,
/// else `/channel/<browseId>`.
pub fn channel_url_from_renderer(renderer: &Value) -> Option<String> {
    let canonical = str_at(renderer, "/navigationEndpoint/browseEndpoint/canonicalBaseUrl");
    if !canonical.is_empty() {
        return Some(format!("{}{}", BASE_URL, canonical));
    }
    let browse_id = str_at(renderer, "/navigationEndpoint/browseEndpoint/browseId");
    if !browse_id.is_empty() {
        return Some(format!("{}/channel/{}", BASE_URL, browse_id));
    }
    None
}

/// Every channel linked from a results page, deduplicated.
pub fn channels_from_initial_data(data: &Value) -> BTreeSet<String> {
    walk_for_key(data, "channelRenderer")
        .into_iter()
        .filter_map(channel_url_from_renderer)
        .collect()
}
