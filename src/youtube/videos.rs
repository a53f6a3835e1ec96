// Recent view totals scraped from a channel's videos tab, for runs without a
// Data API key.

use serde_json::Value;

use super::initial_data::{text_of, walk_for_key};
use crate::extract::counts::{is_within_30_days, parse_count};

pub const MAX_VIDEOS: usize = 120;

const DIRECT_KEYS: [&str; 3] = ["gridVideoRenderer", "videoRenderer", "compactVideoRenderer"];

/// Video renderers in document order, including those wrapped in
/// `richItemRenderer.content` and `reelItemRenderer`.
pub fn video_renderers(data: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    collect(data, &mut out);
    out
}

fn collect<'a>(node: &'a Value, out: &mut Vec<&'a Value>) {
    match node {
        Value::Object(map) => {
            // wrappers (richItemRenderer.content, reelItemRenderer) are reached by descent
            for (key, v) in map {
                if DIRECT_KEYS.contains(&key.as_str()) {
                    out.push(v);
                } else {
                    collect(v, out);
                }
            }
        }
        Value::Array(items) => {
            for v in items { collect(v, out); }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStat {
    pub video_id: String,
    pub published: String,
    pub views: Option<u64>,
}

pub fn video_stat(renderer: &Value) -> VideoStat {
    let video_id = renderer.get("videoId").and_then(Value::as_str).unwrap_or_default().to_string();
    let published = renderer.get("publishedTimeText").map(text_of).unwrap_or_default();
    let views = renderer.get("viewCountText").map(text_of).and_then(|t| parse_count(&t));
    VideoStat { video_id, published, views }
}

/// Sum of views over distinct videos published within 30 days, or None when
/// nothing qualifies.
pub fn recent_views(data: &Value) -> Option<u64> {
    let mut seen = std::collections::HashSet::new();
    let total: u64 = video_renderers(data)
        .into_iter()
        .map(video_stat)
        .filter(|v| v.video_id.is_empty() || seen.insert(v.video_id.clone()))
        .take(MAX_VIDEOS)
        .filter(|v| is_within_30_days(&v.published))
        .filter_map(|v| v.views)
        .sum();
    (total > 0).then_some(total)
}

/// Whether any video renderer with a title was found; tells an empty tab from
/// markup we failed to read.
pub fn has_video_titles(data: &Value) -> bool {
    video_renderers(data).iter().any(|r| !walk_for_key(r, "title").is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video(id: &str, published: &str, views: &str) -> Value {
        json!({"videoId": id, "title": {"runs": [{"text": id}]}, "publishedTimeText": {"simpleText": published}, "viewCountText": {"simpleText": views}})
    }

    #[test]
    fn finds_wrapped_and_direct_renderers() {
        let data = json!({"tabs": [
            {"richGridRenderer": {"contents": [
                {"richItemRenderer": {"content": {"videoRenderer": video("a", "2 дня назад", "1 200 просмотров")}}},
                {"richItemRenderer": {"content": {"videoRenderer": video("b", "3 weeks ago", "3.4K views")}}}
            ]}},
            {"gridVideoRenderer": video("c", "2 года назад", "5 млн просмотров")},
            {"reelItemRenderer": {"videoRenderer": video("d", "1 час назад", "10 просмотров")}}
        ]});
        let ids: Vec<String> = video_renderers(&data).into_iter().map(|r| video_stat(r).video_id).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn recent_views_sum_only_last_month() {
        let data = json!({"items": [
            {"videoRenderer": video("a", "2 дня назад", "1 200 просмотров")},
            {"videoRenderer": video("b", "3 weeks ago", "3.4K views")},
            {"videoRenderer": video("c", "2 месяца назад", "5 млн просмотров")},
            {"compactVideoRenderer": video("a", "2 дня назад", "1 200 просмотров")}
        ]});
        assert_eq!(recent_views(&data), Some(1_200 + 3_400));
        assert!(has_video_titles(&data));
    }

    #[test]
    fn nothing_recent_is_none() {
        let data = json!({"items": [{"videoRenderer": video("x", "1 год назад", "100 views")}]});
        assert_eq!(recent_views(&data), None);
        assert_eq!(recent_views(&json!({})), None);
        assert!(!has_video_titles(&json!({})));
    }
}
