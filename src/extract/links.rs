use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Hosts that belong to the platform itself (or its CDNs) and never count as a
/// channel's outbound link.
pub const PLATFORM_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "ytimg.com",
    "googlevideo.com",
    "gstatic.com",
    "developers.google.com",
    "googleusercontent.com",
    "ggpht.com",
    "yt3.ggpht.com",
    "yt3.googleusercontent.com",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category { Telegram, Instagram, Vk, Facebook }

impl Category {
    const ALL: [Category; 4] = [Category::Telegram, Category::Instagram, Category::Vk, Category::Facebook];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Telegram => &["t.me", "telegram.me", "telegram.org"],
            Category::Instagram => &["instagram.com"],
            Category::Vk => &["vk.com"],
            Category::Facebook => &["facebook.com", "fb.com"],
        }
    }

    /// First category whose keyword occurs in the (lowercased) link.
    pub fn of(low: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.keywords().iter().any(|k| low.contains(k)))
    }
}

/// First outbound link per category; "" when none was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkSet {
    pub telegram: String,
    pub website: String,
    pub instagram: String,
    pub vk: String,
    pub facebook: String,
}

impl LinkSet {
    fn slot_mut(&mut self, c: Category) -> &mut String {
        match c {
            Category::Telegram => &mut self.telegram,
            Category::Instagram => &mut self.instagram,
            Category::Vk => &mut self.vk,
            Category::Facebook => &mut self.facebook,
        }
    }

    pub fn values(&self) -> [&str; 5] {
        [&self.telegram, &self.website, &self.instagram, &self.vk, &self.facebook]
    }
}

pub fn is_platform_internal(link: &str) -> bool {
    let low = link.to_lowercase();
    PLATFORM_DOMAINS.iter().any(|d| low.contains(d)) || low.contains("google.com/url")
}

/// Protocol-relative links get https; platform redirect wrappers are unwrapped
/// to the target carried in their `q` parameter.
pub fn normalize_href(href: &str) -> String {
    let href = href.trim();
    let mut out = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else if href.starts_with("/redirect?") || href.starts_with("/attribution_link?") {
        format!("https://www.youtube.com{}", href)
    } else {
        href.to_string()
    };

    let low = out.to_lowercase();
    if low.contains("youtube.com/redirect") || low.contains("youtube.com/attribution_link") {
        if let Some(target) = redirect_target(&out) {
            out = target;
        }
    }
    out
}

fn redirect_target(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Sort candidate links into categories. Order matters: the first link seen for
/// a category is kept, the website slot takes the first http link that fits no
/// other category.
pub fn categorize_links<I>(candidates: I) -> LinkSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut set = LinkSet::default();
    for raw in candidates {
        let raw = raw.as_ref();
        if raw.trim().is_empty() { continue; }
        let href = normalize_href(raw);
        if is_platform_internal(&href) { continue; }

        let low = href.to_lowercase();
        match Category::of(&low) {
            Some(c) => {
                let slot = set.slot_mut(c);
                if slot.is_empty() { *slot = href; }
            }
            None => {
                if set.website.is_empty() && low.starts_with("http") {
                    set.website = href;
                }
            }
        }
    }
    set
}

/// Every URL-like string in the page data: `url`/`href` members,
/// `navigationEndpoint.urlEndpoint.url` and `webCommandMetadata.url`, in
/// document order.
pub fn links_from_initial_data(data: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_links(data, &mut out);
    out
}

fn collect_links(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for key in ["url", "href"] {
                if let Some(Value::String(s)) = map.get(key) { out.push(s.clone()); }
            }
            if let Some(Value::String(s)) = map.get("navigationEndpoint").and_then(|n| n.pointer("/urlEndpoint/url")) {
                out.push(s.clone());
            }
            if let Some(Value::String(s)) = map.get("webCommandMetadata").and_then(|m| m.get("url")) {
                out.push(s.clone());
            }
            for v in map.values() { collect_links(v, out); }
        }
        Value::Array(items) => {
            for v in items { collect_links(v, out); }
        }
        _ => {}
    }
}

/// Links the channel listed explicitly in its metadata renderer.
pub fn external_links(data: &Value) -> Vec<String> {
    let Some(items) = data.pointer("/metadata/channelMetadataRenderer/externalLinks").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for el in items {
        for key in ["url", "href"] {
            if let Some(s) = el.get(key).and_then(Value::as_str) { out.push(s.to_string()); }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_link_per_category_wins() {
        let set = categorize_links([
            "https://t.me/autochannel",
            "https://t.me/second",
            "https://instagram.com/auto",
            "https://vk.com/auto",
            "https://www.facebook.com/auto",
            "https://autoblog.ru",
            "https://other-site.ru",
        ]);
        assert_eq!(set.telegram, "https://t.me/autochannel");
        assert_eq!(set.instagram, "https://instagram.com/auto");
        assert_eq!(set.vk, "https://vk.com/auto");
        assert_eq!(set.facebook, "https://www.facebook.com/auto");
        assert_eq!(set.website, "https://autoblog.ru");
    }

    #[test]
    fn platform_domains_never_populate_fields() {
        let set = categorize_links([
            "https://www.youtube.com/@somechannel",
            "https://youtu.be/abc",
            "https://i.ytimg.com/vi/x/hq.jpg",
            "https://yt3.ggpht.com/avatar",
            "https://www.google.com/url?q=https://t.me/x",
            "https://developers.google.com/youtube",
        ]);
        assert_eq!(set, LinkSet::default());
    }

    #[test]
    fn redirects_are_unwrapped() {
        let set = categorize_links([
            "https://www.youtube.com/redirect?event=channel_description&q=https%3A%2F%2Ft.me%2Fgarage",
            "//www.youtube.com/redirect?q=https%3A%2F%2Fgarage-shop.ru%2F&v=1",
        ]);
        assert_eq!(set.telegram, "https://t.me/garage");
        assert_eq!(set.website, "https://garage-shop.ru/");
    }

    #[test]
    fn redirect_without_target_is_dropped() {
        let set = categorize_links(["https://www.youtube.com/redirect?event=x"]);
        assert_eq!(set, LinkSet::default());
    }

    #[test]
    fn relative_and_non_http_links_are_not_websites() {
        let set = categorize_links(["/about", "mailto:a@b.ru", "javascript:void(0)", "//cdn.example.com/x.js"]);
        assert_eq!(set.website, "https://cdn.example.com/x.js");
        assert_eq!(set.telegram, "");
    }

    #[test]
    fn categorization_is_idempotent() {
        let first = categorize_links([
            "https://www.youtube.com/redirect?q=https%3A%2F%2Fvk.com%2Fclub1",
            "https://fb.com/page",
            "https://shop.example.com",
            "https://telegram.me/chat",
        ]);
        let second = categorize_links(first.values());
        assert_eq!(first, second);
    }

    #[test]
    fn links_from_data_in_document_order() {
        let data = json!({
            "header": {"href": "https://a.example"},
            "items": [
                {"navigationEndpoint": {"urlEndpoint": {"url": "https://b.example"}}},
                {"commandMetadata": {"webCommandMetadata": {"url": "/channel/UC1"}}},
                {"url": 42}
            ]
        });
        let links = links_from_initial_data(&data);
        assert_eq!(links.first().map(String::as_str), Some("https://a.example"));
        assert!(links.contains(&"https://b.example".to_string()));
        assert!(links.contains(&"/channel/UC1".to_string()));
        assert!(links.iter().position(|l| l == "https://b.example") < links.iter().position(|l| l == "/channel/UC1"));
    }

    #[test]
    fn external_links_from_metadata() {
        let data = json!({"metadata": {"channelMetadataRenderer": {"externalLinks": [
            {"url": "https://t.me/x"}, {"href": "https://vk.com/y"}, "junk"
        ]}}});
        assert_eq!(external_links(&data), vec!["https://t.me/x", "https://vk.com/y"]);
        assert!(external_links(&json!({})).is_empty());
    }
}
