use scraper::{Html, Selector};
use serde_json::Value;

use super::counts::clean_subscriber_text;
use super::email::first_email;
use super::links::{categorize_links, external_links, links_from_initial_data};
use crate::record::ChannelRecord;
use crate::youtube::initial_data::{extract_initial_data, str_at, text_of, walk_for_key};

const SUBSCRIBER_POINTERS: [&str; 4] = [
    "/header/c4TabbedHeaderRenderer/subscriberCountText",
    "/header/pageHeaderRenderer/content/pageHeaderViewModel/metadata/contentMetadataViewModel/subscriberCountText",
    "/metadata/channelMetadataRenderer/subscriberCountText",
    "/microformat/microformatDataRenderer/subscriberCountText",
];

/// Build a record from a channel's about page. Every field falls back to ""
/// when nothing usable is found.
pub fn parse_about_page(channel_url: &str, html: &str) -> ChannelRecord {
    let doc = Html::parse_document(html);
    let data = extract_initial_data(html).unwrap_or(Value::Null);

    let mut rec = ChannelRecord::bare(channel_url);
    rec.name = channel_name(&doc, &data);
    rec.description = channel_description(&doc, &data);
    rec.subscribers = clean_subscriber_text(&subscriber_text(&data));

    let page_text = visible_text(&doc);
    let data_text = if data.is_null() { String::new() } else { data.to_string() };
    rec.email = first_email(&format!("{}\n{}\n{}", rec.description, page_text, data_text));

    let mut candidates = anchor_hrefs(&doc);
    candidates.extend(links_from_initial_data(&data));
    candidates.extend(external_links(&data));
    rec.set_links(categorize_links(candidates));
    rec
}

fn channel_name(doc: &Html, data: &Value) -> String {
    // 1) og:title
    if let Some(s) = meta_content(doc, r#"meta[property="og:title"]"#) { return s; }

    // 2) metadata renderer
    let s = str_at(data, "/metadata/channelMetadataRenderer/title");
    if !s.trim().is_empty() { return s.trim().to_string(); }

    // 3) legacy header
    data.pointer("/header/c4TabbedHeaderRenderer/title")
        .map(text_of)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn channel_description(doc: &Html, data: &Value) -> String {
    if let Some(s) = meta_content(doc, r#"meta[name="description"]"#) { return s; }
    for pointer in ["/metadata/channelMetadataRenderer/description", "/microformat/microformatDataRenderer/description"] {
        let s = str_at(data, pointer);
        if !s.trim().is_empty() { return s.trim().to_string(); }
    }
    String::new()
}

/// Raw subscriber label: known header locations first, then any
/// `subscriberCountText` in the tree.
pub fn subscriber_text(data: &Value) -> String {
    let known = SUBSCRIBER_POINTERS.iter().filter_map(|p| data.pointer(p));
    let anywhere = walk_for_key(data, "subscriberCountText");
    known
        .chain(anywhere)
        .map(text_of)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let content = doc.select(&sel).next()?.value().attr("content")?.trim();
    if content.is_empty() { None } else { Some(content.to_string()) }
}

fn anchor_hrefs(doc: &Html) -> Vec<String> {
    let Ok(sel) = Selector::parse("a[href]") else { return Vec::new() };
    doc.select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// Text nodes outside script/style, whitespace-trimmed and space-joined.
fn visible_text(doc: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node.parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"));
        if hidden { continue; }
        let t = text.trim();
        if !t.is_empty() { parts.push(t); }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(head: &str, body: &str, data: &Value) -> String {
        format!(
            "<html><head>{}</head><body>{}<script>var ytInitialData = {};</script></body></html>",
            head, body, data
        )
    }

    #[test]
    fn meta_tags_win() {
        let data = json!({
            "metadata": {"channelMetadataRenderer": {"title": "Data Title", "description": "Data description"}},
            "header": {"c4TabbedHeaderRenderer": {"subscriberCountText": {"simpleText": "1,2 млн подписчиков"}}}
        });
        let html = page(
            r#"<meta property="og:title" content="Гараж 54"><meta name="description" content="Пишите: garage@mail.ru">"#,
            r#"<a href="https://t.me/garage54">tg</a><a href="/about">about</a>"#,
            &data,
        );
        let rec = parse_about_page("https://www.youtube.com/@garage54", &html);
        assert_eq!(rec.channel_url, "https://www.youtube.com/@garage54");
        assert_eq!(rec.name, "Гараж 54");
        assert_eq!(rec.description, "Пишите: garage@mail.ru");
        assert_eq!(rec.subscribers, "1.2 млн");
        assert_eq!(rec.email, "garage@mail.ru");
        assert_eq!(rec.telegram, "https://t.me/garage54");
        assert_eq!(rec.website, "");
    }

    #[test]
    fn falls_back_to_initial_data() {
        let data = json!({
            "header": {"c4TabbedHeaderRenderer": {"title": "Header Title"}},
            "microformat": {"microformatDataRenderer": {"description": "Обзоры машин"}},
            "contents": [{"aboutRenderer": {"subscriberCountText": {"runs": [{"text": "500 тыс. "}, {"text": "подписчиков"}]}}}],
            "metadata": {"channelMetadataRenderer": {"externalLinks": [{"url": "https://vk.com/autoclub"}]}},
            "links": [{"navigationEndpoint": {"urlEndpoint": {"url": "https://www.youtube.com/redirect?q=https%3A%2F%2Fautoclub.ru"}}}],
            "contact": "reklama@autoclub.ru"
        });
        let rec = parse_about_page("https://www.youtube.com/c/AutoClub", &page("", "<p>Hello</p>", &data));
        assert_eq!(rec.name, "Header Title");
        assert_eq!(rec.description, "Обзоры машин");
        assert_eq!(rec.subscribers, "500 тыс.");
        assert_eq!(rec.email, "reklama@autoclub.ru");
        assert_eq!(rec.vk, "https://vk.com/autoclub");
        assert_eq!(rec.website, "https://autoclub.ru");
    }

    #[test]
    fn script_text_is_not_visible() {
        let doc = Html::parse_document("<html><body><p>Связь:</p><script>var x = 'hidden@x.ru';</script><p>a@b.ru</p></body></html>");
        assert_eq!(visible_text(&doc), "Связь: a@b.ru");
    }

    #[test]
    fn empty_page_gives_bare_record() {
        let rec = parse_about_page("https://www.youtube.com/@x", "<html></html>");
        assert_eq!(rec, ChannelRecord::bare("https://www.youtube.com/@x"));
    }

    #[test]
    fn subscriber_candidates_skip_blanks() {
        let data = json!({
            "header": {"c4TabbedHeaderRenderer": {"subscriberCountText": {"simpleText": "  "}}},
            "metadata": {"channelMetadataRenderer": {"subscriberCountText": "845 subscribers"}}
        });
        assert_eq!(subscriber_text(&data), "845 subscribers");
        assert_eq!(subscriber_text(&Value::Null), "");
    }
}
