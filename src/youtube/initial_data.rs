// The JSON blob YouTube embeds in every page as `ytInitialData`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

// Tried in order; every occurrence of a marker is a candidate.
static MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"ytInitialData"\s*:\s*"#,
        r"var ytInitialData\s*=\s*",
        r"ytInitialData\s*=\s*",
        r#"window\["ytInitialData"\]\s*=\s*"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Parse the first well-formed `ytInitialData` object out of a page.
pub fn extract_initial_data(html: &str) -> Option<Value> {
    for re in MARKERS.iter() {
        for m in re.find_iter(html) {
            let rest = &html[m.end()..];
            if !rest.starts_with('{') { continue; }
            if let Some(v) = parse_leading_object(rest) { return Some(v); }
        }
    }
    None
}

// One JSON object from the front of `s`; whatever follows it (`;</script>...`) is ignored.
fn parse_leading_object(s: &str) -> Option<Value> {
    let mut stream = serde_json::Deserializer::from_str(s).into_iter::<Value>();
    match stream.next() {
        Some(Ok(v @ Value::Object(_))) => Some(v),
        _ => None,
    }
}

/// Text of a `{simpleText}` or `{runs: [{text}]}` node; "" for anything else.
pub fn text_from_runs(node: &Value) -> String {
    if let Some(s) = node.get("simpleText").and_then(Value::as_str) {
        return s.to_string();
    }
    if let Some(runs) = node.get("runs").and_then(Value::as_array) {
        return runs.iter().filter_map(|r| r.get("text").and_then(Value::as_str)).collect();
    }
    String::new()
}

/// Plain strings pass through, text nodes are flattened.
pub fn text_of(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        other => text_from_runs(other),
    }
}

/// Every value stored under `key` anywhere in the tree, pre-order: a node's own
/// entry comes before anything nested inside it.
pub fn walk_for_key<'a>(node: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    walk(node, key, &mut out);
    out
}

fn walk<'a>(node: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match node {
        Value::Object(map) => {
            if let Some(v) = map.get(key) { out.push(v); }
            for v in map.values() { walk(v, key, out); }
        }
        Value::Array(items) => {
            for v in items { walk(v, key, out); }
        }
        _ => {}
    }
}

/// Nested string lookup by JSON pointer, "" when absent or not a string.
pub fn str_at(data: &Value, pointer: &str) -> String {
    data.pointer(pointer).and_then(Value::as_str).unwrap_or_default().to_string()
}
