// Locale-formatted audience and view counts: "1,2 млн подписчиков",
// "500 тыс.", "3.4K subscribers", "1 234 567 просмотров", "12 мың жазылушы".

use std::sync::LazyLock;

use regex::Regex;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit { Thousand, Million, Billion }

impl Unit {
    pub fn multiplier(self) -> u64 {
        match self {
            Unit::Thousand => 1_000,
            Unit::Million => 1_000_000,
            Unit::Billion => 1_000_000_000,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Unit::Thousand => "тыс.",
            Unit::Million => "млн",
            Unit::Billion => "млрд",
        }
    }
}

static SUBSCRIBER_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"подпис\w*|subscribers?|жазылушы\w*").expect("static regex")
});

static VIEW_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"просмотр\w*|views?|қаралым\w*").expect("static regex")
});

// first number (digits with dot or space grouping) and the word right after it
static NUMBER_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9][0-9. ]*)\s*(\p{L}*)").expect("static regex")
});

static FIRST_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("static regex"));

fn prepare(raw: &str, words: &Regex) -> String {
    let t = raw
        .to_lowercase()
        .replace(['\u{a0}', '\u{202f}', '\u{2009}'], " ")
        .replace(',', ".");
    words.replace_all(&t, " ").into_owned()
}

pub fn unit_of(word: &str) -> Option<Unit> {
    let w = word.trim_end_matches('.');
    match w {
        "млн" | "million" | "millions" | "mln" | "m" | "м" => Some(Unit::Million),
        "тыс" | "тысяча" | "тысячи" | "тысяч" | "thousand" | "thousands" | "k" | "к" | "мың" => Some(Unit::Thousand),
        "млрд" | "billion" | "billions" | "bn" | "b" => Some(Unit::Billion),
        _ => None,
    }
}

/// Split prepared text into (number, unit). Spaces inside the number are removed,
/// surrounding dots trimmed.
fn number_and_unit(t: &str) -> Option<(String, Option<Unit>)> {
    let caps = NUMBER_UNIT.captures(t)?;
    let num: String = caps.get(1)?.as_str().chars().filter(|c| *c != ' ').collect();
    let num = num.trim_matches('.').to_string();
    if num.is_empty() { return None; }
    let unit = caps.get(2).and_then(|m| unit_of(m.as_str()));
    Some((num, unit))
}

/// Display form of a subscriber count: the number as written plus a
/// normalized unit ("1.2 млн", "500 тыс.", "1200000"). "" when no digits.
pub fn clean_subscriber_text(raw: &str) -> String {
    if raw.trim().is_empty() { return String::new(); }
    let t = prepare(raw, &SUBSCRIBER_WORDS);
    match number_and_unit(&t) {
        Some((num, Some(unit))) => format!("{} {}", num, unit.label()),
        Some((num, None)) => num,
        None => String::new(),
    }
}

/// Numeric value of a count string, subscriber or view wording stripped.
pub fn parse_count(text: &str) -> Option<u64> {
    if text.trim().is_empty() { return None; }
    let t = prepare(text, &VIEW_WORDS);
    let t = SUBSCRIBER_WORDS.replace_all(&t, " ");
    let (num, unit) = number_and_unit(&t)?;
    scale(&num, unit)
}

// Dots are decimal separators when a unit follows; without a unit, a single dot
// followed by exactly three digits (or several dots) is digit grouping.
fn scale(num: &str, unit: Option<Unit>) -> Option<u64> {
    let mult = unit.map_or(1, Unit::multiplier);
    let dots = num.matches('.').count();
    let grouping = dots > 1 || (unit.is_none() && dots == 1 && num.rsplit('.').next().map_or(false, |f| f.len() == 3));

    if dots == 0 || grouping {
        let digits: String = num.chars().filter(|c| c.is_ascii_digit()).collect();
        return digits.parse::<u64>().ok()?.checked_mul(mult);
    }

    let (int_part, frac_part) = num.split_once('.')?;
    let int_val: u64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let frac_part = &frac_part[..frac_part.len().min(9)];
    let frac_val: u64 = if frac_part.is_empty() { 0 } else { frac_part.parse().ok()? };
    let denom = 10u64.pow(frac_part.len() as u32);
    int_val.checked_mul(mult)?.checked_add(frac_val * mult / denom)
}

/// Whether a relative "published" label ("3 дня назад", "2 weeks ago") falls in
/// the last ~30 days.
pub fn is_within_30_days(published_text: &str) -> bool {
    let t = published_text.trim().to_lowercase();
    if t.is_empty() { return false; }
    if ["year", "год", "лет"].iter().any(|w| t.contains(w)) { return false; }
    if t.contains("только что") || t.contains("just now") { return true; }
    if ["мин", "сек", "min", "sec", "hour", "час"].iter().any(|w| t.contains(w)) { return true; }

    // "неделю назад" / "a month ago" carry no digit
    let num: u64 = FIRST_INT.find(&t).and_then(|m| m.as_str().parse().ok()).unwrap_or(1);
    if ["день", "дня", "дней", "дн", "day"].iter().any(|w| t.contains(w)) {
        return (1..=30).contains(&num);
    }
    if t.contains("недел") || t.contains("week") {
        return (1..=4).contains(&num);
    }
    if t.contains("месяц") || t.contains("month") {
        return num == 1;
    }
    false
}
