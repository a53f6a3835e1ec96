use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("static regex")
});

/// First email-like token in `text`, or "".
pub fn first_email(text: &str) -> String {
    EMAIL.find(text).map(|m| m.as_str().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_email_table() {
        let cases = [
            ("Сотрудничество: promo@autoblog.ru, реклама: ads@autoblog.ru", "promo@autoblog.ru"),
            ("business inquiries: John.Doe+yt@mail.example.co.uk!", "John.Doe+yt@mail.example.co.uk"),
            ("\"description\":\"пишите на garage_42@yandex.ru\"", "garage_42@yandex.ru"),
            ("no address here @ all", ""),
            ("broken@domain", ""),
            ("", ""),
        ];
        for (text, want) in cases {
            assert_eq!(first_email(text), want, "input {:?}", text);
        }
    }
}
