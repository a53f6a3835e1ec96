pub mod fetch;
pub mod initial_data;
pub mod search;
pub mod data_api;
pub mod videos;

pub const BASE_URL: &str = "https://www.youtube.com";

/// Channel page URL with a tab appended (`about`, `videos`).
pub fn tab_url(channel_url: &str, tab: &str) -> String {
    format!("{}/{}", channel_url.trim_end_matches('/'), tab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_url_handles_trailing_slash() {
        assert_eq!(tab_url("https://www.youtube.com/@garage/", "about"), "https://www.youtube.com/@garage/about");
        assert_eq!(tab_url("https://www.youtube.com/channel/UC1", "videos"), "https://www.youtube.com/channel/UC1/videos");
    }
}
