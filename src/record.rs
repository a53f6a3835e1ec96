use serde::Serialize;

use crate::extract::links::LinkSet;

/// Export header, in column order.
pub const COLUMNS: [&str; 11] = [
    "Channel URL",
    "Name",
    "Subscribers",
    "Views Last 30 Days",
    "Description",
    "Email",
    "Telegram",
    "Website",
    "Instagram",
    "VK",
    "Facebook",
];

/// One exported row. Every field is a plain string; "unknown" is "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelRecord {
    #[serde(rename = "Channel URL")] pub channel_url: String,
    #[serde(rename = "Name")] pub name: String,
    #[serde(rename = "Subscribers")] pub subscribers: String,
    #[serde(rename = "Views Last 30 Days")] pub views_last_30_days: String,
    #[serde(rename = "Description")] pub description: String,
    #[serde(rename = "Email")] pub email: String,
    #[serde(rename = "Telegram")] pub telegram: String,
    #[serde(rename = "Website")] pub website: String,
    #[serde(rename = "Instagram")] pub instagram: String,
    #[serde(rename = "VK")] pub vk: String,
    #[serde(rename = "Facebook")] pub facebook: String,
}

impl ChannelRecord {
    /// A record that only knows its identifier (about page unavailable).
    pub fn bare(channel_url: &str) -> Self {
        ChannelRecord { channel_url: channel_url.to_string(), ..Default::default() }
    }

    pub fn set_links(&mut self, links: LinkSet) {
        self.telegram = links.telegram;
        self.website = links.website;
        self.instagram = links.instagram;
        self.vk = links.vk;
        self.facebook = links.facebook;
    }

    /// Values in `COLUMNS` order.
    pub fn row(&self) -> [&str; 11] {
        [
            &self.channel_url,
            &self.name,
            &self.subscribers,
            &self.views_last_30_days,
            &self.description,
            &self.email,
            &self.telegram,
            &self.website,
            &self.instagram,
            &self.vk,
            &self.facebook,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_keys_follow_column_order() {
        let rec = ChannelRecord::bare("https://www.youtube.com/@x");
        let v = serde_json::to_value(&rec).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, COLUMNS.to_vec());
    }

    #[test]
    fn row_matches_fields() {
        let mut rec = ChannelRecord::bare("u");
        rec.set_links(LinkSet { telegram: "https://t.me/a".into(), vk: "https://vk.com/b".into(), ..Default::default() });
        let row = rec.row();
        assert_eq!(row[0], "u");
        assert_eq!(row[6], "https://t.me/a");
        assert_eq!(row[9], "https://vk.com/b");
        assert_eq!(row[7], "");
    }
}
