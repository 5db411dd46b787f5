//! Card metadata returned by the lookup service.

use serde::{Deserialize, Serialize};

/// Image URLs for one card at different resolutions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
}

/// Structured metadata for one matched card.
///
/// Unknown fields in the lookup response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub image_uris: ImageUris,
}

impl CardRecord {
    /// A record with only a name, for card images that come from a local file.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_line: String::new(),
            oracle_text: String::new(),
            image_uris: ImageUris::default(),
        }
    }

    /// The image URL to composite onto: normal, then large, then png.
    pub fn preferred_image_url(&self) -> Option<&str> {
        let uris = &self.image_uris;
        [&uris.normal, &uris.large, &uris.png]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }

    /// Download filename for a custom version of this card.
    pub fn custom_filename(&self) -> String {
        custom_filename(&self.name)
    }
}

/// Download filename for a custom card named `name`.
///
/// `"Lightning Bolt"` becomes `custom-lightning-bolt.png`.
pub fn custom_filename(name: &str) -> String {
    format!("custom-{}.png", slugify(name))
}

/// Replace every run of whitespace with a single `-` and lowercase the rest.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn card_named(name: &str) -> CardRecord {
        CardRecord::named(name)
    }

    #[rstest]
    #[case("Lightning Bolt", "custom-lightning-bolt.png")]
    #[case("Lightning   Bolt", "custom-lightning-bolt.png")]
    #[case("Jace,\tthe Mind Sculptor", "custom-jace,-the-mind-sculptor.png")]
    #[case("Fire // Ice", "custom-fire-//-ice.png")]
    #[case("Counterspell", "custom-counterspell.png")]
    fn test_custom_filename(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(card_named(name).custom_filename(), expected);
        assert_eq!(custom_filename(name), expected);
    }

    #[test]
    fn test_preferred_image_url_order() {
        let mut card = card_named("Opt");
        assert_eq!(card.preferred_image_url(), None);

        card.image_uris.png = Some("https://img/png".to_string());
        assert_eq!(card.preferred_image_url(), Some("https://img/png"));

        card.image_uris.large = Some("https://img/large".to_string());
        assert_eq!(card.preferred_image_url(), Some("https://img/large"));

        card.image_uris.normal = Some("https://img/normal".to_string());
        assert_eq!(card.preferred_image_url(), Some("https://img/normal"));
    }

    #[test]
    fn test_deserialize_lookup_response() {
        let json = r#"{
            "object": "card",
            "name": "Lightning Bolt",
            "type_line": "Instant",
            "oracle_text": "Lightning Bolt deals 3 damage to any target.",
            "image_uris": {
                "small": "https://cards.example/small/bolt.jpg",
                "normal": "https://cards.example/normal/bolt.jpg",
                "png": "https://cards.example/png/bolt.png"
            },
            "cmc": 1.0
        }"#;
        let card: CardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.type_line, "Instant");
        assert_eq!(card.image_uris.large, None);
        assert_eq!(
            card.preferred_image_url(),
            Some("https://cards.example/normal/bolt.jpg")
        );
    }

    #[test]
    fn test_deserialize_without_images() {
        let card: CardRecord = serde_json::from_str(r#"{"name": "Delver of Secrets"}"#).unwrap();
        assert_eq!(card.image_uris, ImageUris::default());
        assert!(card.oracle_text.is_empty());
    }
}
