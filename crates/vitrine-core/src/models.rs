use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Source institution tag, embedded as the prefix of every artwork id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MuseumCode {
    Aic,
    Met,
    Smithsonian,
    Rijks,
}

impl MuseumCode {
    pub const ALL: [MuseumCode; 4] = [
        MuseumCode::Aic,
        MuseumCode::Met,
        MuseumCode::Smithsonian,
        MuseumCode::Rijks,
    ];

    /// Lowercase id prefix, e.g. `aic` in `aic-12345`.
    pub const fn prefix(self) -> &'static str {
        match self {
            MuseumCode::Aic => "aic",
            MuseumCode::Met => "met",
            MuseumCode::Smithsonian => "smithsonian",
            MuseumCode::Rijks => "rijks",
        }
    }

    /// Short display tag, e.g. `AIC`.
    pub const fn tag(self) -> &'static str {
        match self {
            MuseumCode::Aic => "AIC",
            MuseumCode::Met => "MET",
            MuseumCode::Smithsonian => "SMITHSONIAN",
            MuseumCode::Rijks => "RIJKS",
        }
    }

    /// Default institution name. Smithsonian records may override this with
    /// the owning unit's name.
    pub const fn institution(self) -> &'static str {
        match self {
            MuseumCode::Aic => "Art Institute of Chicago",
            MuseumCode::Met => "Metropolitan Museum of Art",
            MuseumCode::Smithsonian => "Smithsonian Institution",
            MuseumCode::Rijks => "Rijksmuseum",
        }
    }

    /// Exact match on the lowercase id prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.prefix() == prefix)
    }

    /// Resolve a user-facing museum name or tag.
    ///
    /// The accepted names are enumerated explicitly; anything else is a hard
    /// error rather than a best-effort guess.
    pub fn from_selector(selector: &str) -> Result<Self, AppError> {
        match selector.trim().to_lowercase().as_str() {
            "aic" | "art institute of chicago" => Ok(MuseumCode::Aic),
            "met" | "metropolitan museum" | "metropolitan museum of art" => Ok(MuseumCode::Met),
            "smithsonian" | "smithsonian institution" => Ok(MuseumCode::Smithsonian),
            "rijks" | "rijksmuseum" => Ok(MuseumCode::Rijks),
            _ => Err(AppError::UnknownMuseum(selector.to_string())),
        }
    }

    /// Build a prefixed artwork id from a native id.
    pub fn artwork_id(self, native_id: impl fmt::Display) -> String {
        format!("{}-{}", self.prefix(), native_id)
    }

    /// Strip this museum's prefix from an id, if present.
    pub fn native_id(self, id: &str) -> &str {
        id.strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(id)
    }
}

impl fmt::Display for MuseumCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MuseumCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_selector(s)
    }
}

/// Split an artwork id into its museum code and native id.
///
/// The id is split at the first `-`; native ids may themselves contain
/// dashes (`rijks-SK-A-1935`).
pub fn parse_artwork_id(id: &str) -> Result<(MuseumCode, &str), AppError> {
    let (prefix, native) = id
        .split_once('-')
        .ok_or_else(|| AppError::UnknownArtworkId(id.to_string()))?;
    let code =
        MuseumCode::from_prefix(prefix).ok_or_else(|| AppError::UnknownArtworkId(id.to_string()))?;
    if native.is_empty() {
        return Err(AppError::UnknownArtworkId(id.to_string()));
    }
    Ok((code, native))
}

/// The always-present display fields and their fallback literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayField {
    Title,
    Artist,
    Date,
    Medium,
    Dimensions,
}

impl DisplayField {
    pub const fn fallback(self) -> &'static str {
        match self {
            DisplayField::Title => "Untitled",
            DisplayField::Artist => "Unknown Artist",
            DisplayField::Date => "Date unknown",
            DisplayField::Medium => "Medium unknown",
            DisplayField::Dimensions => "Dimensions unknown",
        }
    }

    /// First non-blank candidate, or the fallback literal.
    pub fn resolve<'a, I>(self, candidates: I) -> String
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        crate::util::first_non_blank(candidates).unwrap_or_else(|| self.fallback().to_string())
    }
}

/// Canonical artwork record shared by every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArtwork {
    /// `<museum prefix>-<native id>`
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Free-text display date, not parsed.
    pub date: String,
    pub medium: String,
    pub dimensions: String,
    pub museum: String,
    pub museum_code: MuseumCode,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub department: Option<String>,
    pub artwork_type: Option<String>,
    pub place_of_origin: Option<String>,
    pub gallery: Option<String>,
    pub period: Option<String>,
    pub culture: Option<String>,
    pub credit_line: Option<String>,
    pub accession_number: Option<String>,
    pub classification: Option<String>,
    pub style: Option<String>,
    pub description: Option<String>,
    pub is_public_domain: Option<bool>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    pub museum_url: String,
    /// Raw upstream payload, passed through uninterpreted.
    #[serde(default)]
    pub original_data: serde_json::Value,
}

impl NormalizedArtwork {
    pub fn has_image(&self) -> bool {
        self.image_url.is_some() || self.thumbnail_url.is_some()
    }
}

/// An artwork saved in the user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    #[serde(flatten)]
    pub artwork: NormalizedArtwork,
    pub added_at: DateTime<Utc>,
}

/// Result of a collection mutation, reported rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionOutcome {
    pub success: bool,
    pub message: String,
}

impl CollectionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// One page of the emulated infinite browsing feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePage {
    pub artworks: Vec<NormalizedArtwork>,
    pub next_term_index: usize,
    pub has_more: bool,
}

/// One slice of the multi-term collection sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePage {
    pub artworks: Vec<NormalizedArtwork>,
    pub has_more: bool,
    pub total_results: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artwork_id() {
        assert_eq!(parse_artwork_id("aic-12345").unwrap(), (MuseumCode::Aic, "12345"));
        assert_eq!(parse_artwork_id("met-436533").unwrap(), (MuseumCode::Met, "436533"));
        assert_eq!(
            parse_artwork_id("smithsonian-nasm_A19610048000").unwrap(),
            (MuseumCode::Smithsonian, "nasm_A19610048000")
        );
        assert_eq!(
            parse_artwork_id("rijks-SK-A-1935").unwrap(),
            (MuseumCode::Rijks, "SK-A-1935")
        );
    }

    #[test]
    fn test_parse_artwork_id_rejects_unknown_prefix() {
        for id in ["louvre-1", "AIC-1", "12345", "met-", ""] {
            let err = parse_artwork_id(id).unwrap_err();
            assert!(matches!(err, AppError::UnknownArtworkId(_)), "{id}");
        }
    }

    #[test]
    fn test_selector_mapping() {
        assert_eq!(
            MuseumCode::from_selector("Art Institute of Chicago").unwrap(),
            MuseumCode::Aic
        );
        assert_eq!(MuseumCode::from_selector(" MET ").unwrap(), MuseumCode::Met);
        assert_eq!(
            MuseumCode::from_selector("metropolitan museum").unwrap(),
            MuseumCode::Met
        );
        assert_eq!(
            "Smithsonian Institution".parse::<MuseumCode>().unwrap(),
            MuseumCode::Smithsonian
        );
        assert_eq!(MuseumCode::from_selector("rijksmuseum").unwrap(), MuseumCode::Rijks);
        assert!(matches!(
            MuseumCode::from_selector("louvre"),
            Err(AppError::UnknownMuseum(_))
        ));
    }

    #[test]
    fn test_native_id_strips_only_own_prefix() {
        assert_eq!(MuseumCode::Met.native_id("met-42"), "42");
        assert_eq!(MuseumCode::Met.native_id("42"), "42");
        assert_eq!(MuseumCode::Met.native_id("aic-42"), "aic-42");
        assert_eq!(MuseumCode::Rijks.native_id("rijks-SK-C-5"), "SK-C-5");
        assert_eq!(MuseumCode::Aic.artwork_id(27992), "aic-27992");
    }

    #[test]
    fn test_display_field_fallbacks() {
        assert_eq!(DisplayField::Title.resolve([None]), "Untitled");
        assert_eq!(DisplayField::Artist.resolve([Some("  "), None]), "Unknown Artist");
        assert_eq!(DisplayField::Date.resolve([Some(""), Some("1889")]), "1889");
        assert_eq!(DisplayField::Medium.resolve([Some("Oil on canvas")]), "Oil on canvas");
        assert_eq!(DisplayField::Dimensions.resolve(std::iter::empty()), "Dimensions unknown");
    }

    #[test]
    fn test_museum_code_serializes_as_tag() {
        let json = serde_json::to_string(&MuseumCode::Smithsonian).unwrap();
        assert_eq!(json, "\"SMITHSONIAN\"");
        let code: MuseumCode = serde_json::from_str("\"RIJKS\"").unwrap();
        assert_eq!(code, MuseumCode::Rijks);
    }

    #[test]
    fn test_collection_entry_flattens_artwork() {
        let entry = CollectionEntry {
            artwork: crate::testutil::make_test_artwork("met-1"),
            added_at: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "met-1");
        assert_eq!(value["museumCode"], "MET");
        assert!(value.get("addedAt").is_some());

        let back: CollectionEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }
}
