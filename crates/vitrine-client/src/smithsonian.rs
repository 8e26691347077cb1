//! Smithsonian Open Access adapter.
//!
//! EDAN records nest most text under `content.indexedStructured` (plain
//! strings) and `content.freetext` (`{label, content}` pairs). Either shape
//! can appear in either block, so values are decoded through [`SiText`].

use serde::Deserialize;
use vitrine_core::error::AppError;
use vitrine_core::models::{DisplayField, MuseumCode, NormalizedArtwork};
use vitrine_core::traits::{Fetcher, MuseumAdapter};
use vitrine_core::util::{first_non_blank, non_blank};

use crate::decode::{decode, decode_each, endpoint, fetch_json, null_as_default};

pub const SMITHSONIAN_BASE_URL: &str = "https://api.si.edu/openaccess/api/v1.0";
const IMAGES_ONLY: &str = "online_media_type:\"Images\"";

/// Institution names for the Smithsonian unit codes.
const UNIT_NAMES: &[(&str, &str)] = &[
    ("ACM", "Anacostia Community Museum"),
    ("CHNDM", "Cooper Hewitt, Smithsonian Design Museum"),
    ("FGA", "Freer Gallery of Art"),
    ("HMSG", "Hirshhorn Museum and Sculpture Garden"),
    ("NAA", "National Anthropological Archives"),
    ("NASM", "National Air and Space Museum"),
    ("NMAAHC", "National Museum of African American History and Culture"),
    ("NMAH", "National Museum of American History"),
    ("NMAI", "National Museum of the American Indian"),
    ("NMNH", "National Museum of Natural History"),
    ("NPG", "National Portrait Gallery"),
    ("NPM", "National Postal Museum"),
    ("NZP", "National Zoo"),
    ("SAAM", "Smithsonian American Art Museum"),
    ("SIA", "Smithsonian Institution Archives"),
    ("SIL", "Smithsonian Institution Libraries"),
];

pub fn unit_name(unit_code: &str) -> &'static str {
    UNIT_NAMES
        .iter()
        .find(|(code, _)| *code == unit_code)
        .map(|(_, name)| *name)
        .unwrap_or(MuseumCode::Smithsonian.institution())
}

// ---- EDAN types ----

#[derive(Deserialize)]
struct Envelope<T> {
    response: Option<T>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct SearchBody {
    rows: Option<Vec<serde_json::Value>>,
    docs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SiRecord {
    id: Option<String>,
    title: Option<String>,
    unit_code: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    content: SiContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SiContent {
    #[serde(deserialize_with = "null_as_default")]
    indexed_structured: SiIndexed,
    #[serde(deserialize_with = "null_as_default")]
    freetext: SiFreetext,
    #[serde(deserialize_with = "null_as_default")]
    descriptive_non_repeating: SiDescriptive,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiIndexed {
    #[serde(deserialize_with = "null_as_default")]
    name: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    date: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    medium: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    topic: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    object_type: Vec<SiText>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    kind: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    place: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    culture: Vec<SiText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SiFreetext {
    #[serde(deserialize_with = "null_as_default")]
    name: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    date: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    physical_description: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    credit_line: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    notes: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    summary: Vec<SiText>,
    #[serde(deserialize_with = "null_as_default")]
    identifier: Vec<SiText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiDescriptive {
    record_link: Option<String>,
    #[serde(rename = "record_ID")]
    record_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    online_media: SiOnlineMedia,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiOnlineMedia {
    #[serde(deserialize_with = "null_as_default")]
    media: Vec<SiMedia>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SiMedia {
    content: Option<String>,
    thumbnail: Option<String>,
    ids_id: Option<String>,
}

/// A text value as EDAN emits it: bare, labelled, or something else entirely.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SiText {
    Plain(String),
    Labeled { content: String },
    Other(serde_json::Value),
}

impl SiText {
    fn text(&self) -> Option<&str> {
        match self {
            SiText::Plain(s) | SiText::Labeled { content: s } => Some(s),
            SiText::Other(_) => None,
        }
    }
}

fn first(values: &[SiText]) -> Option<&str> {
    values.first().and_then(SiText::text)
}

fn all(values: &[SiText]) -> Vec<String> {
    values.iter().filter_map(|v| non_blank(v.text())).collect()
}

#[derive(Clone)]
pub struct SmithsonianAdapter<F> {
    fetcher: F,
    base_url: String,
    api_key: String,
}

impl<F: Fetcher> SmithsonianAdapter<F> {
    pub fn new(fetcher: F, api_key: impl Into<String>) -> Self {
        Self::with_base_url(fetcher, api_key, SMITHSONIAN_BASE_URL)
    }

    pub fn with_base_url(fetcher: F, api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_details(&self, native_id: &str) -> Result<Option<NormalizedArtwork>, AppError> {
        let url = endpoint(
            &self.base_url,
            &["content", native_id],
            &[("api_key", &self.api_key)],
        )?;
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;
        let Some(raw) = envelope.response else {
            return Ok(None);
        };
        let (record, raw) = decode::<SiRecord>(raw)?;
        // Echo the id as requested; upstream may canonicalise it.
        Ok(normalize(record, raw)
            .filter(NormalizedArtwork::has_image)
            .map(|artwork| NormalizedArtwork {
                id: MuseumCode::Smithsonian.artwork_id(native_id),
                ..artwork
            }))
    }
}

impl<F: Fetcher> MuseumAdapter for SmithsonianAdapter<F> {
    fn code(&self) -> MuseumCode {
        MuseumCode::Smithsonian
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedArtwork>, AppError> {
        let rows = limit.to_string();
        let url = endpoint(
            &self.base_url,
            &["search"],
            &[
                ("q", query),
                ("start", "0"),
                ("rows", &rows),
                ("api_key", &self.api_key),
                ("fqs", IMAGES_ONLY),
            ],
        )?;
        let envelope: Envelope<SearchBody> =
            serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;
        let body = envelope.response.unwrap_or_default();
        let items = body.rows.or(body.docs).unwrap_or_default();

        let results: Vec<_> = decode_each::<SiRecord>(MuseumCode::Smithsonian, items)
            .into_iter()
            .filter_map(|(record, raw)| normalize(record, raw))
            .collect();
        tracing::debug!(query, count = results.len(), "Smithsonian search");
        Ok(results)
    }

    async fn get_details(&self, id: &str) -> Option<NormalizedArtwork> {
        let native_id = MuseumCode::Smithsonian.native_id(id);
        match self.fetch_details(native_id).await {
            Ok(artwork) => artwork,
            Err(e) => {
                tracing::warn!(id, error = %e, "Error fetching Smithsonian record");
                None
            }
        }
    }
}

/// Map an EDAN record. Records without an id cannot be looked up again and
/// are dropped.
fn normalize(record: SiRecord, raw: serde_json::Value) -> Option<NormalizedArtwork> {
    let id = non_blank(record.id.as_deref())?;
    let indexed = &record.content.indexed_structured;
    let freetext = &record.content.freetext;
    let descriptive = &record.content.descriptive_non_repeating;
    let media = descriptive.online_media.media.first();
    let media_content = media.and_then(|m| non_blank(m.content.as_deref()));

    Some(NormalizedArtwork {
        id: MuseumCode::Smithsonian.artwork_id(&id),
        title: DisplayField::Title.resolve([record.title.as_deref()]),
        artist: DisplayField::Artist.resolve([first(&indexed.name), first(&freetext.name)]),
        date: DisplayField::Date.resolve([first(&indexed.date), first(&freetext.date)]),
        medium: DisplayField::Medium.resolve([
            first(&indexed.medium),
            first(&freetext.physical_description),
        ]),
        dimensions: DisplayField::Dimensions.resolve([first(&freetext.physical_description)]),
        museum: record
            .unit_code
            .as_deref()
            .map(unit_name)
            .unwrap_or(MuseumCode::Smithsonian.institution())
            .to_string(),
        museum_code: MuseumCode::Smithsonian,
        image_url: media_content
            .clone()
            .or_else(|| media.and_then(|m| non_blank(m.ids_id.as_deref()))),
        thumbnail_url: media
            .and_then(|m| non_blank(m.thumbnail.as_deref()))
            .or(media_content),
        department: non_blank(first(&indexed.topic)),
        artwork_type: first_non_blank([first(&indexed.object_type), first(&indexed.kind)]),
        place_of_origin: first_non_blank([first(&indexed.place), first(&indexed.culture)]),
        gallery: None,
        period: non_blank(first(&indexed.date)),
        culture: non_blank(first(&indexed.culture)),
        credit_line: non_blank(first(&freetext.credit_line)),
        accession_number: first_non_blank([
            descriptive.record_id.as_deref(),
            first(&freetext.identifier),
        ]),
        classification: None,
        style: None,
        description: first_non_blank([first(&freetext.notes), first(&freetext.summary)]),
        is_public_domain: None,
        subjects: all(&indexed.topic),
        materials: all(&indexed.medium),
        techniques: Vec::new(),
        museum_url: non_blank(descriptive.record_link.as_deref())
            .unwrap_or_else(|| format!("https://collections.si.edu/search/detail/edanmdm:{id}")),
        original_data: raw,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vitrine_core::testutil::MockFetcher;

    use super::*;

    fn cassatt() -> serde_json::Value {
        json!({
            "id": "edanmdm-saam_1929.6.4",
            "title": "The Caress",
            "unitCode": "SAAM",
            "content": {
                "descriptiveNonRepeating": {
                    "record_ID": "saam_1929.6.4",
                    "record_link": "http://americanart.si.edu/collections/search/artwork/?id=3028",
                    "online_media": {
                        "media": [{
                            "content": "https://ids.si.edu/ids/deliveryService?id=SAAM-1929.6.4_1",
                            "thumbnail": "https://ids.si.edu/ids/deliveryService?id=SAAM-1929.6.4_1&max=150",
                            "idsId": "SAAM-1929.6.4_1"
                        }]
                    }
                },
                "indexedStructured": {
                    "name": ["Cassatt, Mary"],
                    "date": ["1900s"],
                    "topic": ["Figure group\\female", "Family\\mother and child"],
                    "object_type": ["Painting"],
                    "medium": ["Oil paint", "Canvas"],
                    "place": [{"unexpected": true}]
                },
                "freetext": {
                    "date": [{"label": "Date", "content": "1902"}],
                    "physicalDescription": [{"label": "Medium", "content": "oil on canvas"}],
                    "creditLine": [{"label": "Credit Line", "content": "Gift of William T. Evans"}],
                    "notes": [{"label": "Description", "content": "A mother with two children."}]
                }
            }
        })
    }

    fn adapter(fetcher: MockFetcher) -> SmithsonianAdapter<MockFetcher> {
        SmithsonianAdapter::new(fetcher, "test-key")
    }

    #[test]
    fn unit_names_fall_back_to_institution() {
        assert_eq!(unit_name("NPG"), "National Portrait Gallery");
        assert_eq!(unit_name("XYZ"), "Smithsonian Institution");
    }

    #[tokio::test]
    async fn search_reads_rows_and_skips_rows_without_id() {
        let fetcher = MockFetcher::new().route_json(
            "/search?",
            json!({"response": {"rows": [cassatt(), {"title": "orphan", "url": "edanmdm:x"}], "rowCount": 2}}),
        );
        let adapter = adapter(fetcher.clone());

        let results = adapter.search("cassatt", 5).await.unwrap();

        assert_eq!(results.len(), 1);
        let artwork = &results[0];
        assert_eq!(artwork.id, "smithsonian-edanmdm-saam_1929.6.4");
        assert_eq!(artwork.museum, "Smithsonian American Art Museum");
        assert_eq!(artwork.artist, "Cassatt, Mary");
        assert_eq!(artwork.date, "1900s");
        assert_eq!(artwork.medium, "Oil paint");
        assert_eq!(artwork.dimensions, "oil on canvas");
        assert_eq!(artwork.place_of_origin, None);
        assert_eq!(artwork.accession_number.as_deref(), Some("saam_1929.6.4"));
        assert_eq!(artwork.subjects.len(), 2);
        assert!(artwork.thumbnail_url.as_deref().unwrap().ends_with("max=150"));

        let request = &fetcher.requests()[0];
        assert!(request.contains("rows=5"));
        assert!(request.contains("api_key=test-key"));
        assert!(request.contains("fqs=online_media_type%3A%22Images%22"));
    }

    #[tokio::test]
    async fn search_accepts_docs_shape() {
        let adapter = adapter(
            MockFetcher::new().route_json("/search?", json!({"response": {"docs": [cassatt()]}})),
        );
        assert_eq!(adapter.search("cassatt", 5).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_without_response_is_empty() {
        let adapter = adapter(MockFetcher::new().route_json("/search?", json!({"status": 200})));
        assert!(adapter.search("cassatt", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_failure_propagates() {
        let adapter = adapter(MockFetcher::new().route_status("/search?", 403));
        assert!(adapter.search("cassatt", 5).await.is_err());
        assert!(adapter.search_lenient("cassatt", 5).await.is_empty());
    }

    #[tokio::test]
    async fn details_unwrap_response() {
        let fetcher = MockFetcher::new().route_json(
            "/content/edanmdm-saam_1929.6.4",
            json!({"status": 200, "response": cassatt()}),
        );
        let adapter = adapter(fetcher.clone());

        let artwork = adapter
            .get_details("smithsonian-edanmdm-saam_1929.6.4")
            .await
            .unwrap();

        assert_eq!(artwork.id, "smithsonian-edanmdm-saam_1929.6.4");
        assert_eq!(artwork.credit_line.as_deref(), Some("Gift of William T. Evans"));
        assert_eq!(artwork.description.as_deref(), Some("A mother with two children."));
        assert_eq!(
            artwork.museum_url,
            "http://americanart.si.edu/collections/search/artwork/?id=3028"
        );
        assert!(fetcher.requests()[0].contains("api_key=test-key"));
    }

    #[tokio::test]
    async fn details_without_media_are_absent() {
        let adapter = adapter(MockFetcher::new().route_json(
            "/content/ld1-1",
            json!({"response": {"id": "ld1-1", "title": "Letter"}}),
        ));
        assert!(adapter.get_details("smithsonian-ld1-1").await.is_none());
    }

    #[tokio::test]
    async fn missing_record_link_uses_collections_url() {
        let mut record = cassatt();
        record["content"]["descriptiveNonRepeating"]["record_link"] = serde_json::Value::Null;
        record["unitCode"] = json!("ZZZ");
        let adapter = adapter(MockFetcher::new().route_json("/content/", json!({"response": record})));

        let artwork = adapter.get_details("smithsonian-edanmdm-saam_1929.6.4").await.unwrap();

        assert_eq!(
            artwork.museum_url,
            "https://collections.si.edu/search/detail/edanmdm:edanmdm-saam_1929.6.4"
        );
        assert_eq!(artwork.museum, "Smithsonian Institution");
    }

    #[tokio::test]
    async fn null_blocks_and_lists_are_read_as_empty() {
        let mut record = cassatt();
        record["content"]["indexedStructured"]["topic"] = serde_json::Value::Null;
        record["content"]["freetext"] = serde_json::Value::Null;
        let fetcher = MockFetcher::new()
            .route_json("/content/", json!({"response": record}))
            .route_json("/search?", {
                let mut row = cassatt();
                row["content"]["indexedStructured"] = json!({"name": null, "medium": null});
                json!({"response": {"rows": [row]}})
            });
        let adapter = adapter(fetcher);

        let artwork = adapter.get_details("smithsonian-edanmdm-saam_1929.6.4").await.unwrap();
        assert!(artwork.subjects.is_empty());
        assert_eq!(artwork.artist, "Cassatt, Mary");
        assert_eq!(artwork.credit_line, None);

        let results = adapter.search("cassatt", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].artist, "Unknown Artist");
        assert!(results[0].image_url.is_some());
    }
}
