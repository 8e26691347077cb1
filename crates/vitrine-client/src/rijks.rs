//! Rijksmuseum collection adapter.

use serde::Deserialize;
use vitrine_core::error::AppError;
use vitrine_core::models::{DisplayField, MuseumCode, NormalizedArtwork};
use vitrine_core::traits::{Fetcher, MuseumAdapter};
use vitrine_core::util::{first_non_blank, non_blank};

use crate::decode::{decode, decode_each, endpoint, fetch_json, null_as_default};

pub const RIJKS_BASE_URL: &str = "https://www.rijksmuseum.nl/api/nl/collection";

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchResponse {
    art_objects: Vec<serde_json::Value>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DetailResponse {
    art_object: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RijksObject {
    object_number: Option<String>,
    title: Option<String>,
    principal_or_first_maker: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    principal_makers: Vec<RijksMaker>,
    dating: Option<RijksDating>,
    physical_medium: Option<String>,
    sub_title: Option<String>,
    web_image: Option<RijksImage>,
    header_image: Option<RijksImage>,
    classification: Option<RijksClassification>,
    #[serde(deserialize_with = "null_as_default")]
    object_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    production_places: Vec<String>,
    location: Option<String>,
    acquisition: Option<RijksAcquisition>,
    plaque_description_english: Option<String>,
    description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    materials: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    techniques: Vec<String>,
    links: Option<RijksLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RijksMaker {
    name: Option<String>,
    nationality: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RijksDating {
    presenting_date: Option<String>,
    period: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RijksImage {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RijksClassification {
    #[serde(deserialize_with = "null_as_default")]
    icon_class_description: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RijksAcquisition {
    credit_line: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RijksLinks {
    web: Option<String>,
}

#[derive(Clone)]
pub struct RijksAdapter<F> {
    fetcher: F,
    base_url: String,
    api_key: String,
}

impl<F: Fetcher> RijksAdapter<F> {
    pub fn new(fetcher: F, api_key: impl Into<String>) -> Self {
        Self::with_base_url(fetcher, api_key, RIJKS_BASE_URL)
    }

    pub fn with_base_url(fetcher: F, api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_details(&self, object_number: &str) -> Result<Option<NormalizedArtwork>, AppError> {
        let url = endpoint(
            &self.base_url,
            &[object_number],
            &[("key", &self.api_key), ("format", "json")],
        )?;
        let response: DetailResponse = serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;
        let Some(raw) = response.art_object else {
            return Ok(None);
        };
        let (object, raw) = decode::<RijksObject>(raw)?;
        // Echo the id as requested; upstream may canonicalise it.
        Ok(normalize(object, raw)
            .filter(NormalizedArtwork::has_image)
            .map(|artwork| NormalizedArtwork {
                id: MuseumCode::Rijks.artwork_id(object_number),
                ..artwork
            }))
    }
}

impl<F: Fetcher> MuseumAdapter for RijksAdapter<F> {
    fn code(&self) -> MuseumCode {
        MuseumCode::Rijks
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedArtwork>, AppError> {
        let page_size = limit.to_string();
        let url = endpoint(
            &self.base_url,
            &[],
            &[
                ("key", &self.api_key),
                ("q", query),
                ("ps", &page_size),
                ("imgonly", "true"),
                ("format", "json"),
            ],
        )?;
        let response: SearchResponse = serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;

        Ok(decode_each::<RijksObject>(MuseumCode::Rijks, response.art_objects)
            .into_iter()
            .filter_map(|(object, raw)| normalize(object, raw))
            .collect())
    }

    async fn get_details(&self, id: &str) -> Option<NormalizedArtwork> {
        let object_number = MuseumCode::Rijks.native_id(id);
        match self.fetch_details(object_number).await {
            Ok(artwork) => artwork,
            Err(e) => {
                tracing::warn!(id, error = %e, "Error fetching Rijksmuseum object");
                None
            }
        }
    }
}

fn normalize(object: RijksObject, raw: serde_json::Value) -> Option<NormalizedArtwork> {
    let object_number = non_blank(object.object_number.as_deref())?;
    let image = first_non_blank([
        object.web_image.as_ref().and_then(|i| i.url.as_deref()),
        object.header_image.as_ref().and_then(|i| i.url.as_deref()),
    ]);
    let maker = object.principal_makers.first();
    let dating = object.dating.unwrap_or_default();
    let subjects = object
        .classification
        .map(|c| c.icon_class_description)
        .unwrap_or_default();

    Some(NormalizedArtwork {
        id: MuseumCode::Rijks.artwork_id(&object_number),
        title: DisplayField::Title.resolve([object.title.as_deref()]),
        artist: DisplayField::Artist.resolve([
            maker.and_then(|m| m.name.as_deref()),
            object.principal_or_first_maker.as_deref(),
        ]),
        date: DisplayField::Date.resolve([dating.presenting_date.as_deref()]),
        medium: DisplayField::Medium.resolve([object.physical_medium.as_deref()]),
        dimensions: DisplayField::Dimensions.resolve([object.sub_title.as_deref()]),
        museum: MuseumCode::Rijks.institution().to_string(),
        museum_code: MuseumCode::Rijks,
        image_url: image.clone(),
        thumbnail_url: image,
        department: non_blank(subjects.first().map(String::as_str)),
        artwork_type: non_blank(object.object_types.first().map(String::as_str)),
        place_of_origin: non_blank(object.production_places.first().map(String::as_str)),
        gallery: non_blank(object.location.as_deref()),
        period: dating.period.map(|p| p.to_string()),
        culture: maker.and_then(|m| non_blank(m.nationality.as_deref())),
        credit_line: object.acquisition.and_then(|a| non_blank(a.credit_line.as_deref())),
        accession_number: Some(object_number.clone()),
        classification: None,
        style: None,
        description: first_non_blank([
            object.plaque_description_english.as_deref(),
            object.description.as_deref(),
        ]),
        is_public_domain: None,
        subjects,
        materials: object.materials,
        techniques: object.techniques,
        museum_url: object
            .links
            .and_then(|l| non_blank(l.web.as_deref()))
            .unwrap_or_else(|| format!("https://www.rijksmuseum.nl/nl/collectie/{object_number}")),
        original_data: raw,
    })
}
