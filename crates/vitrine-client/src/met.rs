//! Metropolitan Museum of Art adapter.
//!
//! The Met search endpoint only returns object ids, so a search is one id
//! lookup followed by a detail request per id.

use futures::future::join_all;
use serde::Deserialize;
use vitrine_core::error::AppError;
use vitrine_core::models::{DisplayField, MuseumCode, NormalizedArtwork};
use vitrine_core::traits::{Fetcher, MuseumAdapter};
use vitrine_core::util::{first_non_blank, non_blank};

use crate::decode::{decode, endpoint, fetch_json};

pub const MET_BASE_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default, rename = "objectIDs")]
    object_ids: Option<Vec<u64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MetObject {
    #[serde(rename = "objectID")]
    object_id: Option<u64>,
    title: Option<String>,
    artist_display_name: Option<String>,
    artist_display_bio: Option<String>,
    object_date: Option<String>,
    object_begin_date: Option<i64>,
    medium: Option<String>,
    classification: Option<String>,
    dimensions: Option<String>,
    department: Option<String>,
    country: Option<String>,
    culture: Option<String>,
    region: Option<String>,
    period: Option<String>,
    credit_line: Option<String>,
    accession_number: Option<String>,
    primary_image: Option<String>,
    primary_image_small: Option<String>,
    #[serde(rename = "GalleryNumber")]
    gallery_number: Option<String>,
    #[serde(rename = "objectURL")]
    object_url: Option<String>,
    is_public_domain: Option<bool>,
    tags: Option<Vec<MetTag>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetTag {
    term: Option<String>,
}

#[derive(Clone)]
pub struct MetAdapter<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetcher> MetAdapter<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_base_url(fetcher, MET_BASE_URL)
    }

    pub fn with_base_url(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_details(&self, native_id: &str) -> Result<Option<NormalizedArtwork>, AppError> {
        let url = endpoint(&self.base_url, &["objects", native_id], &[])?;
        let (object, raw) = decode::<MetObject>(fetch_json(&self.fetcher, &url).await?)?;
        // Echo the id as requested; upstream may canonicalise it.
        Ok(normalize(object, raw)
            .filter(NormalizedArtwork::has_image)
            .map(|artwork| NormalizedArtwork {
                id: MuseumCode::Met.artwork_id(native_id),
                ..artwork
            }))
    }
}

impl<F: Fetcher> MuseumAdapter for MetAdapter<F> {
    fn code(&self) -> MuseumCode {
        MuseumCode::Met
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedArtwork>, AppError> {
        let url = endpoint(
            &self.base_url,
            &["search"],
            &[("hasImages", "true"), ("q", query)],
        )?;
        let response: SearchResponse = serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;
        let ids = response.object_ids.unwrap_or_default();
        tracing::debug!(query, matches = ids.len(), "Met search");

        let lookups = ids
            .into_iter()
            .take(limit)
            .map(|id| async move { self.get_details(&MuseumCode::Met.artwork_id(id)).await });

        Ok(join_all(lookups).await.into_iter().flatten().collect())
    }

    async fn get_details(&self, id: &str) -> Option<NormalizedArtwork> {
        let native_id = MuseumCode::Met.native_id(id);
        match self.fetch_details(native_id).await {
            Ok(artwork) => artwork,
            Err(e) => {
                tracing::warn!(id, error = %e, "Error fetching Met object");
                None
            }
        }
    }
}

fn normalize(object: MetObject, raw: serde_json::Value) -> Option<NormalizedArtwork> {
    let id = object.object_id?;
    let primary = non_blank(object.primary_image.as_deref());
    let small = non_blank(object.primary_image_small.as_deref());
    let begin_year = object
        .object_begin_date
        .filter(|year| *year != 0)
        .map(|year| year.to_string());

    Some(NormalizedArtwork {
        id: MuseumCode::Met.artwork_id(id),
        title: DisplayField::Title.resolve([object.title.as_deref()]),
        artist: DisplayField::Artist.resolve([
            object.artist_display_name.as_deref(),
            object.artist_display_bio.as_deref(),
        ]),
        date: DisplayField::Date.resolve([object.object_date.as_deref(), begin_year.as_deref()]),
        medium: DisplayField::Medium.resolve([
            object.medium.as_deref(),
            object.classification.as_deref(),
        ]),
        dimensions: DisplayField::Dimensions.resolve([object.dimensions.as_deref()]),
        museum: MuseumCode::Met.institution().to_string(),
        museum_code: MuseumCode::Met,
        image_url: primary.clone().or_else(|| small.clone()),
        thumbnail_url: small.or(primary),
        department: non_blank(object.department.as_deref()),
        artwork_type: non_blank(object.classification.as_deref()),
        place_of_origin: first_non_blank([
            object.country.as_deref(),
            object.culture.as_deref(),
            object.region.as_deref(),
        ]),
        gallery: non_blank(object.gallery_number.as_deref()).map(|n| format!("Gallery {n}")),
        period: non_blank(object.period.as_deref()),
        culture: non_blank(object.culture.as_deref()),
        credit_line: non_blank(object.credit_line.as_deref()),
        accession_number: non_blank(object.accession_number.as_deref()),
        classification: non_blank(object.classification.as_deref()),
        style: None,
        description: None,
        is_public_domain: object.is_public_domain,
        subjects: object
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| non_blank(tag.term.as_deref()))
            .collect(),
        materials: Vec::new(),
        techniques: Vec::new(),
        museum_url: non_blank(object.object_url.as_deref())
            .unwrap_or_else(|| format!("https://www.metmuseum.org/art/collection/search/{id}")),
        original_data: raw,
    })
}
