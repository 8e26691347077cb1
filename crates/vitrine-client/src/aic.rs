//! Art Institute of Chicago adapter.

use serde::Deserialize;
use vitrine_core::error::AppError;
use vitrine_core::models::{DisplayField, MuseumCode, NormalizedArtwork};
use vitrine_core::traits::{Fetcher, MuseumAdapter};
use vitrine_core::util::{first_non_blank, non_blank};

use crate::decode::{decode, decode_each, endpoint, fetch_json};

pub const AIC_BASE_URL: &str = "https://api.artic.edu/api/v1";
const IIIF_BASE_URL: &str = "https://www.artic.edu/iiif/2";

const SEARCH_FIELDS: &str = "id,title,artist_display,date_display,medium_display,dimensions,image_id,place_of_origin,department_title,artwork_type_title,gallery_title,is_public_domain";
const DETAIL_FIELDS: &str = "id,title,artist_display,date_display,medium_display,dimensions,image_id,place_of_origin,department_title,artwork_type_title,gallery_title,style_title,classification_title,subject_titles,material_titles,technique_titles,credit_line,main_reference_number,is_public_domain,description,short_description";

// ---- AIC API types ----

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct DetailResponse {
    data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AicArtwork {
    id: Option<u64>,
    title: Option<String>,
    artist_display: Option<String>,
    date_display: Option<String>,
    medium_display: Option<String>,
    dimensions: Option<String>,
    image_id: Option<String>,
    place_of_origin: Option<String>,
    department_title: Option<String>,
    artwork_type_title: Option<String>,
    gallery_title: Option<String>,
    style_title: Option<String>,
    classification_title: Option<String>,
    subject_titles: Option<Vec<String>>,
    material_titles: Option<Vec<String>>,
    technique_titles: Option<Vec<String>>,
    credit_line: Option<String>,
    main_reference_number: Option<String>,
    is_public_domain: Option<bool>,
    description: Option<String>,
    short_description: Option<String>,
}

/// Adapter for `api.artic.edu`. Search returns full records in one call.
#[derive(Clone)]
pub struct AicAdapter<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetcher> AicAdapter<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_base_url(fetcher, AIC_BASE_URL)
    }

    pub fn with_base_url(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_details(&self, native_id: &str) -> Result<Option<NormalizedArtwork>, AppError> {
        let url = endpoint(
            &self.base_url,
            &["artworks", native_id],
            &[("fields", DETAIL_FIELDS)],
        )?;
        let response: DetailResponse = serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;
        let Some(raw) = response.data else {
            return Ok(None);
        };
        let (artwork, raw) = decode::<AicArtwork>(raw)?;
        // Echo the id as requested; upstream may canonicalise it.
        Ok(normalize(artwork, raw)
            .filter(NormalizedArtwork::has_image)
            .map(|artwork| NormalizedArtwork {
                id: MuseumCode::Aic.artwork_id(native_id),
                ..artwork
            }))
    }
}

impl<F: Fetcher> MuseumAdapter for AicAdapter<F> {
    fn code(&self) -> MuseumCode {
        MuseumCode::Aic
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedArtwork>, AppError> {
        let limit = limit.to_string();
        let url = endpoint(
            &self.base_url,
            &["artworks", "search"],
            &[("q", query), ("limit", &limit), ("fields", SEARCH_FIELDS)],
        )?;
        let response: SearchResponse = serde_json::from_value(fetch_json(&self.fetcher, &url).await?)?;

        Ok(decode_each::<AicArtwork>(MuseumCode::Aic, response.data)
            .into_iter()
            .filter_map(|(artwork, raw)| normalize(artwork, raw))
            .collect())
    }

    async fn get_details(&self, id: &str) -> Option<NormalizedArtwork> {
        let native_id = MuseumCode::Aic.native_id(id);
        match self.fetch_details(native_id).await {
            Ok(artwork) => artwork,
            Err(e) => {
                tracing::warn!(id, error = %e, "Error fetching AIC artwork details");
                None
            }
        }
    }
}

fn iiif_url(image_id: &str, width: u32) -> String {
    format!("{IIIF_BASE_URL}/{image_id}/full/{width},/0/default.jpg")
}

/// Map an AIC record; records without an id are dropped.
fn normalize(artwork: AicArtwork, raw: serde_json::Value) -> Option<NormalizedArtwork> {
    let id = artwork.id?;
    let image_id = non_blank(artwork.image_id.as_deref());

    Some(NormalizedArtwork {
        id: MuseumCode::Aic.artwork_id(id),
        title: DisplayField::Title.resolve([artwork.title.as_deref()]),
        artist: DisplayField::Artist.resolve([artwork.artist_display.as_deref()]),
        date: DisplayField::Date.resolve([artwork.date_display.as_deref()]),
        medium: DisplayField::Medium.resolve([artwork.medium_display.as_deref()]),
        dimensions: DisplayField::Dimensions.resolve([artwork.dimensions.as_deref()]),
        museum: MuseumCode::Aic.institution().to_string(),
        museum_code: MuseumCode::Aic,
        image_url: image_id.as_deref().map(|image| iiif_url(image, 843)),
        thumbnail_url: image_id.as_deref().map(|image| iiif_url(image, 400)),
        department: non_blank(artwork.department_title.as_deref()),
        artwork_type: non_blank(artwork.artwork_type_title.as_deref()),
        place_of_origin: non_blank(artwork.place_of_origin.as_deref()),
        gallery: non_blank(artwork.gallery_title.as_deref()),
        period: None,
        culture: None,
        credit_line: non_blank(artwork.credit_line.as_deref()),
        accession_number: non_blank(artwork.main_reference_number.as_deref()),
        classification: non_blank(artwork.classification_title.as_deref()),
        style: non_blank(artwork.style_title.as_deref()),
        description: first_non_blank([
            artwork.description.as_deref(),
            artwork.short_description.as_deref(),
        ]),
        is_public_domain: artwork.is_public_domain,
        subjects: artwork.subject_titles.unwrap_or_default(),
        materials: artwork.material_titles.unwrap_or_default(),
        techniques: artwork.technique_titles.unwrap_or_default(),
        museum_url: format!("https://www.artic.edu/artworks/{id}"),
        original_data: raw,
    })
}
