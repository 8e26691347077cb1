//! Shared plumbing for the source adapters: URL building and JSON decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use url::Url;
use vitrine_core::error::AppError;
use vitrine_core::models::MuseumCode;
use vitrine_core::traits::Fetcher;

/// Build `base/segments...?params`, percent-encoding every part.
pub(crate) fn endpoint(
    base: &str,
    segments: &[&str],
    params: &[(&str, &str)],
) -> Result<String, AppError> {
    let mut url =
        Url::parse(base).map_err(|e| AppError::HttpError(format!("Invalid URL '{base}': {e}")))?;
    if !segments.is_empty() {
        url.path_segments_mut()
            .map_err(|_| AppError::HttpError(format!("URL '{base}' cannot take a path")))?
            .pop_if_empty()
            .extend(segments);
    }
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url.into())
}

/// Fetch a URL and parse the body as JSON.
pub(crate) async fn fetch_json<F: Fetcher>(
    fetcher: &F,
    url: &str,
) -> Result<serde_json::Value, AppError> {
    let body = fetcher.fetch(url).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Decode a raw payload into a typed schema, keeping the raw value.
pub(crate) fn decode<T: DeserializeOwned>(raw: serde_json::Value) -> Result<(T, serde_json::Value), AppError> {
    let typed: T = serde::Deserialize::deserialize(&raw)?;
    Ok((typed, raw))
}

/// Field deserializer that reads an explicit `null` as the type's default.
///
/// `#[serde(default)]` only covers a missing key; upstream payloads also
/// send `null` for empty lists and blocks.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode every list item, skipping (and logging) the ones that don't fit.
pub(crate) fn decode_each<T: DeserializeOwned>(
    museum: MuseumCode,
    items: Vec<serde_json::Value>,
) -> Vec<(T, serde_json::Value)> {
    items
        .into_iter()
        .filter_map(|raw| match decode(raw) {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(%museum, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: u64,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Tagged {
        #[serde(deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn endpoint_encodes_segments_and_params() {
        let url = endpoint(
            "https://api.artic.edu/api/v1",
            &["artworks", "search"],
            &[("q", "water lilies"), ("limit", "5")],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://api.artic.edu/api/v1/artworks/search?q=water+lilies&limit=5"
        );

        let url = endpoint("https://example.org/collection/", &["SK-A-1935"], &[]).unwrap();
        assert_eq!(url, "https://example.org/collection/SK-A-1935");

        let url = endpoint("https://example.org/objects", &["a/b"], &[]).unwrap();
        assert_eq!(url, "https://example.org/objects/a%2Fb");
    }

    #[test]
    fn endpoint_rejects_bad_base() {
        assert!(endpoint("not a url", &[], &[]).is_err());
    }

    #[test]
    fn decode_each_skips_bad_items() {
        let items = vec![
            serde_json::json!({"id": 1}),
            serde_json::json!({"id": "not-a-number"}),
            serde_json::json!({"id": 3}),
        ];
        let decoded: Vec<(Item, _)> = decode_each(MuseumCode::Aic, items);
        let ids: Vec<_> = decoded.iter().map(|(item, _)| item.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(decoded[1].1["id"], 3);
    }

    #[test]
    fn null_fields_read_as_default() {
        let null: Tagged = serde_json::from_value(serde_json::json!({"tags": null})).unwrap();
        assert!(null.tags.is_empty());

        let missing: Tagged = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(missing.tags.is_empty());

        let present: Tagged = serde_json::from_value(serde_json::json!({"tags": ["a"]})).unwrap();
        assert_eq!(present.tags, vec!["a"]);
    }
}
