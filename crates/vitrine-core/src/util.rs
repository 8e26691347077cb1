use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::models::NormalizedArtwork;

/// First candidate that is present and not blank, trimmed.
///
/// Upstream APIs use `""` as often as `null` for missing text, so both count
/// as absent.
pub fn first_non_blank<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Single-candidate form of [`first_non_blank`].
pub fn non_blank(value: Option<&str>) -> Option<String> {
    first_non_blank([value])
}

/// Keep the first occurrence of each artwork id, preserving order.
pub fn dedupe_by_id(artworks: Vec<NormalizedArtwork>) -> Vec<NormalizedArtwork> {
    let mut seen = HashSet::with_capacity(artworks.len());
    artworks
        .into_iter()
        .filter(|artwork| seen.insert(artwork.id.clone()))
        .collect()
}

/// Uniform in-place shuffle so no single source always leads the list.
pub fn shuffle(artworks: &mut [NormalizedArtwork]) {
    artworks.shuffle(&mut rand::thread_rng());
}
