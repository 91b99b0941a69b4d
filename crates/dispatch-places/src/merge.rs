use std::collections::HashSet;

use crate::types::Place;

/// Cap on places returned by one facility search.
pub const MAX_MERGED_RESULTS: usize = 10;

/// Concatenates result sets in order, drops places whose id was already seen
/// (first occurrence wins) and keeps the first `limit`.
///
/// A missing id counts as one shared id: only the first id-less place is kept.
pub fn merge_by_place_id<I>(sets: I, limit: usize) -> Vec<Place>
where
    I: IntoIterator<Item = Vec<Place>>,
{
    let mut seen: HashSet<Option<String>> = HashSet::new();
    sets.into_iter()
        .flatten()
        .filter(|place| seen.insert(place.place_id.clone()))
        .take(limit)
        .collect()
}
