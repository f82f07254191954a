/// A record the dropdown filter can match a typed query against.
pub trait Matchable {
    /// The display fields a query is compared with, in display order. Empty
    /// fields are fine; they simply never match a non-empty query.
    fn match_fields(&self) -> Vec<&str>;
}

/// Case-insensitive prefix test. Prefix, not substring: "ann" matches
/// "Anna" but not "Joanna".
pub fn prefix_match(field: &str, query: &str) -> bool {
    field.to_lowercase().starts_with(&query.to_lowercase())
}

/// Borrowing view of `records` whose fields prefix-match `query`. An empty
/// query matches everything, which is what a dropdown wants before the user
/// has typed.
pub fn filter_prefix<'a, R: Matchable>(records: &'a [R], query: &str) -> Vec<&'a R> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.match_fields().iter().any(|field| field.to_lowercase().starts_with(&needle)))
        .collect()
}
