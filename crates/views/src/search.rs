/// Queries shorter than this many characters leave the list untouched
pub const MIN_QUERY_LEN: usize = 2;

/// Splits a query into lowercase tokens.
///
/// # Returns
/// `None` when the query is too short to search with
pub fn tokenize(query: &str) -> Option<Vec<String>> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return None;
    }

    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    (!tokens.is_empty()).then_some(tokens)
}

/// Whether every token appears somewhere in the haystack
pub fn matches_all(haystack: &str, tokens: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    tokens.iter().all(|token| haystack.contains(token.as_str()))
}

/// Keeps the items whose searchable text contains every query token.
///
/// Short or blank queries return the input unchanged.
pub fn search<T, F>(items: Vec<T>, query: &str, text: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let Some(tokens) = tokenize(query) else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| matches_all(&text(item), &tokens))
        .collect()
}
