//! Query normalization and substring matching.
//!
//! Matching is a plain substring test against the lowercased fields stored
//! in the index: an article matches when the query occurs in its title, its
//! description or its source name. There is no tokenization, no multi-term
//! AND and no ranking; the match set keeps index order.

use crate::index::ArticleRecord;

/// Trim and lowercase raw input into a query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl<N> ArticleRecord<N> {
    /// Whether the (already normalized) query is a non-empty substring of
    /// any searchable field.
    pub fn matches(&self, query: &str) -> bool {
        !query.is_empty()
            && (self.title.contains(query)
                || self.description.contains(query)
                || self.source.contains(query))
    }
}

/// Nodes of every record matching `query`, in record order.
///
/// The empty query matches nothing here; callers decide what the empty query
/// shows.
pub fn match_articles<N: Copy>(records: &[ArticleRecord<N>], query: &str) -> Vec<N> {
    records
        .iter()
        .filter(|record| record.matches(query))
        .map(|record| record.node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ArticleFields;

    fn record(node: u32, title: &str, description: &str, source: &str) -> ArticleRecord<u32> {
        ArticleRecord::new(
            node,
            ArticleFields {
                title: title.to_string(),
                description: description.to_string(),
                source: source.to_string(),
                timestamp: None,
            },
        )
    }

    fn sample() -> Vec<ArticleRecord<u32>> {
        vec![
            record(1, "Climate summit opens", "Leaders gather", "BBC News"),
            record(2, "Markets rally", "Stocks rise on climate deal", "CNN"),
            record(3, "Election results", "Counting continues", "NPR"),
            record(4, "Local sports", "Team wins", "Al Jazeera"),
        ]
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Climate Change \n"), "climate change");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_matches_any_field() {
        let records = sample();
        assert_eq!(match_articles(&records, "climate"), vec![1, 2]);
        assert_eq!(match_articles(&records, "npr"), vec![3]);
        assert_eq!(match_articles(&records, "team"), vec![4]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(match_articles(&sample(), "volcano").is_empty());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(match_articles(&sample(), "").is_empty());
        assert!(!sample()[0].matches(""));
    }

    #[test]
    fn test_query_is_not_tokenized() {
        let records = sample();
        assert_eq!(match_articles(&records, "summit opens"), vec![1]);
        assert!(match_articles(&records, "climate rally").is_empty());
    }

    #[test]
    fn test_match_set_is_exactly_the_substring_subset() {
        let records = sample();
        for query in ["a", "e", "news", "s", "zz", "c"] {
            let expected: Vec<u32> = records
                .iter()
                .filter(|r| {
                    r.title.contains(query) || r.description.contains(query) || r.source.contains(query)
                })
                .map(|r| r.node)
                .collect();
            assert_eq!(match_articles(&records, query), expected, "query {query:?}");
        }
    }
}
