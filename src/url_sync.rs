//! Query persistence in the URL fragment.
//!
//! The fragment is the only state that outlives a page load. A non-empty
//! query is written as its URL-encoded form (`#climate%20deal`); the empty
//! query removes the fragment entirely through an in-place history
//! replacement, so no bare `#` is left behind and no history entry is added.

use std::borrow::Cow;
use tracing::{debug, instrument};
use url::Url;

/// The page URL as seen by the search component.
pub trait Location {
    /// Current fragment including the leading `#`, or `""` when absent.
    fn hash(&self) -> String;

    /// Assign the fragment (given without `#`). Behaves like assigning
    /// `location.hash`: a changed fragment adds a history entry.
    fn set_hash(&mut self, fragment: &str);

    /// Drop the fragment in place, replacing the current history entry.
    fn clear_hash(&mut self);
}

/// URL-encode a query for use as a fragment.
pub fn encode_fragment(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// Decode the query carried by a fragment. Returns `None` for an absent or
/// empty fragment. Invalid escapes are kept literally.
pub fn decode_fragment(hash: &str) -> Option<String> {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    if raw.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    Some(decoded.into_owned())
}

/// Reflect a normalized query in the URL.
#[instrument(level = "debug", skip(location))]
pub fn sync_query<L: Location>(location: &mut L, query: &str) {
    if query.is_empty() {
        location.clear_hash();
    } else {
        location.set_hash(&encode_fragment(query));
    }
}

/// Query to restore on load, if the URL carries one.
pub fn restore_query<L: Location>(location: &L) -> Option<String> {
    let query = decode_fragment(&location.hash());
    debug!(?query, "Restored query from URL fragment");
    query
}

/// In-memory [`Location`] with a simple history stack.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    history: Vec<Url>,
}

impl MemoryLocation {
    pub fn new(href: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            history: vec![Url::parse(href)?],
        })
    }

    fn current(&self) -> &Url {
        // history is never empty
        &self.history[self.history.len() - 1]
    }

    pub fn href(&self) -> &str {
        self.current().as_str()
    }

    /// Number of history entries, the initial page included.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self {
            history: vec![Url::parse("http://localhost/").expect("static URL parses")],
        }
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        match self.current().fragment() {
            Some(fragment) if !fragment.is_empty() => format!("#{fragment}"),
            _ => String::new(),
        }
    }

    fn set_hash(&mut self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if self.current().fragment() == Some(fragment) {
            return;
        }
        let mut next = self.current().clone();
        next.set_fragment(Some(fragment));
        self.history.push(next);
    }

    fn clear_hash(&mut self) {
        let last = self.history.len() - 1;
        self.history[last].set_fragment(None);
    }
}
