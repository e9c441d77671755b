//! Filter/query-string codec.
//!
//! Converts between [`FilterState`] and its query-string form, and applies
//! filter updates to a shared location through a
//! [`LocationPort`](crate::ports::location_port::LocationPort). The codec
//! never throws on bad input: out-of-domain values are omitted during parse
//! and the whole layer degrades to no-ops when no navigable context exists.

use std::sync::Arc;

use super::filter::{FilterField, FilterState};
use crate::ports::location_port::LocationPort;

/// An ordered key/value view of a query string.
///
/// Order is preserved on rewrite: setting an existing key overwrites it in
/// place, unknown keys are left exactly where they were.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    /// Parse a raw query string (without the leading `?`).
    pub fn parse(query: &str) -> Self {
        let mut pairs = Vec::new();
        for segment in query.split('&') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = match segment.split_once('=') {
                Some((k, v)) => (k, v),
                None => (segment, ""),
            };
            pairs.push((percent_decode(key), percent_decode(value)));
        }
        Self { pairs }
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite `key` in place, or append it. Duplicate occurrences
    /// beyond the first are dropped.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.pairs[idx].1 = value.to_string();
                let mut seen = false;
                self.pairs.retain(|(k, _)| {
                    if k == key {
                        if seen {
                            return false;
                        }
                        seen = true;
                    }
                    true
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render back to wire form, percent-encoding as needed.
    pub fn to_query(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Parse a query string into a canonical filter state.
///
/// Each recognized key is validated against its domain; failures omit the
/// key entirely, never default, never error.
pub fn parse_filters(query: &str) -> FilterState {
    let pairs = QueryPairs::parse(query);
    let mut state = FilterState::default();
    for field in FilterField::ALL {
        if let Some(raw) = pairs.get(field.key()) {
            field.decode_into(&mut state, raw);
        }
    }
    state.canonicalize()
}

/// Serialize a filter state to a fresh query string. Unconstrained fields
/// are absent.
pub fn serialize_filters(filters: &FilterState) -> String {
    let mut pairs = QueryPairs::default();
    apply_filters(&mut pairs, filters);
    pairs.to_query()
}

/// Write a filter state into an existing pair list: present fields are
/// overwritten in place, absent fields deleted, foreign keys untouched.
pub fn apply_filters(pairs: &mut QueryPairs, filters: &FilterState) {
    for field in FilterField::ALL {
        match field.encode(filters) {
            Some(value) => pairs.set(field.key(), &value),
            None => pairs.remove(field.key()),
        }
    }
}

/// Filter codec bound to a navigable location.
pub struct FilterCodec {
    location: Arc<dyn LocationPort + Send + Sync>,
}

impl FilterCodec {
    pub fn new(location: Arc<dyn LocationPort + Send + Sync>) -> Self {
        Self { location }
    }

    /// Current filters from the location's query string. Absent context
    /// reads as unconstrained.
    pub fn read_filters(&self) -> FilterState {
        match self.location.read() {
            Some(url) => parse_filters(split_url(&url).1),
            None => FilterState::default(),
        }
    }

    /// Write filters into the current URL, preserving foreign query
    /// parameters and the fragment. No-op without a navigable context.
    pub fn write_filters(&self, filters: &FilterState) {
        let Some(url) = self.location.read() else {
            return;
        };
        let (base, query, fragment) = split_url(&url);
        let mut pairs = QueryPairs::parse(query);
        apply_filters(&mut pairs, filters);
        self.location.replace(&join_url(base, &pairs, fragment));
    }

    /// Atomic single-key read.
    pub fn get_param(&self, key: &str) -> Option<String> {
        let url = self.location.read()?;
        QueryPairs::parse(split_url(&url).1)
            .get(key)
            .map(str::to_string)
    }

    /// Atomic single-key write; `None` deletes the key.
    pub fn set_param(&self, key: &str, value: Option<&str>) {
        let Some(url) = self.location.read() else {
            return;
        };
        let (base, query, fragment) = split_url(&url);
        let mut pairs = QueryPairs::parse(query);
        match value {
            Some(v) => pairs.set(key, v),
            None => pairs.remove(key),
        }
        self.location.replace(&join_url(base, &pairs, fragment));
    }

    /// Delete all ten recognized keys, leaving foreign parameters alone.
    pub fn clear_params(&self) {
        let Some(url) = self.location.read() else {
            return;
        };
        let (base, query, fragment) = split_url(&url);
        let mut pairs = QueryPairs::parse(query);
        for field in FilterField::ALL {
            pairs.remove(field.key());
        }
        self.location.replace(&join_url(base, &pairs, fragment));
    }

    /// `origin + path + '?' + serialized filters`; no trailing `?` when the
    /// filters are empty. `None` without a navigable context.
    pub fn shareable_url(&self, filters: &FilterState) -> Option<String> {
        let url = self.location.read()?;
        let base = split_url(&url).0;
        let query = serialize_filters(filters);
        if query.is_empty() {
            Some(base.to_string())
        } else {
            Some(format!("{base}?{query}"))
        }
    }
}

/// Split a URL into (origin+path, query, fragment).
fn split_url(url: &str) -> (&str, &str, &str) {
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((u, f)) => (u, f),
        None => (url, ""),
    };
    let (base, query) = match without_fragment.split_once('?') {
        Some((b, q)) => (b, q),
        None => (without_fragment, ""),
    };
    (base, query, fragment)
}

fn join_url(base: &str, pairs: &QueryPairs, fragment: &str) -> String {
    let mut url = base.to_string();
    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.to_query());
    }
    if !fragment.is_empty() {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// Bytes that survive unencoded: unreserved characters plus the comma the
/// tag-list format relies on.
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b',')
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => match hex_pair(bytes[i + 1], bytes[i + 2]) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
