// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Header and query parameter map

use crate::s3::utils::url_encode;
use std::collections::BTreeMap;

/// Multimap for string key and string value
pub type Multimap = multimap::MultiMap<String, String>;

pub trait MultimapExt {
    /// Adds a key-value pair to the multimap
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Adds all entries of another multimap to this one
    fn add_multimap(&mut self, other: Multimap);

    /// Returns the first value whose key matches `key` ignoring ASCII case.
    fn get_ci(&self, key: &str) -> Option<&str>;

    /// Returns `true` if any key matches `key` ignoring ASCII case.
    fn contains_key_ci(&self, key: &str) -> bool {
        self.get_ci(key).is_some()
    }

    /// Converts multimap to HTTP query string
    fn to_query_string(&self) -> String;

    /// Converts multimap to canonical query string (sorted by key)
    fn get_canonical_query_string(&self) -> String;

    /// Converts multimap to signed headers and canonical headers
    fn get_canonical_headers(&self) -> (String, String);
}

impl MultimapExt for Multimap {
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key.into(), value.into());
    }

    fn add_multimap(&mut self, other: Multimap) {
        for (key, values) in other.into_iter() {
            self.insert_many(key, values);
        }
    }

    fn get_ci(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn to_query_string(&self) -> String {
        let mut query = String::new();
        for (key, values) in self.iter_all() {
            for value in values {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(&url_encode(key));
                if !value.is_empty() {
                    query.push('=');
                    query.push_str(&url_encode(value));
                }
            }
        }
        query
    }

    fn get_canonical_query_string(&self) -> String {
        let mut sorted: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for (key, values) in self.iter_all() {
            sorted
                .entry(url_encode(key))
                .or_default()
                .extend(values.iter().map(|s| s.as_str()));
        }

        let mut query = String::new();
        for (key, mut values) in sorted {
            values.sort_unstable();
            for value in values {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(&key);
                query.push('=');
                query.push_str(&url_encode(value));
            }
        }
        query
    }

    fn get_canonical_headers(&self) -> (String, String) {
        let mut btmap: BTreeMap<String, String> = BTreeMap::new();
        for (k, values) in self.iter_all() {
            let key = k.to_lowercase();
            if key == "authorization" || key == "user-agent" {
                continue;
            }
            let mut vs: Vec<String> = values.iter().map(|v| collapse_spaces(v)).collect();
            vs.sort();
            btmap
                .entry(key)
                .and_modify(|e| {
                    e.push(',');
                    e.push_str(&vs.join(","));
                })
                .or_insert_with(|| vs.join(","));
        }

        let signed_headers = btmap.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers = btmap
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join("\n");
        (signed_headers, canonical_headers)
    }
}

/// Trims and collapses runs of spaces into one, as SigV4 canonical headers require.
fn collapse_spaces(s: &str) -> String {
    s.split(' ')
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ci() {
        let mut m = Multimap::new();
        m.add("Content-Type", "text/plain");
        assert_eq!(m.get_ci("content-type"), Some("text/plain"));
        assert!(m.contains_key_ci("CONTENT-TYPE"));
        assert!(!m.contains_key_ci("content-length"));
    }

    #[test]
    fn test_query_string_keeps_bare_flags() {
        let mut m = Multimap::new();
        m.add("uploads", "");
        assert_eq!(m.to_query_string(), "uploads");

        let mut m = Multimap::new();
        m.add("uploadId", "a b");
        assert_eq!(m.to_query_string(), "uploadId=a%20b");
    }

    #[test]
    fn test_canonical_query_string_sorted() {
        let mut m = Multimap::new();
        m.add("uploadId", "xyz");
        m.add("partNumber", "2");
        m.add("restore", "");
        assert_eq!(
            m.get_canonical_query_string(),
            "partNumber=2&restore=&uploadId=xyz"
        );
    }

    #[test]
    fn test_canonical_headers() {
        let mut m = Multimap::new();
        m.add("Host", "localhost:9000");
        m.add("X-Amz-Date", "20250102T030405Z");
        m.add("x-amz-meta-note", "  two   spaces ");
        m.add("Authorization", "ignored");
        let (signed, canonical) = m.get_canonical_headers();
        assert_eq!(signed, "host;x-amz-date;x-amz-meta-note");
        assert_eq!(
            canonical,
            "host:localhost:9000\nx-amz-date:20250102T030405Z\nx-amz-meta-note:two spaces"
        );
    }
}
