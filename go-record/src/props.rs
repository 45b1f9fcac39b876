//! Per-node property storage.
//!
//! Values are kept in their escaped SGF form so that serialization is a
//! plain copy. `get`/`all` unescape on the way out.

use serde::Serialize;

/// Keys whose values alter the board. They can only be given when a node is created.
pub const MUTOR_KEYS: [&str; 5] = ["B", "W", "AB", "AW", "AE"];

pub fn is_mutor(key: &str) -> bool {
    MUTOR_KEYS.contains(&key)
}

/// SGF keys are one or more upper-case ASCII letters.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_uppercase())
}

/// Escape `\` and `]` with a preceding backslash.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '\\' || ch == ']' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Drop every escaping backslash, keeping the character after it.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut forced = false;
    for ch in s.chars() {
        if forced {
            out.push(ch);
            forced = false;
        } else if ch == '\\' {
            forced = true;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Ordered map from property key to an ordered, duplicate-free list of escaped values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    entries: Vec<(String, Vec<String>)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, unescaped value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut props = Self::new();
        for (k, v) in pairs {
            props.add(k.as_ref(), v.as_ref());
        }
        props
    }

    /// Add an unescaped value. No-op if the key already holds it.
    pub fn add(&mut self, key: &str, value: &str) {
        self.add_escaped(key, escape(value));
    }

    /// Add a value that is already in escaped form.
    pub(crate) fn add_escaped(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            None => self.entries.push((key.to_string(), vec![value])),
        }
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = escape(value);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => *values = vec![value],
            None => self.entries.push((key.to_string(), vec![value])),
        }
    }

    /// First value of `key`, unescaped.
    pub fn get(&self, key: &str) -> Option<String> {
        self.raw(key).first().map(|v| unescape(v))
    }

    /// All values of `key`, unescaped, in insertion order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.raw(key).iter().map(|v| unescape(v)).collect()
    }

    /// Escaped values of `key`.
    pub fn raw(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn delete_key(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    /// Remove one unescaped value from `key`. The key disappears with its last value.
    pub fn delete_value(&mut self, key: &str, value: &str) {
        let value = escape(value);
        for (_, values) in self.entries.iter_mut().filter(|(k, _)| k == key) {
            values.retain(|v| *v != value);
        }
        self.entries.retain(|(_, values)| !values.is_empty());
    }

    /// Keys with their escaped values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
