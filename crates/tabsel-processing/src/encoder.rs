//! Label encoding for categorical columns.
//!
//! A [`LabelEncoder`] maps the distinct values of a column to consecutive
//! integers starting at 0. Discovery order is first-seen order, so the
//! mapping is deterministic for a given column and the encoding is a
//! bijection: k distinct values always map onto exactly `{0, .., k-1}`.

use std::collections::HashMap;

/// Maps categorical values to consecutive integer codes.
///
/// # Example
///
/// ```
/// use tabsel_processing::LabelEncoder;
///
/// let mut encoder = LabelEncoder::new();
/// let codes: Vec<i32> = ["red", "blue", "red", "green"]
///     .iter()
///     .map(|v| encoder.encode(v))
///     .collect();
///
/// assert_eq!(codes, vec![0, 1, 0, 2]);
/// assert_eq!(encoder.classes(), &["red", "blue", "green"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    codes: HashMap<String, i32>,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a single value, assigning the next free code on first sight.
    pub fn encode(&mut self, value: &str) -> i32 {
        if let Some(&code) = self.codes.get(value) {
            return code;
        }
        let code = self.classes.len() as i32;
        self.codes.insert(value.to_string(), code);
        self.classes.push(value.to_string());
        code
    }

    /// Look up the code of an already-seen value.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<i32> {
        self.codes.get(value).copied()
    }

    /// Distinct values in encoding order; `classes()[code as usize]`
    /// recovers the original value.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct values seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no value has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
