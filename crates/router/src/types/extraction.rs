//! Extraction result types
//!
//! An [`ExtractionResult`] is produced upstream from a purchase order and is
//! the only input the routing engine reads. Extractors report a missing value
//! either by leaving the field out or by sending `null`; both fall back to the
//! field's default, so a partial extraction never fails to parse. Counts also
//! accept whole-valued floats such as `2.0`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Structured extraction of a single purchase order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResult {
    /// Customer the order came from
    #[serde(deserialize_with = "null_as_default")]
    pub customer_info: CustomerInfo,
    /// Purchase order number as printed on the document
    pub po_number: Option<String>,
    /// Number of pages in the source document
    #[serde(deserialize_with = "optional_count")]
    pub page_count: Option<u32>,
    /// Line count reported by the extractor
    #[serde(deserialize_with = "optional_count")]
    pub total_line_count: Option<u32>,
    /// Document-level routing hints emitted by the extractor
    #[serde(deserialize_with = "null_as_default")]
    pub routing_keywords: Vec<String>,
    /// Line items in document order
    #[serde(deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    /// Per-page summaries in document order
    #[serde(deserialize_with = "null_as_default")]
    pub pages: Vec<Page>,
}

/// Customer details attached to an extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub source: Option<String>,
}

/// A single order line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    /// Document-local line label; extractors emit either strings or numbers
    #[serde(deserialize_with = "string_or_number")]
    pub line_number: String,
    #[serde(deserialize_with = "count")]
    pub page_number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub part_number: String,
    /// Raw prefix tokens, not yet normalized
    #[serde(deserialize_with = "null_as_default")]
    pub prefixes: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: f64,
}

/// Summary of one page of the source document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    #[serde(deserialize_with = "count")]
    pub page_number: u32,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub page_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items_on_page: Vec<PageItem>,
}

/// Item as described on a page summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageItem {
    #[serde(deserialize_with = "null_as_default")]
    pub qty: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub desc: String,
}

impl ExtractionResult {
    /// Parse an extraction from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Page count carried into the decision, defaulting to a single page
    pub fn effective_page_count(&self) -> u32 {
        self.page_count.unwrap_or(1)
    }

    /// Reported line count, falling back to the number of extracted line items
    pub fn effective_line_count(&self) -> u32 {
        self.total_line_count
            .unwrap_or_else(|| u32::try_from(self.line_items.len()).unwrap_or(u32::MAX))
    }

    /// Purchase order number for log fields
    pub fn po_label(&self) -> &str {
        self.po_number.as_deref().unwrap_or("<none>")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) => count_from_number(&n).map(Some).ok_or_else(|| {
            D::Error::custom(format!("expected a non-negative whole count, got {}", n))
        }),
    }
}

fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    optional_count(deserializer).map(Option::unwrap_or_default)
}

fn count_from_number(n: &serde_json::Number) -> Option<u32> {
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).ok();
    }
    let f = n.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Missing(()) => String::new(),
    })
}
