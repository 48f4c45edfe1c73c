use chrono::{DateTime, Utc};
use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub finished: bool,
    pub reading: bool,

    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub(crate) fn new(id: String, fields: BookFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            finished: fields.is_finished(),
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            reading: fields.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field. `id` and `inserted_at` are left alone.
    pub(crate) fn apply(&mut self, fields: BookFields, now: DateTime<Utc>) {
        self.finished = fields.is_finished();
        self.name = fields.name;
        self.year = fields.year;
        self.author = fields.author;
        self.summary = fields.summary;
        self.publisher = fields.publisher;
        self.page_count = fields.page_count;
        self.read_page = fields.read_page;
        self.reading = fields.reading;
        self.updated_at = now;
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Request body for creating or replacing a book.
///
/// Everything except `name` falls back to its default when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookInput {
    pub name: Option<String>,
    #[serde(deserialize_with = "integral")]
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    #[serde(deserialize_with = "integral")]
    pub page_count: u32,
    #[serde(deserialize_with = "integral")]
    pub read_page: u32,
    pub reading: bool,
}

/// Accepts any JSON number with no fractional part that fits in `T`, so
/// `10` and `10.0` read the same.
fn integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(D::Error::invalid_value(
            Unexpected::Float(value),
            &"an integral number",
        ));
    }
    // Out-of-range floats saturate to i64::MIN/MAX and then fail the range check.
    T::try_from(value as i64).map_err(|_| {
        D::Error::invalid_value(Unexpected::Float(value), &"a number within range")
    })
}

/// A `BookInput` that passed validation.
#[derive(Debug, Clone)]
pub(crate) struct BookFields {
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookFields {
    fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Query filters for listing books.
///
/// `reading` and `finished` arrive as `"1"` (true) or any other non-empty
/// value (false). Empty values are ignored.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

impl BookFilter {
    /// Builds a filter from raw query pairs. Unknown keys are ignored and a
    /// repeated key keeps its last value.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => filter.name = Some(value),
                "reading" => filter.reading = Some(value),
                "finished" => filter.finished = Some(value),
                _ => {}
            }
        }
        filter
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(needle) = non_empty(&self.name) {
            let needle = needle.to_lowercase();
            if !book.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(reading) = flag(&self.reading) {
            if book.reading != reading {
                return false;
            }
        }
        if let Some(finished) = flag(&self.finished) {
            if book.finished != finished {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn flag(value: &Option<String>) -> Option<bool> {
    non_empty(value).map(|v| v == "1")
}
