use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::{KgError, Result};

/// Columns the article table must carry. Any other column is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "title",
    "subject",
    "label",
    "dominant_topic",
    "topic_terms",
    "entities_str",
];

/// One row of the article table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub title: String,
    /// Raw cells; empty cells deserialize to `None`, whitespace is kept.
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// Raw cell; empty cells deserialize to `None`.
    #[serde(default)]
    pub dominant_topic: Option<String>,
    #[serde(default)]
    pub topic_terms: String,
    #[serde(default)]
    pub entities_str: Option<String>,
}

/// Interpretation of the dominant_topic cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicField {
    Absent,
    Id(i64),
    Invalid(String),
}

impl ArticleRecord {
    /// Coerce dominant_topic to an integer id.
    ///
    /// Accepts integers and integral-looking floats (`3.0`, as written by
    /// dataframe exports); other finite floats truncate toward zero. `nan` and
    /// blank cells count as absent.
    pub fn topic(&self) -> TopicField {
        let raw = match self.dominant_topic.as_deref().map(str::trim) {
            None | Some("") => return TopicField::Absent,
            Some(raw) => raw,
        };

        if let Ok(id) = raw.parse::<i64>() {
            return TopicField::Id(id);
        }

        match raw.parse::<f64>() {
            Ok(value) if value.is_nan() => TopicField::Absent,
            Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => {
                TopicField::Id(value.trunc() as i64)
            }
            _ => TopicField::Invalid(raw.to_string()),
        }
    }
}

/// Read every article row from a CSV file with a header row.
pub fn read_articles(path: &Path) -> Result<Vec<ArticleRecord>> {
    let file = std::fs::File::open(path).map_err(KgError::Io)?;
    let records = read_articles_from(file, &path.display().to_string())?;
    log::info!("Loaded {} article rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read article rows from any reader; `source` names it in error messages.
pub fn read_articles_from<R: Read>(reader: R, source: &str) -> Result<Vec<ArticleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    require_columns(reader.headers()?, &REQUIRED_COLUMNS, source)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: ArticleRecord = row?;
        records.push(record);
    }
    Ok(records)
}

/// Fail with `MissingColumn` for the first required column the header lacks.
pub(crate) fn require_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    source: &str,
) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(KgError::MissingColumn {
                column: column.to_string(),
                path: source.to_string(),
            });
        }
    }
    Ok(())
}
