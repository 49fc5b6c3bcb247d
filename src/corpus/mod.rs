//! Overview of the raw true/fake news corpora: sizes, date ranges, subject
//! distributions and a handful of randomly sampled titles.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use crate::error::{KgError, Result};
use crate::ingest::table::require_columns;

pub const CORPUS_COLUMNS: [&str; 3] = ["title", "subject", "date"];

/// One row of a raw corpus file. Other columns (e.g. `text`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewsRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub name: String,
    pub articles: usize,
    /// Lexicographic min and max of the non-empty `date` cells.
    pub date_range: Option<(String, String)>,
    /// Subject counts, most frequent first, ties by name.
    pub subject_counts: Vec<(String, usize)>,
    pub sample_titles: Vec<String>,
}

pub fn load_corpus(path: &Path) -> Result<Vec<NewsRecord>> {
    let file = std::fs::File::open(path).map_err(KgError::Io)?;
    let records = load_corpus_from(file, &path.display().to_string())?;
    log::info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_corpus_from<R: Read>(reader: R, source: &str) -> Result<Vec<NewsRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    require_columns(reader.headers()?, &CORPUS_COLUMNS, source)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: NewsRecord = row?;
        records.push(record);
    }
    Ok(records)
}

pub fn summarize<R: Rng + ?Sized>(
    name: &str,
    records: &[NewsRecord],
    sample_size: usize,
    rng: &mut R,
) -> CorpusSummary {
    let date_range = {
        let mut dates = records.iter().map(|r| r.date.trim()).filter(|d| !d.is_empty());
        dates.next().map(|first| {
            let (min, max) = dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d)));
            (min.to_string(), max.to_string())
        })
    };

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let subject = record.subject.trim();
        if !subject.is_empty() {
            *counts.entry(subject).or_default() += 1;
        }
    }
    let mut subject_counts: Vec<(String, usize)> =
        counts.into_iter().map(|(s, n)| (s.to_string(), n)).collect();
    subject_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let sample_titles = records
        .choose_multiple(rng, sample_size.min(records.len()))
        .map(|r| r.title.clone())
        .collect();

    CorpusSummary {
        name: name.to_string(),
        articles: records.len(),
        date_range,
        subject_counts,
        sample_titles,
    }
}

/// Plain-text report comparing the corpora section by section.
pub fn render_report(summaries: &[CorpusSummary]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== DATASET OVERVIEW ===");
    for s in summaries {
        let _ = writeln!(out, "{} news articles: {}", s.name, s.articles);
    }

    let _ = writeln!(out, "\n=== DATE RANGES ===");
    for s in summaries {
        match &s.date_range {
            Some((min, max)) => {
                let _ = writeln!(out, "{} dates: {} to {}", s.name, min, max);
            }
            None => {
                let _ = writeln!(out, "{} dates: none", s.name);
            }
        }
    }

    let _ = writeln!(out, "\n=== SUBJECT CATEGORIES ===");
    for s in summaries {
        let _ = writeln!(out, "{} subjects:", s.name);
        for (subject, count) in &s.subject_counts {
            let _ = writeln!(out, "  {:<20} {:>8}", subject, count);
        }
    }

    let _ = writeln!(out, "\n=== RANDOM SAMPLES FOR TESTING ===");
    for s in summaries {
        let _ = writeln!(out, "Random {} titles:", s.name.to_lowercase());
        for title in &s.sample_titles {
            let _ = writeln!(out, "  - {}", title);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CSV: &str = "title,text,subject,date\n\
        A,body,politicsNews,\"December 31, 2017 \"\n\
        B,body,worldnews,\"December 29, 2017 \"\n\
        C,body,politicsNews,\"August 1, 2016 \"\n\
        D,body,,\n";

    #[test]
    fn test_summary_counts() {
        let records = load_corpus_from(CSV.as_bytes(), "True.csv").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let summary = summarize("True", &records, 2, &mut rng);
        assert_eq!(summary.articles, 4);
        assert_eq!(
            summary.subject_counts,
            vec![("politicsNews".to_string(), 2), ("worldnews".to_string(), 1)]
        );
        assert_eq!(
            summary.date_range,
            Some(("August 1, 2016".to_string(), "December 31, 2017".to_string()))
        );
        assert_eq!(summary.sample_titles.len(), 2);
    }

    #[test]
    fn test_sample_capped_by_corpus_size() {
        let records = load_corpus_from(CSV.as_bytes(), "True.csv").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let summary = summarize("True", &records, 50, &mut rng);
        let mut titles = summary.sample_titles.clone();
        titles.sort();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_seeded_samples_reproducible() {
        let records = load_corpus_from(CSV.as_bytes(), "True.csv").unwrap();
        let a = summarize("True", &records, 2, &mut StdRng::seed_from_u64(42));
        let b = summarize("True", &records, 2, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.sample_titles, b.sample_titles);
    }

    #[test]
    fn test_empty_corpus() {
        let records = load_corpus_from("title,subject,date\n".as_bytes(), "Fake.csv").unwrap();
        let summary = summarize("Fake", &records, 5, &mut StdRng::seed_from_u64(0));
        assert_eq!(summary.articles, 0);
        assert_eq!(summary.date_range, None);
        assert!(summary.sample_titles.is_empty());
    }

    #[test]
    fn test_missing_date_column() {
        let err = load_corpus_from("title,subject\nA,b\n".as_bytes(), "Fake.csv").unwrap_err();
        assert!(matches!(err, KgError::MissingColumn { ref column, .. } if column == "date"));
    }

    #[test]
    fn test_report_sections() {
        let records = load_corpus_from(CSV.as_bytes(), "True.csv").unwrap();
        let summary = summarize("True", &records, 1, &mut StdRng::seed_from_u64(3));
        let report = render_report(&[summary]);
        assert!(report.contains("=== DATASET OVERVIEW ==="));
        assert!(report.contains("True news articles: 4"));
        assert!(report.contains("True dates: August 1, 2016 to December 31, 2017"));
        assert!(report.contains("politicsNews"));
        assert!(report.contains("Random true titles:"));
    }
}
