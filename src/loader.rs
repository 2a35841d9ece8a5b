use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::{PriceQuote, Threshold};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("unable to parse date '{0}'")]
    Date(String),

    #[error("failed to parse numeric field '{field}' from value '{value}'")]
    ParseNumber { field: &'static str, value: String },

    #[error("threshold #{index} has invalid value {value}; expected a finite non-negative number")]
    InvalidValue { index: usize, value: f64 },

    #[error("quote timestamp {0} is out of range")]
    Timestamp(i64),
}

/// Record shape of a stored threshold list entry.
#[derive(Debug, Deserialize)]
struct ThresholdRecord {
    #[serde(default)]
    date: Option<String>,
    high: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    lore: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRecord {
    price_usd: f64,
    source: String,
    /// Milliseconds since the Unix epoch.
    ts: i64,
}

/// Load thresholds from a CSV (`.csv`) or JSON file.
pub fn load_thresholds<P: AsRef<Path>>(path: P) -> Result<Vec<Threshold>> {
    let path_ref = path.as_ref();
    let is_csv = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let thresholds = if is_csv {
        load_thresholds_from_csv(path_ref)?
    } else {
        load_thresholds_from_json(path_ref)?
    };

    if thresholds.is_empty() {
        warn!(path = ?path_ref, "threshold file contains no entries");
    }
    validate_thresholds(&thresholds)?;
    debug!(count = thresholds.len(), path = ?path_ref, "loaded thresholds");
    Ok(thresholds)
}

pub fn load_thresholds_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Threshold>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    let records: Vec<ThresholdRecord> = serde_json::from_reader(file)
        .with_context(|| format!("failed to parse threshold list {:?}", path_ref))?;

    records
        .into_iter()
        .map(|record| -> Result<Threshold> {
            let date = record.date.as_deref().map(parse_date).transpose()?;
            Ok(Threshold {
                value: record.high,
                label: record.name.filter(|name| !name.trim().is_empty()),
                date,
                tier: record.tier,
                image: record.image,
                lore: record.lore,
            })
        })
        .collect()
}

pub fn load_thresholds_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Threshold>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut thresholds = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if let Some(threshold) = parse_record(&record)? {
            thresholds.push(threshold);
        }
    }
    Ok(thresholds)
}

fn parse_record(record: &StringRecord) -> Result<Option<Threshold>> {
    // Skip header rows by checking the first field.
    if let Some(first) = record.get(0) {
        if first.trim().eq_ignore_ascii_case("date") {
            return Ok(None);
        }
    }
    if record.len() < 2 {
        return Ok(None);
    }

    let date = match record.get(0).map(str::trim) {
        Some(value) if !value.is_empty() => Some(parse_date(value)?),
        _ => None,
    };
    let value = parse_number(record.get(1), "high")?;
    let label = record
        .get(2)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let tier = record
        .get(3)
        .map(str::trim)
        .filter(|tier| !tier.is_empty())
        .map(str::to_string);

    Ok(Some(Threshold {
        value,
        label,
        date,
        tier,
        image: None,
        lore: None,
    }))
}

fn parse_number(value: Option<&str>, field: &'static str) -> Result<f64> {
    let value = value.ok_or_else(|| LoaderError::ParseNumber {
        field,
        value: String::from("<missing>"),
    })?;
    value
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| LoaderError::ParseNumber {
            field,
            value: value.to_string(),
        })
        .map_err(anyhow::Error::from)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let patterns = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for pattern in &patterns {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Ok(date);
        }
    }
    for pattern in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    Err(LoaderError::Date(trimmed.to_string()).into())
}

pub fn validate_thresholds(thresholds: &[Threshold]) -> Result<()> {
    for (index, threshold) in thresholds.iter().enumerate() {
        if !threshold.value.is_finite() || threshold.value < 0.0 {
            return Err(LoaderError::InvalidValue {
                index,
                value: threshold.value,
            }
            .into());
        }
    }
    Ok(())
}

/// Load a price quote of the form `{"priceUsd": .., "source": .., "ts": ..}`.
pub fn load_quote<P: AsRef<Path>>(path: P) -> Result<PriceQuote> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    let record: QuoteRecord = serde_json::from_reader(file)
        .with_context(|| format!("failed to parse price quote {:?}", path_ref))?;
    let fetched_at: DateTime<Utc> =
        DateTime::from_timestamp_millis(record.ts).ok_or(LoaderError::Timestamp(record.ts))?;

    Ok(PriceQuote {
        price_usd: record.price_usd,
        source: record.source,
        fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "boss-ladder-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_json_thresholds_with_optional_fields() {
        let path = fixture(
            "highs.json",
            r#"[
                {"date": "2021-11-08", "high": 4868.0, "name": "Athion", "tier": "LEGENDARY", "image": "/bosses/athion.png", "lore": "First of the peaks."},
                {"date": "2025-08-11", "high": 4027.88},
                {"date": "2025-08-18T00:00:00Z", "high": 4071.0, "name": ""}
            ]"#,
        );
        let thresholds = load_thresholds(&path).unwrap();
        assert_eq!(thresholds.len(), 3);
        assert_eq!(thresholds[0].label.as_deref(), Some("Athion"));
        assert_eq!(thresholds[0].tier.as_deref(), Some("LEGENDARY"));
        assert_eq!(thresholds[0].lore.as_deref(), Some("First of the peaks."));
        assert!(thresholds[1].lore.is_none());
        assert_eq!(thresholds[0].date, NaiveDate::from_ymd_opt(2021, 11, 8));
        assert!(thresholds[1].label.is_none());
        assert!(thresholds[2].label.is_none());
        assert_eq!(thresholds[2].date, NaiveDate::from_ymd_opt(2025, 8, 18));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_empty_json_list_is_accepted() {
        let path = fixture("empty.json", "[]");
        assert!(load_thresholds(&path).unwrap().is_empty());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_csv_thresholds_skip_header_and_blank_rows() {
        let path = fixture(
            "highs.csv",
            "date,high,name\n2025-08-11,\"4,027.88\",\n\n2025-08-18,4071.00,Gorath\n",
        );
        let thresholds = load_thresholds(&path).unwrap();
        assert_eq!(thresholds.len(), 2);
        assert!((thresholds[0].value - 4027.88).abs() < 1e-9);
        assert!(thresholds[0].label.is_none());
        assert_eq!(thresholds[1].label.as_deref(), Some("Gorath"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_csv_bad_number_is_rejected() {
        let path = fixture("bad.csv", "2025-08-11,abc\n");
        let err = load_thresholds(&path).unwrap_err();
        assert!(err.to_string().contains("high"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let path = fixture("negative.json", r#"[{"high": 10.0}, {"high": -5.0}]"#);
        let err = load_thresholds(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoaderError>(),
            Some(LoaderError::InvalidValue { index: 1, .. })
        ));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_quote_from_json() {
        let path = fixture(
            "quote.json",
            r#"{"priceUsd": 4055.12, "source": "binance", "ts": 1755000000000}"#,
        );
        let quote = load_quote(&path).unwrap();
        assert_eq!(quote.price_usd, 4055.12);
        assert_eq!(quote.source, "binance");
        assert_eq!(quote.fetched_at.timestamp_millis(), 1_755_000_000_000);
        fs::remove_file(path).ok();
    }
}
