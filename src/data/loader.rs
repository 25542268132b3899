use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Dataset, Row};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that stops a year's table from loading. All variants are shown to
/// the user the same way; the detail only goes to the log.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data file for year {year} in {}", .dir.display())]
    NotFound { year: String, dir: PathBuf },
    #[error("HTTP error! status: {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed")]
    Http(#[from] reqwest::Error),
    #[error("reading {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing JSON")]
    Json(#[from] serde_json::Error),
    #[error("parsing CSV")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Shape(String),
}

// ---------------------------------------------------------------------------
// Where yearly documents live
// ---------------------------------------------------------------------------

/// Location of the `<year>.json` documents.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A local directory holding `<year>.json` (or `<year>.csv`) files.
    Directory(PathBuf),
    /// An HTTP(S) prefix; documents are fetched from `<base_url>/<year>.json`.
    Http { base_url: String },
}

impl DataSource {
    /// Human-readable location for the status bar.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Directory(dir) => dir.display().to_string(),
            DataSource::Http { base_url } => base_url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the table for `year` from `source`.
pub fn load_year(source: &DataSource, year: &str) -> Result<Dataset, LoadError> {
    match source {
        DataSource::Directory(dir) => load_from_dir(dir, year),
        DataSource::Http { base_url } => load_from_http(base_url, year),
    }
}

/// Years that have a document in `source`, newest first. Only a directory can
/// be listed; an HTTP source returns `None`.
pub fn available_years(source: &DataSource) -> Option<Vec<String>> {
    let DataSource::Directory(dir) = source else {
        return None;
    };
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot list data directory {}: {e}", dir.display());
            return Some(Vec::new());
        }
    };

    let mut years: Vec<(u32, String)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json") || e.eq_ignore_ascii_case("csv"))
        })
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .filter(|stem| !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|stem| Some((stem.parse::<u32>().ok()?, stem)))
        .collect();

    // Numeric order, newest first.
    years.sort_by(|a, b| b.cmp(a));
    years.dedup();
    Some(years.into_iter().map(|(_, year)| year).collect())
}

// ---------------------------------------------------------------------------
// Directory source
// ---------------------------------------------------------------------------

fn load_from_dir(dir: &Path, year: &str) -> Result<Dataset, LoadError> {
    let json_path = dir.join(format!("{year}.json"));
    if json_path.is_file() {
        let text = std::fs::read_to_string(&json_path).map_err(|source| LoadError::Io {
            path: json_path.clone(),
            source,
        })?;
        return parse_json(&text);
    }

    let csv_path = dir.join(format!("{year}.csv"));
    if csv_path.is_file() {
        let file = std::fs::File::open(&csv_path).map_err(|source| LoadError::Io {
            path: csv_path.clone(),
            source,
        })?;
        return parse_csv(file);
    }

    Err(LoadError::NotFound {
        year: year.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

fn load_from_http(base_url: &str, year: &str) -> Result<Dataset, LoadError> {
    let url = format!("{}/{year}.json", base_url.trim_end_matches('/'));
    log::debug!("GET {url}");

    let response = reqwest::blocking::Client::new().get(&url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status));
    }
    let text = response.text()?;
    parse_json(&text)
}

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "columns": ["院校名称", "科类", "投档线"],
///   "data": [
///     { "院校名称": "湖南大学", "科类": "物理类", "投档线": 612 },
///     ...
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct YearDocument {
    columns: Vec<String>,
    data: Vec<JsonValue>,
}

/// Parse a yearly document. Rows may omit columns; keys not listed in
/// `columns` are kept but never rendered.
pub fn parse_json(text: &str) -> Result<Dataset, LoadError> {
    let doc: YearDocument = serde_json::from_str(text)?;

    let rows = doc
        .data
        .into_iter()
        .enumerate()
        .map(|(i, rec)| match rec {
            JsonValue::Object(obj) => Ok(obj
                .into_iter()
                .map(|(key, val)| (key, json_to_cell(&val)))
                .collect::<Row>()),
            _ => Err(LoadError::Shape(format!("Row {i} is not a JSON object"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(doc.columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f).normalized()
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV documents
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Cell types are guessed from the text; empty cells are null. Records
/// with a different field count than the header are rejected.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Row = columns
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f).normalized();
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("score-explorer-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parses_year_document() {
        let ds = parse_json(
            r#"{"columns":["院校名称","投档线"],
                "data":[{"院校名称":"Alpha U","投档线":430},
                        {"院校名称":"Beta C","投档线":null},
                        {"投档线":401.5}]}"#,
        )
        .unwrap();
        assert_eq!(ds.columns, vec!["院校名称", "投档线"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.cell(0, "投档线"), &CellValue::Integer(430));
        assert!(ds.cell(1, "投档线").is_null());
        assert!(ds.cell(2, "院校名称").is_null());
        assert_eq!(ds.cell(2, "投档线"), &CellValue::Float(401.5));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(parse_json("{not json"), Err(LoadError::Json(_))));
        assert!(matches!(parse_json(r#"{"columns":[]}"#), Err(LoadError::Json(_))));
        assert!(matches!(
            parse_json(r#"{"columns":["a"],"data":[1]}"#),
            Err(LoadError::Shape(_))
        ));
    }

    #[test]
    fn parses_csv_with_typed_cells() {
        let text = "院校名称,投档线,备注\nAlpha U,430,\nBeta C,400.5,双一流\n";
        let ds = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.columns, vec!["院校名称", "投档线", "备注"]);
        assert_eq!(ds.cell(0, "投档线"), &CellValue::Integer(430));
        assert!(ds.cell(0, "备注").is_null());
        assert_eq!(ds.cell(1, "投档线"), &CellValue::Float(400.5));
        assert_eq!(ds.cell(1, "备注"), &CellValue::from("双一流"));
    }

    #[test]
    fn directory_source_prefers_json_and_lists_years() {
        let dir = temp_dir("dir-source");
        std::fs::write(dir.join("2023.json"), r#"{"columns":["a"],"data":[{"a":1}]}"#).unwrap();
        std::fs::write(dir.join("2023.csv"), "a\n1\n2\n").unwrap();
        std::fs::write(dir.join("2022.csv"), "a\n1\n2\n").unwrap();
        std::fs::write(dir.join("notes.json"), "{}").unwrap();

        let source = DataSource::Directory(dir.clone());
        assert_eq!(load_year(&source, "2023").unwrap().len(), 1);
        assert_eq!(load_year(&source, "2022").unwrap().len(), 2);
        assert!(matches!(load_year(&source, "2021"), Err(LoadError::NotFound { .. })));
        assert_eq!(available_years(&source), Some(vec!["2023".to_string(), "2022".to_string()]));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn integral_floats_load_as_integers() {
        let ds = parse_json(r#"{"columns":["n"],"data":[{"n":1.0},{"n":-0.0},{"n":1}]}"#).unwrap();
        assert_eq!(ds.cell(0, "n"), &CellValue::Integer(1));
        assert_eq!(ds.cell(1, "n"), &CellValue::Integer(0));
        assert_eq!(ds.cell(0, "n"), ds.cell(2, "n"));

        let ds = parse_csv("n\n2.0\n2.5\n".as_bytes()).unwrap();
        assert_eq!(ds.cell(0, "n"), &CellValue::Integer(2));
        assert_eq!(ds.cell(1, "n"), &CellValue::Float(2.5));
    }

    #[test]
    fn years_are_listed_in_numeric_order() {
        let dir = temp_dir("year-order");
        for name in ["999.json", "2023.csv", "10000.json", "2023.json"] {
            std::fs::write(dir.join(name), "").unwrap();
        }
        let source = DataSource::Directory(dir.clone());
        assert_eq!(
            available_years(&source),
            Some(vec!["10000".to_string(), "2023".to_string(), "999".to_string()])
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn http_source_cannot_be_listed() {
        let source = DataSource::Http { base_url: "http://localhost/data".into() };
        assert_eq!(available_years(&source), None);
    }
}
