use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::GlossError;

/// A single glossary row.
///
/// Every field is optional: blank cells load as `None` and are skipped when
/// the row is searched or displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "Source", alias = "source", default, deserialize_with = "cell")]
    pub source: Option<String>,
    #[serde(rename = "Definition", alias = "definition", default, deserialize_with = "cell")]
    pub definition: Option<String>,
    #[serde(rename = "Category", alias = "category", default, deserialize_with = "cell")]
    pub category: Option<String>,
    #[serde(rename = "Code", alias = "code", default, deserialize_with = "cell")]
    pub code: Option<String>,
    #[serde(rename = "Link", alias = "link", default, deserialize_with = "cell")]
    pub link: Option<String>,
}

impl Entry {
    /// The searchable fields in match order: source, definition, category, code.
    pub fn searchable_fields(&self) -> [Option<&str>; 4] {
        [
            self.source.as_deref(),
            self.definition.as_deref(),
            self.category.as_deref(),
            self.code.as_deref(),
        ]
    }

    /// Present searchable fields joined by single spaces and lowercased.
    pub fn searchable_text(&self) -> String {
        self.searchable_fields()
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Accepts text, numbers and booleans; blank text becomes `None`.
///
/// Only used for typed formats (JSON, TOML). Delimited and workbook rows go
/// through [`Columns`] so their text is never reinterpreted.
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    let value = Option::<Cell>::deserialize(deserializer)?.map(|c| match c {
        Cell::Text(s) => s,
        Cell::Int(n) => n.to_string(),
        Cell::Float(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
    });
    Ok(non_blank(value))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Column positions of the known fields in a header row.
#[derive(Debug, Default)]
struct Columns {
    source: Option<usize>,
    definition: Option<usize>,
    category: Option<usize>,
    code: Option<usize>,
    link: Option<usize>,
}

impl Columns {
    /// Match header names case-insensitively; unknown columns are ignored and
    /// the first occurrence of a repeated name wins.
    fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut columns = Self::default();
        for (i, header) in headers.into_iter().enumerate() {
            let name = header.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
            let slot = match name.as_str() {
                "source" => &mut columns.source,
                "definition" => &mut columns.definition,
                "category" => &mut columns.category,
                "code" => &mut columns.code,
                "link" => &mut columns.link,
                _ => continue,
            };
            slot.get_or_insert(i);
        }
        columns
    }

    /// Build an entry from one row; `cell(i)` is the text of column `i`.
    fn entry(&self, cell: impl Fn(usize) -> Option<String>) -> Entry {
        let field = |column: Option<usize>| non_blank(column.and_then(&cell));
        Entry {
            source: field(self.source),
            definition: field(self.definition),
            category: field(self.category),
            code: field(self.code),
            link: field(self.link),
        }
    }
}

/// Worksheet read from a workbook when none is configured.
pub const DEFAULT_SHEET: &str = "Glossary";

/// On-disk encodings a glossary can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
    Toml,
    /// Spreadsheet workbook (xlsx, xlsm, xls, ods), read one sheet at a time.
    Xlsx,
}

impl DatasetFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct TomlGlossary {
    #[serde(default)]
    entries: Vec<Entry>,
}

type ParseError = Box<dyn std::error::Error + Send + Sync>;

/// An ordered, read-only set of glossary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: Vec<Entry>,
}

impl Glossary {
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Load a glossary from disk, reading workbooks from [`DEFAULT_SHEET`].
    pub fn load(path: &Path) -> Result<Self, GlossError> {
        Self::load_sheet(path, DEFAULT_SHEET)
    }

    /// Load a glossary from disk. Fails if the file does not exist.
    ///
    /// `sheet` names the worksheet to read when the file is a workbook and is
    /// ignored for the text formats.
    pub fn load_sheet(path: &Path, sheet: &str) -> Result<Self, GlossError> {
        if !path.exists() {
            return Err(GlossError::DatasetNotFound(path.to_path_buf()));
        }
        let format = DatasetFormat::from_path(path)
            .ok_or_else(|| GlossError::UnsupportedFormat(path.to_path_buf()))?;

        let read_error = |e: std::io::Error| GlossError::DatasetRead {
            path: path.to_path_buf(),
            source: e,
        };
        let parsed = match format {
            DatasetFormat::Xlsx => {
                let bytes = std::fs::read(path).map_err(read_error)?;
                Self::parse_workbook(&bytes, sheet)
            }
            text => {
                let content = std::fs::read_to_string(path).map_err(read_error)?;
                Self::parse(&content, text)
            }
        };
        let glossary = parsed.map_err(|e| GlossError::DatasetParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), entries = glossary.len(), "loaded glossary");
        Ok(glossary)
    }

    /// Parse text glossary content in the given format.
    ///
    /// Workbooks are binary; use [`parse_workbook`](Self::parse_workbook).
    pub fn parse(content: &str, format: DatasetFormat) -> Result<Self, ParseError> {
        let entries = match format {
            DatasetFormat::Csv => {
                let mut reader = csv::ReaderBuilder::new()
                    .flexible(true)
                    .from_reader(content.as_bytes());
                let columns = Columns::from_headers(reader.headers()?.iter());
                reader
                    .records()
                    .map(|record| {
                        record.map(|r| columns.entry(|i| r.get(i).map(str::to_string)))
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            DatasetFormat::Json => serde_json::from_str::<Vec<Entry>>(content)?,
            DatasetFormat::Toml => toml::from_str::<TomlGlossary>(content)?.entries,
            DatasetFormat::Xlsx => return Err("workbooks must be parsed from bytes".into()),
        };
        debug!(?format, rows = entries.len(), "parsed glossary rows");
        Ok(Self { entries })
    }

    /// Parse one worksheet of a workbook. The first row holds the column names.
    pub fn parse_workbook(bytes: &[u8], sheet: &str) -> Result<Self, ParseError> {
        let mut workbook =
            calamine::open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| e.to_string())?;
        let names = workbook.sheet_names();
        if !names.iter().any(|name| name == sheet) {
            return Err(format!(
                "worksheet '{sheet}' not found (available: {})",
                names.join(", ")
            )
            .into());
        }
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| e.to_string())?;

        let mut rows = range.rows();
        let columns = match rows.next() {
            Some(header) => {
                let names: Vec<String> = header.iter().map(|c| c.to_string()).collect();
                Columns::from_headers(names.iter().map(String::as_str))
            }
            None => Columns::default(),
        };
        let entries: Vec<Entry> = rows
            .map(|row| columns.entry(|i| row.get(i).and_then(sheet_cell)))
            .collect();
        debug!(sheet, rows = entries.len(), "parsed worksheet rows");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text of a worksheet cell. Strings are kept as typed; numbers print without
/// a trailing `.0` when integral; empty and error cells are `None`.
fn sheet_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Default dataset location, relative to the working directory.
pub fn default_dataset_path() -> PathBuf {
    PathBuf::from("glossary.csv")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn csv_blank_cells_are_none() {
        let csv = "Source,Definition,Category,Code,Link\n\
                   IPCC,Resilience capacity,Concept,,\n\
                   UN,Sustainability goal,  ,12,http://x\n";
        let g = Glossary::parse(csv, DatasetFormat::Csv).unwrap();
        assert_eq!(g.len(), 2);
        let first = &g.entries()[0];
        assert_eq!(first.source.as_deref(), Some("IPCC"));
        assert_eq!(first.code, None);
        assert_eq!(first.link, None);
        let second = &g.entries()[1];
        assert_eq!(second.category, None);
        assert_eq!(second.code.as_deref(), Some("12"));
        assert_eq!(second.link.as_deref(), Some("http://x"));
    }

    #[test]
    fn csv_cells_keep_their_text() {
        let csv = "Source,Definition,Category,Code,Link\n\
                   ISIC,Infinity,NaN,0111,\n\
                   NACE,x,true,01.10,\n";
        let g = Glossary::parse(csv, DatasetFormat::Csv).unwrap();
        let isic = &g.entries()[0];
        assert_eq!(isic.definition.as_deref(), Some("Infinity"));
        assert_eq!(isic.category.as_deref(), Some("NaN"));
        assert_eq!(isic.code.as_deref(), Some("0111"));
        let nace = &g.entries()[1];
        assert_eq!(nace.category.as_deref(), Some("true"));
        assert_eq!(nace.code.as_deref(), Some("01.10"));
    }

    #[test]
    fn csv_headers_match_by_name() {
        let csv = "\u{feff}code,Notes,DEFINITION,source\n007,ignored,Risk,IPCC\n";
        let g = Glossary::parse(csv, DatasetFormat::Csv).unwrap();
        assert_eq!(
            g.entries()[0],
            Entry {
                source: Some("IPCC".into()),
                definition: Some("Risk".into()),
                code: Some("007".into()),
                ..Entry::default()
            }
        );
    }

    #[test]
    fn csv_missing_columns_and_short_rows() {
        let csv = "Source,Definition\nIPCC,Adaptation\nUN\n";
        let g = Glossary::parse(csv, DatasetFormat::Csv).unwrap();
        assert_eq!(g.entries()[0].category, None);
        assert_eq!(g.entries()[1].source.as_deref(), Some("UN"));
        assert_eq!(g.entries()[1].definition, None);
    }

    #[test]
    fn json_accepts_nulls_and_numbers() {
        let json = r#"[
            {"Source": "UN", "Definition": "Goal", "Category": null, "Code": 12},
            {"source": "IPCC", "definition": "Risk", "Code": 1.5, "Link": true}
        ]"#;
        let g = Glossary::parse(json, DatasetFormat::Json).unwrap();
        assert_eq!(g.entries()[0].category, None);
        assert_eq!(g.entries()[0].code.as_deref(), Some("12"));
        assert_eq!(g.entries()[0].link, None);
        assert_eq!(g.entries()[1].source.as_deref(), Some("IPCC"));
        assert_eq!(g.entries()[1].code.as_deref(), Some("1.5"));
        assert_eq!(g.entries()[1].link.as_deref(), Some("true"));
    }

    #[test]
    fn toml_entries_table() {
        let toml = r#"
            [[entries]]
            Source = "IPCC"
            Definition = "Climate resilience framework"

            [[entries]]
            Source = "UN"
            Code = 7
        "#;
        let g = Glossary::parse(toml, DatasetFormat::Toml).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.entries()[1].code.as_deref(), Some("7"));
    }

    fn fixture_workbook() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/glossary.xlsx")
    }

    #[test]
    fn workbook_reads_named_sheet() {
        let g = Glossary::load(&fixture_workbook()).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(
            g.entries()[0],
            Entry {
                source: Some("IPCC".into()),
                definition: Some("Resilience capacity of systems".into()),
                category: Some("Concept".into()),
                code: Some("0111".into()),
                link: Some("https://www.ipcc.ch".into()),
            }
        );
        let un = &g.entries()[1];
        assert_eq!(un.code.as_deref(), Some("12"));
        assert_eq!(un.category, None);
        assert_eq!(un.link, None);
        let nace = &g.entries()[2];
        assert_eq!(nace.definition.as_deref(), Some("Infinity pool"));
        assert_eq!(nace.category, None);
        assert_eq!(nace.code.as_deref(), Some("1.5"));
    }

    #[test]
    fn workbook_sheet_is_selectable() {
        let bytes = std::fs::read(fixture_workbook()).unwrap();
        let notes = Glossary::parse_workbook(&bytes, "Notes").unwrap();
        assert!(notes.entries().iter().all(|e| *e == Entry::default()));

        let err = Glossary::load_sheet(&fixture_workbook(), "Terms").unwrap_err();
        assert!(matches!(err, GlossError::DatasetParse { .. }));
        assert!(err.to_string().contains("worksheet 'Terms' not found"));
    }

    #[test]
    fn workbook_is_not_text() {
        assert!(Glossary::parse("", DatasetFormat::Xlsx).is_err());
    }

    #[test]
    fn searchable_text_skips_missing_fields() {
        let entry = Entry {
            source: Some("IPCC".into()),
            definition: None,
            category: Some("Concept".into()),
            code: None,
            link: Some("http://x".into()),
        };
        assert_eq!(entry.searchable_text(), "ipcc concept");
        assert_eq!(Entry::default().searchable_text(), "");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("a/b.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("RPI_glossary.XLSX")),
            Some(DatasetFormat::Xlsx)
        );
        assert_eq!(DatasetFormat::from_path(Path::new("g.xml")), None);
        assert_eq!(DatasetFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        assert!(matches!(
            Glossary::load(&path),
            Err(GlossError::DatasetNotFound(p)) if p == path
        ));
    }

    #[test]
    fn load_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossary.xml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            Glossary::load(&path),
            Err(GlossError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossary.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Glossary::load(&path),
            Err(GlossError::DatasetParse { .. })
        ));
    }
}
