use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entry::{DEFAULT_SHEET, Glossary};
use crate::error::GlossError;

/// Load-once holder for the glossary file.
///
/// The file is parsed on the first [`get`](Self::get) and reused until
/// [`invalidate`](Self::invalidate) is called.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    sheet: String,
    loaded: Option<Glossary>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: DEFAULT_SHEET.to_string(),
            loaded: None,
        }
    }

    /// Worksheet to read when the dataset is a workbook.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The cached glossary, loading it from disk if needed.
    pub fn get(&mut self) -> Result<&Glossary, GlossError> {
        let glossary = match self.loaded.take() {
            Some(glossary) => glossary,
            None => {
                debug!(path = %self.path.display(), "dataset cache miss");
                Glossary::load_sheet(&self.path, &self.sheet)?
            }
        };
        Ok(&*self.loaded.insert(glossary))
    }

    /// Drop the cached glossary so the next `get` re-reads the file.
    pub fn invalidate(&mut self) {
        if self.loaded.take().is_some() {
            debug!(path = %self.path.display(), "dataset cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ROW: &str = "Source,Definition\nIPCC,Risk\n";
    const TWO_ROWS: &str = "Source,Definition\nIPCC,Risk\nUN,Goal\n";

    #[test]
    fn loads_once_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossary.csv");
        std::fs::write(&path, ONE_ROW).unwrap();

        let mut cache = DatasetCache::new(&path);
        assert!(!cache.is_loaded());
        assert_eq!(cache.get().unwrap().len(), 1);
        assert!(cache.is_loaded());

        std::fs::write(&path, TWO_ROWS).unwrap();
        assert_eq!(cache.get().unwrap().len(), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn workbook_sheet_is_passed_through() {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/glossary.xlsx");
        let mut cache = DatasetCache::new(&fixture);
        assert_eq!(cache.get().unwrap().len(), 3);

        let mut cache = DatasetCache::new(&fixture).with_sheet("Missing");
        assert!(matches!(cache.get(), Err(GlossError::DatasetParse { .. })));
    }

    #[test]
    fn missing_file_stays_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DatasetCache::new(dir.path().join("nope.csv"));
        assert!(matches!(cache.get(), Err(GlossError::DatasetNotFound(_))));
        assert!(!cache.is_loaded());
    }
}
