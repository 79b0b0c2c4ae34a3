//! Corpus loading from JSON documents
use crate::error::{Result, TechfindError};
use crate::store::RecordStore;
use crate::technique::Technique;
use log::{debug, error, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Accepted top-level shapes: a bare array, or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusDocument {
    List(Vec<Technique>),
    Wrapped { techniques: Vec<Technique> },
}

impl CorpusDocument {
    fn into_techniques(self) -> Vec<Technique> {
        match self {
            CorpusDocument::List(list) => list,
            CorpusDocument::Wrapped { techniques } => techniques,
        }
    }
}

/// Parse and validate a corpus held in memory.
pub fn parse_corpus(content: &str) -> Result<RecordStore> {
    let document: CorpusDocument = serde_json::from_str(content)?;
    let techniques = document.into_techniques();
    debug!("Parsed {} technique records", techniques.len());
    RecordStore::new(techniques)
}

/// Read, parse and validate the corpus at `path`.
pub fn load_corpus(path: &Path) -> Result<RecordStore> {
    let wrap = |source: TechfindError| TechfindError::CorpusLoad {
        path: path.to_path_buf(),
        source: Box::new(source),
    };
    let content = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
    let store = parse_corpus(&content).map_err(wrap)?;
    info!("Loaded {} techniques from {}", store.len(), path.display());
    Ok(store)
}

/// Like [`load_corpus`], but a failed load yields an empty store.
pub fn load_or_empty(path: &Path) -> RecordStore {
    match load_corpus(path) {
        Ok(store) => store,
        Err(e) => {
            error!("{e}; continuing with an empty corpus");
            RecordStore::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WRAPPED: &str = r#"{"techniques": [
        {"id": "1", "name": "SQL Injection", "category": "Web Security",
         "description": "Manipulating a database query", "solutions": ["Use prepared statements"]}
    ]}"#;

    #[test]
    fn both_document_shapes_are_accepted() {
        let wrapped = parse_corpus(WRAPPED).unwrap();
        let bare = parse_corpus(
            r#"[{"id": 1, "name": "SQL Injection", "category": "Web Security", "description": "x"}]"#,
        )
        .unwrap();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(bare.len(), 1);
        assert_eq!(bare.get("1").unwrap().name, "SQL Injection");
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(parse_corpus("not json").is_err());
        assert!(parse_corpus(r#"{"records": []}"#).is_err());
        assert!(parse_corpus(r#"[{"id": "1", "name": "only a name"}]"#).is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(WRAPPED.as_bytes()).unwrap();
        let store = load_corpus(file.path()).unwrap();
        assert_eq!(store.get("1").unwrap().solutions, vec!["Use prepared statements"]);
    }

    #[test]
    fn failed_load_falls_back_to_empty_store() {
        let missing = Path::new("/nonexistent/techfind/corpus.json");
        assert!(matches!(
            load_corpus(missing),
            Err(TechfindError::CorpusLoad { .. })
        ));
        assert!(load_or_empty(missing).is_empty());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[{\"id\": \"1\"}]").unwrap();
        assert!(load_or_empty(file.path()).is_empty());
    }
}
