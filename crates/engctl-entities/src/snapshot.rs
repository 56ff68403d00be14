//! Session backed by a local JSON app document
//!
//! The document lists definitions per kind:
//!
//! ```json
//! {
//!   "dimensions": [ { "qInfo": { "qId": "d1", "qType": "dimension" } } ],
//!   "measures": []
//! }
//! ```
//!
//! Every successful create or update rewrites the document atomically, so
//! a batch that fails half way leaves the earlier definitions on disk.
//! Sections engctl does not manage are written back unchanged.

use std::collections::BTreeMap;

use engctl_fs::{FileLock, NormalizedPath, io};
use serde_json::Value;

use crate::kind::EntityKind;
use crate::memory::MemorySession;
use crate::session::{Handle, NamedItem, Session, SessionError};
use crate::{Error, Result};

type SessionResult<T> = std::result::Result<T, SessionError>;

/// A [`Session`] persisted to a JSON file after every change.
///
/// The document's lock is held until the session is dropped, so two
/// sessions on the same app never interleave their rewrites.
#[derive(Debug)]
pub struct SnapshotSession {
    path: NormalizedPath,
    inner: MemorySession,
    other_sections: BTreeMap<String, Value>,
    _lock: FileLock,
}

impl SnapshotSession {
    /// Open the document at `path`; a missing file starts an empty app.
    ///
    /// Fails when a managed section is not a list or holds an entry
    /// without a string `qInfo.qId`.
    pub fn open(path: NormalizedPath) -> Result<Self> {
        let lock = FileLock::acquire(&path)?;
        let mut inner = MemorySession::new();
        let mut other_sections = BTreeMap::new();

        if let Some(content) = io::read_text_if_exists(&path)? {
            let document: BTreeMap<String, Value> =
                serde_json::from_str(&content).map_err(|e| parse_error(&path, e.to_string()))?;
            for (section, value) in document {
                let Some(kind) = EntityKind::ALL.into_iter().find(|k| k.plural() == section) else {
                    tracing::debug!(section = %section, "Keeping unmanaged snapshot section");
                    other_sections.insert(section, value);
                    continue;
                };
                let Value::Array(definitions) = value else {
                    return Err(parse_error(&path, format!("'{section}' must be a list")));
                };
                for (index, raw) in definitions.into_iter().enumerate() {
                    if inner.insert(kind, raw).is_err() {
                        return Err(parse_error(
                            &path,
                            format!("{section}[{index}] has no qInfo.qId"),
                        ));
                    }
                }
            }
            tracing::debug!(path = %path, entities = inner.len(), "Opened app snapshot");
        } else {
            tracing::debug!(path = %path, "App snapshot does not exist yet, starting empty");
        }

        Ok(Self {
            path,
            inner,
            other_sections,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// The in-memory view, including its call journal.
    pub fn memory(&self) -> &MemorySession {
        &self.inner
    }

    fn persist(&self) -> SessionResult<()> {
        let mut document: BTreeMap<&str, Value> = self
            .other_sections
            .iter()
            .map(|(section, value)| (section.as_str(), value.clone()))
            .collect();
        for kind in EntityKind::ALL {
            let definitions = self.inner.definitions(kind).cloned().collect();
            document.insert(kind.plural(), Value::Array(definitions));
        }

        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| SessionError::with_source("could not serialize app snapshot", e))?;
        io::write_text(&self.path, &content).map_err(|e| {
            SessionError::with_source(format!("could not write app snapshot {}", self.path), e)
        })
    }
}

fn parse_error(path: &NormalizedPath, message: String) -> Error {
    Error::SnapshotParse {
        path: path.to_native(),
        message,
    }
}

impl Session for SnapshotSession {
    fn lookup(&mut self, kind: EntityKind, id: &str) -> SessionResult<Option<Handle>> {
        self.inner.lookup(kind, id)
    }

    fn create(&mut self, kind: EntityKind, raw: &Value) -> SessionResult<()> {
        self.inner.create(kind, raw)?;
        self.persist()
    }

    fn update(&mut self, kind: EntityKind, handle: Handle, raw: &Value) -> SessionResult<()> {
        self.inner.update(kind, handle, raw)?;
        self.persist()
    }

    fn list(&mut self, kind: EntityKind) -> SessionResult<Vec<NamedItem>> {
        self.inner.list(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_document(temp: &TempDir, document: &Value) -> NormalizedPath {
        let file = temp.path().join("app.json");
        std::fs::write(&file, document.to_string()).unwrap();
        NormalizedPath::new(file)
    }

    #[test]
    fn test_missing_document_opens_empty() {
        let temp = TempDir::new().unwrap();
        let session =
            SnapshotSession::open(NormalizedPath::new(temp.path().join("app.json"))).unwrap();
        assert!(session.memory().is_empty());
    }

    #[test]
    fn test_create_is_persisted_immediately() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("app.json"));
        let mut session = SnapshotSession::open(path.clone()).unwrap();

        session
            .create(
                EntityKind::Measure,
                &json!({"qInfo": {"qId": "m1", "qType": "measure"}}),
            )
            .unwrap();
        drop(session);

        let reopened = SnapshotSession::open(path).unwrap();
        assert!(reopened.memory().get(EntityKind::Measure, "m1").is_some());
        assert!(reopened.memory().get(EntityKind::Dimension, "m1").is_none());
    }

    #[test]
    fn test_unmanaged_sections_survive_a_rewrite() {
        let temp = TempDir::new().unwrap();
        let sheets = json!([{"qInfo": {"qId": "s1", "qType": "sheet"}, "note": "keep me"}]);
        let path = write_document(
            &temp,
            &json!({
                "dimensions": [{"qInfo": {"qId": "x", "qType": "dimension"}}],
                "sheets": sheets,
                "title": "Sales app",
            }),
        );
        let mut session = SnapshotSession::open(path.clone()).unwrap();

        session
            .create(
                EntityKind::Dimension,
                &json!({"qInfo": {"qId": "d1", "qType": "dimension"}}),
            )
            .unwrap();

        let after: Value = serde_json::from_str(&io::read_text(&path).unwrap()).unwrap();
        assert_eq!(after["sheets"], sheets);
        assert_eq!(after["title"], "Sales app");
        assert_eq!(after["dimensions"].as_array().unwrap().len(), 2);
        assert_eq!(after["measures"], json!([]));
    }

    #[test]
    fn test_entry_without_id_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_document(
            &temp,
            &json!({"dimensions": [
                {"qInfo": {"qId": "x", "qType": "dimension"}},
                {"note": "keep me"},
            ]}),
        );

        let err = SnapshotSession::open(path.clone()).unwrap_err();

        assert!(matches!(err, Error::SnapshotParse { .. }));
        assert!(err.to_string().contains("dimensions[1] has no qInfo.qId"));
        assert!(io::read_text(&path).unwrap().contains("keep me"));
    }

    #[test]
    fn test_managed_section_must_be_a_list() {
        let temp = TempDir::new().unwrap();
        let path = write_document(&temp, &json!({"measures": {"m1": {}}}));

        let err = SnapshotSession::open(path).unwrap_err();

        assert!(err.to_string().contains("'measures' must be a list"));
    }

    #[test]
    fn test_invalid_document_is_reported() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.json");
        std::fs::write(&file, "not json").unwrap();

        let err = SnapshotSession::open(NormalizedPath::new(&file)).unwrap_err();

        assert!(matches!(err, Error::SnapshotParse { .. }));
    }
}
