//! Structural validation of entity definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::EntityKind;

/// Why a definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("could not parse definition: {0}")]
    Malformed(String),

    #[error("missing qInfo attribute")]
    MissingInfo,

    #[error("missing qInfo qId attribute")]
    MissingId,

    #[error("missing qInfo qType attribute")]
    MissingType,

    #[error("{} must have qType: {} (found '{found}')", .expected.plural(), .expected.tag())]
    WrongType { expected: EntityKind, found: String },
}

/// The identity block of a definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    #[serde(rename = "qId", default)]
    pub id: String,

    #[serde(rename = "qType", default)]
    pub kind: String,
}

#[derive(Deserialize)]
struct Shape {
    #[serde(rename = "qInfo", default)]
    info: Option<EntityInfo>,
}

/// A validated entity definition.
///
/// Keeps the original document so it can be handed to the session as-is;
/// only the identity block is interpreted locally.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    info: EntityInfo,
    raw: Value,
}

impl EntityDefinition {
    /// Decode and validate `raw` as a definition of `expected`.
    pub fn parse(raw: Value, expected: EntityKind) -> Result<Self, DefinitionError> {
        let shape =
            Shape::deserialize(&raw).map_err(|e| DefinitionError::Malformed(e.to_string()))?;
        let info = shape.info.ok_or(DefinitionError::MissingInfo)?;

        if info.id.is_empty() {
            return Err(DefinitionError::MissingId);
        }
        if info.kind.is_empty() {
            return Err(DefinitionError::MissingType);
        }
        if info.kind != expected.tag() {
            return Err(DefinitionError::WrongType {
                expected,
                found: info.kind,
            });
        }

        Ok(Self { info, raw })
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// The definition exactly as read from the file.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
