//! Entity families managed by engctl

use std::fmt;

use serde::{Serialize, Serializer};

/// A family of remote entities sharing one definition shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Dimension,
    Measure,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Dimension, EntityKind::Measure];

    /// Required value of `qInfo.qType`.
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Dimension => "dimension",
            EntityKind::Measure => "measure",
        }
    }

    /// Plural label, also the name of the config property holding the glob.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Dimension => "dimensions",
            EntityKind::Measure => "measures",
        }
    }

    /// JSON pointer to the display title inside a definition.
    pub fn title_pointer(self) -> &'static str {
        match self {
            EntityKind::Dimension => "/qDim/title",
            EntityKind::Measure => "/qMeasure/title",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}
