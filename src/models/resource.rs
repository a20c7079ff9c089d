//! Terminology resource types and their projected fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fields kept for every resource type, in output order.
const COMMON_FIELDS: [&str; 6] = ["url", "version", "id", "name", "title", "status"];

const CODE_SYSTEM_FIELDS: [&str; 7] = [
    "url", "version", "id", "name", "title", "status", "valueSet",
];

const CONCEPT_MAP_FIELDS: [&str; 10] = [
    "url",
    "version",
    "id",
    "name",
    "title",
    "status",
    "sourceUri",
    "targetUri",
    "sourceCanonical",
    "targetCanonical",
];

/// A FHIR terminology resource type that gets snapshotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceType {
    CodeSystem,
    ValueSet,
    ConceptMap,
}

impl ResourceType {
    /// All supported types, in default processing order.
    pub const ALL: [ResourceType; 3] = [Self::CodeSystem, Self::ValueSet, Self::ConceptMap];

    /// FHIR name of the type, as used in URLs and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeSystem => "CodeSystem",
            Self::ValueSet => "ValueSet",
            Self::ConceptMap => "ConceptMap",
        }
    }

    /// Allow-listed fields for this type, in output order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::CodeSystem => &CODE_SYSTEM_FIELDS,
            Self::ValueSet => &COMMON_FIELDS,
            Self::ConceptMap => &CONCEPT_MAP_FIELDS,
        }
    }

    /// Value for the `_elements` search parameter.
    pub fn elements(&self) -> String {
        self.fields().join(",")
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("unsupported resource type '{s}'")))
    }
}

impl TryFrom<String> for ResourceType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}
