//! Missing-person record model
//!
//! Field names on disk follow the existing store document and browser
//! frontend (`nomeCompleto`, `fotoUrl`, ...), so documents written by
//! earlier deployments load unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder written to `sexo` for every new registration
pub const SEX_NOT_INFORMED: &str = "Não Informado";

/// Minimum width of the zero-padded record id
const ID_WIDTH: usize = 3;

/// Lifecycle status of a record
///
/// Only `Missing → Found` is ever performed by the service. Any other string
/// found in a hand-edited document is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    #[default]
    Missing,
    Found,
    Other(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Missing => "Desaparecido",
            RecordStatus::Found => "Encontrada",
            RecordStatus::Other(s) => s,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Desaparecido" => RecordStatus::Missing,
            "Encontrada" => RecordStatus::Found,
            _ => RecordStatus::Other(s),
        }
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the person was last seen (all free text)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisappearanceLocation {
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "estado", default)]
    pub state: Option<String>,
    #[serde(rename = "pontoReferencia", default)]
    pub reference_point: Option<String>,
}

/// One entry of the store document
///
/// No field is validated. Absent values serialize as `null`; keys this
/// struct does not model are kept in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MissingPersonRecord {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "nomeCompleto", default)]
    pub full_name: Option<String>,

    #[serde(rename = "dataNascimento", default)]
    pub birth_date: Option<String>,

    #[serde(rename = "telefoneContato", default)]
    pub contact_phone: Option<String>,

    #[serde(rename = "sexo", default)]
    pub sex: Option<String>,

    #[serde(rename = "dataDesaparecimento", default)]
    pub disappearance_date: Option<String>,

    #[serde(rename = "localDesaparecimento", default)]
    pub disappearance_location: DisappearanceLocation,

    #[serde(rename = "caracteristicas", default)]
    pub characteristics: Option<String>,

    #[serde(rename = "fotoUrl", default)]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub status: RecordStatus,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MissingPersonRecord {
    pub fn is_found(&self) -> bool {
        self.status == RecordStatus::Found
    }
}

/// Id for the record appended after `existing` records
///
/// Derived from the collection length, not a persisted counter: ids repeat
/// if records are ever removed from the document by hand.
pub fn next_id(existing: usize) -> String {
    format!("{:0width$}", existing + 1, width = ID_WIDTH)
}
