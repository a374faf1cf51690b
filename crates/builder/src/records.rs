//! Input record loading
//!
//! Deserializes the legislator and authorship record files produced by the
//! upstream data collection. Field names follow the Chamber of Deputies
//! open-data schema; unknown fields are ignored.

use crate::errors::BuilderError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One legislator mandate: the same person appears once per legislature
#[derive(Debug, Clone, Deserialize)]
pub struct LegislatorRecord {
    pub id: u64,

    #[serde(rename = "idLegislatura")]
    pub legislature: u32,

    /// Year of the election that opened the mandate
    pub election_year: i32,

    #[serde(rename = "siglaPartido")]
    pub party: Option<String>,

    #[serde(rename = "siglaUf")]
    pub state: Option<String>,

    #[serde(rename = "sexo")]
    pub gender: Option<String>,

    #[serde(rename = "dataNascimento")]
    pub birth_date: Option<String>,

    pub education: Option<String>,
    pub occupation: Option<String>,
    pub ethnicity: Option<String>,
}

/// One (proposal, author) pair for one year
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorshipRecord {
    #[serde(rename = "idProposicao")]
    pub proposal_id: u64,

    /// Author identifier; matches `LegislatorRecord::id` for deputies
    #[serde(rename = "id")]
    pub author_id: u64,

    pub year: i32,

    /// Author chamber ("deputados", "senadores", ...)
    #[serde(rename = "type")]
    pub kind: String,
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, BuilderError> {
    let content = fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            BuilderError::FileNotFound(path.display().to_string())
        } else {
            BuilderError::IoError(err)
        }
    })?;
    serde_json::from_str(&content).map_err(|err| BuilderError::RecordParseError {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Load the legislator record file (a JSON array)
pub fn load_legislators(path: &Path) -> Result<Vec<LegislatorRecord>, BuilderError> {
    let records = load_records(path)?;
    tracing::info!(path = %path.display(), count = records.len(), "Legislator records loaded");
    Ok(records)
}

/// Load the authorship record file (a JSON array)
pub fn load_authorships(path: &Path) -> Result<Vec<AuthorshipRecord>, BuilderError> {
    let records = load_records(path)?;
    tracing::info!(path = %path.display(), count = records.len(), "Authorship records loaded");
    Ok(records)
}
