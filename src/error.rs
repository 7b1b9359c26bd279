//! Error types shared by the search, fetch and API layers.

use thiserror::Error;

use crate::search::date::ACCEPTED_DATE_FORMATS;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A textual date matched none of the accepted formats.
    #[error(
        "{field} {operation} '{value}': date is not in any of the accepted formats: {}",
        ACCEPTED_DATE_FORMATS.join(", ")
    )]
    InvalidDateFormat {
        field: String,
        operation: String,
        value: String,
    },

    /// A relation getter was called although the fetch options never requested it.
    #[error("{relation} of {entity} has not been fetched")]
    NotFetched {
        entity: &'static str,
        relation: &'static str,
    },

    #[error("failed to convert to or from the wire format: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with a JSON-RPC error object.
    #[error("server error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("response contained neither a result nor an error")]
    MissingResult,

    #[error("no session, call login first")]
    NoSession,

    /// The server rejected the credentials.
    #[error("login failed for user '{user}'")]
    LoginFailed { user: String },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl Error {
    pub fn is_not_fetched(&self) -> bool {
        matches!(self, Error::NotFetched { .. })
    }
}
