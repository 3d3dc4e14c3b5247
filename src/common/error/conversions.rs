//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;

impl From<pulp_zip::Error> for Error {
    fn from(err: pulp_zip::Error) -> Self {
        match err {
            pulp_zip::Error::MissingEndOfCentralDirectory => {
                Error::MalformedArchive("end of central directory record not found".to_string())
            },
            pulp_zip::Error::Truncated(what) => {
                Error::MalformedArchive(format!("truncated {what}"))
            },
            pulp_zip::Error::UnsupportedCompression(method) => {
                Error::UnsupportedCompression(method)
            },
            pulp_zip::Error::EntryTooLarge(name) => {
                Error::MalformedArchive(format!("entry too large: {name}"))
            },
            pulp_zip::Error::Io(e) => Error::Io(e),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::ParseFailure(err.to_string())
    }
}
