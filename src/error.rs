//! Application Error Types

use derive_more::{Display, Error};

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("no music library given")]
    MissingLibrary,
    #[display("invalid path template")]
    Template,
    #[display("could not open music library")]
    Library,
    #[display("could not write report")]
    Output,
}
