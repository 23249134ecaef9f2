//! The errors encountered in this crate.

/// Something went wrong while analysing a user's languages.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum AnalysisError {
    /// The user or repository identifier didn't resolve to anything.
    #[fail(display = "Unable to find \"{}\"", _0)]
    NotFound(String),
    /// There were no bytes to calculate percentages from.
    #[fail(display = "There is no language data to calculate percentages from")]
    EmptyInput,
    /// Every attempt at finding a random user with language data failed.
    #[fail(
        display = "Unable to find a user with language data after {} attempts",
        attempts
    )]
    NoUserFound { attempts: usize },
}
