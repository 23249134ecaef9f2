use failure::Error;

use crate::colors::ColorTable;
use crate::repo::{LanguageByteMap, RepositoryDescriptor, User, UserId};

/// Something which can tell us about users, their organisations, and their
/// repositories.
///
/// Caching, rate limiting, pagination and authentication are all the
/// source's problem.
pub trait DataSource {
    /// All repositories belonging to a user or organisation.
    fn repositories(&self, owner: &str) -> Result<Vec<RepositoryDescriptor>, Error>;

    /// The logins of every organisation a user is a public member of.
    fn organizations(&self, username: &str) -> Result<Vec<String>, Error>;

    /// The logins of everyone who contributed to a repository.
    ///
    /// A repository with no contributors gives back an empty list rather
    /// than an error.
    fn contributors(&self, full_name: &str) -> Result<Vec<String>, Error>;

    fn languages(&self, full_name: &str) -> Result<LanguageByteMap, Error>;

    /// Download the language colors registry.
    fn color_table(&self) -> Result<ColorTable, Error>;

    /// Look up a user, failing with [`crate::AnalysisError::NotFound`] if
    /// they don't exist.
    fn user(&self, id: &UserId) -> Result<User, Error>;

    /// Roughly how many users there are.
    fn user_count(&self) -> Result<u64, Error>;
}
