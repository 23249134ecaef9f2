//! Work out which languages a GitHub user actually writes.
//!
//! The interesting bits are pure functions over data which has already been
//! fetched. They classify repositories ([`classify()`]), keep only the
//! organisation repositories a user has contributed to
//! ([`filter_by_contribution()`]), add up language byte counts
//! ([`aggregate()`]), turn those into percentages ([`percentages()`]) and pick
//! a color for each language ([`resolve_color()`]).
//!
//! Fetching is done by a [`DataSource`]. The [`GitHub`] source talks to the
//! hosted API, and the [`Driver`] glues everything together.

extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate rand;
extern crate reqwest;
extern crate sec;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate toml;

mod classify;
mod colors;
mod config;
mod contributions;
mod driver;
mod errors;
mod github;
mod languages;
mod report;
mod repo;
mod source;
mod utils;

pub use crate::classify::classify;
pub use crate::colors::{random_color, resolve_color, ColorEntry, ColorTable};
pub use crate::config::{Config, General, GitHubConfig};
pub use crate::contributions::filter_by_contribution;
pub use crate::driver::Driver;
pub use crate::errors::AnalysisError;
pub use crate::github::GitHub;
pub use crate::languages::{aggregate, percentages};
pub use crate::report::{LanguageStat, Report};
pub use crate::repo::{
    LanguageByteMap, LanguagePercentageMap, RepositoryDescriptor,
    RepositorySet, User, UserId,
};
pub use crate::source::DataSource;
pub use crate::utils::FailedRequest;
