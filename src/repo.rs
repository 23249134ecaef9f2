use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

/// Language name to the number of bytes written in it.
pub type LanguageByteMap = BTreeMap<String, u64>;

/// Language name to its share of the total, as a percentage rounded to two
/// decimal places.
pub type LanguagePercentageMap = BTreeMap<String, f64>;

/// A snapshot of a repository as reported by the forge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// The repository's unique `owner/name`.
    pub full_name: String,
    pub is_fork: bool,
    pub is_private: bool,
    /// Where this repository mirrors from, if it is a mirror.
    pub mirror_url: Option<String>,
}

impl RepositoryDescriptor {
    pub fn new<S: Into<String>>(full_name: S) -> RepositoryDescriptor {
        RepositoryDescriptor {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn is_mirror(&self) -> bool {
        self.mirror_url
            .as_ref()
            .map(|url| !url.is_empty())
            .unwrap_or(false)
    }
}

/// Repository names, bucketed by [`crate::classify()`].
///
/// A name only ever lands in one of `public` or `privates`, but forks and
/// mirrors are tracked independently of that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositorySet {
    pub public: Vec<String>,
    pub forks: BTreeSet<String>,
    pub mirrors: BTreeSet<String>,
    pub privates: BTreeSet<String>,
}

impl RepositorySet {
    pub fn is_empty(&self) -> bool {
        self.public.is_empty()
            && self.forks.is_empty()
            && self.mirrors.is_empty()
            && self.privates.is_empty()
    }
}

/// Someone with an account on the forge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub avatar_url: String,
}

/// The ways a user can be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserId {
    Login(String),
    Id(u64),
}

impl<'a> From<&'a str> for UserId {
    /// Anything made entirely of digits is treated as a numeric id.
    fn from(other: &'a str) -> UserId {
        match other.parse() {
            Ok(id) => UserId::Id(id),
            Err(_) => UserId::Login(other.to_string()),
        }
    }
}

impl From<u64> for UserId {
    fn from(other: u64) -> UserId {
        UserId::Id(other)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            UserId::Login(ref login) => write!(f, "{}", login),
            UserId::Id(id) => write!(f, "#{}", id),
        }
    }
}
