use std::fmt::{self, Debug, Formatter};
use failure::{Error, ResultExt};
use reqwest::StatusCode;

use crate::colors::ColorTable;
use crate::config::GitHubConfig;
use crate::errors::AnalysisError;
use crate::repo::{LanguageByteMap, RepositoryDescriptor, User, UserId};
use crate::source::DataSource;
use crate::utils::{Api, FailedRequest};

/// An interface to the users and repositories stored on GitHub.
#[derive(Clone)]
pub struct GitHub {
    cfg: GitHubConfig,
    api: Api,
}

impl GitHub {
    /// Create a new `GitHub` with the provided config.
    pub fn with_config(cfg: GitHubConfig) -> GitHub {
        let api = Api::new(&cfg.agent, cfg.api_key());
        GitHub { cfg, api }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.api_url.trim_end_matches('/'), path)
    }

    fn convert_repo(&self, raw: RawRepo) -> RepositoryDescriptor {
        RepositoryDescriptor {
            full_name: raw.full_name,
            is_fork: raw.fork,
            is_private: raw.private,
            mirror_url: raw.mirror_url,
        }
    }
}

impl DataSource for GitHub {
    fn repositories(&self, owner: &str) -> Result<Vec<RepositoryDescriptor>, Error> {
        debug!("Fetching repositories for {}", owner);

        let endpoint = self.endpoint(&format!("users/{}/repos", owner));
        let mut repos = Vec::new();

        for repo in self.api.paginated(&endpoint) {
            let repo: RawRepo = repo?;
            repos.push(self.convert_repo(repo));
        }

        debug!("{} has {} repos", owner, repos.len());
        Ok(repos)
    }

    fn organizations(&self, username: &str) -> Result<Vec<String>, Error> {
        debug!("Fetching organisations for {}", username);

        let endpoint = self.endpoint(&format!("users/{}/orgs", username));
        let mut orgs = Vec::new();

        for org in self.api.paginated(&endpoint) {
            let org: Login = org?;
            orgs.push(org.login);
        }

        Ok(orgs)
    }

    fn contributors(&self, full_name: &str) -> Result<Vec<String>, Error> {
        let endpoint = self.endpoint(&format!("repos/{}/contributors", full_name));
        let mut logins = Vec::new();

        for contributor in self.api.paginated(&endpoint) {
            let contributor: Login = contributor?;
            logins.push(contributor.login);
        }

        Ok(logins)
    }

    fn languages(&self, full_name: &str) -> Result<LanguageByteMap, Error> {
        let languages: LanguageByteMap = self.api
            .get(&self.endpoint(&format!("repos/{}/languages", full_name)))
            .with_context(|_| format!("Unable to get the languages for {}", full_name))?;

        Ok(languages)
    }

    fn color_table(&self) -> Result<ColorTable, Error> {
        debug!("Fetching the language colors");

        let colors: ColorTable = self.api
            .get_external(&self.cfg.colors_url)
            .context("Unable to download the language colors")?;

        Ok(colors)
    }

    fn user(&self, id: &UserId) -> Result<User, Error> {
        let endpoint = match *id {
            UserId::Login(ref login) => self.endpoint(&format!("users/{}", login)),
            UserId::Id(id) => self.endpoint(&format!("user/{}", id)),
        };

        let raw: RawUser = self.api.get(&endpoint).map_err(|e| not_found(e, id))?;

        Ok(User {
            username: raw.login,
            avatar_url: raw.avatar_url,
        })
    }

    fn user_count(&self) -> Result<u64, Error> {
        let page = self.api
            .get_text(&self.cfg.search_url)
            .context("Unable to fetch the user search page")?;

        match parse_user_count(&page) {
            Some(count) => Ok(count),
            None => Err(failure::err_msg(
                "Couldn't find the number of users on the search page",
            )),
        }
    }
}

impl Debug for GitHub {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("GitHub")
            .field("api_url", &self.cfg.api_url)
            .finish()
    }
}

/// Turn a 404 into the more meaningful `NotFound`.
fn not_found(e: Error, id: &UserId) -> Error {
    let is_404 = e
        .downcast_ref::<FailedRequest>()
        .map(|req| req.status() == StatusCode::NOT_FOUND)
        .unwrap_or(false);

    if is_404 {
        AnalysisError::NotFound(id.to_string()).into()
    } else {
        e
    }
}

/// Find the "Showing 12,345 available users" blurb on the search page.
fn parse_user_count(page: &str) -> Option<u64> {
    const PREFIX: &str = "Showing ";
    const SUFFIX: &str = " available users";

    let end = page.find(SUFFIX)?;
    let start = page[..end].rfind(PREFIX)? + PREFIX.len();

    page[start..end]
        .chars()
        .filter(|c| *c != ',')
        .collect::<String>()
        .trim()
        .parse()
        .ok()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawRepo {
    full_name: String,
    fork: bool,
    private: bool,
    mirror_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Login {
    login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawUser {
    login: String,
    avatar_url: String,
}
