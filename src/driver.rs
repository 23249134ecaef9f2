use std::collections::BTreeSet;
use failure::{Error, ResultExt};
use rand::Rng;

use crate::classify::classify;
use crate::config::{Config, General};
use crate::contributions::filter_by_contribution;
use crate::errors::AnalysisError;
use crate::github::GitHub;
use crate::languages::{aggregate, percentages};
use crate::repo::{
    LanguageByteMap, LanguagePercentageMap, RepositoryDescriptor,
    RepositorySet, User, UserId,
};
use crate::source::DataSource;

/// Works out a user's languages using whatever a [`DataSource`] tells it.
#[derive(Debug, Clone)]
pub struct Driver<S> {
    config: General,
    source: S,
}

impl Driver<GitHub> {
    /// Create a `Driver` which talks to GitHub.
    pub fn with_config(config: Config) -> Driver<GitHub> {
        let source = GitHub::with_config(config.github);
        Driver::new(config.general, source)
    }
}

impl<S: DataSource> Driver<S> {
    pub fn new(config: General, source: S) -> Driver<S> {
        Driver { config, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Look up a user by login or numeric id.
    pub fn user(&self, id: &UserId) -> Result<User, Error> {
        debug!("Looking up {}", id);
        self.source.user(id)
    }

    /// Total up the languages in a user's own repositories.
    pub fn user_languages(&self, username: &str) -> Result<LanguageByteMap, Error> {
        info!("Fetching {}'s languages", username);

        let repos = self.source
            .repositories(username)
            .context("Unable to fetch repositories")?;
        let set = classify(&repos);

        let languages = aggregate(
            set.public.iter().chain(&set.privates),
            &self.excluded(&set),
            |name| self.source.languages(name),
        );

        Ok(languages)
    }

    /// Find all repositories in the user's organisations which they
    /// contributed to.
    pub fn org_repositories(&self, username: &str) -> Result<Vec<RepositoryDescriptor>, Error> {
        info!("Fetching {}'s organisations", username);

        let orgs = self.source
            .organizations(username)
            .context("Unable to fetch organisations")?;

        let mut repos = Vec::new();

        for org in &orgs {
            match self.source.repositories(org) {
                Ok(found) => {
                    debug!("Found {} repos in {}", found.len(), org);
                    repos.extend(found);
                }
                Err(e) => warn!("Unable to fetch the repositories for {}: {}", org, e),
            }
        }

        let excluded = self.excluded(&classify(&repos));
        let candidates: Vec<_> = repos
            .into_iter()
            .filter(|repo| !excluded.contains(&repo.full_name))
            .collect();

        Ok(filter_by_contribution(username, &candidates, |name| {
            self.source.contributors(name)
        }))
    }

    /// Total up the languages in every organisation repository the user
    /// contributed to.
    pub fn org_languages(&self, username: &str) -> Result<LanguageByteMap, Error> {
        let repos = self.org_repositories(username)?;
        let names: Vec<String> = repos.into_iter().map(|r| r.full_name).collect();

        Ok(aggregate(&names, &BTreeSet::new(), |name| {
            self.source.languages(name)
        }))
    }

    /// The percentage breakdown of a user's own languages, or `None` if they
    /// don't have any.
    pub fn analyze_user(&self, username: &str) -> Result<Option<LanguagePercentageMap>, Error> {
        let languages = self.user_languages(username)?;
        to_percentages(&languages)
    }

    /// The percentage breakdown of the languages a user writes in their
    /// organisations, or `None` if there aren't any.
    pub fn analyze_orgs(&self, username: &str) -> Result<Option<LanguagePercentageMap>, Error> {
        let languages = self.org_languages(username)?;
        to_percentages(&languages)
    }

    /// Keep picking random users until we find one with some languages to
    /// analyse.
    pub fn random_user<R: Rng>(&self, rng: &mut R) -> Result<User, Error> {
        let count = self.source
            .user_count()
            .context("Unable to find out how many users there are")?;
        let attempts = self.config.random_user_attempts;

        if count == 0 {
            return Err(AnalysisError::NoUserFound { attempts: 0 }.into());
        }

        for attempt in 1..=attempts {
            let id = UserId::Id(rng.gen_range(1..=count));
            debug!("Attempt {}/{}, trying user {}", attempt, attempts, id);

            let user = match self.source.user(&id) {
                Ok(u) => u,
                Err(ref e) if is_not_found(e) => continue,
                Err(e) => return Err(e),
            };

            if !self.user_languages(&user.username)?.is_empty() {
                info!("Picked {} after {} attempts", user.username, attempt);
                return Ok(user);
            }
        }

        Err(AnalysisError::NoUserFound { attempts }.into())
    }

    fn excluded(&self, set: &RepositorySet) -> BTreeSet<String> {
        if self.config.count_forks {
            BTreeSet::new()
        } else {
            set.forks.clone()
        }
    }
}

fn to_percentages(languages: &LanguageByteMap) -> Result<Option<LanguagePercentageMap>, Error> {
    if languages.is_empty() {
        return Ok(None);
    }

    Ok(Some(percentages(languages)?))
}

fn is_not_found(e: &Error) -> bool {
    match e.downcast_ref::<AnalysisError>() {
        Some(&AnalysisError::NotFound(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorTable;
    use failure::err_msg;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// An in-memory `DataSource` which remembers which repositories it was
    /// asked about.
    #[derive(Debug, Default)]
    struct FakeSource {
        users: Vec<(u64, User)>,
        repos: HashMap<String, Vec<RepositoryDescriptor>>,
        orgs: HashMap<String, Vec<String>>,
        contributors: HashMap<String, Vec<String>>,
        languages: HashMap<String, LanguageByteMap>,
        user_count: u64,
        language_lookups: RefCell<Vec<String>>,
        contributor_lookups: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with_repo(mut self, owner: &str, repo: RepositoryDescriptor, langs: &[(&str, u64)]) -> Self {
            self.languages.insert(
                repo.full_name.clone(),
                langs.iter().map(|&(l, b)| (l.to_string(), b)).collect(),
            );
            self.repos.entry(owner.to_string()).or_insert_with(Vec::new).push(repo);
            self
        }

        fn with_org(mut self, user: &str, org: &str) -> Self {
            self.orgs.entry(user.to_string()).or_insert_with(Vec::new).push(org.to_string());
            self
        }

        fn with_contributors(mut self, repo: &str, logins: &[&str]) -> Self {
            self.contributors.insert(
                repo.to_string(),
                logins.iter().map(|s| s.to_string()).collect(),
            );
            self
        }

        fn with_user(mut self, id: u64, login: &str) -> Self {
            self.users.push((
                id,
                User {
                    username: login.to_string(),
                    avatar_url: format!("https://avatars.example.com/{}", id),
                },
            ));
            self
        }
    }

    impl DataSource for FakeSource {
        fn repositories(&self, owner: &str) -> Result<Vec<RepositoryDescriptor>, Error> {
            self.repos
                .get(owner)
                .cloned()
                .ok_or_else(|| AnalysisError::NotFound(owner.to_string()).into())
        }

        fn organizations(&self, username: &str) -> Result<Vec<String>, Error> {
            Ok(self.orgs.get(username).cloned().unwrap_or_default())
        }

        fn contributors(&self, full_name: &str) -> Result<Vec<String>, Error> {
            self.contributor_lookups.borrow_mut().push(full_name.to_string());
            self.contributors
                .get(full_name)
                .cloned()
                .ok_or_else(|| err_msg("Repository access blocked"))
        }

        fn languages(&self, full_name: &str) -> Result<LanguageByteMap, Error> {
            self.language_lookups.borrow_mut().push(full_name.to_string());
            self.languages
                .get(full_name)
                .cloned()
                .ok_or_else(|| err_msg("Not Found"))
        }

        fn color_table(&self) -> Result<ColorTable, Error> {
            Ok(ColorTable::new())
        }

        fn user(&self, id: &UserId) -> Result<User, Error> {
            self.users
                .iter()
                .find(|&&(num, ref user)| match *id {
                    UserId::Id(n) => n == num,
                    UserId::Login(ref login) => *login == user.username,
                })
                .map(|&(_, ref user)| user.clone())
                .ok_or_else(|| AnalysisError::NotFound(id.to_string()).into())
        }

        fn user_count(&self) -> Result<u64, Error> {
            Ok(self.user_count)
        }
    }

    fn repo(name: &str, fork: bool, private: bool) -> RepositoryDescriptor {
        RepositoryDescriptor {
            full_name: name.to_string(),
            is_fork: fork,
            is_private: private,
            mirror_url: None,
        }
    }

    fn driver(source: FakeSource) -> Driver<FakeSource> {
        Driver::new(General::default(), source)
    }

    fn alice() -> FakeSource {
        FakeSource::default()
            .with_user(1, "alice")
            .with_repo("alice", repo("alice/go-thing", false, false), &[("Go", 300)])
            .with_repo("alice", repo("alice/secret", false, true), &[("Python", 700)])
            .with_repo("alice", repo("alice/forked", true, false), &[("C", 10_000)])
    }

    #[test]
    fn forks_are_left_out_of_a_users_languages() {
        let d = driver(alice());

        let got = d.analyze_user("alice").unwrap().unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got["Go"], 30.0);
        assert_eq!(got["Python"], 70.0);
        assert!(!d.source().language_lookups.borrow().contains(&String::from("alice/forked")));
    }

    #[test]
    fn forks_can_be_counted_if_asked() {
        let mut cfg = General::default();
        cfg.count_forks = true;
        let d = Driver::new(cfg, alice());

        let got = d.user_languages("alice").unwrap();

        assert_eq!(got["C"], 10_000);
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn no_languages_means_no_data() {
        let source = FakeSource::default()
            .with_repo("bob", repo("bob/empty", false, false), &[])
            .with_repo("bob", repo("bob/fork", true, false), &[("Rust", 5)]);
        let d = driver(source);

        assert_eq!(d.analyze_user("bob").unwrap(), None);
        assert_eq!(d.analyze_orgs("bob").unwrap(), None);
    }

    #[test]
    fn unknown_users_are_not_found() {
        let d = driver(alice());

        let err = d.user(&UserId::from("mallory")).unwrap_err();

        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::NotFound(String::from("mallory")))
        );
    }

    fn org_member() -> FakeSource {
        alice()
            .with_org("alice", "acme")
            .with_org("alice", "ghost-org")
            .with_repo("acme", repo("acme/r1", false, false), &[("Rust", 750)])
            .with_repo("acme", repo("acme/r2", false, false), &[("Java", 1000)])
            .with_repo("acme", repo("acme/blocked", false, false), &[("Perl", 1)])
            .with_repo("acme", repo("acme/fork", true, false), &[("C", 1)])
            .with_repo("acme", repo("acme/r3", false, true), &[("Rust", 250), ("Shell", 0)])
            .with_contributors("acme/r1", &["Alice", "bob"])
            .with_contributors("acme/r2", &["bob"])
            .with_contributors("acme/r3", &["ALICE"])
            .with_contributors("acme/fork", &["alice"])
    }

    #[test]
    fn only_contributed_org_repos_are_used() {
        let d = driver(org_member());

        let repos = d.org_repositories("alice").unwrap();
        let names: Vec<_> = repos.iter().map(|r| r.full_name.as_str()).collect();

        assert_eq!(names, vec!["acme/r1", "acme/r3"]);
        assert!(
            !d.source().contributor_lookups.borrow().contains(&String::from("acme/fork")),
            "Forks shouldn't be checked for contributions"
        );
    }

    #[test]
    fn analyse_org_languages() {
        let d = driver(org_member());

        let got = d.analyze_orgs("alice").unwrap().unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got["Rust"], 100.0);
    }

    #[test]
    fn find_a_random_user_with_languages() {
        let mut source = alice()
            .with_user(2, "nobody")
            .with_repo("nobody", repo("nobody/empty", false, false), &[]);
        source.user_count = 2;
        let mut cfg = General::default();
        cfg.random_user_attempts = 64;
        let d = Driver::new(cfg, source);
        let mut rng = StdRng::seed_from_u64(1);

        let got = d.random_user(&mut rng).unwrap();

        assert_eq!(got.username, "alice");
    }

    #[test]
    fn give_up_looking_for_random_users_eventually() {
        let mut source = FakeSource::default()
            .with_user(1, "nobody")
            .with_repo("nobody", repo("nobody/empty", false, false), &[]);
        source.user_count = 1_000;
        let mut cfg = General::default();
        cfg.random_user_attempts = 5;
        let d = Driver::new(cfg, source);
        let mut rng = StdRng::seed_from_u64(1);

        let err = d.random_user(&mut rng).unwrap_err();

        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::NoUserFound { attempts: 5 })
        );
    }
}
