use failure::Error;

use crate::repo::RepositoryDescriptor;

/// Keep only the repositories `username` has contributed to.
///
/// Logins are compared case-insensitively and must match in full. A
/// repository is skipped (not treated as an error) when it has no
/// contributors or when looking its contributors up fails.
pub fn filter_by_contribution<F>(
    username: &str,
    org_repos: &[RepositoryDescriptor],
    mut contributor_lookup: F,
) -> Vec<RepositoryDescriptor>
where
    F: FnMut(&str) -> Result<Vec<String>, Error>,
{
    let wanted = username.to_lowercase();
    let mut contributed = Vec::new();

    for repo in org_repos {
        let contributors = match contributor_lookup(&repo.full_name) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Skipping {}, unable to get its contributors: {}",
                    repo.full_name, e
                );
                continue;
            }
        };

        if contributors.is_empty() {
            trace!("{} has no contributors", repo.full_name);
            continue;
        }

        if contributors.iter().any(|login| login.to_lowercase() == wanted) {
            contributed.push(repo.clone());
        }
    }

    debug!(
        "{} contributed to {} of {} repositories",
        username,
        contributed.len(),
        org_repos.len()
    );

    contributed
}
