use crate::repo::{RepositoryDescriptor, RepositorySet};

/// Sort repositories into public, private, fork and mirror buckets.
///
/// `public` keeps the order repositories were given in. Private repositories
/// never show up in `public`, while forks and mirrors are recorded on top of
/// wherever else they land.
pub fn classify<'a, I>(repos: I) -> RepositorySet
where
    I: IntoIterator<Item = &'a RepositoryDescriptor>,
{
    let mut set = RepositorySet::default();

    for repo in repos {
        let name = &repo.full_name;

        if repo.is_private {
            set.privates.insert(name.clone());
        } else {
            set.public.push(name.clone());
        }

        if repo.is_fork {
            set.forks.insert(name.clone());
        }
        if repo.is_mirror() {
            set.mirrors.insert(name.clone());
        }
    }

    trace!(
        "Classified repositories ({} public, {} private, {} forks, {} mirrors)",
        set.public.len(),
        set.privates.len(),
        set.forks.len(),
        set.mirrors.len()
    );

    set
}
