use std::collections::BTreeSet;
use failure::Error;

use crate::errors::AnalysisError;
use crate::repo::{LanguageByteMap, LanguagePercentageMap};

/// Add up the language byte counts for a bunch of repositories.
///
/// Anything in `exclude` (typically the forks) is skipped without ever
/// asking `language_lookup` about it. Repositories whose lookup fails are
/// logged and left out. An empty map means there was no data, which isn't an
/// error.
pub fn aggregate<'a, I, F>(
    repo_full_names: I,
    exclude: &BTreeSet<String>,
    mut language_lookup: F,
) -> LanguageByteMap
where
    I: IntoIterator<Item = &'a String>,
    F: FnMut(&str) -> Result<LanguageByteMap, Error>,
{
    let mut totals = LanguageByteMap::new();

    for name in repo_full_names {
        if exclude.contains(name) {
            trace!("Skipping {}", name);
            continue;
        }

        let languages = match language_lookup(name) {
            Ok(l) => l,
            Err(e) => {
                warn!("Skipping {}, unable to get its languages: {}", name, e);
                continue;
            }
        };

        for (language, bytes) in languages {
            if bytes == 0 {
                continue;
            }
            *totals.entry(language).or_insert(0) += bytes;
        }
    }

    debug!("Found {} languages", totals.len());
    totals
}

/// Work out what percentage of the total each language makes up.
///
/// Each value is rounded to two decimal places, with halves rounded up. The
/// rounding is done on the exact ratio so a percentage like 14.375 always
/// becomes 14.38. No correction is made so the values add up to exactly 100.
pub fn percentages(
    bytes: &LanguageByteMap,
) -> Result<LanguagePercentageMap, AnalysisError> {
    let total: u128 = bytes.values().map(|&b| u128::from(b)).sum();

    if total == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    Ok(bytes
        .iter()
        .map(|(language, &count)| {
            (language.clone(), hundredths_of_a_percent(u128::from(count), total) as f64 / 100.0)
        })
        .collect())
}

/// `part / whole` as a count of hundredths of a percent, rounding halves up.
fn hundredths_of_a_percent(part: u128, whole: u128) -> u128 {
    (part * 20_000 + whole) / (2 * whole)
}
