use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::colors::{resolve_color, ColorTable};
use crate::repo::LanguagePercentageMap;

/// A language, how much of it was written, and the color to show it in.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageStat {
    pub language: String,
    pub percentage: f64,
    pub color: String,
}

/// Languages ordered from most to least used.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub stats: Vec<LanguageStat>,
}

impl Report {
    pub fn new<F>(
        percentages: &LanguagePercentageMap,
        colors: &ColorTable,
        mut random_source: F,
    ) -> Report
    where
        F: FnMut() -> String,
    {
        let mut stats: Vec<_> = percentages
            .iter()
            .map(|(language, &percentage)| LanguageStat {
                language: language.clone(),
                percentage,
                color: resolve_color(language, colors, &mut random_source),
            })
            .collect();

        stats.sort_by(|left, right| {
            right
                .percentage
                .partial_cmp(&left.percentage)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.language.cmp(&right.language))
        });

        Report { stats }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let width = self
            .stats
            .iter()
            .map(|s| s.language.len())
            .max()
            .unwrap_or(0);

        for stat in &self.stats {
            writeln!(
                f,
                "{:<width$}  {:>6.2}%  {}",
                stat.language,
                stat.percentage,
                stat.color,
                width = width
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorEntry;

    fn percents(items: &[(&str, f64)]) -> LanguagePercentageMap {
        items.iter().map(|&(l, p)| (l.to_string(), p)).collect()
    }

    #[test]
    fn most_used_languages_come_first() {
        let mut colors = ColorTable::new();
        colors.insert(
            String::from("Go"),
            ColorEntry {
                color: Some(String::from("#00ADD8")),
                url: None,
            },
        );
        let input = percents(&[("Go", 30.0), ("Python", 70.0), ("Awk", 0.0), ("Zsh", 0.0)]);

        let got = Report::new(&input, &colors, || String::from("ABCDEF"));

        let order: Vec<_> = got.stats.iter().map(|s| s.language.as_str()).collect();
        assert_eq!(order, vec!["Python", "Go", "Awk", "Zsh"]);
        assert_eq!(got.stats[1].color, "#00ADD8");
        assert_eq!(got.stats[0].color, "ABCDEF");
    }

    #[test]
    fn display_as_a_table() {
        let input = percents(&[("Go", 30.0), ("Python", 70.0)]);

        let got = Report::new(&input, &ColorTable::new(), || String::from("123456")).to_string();

        assert_eq!(got, "Python   70.00%  123456\nGo       30.00%  123456\n");
    }
}
