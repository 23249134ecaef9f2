use std::collections::HashMap;
use rand::Rng;

/// Everything the colors registry knows about each language.
pub type ColorTable = HashMap<String, ColorEntry>;

/// A single language's entry in the colors registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorEntry {
    pub color: Option<String>,
    pub url: Option<String>,
}

/// Get the color used to display a language.
///
/// Registered colors are returned exactly as the registry spells them.
/// Unknown languages (or ones without a color) get whatever `random_source`
/// comes up with, so asking twice may give two different answers.
pub fn resolve_color<F>(
    language: &str,
    table: &ColorTable,
    random_source: F,
) -> String
where
    F: FnOnce() -> String,
{
    match table.get(language).and_then(|entry| entry.color.as_ref()) {
        Some(color) => color.clone(),
        None => {
            let color = random_source();
            trace!("No color registered for {}, using {}", language, color);
            color
        }
    }
}

/// Generate a random 6 digit hex color (e.g. `"3FA2C0"`).
pub fn random_color() -> String {
    random_color_from(&mut rand::thread_rng())
}

pub(crate) fn random_color_from<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:06X}", rng.gen_range(0..=0xFF_FFFF_u32))
}
