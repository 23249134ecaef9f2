use std::fs;
use std::path::Path;
use failure::{Error, ResultExt};
use sec::Secret;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub general: General,
    pub github: GitHubConfig,
}

impl Config {
    /// Load the config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        debug!("Reading config from {}", path.display());

        let contents = fs::read_to_string(path)
            .with_context(|_| format!("Unable to read {}", path.display()))?;

        Config::from_toml(&contents)
    }

    pub fn from_toml(src: &str) -> Result<Config, Error> {
        let cfg = toml::from_str(src).context("Invalid config")?;
        Ok(cfg)
    }

    /// A config with every field filled out.
    pub fn example() -> Config {
        let mut cfg = Config::default();
        cfg.github.api_key = Some(Secret::new(String::from("your-api-token")));
        cfg
    }

    pub fn as_toml(&self) -> Result<String, Error> {
        let src = toml::to_string_pretty(self).context("Unable to serialize the config")?;
        Ok(src)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct General {
    /// Count forks towards a user's languages and check them for
    /// contributions.
    pub count_forks: bool,
    /// How many random users to try before giving up.
    pub random_user_attempts: usize,
}

impl General {
    pub const DEFAULT_RANDOM_USER_ATTEMPTS: usize = 10;
}

impl Default for General {
    fn default() -> General {
        General {
            count_forks: false,
            random_user_attempts: General::DEFAULT_RANDOM_USER_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitHubConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Secret<String>>,
    pub api_url: String,
    /// Where to download the language colors registry from.
    pub colors_url: String,
    /// A user search page which says how many users there are.
    pub search_url: String,
    pub agent: String,
}

impl GitHubConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";
    pub const DEFAULT_COLORS_URL: &'static str =
        "https://raw.githubusercontent.com/ozh/github-colors/master/colors.json";
    pub const DEFAULT_SEARCH_URL: &'static str =
        "https://github.com/search?utf8=%E2%9C%93&q=repos%3A%3E-1&type=Users&ref=searchresults";
    pub const DEFAULT_AGENT: &'static str = "ghuls";

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.reveal().as_str())
    }
}

impl Default for GitHubConfig {
    fn default() -> GitHubConfig {
        GitHubConfig {
            api_key: None,
            api_url: GitHubConfig::DEFAULT_API_URL.to_string(),
            colors_url: GitHubConfig::DEFAULT_COLORS_URL.to_string(),
            search_url: GitHubConfig::DEFAULT_SEARCH_URL.to_string(),
            agent: GitHubConfig::DEFAULT_AGENT.to_string(),
        }
    }
}
