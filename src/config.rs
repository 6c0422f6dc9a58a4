// ⚙️ Configuration - Environment variables with working defaults
//
// CATALOG_SOURCES     catalog files, joined with the platform path separator
// CATALOG_ADDR        web server bind address
// CATALOG_STATIC_DIR  directory served under /static (item images)

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SOURCES: [&str; 2] = ["data/figures.json", "data/plushes.json"];
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "web";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sources: Vec<PathBuf>,
    pub bind_addr: String,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(PathBuf::from).collect(),
            bind_addr: DEFAULT_ADDR.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(sources) = get("CATALOG_SOURCES") {
            config.sources = env::split_paths(&sources)
                .filter(|path| !path.as_os_str().is_empty())
                .collect();
            if config.sources.is_empty() {
                bail!("CATALOG_SOURCES does not name any file");
            }
        }

        if let Some(addr) = get("CATALOG_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(dir) = get("CATALOG_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.sources,
            vec![PathBuf::from("data/figures.json"), PathBuf::from("data/plushes.json")]
        );
    }

    #[test]
    fn test_overrides() {
        let sources = env::join_paths(["a.json", "b.csv"]).unwrap();
        let sources = sources.to_str().unwrap().to_string();
        let config = Config::from_lookup(lookup(&[
            ("CATALOG_SOURCES", sources.as_str()),
            ("CATALOG_ADDR", "127.0.0.1:8080"),
            ("CATALOG_STATIC_DIR", "public"),
        ]))
        .unwrap();

        assert_eq!(config.sources, vec![PathBuf::from("a.json"), PathBuf::from("b.csv")]);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[("CATALOG_ADDR", "  ")])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_ADDR);
    }
}
