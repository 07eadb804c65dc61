use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_NEWS_TABLE: &str = "ethereum_articles";
const DEFAULT_PRICE_TABLE: &str = "api_data";
const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Where the raw record sets come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Rest {
        base_url: String,
        api_key: String,
        news_table: String,
        price_table: String,
    },
    Csv {
        news_path: PathBuf,
        price_path: PathBuf,
    },
}

/// Runtime settings, read from the environment (and `.env`, loaded by `main`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub cache_ttl: Duration,
    pub report_html: Option<PathBuf>,
    pub priced_only: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error naming the variable if a required value is absent or
    /// a value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| lookup(key).with_context(|| format!("{} must be set", key));

        let kind = lookup("DATA_SOURCE").unwrap_or_else(|| "rest".to_string());
        let source = match kind.to_ascii_lowercase().as_str() {
            "rest" => SourceConfig::Rest {
                base_url: require("SUPABASE_URL")?,
                api_key: require("SUPABASE_KEY")?,
                news_table: lookup("NEWS_TABLE").unwrap_or_else(|| DEFAULT_NEWS_TABLE.to_string()),
                price_table: lookup("PRICE_TABLE")
                    .unwrap_or_else(|| DEFAULT_PRICE_TABLE.to_string()),
            },
            "csv" => SourceConfig::Csv {
                news_path: require("NEWS_CSV")?.into(),
                price_path: require("PRICE_CSV")?.into(),
            },
            other => bail!("DATA_SOURCE must be `rest` or `csv`, got `{}`", other),
        };

        let cache_ttl = match lookup("CACHE_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("CACHE_TTL_SECS is not a number of seconds: {}", raw))?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        let priced_only = match lookup("PRICED_ONLY") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("PRICED_ONLY must be true or false: {}", raw))?,
            None => false,
        };

        Ok(Self {
            source,
            cache_ttl: Duration::from_secs(cache_ttl),
            report_html: lookup("REPORT_HTML").map(PathBuf::from),
            priced_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_rest_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Rest {
                base_url: "https://demo.supabase.co".to_string(),
                api_key: "secret".to_string(),
                news_table: "ethereum_articles".to_string(),
                price_table: "api_data".to_string(),
            }
        );
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.report_html, None);
        assert!(!config.priced_only);
    }

    #[test]
    fn test_csv_source_and_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATA_SOURCE", "CSV"),
            ("NEWS_CSV", "news.csv"),
            ("PRICE_CSV", "prices.csv"),
            ("CACHE_TTL_SECS", "0"),
            ("REPORT_HTML", "headlines.html"),
            ("PRICED_ONLY", "true"),
        ]))
        .unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Csv {
                news_path: "news.csv".into(),
                price_path: "prices.csv".into(),
            }
        );
        assert_eq!(config.cache_ttl, Duration::ZERO);
        assert_eq!(config.report_html, Some(PathBuf::from("headlines.html")));
        assert!(config.priced_only);
    }

    #[test]
    fn test_missing_credentials_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x")])).unwrap_err();

        assert!(err.to_string().contains("SUPABASE_KEY"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("DATA_SOURCE", "sqlite")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[
            ("DATA_SOURCE", "csv"),
            ("NEWS_CSV", "n"),
            ("PRICE_CSV", "p"),
            ("CACHE_TTL_SECS", "soon"),
        ]))
        .is_err());
    }
}
