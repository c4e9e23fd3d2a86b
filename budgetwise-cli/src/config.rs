use anyhow::{Context, Result};
use budgetwise_advisor::GeminiConfig;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_budgetwise_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub advisor: AdvisorSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisorSection {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    /// File holding the Gemini API key; GEMINI_API_KEY takes precedence
    pub api_key_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    /// Used when the profile has no currency yet
    pub currency_symbol: String,
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
}

impl Default for AdvisorSection {
    fn default() -> Self {
        let g = GeminiConfig::default();
        Self {
            model: g.model,
            base_url: g.base_url,
            temperature: g.temperature,
            timeout_secs: g.timeout_secs,
            api_key_file: Some("gemini_key.txt".to_string()),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            model: self.advisor.model.clone(),
            base_url: self.advisor.base_url.clone(),
            temperature: self.advisor.temperature,
            timeout_secs: self.advisor.timeout_secs,
        }
    }

    /// Key file path; relative paths resolve against the state dir
    pub fn api_key_file(&self) -> Result<Option<PathBuf>> {
        let Some(f) = self.advisor.api_key_file.as_deref().filter(|f| !f.trim().is_empty()) else {
            return Ok(None);
        };
        let p = PathBuf::from(f);
        if p.is_absolute() {
            Ok(Some(p))
        } else {
            Ok(Some(ensure_budgetwise_home()?.join(p)))
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.display
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid display.timezone '{}': {e}", self.display.timezone))
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.timezone()?).date_naive())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_budgetwise_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}\n", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[display]\ntimezone = \"Asia/Kolkata\"\n").unwrap();
        assert_eq!(cfg.display.timezone, "Asia/Kolkata");
        assert_eq!(cfg.display.currency_symbol, "$");
        assert_eq!(cfg.advisor.model, "gemini-1.5-pro");
        assert_eq!(cfg.advisor.timeout_secs, 30);
    }

    #[test]
    fn test_round_trip() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(toml::from_str::<Config>(&s).unwrap(), cfg);
    }

    #[test]
    fn test_timezone() {
        let mut cfg = Config::default();
        assert!(cfg.today().is_ok());
        cfg.display.timezone = "Mars/Olympus".to_string();
        assert!(cfg.timezone().is_err());
    }

    #[test]
    fn test_gemini_config_from_section() {
        let mut cfg = Config::default();
        cfg.advisor.temperature = 0.3;
        let g = cfg.gemini();
        assert_eq!(g.temperature, 0.3);
        assert_eq!(g.base_url, "https://generativelanguage.googleapis.com/v1");
    }
}
