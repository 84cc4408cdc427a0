use anyhow::Result;
use figment::{Figment, providers::{Format, Toml, Env, Serialized}};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub data_file: Option<String>,
    pub default_client: Option<String>,
    pub seed: Option<u64>,
    pub currency_label: String,
    pub export_dir: String,
    pub performance: PerformanceSettings,
    pub growth: GrowthSettings,
    pub ui_settings: UiSettings,
}

/// Shape of the synthetic performance random walk and the month slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSettings {
    pub default_months: usize,
    pub min_months: usize,
    pub max_months: usize,
    pub drift: f64,
    pub step_std_dev: f64,
    pub walk_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSettings {
    pub min_pct: f64,
    pub max_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    pub refresh_rate_ms: u64,
    pub show_log_panel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            default_client: None,
            seed: None,
            currency_label: "INR Lakhs".to_string(),
            export_dir: ".".to_string(),
            performance: PerformanceSettings::default(),
            growth: GrowthSettings::default(),
            ui_settings: UiSettings::default(),
        }
    }
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            default_months: 12,
            min_months: 3,
            max_months: 36,
            drift: 1.5,
            step_std_dev: 2.0,
            walk_offset: 10.0,
        }
    }
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            min_pct: -5.0,
            max_pct: 18.0,
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 250,
            show_log_panel: true,
        }
    }
}

impl PerformanceSettings {
    pub fn clamp_months(&self, months: usize) -> usize {
        months.clamp(self.min_months, self.max_months)
    }
}

pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_file = config_path.unwrap_or("config.toml");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_file))
        .merge(Env::prefixed("HNI_").split("__"))
        .extract()?;

    validate_config(&config)?;

    Ok(config)
}

pub fn generate_sample_config() -> Result<()> {
    save_config_to_file(&Config::default(), "config.toml")
}

pub fn validate_config(config: &Config) -> Result<()> {
    let perf = &config.performance;

    if perf.min_months < 2 {
        return Err(anyhow::anyhow!("performance.min_months must be at least 2"));
    }

    if perf.min_months > perf.max_months {
        return Err(anyhow::anyhow!(
            "performance.min_months ({}) exceeds max_months ({})",
            perf.min_months,
            perf.max_months
        ));
    }

    if perf.default_months < perf.min_months || perf.default_months > perf.max_months {
        return Err(anyhow::anyhow!(
            "performance.default_months must lie within {}..={}",
            perf.min_months,
            perf.max_months
        ));
    }

    if !(perf.step_std_dev >= 0.0 && perf.step_std_dev.is_finite()) {
        return Err(anyhow::anyhow!("performance.step_std_dev must be a non-negative number"));
    }

    if !(config.growth.min_pct < config.growth.max_pct) {
        return Err(anyhow::anyhow!("growth.min_pct must be below growth.max_pct"));
    }

    if config.ui_settings.refresh_rate_ms < 50 {
        return Err(anyhow::anyhow!("UI refresh_rate_ms must be at least 50ms"));
    }

    Ok(())
}

pub fn save_config_to_file(config: &Config, path: &str) -> Result<()> {
    let toml_content = toml::to_string_pretty(config)?;
    fs::write(path, toml_content)?;
    Ok(())
}
