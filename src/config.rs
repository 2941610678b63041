use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// How far (in percentage points) assessment weights may drift from 100
    /// before a course forecast is refused.
    pub weight_tolerance: f64,
}

pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.1;

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub forecast: ForecastConfig,
    pub log_json: bool,
}

impl Settings {
    pub const WEIGHT_TOLERANCE_VAR: &'static str = "GRADE_FORECAST_WEIGHT_TOLERANCE";
    pub const LOG_JSON_VAR: &'static str = "GRADE_FORECAST_LOG_JSON";

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let weight_tolerance = match lookup(Self::WEIGHT_TOLERANCE_VAR) {
            Some(raw) => parse_tolerance(&raw)
                .with_context(|| format!("{} must be a non-negative number", Self::WEIGHT_TOLERANCE_VAR))?,
            None => DEFAULT_WEIGHT_TOLERANCE,
        };

        let log_json = match lookup(Self::LOG_JSON_VAR) {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("{} must be true or false", Self::LOG_JSON_VAR))?,
            None => false,
        };

        Ok(Self {
            forecast: ForecastConfig { weight_tolerance },
            log_json,
        })
    }
}

pub fn parse_tolerance(raw: &str) -> anyhow::Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid tolerance {raw:?}"))?;
    anyhow::ensure!(
        value.is_finite() && value >= 0.0,
        "tolerance {value} must be finite and non-negative"
    );
    Ok(value)
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean {other:?}"),
    }
}
