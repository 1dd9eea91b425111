pub mod config;
pub mod quiz;
pub mod study;
pub mod timer;
pub mod topics;

use biochem_study_core::planner::DifficultyBand;
use biochem_study_core::{Config, LocalStudyApi};

/// Config from disk plus an API over the configured bank.
pub(crate) fn load_api() -> Result<(Config, LocalStudyApi), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let api = LocalStudyApi::from_config(&config.bank)?;
    Ok((config, api))
}

/// Parse `band=value`, e.g. `core=0.8`.
pub(crate) fn parse_band_value(s: &str) -> Result<(DifficultyBand, f64), String> {
    let (band, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected band=value, got '{s}'"))?;
    let band: DifficultyBand = band.parse()?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {band}: {e}"))?;
    Ok((band, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_value_parses() {
        assert_eq!(
            parse_band_value("core=0.8").unwrap(),
            (DifficultyBand::Core, 0.8)
        );
        assert_eq!(
            parse_band_value("Advanced= 1").unwrap(),
            (DifficultyBand::Advanced, 1.0)
        );
    }

    #[test]
    fn band_value_rejects_garbage() {
        assert!(parse_band_value("core").is_err());
        assert!(parse_band_value("hard=0.5").is_err());
        assert!(parse_band_value("intro=lots").is_err());
    }
}
