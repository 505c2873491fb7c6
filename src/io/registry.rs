//! Country registry: which model and onset threshold each country uses.
//!
//! The built-in registry carries the published model parameters. A JSON file
//! with the same shape can replace it:
//!
//! ```json
//! [
//!   {"name": "Italy", "onset_threshold": 200,
//!    "model": {"kind": "richards_like", "scale": 7.8, "amplitude": 4417}},
//!   {"name": "Slovakia", "onset_threshold": 10,
//!    "model": {"kind": "power_law", "coefficient": 8, "exponent": 1.28, "horizon": 60}}
//! ]
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use crate::domain::CountryConfig;
use crate::error::{AppError, CurveError};
use crate::models::GrowthModel;

/// `(name, TG, A)` for the countries fitted with the TG law.
const TG_COUNTRIES: [(&str, f64, f64); 7] = [
    ("Italy", 7.8, 4417.0),
    ("Spain", 6.4, 3665.0),
    ("Germany", 6.7, 3773.0),
    ("USA", 10.2, 72329.0),
    ("UK", 7.2, 2719.0),
    ("France", 6.5, 1961.0),
    ("Iran", 8.7, 2569.0),
];

const TG_ONSET_THRESHOLD: i64 = 200;

/// The built-in registry.
pub fn default_registry() -> Result<Vec<CountryConfig>, CurveError> {
    let mut out = vec![CountryConfig::new(
        "Slovakia",
        GrowthModel::power_law(8.0, 1.28, 60)?,
        10,
    )];
    for (name, tg, a) in TG_COUNTRIES {
        out.push(CountryConfig::new(
            name,
            GrowthModel::richards_like(tg, a)?,
            TG_ONSET_THRESHOLD,
        ));
    }
    Ok(out)
}

/// Read a registry JSON file. Models are validated while deserializing.
pub fn load_registry(path: &Path) -> Result<Vec<CountryConfig>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open registry '{}': {e}", path.display())))?;
    let registry: Vec<CountryConfig> = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid registry '{}': {e}", path.display())))?;
    validate_registry(&registry)?;
    Ok(registry)
}

fn validate_registry(registry: &[CountryConfig]) -> Result<(), AppError> {
    if registry.is_empty() {
        return Err(AppError::new(2, "Registry contains no countries."));
    }
    let mut seen = HashSet::new();
    for entry in registry {
        if !seen.insert(entry.name.to_ascii_lowercase()) {
            return Err(AppError::new(2, format!("Duplicate registry entry '{}'.", entry.name)));
        }
    }
    Ok(())
}

/// Case-insensitive lookup by country name.
pub fn find_country<'a>(registry: &'a [CountryConfig], name: &str) -> Option<&'a CountryConfig> {
    registry.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
