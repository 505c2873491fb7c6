//! Closed-form growth laws for active-case curves.
//!
//! Two laws are supported:
//! - power law: `c · t^k`, monotone, with a caller-supplied display horizon
//! - the "TG" law: `(A / TG) · (t / TG)^E / e^(t / TG)` with the fixed exponent `E = 6.23`
//!
//! Models hold plain parameters only and are validated on construction, so every
//! `GrowthModel` value in circulation is safe to evaluate.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Fixed exponent `E` of the TG law.
pub const TG_EXPONENT: f64 = 6.23;

/// Longest modeled span accepted for any law, in days (one century).
pub const MAX_HORIZON_DAYS: u32 = 36_525;

/// `value = coefficient · day^exponent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    coefficient: f64,
    exponent: f64,
    horizon: u32,
}

impl PowerLaw {
    /// `horizon` is the last modeled day; a power law has no natural end.
    pub fn new(coefficient: f64, exponent: f64, horizon: u32) -> Result<Self, CurveError> {
        ensure_positive("coefficient", coefficient)?;
        if !exponent.is_finite() {
            return Err(CurveError::InvalidParameter {
                name: "exponent",
                value: exponent,
                reason: "must be finite",
            });
        }
        if horizon == 0 {
            return Err(CurveError::InvalidParameter {
                name: "horizon",
                value: 0.0,
                reason: "must be at least one day",
            });
        }
        if horizon > MAX_HORIZON_DAYS {
            return Err(CurveError::InvalidParameter {
                name: "horizon",
                value: f64::from(horizon),
                reason: "exceeds the maximum horizon",
            });
        }
        Ok(Self {
            coefficient,
            exponent,
            horizon,
        })
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    fn value(&self, day: f64) -> f64 {
        self.coefficient * day.powf(self.exponent)
    }
}

/// The TG law, parameterized by the time scale `TG` and amplitude `A`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RichardsLike {
    scale: f64,
    amplitude: f64,
}

impl RichardsLike {
    pub fn new(scale: f64, amplitude: f64) -> Result<Self, CurveError> {
        ensure_positive("scale", scale)?;
        ensure_positive("amplitude", amplitude)?;
        if inflection_span(scale) > f64::from(MAX_HORIZON_DAYS) {
            return Err(CurveError::InvalidParameter {
                name: "scale",
                value: scale,
                reason: "second inflection day exceeds the maximum horizon",
            });
        }
        Ok(Self { scale, amplitude })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// `E · TG`, where the derivative of the curve vanishes.
    pub fn peak_day(&self) -> f64 {
        TG_EXPONENT * self.scale
    }

    /// `ceil(TG · (E + √E))`.
    pub fn second_inflection_day(&self) -> u32 {
        // Bounded by `MAX_HORIZON_DAYS` at construction.
        inflection_span(self.scale) as u32
    }

    fn value(&self, day: f64) -> f64 {
        let x = day / self.scale;
        (self.amplitude / self.scale) * x.powf(TG_EXPONENT) / x.exp()
    }
}

fn inflection_span(scale: f64) -> f64 {
    (scale * (TG_EXPONENT + TG_EXPONENT.sqrt())).ceil()
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), CurveError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CurveError::InvalidParameter {
            name,
            value,
            reason: "must be finite and > 0",
        })
    }
}

/// A validated growth model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GrowthModelSpec", into = "GrowthModelSpec")]
pub enum GrowthModel {
    PowerLaw(PowerLaw),
    RichardsLike(RichardsLike),
}

impl GrowthModel {
    pub fn power_law(coefficient: f64, exponent: f64, horizon: u32) -> Result<Self, CurveError> {
        PowerLaw::new(coefficient, exponent, horizon).map(GrowthModel::PowerLaw)
    }

    pub fn richards_like(scale: f64, amplitude: f64) -> Result<Self, CurveError> {
        RichardsLike::new(scale, amplitude).map(GrowthModel::RichardsLike)
    }

    /// Modeled active-case count on `day` (1-based offset from onset).
    pub fn evaluate(&self, day: f64) -> Result<f64, CurveError> {
        if !(day.is_finite() && day > 0.0) {
            return Err(CurveError::InvalidInput { day });
        }
        Ok(match self {
            GrowthModel::PowerLaw(law) => law.value(day),
            GrowthModel::RichardsLike(law) => law.value(day),
        })
    }

    pub fn evaluate_many(&self, days: &[u32]) -> Result<Vec<f64>, CurveError> {
        days.iter().map(|&d| self.evaluate(f64::from(d))).collect()
    }

    /// Day of the maximum, if the law has one. Power laws are monotone.
    pub fn peak_day(&self) -> Option<f64> {
        match self {
            GrowthModel::PowerLaw(_) => None,
            GrowthModel::RichardsLike(law) => Some(law.peak_day()),
        }
    }

    pub fn second_inflection_day(&self) -> Option<u32> {
        match self {
            GrowthModel::PowerLaw(_) => None,
            GrowthModel::RichardsLike(law) => Some(law.second_inflection_day()),
        }
    }

    /// Last modeled day: the second inflection day for TG, the configured horizon otherwise.
    pub fn horizon(&self) -> u32 {
        match self {
            GrowthModel::PowerLaw(law) => law.horizon(),
            GrowthModel::RichardsLike(law) => law.second_inflection_day(),
        }
    }

    /// LaTeX label used as the legend entry of the modeled series.
    pub fn text_label(&self) -> String {
        match self {
            GrowthModel::PowerLaw(law) => {
                format!(r"${} \cdot t^{{{}}}$", law.coefficient, law.exponent)
            }
            GrowthModel::RichardsLike(law) => format!(
                r"$\frac{{{a}}}{{{tg}}} \cdot \left(\frac{{t}}{{{tg}}}\right)^{{{e}}} / e^{{t/{tg}}}$",
                a = law.amplitude,
                tg = law.scale,
                e = TG_EXPONENT,
            ),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            GrowthModel::PowerLaw(_) => "power law",
            GrowthModel::RichardsLike(_) => "TG",
        }
    }
}

/// Serialized form of a growth model (registry files, exports).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthModelSpec {
    PowerLaw {
        coefficient: f64,
        exponent: f64,
        horizon: u32,
    },
    RichardsLike {
        scale: f64,
        amplitude: f64,
    },
}

impl TryFrom<GrowthModelSpec> for GrowthModel {
    type Error = CurveError;

    fn try_from(spec: GrowthModelSpec) -> Result<Self, Self::Error> {
        match spec {
            GrowthModelSpec::PowerLaw {
                coefficient,
                exponent,
                horizon,
            } => GrowthModel::power_law(coefficient, exponent, horizon),
            GrowthModelSpec::RichardsLike { scale, amplitude } => {
                GrowthModel::richards_like(scale, amplitude)
            }
        }
    }
}

impl From<GrowthModel> for GrowthModelSpec {
    fn from(model: GrowthModel) -> Self {
        match model {
            GrowthModel::PowerLaw(law) => GrowthModelSpec::PowerLaw {
                coefficient: law.coefficient,
                exponent: law.exponent,
                horizon: law.horizon,
            },
            GrowthModel::RichardsLike(law) => GrowthModelSpec::RichardsLike {
                scale: law.scale,
                amplitude: law.amplitude,
            },
        }
    }
}
