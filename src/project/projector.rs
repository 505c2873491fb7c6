//! Projection of an aligned series into renderable coordinates.
//!
//! The output bundle is fully self-describing: a renderer needs nothing but the
//! bundle to draw the figure. Field names are part of the export format.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{AlignedSeries, DisplayMode, ScaleKind};

/// A single x coordinate: a calendar date (linear mode) or a day offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Day(u32),
    Date(NaiveDate),
}

impl XValue {
    /// Numeric position for drawing. Dates map to their day number since the common era.
    pub fn as_f64(self) -> f64 {
        match self {
            XValue::Day(d) => f64::from(d),
            XValue::Date(date) => f64::from(date.num_days_from_ce()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Day of the modeled maximum.
    Peak,
    /// Caller-supplied anchor date (e.g. when a prediction was published).
    ReferenceDate,
}

/// A vertical reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub x: XValue,
    pub y_from: f64,
    pub y_to: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    /// Legend entry of the modeled series.
    pub modeled: String,
    /// Legend entry of the observed series.
    pub observed: String,
}

/// Everything a renderer needs for one (country, mode) figure.
///
/// `y_observed` is shorter than `x_values` when the model extends past the last
/// observation; its i-th value belongs to `x_values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBundle {
    pub x_values: Vec<XValue>,
    pub y_modeled: Vec<f64>,
    pub y_observed: Vec<f64>,
    pub x_scale_kind: ScaleKind,
    pub y_scale_kind: ScaleKind,
    pub markers: Vec<Marker>,
    pub labels: Labels,
}

impl ProjectionBundle {
    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind == kind)
    }

    pub fn modeled_points(&self) -> Vec<(f64, f64)> {
        self.x_values
            .iter()
            .zip(&self.y_modeled)
            .map(|(x, &y)| (x.as_f64(), y))
            .collect()
    }

    pub fn observed_points(&self) -> Vec<(f64, f64)> {
        self.x_values
            .iter()
            .zip(&self.y_observed)
            .map(|(x, &y)| (x.as_f64(), y))
            .collect()
    }
}

/// Project `series` for `mode`.
///
/// The peak marker is omitted for models without a peak (power laws), and the
/// reference marker is omitted when `reference` is not on the date axis. Both
/// omissions are intentional and silent.
pub fn project(series: &AlignedSeries, mode: DisplayMode, reference: Option<NaiveDate>) -> ProjectionBundle {
    let x_values: Vec<XValue> = if mode.uses_dates() {
        series.date_index().iter().map(|&d| XValue::Date(d)).collect()
    } else {
        series.day_index().iter().map(|&d| XValue::Day(d)).collect()
    };

    let (y_from, y_to) = marker_span(series, mode.y_scale());
    let mut markers = Vec::new();

    if let Some(pos) = series.peak_position() {
        markers.push(Marker {
            kind: MarkerKind::Peak,
            x: x_values[pos],
            y_from,
            y_to,
        });
    }

    if let Some(pos) = reference.and_then(|date| series.position_of(date)) {
        markers.push(Marker {
            kind: MarkerKind::ReferenceDate,
            x: x_values[pos],
            y_from,
            y_to,
        });
    }

    ProjectionBundle {
        x_values,
        y_modeled: series.modeled().to_vec(),
        y_observed: series.observed().to_vec(),
        x_scale_kind: mode.x_scale(),
        y_scale_kind: mode.y_scale(),
        markers,
        labels: labels_for(series, mode),
    }
}

/// Vertical extent of the markers: series minimum up to the larger of the
/// modeled peak and the observed maximum.
///
/// On a log axis the minimum is taken over positive values only.
fn marker_span(series: &AlignedSeries, y_scale: ScaleKind) -> (f64, f64) {
    let values = series.modeled().iter().chain(series.observed()).copied();
    let lowest = match y_scale {
        ScaleKind::Linear => values.fold(f64::INFINITY, f64::min),
        ScaleKind::Log => values.filter(|v| *v > 0.0).fold(f64::INFINITY, f64::min),
    };
    let modeled_peak = series.modeled().iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let observed_max = series.observed().iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let highest = modeled_peak.max(observed_max);

    let lowest = if lowest.is_finite() { lowest } else { highest };
    (lowest, highest)
}

fn labels_for(series: &AlignedSeries, mode: DisplayMode) -> Labels {
    let x_axis = if mode.uses_dates() {
        "Date".to_string()
    } else {
        format!("Days since the {} case", ordinal(series.onset_threshold()))
    };
    Labels {
        title: format!("Active cases in {}", series.country()),
        x_axis,
        y_axis: "COVID-19 active cases".to_string(),
        modeled: series.model().text_label(),
        observed: "Active cases".to_string(),
    }
}

/// `1st`, `2nd`, `3rd`, `11th`, `200th`, ...
pub fn ordinal(n: i64) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align_series;
    use crate::domain::{CountryConfig, RawRecord, next_day};
    use crate::models::GrowthModel;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily(first: NaiveDate, active: &[i64]) -> Vec<RawRecord> {
        let mut date = first;
        active
            .iter()
            .map(|&a| {
                let r = RawRecord {
                    date,
                    positive: a,
                    recovered: 0,
                    dead: 0,
                };
                date = next_day(date);
                r
            })
            .collect()
    }

    fn italy() -> AlignedSeries {
        let config = CountryConfig::new("Italy", GrowthModel::richards_like(7.8, 4417.0).unwrap(), 200);
        let records = daily(d(2020, 2, 21), &[20, 60, 150, 220, 240, 300, 400, 500, 580, 800]);
        align_series(&config, &records).unwrap()
    }

    fn slovakia() -> AlignedSeries {
        let config = CountryConfig::new("Slovakia", GrowthModel::power_law(8.0, 1.28, 60).unwrap(), 10);
        let records = daily(d(2020, 3, 6), &[3, 4, 5, 7, 12, 20]);
        align_series(&config, &records).unwrap()
    }

    #[test]
    fn linear_mode_uses_dates() {
        let series = italy();
        let bundle = project(&series, DisplayMode::Linear, None);
        assert_eq!(bundle.x_values.len(), series.len());
        assert_eq!(bundle.x_values[0], XValue::Date(series.date_index()[0]));
        assert_eq!(bundle.x_scale_kind, ScaleKind::Linear);
        assert_eq!(bundle.y_scale_kind, ScaleKind::Linear);
        assert_eq!(bundle.labels.x_axis, "Date");
    }

    #[test]
    fn log_modes_use_day_index() {
        let series = italy();
        for mode in [DisplayMode::SemiLog, DisplayMode::LogLog] {
            let bundle = project(&series, mode, None);
            assert_eq!(bundle.x_values[0], XValue::Day(1));
            assert_eq!(bundle.y_scale_kind, ScaleKind::Log);
            assert_eq!(bundle.labels.x_axis, "Days since the 200th case");
        }
        assert_eq!(project(&series, DisplayMode::LogLog, None).x_scale_kind, ScaleKind::Log);
        assert_eq!(project(&series, DisplayMode::SemiLog, None).x_scale_kind, ScaleKind::Linear);
    }

    #[test]
    fn peak_marker_sits_on_modeled_maximum() {
        let series = italy();
        let bundle = project(&series, DisplayMode::SemiLog, None);
        let peak = bundle.marker(MarkerKind::Peak).unwrap();
        assert_eq!(peak.x, XValue::Day(49));

        let modeled_max = bundle.y_modeled.iter().copied().fold(f64::MIN, f64::max);
        let observed_max = bundle.y_observed.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(peak.y_to, modeled_max.max(observed_max));
        assert!(peak.y_from <= bundle.y_modeled[0]);
    }

    #[test]
    fn power_law_has_no_peak_marker() {
        let bundle = project(&slovakia(), DisplayMode::Linear, None);
        assert!(bundle.marker(MarkerKind::Peak).is_none());
        assert_eq!(bundle.labels.x_axis, "Date");
        assert_eq!(bundle.labels.modeled, r"$8 \cdot t^{1.28}$");
    }

    #[test]
    fn log_axis_marker_span_ignores_non_positive_values() {
        // Cumulative active counts 12, -8, -3 after onset.
        let config = CountryConfig::new("Dipland", GrowthModel::power_law(8.0, 1.28, 10).unwrap(), 10);
        let series = align_series(&config, &daily(d(2020, 3, 1), &[12, -20, 5])).unwrap();
        assert_eq!(series.observed(), &[12.0, -8.0, -3.0]);
        let anchor = d(2020, 3, 1);

        let linear = project(&series, DisplayMode::Linear, Some(anchor));
        let marker = linear.marker(MarkerKind::ReferenceDate).unwrap();
        assert_eq!(marker.y_from, -8.0);

        let semilog = project(&series, DisplayMode::SemiLog, Some(anchor));
        let marker = semilog.marker(MarkerKind::ReferenceDate).unwrap();
        assert_eq!(marker.y_from, series.modeled()[0]);
        assert!((marker.y_from - 8.0).abs() < 1e-12);
        assert_eq!(marker.y_to, series.modeled()[9]);
    }

    #[test]
    fn reference_marker_present_only_when_date_on_axis() {
        let series = italy();
        let anchor = d(2020, 3, 29);
        let pos = series.position_of(anchor).unwrap();

        let bundle = project(&series, DisplayMode::Linear, Some(anchor));
        let marker = bundle.marker(MarkerKind::ReferenceDate).unwrap();
        assert_eq!(marker.x, XValue::Date(anchor));

        let bundle = project(&series, DisplayMode::SemiLog, Some(anchor));
        let marker = bundle.marker(MarkerKind::ReferenceDate).unwrap();
        assert_eq!(marker.x, XValue::Day(series.day_index()[pos]));

        let bundle = project(&series, DisplayMode::Linear, Some(d(2019, 1, 1)));
        assert!(bundle.marker(MarkerKind::ReferenceDate).is_none());
    }

    #[test]
    fn bundle_serializes_with_contract_field_names() {
        let bundle = project(&slovakia(), DisplayMode::SemiLog, Some(d(2020, 3, 29)));
        let json = serde_json::to_value(&bundle).unwrap();
        for key in ["x_values", "y_modeled", "y_observed", "x_scale_kind", "y_scale_kind", "markers", "labels"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["x_values"][0], serde_json::json!(1));
        assert_eq!(json["y_scale_kind"], serde_json::json!("log"));
        assert_eq!(json["markers"][0]["kind"], serde_json::json!("reference_date"));

        let linear = serde_json::to_value(project(&slovakia(), DisplayMode::Linear, None)).unwrap();
        assert_eq!(linear["x_values"][0], serde_json::json!("2020-03-08"));
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(10), "10th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(112), "112th");
        assert_eq!(ordinal(200), "200th");
        assert_eq!(ordinal(201), "201st");
    }
}
