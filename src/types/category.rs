//! Defines the `Category` enum, mapping a PM2.5 concentration (µg/m³) to one of the
//! six AQI severity bands.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Upper bounds (inclusive) of the first five bands, in ascending order.
/// Anything above the last bound is [`Category::Hazardous`].
const BAND_UPPER_BOUNDS: [(f64, Category); 5] = [
    (50.0, Category::Good),
    (100.0, Category::Moderate),
    (150.0, Category::UnhealthyForSensitive),
    (200.0, Category::Unhealthy),
    (300.0, Category::VeryUnhealthy),
];

/// PM2.5 severity category.
///
/// Variants are declared in ascending severity, so the derived `Ord` follows
/// severity as well.
///
/// Convert a concentration with [`Category::from_concentration`]:
///
/// ```rust
/// use pm25_dashboard::Category;
///
/// assert_eq!(Category::from_concentration(Some(50.0)), Some(Category::Good));
/// assert_eq!(Category::from_concentration(Some(50.0001)), Some(Category::Moderate));
/// assert_eq!(Category::from_concentration(None), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    /// 0 - 50 µg/m³.
    Good,
    /// 50 - 100 µg/m³.
    Moderate,
    /// 100 - 150 µg/m³.
    #[serde(rename = "Unhealthy for Sensitive")]
    UnhealthyForSensitive,
    /// 150 - 200 µg/m³.
    Unhealthy,
    /// 200 - 300 µg/m³.
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    /// Above 300 µg/m³.
    Hazardous,
}

impl Category {
    /// All categories in ascending severity.
    pub const ALL: [Category; 6] = [
        Category::Good,
        Category::Moderate,
        Category::UnhealthyForSensitive,
        Category::Unhealthy,
        Category::VeryUnhealthy,
        Category::Hazardous,
    ];

    /// Classifies a single concentration value.
    ///
    /// Bands are checked in ascending order and each band includes its upper
    /// bound, so `50.0` is still `Good` while `50.0001` is `Moderate`.
    /// An absent value stays absent; it is never defaulted to a label.
    ///
    /// A `NaN` is treated like an absent value.
    pub fn from_concentration(value: Option<f64>) -> Option<Self> {
        let value = value.filter(|v| !v.is_nan())?;
        let category = BAND_UPPER_BOUNDS
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map(|(_, category)| *category)
            .unwrap_or(Category::Hazardous);
        Some(category)
    }

    /// Human readable label, as shown on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitive => "Unhealthy for Sensitive",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    /// Position in [`Category::ALL`], 0 (Good) to 5 (Hazardous).
    pub fn severity(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown PM2.5 category label '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Category::from_concentration(Some(0.0)), Some(Category::Good));
        assert_eq!(Category::from_concentration(Some(50.0)), Some(Category::Good));
        assert_eq!(
            Category::from_concentration(Some(50.0001)),
            Some(Category::Moderate)
        );
        assert_eq!(
            Category::from_concentration(Some(100.0)),
            Some(Category::Moderate)
        );
        assert_eq!(
            Category::from_concentration(Some(150.0)),
            Some(Category::UnhealthyForSensitive)
        );
        assert_eq!(
            Category::from_concentration(Some(200.0)),
            Some(Category::Unhealthy)
        );
        assert_eq!(
            Category::from_concentration(Some(300.0)),
            Some(Category::VeryUnhealthy)
        );
        assert_eq!(
            Category::from_concentration(Some(300.0001)),
            Some(Category::Hazardous)
        );
        assert_eq!(
            Category::from_concentration(Some(999.0)),
            Some(Category::Hazardous)
        );
    }

    #[test]
    fn test_absent_stays_absent() {
        assert_eq!(Category::from_concentration(None), None);
        assert_eq!(Category::from_concentration(Some(f64::NAN)), None);
    }

    #[test]
    fn test_monotonic_in_concentration() {
        let mut previous = Category::Good;
        for step in 0..4000 {
            let value = step as f64 * 0.25;
            let current = Category::from_concentration(Some(value)).unwrap();
            assert!(current >= previous, "severity dropped at {value}");
            previous = current;
        }
        assert_eq!(previous, Category::Hazardous);
    }

    #[test]
    fn test_label_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>(), Ok(category));
        }
        assert!("Smoggy".parse::<Category>().is_err());
        assert_eq!(Category::Hazardous.severity(), 5);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Category::UnhealthyForSensitive).unwrap();
        assert_eq!(json, "\"Unhealthy for Sensitive\"");
    }
}
