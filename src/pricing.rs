use crate::model::{AcceptedSuggestionRecord, PriceTable};
use std::collections::HashMap;

/// Lowest fraction of the base price a saturated crop can fall to.
pub const SATURATION_FLOOR: f64 = 0.5;
/// Price reduction per accepted suggestion of the same crop in the same district.
pub const SATURATION_STEP: f64 = 0.1;

/// Price multiplier after `accepted` earlier suggestions.
pub fn saturation_factor(accepted: usize) -> f64 {
    (1.0 - SATURATION_STEP * accepted as f64).max(SATURATION_FLOOR)
}

/// Discounts market prices for crops farmers have already been steered to.
///
/// The history is borrowed for the duration of the adjustment; callers
/// serialize it against concurrent acceptance.
pub struct PriceAdjuster<'a> {
    history: &'a [AcceptedSuggestionRecord],
}

impl<'a> PriceAdjuster<'a> {
    pub fn new(history: &'a [AcceptedSuggestionRecord]) -> Self {
        Self { history }
    }

    /// Accepted-suggestion counts per crop within `district`.
    pub fn saturation_counts(&self, district: &str) -> HashMap<&'a str, usize> {
        let mut counts = HashMap::new();
        for record in self.history.iter().filter(|r| r.district == district) {
            *counts.entry(record.crop.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns a copy of `base` where each crop's `district` price is scaled
    /// by its saturation factor. Other districts are untouched.
    pub fn adjust(&self, base: &PriceTable, district: &str) -> PriceTable {
        let counts = self.saturation_counts(district);
        let mut adjusted = base.clone();
        for (crop, &count) in &counts {
            if let Some(price) = adjusted.get_mut(crop, district) {
                *price *= saturation_factor(count);
            }
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(crop: &str, district: &str) -> AcceptedSuggestionRecord {
        AcceptedSuggestionRecord {
            farmer_id: 1,
            crop: crop.into(),
            district: district.into(),
            acres: 3,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_factor_values() {
        assert_eq!(saturation_factor(0), 1.0);
        assert!(close(saturation_factor(3), 0.7));
        assert!(close(saturation_factor(5), 0.5));
        assert_eq!(saturation_factor(20), 0.5);
        assert_eq!(saturation_factor(usize::MAX), 0.5);
    }

    #[test]
    fn test_adjust_only_touches_matching_district() {
        let mut base = PriceTable::new();
        base.insert("Rice", "Pune", 100.0);
        base.insert("Rice", "Nashik", 100.0);
        base.insert("Wheat", "Pune", 80.0);
        let history = vec![
            record("Rice", "Pune"),
            record("Rice", "Pune"),
            record("Rice", "Nashik"),
            record("Cotton", "Pune"),
        ];

        let adjusted = PriceAdjuster::new(&history).adjust(&base, "Pune");

        assert!(close(adjusted.get("Rice", "Pune").unwrap(), 80.0));
        assert_eq!(adjusted.get("Rice", "Nashik"), Some(100.0));
        assert_eq!(adjusted.get("Wheat", "Pune"), Some(80.0));
        assert_eq!(adjusted.get("Cotton", "Pune"), None);
        // input untouched
        assert_eq!(base.get("Rice", "Pune"), Some(100.0));
    }

    #[test]
    fn test_empty_history_is_identity() {
        let mut base = PriceTable::new();
        base.insert("Rice", "Pune", 100.0);
        let adjusted = PriceAdjuster::new(&[]).adjust(&base, "Pune");
        assert_eq!(adjusted, base);
    }
}
