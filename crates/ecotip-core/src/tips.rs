//! The tip catalog and its day-of-year rotation.
//!
//! Rotation is keyed on the calendar day-of-year of the delivery date in the
//! *user's* timezone, modulo the catalog length. The same calendar day always
//! maps to the same tip, so restarts or a missed fire never shift the
//! sequence for anyone.

use chrono::{Datelike, NaiveDate};

use crate::error::{EcotipError, Result};

/// Built-in daily tips, used when the config does not supply a catalog.
const DEFAULT_TIPS: &[&str] = &[
    "Turn off lights and appliances when they are not in use",
    "Use energy and water sparingly",
    "Prefer products in reusable packaging",
    "Bring reusable bags instead of buying plastic ones",
    "Eat fewer animal products",
    "Sort your waste for recycling",
];

/// An ordered, non-empty list of tip texts. Never mutated after startup.
#[derive(Debug, Clone)]
pub struct TipCatalog {
    tips: Vec<String>,
}

impl TipCatalog {
    /// Wrap an externally supplied catalog. Rejects an empty list — rotation
    /// needs at least one entry to be total.
    pub fn new(tips: Vec<String>) -> Result<Self> {
        if tips.is_empty() {
            return Err(EcotipError::Config(
                "tip catalog must contain at least one entry".to_string(),
            ));
        }
        Ok(Self { tips })
    }

    /// The tip for a given calendar day. Total for any date and any
    /// non-empty catalog.
    pub fn tip_for(&self, date: NaiveDate) -> &str {
        let day_index = date.ordinal() as usize;
        &self.tips[day_index % self.tips.len()]
    }

    pub fn len(&self) -> usize {
        self.tips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }
}

impl Default for TipCatalog {
    fn default() -> Self {
        Self {
            tips: DEFAULT_TIPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_of(n: usize) -> TipCatalog {
        TipCatalog::new((0..n).map(|i| format!("tip {i}")).collect()).unwrap()
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(TipCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn same_tip_when_day_of_year_congruent() {
        // Day-of-year 1 and 7 are congruent mod 6.
        let catalog = catalog_of(6);
        let jan1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let jan7 = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(catalog.tip_for(jan1), catalog.tip_for(jan7));
    }

    #[test]
    fn adjacent_days_rotate() {
        let catalog = catalog_of(6);
        let jan1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let jan2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_ne!(catalog.tip_for(jan1), catalog.tip_for(jan2));
    }

    #[test]
    fn single_entry_catalog_is_total() {
        let catalog = catalog_of(1);
        let dec31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(catalog.tip_for(dec31), "tip 0");
        assert_eq!(catalog.tip_for(leap_day), "tip 0");
    }

    #[test]
    fn rotation_survives_year_boundary() {
        // Dec 31 (day 365) and Jan 1 (day 1) are computed per-date, not from
        // any running counter.
        let catalog = catalog_of(6);
        let dec31 = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(catalog.tip_for(dec31), format!("tip {}", 365 % 6));
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(catalog.tip_for(jan1), "tip 1");
    }

    #[test]
    fn default_catalog_is_nonempty() {
        assert!(!TipCatalog::default().is_empty());
    }
}
