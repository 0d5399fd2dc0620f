//! Positional field maps for each upstream row shape

use crate::constants::offsets::{flat, regional_country, regional_region, sprinkler_country};
use crate::models::SourceVariant;

/// Offsets of the weekly and per-million columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyOffsets {
    pub deceased_last7_days: usize,
    pub deceased_last7_days_change: usize,
    pub deceased_per_million: usize,
    pub cases_last7_days: usize,
    pub cases_last7_days_change: usize,
    pub cases_per_million: usize,
}

/// Where each decoded field lives inside a raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub date: usize,
    pub deceased_new: usize,
    pub deceased: usize,
    pub confirmed_new: usize,
    pub confirmed: usize,
    pub weekly: Option<WeeklyOffsets>,
}

impl FieldMap {
    pub fn sprinkler_country() -> Self {
        Self {
            date: sprinkler_country::DATE,
            deceased_new: sprinkler_country::DECEASED_NEW,
            deceased: sprinkler_country::DECEASED,
            confirmed_new: sprinkler_country::CONFIRMED_NEW,
            confirmed: sprinkler_country::CONFIRMED,
            weekly: None,
        }
    }

    pub fn regional_country() -> Self {
        Self {
            date: regional_country::DATE,
            deceased_new: regional_country::DECEASED_NEW,
            deceased: regional_country::DECEASED,
            confirmed_new: regional_country::CONFIRMED_NEW,
            confirmed: regional_country::CONFIRMED,
            weekly: Some(WeeklyOffsets {
                deceased_last7_days: regional_country::DECEASED_LAST_7_DAYS,
                deceased_last7_days_change: regional_country::DECEASED_LAST_7_DAYS_CHANGE,
                deceased_per_million: regional_country::DECEASED_PER_MILLION,
                cases_last7_days: regional_country::CASES_LAST_7_DAYS,
                cases_last7_days_change: regional_country::CASES_LAST_7_DAYS_CHANGE,
                cases_per_million: regional_country::CASES_PER_MILLION,
            }),
        }
    }

    pub fn regional_region() -> Self {
        Self {
            date: regional_region::DATE,
            deceased_new: regional_region::DECEASED_NEW,
            deceased: regional_region::DECEASED,
            confirmed_new: regional_region::CONFIRMED_NEW,
            confirmed: regional_region::CONFIRMED,
            weekly: Some(WeeklyOffsets {
                deceased_last7_days: regional_region::DECEASED_LAST_7_DAYS,
                deceased_last7_days_change: regional_region::DECEASED_LAST_7_DAYS_CHANGE,
                deceased_per_million: regional_region::DECEASED_PER_MILLION,
                cases_last7_days: regional_region::CASES_LAST_7_DAYS,
                cases_last7_days_change: regional_region::CASES_LAST_7_DAYS_CHANGE,
                cases_per_million: regional_region::CASES_PER_MILLION,
            }),
        }
    }

    pub fn flat() -> Self {
        Self {
            date: flat::DATE,
            deceased_new: flat::DECEASED_NEW,
            deceased: flat::DECEASED,
            confirmed_new: flat::CONFIRMED_NEW,
            confirmed: flat::CONFIRMED,
            weekly: None,
        }
    }

    /// Country-row layout used by the given upstream
    pub fn for_countries(variant: SourceVariant) -> Self {
        match variant {
            SourceVariant::Sprinkler => Self::sprinkler_country(),
            SourceVariant::Regional => Self::regional_country(),
            SourceVariant::Flat => Self::flat(),
        }
    }

    /// Number of columns a complete row needs for this layout
    pub fn width(&self) -> usize {
        let base = [
            self.date,
            self.deceased_new,
            self.deceased,
            self.confirmed_new,
            self.confirmed,
        ];
        let weekly = self.weekly.map(|w| {
            [
                w.deceased_last7_days,
                w.deceased_last7_days_change,
                w.deceased_per_million,
                w.cases_last7_days,
                w.cases_last7_days_change,
                w.cases_per_million,
            ]
        });
        base.into_iter()
            .chain(weekly.into_iter().flatten())
            .max()
            .map_or(0, |max| max + 1)
    }
}
