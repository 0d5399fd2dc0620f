//! Series building for countries, regions and transmission metadata
//!
//! Takes an [`UpstreamPayload`], resolves its groups and decodes every row
//! into per-entity time series.
//!
//! - [`payload`] - Variant-specific views over the fetched document
//! - [`metadata`] - Transmission classification table handling
//! - [`stats`] - Counts collected while building
//!
//! Rows keep upstream order within each series. No date sort is applied.

pub mod metadata;
pub mod payload;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use payload::{EntityGroup, UpstreamPayload};
pub use stats::BuildStats;

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::app::services::entity_resolver::{EntityResolver, Resolution};
use crate::app::services::row_decoder::{FieldMap, decode_row, missing_field_count};
use crate::models::{DecodedPoint, EntityMetadata, RawRow, SourceVariant};
use metadata::metadata_for;

/// Ordered series keyed by output name
pub type SeriesMap = BTreeMap<String, Vec<DecodedPoint>>;

/// Metadata histories keyed by country name
pub type MetadataMap = BTreeMap<String, Vec<EntityMetadata>>;

/// Everything built from one payload
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSeries {
    pub countries: SeriesMap,
    pub regions: Option<SeriesMap>,
    pub metadata: Option<MetadataMap>,
    pub stats: BuildStats,
}

/// Builds per-entity series with the layouts of one upstream variant
#[derive(Debug, Clone, Copy)]
pub struct SeriesBuilder {
    country_fields: FieldMap,
    region_fields: FieldMap,
}

impl SeriesBuilder {
    pub fn new(variant: SourceVariant) -> Self {
        Self {
            country_fields: FieldMap::for_countries(variant),
            region_fields: FieldMap::regional_region(),
        }
    }

    /// Build all series present in the payload
    pub fn build(&self, payload: &UpstreamPayload<'_>) -> BuiltSeries {
        let mut stats = BuildStats::new();

        let countries = EntityResolver::countries().resolve_all(
            payload
                .country_groups
                .iter()
                .map(|group| (group.code.clone(), group.rows.as_slice())),
        );
        let country_series = self.decode_series(&countries, &self.country_fields, &mut stats);
        stats.countries = country_series.len();
        record_resolution(&countries, &mut stats);

        let metadata = payload.transmission.as_ref().map(|records| {
            let mut by_country = MetadataMap::new();
            for entity in &countries.entities {
                by_country
                    .entry(entity.name.clone())
                    .or_insert_with(|| metadata_for(&entity.name, records));
            }
            stats.metadata_entries = by_country.values().map(Vec::len).sum();
            by_country
        });

        let regions = payload.region_groups.as_ref().map(|groups| {
            let regions = EntityResolver::regions().resolve_all(
                groups
                    .iter()
                    .map(|group| (group.code.clone(), group.rows.as_slice())),
            );
            let series = self.decode_series(&regions, &self.region_fields, &mut stats);
            stats.regions = series.len();
            record_resolution(&regions, &mut stats);
            series
        });

        info!("Built series: {}", stats.summary());

        BuiltSeries {
            countries: country_series,
            regions,
            metadata,
            stats,
        }
    }

    fn decode_series(
        &self,
        resolution: &Resolution<&[&RawRow]>,
        fields: &FieldMap,
        stats: &mut BuildStats,
    ) -> SeriesMap {
        let mut series = SeriesMap::new();
        for entity in &resolution.entities {
            let points: Vec<DecodedPoint> =
                entity.item.iter().map(|row| decode_row(row, fields)).collect();

            stats.points += points.len();
            stats.missing_fields += points.iter().map(missing_field_count).sum::<usize>();
            debug!(
                "{} ({}): {} points",
                entity.name,
                entity.code,
                points.len()
            );

            // Two codes naming the same country: the later one in sort order wins
            if let Some(replaced) = series.insert(entity.name.clone(), points) {
                stats.points -= replaced.len();
                stats.missing_fields -= replaced.iter().map(missing_field_count).sum::<usize>();
            }
        }
        series
    }
}

fn record_resolution<T>(resolution: &Resolution<T>, stats: &mut BuildStats) {
    stats
        .unresolved_codes
        .extend(resolution.unresolved.iter().cloned());
    stats
        .duplicate_codes
        .extend(resolution.duplicates.iter().cloned());
}
