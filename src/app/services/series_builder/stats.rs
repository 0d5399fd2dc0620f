//! Build statistics for one series-building pass

/// Counts gathered while turning upstream groups into series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Countries present in the output
    pub countries: usize,

    /// Regions present in the output
    pub regions: usize,

    /// Decoded points across countries and regions
    pub points: usize,

    /// Individual fields that fell back to the missing marker
    pub missing_fields: usize,

    /// Codes dropped for lack of a display name
    pub unresolved_codes: Vec<String>,

    /// Codes listed more than once upstream
    pub duplicate_codes: Vec<String>,

    /// Metadata entries attached to countries
    pub metadata_entries: usize,
}

impl BuildStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} countries, {} regions, {} points ({} unresolved codes, {} duplicate groups, {} missing fields)",
            self.countries,
            self.regions,
            self.points,
            self.unresolved_codes.len(),
            self.duplicate_codes.len(),
            self.missing_fields
        )
    }
}
