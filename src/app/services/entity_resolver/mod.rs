//! Country and region resolution for upstream entity groups
//!
//! Maps upstream codes to display names with O(1) lookups, drops codes that
//! have no known name, keeps only the first group seen for each code and
//! orders the survivors for output.

pub mod country_names;

#[cfg(test)]
pub mod tests;

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use country_names::COUNTRIES;

static NAMES_BY_CODE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    COUNTRIES
        .iter()
        .flat_map(|&(alpha2, alpha3, name)| [(alpha2, name), (alpha3, name)])
        .collect()
});

/// English display name for an ISO alpha-2 or alpha-3 code
pub fn country_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    if !(2..=3).contains(&code.len()) {
        return None;
    }
    NAMES_BY_CODE
        .get(code.to_ascii_uppercase().as_str())
        .copied()
}

/// One upstream group that survived resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity<T> {
    /// Code as it appeared upstream
    pub code: String,
    /// Output key: the country name, or the raw code for regions
    pub name: String,
    pub item: T,
}

/// Outcome of resolving a list of `(code, group)` entries
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// Resolved entities in output order
    pub entities: Vec<ResolvedEntity<T>>,
    /// Codes dropped because no display name exists
    pub unresolved: Vec<String>,
    /// Codes whose later groups were ignored in favour of the first
    pub duplicates: Vec<String>,
}

/// How codes turn into output keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// ISO country codes, named via the country table and sorted by name
    Country,
    /// WHO region codes, kept verbatim and sorted by code
    Region,
}

/// Resolver for one kind of entity
#[derive(Debug, Clone, Copy)]
pub struct EntityResolver {
    kind: EntityKind,
}

impl EntityResolver {
    pub fn countries() -> Self {
        Self {
            kind: EntityKind::Country,
        }
    }

    pub fn regions() -> Self {
        Self {
            kind: EntityKind::Region,
        }
    }

    /// Output key for a code, `None` when the code must be dropped
    pub fn resolve(&self, code: &str) -> Option<String> {
        match self.kind {
            EntityKind::Country => country_name(code).map(str::to_string),
            EntityKind::Region => {
                let trimmed = code.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }

    /// Resolve `(code, group)` entries in upstream order.
    ///
    /// The first group seen for a code wins. Unresolvable codes are dropped
    /// with all of their groups. The result is stably sorted by output key.
    pub fn resolve_all<T, I>(&self, entries: I) -> Resolution<T>
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut reported_unresolved: HashSet<String> = HashSet::new();
        let mut entities = Vec::new();
        let mut unresolved = Vec::new();
        let mut duplicates = Vec::new();

        for (code, item) in entries {
            let Some(name) = self.resolve(&code) else {
                if reported_unresolved.insert(code.clone()) {
                    debug!("Dropping unrecognised {:?} code '{}'", self.kind, code);
                    unresolved.push(code);
                }
                continue;
            };

            if !seen.insert(code.clone()) {
                debug!("Ignoring repeated group for code '{}'", code);
                duplicates.push(code);
                continue;
            }

            entities.push(ResolvedEntity { code, name, item });
        }

        // Vec::sort_by is stable, so equal names keep upstream order
        entities.sort_by(|a, b| a.name.cmp(&b.name));

        Resolution {
            entities,
            unresolved,
            duplicates,
        }
    }
}
