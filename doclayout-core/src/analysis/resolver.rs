use std::{
    collections::{HashMap, hash_map::Entry},
    sync::LazyLock,
};

use serde::Serialize;
use tracing::*;

use crate::{
    analysis::labels::Label,
    consts::{LABEL_SIZE, LEGACY_ALIASES},
    error::LabelError,
};

/// Rendering metadata for one resolved element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedLabel {
    pub label: Label,
    pub canonical_id: usize,
    pub display_label: &'static str,
    pub color: [u8; 3],
}

/// Immutable lookup table from raw engine type strings to canonical labels.
///
/// Built once and shared by reference; resolution is two O(1) hash lookups,
/// first against the canonical names, then against the alias table.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    canonical: HashMap<&'static str, Label>,
    aliases: HashMap<&'static str, Label>,
    colors: [[u8; 3]; LABEL_SIZE],
}

static DEFAULT_RESOLVER: LazyLock<Result<LabelResolver, LabelError>> =
    LazyLock::new(|| LabelResolver::new(&HashMap::new()));

impl LabelResolver {
    /// Builds the table from the built-in alias list with optional color overrides.
    pub fn new(color_overrides: &HashMap<Label, [u8; 3]>) -> Result<Self, LabelError> {
        let mut colors = Label::ALL.map(|label| label.color());
        for (label, color) in color_overrides {
            colors[label.idx()] = *color;
        }

        Self::from_tables(&LEGACY_ALIASES, colors)
    }

    /// Builds the table and checks it is unambiguous.
    ///
    /// Fails when an alias equals a canonical name or when one alias string
    /// points at two different labels.
    pub fn from_tables(
        aliases: &[(&'static str, Label)],
        colors: [[u8; 3]; LABEL_SIZE],
    ) -> Result<Self, LabelError> {
        let canonical = Label::ALL
            .into_iter()
            .map(|label| (label.name(), label))
            .collect::<HashMap<_, _>>();

        let mut alias_map = HashMap::with_capacity(aliases.len());
        for &(alias, target) in aliases {
            if let Some(existing) = canonical.get(alias) {
                return Err(LabelError::AliasConflict {
                    alias: alias.to_owned(),
                    reason: format!("collides with canonical label {existing}"),
                });
            }

            match alias_map.entry(alias) {
                Entry::Vacant(entry) => {
                    entry.insert(target);
                }
                Entry::Occupied(entry) if *entry.get() != target => {
                    return Err(LabelError::AliasConflict {
                        alias: alias.to_owned(),
                        reason: format!("maps to both {} and {}", entry.get(), target),
                    });
                }
                Entry::Occupied(_) => {
                    debug!("duplicate alias `{alias}` for {target} ignored");
                }
            }
        }

        Ok(Self {
            canonical,
            aliases: alias_map,
            colors,
        })
    }

    /// Process-wide default table, built on first use.
    pub fn global() -> Result<&'static LabelResolver, LabelError> {
        DEFAULT_RESOLVER.as_ref().map_err(Clone::clone)
    }

    /// Resolves a raw element type string. Matching is exact and case-sensitive.
    pub fn resolve(&self, raw_type: &str) -> Result<ResolvedLabel, LabelError> {
        self.canonical
            .get(raw_type)
            .or_else(|| self.aliases.get(raw_type))
            .map(|label| self.resolved(*label))
            .ok_or_else(|| LabelError::Unrecognized {
                raw: raw_type.to_owned(),
            })
    }

    /// Rendering metadata of a canonical label under this table's colors.
    pub fn resolved(&self, label: Label) -> ResolvedLabel {
        ResolvedLabel {
            label,
            canonical_id: label.idx(),
            display_label: label.name(),
            color: self.colors[label.idx()],
        }
    }

    pub fn is_alias(&self, raw_type: &str) -> bool {
        self.aliases.contains_key(raw_type)
    }

    /// Every canonical label with its description, in id order.
    pub fn legend(&self) -> Vec<(ResolvedLabel, &'static str)> {
        Label::ALL
            .into_iter()
            .map(|label| (self.resolved(label), label.description()))
            .collect()
    }
}
