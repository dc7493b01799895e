// ── List view session ──
//
// Per-screen, in-memory state behind every list: the last fetched records
// plus the user's search, facet and sort choices. Derived items are never
// stored; they are recomputed from the four inputs on demand.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use strum::{Display, EnumString};

use crate::entity::Entity;
use crate::model::EntityId;

// ── Inputs ───────────────────────────────────────────────────────

/// Exact-match categorical filter. `All` bypasses filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    /// Build from a user-supplied value; `"all"` and `""` mean no filter.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum SortDirection {
    #[strum(to_string = "asc", serialize = "ascending")]
    Ascending,
    #[strum(to_string = "desc", serialize = "descending")]
    Descending,
}

/// Which fetch, if any, is in flight. Initial load and pull-to-refresh are
/// distinct phases so they can never both be active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Refreshing,
}

// ── ListView ─────────────────────────────────────────────────────

/// Snapshot of one list screen.
///
/// Cloning is cheap: the fetched records sit behind an `Arc` and are only
/// ever replaced wholesale.
#[derive(Debug, Clone)]
pub struct ListView<E> {
    pub(crate) raw_items: Arc<Vec<E>>,
    pub(crate) search_query: String,
    pub(crate) facet: Facet,
    pub(crate) sort: Option<SortDirection>,
    pub(crate) phase: LoadPhase,
}

impl<E> Default for ListView<E> {
    fn default() -> Self {
        Self {
            raw_items: Arc::new(Vec::new()),
            search_query: String::new(),
            facet: Facet::All,
            sort: None,
            phase: LoadPhase::Idle,
        }
    }
}

impl<E: Entity> ListView<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-fetched collection.
    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            raw_items: Arc::new(items),
            ..Self::default()
        }
    }

    /// Records as last fetched, in server order.
    pub fn raw_items(&self) -> &Arc<Vec<E>> {
        &self.raw_items
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn facet(&self) -> &Facet {
        &self.facet
    }

    pub fn sort(&self) -> Option<SortDirection> {
        self.sort
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == LoadPhase::Refreshing
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_facet(&mut self, facet: Facet) {
        self.facet = facet;
    }

    pub fn set_sort(&mut self, sort: Option<SortDirection>) {
        self.sort = sort;
    }

    /// Look up a fetched record by id.
    pub fn find(&self, id: &EntityId) -> Option<&E> {
        self.raw_items.iter().find(|item| item.id() == id)
    }

    /// Search, then facet, then (optionally) sort.
    ///
    /// Every returned reference points into `raw_items`; nothing is
    /// invented or duplicated.
    pub fn derive(&self) -> Vec<&E> {
        let query = self.search_query.to_lowercase();
        let mut items: Vec<&E> = self
            .raw_items
            .iter()
            .filter(|item| matches_query(*item, &query))
            .filter(|item| self.facet.matches(item.facet()))
            .collect();

        if let Some(direction) = self.sort {
            sort_items(&mut items, direction);
        }
        items
    }

    /// Owned copy of [`derive`](Self::derive).
    pub fn derived_items(&self) -> Vec<E> {
        self.derive().into_iter().cloned().collect()
    }
}

/// Case-insensitive substring match against the record's search fields.
/// `lowered_query` must already be lowercase; empty matches everything.
pub fn matches_query<E: Entity>(item: &E, lowered_query: &str) -> bool {
    lowered_query.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(lowered_query))
}

/// Stable, byte-wise sort on `sort_key()`.
pub fn sort_items<E: Entity>(items: &mut [&E], direction: SortDirection) {
    items.sort_by(|a, b| {
        let ord: Ordering = a.sort_key().cmp(b.sort_key());
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
