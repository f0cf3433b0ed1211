// src/services/view.rs
// DOCUMENTATION: Category detail view model
// PURPOSE: One view for every category; tracks load state, selection and map

use serde::Serialize;

use crate::models::{find_category, Category, LocationRecord};
use crate::services::map_view::{self, MapController, Viewport};
use crate::services::search::filter_locations;

/// What the category page is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Loaded,
    /// The category exists but nothing came back (or the store was unreachable)
    Empty,
    /// The slug does not name a category
    NotFound,
}

/// Identifies one navigation. Results carrying an older token are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewToken {
    category: &'static Category,
    seq: u64,
}

impl ViewToken {
    pub fn category(&self) -> &'static Category {
        self.category
    }
}

pub struct CategoryView<M: MapController = Viewport> {
    category: Option<&'static Category>,
    pending: Option<u64>,
    next_seq: u64,
    state: LoadState,
    locations: Vec<LocationRecord>,
    selected: Option<String>,
    map: M,
}

impl<M: MapController> CategoryView<M> {
    pub fn new(map: M) -> Self {
        Self {
            category: None,
            pending: None,
            next_seq: 1,
            state: LoadState::Loading,
            locations: Vec::new(),
            selected: None,
            map,
        }
    }

    /// Switch to the category named by `slug`.
    ///
    /// Clears the previous category's data, selection and map focus, and
    /// supersedes any load still outstanding for it. Returns `None` (and
    /// enters `NotFound`) when the slug is unknown.
    pub fn navigate(&mut self, slug: &str) -> Option<ViewToken> {
        self.locations.clear();
        self.reset();

        let Some(category) = find_category(slug) else {
            log::debug!("No category for slug '{}'", slug);
            self.category = None;
            self.pending = None;
            self.state = LoadState::NotFound;
            return None;
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.category = Some(category);
        self.pending = Some(seq);
        self.state = LoadState::Loading;

        Some(ViewToken { category, seq })
    }

    /// Show `records` if `token` belongs to the latest navigation.
    /// Returns false when the result was stale and dropped.
    pub fn apply(&mut self, token: &ViewToken, records: Vec<LocationRecord>) -> bool {
        if self.pending != Some(token.seq) {
            log::debug!(
                "Dropping stale result #{} for '{}'",
                token.seq,
                token.category.id
            );
            return false;
        }

        self.pending = None;
        self.state = if records.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Loaded
        };
        self.locations = records;
        true
    }

    /// Stop waiting for the outstanding load; its result will be ignored.
    /// Returns the category that was still loading, if any.
    pub fn leave(&mut self) -> Option<&'static Category> {
        self.pending.take().and(self.category)
    }

    /// Select a location by id and focus the map on it.
    ///
    /// Returns the record when the id is known. A record without usable
    /// coordinates resets the map and leaves nothing selected.
    pub fn select(&mut self, id: &str) -> Option<&LocationRecord> {
        let index = self.locations.iter().position(|record| record.id == id)?;
        let record = &self.locations[index];

        if map_view::focus_on(&mut self.map, record) {
            self.selected = Some(record.id.clone());
        } else {
            self.selected = None;
        }
        Some(record)
    }

    /// Drop the selection and return the map to the default view
    pub fn reset(&mut self) {
        self.selected = None;
        map_view::reset(&mut self.map);
    }

    /// Locations matching `term`, in page order
    pub fn search(&self, term: &str) -> Vec<LocationRecord> {
        filter_locations(&self.locations, term)
    }

    pub fn category(&self) -> Option<&'static Category> {
        self.category
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn locations(&self) -> &[LocationRecord] {
        &self.locations
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}

impl Default for CategoryView<Viewport> {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
