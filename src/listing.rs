use log::{debug, error};
use serde::Serialize;

use crate::api::{DimensionApi, ListQuery};
use crate::dimension::{Dimension, ListIntent};

/// Distance from the document bottom, in pixels, that triggers the next page
pub const SCROLL_THRESHOLD: f64 = 10.0;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    /// Last requested page, 1-based; 0 before the first load
    pub page: usize,
}

/// Scroll position reported by the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self) -> bool {
        self.scroll_top + self.viewport_height >= self.document_height - SCROLL_THRESHOLD
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows appended (or replaced on a first load)
    Loaded(usize),
    /// Nothing to do: already loading or every row is loaded
    Skipped,
    Failed(String),
}

/// Owner of the dimension list screen
///
/// Pages are requested in order and appended as they arrive. On a failed
/// request the page counter steps back so the next attempt asks for the same
/// page again. The GL account list arrives with each page and is kept apart.
#[derive(Clone, Debug)]
pub struct DimensionListController {
    pagination: Pagination,
    items: Vec<Dimension>,
    system: Vec<Dimension>,
    search: Option<String>,
    loading: bool,
}

impl DimensionListController {
    pub fn new(limit: usize) -> Self {
        DimensionListController {
            pagination: Pagination {
                total: 0,
                limit: limit.max(1),
                page: 0,
            },
            items: Vec::new(),
            system: Vec::new(),
            search: None,
            loading: false,
        }
    }

    pub fn items(&self) -> &[Dimension] {
        &self.items
    }

    /// System dimensions (GL account), shown in their own section.
    pub fn system_items(&self) -> &[Dimension] {
        &self.system
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.pagination.page == 0 || self.items.len() < self.pagination.total
    }

    pub fn should_load_more(&self, scroll: &ScrollMetrics) -> bool {
        !self.loading && self.has_more() && scroll.near_bottom()
    }

    async fn fetch<A: DimensionApi>(&mut self, api: &A, page: usize, replace: bool) -> LoadOutcome {
        let previous = self.pagination.page;
        self.loading = true;
        self.pagination.page = page;
        let query = ListQuery {
            page: self.pagination.page,
            limit: self.pagination.limit,
            search: self.search.clone(),
        };
        debug!("fetching dimension page {}", query.page);

        let result = api.list_dimensions(&query).await;
        self.loading = false;

        match result {
            Ok(loaded) => {
                let count = loaded.items.len();
                if replace {
                    self.items = loaded.items;
                } else {
                    self.items.extend(loaded.items);
                }
                self.system = loaded.gl_account;
                self.pagination.total = loaded.total;
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                self.pagination.page = previous;
                error!("failed to load dimension page {}: {}", query.page, e);
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    /// Load the first page, replacing whatever is shown.
    pub async fn load_first<A: DimensionApi>(&mut self, api: &A) -> LoadOutcome {
        if self.loading {
            return LoadOutcome::Skipped;
        }
        self.fetch(api, 1, true).await
    }

    pub async fn load_more<A: DimensionApi>(&mut self, api: &A) -> LoadOutcome {
        if self.loading || !self.has_more() {
            return LoadOutcome::Skipped;
        }
        let replace = self.pagination.page == 0;
        self.fetch(api, self.pagination.page + 1, replace).await
    }

    /// Scroll handler: loads the next page when the view is near the bottom.
    pub async fn on_scroll<A: DimensionApi>(&mut self, api: &A, scroll: &ScrollMetrics) -> LoadOutcome {
        if !self.should_load_more(scroll) {
            return LoadOutcome::Skipped;
        }
        self.load_more(api).await
    }

    /// Start over with a search term; an empty term clears the search.
    ///
    /// On failure the previous term stays in effect along with the rows it loaded.
    pub async fn search<A: DimensionApi>(&mut self, api: &A, query: &str) -> LoadOutcome {
        if self.loading {
            return LoadOutcome::Skipped;
        }
        let query = query.trim();
        let previous = std::mem::replace(
            &mut self.search,
            (!query.is_empty()).then(|| query.to_string()),
        );

        let outcome = self.load_first(api).await;
        if matches!(outcome, LoadOutcome::Failed(_)) {
            self.search = previous;
        }
        outcome
    }

    /// Apply a row action's result to the owned list.
    pub fn apply(&mut self, intent: &ListIntent) -> bool {
        let matched = intent.apply(&mut self.items);
        if matched {
            if let ListIntent::RemoveById { .. } = intent {
                self.pagination.total = self.pagination.total.saturating_sub(1);
            }
        } else {
            return intent.apply(&mut self.system);
        }
        matched
    }
}
