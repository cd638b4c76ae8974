//! Catalog browsing view state.
//!
//! Category browsing and search are mutually exclusive: picking a category
//! clears the search, and an empty query falls back to the active category.

use stage_core::{Catalog, Category, FurnitureCatalogItem};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode<'a> {
    Category(Category),
    Search(&'a str),
}

#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    catalog: Arc<Catalog>,
    active_category: Category,
    query: String,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<Catalog>, category: Category) -> Self {
        Self {
            catalog,
            active_category: category,
            query: String::new(),
        }
    }

    pub fn active_category(&self) -> Category {
        self.active_category
    }

    /// Switch category. Clears any active search.
    pub fn select_category(&mut self, category: Category) {
        self.active_category = category;
        self.query.clear();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn mode(&self) -> BrowseMode<'_> {
        if self.query.trim().is_empty() {
            BrowseMode::Category(self.active_category)
        } else {
            BrowseMode::Search(&self.query)
        }
    }

    pub fn list_by_category(&self, category: Category) -> &[FurnitureCatalogItem] {
        self.catalog.list_by_category(category)
    }

    /// Search every category; an empty (or blank) query returns the active
    /// category's list instead.
    pub fn search(&self, query: &str) -> Vec<&FurnitureCatalogItem> {
        if query.trim().is_empty() {
            self.list_by_category(self.active_category).iter().collect()
        } else {
            self.catalog.search(query)
        }
    }

    /// Items the catalog panel should show right now.
    pub fn visible_items(&self) -> Vec<&FurnitureCatalogItem> {
        self.search(&self.query)
    }
}
