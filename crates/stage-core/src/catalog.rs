//! Furniture catalog: items grouped by category.
//!
//! The catalog is built once from a data source and never mutated, so it
//! can be shared (`Arc<Catalog>`) by any number of readers. Insertion order
//! within a category is display order.

use crate::error::{Result, StageError};
use crate::id::ItemId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Furniture category. Declaration order is the search scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Living,
    Kitchen,
    Bedroom,
    Decor,
    Outdoor,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Living,
        Category::Kitchen,
        Category::Bedroom,
        Category::Decor,
        Category::Outdoor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Living => "living",
            Category::Kitchen => "kitchen",
            Category::Bedroom => "bedroom",
            Category::Decor => "decor",
            Category::Outdoor => "outdoor",
        }
    }

    /// Case-insensitive lookup; `None` for names outside the fixed set.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable furniture entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureCatalogItem {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    /// Opaque reference to the item's thumbnail image.
    pub thumbnail: String,
}

/// Raw item row as supplied by the catalog data source.
#[derive(Debug, Deserialize)]
struct ItemRow {
    id: String,
    name: String,
    #[serde(default)]
    thumbnail: String,
}

/// Read-only registry of furniture items by category.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// One slot per category in scan order; absent categories have no slot.
    categories: SmallVec<[(Category, Vec<FurnitureCatalogItem>); 5]>,
    /// Index from item id to (slot, position).
    index: HashMap<ItemId, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog from items in display order.
    ///
    /// Fails with a validation error if an id appears twice, in any
    /// combination of categories.
    pub fn new(items: impl IntoIterator<Item = FurnitureCatalogItem>) -> Result<Self> {
        let mut grouped: BTreeMap<Category, Vec<FurnitureCatalogItem>> = BTreeMap::new();
        for item in items {
            grouped.entry(item.category).or_default().push(item);
        }

        let mut catalog = Catalog::default();
        for (category, items) in grouped {
            let slot = catalog.categories.len();
            for (pos, item) in items.iter().enumerate() {
                if catalog.index.insert(item.id, (slot, pos)).is_some() {
                    return Err(StageError::validation(
                        "catalog",
                        format!("duplicate item id '{}'", item.id),
                    ));
                }
            }
            catalog.categories.push((category, items));
        }

        log::debug!(
            "catalog built: {} items in {} categories",
            catalog.index.len(),
            catalog.categories.len()
        );
        Ok(catalog)
    }

    /// Parse the data-source JSON shape:
    /// `{ "living": [ { "id": "sofa1", "name": "Modern Sofa", "thumbnail": "..." } ] }`.
    ///
    /// Unknown category keys are rejected.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<ItemRow>> =
            serde_json::from_str(text).map_err(StageError::MalformedCatalog)?;

        // Keep the data source's per-category order; categories are regrouped
        // into scan order by `new`.
        let mut items = Vec::new();
        for (key, rows) in raw {
            let category = Category::parse(&key).ok_or_else(|| {
                StageError::validation("catalog", format!("unknown category '{key}'"))
            })?;
            items.extend(rows.into_iter().map(|row| FurnitureCatalogItem {
                id: ItemId::intern(&row.id),
                name: row.name,
                category,
                thumbnail: row.thumbnail,
            }));
        }
        Self::new(items)
    }

    /// Items of a category in registered order. Empty if nothing is registered.
    pub fn list_by_category(&self, category: Category) -> &[FurnitureCatalogItem] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    /// Like `list_by_category`, but by name. Unknown names yield an empty slice.
    pub fn list_by_category_name(&self, name: &str) -> &[FurnitureCatalogItem] {
        match Category::parse(name) {
            Some(category) => self.list_by_category(category),
            None => &[],
        }
    }

    /// Case-insensitive substring match against item names across every
    /// category, in category order then item order.
    ///
    /// The query is matched as given; callers decide what an empty query
    /// means (see `CatalogBrowser` in the editor).
    pub fn search(&self, query: &str) -> Vec<&FurnitureCatalogItem> {
        let needle = query.to_lowercase();
        self.categories
            .iter()
            .flat_map(|(_, items)| items.iter())
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&FurnitureCatalogItem> {
        self.index
            .get(&id)
            .map(|&(slot, pos)| &self.categories[slot].1[pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// Categories that have at least one item, in scan order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
