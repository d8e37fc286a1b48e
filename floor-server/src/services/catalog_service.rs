//! Catalog Service - menu item management with in-memory caching
//!
//! The order path consumes the catalog through the [`MenuCatalog`] trait
//! and treats it as read-only: availability and unit price are looked up
//! once, at order-creation time, and snapshotted into the order lines.
//! Administration (create/update/delete) is write-through: the redb menu
//! table is the source of truth, the `RwLock<HashMap>` cache serves reads.

use crate::floor::{FloorError, FloorResult, FloorStorage};
use parking_lot::RwLock;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Read-only catalog interface consumed by the order workflow
pub trait MenuCatalog: Send + Sync {
    /// Current item state; `None` for unknown ids
    fn get_item(&self, item_id: &str) -> Option<MenuItem>;

    /// Available items, optionally filtered by category, sorted by
    /// category then name
    fn list_available(&self, category: Option<&str>) -> Vec<MenuItem>;
}

/// Menu catalog backed by floor storage with an in-memory cache
#[derive(Clone)]
pub struct CatalogService {
    storage: FloorStorage,
    /// Items cache: item_id -> MenuItem
    items: Arc<RwLock<HashMap<String, MenuItem>>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("items", &self.items.read().len())
            .finish()
    }
}

impl CatalogService {
    /// Create the service and warm the cache from storage
    pub fn new(storage: FloorStorage) -> FloorResult<Self> {
        let service = Self {
            storage,
            items: Arc::new(RwLock::new(HashMap::new())),
        };
        service.load_cache()?;
        Ok(service)
    }

    /// Reload the cache from storage
    pub fn load_cache(&self) -> FloorResult<()> {
        let items = self.storage.get_all_menu_items()?;
        let count = items.len();
        let mut cache = self.items.write();
        cache.clear();
        for item in items {
            cache.insert(item.id.clone(), item);
        }
        drop(cache);
        tracing::info!(items = count, "Menu catalog cache loaded");
        Ok(())
    }

    // ========== Administration ==========

    /// Create a menu item
    pub fn create_item(&self, payload: MenuItemCreate) -> FloorResult<MenuItem> {
        crate::floor::money::validate_unit_price(payload.price, &payload.name)?;
        if payload.name.trim().is_empty() {
            return Err(FloorError::InvalidOperation(
                "menu item name must not be empty".to_string(),
            ));
        }

        let now = now_millis();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category: payload.category,
            is_available: payload.is_available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.storage.store_menu_item(&item)?;
        self.items.write().insert(item.id.clone(), item.clone());

        tracing::info!(item_id = %item.id, name = %item.name, "Menu item created");
        Ok(item)
    }

    /// Apply a typed partial update to a menu item
    pub fn update_item(&self, item_id: &str, update: MenuItemUpdate) -> FloorResult<MenuItem> {
        let mut item = self
            .storage
            .get_menu_item(item_id)?
            .ok_or_else(|| FloorError::ItemNotFound(item_id.to_string()))?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(FloorError::InvalidOperation(
                    "menu item name must not be empty".to_string(),
                ));
            }
            item.name = name;
        }
        if let Some(description) = update.description {
            item.description = Some(description);
        }
        if let Some(price) = update.price {
            crate::floor::money::validate_unit_price(price, &item.name)?;
            item.price = price;
        }
        if let Some(category) = update.category {
            item.category = category;
        }
        if let Some(is_available) = update.is_available {
            item.is_available = is_available;
        }
        item.updated_at = now_millis();

        self.storage.store_menu_item(&item)?;
        self.items.write().insert(item.id.clone(), item.clone());
        Ok(item)
    }

    /// Delete a menu item
    ///
    /// Existing order lines are unaffected: they carry their own name and
    /// price snapshots.
    pub fn delete_item(&self, item_id: &str) -> FloorResult<()> {
        if !self.storage.remove_menu_item(item_id)? {
            return Err(FloorError::ItemNotFound(item_id.to_string()));
        }
        self.items.write().remove(item_id);
        tracing::info!(item_id = %item_id, "Menu item deleted");
        Ok(())
    }

    /// All items regardless of availability, optionally filtered by
    /// category, sorted by category then name
    pub fn list_all(&self, category: Option<&str>) -> Vec<MenuItem> {
        let cache = self.items.read();
        let mut items: Vec<MenuItem> = cache
            .values()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .cloned()
            .collect();
        drop(cache);
        items.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        items
    }
}

impl MenuCatalog for CatalogService {
    fn get_item(&self, item_id: &str) -> Option<MenuItem> {
        self.items.read().get(item_id).cloned()
    }

    fn list_available(&self, category: Option<&str>) -> Vec<MenuItem> {
        let mut items = self.list_all(category);
        items.retain(|i| i.is_available);
        items
    }
}
