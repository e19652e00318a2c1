//! Read-only directory views over users, stores, and regions.
//!
//! Lookups by id return `Option` for unknown ids; filtered listings return
//! an empty vector, never an error. Callers decide what absence means.

use serde::{Deserialize, Serialize};

use crate::model::{Region, Role, Store, UserProfile};

/// The directory half of the dataset: who works where, and which stores
/// belong to which region. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    pub users: Vec<UserProfile>,
    pub stores: Vec<Store>,
    pub regions: Vec<Region>,
}

impl Directory {
    pub fn new(users: Vec<UserProfile>, stores: Vec<Store>, regions: Vec<Region>) -> Self {
        Self {
            users,
            stores,
            regions,
        }
    }

    pub fn user_by_id(&self, id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Users holding `role`, optionally restricted to one store.
    pub fn users_by_role(&self, role: Role, store_id: Option<&str>) -> Vec<&UserProfile> {
        self.users
            .iter()
            .filter(|user| user.role == role)
            .filter(|user| match store_id {
                Some(store_id) => user.store_id.as_deref() == Some(store_id),
                None => true,
            })
            .collect()
    }

    /// Everyone working in one store, any role.
    pub fn users_in_store(&self, store_id: &str) -> Vec<&UserProfile> {
        self.users
            .iter()
            .filter(|user| user.store_id.as_deref() == Some(store_id))
            .collect()
    }

    pub fn store_by_id(&self, id: &str) -> Option<&Store> {
        self.stores.iter().find(|store| store.id == id)
    }

    pub fn stores_by_region(&self, region_id: &str) -> Vec<&Store> {
        self.stores
            .iter()
            .filter(|store| store.region_id == region_id)
            .collect()
    }

    pub fn region_by_id(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }
}
