//! Focus mode catalog
//!
//! In-memory list of the focus modes offered to clients, with basic CRUD.
//! Which agent actually serves a focus mode is decided by configuration;
//! this catalog only describes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A focus mode as presented to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusMode {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub api_endpoint: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new focus mode
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFocusMode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub api_endpoint: String,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusModeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub api_endpoint: Option<String>,
    pub is_active: Option<bool>,
}

/// In-memory focus mode store
#[derive(Debug, Default)]
pub struct FocusModeStore {
    modes: RwLock<Vec<FocusMode>>,
}

impl FocusModeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given focus modes, all active
    pub fn with_modes<'a>(modes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let now = Utc::now();
        let modes = modes
            .into_iter()
            .map(|(name, endpoint)| FocusMode {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                description: None,
                api_endpoint: endpoint.to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            modes: RwLock::new(modes),
        }
    }

    pub async fn list(&self) -> Vec<FocusMode> {
        self.modes.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<FocusMode> {
        self.modes.read().await.iter().find(|m| m.id == id).cloned()
    }

    /// Add a focus mode. Returns `None` when name or endpoint is empty.
    pub async fn create(&self, new: NewFocusMode) -> Option<FocusMode> {
        if new.name.trim().is_empty() || new.api_endpoint.trim().is_empty() {
            return None;
        }

        let now = Utc::now();
        let mode = FocusMode {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            api_endpoint: new.api_endpoint,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.modes.write().await.push(mode.clone());
        Some(mode)
    }

    pub async fn update(&self, id: &str, update: FocusModeUpdate) -> Option<FocusMode> {
        let mut modes = self.modes.write().await;
        let mode = modes.iter_mut().find(|m| m.id == id)?;

        if let Some(name) = update.name {
            mode.name = name;
        }
        if let Some(description) = update.description {
            mode.description = Some(description);
        }
        if let Some(api_endpoint) = update.api_endpoint {
            mode.api_endpoint = api_endpoint;
        }
        if let Some(is_active) = update.is_active {
            mode.is_active = is_active;
        }
        mode.updated_at = Utc::now();

        Some(mode.clone())
    }

    /// Remove a focus mode, returning whether it existed
    pub async fn delete(&self, id: &str) -> bool {
        let mut modes = self.modes.write().await;
        let before = modes.len();
        modes.retain(|m| m.id != id);
        modes.len() != before
    }

    /// Flip `is_active`
    pub async fn toggle(&self, id: &str) -> Option<FocusMode> {
        let mut modes = self.modes.write().await;
        let mode = modes.iter_mut().find(|m| m.id == id)?;
        mode.is_active = !mode.is_active;
        mode.updated_at = Utc::now();
        Some(mode.clone())
    }
}
