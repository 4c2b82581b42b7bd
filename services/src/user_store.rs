//! Local lightweight user store backed by a JSON file.
//!
//! File layout: `{"<user_id>": {"user_id": .., "username": .., "first_name": ..}}`. The file is read
//! once on open and rewritten as a whole on every upsert.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: i64, username: Option<String>, first_name: Option<String>) -> Self {
        Self {
            user_id,
            username,
            first_name,
        }
    }
}

/// Profile store. The write lock is held across the file rewrite so upserts never interleave.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    cache: RwLock<BTreeMap<i64, UserProfile>>,
}

impl UserStore {
    /// Opens the store at `path`, creating the parent directory. A missing file means an empty
    /// store; an unreadable or malformed file is logged and treated as empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let cache = load(&path).await;
        info!(path = %path.display(), profiles = cache.len(), "User store loaded");

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, user_id: i64) -> Option<UserProfile> {
        self.cache.read().await.get(&user_id).cloned()
    }

    /// Inserts or replaces the profile, then rewrites the file. On a write failure the in-memory
    /// view is left unchanged.
    pub async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;

        let mut next = cache.clone();
        let user_id = profile.user_id;
        next.insert(user_id, profile);
        save(&self.path, &next).await?;
        *cache = next;

        info!(user_id, path = %self.path.display(), "Profile upserted");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn load(path: &Path) -> BTreeMap<i64, UserProfile> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read user store, starting empty");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(profiles) => profiles,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed user store, starting empty");
            BTreeMap::new()
        }
    }
}

async fn save(path: &Path, profiles: &BTreeMap<i64, UserProfile>) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(profiles)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
