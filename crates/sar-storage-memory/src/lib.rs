use async_trait::async_trait;
use indexmap::IndexMap;
use sar_core::{Callout, CalloutId, Resource, ResourceId, Team, TeamId};
use sar_storage::{CalloutRepository, ResourceRepository, StorageError, TeamRepository};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

/// Entities loaded into a fresh store at boot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub callouts: Vec<Callout>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl SeedData {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            StorageError::new(format!("failed to read seed file {}: {err}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            StorageError::new(format!("invalid seed file {}: {err}", path.display()))
        })
    }
}

/// Process-lifetime store. Each table keeps insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: RwLock<IndexMap<ResourceId, Resource>>,
    callouts: RwLock<IndexMap<CalloutId, Callout>>,
    teams: RwLock<IndexMap<TeamId, Team>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: SeedData) -> Self {
        info!(
            resources = seed.resources.len(),
            callouts = seed.callouts.len(),
            teams = seed.teams.len(),
            "Seeding in-memory store"
        );
        Self {
            resources: RwLock::new(
                seed.resources
                    .into_iter()
                    .map(|resource| (resource.id.clone(), resource))
                    .collect(),
            ),
            callouts: RwLock::new(
                seed.callouts
                    .into_iter()
                    .map(|callout| (callout.id.clone(), callout))
                    .collect(),
            ),
            teams: RwLock::new(
                seed.teams
                    .into_iter()
                    .map(|team| (team.id.clone(), team))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ResourceRepository for MemoryStore {
    async fn get(&self, id: &ResourceId) -> Result<Option<Resource>, StorageError> {
        Ok(self.resources.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Resource>, StorageError> {
        Ok(self.resources.read().await.values().cloned().collect())
    }

    async fn upsert(&self, resource: Resource) -> Result<(), StorageError> {
        self.resources
            .write()
            .await
            .insert(resource.id.clone(), resource);
        Ok(())
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), StorageError> {
        self.resources.write().await.shift_remove(id);
        Ok(())
    }
}

#[async_trait]
impl CalloutRepository for MemoryStore {
    async fn get(&self, id: &CalloutId) -> Result<Option<Callout>, StorageError> {
        Ok(self.callouts.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Callout>, StorageError> {
        Ok(self.callouts.read().await.values().cloned().collect())
    }

    async fn upsert(&self, callout: Callout) -> Result<(), StorageError> {
        self.callouts
            .write()
            .await
            .insert(callout.id.clone(), callout);
        Ok(())
    }

    async fn delete(&self, id: &CalloutId) -> Result<(), StorageError> {
        self.callouts.write().await.shift_remove(id);
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for MemoryStore {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, StorageError> {
        Ok(self.teams.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Team>, StorageError> {
        Ok(self.teams.read().await.values().cloned().collect())
    }

    async fn upsert(&self, team: Team) -> Result<(), StorageError> {
        self.teams.write().await.insert(team.id.clone(), team);
        Ok(())
    }

    async fn delete(&self, id: &TeamId) -> Result<(), StorageError> {
        self.teams.write().await.shift_remove(id);
        Ok(())
    }
}
