use async_trait::async_trait;
use sar_core::{Callout, CalloutId, Resource, ResourceId, SarError, Team, TeamId};
use std::fmt;

#[derive(Debug, Clone)]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for SarError {
    fn from(error: StorageError) -> Self {
        SarError::internal(error.message)
    }
}

/// Lists return entities in insertion order; `upsert` keeps an existing
/// entity's position.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn get(&self, id: &ResourceId) -> Result<Option<Resource>, StorageError>;
    async fn list(&self) -> Result<Vec<Resource>, StorageError>;
    async fn upsert(&self, resource: Resource) -> Result<(), StorageError>;
    async fn delete(&self, id: &ResourceId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait CalloutRepository: Send + Sync {
    async fn get(&self, id: &CalloutId) -> Result<Option<Callout>, StorageError>;
    async fn list(&self) -> Result<Vec<Callout>, StorageError>;
    async fn upsert(&self, callout: Callout) -> Result<(), StorageError>;
    async fn delete(&self, id: &CalloutId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, StorageError>;
    async fn list(&self) -> Result<Vec<Team>, StorageError>;
    async fn upsert(&self, team: Team) -> Result<(), StorageError>;
    async fn delete(&self, id: &TeamId) -> Result<(), StorageError>;
}

/// Everything the assignment rules need from a store.
pub trait EntityStore: ResourceRepository + CalloutRepository + TeamRepository {}

impl<T> EntityStore for T where T: ResourceRepository + CalloutRepository + TeamRepository {}
