use sar_core::{
    NewResource, Resource, ResourceId, ResourcePatch, ResourceStatus, ResourceView, SarResult,
};
use sar_storage::{CalloutRepository, EntityStore, ResourceRepository, TeamRepository};
use tracing::info;

use crate::{finish, AssignmentEngine, ResourceFilter};

impl<S: EntityStore> AssignmentEngine<S> {
    /// Creates an unassigned resource. No fields are required beyond what the
    /// body needs to deserialize.
    pub async fn create_resource(&self, request: NewResource) -> SarResult<ResourceView> {
        let _guard = self.state_lock.write().await;
        let result = self.create_resource_locked(request).await;
        finish("create_resource", result)
    }

    async fn create_resource_locked(&self, request: NewResource) -> SarResult<ResourceView> {
        let resource = Resource {
            id: ResourceId::new(),
            name: request.name,
            kind: request.kind,
            status: request.status.unwrap_or(ResourceStatus::Available),
            team_id: None,
            details: request.details,
        };
        ResourceRepository::upsert(&self.store, resource.clone()).await?;
        info!(resource_id = %resource.id, kind = %resource.kind, "Resource created");
        Ok(self.joiner().await?.resource(resource))
    }

    pub async fn get_resource(&self, id: &ResourceId) -> SarResult<ResourceView> {
        let _guard = self.state_lock.read().await;
        let resource = self.require_resource(id).await?;
        Ok(self.joiner().await?.resource(resource))
    }

    pub async fn list_resources(&self, filter: &ResourceFilter) -> SarResult<Vec<ResourceView>> {
        let _guard = self.state_lock.read().await;
        let joiner = self.joiner().await?;
        let views = ResourceRepository::list(&self.store)
            .await?
            .into_iter()
            .filter(|resource| filter.kind.is_none_or(|kind| resource.kind == kind))
            .filter(|resource| filter.status.is_none_or(|status| resource.status == status))
            .map(|resource| joiner.resource(resource))
            .filter(|view| match filter.team.as_deref() {
                None => true,
                Some(team) => {
                    view.team.as_deref() == Some(team)
                        || view
                            .resource
                            .team_id
                            .as_ref()
                            .is_some_and(|id| id.as_str() == team)
                }
            })
            .collect();
        Ok(views)
    }

    pub async fn update_resource(
        &self,
        id: &ResourceId,
        patch: ResourcePatch,
    ) -> SarResult<ResourceView> {
        let _guard = self.state_lock.write().await;
        let result = self.update_resource_locked(id, patch).await;
        finish("update_resource", result)
    }

    async fn update_resource_locked(
        &self,
        id: &ResourceId,
        patch: ResourcePatch,
    ) -> SarResult<ResourceView> {
        let mut resource = self.require_resource(id).await?;
        if let Some(name) = patch.name {
            resource.name = name;
        }
        if let Some(kind) = patch.kind {
            resource.kind = kind;
        }
        if let Some(status) = patch.status {
            resource.status = status;
        }
        resource.details.merge(patch.details);
        ResourceRepository::upsert(&self.store, resource.clone()).await?;
        Ok(self.joiner().await?.resource(resource))
    }

    /// Removes a resource and every reference to it from callouts and teams.
    pub async fn delete_resource(&self, id: &ResourceId) -> SarResult<()> {
        let _guard = self.state_lock.write().await;
        let result = self.delete_resource_locked(id).await;
        finish("delete_resource", result)
    }

    async fn delete_resource_locked(&self, id: &ResourceId) -> SarResult<()> {
        self.require_resource(id).await?;

        for mut callout in CalloutRepository::list(&self.store).await? {
            if callout.assigned_resources.contains(id) {
                callout.assigned_resources.retain(|assigned| assigned != id);
                CalloutRepository::upsert(&self.store, callout).await?;
            }
        }
        for mut team in TeamRepository::list(&self.store).await? {
            let listed = team.assigned_resources.contains(id);
            let vehicle = team.vehicle_id.as_ref() == Some(id);
            if listed || vehicle {
                team.assigned_resources.retain(|assigned| assigned != id);
                if vehicle {
                    team.vehicle_id = None;
                }
                TeamRepository::upsert(&self.store, team).await?;
            }
        }

        ResourceRepository::delete(&self.store, id).await?;
        info!(resource_id = %id, "Resource deleted");
        Ok(())
    }
}
