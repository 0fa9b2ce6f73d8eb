use sar_core::{
    CalloutId, CalloutPatch, CalloutStatus, ErrorCode, MergeTeams, NewCallout, NewResource,
    NewTeam, RenameTeam, ResourceDetails, ResourceId, ResourcePatch, ResourceStatus,
    ResourceType, TeamId, TeamStatus, TeamType,
};
use sar_storage::{CalloutRepository, ResourceRepository, TeamRepository};
use sar_storage_memory::MemoryStore;

use crate::{AssignmentEngine, ResourceFilter};

type Engine = AssignmentEngine<MemoryStore>;

fn engine() -> Engine {
    AssignmentEngine::new(MemoryStore::new())
}

async fn add_resource(engine: &Engine, name: &str, kind: ResourceType) -> ResourceId {
    engine
        .create_resource(NewResource {
            name: name.to_string(),
            kind,
            status: None,
            details: ResourceDetails::default(),
        })
        .await
        .unwrap()
        .resource
        .id
}

async fn add_callout(engine: &Engine, title: &str) -> CalloutId {
    engine
        .create_callout(NewCallout {
            title: title.to_string(),
            location: "Kentmere".to_string(),
            description: "Overdue walker".to_string(),
            ..NewCallout::default()
        })
        .await
        .unwrap()
        .callout
        .id
}

async fn add_team_in(engine: &Engine, callout_id: &CalloutId, name: &str) -> TeamId {
    engine
        .create_team_in_callout(callout_id, NewTeam::new(name, TeamType::Hill))
        .await
        .unwrap()
        .team
        .id
}

async fn stored_resource(engine: &Engine, id: &ResourceId) -> sar_core::Resource {
    ResourceRepository::get(engine.store(), id)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn new_resources_start_available_and_unteamed() {
    let engine = engine();
    let view = engine
        .create_resource(NewResource {
            name: "Alice".to_string(),
            kind: ResourceType::Personnel,
            status: None,
            details: ResourceDetails {
                callsign: Some("A1".to_string()),
                ..ResourceDetails::default()
            },
        })
        .await
        .unwrap();

    assert_eq!(view.resource.status, ResourceStatus::Available);
    assert_eq!(view.resource.team_id, None);
    assert_eq!(view.team, None);
    assert_eq!(view.resource.details.callsign.as_deref(), Some("A1"));
}

#[tokio::test]
async fn callouts_get_prefixed_ids_and_defaults() {
    let engine = engine();
    let callout = engine
        .create_callout(NewCallout {
            title: "Fell search".to_string(),
            ..NewCallout::default()
        })
        .await
        .unwrap();

    assert!(callout.callout.id.as_str().starts_with("co-"));
    assert_eq!(callout.callout.status, CalloutStatus::Active);
    assert!(callout.callout.assigned_resources.is_empty());
    assert!(callout.teams.is_empty());
}

#[tokio::test]
async fn assigning_to_callout_twice_keeps_one_entry() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;

    engine
        .assign_resource_to_callout(&callout, &resource)
        .await
        .unwrap();
    let outcome = engine
        .assign_resource_to_callout(&callout, &resource)
        .await
        .unwrap();

    assert_eq!(outcome.callout.callout.assigned_resources, vec![resource]);
    assert_eq!(outcome.resource.resource.status, ResourceStatus::InUse);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;

    let err = engine
        .assign_resource_to_callout(&CalloutId::from("co-missing"), &resource)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Callout not found");

    let err = engine
        .assign_resource_to_callout(&callout, &ResourceId::from("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Resource not found");
}

#[tokio::test]
async fn unassigning_from_callout_resets_status() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    engine
        .assign_resource_to_callout(&callout, &resource)
        .await
        .unwrap();

    let outcome = engine
        .unassign_resource_from_callout(&callout, &resource)
        .await
        .unwrap();
    assert!(outcome.callout.callout.assigned_resources.is_empty());
    assert_eq!(outcome.resource.resource.status, ResourceStatus::Available);

    engine
        .unassign_resource_from_callout(&callout, &resource)
        .await
        .unwrap();
}

#[tokio::test]
async fn team_colour_comes_from_first_word() {
    let engine = engine();
    let alpha = engine
        .create_team(NewTeam::new("Alpha Hill Team", TeamType::Hill))
        .await
        .unwrap();
    let golf = engine
        .create_team(NewTeam::new("Golf", TeamType::Hill))
        .await
        .unwrap();
    let mut custom = NewTeam::new("Bravo", TeamType::Hill);
    custom.color = Some("#000000".to_string());
    let custom = engine.create_team(custom).await.unwrap();

    assert_eq!(alpha.team.color, "#DC2626");
    assert_eq!(golf.team.color, "#6B7280");
    assert_eq!(custom.team.color, "#000000");
    assert_eq!(alpha.status, TeamStatus::Available);
}

#[tokio::test]
async fn blank_team_names_are_rejected() {
    let engine = engine();
    let err = engine
        .create_team(NewTeam::new("   ", TeamType::Hill))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn vehicle_team_claims_its_vehicle() {
    let engine = engine();
    let vehicle = add_resource(&engine, "DM1", ResourceType::Vehicles).await;
    let mut request = NewTeam::new("Echo Vehicle", TeamType::Vehicle);
    request.vehicle_id = Some(vehicle.clone());

    let team = engine.create_team(request).await.unwrap();

    assert_eq!(team.team.assigned_resources, vec![vehicle.clone()]);
    assert_eq!(
        stored_resource(&engine, &vehicle).await.team_id,
        Some(team.team.id.clone())
    );
    assert!(engine.available_vehicles().await.unwrap().is_empty());
}

#[tokio::test]
async fn team_in_unknown_callout_is_not_found() {
    let engine = engine();
    let err = engine
        .create_team_in_callout(
            &CalloutId::from("co-nope"),
            NewTeam::new("Alpha", TeamType::Hill),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(TeamRepository::list(engine.store()).await.unwrap().is_empty());
}

#[tokio::test]
async fn team_assignment_round_trip() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let team = engine
        .create_team(NewTeam::new("Alpha", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;

    let assigned = engine
        .assign_resource_to_team(&team, &resource)
        .await
        .unwrap();
    assert_eq!(assigned.resource.team.as_deref(), Some("Alpha"));
    assert_eq!(assigned.team.team.assigned_resources, vec![resource.clone()]);

    let released = engine
        .unassign_resource_from_team(&team, &resource)
        .await
        .unwrap();
    assert_eq!(released.resource.resource.team_id, None);
    for team in TeamRepository::list(engine.store()).await.unwrap() {
        assert!(!team.assigned_resources.contains(&resource));
    }
}

#[tokio::test]
async fn moving_between_teams_leaves_one_member_list() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let alpha = engine
        .create_team(NewTeam::new("Alpha", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;
    let bravo = engine
        .create_team(NewTeam::new("Bravo", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;

    engine.assign_resource_to_team(&alpha, &resource).await.unwrap();
    engine.assign_resource_to_team(&bravo, &resource).await.unwrap();

    let alpha_team = engine.get_team(&alpha).await.unwrap();
    let bravo_team = engine.get_team(&bravo).await.unwrap();
    assert!(alpha_team.team.assigned_resources.is_empty());
    assert_eq!(bravo_team.team.assigned_resources, vec![resource.clone()]);

    engine
        .unassign_resource_from_team(&alpha, &resource)
        .await
        .unwrap();
    assert_eq!(stored_resource(&engine, &resource).await.team_id, Some(bravo));
}

#[tokio::test]
async fn kit_is_in_use_while_teamed() {
    let engine = engine();
    let kit = add_resource(&engine, "Warm Kit 1", ResourceType::Equipment).await;
    let pack = add_resource(&engine, "MRC Kit", ResourceType::MedicalPacks).await;
    let person = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let team = engine
        .create_team(NewTeam::new("Alpha", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;

    for id in [&kit, &pack, &person] {
        engine.assign_resource_to_team(&team, id).await.unwrap();
    }
    assert_eq!(stored_resource(&engine, &kit).await.status, ResourceStatus::InUse);
    assert_eq!(stored_resource(&engine, &pack).await.status, ResourceStatus::InUse);
    assert_eq!(
        stored_resource(&engine, &person).await.status,
        ResourceStatus::Available
    );

    engine.unassign_resource_from_team(&team, &kit).await.unwrap();
    assert_eq!(
        stored_resource(&engine, &kit).await.status,
        ResourceStatus::Available
    );
}

#[tokio::test]
async fn callout_team_assignment_adds_callout_membership() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    let team = add_team_in(&engine, &callout, "Charlie").await;

    let outcome = engine
        .assign_resource_to_team_in_callout(&callout, &team, &resource)
        .await
        .unwrap();

    let callout_view = outcome.callout.unwrap();
    assert_eq!(callout_view.callout.assigned_resources, vec![resource.clone()]);
    assert_eq!(callout_view.teams[0].team.assigned_resources, vec![resource.clone()]);
    assert_eq!(outcome.resource.team.as_deref(), Some("Charlie"));

    let outcome = engine
        .unassign_resource_from_team_in_callout(&callout, &team, &resource)
        .await
        .unwrap();
    assert_eq!(outcome.resource.resource.team_id, None);
    assert_eq!(
        outcome.callout.unwrap().callout.assigned_resources,
        vec![resource]
    );
}

#[tokio::test]
async fn callout_scoped_operations_reject_foreign_teams() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let first = add_callout(&engine, "first").await;
    let second = add_callout(&engine, "second").await;
    let team = add_team_in(&engine, &first, "Alpha").await;

    let err = engine
        .assign_resource_to_team_in_callout(&second, &team, &resource)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = engine
        .delete_team_in_callout(&second, &team)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(engine.get_team(&team).await.is_ok());
}

#[tokio::test]
async fn deleting_team_clears_member_references() {
    let engine = engine();
    let alice = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let bob = add_resource(&engine, "Bob", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    let team = add_team_in(&engine, &callout, "Delta").await;
    for id in [&alice, &bob] {
        engine
            .assign_resource_to_team_in_callout(&callout, &team, id)
            .await
            .unwrap();
    }

    engine.delete_team_in_callout(&callout, &team).await.unwrap();

    assert_eq!(stored_resource(&engine, &alice).await.team_id, None);
    assert_eq!(stored_resource(&engine, &bob).await.team_id, None);
    assert!(TeamRepository::get(engine.store(), &team).await.unwrap().is_none());
    let callout = engine.get_callout(&callout).await.unwrap();
    assert!(callout.callout.team_ids.is_empty());
    assert!(callout.teams.is_empty());
}

#[tokio::test]
async fn rename_touches_only_the_team() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let team = engine
        .create_team(NewTeam::new("Alpha", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;
    engine.assign_resource_to_team(&team, &resource).await.unwrap();

    let renamed = engine
        .rename_team(
            &team,
            RenameTeam {
                name: "  Alpha Two ".to_string(),
                location: Some("Ridge".to_string()),
                grid_reference: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.team.name, "Alpha Two");
    assert_eq!(renamed.team.location.as_deref(), Some("Ridge"));

    let view = engine.get_resource(&resource).await.unwrap();
    assert_eq!(view.team.as_deref(), Some("Alpha Two"));

    let err = engine
        .rename_team(&team, RenameTeam::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = engine
        .rename_team(&TeamId::from("missing"), RenameTeam::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn rename_callout_patches_title_and_grid() {
    let engine = engine();
    let callout = add_callout(&engine, "old").await;

    let view = engine
        .rename_callout(&callout, "New title", Some("SD 1355 8546".to_string()))
        .await
        .unwrap();
    assert_eq!(view.callout.title, "New title");
    assert_eq!(view.callout.grid_reference.as_deref(), Some("SD 1355 8546"));
    assert_eq!(view.callout.location, "Kentmere");

    let err = engine.rename_callout(&callout, " ", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn merge_leaves_one_team_with_all_members() {
    let engine = engine();
    let alice = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let bob = add_resource(&engine, "Bob", ResourceType::Personnel).await;
    let carol = add_resource(&engine, "Carol", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    let alpha = add_team_in(&engine, &callout, "Alpha").await;
    let bravo = add_team_in(&engine, &callout, "Bravo").await;
    engine
        .assign_resource_to_team_in_callout(&callout, &alpha, &alice)
        .await
        .unwrap();
    engine
        .assign_resource_to_team_in_callout(&callout, &bravo, &bob)
        .await
        .unwrap();
    engine
        .assign_resource_to_team_in_callout(&callout, &bravo, &carol)
        .await
        .unwrap();

    let request = MergeTeams {
        first_team_id: alpha.clone(),
        resource_ids: vec![alice.clone(), bob.clone(), carol.clone()],
        all_team_ids: vec![alpha.clone(), bravo.clone()],
    };
    let outcome = engine.merge_teams(&callout, request.clone()).await.unwrap();

    assert_eq!(outcome.callout.callout.team_ids, vec![alpha.clone()]);
    assert_eq!(outcome.callout.teams.len(), 1);
    let mut members = outcome.team.team.assigned_resources.clone();
    members.sort();
    let mut expected = vec![alice.clone(), bob.clone(), carol.clone()];
    expected.sort();
    assert_eq!(members, expected);
    for id in [&alice, &bob, &carol] {
        assert_eq!(stored_resource(&engine, id).await.team_id, Some(alpha.clone()));
    }
    assert!(TeamRepository::get(engine.store(), &bravo).await.unwrap().is_none());

    let replay = engine.merge_teams(&callout, request).await.unwrap();
    assert_eq!(replay.callout.callout.team_ids, vec![alpha]);
}

#[tokio::test]
async fn merge_validates_inputs() {
    let engine = engine();
    let callout = add_callout(&engine, "co").await;
    let request = MergeTeams {
        first_team_id: TeamId::from("t"),
        resource_ids: Vec::new(),
        all_team_ids: Vec::new(),
    };
    let err = engine
        .merge_teams(&callout, request.clone())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    add_team_in(&engine, &callout, "Alpha").await;
    let err = engine.merge_teams(&callout, request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "First team not found");
}

#[tokio::test]
async fn deleting_callout_cascades() {
    let engine = engine();
    let alice = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let kit = add_resource(&engine, "Kit", ResourceType::Equipment).await;
    let driver = add_resource(&engine, "Dan", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    let alpha = add_team_in(&engine, &callout, "Alpha").await;
    let bravo = add_team_in(&engine, &callout, "Bravo").await;
    engine
        .assign_resource_to_callout(&callout, &alice)
        .await
        .unwrap();
    engine
        .assign_resource_to_team_in_callout(&callout, &alpha, &alice)
        .await
        .unwrap();
    engine
        .assign_resource_to_team_in_callout(&callout, &bravo, &kit)
        .await
        .unwrap();
    engine
        .assign_resource_to_callout(&callout, &driver)
        .await
        .unwrap();

    engine.delete_callout(&callout).await.unwrap();

    assert!(CalloutRepository::get(engine.store(), &callout)
        .await
        .unwrap()
        .is_none());
    for team in TeamRepository::list(engine.store()).await.unwrap() {
        assert_ne!(team.callout_id.as_ref(), Some(&callout));
    }
    for id in [&alice, &kit, &driver] {
        let resource = stored_resource(&engine, id).await;
        assert_eq!(resource.team_id, None);
        assert_eq!(resource.status, ResourceStatus::Available);
    }
    assert!(TeamRepository::list(engine.store()).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_resource_scrubs_references() {
    let engine = engine();
    let resource = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    let team = add_team_in(&engine, &callout, "Alpha").await;
    engine
        .assign_resource_to_team_in_callout(&callout, &team, &resource)
        .await
        .unwrap();

    engine.delete_resource(&resource).await.unwrap();

    let callout = engine.get_callout(&callout).await.unwrap();
    assert!(callout.callout.assigned_resources.is_empty());
    assert!(callout.teams[0].team.assigned_resources.is_empty());
    let err = engine.get_resource(&resource).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn resource_filters_match_type_status_and_team() {
    let engine = engine();
    let alice = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    add_resource(&engine, "DM1", ResourceType::Vehicles).await;
    let team = engine
        .create_team(NewTeam::new("Alpha", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;
    engine.assign_resource_to_team(&team, &alice).await.unwrap();
    engine
        .update_resource(
            &alice,
            ResourcePatch {
                status: Some(ResourceStatus::OnCall),
                ..ResourcePatch::default()
            },
        )
        .await
        .unwrap();

    let by_kind = engine
        .list_resources(&ResourceFilter {
            kind: Some(ResourceType::Vehicles),
            ..ResourceFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_kind.len(), 1);

    let by_status = engine
        .list_resources(&ResourceFilter {
            status: Some(ResourceStatus::OnCall),
            ..ResourceFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].resource.id, alice);

    for key in ["Alpha".to_string(), team.to_string()] {
        let by_team = engine
            .list_resources(&ResourceFilter {
                team: Some(key),
                ..ResourceFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_team.len(), 1);
    }
}

#[tokio::test]
async fn deployment_follows_callout_status() {
    let engine = engine();
    let alice = add_resource(&engine, "Alice", ResourceType::Personnel).await;
    let callout = add_callout(&engine, "co").await;
    let team = add_team_in(&engine, &callout, "Alpha").await;
    engine
        .assign_resource_to_team_in_callout(&callout, &team, &alice)
        .await
        .unwrap();

    let view = engine.get_team(&team).await.unwrap();
    assert_eq!(view.status, TeamStatus::Deployed);
    assert_eq!(view.deployed_to, Some(callout.clone()));
    assert!(engine.deployable_teams().await.unwrap().is_empty());
    let deployment = engine.deployment().await.unwrap();
    assert_eq!(deployment.deployed_resources().len(), 1);
    assert_eq!(deployment.resources[0].status, ResourceStatus::InUse);

    engine
        .update_callout(
            &callout,
            CalloutPatch {
                status: Some(CalloutStatus::Closed),
                ..CalloutPatch::default()
            },
        )
        .await
        .unwrap();

    let view = engine.get_team(&team).await.unwrap();
    assert_eq!(view.status, TeamStatus::Available);
    assert_eq!(view.deployed_to, None);
    let deployable = engine.deployable_teams().await.unwrap();
    assert_eq!(deployable.len(), 1);
    assert!(engine.deployment().await.unwrap().deployed_teams().is_empty());
}

#[tokio::test]
async fn deployable_teams_need_personnel() {
    let engine = engine();
    let kit = add_resource(&engine, "Kit", ResourceType::Equipment).await;
    let team = engine
        .create_team(NewTeam::new("Alpha", TeamType::Equipment))
        .await
        .unwrap()
        .team
        .id;
    engine.assign_resource_to_team(&team, &kit).await.unwrap();
    assert!(engine.deployable_teams().await.unwrap().is_empty());
}

#[tokio::test]
async fn linking_teams_moves_them_between_callouts() {
    let engine = engine();
    let first = add_callout(&engine, "first").await;
    let second = add_callout(&engine, "second").await;
    let team = engine
        .create_team(NewTeam::new("Foxtrot", TeamType::Hill))
        .await
        .unwrap()
        .team
        .id;

    let link = engine.link_team_to_callout(&first, &team).await.unwrap();
    assert_eq!(link.team.status, TeamStatus::Deployed);
    assert_eq!(link.callout.teams.len(), 1);

    engine.link_team_to_callout(&second, &team).await.unwrap();
    assert!(engine.get_callout(&first).await.unwrap().teams.is_empty());
    assert_eq!(
        engine.get_team(&team).await.unwrap().deployed_to,
        Some(second.clone())
    );

    let unlinked = engine
        .unlink_team_from_callout(&second, &team)
        .await
        .unwrap();
    assert_eq!(unlinked.team.status, TeamStatus::Available);
    assert_eq!(unlinked.team.team.callout_id, None);
}

#[tokio::test]
async fn scenario_team_deletion_keeps_callout_status() {
    let engine = engine();
    let alice = engine
        .create_resource(NewResource {
            name: "Alice".to_string(),
            kind: ResourceType::Personnel,
            status: None,
            details: ResourceDetails {
                callsign: Some("A1".to_string()),
                ..ResourceDetails::default()
            },
        })
        .await
        .unwrap();
    assert_eq!(alice.resource.status, ResourceStatus::Available);
    let alice = alice.resource.id;

    let callout = add_callout(&engine, "co-1").await;
    let assigned = engine
        .assign_resource_to_callout(&callout, &alice)
        .await
        .unwrap();
    assert_eq!(assigned.callout.callout.assigned_resources, vec![alice.clone()]);
    assert_eq!(assigned.resource.resource.status, ResourceStatus::InUse);

    let team = engine
        .create_team_in_callout(&callout, NewTeam::new("Alpha Hill Team", TeamType::Personnel))
        .await
        .unwrap();
    assert_eq!(team.team.color, "#DC2626");

    let assigned = engine
        .assign_resource_to_team(&team.team.id, &alice)
        .await
        .unwrap();
    assert_eq!(assigned.resource.team.as_deref(), Some("Alpha Hill Team"));

    engine.delete_team(&team.team.id).await.unwrap();
    let resource = stored_resource(&engine, &alice).await;
    assert_eq!(resource.team_id, None);
    assert_eq!(resource.status, ResourceStatus::InUse);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_a_merge_half_applied() {
    let engine = std::sync::Arc::new(engine());
    let callout = add_callout(&engine, "co").await;

    for round in 0..10 {
        let alpha = add_team_in(&engine, &callout, "Alpha").await;
        let bravo = add_team_in(&engine, &callout, "Bravo").await;
        let mut members = Vec::new();
        for index in 0..100 {
            let id = add_resource(&engine, &format!("r{round}-{index}"), ResourceType::Personnel)
                .await;
            engine
                .assign_resource_to_team_in_callout(&callout, &bravo, &id)
                .await
                .unwrap();
            members.push(id);
        }

        let merging = {
            let engine = engine.clone();
            let callout = callout.clone();
            let request = MergeTeams {
                first_team_id: alpha.clone(),
                resource_ids: members,
                all_team_ids: vec![alpha, bravo],
            };
            tokio::spawn(async move { engine.merge_teams(&callout, request).await })
        };

        while !merging.is_finished() {
            let deployment = engine.deployment().await.unwrap();
            for resource in &deployment.resources {
                let Some(team_id) = &resource.team_id else {
                    continue;
                };
                let team = deployment
                    .teams
                    .iter()
                    .find(|view| &view.team.id == team_id)
                    .unwrap_or_else(|| panic!("{} points at a missing team", resource.name));
                assert!(
                    team.team.assigned_resources.contains(&resource.id),
                    "{} not listed by {}",
                    resource.name,
                    team.team.name
                );
            }
            tokio::task::yield_now().await;
        }
        merging.await.unwrap().unwrap();
    }
}
