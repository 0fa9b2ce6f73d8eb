pub mod callout_teams;
pub mod callouts;
pub mod common;
pub mod health;
pub mod lookups;
pub mod resources;
pub mod status;
pub mod teams;


use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(status::status)
        .service(resources::list_resources)
        .service(resources::create_resource)
        .service(resources::get_resource)
        .service(resources::update_resource)
        .service(resources::delete_resource)
        .service(callouts::list_callouts)
        .service(callouts::create_callout)
        .service(callouts::get_callout)
        .service(callouts::update_callout)
        .service(callouts::delete_callout)
        .service(callouts::assign_resource)
        .service(callouts::unassign_resource)
        .service(callouts::assign_team)
        .service(callouts::unassign_team)
        .service(callout_teams::create_team)
        .service(callout_teams::delete_team)
        .service(callout_teams::assign_resource)
        .service(callout_teams::unassign_resource)
        .service(callout_teams::merge_teams)
        .service(teams::list_teams)
        .service(teams::create_team)
        .service(teams::get_team)
        .service(teams::rename_team)
        .service(teams::delete_team)
        .service(teams::assign_resource)
        .service(teams::unassign_resource)
        .service(lookups::available_vehicles)
        .service(lookups::deployable_teams)
        .service(lookups::deployment);
}
