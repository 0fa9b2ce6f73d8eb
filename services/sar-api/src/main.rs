mod routes;
mod state;

use actix_web::{web, App, HttpServer};
use sar_config::ServiceConfig;
use sar_observability::{init, log_startup, ObservabilityConfig};
use sar_storage_memory::{MemoryStore, SeedData};
use std::io;
use tracing::error;

use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ServiceConfig::from_env("sar-api");
    let handle = init(&ObservabilityConfig::from(&config));
    log_startup(&handle);

    let store = match config.seed_file.as_deref() {
        Some(path) => match SeedData::from_path(path) {
            Ok(seed) => MemoryStore::with_seed(seed),
            Err(err) => {
                error!(path, error = %err, "Failed to load seed data");
                return Err(io::Error::other(err.to_string()));
            }
        },
        None => MemoryStore::new(),
    };

    let bind_addr = config.bind_addr.clone();
    let state = web::Data::new(AppState::new(config, store));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(routes::common::json_config())
            .app_data(routes::common::query_config())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
