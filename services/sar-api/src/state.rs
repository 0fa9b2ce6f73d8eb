use sar_config::ServiceConfig;
use sar_engine::AssignmentEngine;
use sar_storage_memory::MemoryStore;

pub struct AppState {
    pub config: ServiceConfig,
    pub engine: AssignmentEngine<MemoryStore>,
}

impl AppState {
    pub fn new(config: ServiceConfig, store: MemoryStore) -> Self {
        Self {
            config,
            engine: AssignmentEngine::new(store),
        }
    }
}
