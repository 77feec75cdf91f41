use std::sync::Arc;

use redis::aio::ConnectionManager;
use tokio::sync::RwLock;

use super::{catalog::Catalog, config::Config, draft::init_redis};

pub struct State {
    pub config: Config,
    pub catalog: RwLock<Catalog>,
    pub redis_connection: ConnectionManager,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let catalog = RwLock::new(Catalog::seed());
        let redis_connection = init_redis(&config.redis_url).await;

        Arc::new(Self {
            config,
            catalog,
            redis_connection,
        })
    }
}
