use std::sync::Arc;

use procura_service::ProcuraService;
use procura_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ProcuraService>,
}
impl AppState {
	pub async fn new(config: procura_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = ProcuraService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
