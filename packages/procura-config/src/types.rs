use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub pagination: Pagination,
	pub suggest: Suggest,
	pub aggregate: Aggregate,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
	pub default_limit: u32,
	/// Server-side ceiling for caller-supplied page sizes.
	pub max_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct Suggest {
	pub min_query_chars: u32,
	pub max_results: u32,
	pub per_source_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct Aggregate {
	/// Upper bound on raw (entity, department) groups fetched per ranking query.
	pub scan_limit: u32,
}
