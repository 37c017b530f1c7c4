mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Aggregate, Config, Pagination, Postgres, Service, Storage, Suggest};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.pagination.default_limit == 0 {
		return Err(Error::Validation {
			message: "pagination.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.pagination.max_limit < cfg.pagination.default_limit {
		return Err(Error::Validation {
			message: "pagination.max_limit must be at least pagination.default_limit.".to_string(),
		});
	}
	if cfg.pagination.max_limit > 1_000 {
		return Err(Error::Validation {
			message: "pagination.max_limit must be 1000 or less.".to_string(),
		});
	}
	if cfg.suggest.min_query_chars == 0 {
		return Err(Error::Validation {
			message: "suggest.min_query_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.max_results == 0 {
		return Err(Error::Validation {
			message: "suggest.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.per_source_limit == 0 {
		return Err(Error::Validation {
			message: "suggest.per_source_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.aggregate.scan_limit == 0 {
		return Err(Error::Validation {
			message: "aggregate.scan_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
