pub mod aggregate;
pub mod detail;
pub mod export;
pub mod filters;
pub mod list;
pub mod locations;
pub mod predicate;
pub mod suggest;
pub mod time_serde;
pub mod write;

use procura_config::Config;
use procura_domain::alias::AliasTable;
use procura_storage::db::Db;

pub use aggregate::{EntityRanking, LocationRanking};
pub use detail::{AwardDetail, MemberDetail, TenderDetail};
pub use export::{ExportFormat, ExportRequest, ExportResponse, ExportRow};
pub use filters::FilterOptions;
pub use list::{ListResponse, TenderItem, clamp_limit, clamp_page};
pub use locations::LocationList;
pub use predicate::{QueryPlan, TenderFilter};
pub use suggest::Suggestion;
pub use write::{AwardWriteRequest, TenderWriteRequest};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
	NotFound { tender_id: String },
	InvalidRequest { message: String },
	Storage { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotFound { tender_id } => write!(f, "Tender {tender_id} not found."),
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<procura_storage::Error> for ServiceError {
	fn from(err: procura_storage::Error) -> Self {
		match err {
			procura_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

pub struct ProcuraService {
	pub cfg: Config,
	pub db: Db,
	pub alias: AliasTable,
}
impl ProcuraService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_alias_table(cfg, db, AliasTable::builtin())
	}

	pub fn with_alias_table(cfg: Config, db: Db, alias: AliasTable) -> Self {
		Self { cfg, db, alias }
	}
}
