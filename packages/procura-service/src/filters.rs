use std::collections::BTreeSet;

use time::OffsetDateTime;

use procura_domain::{alias::AliasTable, multi};

use crate::{ProcuraService, ServiceResult, aggregate::GUARANTOR_SENTINELS, predicate::upper_trim};

/// Defaults keep the filter UI usable while the store is still empty.
const DEFAULT_DEPARTMENTS: &[&str] = &[
	"AMAZONAS",
	"ANCASH",
	"APURIMAC",
	"AREQUIPA",
	"AYACUCHO",
	"CAJAMARCA",
	"CALLAO",
	"CUSCO",
	"HUANCAVELICA",
	"HUANUCO",
	"ICA",
	"JUNIN",
	"LA LIBERTAD",
	"LAMBAYEQUE",
	"LIMA",
	"LORETO",
	"MADRE DE DIOS",
	"MOQUEGUA",
	"PASCO",
	"PIURA",
	"PUNO",
	"SAN MARTIN",
	"TACNA",
	"TUMBES",
	"UCAYALI",
];
const DEFAULT_STATUSES: &[&str] =
	&["ADJUDICADO", "CANCELADO", "CONSENTIDO", "CONTRATADO", "CONVOCADO", "DESIERTO", "NULO"];
const DEFAULT_CATEGORIES: &[&str] = &["consulting", "goods", "services", "works"];
const DEFAULT_BUYERS: &[&str] = &[
	"GOBIERNO REGIONAL DE LIMA",
	"MINISTERIO DE EDUCACION",
	"MINISTERIO DE SALUD",
	"MINISTERIO DE TRANSPORTES Y COMUNICACIONES",
	"MUNICIPALIDAD METROPOLITANA DE LIMA",
];
const DEFAULT_GUARANTEE_TYPES: &[&str] =
	&["CARTA FIANZA", "DEPOSITO EN GARANTIA", "POLIZA DE CAUCION", "RETENCION"];
const FIRST_FEED_YEAR: i32 = 2019;
const BUYER_LIMIT: i64 = 100;

#[derive(Debug, Clone, serde::Serialize)]
pub struct FilterOptions {
	pub departments: Vec<String>,
	pub statuses: Vec<String>,
	pub categories: Vec<String>,
	pub years: Vec<i32>,
	pub buyers: Vec<String>,
	pub guarantee_types: Vec<String>,
	pub financial_entities: Vec<String>,
}

impl ProcuraService {
	/// Distinct values per filterable dimension. Any dimension the store
	/// cannot answer falls back to its hardcoded default list.
	pub async fn filter_options(&self) -> ServiceResult<FilterOptions> {
		let departments: Vec<String> = sqlx::query_scalar(
			"SELECT DISTINCT UPPER(TRIM(department)) FROM tenders \
			 WHERE department IS NOT NULL AND TRIM(department) <> '' ORDER BY 1",
		)
		.fetch_all(&self.db.pool)
		.await?;
		let statuses: Vec<String> = sqlx::query_scalar(
			"SELECT DISTINCT process_status FROM tenders \
			 WHERE process_status IS NOT NULL AND TRIM(process_status) <> '' ORDER BY 1",
		)
		.fetch_all(&self.db.pool)
		.await?;
		let categories: Vec<String> = sqlx::query_scalar(
			"SELECT DISTINCT category FROM tenders \
			 WHERE category IS NOT NULL AND TRIM(category) <> '' ORDER BY 1",
		)
		.fetch_all(&self.db.pool)
		.await?;
		let years: Vec<i32> = sqlx::query_scalar(
			"SELECT DISTINCT EXTRACT(YEAR FROM publication_date)::INT FROM tenders \
			 WHERE publication_date IS NOT NULL ORDER BY 1 DESC",
		)
		.fetch_all(&self.db.pool)
		.await?;
		let buyers: Vec<String> = sqlx::query_scalar(
			"SELECT TRIM(buyer) FROM tenders WHERE buyer IS NOT NULL AND TRIM(buyer) <> '' \
			 GROUP BY TRIM(buyer) ORDER BY COUNT(*) DESC, TRIM(buyer) ASC LIMIT $1",
		)
		.bind(BUYER_LIMIT)
		.fetch_all(&self.db.pool)
		.await?;
		let guarantee_raw: Vec<String> = sqlx::query_scalar(
			"SELECT DISTINCT guarantee_type FROM awards \
			 WHERE guarantee_type IS NOT NULL AND TRIM(guarantee_type) <> '' ORDER BY 1",
		)
		.fetch_all(&self.db.pool)
		.await?;
		let entity_raw: Vec<String> = sqlx::query_scalar(
			"SELECT DISTINCT financial_entity FROM awards \
			 WHERE financial_entity IS NOT NULL AND TRIM(financial_entity) <> '' \
			 AND financial_entity <> $1 AND financial_entity <> $2 ORDER BY 1",
		)
		.bind(GUARANTOR_SENTINELS[0])
		.bind(GUARANTOR_SENTINELS[1])
		.fetch_all(&self.db.pool)
		.await?;

		let financial_entities = canonical_entities(entity_raw, &self.alias);

		Ok(FilterOptions {
			departments: or_default(departments, DEFAULT_DEPARTMENTS),
			statuses: or_default(statuses, DEFAULT_STATUSES),
			categories: or_default(categories, DEFAULT_CATEGORIES),
			years: if years.is_empty() { default_years() } else { years },
			buyers: or_default(buyers, DEFAULT_BUYERS),
			guarantee_types: or_default(split_guarantee_types(guarantee_raw), DEFAULT_GUARANTEE_TYPES),
			financial_entities: if financial_entities.is_empty() {
				self.alias.canonical_names()
			} else {
				financial_entities
			},
		})
	}

	/// The all-defaults document, served when the store cannot be reached.
	pub fn fallback_filter_options(&self) -> FilterOptions {
		FilterOptions {
			departments: to_owned(DEFAULT_DEPARTMENTS),
			statuses: to_owned(DEFAULT_STATUSES),
			categories: to_owned(DEFAULT_CATEGORIES),
			years: default_years(),
			buyers: to_owned(DEFAULT_BUYERS),
			guarantee_types: to_owned(DEFAULT_GUARANTEE_TYPES),
			financial_entities: self.alias.canonical_names(),
		}
	}
}

fn or_default(values: Vec<String>, fallback: &[&str]) -> Vec<String> {
	if values.is_empty() { to_owned(fallback) } else { values }
}

fn to_owned(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| value.to_string()).collect()
}

fn default_years() -> Vec<i32> {
	let current = OffsetDateTime::now_utc().year();

	(FIRST_FEED_YEAR..=current).rev().collect()
}

/// Consortium rows carry several guarantee types in one column; the option
/// list shows each one once.
fn split_guarantee_types(raw: Vec<String>) -> Vec<String> {
	raw.iter()
		.flat_map(|value| multi::split_values(value))
		.map(|value| upper_trim(&value))
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

fn canonical_entities(raw: Vec<String>, alias: &AliasTable) -> Vec<String> {
	raw.iter()
		.map(|value| alias.normalize(value))
		.filter(|value| !value.is_empty())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}
