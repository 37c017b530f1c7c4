use std::collections::HashMap;

use sqlx::QueryBuilder;
use time::Date;

use procura_domain::multi;
use procura_storage::models::{Award, Tender};

use crate::{
	ProcuraService, ServiceError, ServiceResult,
	aggregate::GUARANTOR_SENTINELS,
	detail::AWARD_COLUMNS,
	list::{TENDER_COLUMNS, TENDER_ORDER},
	predicate::{QueryPlan, TenderFilter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
	Csv,
	Excel,
	Pdf,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ExportRequest {
	pub format: ExportFormat,
	#[serde(default)]
	pub ids: Vec<String>,
	#[serde(default)]
	pub all_matches: bool,
	#[serde(default)]
	pub filters: TenderFilter,
}

/// One flattened export record: the header plus the award-side values
/// aggregated into display strings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExportRow {
	pub tender_id: String,
	pub title: String,
	pub buyer: Option<String>,
	pub category: Option<String>,
	pub estimated_amount: Option<f64>,
	#[serde(with = "crate::time_serde::option")]
	pub publication_date: Option<Date>,
	pub process_status: Option<String>,
	pub department: Option<String>,
	pub province: Option<String>,
	pub district: Option<String>,
	pub origin: String,
	pub winners: String,
	pub guarantee_types: String,
	pub financial_entities: String,
	pub awarded_amount: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ExportResponse {
	pub format: ExportFormat,
	pub rows: Vec<ExportRow>,
}

impl ProcuraService {
	/// Selects and flattens the rows for one export request. Rendering to
	/// csv/excel/pdf happens downstream; this validates the selection and
	/// returns the row set with the requested format tag.
	pub async fn export(&self, req: &ExportRequest) -> ServiceResult<ExportResponse> {
		if !req.all_matches && req.ids.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "export requires explicit ids or all_matches.".to_string(),
			});
		}

		let tenders: Vec<Tender> = if req.all_matches {
			let plan = QueryPlan::build(&req.filters);
			let mut query = QueryBuilder::new(format!("SELECT DISTINCT {TENDER_COLUMNS}"));

			plan.push_from(&mut query);
			plan.push_where(&mut query);
			query.push(TENDER_ORDER);

			query.build_query_as().fetch_all(&self.db.pool).await?
		} else {
			let sql = format!(
				"SELECT {TENDER_COLUMNS} FROM tenders t WHERE t.tender_id = ANY($1){TENDER_ORDER}"
			);

			sqlx::query_as(&sql).bind(&req.ids).fetch_all(&self.db.pool).await?
		};
		let tender_ids = tenders.iter().map(|tender| tender.tender_id.clone()).collect::<Vec<_>>();
		let mut awards_by_tender: HashMap<String, Vec<Award>> = HashMap::new();

		if !tender_ids.is_empty() {
			let sql = format!(
				"SELECT {AWARD_COLUMNS} FROM awards WHERE tender_id = ANY($1) ORDER BY award_id"
			);
			let awards: Vec<Award> =
				sqlx::query_as(&sql).bind(&tender_ids).fetch_all(&self.db.pool).await?;

			for award in awards {
				awards_by_tender.entry(award.tender_id.clone()).or_default().push(award);
			}
		}

		let rows = tenders
			.iter()
			.map(|tender| {
				let awards =
					awards_by_tender.get(&tender.tender_id).map(Vec::as_slice).unwrap_or(&[]);

				flatten_row(tender, awards)
			})
			.collect::<Vec<_>>();

		tracing::debug!(rows = rows.len(), format = ?req.format, "Prepared export rows.");

		Ok(ExportResponse { format: req.format, rows })
	}
}

pub(crate) fn flatten_row(tender: &Tender, awards: &[Award]) -> ExportRow {
	let winners = joined_distinct(awards.iter().filter_map(|award| award.winner_name.clone()));
	let guarantee_types = joined_distinct(
		awards
			.iter()
			.filter_map(|award| award.guarantee_type.as_deref())
			.flat_map(multi::split_values),
	);
	let financial_entities = joined_distinct(
		awards
			.iter()
			.filter_map(|award| award.financial_entity.as_deref())
			.flat_map(multi::split_values)
			.filter(|value| !GUARANTOR_SENTINELS.contains(&value.as_str())),
	);
	let awarded_amount = awards.iter().filter_map(|award| award.awarded_amount).sum();

	ExportRow {
		tender_id: tender.tender_id.clone(),
		title: tender.title.clone(),
		buyer: tender.buyer.clone(),
		category: tender.category.clone(),
		estimated_amount: tender.estimated_amount,
		publication_date: tender.publication_date,
		process_status: tender.process_status.clone(),
		department: tender.department.clone(),
		province: tender.province.clone(),
		district: tender.district.clone(),
		origin: tender.origin.clone(),
		winners,
		guarantee_types,
		financial_entities,
		awarded_amount,
	}
}

fn joined_distinct<I>(values: I) -> String
where
	I: IntoIterator<Item = String>,
{
	let mut seen: Vec<String> = Vec::new();

	for value in values {
		let value = value.trim().to_string();

		if !value.is_empty() && !seen.contains(&value) {
			seen.push(value);
		}
	}

	seen.join(", ")
}
