use sqlx::QueryBuilder;
use time::Date;

use procura_storage::models::Tender;

use crate::{
	ProcuraService, ServiceResult,
	predicate::{QueryPlan, TenderFilter},
};

/// Shared projection for every query that materializes tender headers.
pub(crate) const TENDER_COLUMNS: &str = "t.tender_id, t.ocid, t.title, t.description, t.buyer, \
	t.category, t.procedure_type, t.estimated_amount, t.currency, t.publication_date, \
	t.process_status, t.department, t.province, t.district, t.origin, t.last_updated";

pub(crate) const TENDER_ORDER: &str =
	" ORDER BY t.publication_date DESC NULLS LAST, t.tender_id ASC";

#[derive(Debug, Clone, serde::Serialize)]
pub struct TenderItem {
	pub tender_id: String,
	pub ocid: Option<String>,
	pub title: String,
	pub description: Option<String>,
	pub buyer: Option<String>,
	pub category: Option<String>,
	pub procedure_type: Option<String>,
	pub estimated_amount: Option<f64>,
	pub currency: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub publication_date: Option<Date>,
	pub process_status: Option<String>,
	pub department: Option<String>,
	pub province: Option<String>,
	pub district: Option<String>,
	pub origin: String,
	#[serde(with = "crate::time_serde::option")]
	pub last_updated: Option<Date>,
}
impl From<Tender> for TenderItem {
	fn from(tender: Tender) -> Self {
		Self {
			tender_id: tender.tender_id,
			ocid: tender.ocid,
			title: tender.title,
			description: tender.description,
			buyer: tender.buyer,
			category: tender.category,
			procedure_type: tender.procedure_type,
			estimated_amount: tender.estimated_amount,
			currency: tender.currency,
			publication_date: tender.publication_date,
			process_status: tender.process_status,
			department: tender.department,
			province: tender.province,
			district: tender.district,
			origin: tender.origin,
			last_updated: tender.last_updated,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ListResponse {
	pub items: Vec<TenderItem>,
	pub total: i64,
	pub page: u32,
	pub limit: u32,
	pub total_pages: u32,
}
impl ListResponse {
	pub fn empty(page: u32, limit: u32) -> Self {
		Self { items: Vec::new(), total: 0, page, limit, total_pages: 0 }
	}
}

impl ProcuraService {
	/// Runs the count and page queries for one filter request. The count is
	/// distinct over the tender key so a joined award row never inflates it.
	pub async fn list(
		&self,
		filter: &TenderFilter,
		page: Option<u32>,
		limit: Option<u32>,
	) -> ServiceResult<ListResponse> {
		let page = clamp_page(page);
		let limit = clamp_limit(limit, &self.cfg.pagination);
		let plan = QueryPlan::build(filter);

		let mut count_query = QueryBuilder::new("SELECT COUNT(DISTINCT t.tender_id)");

		plan.push_from(&mut count_query);
		plan.push_where(&mut count_query);

		let total: i64 = count_query.build_query_scalar().fetch_one(&self.db.pool).await?;

		let mut page_query = QueryBuilder::new(format!("SELECT DISTINCT {TENDER_COLUMNS}"));

		plan.push_from(&mut page_query);
		plan.push_where(&mut page_query);
		page_query.push(TENDER_ORDER);
		page_query.push(" LIMIT ");
		page_query.push_bind(i64::from(limit));
		page_query.push(" OFFSET ");
		page_query.push_bind(offset(page, limit));

		let rows: Vec<Tender> = page_query.build_query_as().fetch_all(&self.db.pool).await?;

		tracing::debug!(total, page, limit, join_awards = plan.join_awards(), "Listed tenders.");

		Ok(ListResponse {
			items: rows.into_iter().map(TenderItem::from).collect(),
			total,
			page,
			limit,
			total_pages: total_pages(total, limit),
		})
	}
}

pub fn clamp_page(page: Option<u32>) -> u32 {
	page.unwrap_or(1).max(1)
}

/// Enforces the server-side page-size ceiling regardless of what the caller
/// asked for.
pub fn clamp_limit(limit: Option<u32>, cfg: &procura_config::Pagination) -> u32 {
	limit.unwrap_or(cfg.default_limit).clamp(1, cfg.max_limit)
}

fn offset(page: u32, limit: u32) -> i64 {
	i64::from(page - 1) * i64::from(limit)
}

fn total_pages(total: i64, limit: u32) -> u32 {
	if total <= 0 {
		0
	} else {
		let limit = i64::from(limit);
		((total + limit - 1) / limit) as u32
	}
}
