use std::collections::HashSet;

use sqlx::{Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use procura_domain::origin::Origin;

use crate::{ProcuraService, ServiceError, ServiceResult, detail::TenderDetail};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AwardWriteRequest {
	pub award_id: Option<String>,
	pub winner_name: Option<String>,
	pub winner_tax_id: Option<String>,
	pub awarded_amount: Option<f64>,
	#[serde(default, with = "crate::time_serde::option")]
	pub award_date: Option<Date>,
	pub item_status: Option<String>,
	pub financial_entity: Option<String>,
	pub guarantee_type: Option<String>,
	pub contract_id: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TenderWriteRequest {
	pub title: String,
	pub ocid: Option<String>,
	pub description: Option<String>,
	pub buyer: Option<String>,
	pub category: Option<String>,
	pub procedure_type: Option<String>,
	pub estimated_amount: Option<f64>,
	pub currency: Option<String>,
	#[serde(default, with = "crate::time_serde::option")]
	pub publication_date: Option<Date>,
	pub process_status: Option<String>,
	pub department: Option<String>,
	pub province: Option<String>,
	pub district: Option<String>,
	#[serde(default)]
	pub awards: Vec<AwardWriteRequest>,
}

impl ProcuraService {
	/// Inserts a new tender and its awards in one transaction. The id is
	/// generated here and the origin stored explicitly as `manual`.
	pub async fn create(&self, req: TenderWriteRequest) -> ServiceResult<TenderDetail> {
		validate(&req)?;

		let tender_id = Uuid::new_v4().to_string();
		let today = OffsetDateTime::now_utc().date();
		let mut tx = self.db.pool.begin().await?;

		sqlx::query(
			"INSERT INTO tenders (tender_id, ocid, title, description, buyer, category, \
			 procedure_type, estimated_amount, currency, publication_date, process_status, \
			 department, province, district, origin, last_updated) \
			 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
		)
		.bind(&tender_id)
		.bind(&req.ocid)
		.bind(&req.title)
		.bind(&req.description)
		.bind(&req.buyer)
		.bind(&req.category)
		.bind(&req.procedure_type)
		.bind(req.estimated_amount)
		.bind(&req.currency)
		.bind(req.publication_date)
		.bind(&req.process_status)
		.bind(&req.department)
		.bind(&req.province)
		.bind(&req.district)
		.bind(Origin::Manual.as_str())
		.bind(today)
		.execute(&mut *tx)
		.await?;

		insert_awards(&mut tx, &tender_id, &req.awards).await?;
		tx.commit().await?;
		tracing::info!(%tender_id, awards = req.awards.len(), "Created tender.");

		self.get(&tender_id).await
	}

	/// Replaces the header fields and the whole award set. The delete and
	/// re-insert run in one transaction so a crash can never leave the
	/// tender with a partial award list.
	pub async fn update(&self, tender_id: &str, req: TenderWriteRequest) -> ServiceResult<TenderDetail> {
		validate(&req)?;

		let today = OffsetDateTime::now_utc().date();
		let mut tx = self.db.pool.begin().await?;
		let existing: Option<String> =
			sqlx::query_scalar("SELECT tender_id FROM tenders WHERE tender_id = $1")
				.bind(tender_id)
				.fetch_optional(&mut *tx)
				.await?;

		if existing.is_none() {
			return Err(ServiceError::NotFound { tender_id: tender_id.to_string() });
		}

		sqlx::query(
			"UPDATE tenders SET ocid = $2, title = $3, description = $4, buyer = $5, \
			 category = $6, procedure_type = $7, estimated_amount = $8, currency = $9, \
			 publication_date = $10, process_status = $11, department = $12, province = $13, \
			 district = $14, last_updated = $15 WHERE tender_id = $1",
		)
		.bind(tender_id)
		.bind(&req.ocid)
		.bind(&req.title)
		.bind(&req.description)
		.bind(&req.buyer)
		.bind(&req.category)
		.bind(&req.procedure_type)
		.bind(req.estimated_amount)
		.bind(&req.currency)
		.bind(req.publication_date)
		.bind(&req.process_status)
		.bind(&req.department)
		.bind(&req.province)
		.bind(&req.district)
		.bind(today)
		.execute(&mut *tx)
		.await?;
		sqlx::query("DELETE FROM awards WHERE tender_id = $1")
			.bind(tender_id)
			.execute(&mut *tx)
			.await?;
		insert_awards(&mut tx, tender_id, &req.awards).await?;
		tx.commit().await?;
		tracing::info!(%tender_id, awards = req.awards.len(), "Replaced tender.");

		self.get(tender_id).await
	}

	/// Deleting the header cascades to its awards.
	pub async fn delete(&self, tender_id: &str) -> ServiceResult<()> {
		let result = sqlx::query("DELETE FROM tenders WHERE tender_id = $1")
			.bind(tender_id)
			.execute(&self.db.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(ServiceError::NotFound { tender_id: tender_id.to_string() });
		}

		tracing::info!(%tender_id, "Deleted tender.");

		Ok(())
	}
}

/// Validates the whole request, awards included, before any row is written.
fn validate(req: &TenderWriteRequest) -> ServiceResult<()> {
	if req.title.trim().is_empty() {
		return Err(ServiceError::InvalidRequest { message: "title must be non-empty.".to_string() });
	}
	if let Some(amount) = req.estimated_amount
		&& amount < 0.0
	{
		return Err(ServiceError::InvalidRequest {
			message: "estimated_amount must not be negative.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for (index, award) in req.awards.iter().enumerate() {
		if let Some(amount) = award.awarded_amount
			&& amount < 0.0
		{
			return Err(ServiceError::InvalidRequest {
				message: format!("awards[{index}].awarded_amount must not be negative."),
			});
		}
		if let Some(id) = award.award_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
			&& !seen.insert(id.to_string())
		{
			return Err(ServiceError::InvalidRequest {
				message: format!("awards[{index}].award_id {id} appears more than once."),
			});
		}
	}

	Ok(())
}

async fn insert_awards(
	tx: &mut Transaction<'_, Postgres>,
	tender_id: &str,
	awards: &[AwardWriteRequest],
) -> ServiceResult<()> {
	for (index, award) in awards.iter().enumerate() {
		let award_id = award
			.award_id
			.as_deref()
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.map(str::to_string)
			.unwrap_or_else(|| format!("{tender_id}-{}", index + 1));

		sqlx::query(
			"INSERT INTO awards (award_id, tender_id, winner_name, winner_tax_id, \
			 awarded_amount, award_date, item_status, financial_entity, guarantee_type, \
			 contract_id) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
		)
		.bind(&award_id)
		.bind(tender_id)
		.bind(&award.winner_name)
		.bind(&award.winner_tax_id)
		.bind(award.awarded_amount)
		.bind(award.award_date)
		.bind(&award.item_status)
		.bind(&award.financial_entity)
		.bind(&award.guarantee_type)
		.bind(&award.contract_id)
		.execute(&mut **tx)
		.await?;
	}

	Ok(())
}
