use std::collections::HashMap;

use time::Date;

use procura_storage::models::{Award, ConsortiumMember, Tender};

use crate::{
	ProcuraService, ServiceError, ServiceResult,
	list::{TENDER_COLUMNS, TenderItem},
};

pub(crate) const AWARD_COLUMNS: &str = "award_id, tender_id, winner_name, winner_tax_id, \
	awarded_amount, award_date, item_status, financial_entity, guarantee_type, contract_id";

#[derive(Debug, Clone, serde::Serialize)]
pub struct MemberDetail {
	pub member_id: String,
	pub member_name: Option<String>,
	pub member_tax_id: Option<String>,
	pub share_pct: Option<f64>,
}
impl From<ConsortiumMember> for MemberDetail {
	fn from(member: ConsortiumMember) -> Self {
		Self {
			member_id: member.member_id,
			member_name: member.member_name,
			member_tax_id: member.member_tax_id,
			share_pct: member.share_pct,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AwardDetail {
	pub award_id: String,
	pub winner_name: Option<String>,
	pub winner_tax_id: Option<String>,
	pub awarded_amount: Option<f64>,
	#[serde(with = "crate::time_serde::option")]
	pub award_date: Option<Date>,
	pub item_status: Option<String>,
	pub financial_entity: Option<String>,
	pub guarantee_type: Option<String>,
	pub contract_id: Option<String>,
	pub members: Vec<MemberDetail>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TenderDetail {
	#[serde(flatten)]
	pub tender: TenderItem,
	pub awards: Vec<AwardDetail>,
}

impl ProcuraService {
	/// Fetches one tender with its full award list and any consortium
	/// members reachable through an award's contract id.
	pub async fn get(&self, tender_id: &str) -> ServiceResult<TenderDetail> {
		let sql = format!("SELECT {TENDER_COLUMNS} FROM tenders t WHERE t.tender_id = $1");
		let tender: Option<Tender> =
			sqlx::query_as(&sql).bind(tender_id).fetch_optional(&self.db.pool).await?;
		let Some(tender) = tender else {
			return Err(ServiceError::NotFound { tender_id: tender_id.to_string() });
		};

		let sql = format!("SELECT {AWARD_COLUMNS} FROM awards WHERE tender_id = $1 ORDER BY award_id");
		let awards: Vec<Award> =
			sqlx::query_as(&sql).bind(tender_id).fetch_all(&self.db.pool).await?;
		let contract_ids = awards
			.iter()
			.filter_map(|award| award.contract_id.clone())
			.filter(|id| !id.trim().is_empty())
			.collect::<Vec<_>>();
		let mut members_by_contract: HashMap<String, Vec<MemberDetail>> = HashMap::new();

		if !contract_ids.is_empty() {
			let members: Vec<ConsortiumMember> = sqlx::query_as(
				"SELECT member_id, contract_id, member_name, member_tax_id, share_pct \
				 FROM consortium_members WHERE contract_id = ANY($1) ORDER BY member_id",
			)
			.bind(&contract_ids)
			.fetch_all(&self.db.pool)
			.await?;

			for member in members {
				members_by_contract
					.entry(member.contract_id.clone())
					.or_default()
					.push(member.into());
			}
		}

		let awards = awards
			.into_iter()
			.map(|award| {
				let members = award
					.contract_id
					.as_deref()
					.and_then(|id| members_by_contract.get(id).cloned())
					.unwrap_or_default();

				AwardDetail {
					award_id: award.award_id,
					winner_name: award.winner_name,
					winner_tax_id: award.winner_tax_id,
					awarded_amount: award.awarded_amount,
					award_date: award.award_date,
					item_status: award.item_status,
					financial_entity: award.financial_entity,
					guarantee_type: award.guarantee_type,
					contract_id: award.contract_id,
					members,
				}
			})
			.collect();

		Ok(TenderDetail { tender: tender.into(), awards })
	}
}
