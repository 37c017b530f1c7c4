use time::Date;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tender {
	pub tender_id: String,
	pub ocid: Option<String>,
	pub title: String,
	pub description: Option<String>,
	pub buyer: Option<String>,
	pub category: Option<String>,
	pub procedure_type: Option<String>,
	pub estimated_amount: Option<f64>,
	pub currency: Option<String>,
	pub publication_date: Option<Date>,
	pub process_status: Option<String>,
	pub department: Option<String>,
	pub province: Option<String>,
	pub district: Option<String>,
	pub origin: String,
	pub last_updated: Option<Date>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Award {
	pub award_id: String,
	pub tender_id: String,
	pub winner_name: Option<String>,
	pub winner_tax_id: Option<String>,
	pub awarded_amount: Option<f64>,
	pub award_date: Option<Date>,
	pub item_status: Option<String>,
	pub financial_entity: Option<String>,
	pub guarantee_type: Option<String>,
	pub contract_id: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConsortiumMember {
	pub member_id: String,
	pub contract_id: String,
	pub member_name: Option<String>,
	pub member_tax_id: Option<String>,
	pub share_pct: Option<f64>,
}
