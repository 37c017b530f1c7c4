use sqlx::{Postgres, QueryBuilder};
use time::Date;

use procura_domain::origin::Origin;

/// Header columns scanned by the free-text criterion.
const SEARCH_HEADER_COLUMNS: &[&str] = &[
	"t.tender_id",
	"t.ocid",
	"t.title",
	"t.description",
	"t.buyer",
	"t.category",
	"t.procedure_type",
	"t.process_status",
	"t.department",
	"t.province",
	"t.district",
	"t.currency",
];
/// Award columns scanned by the free-text criterion.
const SEARCH_AWARD_COLUMNS: &[&str] = &[
	"a.award_id",
	"a.contract_id",
	"a.winner_name",
	"a.winner_tax_id",
	"a.financial_entity",
	"a.guarantee_type",
	"a.item_status",
];

/// The full optional-filter surface of the list, export, and count queries.
/// Blank strings are treated as absent. Unknown origin labels are ignored.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TenderFilter {
	pub search: Option<String>,
	pub status: Option<String>,
	pub category: Option<String>,
	pub buyer: Option<String>,
	pub department: Option<String>,
	pub province: Option<String>,
	pub district: Option<String>,
	pub year: Option<i32>,
	pub month: Option<i32>,
	pub origin: Option<String>,
	pub winner_tax_id: Option<String>,
	pub financial_entity: Option<String>,
	pub guarantee_type: Option<String>,
	#[serde(default, with = "crate::time_serde::option")]
	pub awarded_from: Option<Date>,
	#[serde(default, with = "crate::time_serde::option")]
	pub awarded_to: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationColumn {
	Department,
	Province,
	District,
}
impl LocationColumn {
	fn qualified(self) -> &'static str {
		match self {
			Self::Department => "t.department",
			Self::Province => "t.province",
			Self::District => "t.district",
		}
	}
}

/// One typed WHERE fragment. Every value renders through `push_bind`; the
/// clause text never embeds caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
	Search { term: String },
	StatusIs { value: String },
	CategoryIs { value: String },
	BuyerIs { value: String },
	LocationIs { column: LocationColumn, value: String },
	PublicationYear { year: i32 },
	PublicationMonth { month: i32 },
	OriginIs { origin: Origin },
	WinnerTaxIdIs { value: String },
	FinancialEntityContains { value: String },
	GuaranteeTypeContains { value: String },
	AwardedOnOrAfter { date: Date },
	AwardedOnOrBefore { date: Date },
}
impl Predicate {
	pub fn needs_award_join(&self) -> bool {
		matches!(
			self,
			Self::Search { .. }
				| Self::WinnerTaxIdIs { .. }
				| Self::FinancialEntityContains { .. }
				| Self::GuaranteeTypeContains { .. }
				| Self::AwardedOnOrAfter { .. }
				| Self::AwardedOnOrBefore { .. }
		)
	}

	fn push_clause(&self, builder: &mut QueryBuilder<'_, Postgres>) {
		match self {
			Self::Search { term } => {
				let pattern = like_pattern(term);

				builder.push("(");

				for (index, column) in
					SEARCH_HEADER_COLUMNS.iter().chain(SEARCH_AWARD_COLUMNS).enumerate()
				{
					if index > 0 {
						builder.push(" OR ");
					}

					builder.push(*column);
					builder.push(" ILIKE ");
					builder.push_bind(pattern.clone());
				}

				builder.push(")");
			},
			Self::StatusIs { value } => {
				builder.push("t.process_status = ");
				builder.push_bind(value.clone());
			},
			Self::CategoryIs { value } => {
				builder.push("t.category = ");
				builder.push_bind(value.clone());
			},
			Self::BuyerIs { value } => {
				builder.push("UPPER(TRIM(t.buyer)) = ");
				builder.push_bind(upper_trim(value));
			},
			Self::LocationIs { column, value } => {
				builder.push("UPPER(TRIM(");
				builder.push(column.qualified());
				builder.push(")) = ");
				builder.push_bind(upper_trim(value));
			},
			Self::PublicationYear { year } => {
				builder.push("EXTRACT(YEAR FROM t.publication_date)::INT = ");
				builder.push_bind(*year);
			},
			Self::PublicationMonth { month } => {
				builder.push("EXTRACT(MONTH FROM t.publication_date)::INT = ");
				builder.push_bind(*month);
			},
			Self::OriginIs { origin } => {
				builder.push("t.origin = ");
				builder.push_bind(origin.as_str());
			},
			Self::WinnerTaxIdIs { value } => {
				builder.push("a.winner_tax_id = ");
				builder.push_bind(value.clone());
			},
			Self::FinancialEntityContains { value } => {
				builder.push("a.financial_entity ILIKE ");
				builder.push_bind(like_pattern(value));
			},
			Self::GuaranteeTypeContains { value } => {
				builder.push("a.guarantee_type ILIKE ");
				builder.push_bind(like_pattern(value));
			},
			Self::AwardedOnOrAfter { date } => {
				builder.push("a.award_date >= ");
				builder.push_bind(*date);
			},
			Self::AwardedOnOrBefore { date } => {
				builder.push("a.award_date <= ");
				builder.push_bind(*date);
			},
		}
	}
}

/// The intermediate representation between a filter request and SQL: an
/// ordered predicate list plus one idempotent award-join flag.
#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
	predicates: Vec<Predicate>,
	join_awards: bool,
}
impl QueryPlan {
	pub fn build(filter: &TenderFilter) -> Self {
		let mut predicates = Vec::new();

		if let Some(term) = present(&filter.search) {
			predicates.push(Predicate::Search { term });
		}
		if let Some(value) = present(&filter.status) {
			predicates.push(Predicate::StatusIs { value });
		}
		if let Some(value) = present(&filter.category) {
			predicates.push(Predicate::CategoryIs { value });
		}
		if let Some(value) = present(&filter.buyer) {
			predicates.push(Predicate::BuyerIs { value });
		}
		if let Some(value) = present(&filter.department) {
			predicates.push(Predicate::LocationIs { column: LocationColumn::Department, value });
		}
		if let Some(value) = present(&filter.province) {
			predicates.push(Predicate::LocationIs { column: LocationColumn::Province, value });
		}
		if let Some(value) = present(&filter.district) {
			predicates.push(Predicate::LocationIs { column: LocationColumn::District, value });
		}
		if let Some(year) = filter.year {
			predicates.push(Predicate::PublicationYear { year });
		}
		if let Some(month) = filter.month {
			predicates.push(Predicate::PublicationMonth { month });
		}
		if let Some(raw) = present(&filter.origin)
			&& let Some(origin) = Origin::parse(&raw)
		{
			predicates.push(Predicate::OriginIs { origin });
		}
		if let Some(value) = present(&filter.winner_tax_id) {
			predicates.push(Predicate::WinnerTaxIdIs { value });
		}
		if let Some(value) = present(&filter.financial_entity) {
			predicates.push(Predicate::FinancialEntityContains { value });
		}
		if let Some(value) = present(&filter.guarantee_type) {
			predicates.push(Predicate::GuaranteeTypeContains { value });
		}
		if let Some(date) = filter.awarded_from {
			predicates.push(Predicate::AwardedOnOrAfter { date });
		}
		if let Some(date) = filter.awarded_to {
			predicates.push(Predicate::AwardedOnOrBefore { date });
		}

		// One flag no matter how many predicates touch the award relation.
		let join_awards = predicates.iter().any(Predicate::needs_award_join);

		Self { predicates, join_awards }
	}

	pub fn join_awards(&self) -> bool {
		self.join_awards
	}

	pub fn is_unfiltered(&self) -> bool {
		self.predicates.is_empty()
	}

	pub fn predicates(&self) -> &[Predicate] {
		&self.predicates
	}

	/// Renders the FROM clause. The award relation joins at most once; a
	/// LEFT JOIN keeps tenders without awards visible to header-side search.
	pub fn push_from(&self, builder: &mut QueryBuilder<'_, Postgres>) {
		builder.push(" FROM tenders t");

		if self.join_awards {
			builder.push(" LEFT JOIN awards a ON a.tender_id = t.tender_id");
		}
	}

	pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
		for (index, predicate) in self.predicates.iter().enumerate() {
			builder.push(if index == 0 { " WHERE " } else { " AND " });
			predicate.push_clause(builder);
		}
	}
}

fn present(value: &Option<String>) -> Option<String> {
	value.as_deref().map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

pub(crate) fn upper_trim(value: &str) -> String {
	value.trim().to_uppercase()
}

/// Wraps a term in `%` wildcards, escaping LIKE metacharacters so caller
/// input always matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
	let mut pattern = String::with_capacity(term.len() + 2);

	pattern.push('%');

	for c in term.trim().chars() {
		if matches!(c, '%' | '_' | '\\') {
			pattern.push('\\');
		}

		pattern.push(c);
	}

	pattern.push('%');

	pattern
}
