use std::collections::HashSet;

use procura_domain::classify::{SuggestionKind, classify};

use crate::{
	ProcuraService, ServiceResult,
	aggregate::GUARANTOR_SENTINELS,
	predicate::like_pattern,
};

/// Source queries in precedence order; the earliest source to produce a
/// value decides which entry survives deduplication.
const SOURCE_QUERIES: &[&str] = &[
	"SELECT DISTINCT UPPER(TRIM(buyer)) FROM tenders WHERE buyer ILIKE $1 ORDER BY 1 LIMIT $2",
	"SELECT DISTINCT UPPER(TRIM(title)) FROM tenders WHERE title ILIKE $1 ORDER BY 1 LIMIT $2",
	"SELECT DISTINCT UPPER(TRIM(winner_name)) FROM awards WHERE winner_name ILIKE $1 ORDER BY 1 LIMIT $2",
	"SELECT DISTINCT TRIM(winner_tax_id) FROM awards WHERE winner_tax_id ILIKE $1 ORDER BY 1 LIMIT $2",
	"SELECT DISTINCT TRIM(financial_entity) FROM awards WHERE financial_entity ILIKE $1 ORDER BY 1 LIMIT $2",
	"SELECT DISTINCT UPPER(TRIM(department)) FROM tenders WHERE department ILIKE $1 ORDER BY 1 LIMIT $2",
	"SELECT DISTINCT UPPER(LEFT(TRIM(description), 120)) FROM tenders WHERE description ILIKE $1 ORDER BY 1 LIMIT $2",
];
/// Index of the financial-entity source, whose values canonicalize through
/// the alias table before deduplication.
const FINANCIAL_ENTITY_SOURCE: usize = 4;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Suggestion {
	pub value: String,
	#[serde(rename = "type")]
	pub kind: SuggestionKind,
}

impl ProcuraService {
	/// Unions autocomplete candidates from every source, deduplicates by
	/// exact value, and caps the result. Queries below the minimum length
	/// return nothing rather than an error.
	pub async fn suggest(&self, query: &str) -> ServiceResult<Vec<Suggestion>> {
		let cleaned = query.trim();

		if cleaned.chars().count() < self.cfg.suggest.min_query_chars as usize {
			return Ok(Vec::new());
		}

		let pattern = like_pattern(cleaned);
		let per_source = i64::from(self.cfg.suggest.per_source_limit);
		let mut candidates = Vec::new();

		for (index, sql) in SOURCE_QUERIES.iter().enumerate() {
			let values: Vec<String> = sqlx::query_scalar(sql)
				.bind(&pattern)
				.bind(per_source)
				.fetch_all(&self.db.pool)
				.await?;

			for value in values {
				if index == FINANCIAL_ENTITY_SOURCE {
					if GUARANTOR_SENTINELS.contains(&value.trim()) {
						continue;
					}

					candidates.push(self.alias.normalize(&value));
				} else {
					candidates.push(value);
				}
			}
		}

		Ok(dedupe_and_cap(candidates, self.cfg.suggest.max_results as usize))
	}
}

pub(crate) fn dedupe_and_cap(candidates: Vec<String>, max_results: usize) -> Vec<Suggestion> {
	let mut seen = HashSet::new();
	let mut suggestions = Vec::new();

	for value in candidates {
		let value = value.trim().to_string();

		if value.is_empty() || !seen.insert(value.clone()) {
			continue;
		}

		suggestions.push(Suggestion { kind: classify(&value), value });

		if suggestions.len() == max_results {
			break;
		}
	}

	suggestions
}
