use std::collections::{BTreeMap, BTreeSet};

use sqlx::QueryBuilder;

use procura_domain::alias::AliasTable;

use crate::{ProcuraService, ServiceError, ServiceResult, predicate::upper_trim};

/// Raw guarantor values marking an award without a usable entity. Excluded
/// from every ranking and option list.
pub(crate) const GUARANTOR_SENTINELS: &[&str] = &["SIN_GARANTIA", "ERROR_API_500"];

/// One raw `(entity, department)` group as stored, before canonicalization.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct EntityGroupRow {
	pub entity: String,
	pub department: Option<String>,
	pub count: i64,
	pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EntityRanking {
	pub name: String,
	pub count: i64,
	pub amount: f64,
	pub department_count: usize,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct LocationRanking {
	pub name: String,
	pub count: i64,
	pub amount: f64,
}

impl ProcuraService {
	/// Ranks financial guarantors by canonical identity. The store groups by
	/// raw value; the canonical re-grouping happens here because the alias
	/// table is not visible to SQL.
	pub async fn financial_entity_ranking(
		&self,
		year: Option<i32>,
		department: Option<&str>,
	) -> ServiceResult<Vec<EntityRanking>> {
		let mut query = QueryBuilder::new(
			"SELECT a.financial_entity AS entity, t.department AS department, \
			 COUNT(*) AS count, COALESCE(SUM(a.awarded_amount), 0) AS amount \
			 FROM awards a JOIN tenders t ON t.tender_id = a.tender_id \
			 WHERE a.financial_entity IS NOT NULL AND TRIM(a.financial_entity) <> ''",
		);

		for sentinel in GUARANTOR_SENTINELS {
			query.push(" AND a.financial_entity <> ");
			query.push_bind(*sentinel);
		}
		if let Some(year) = year {
			query.push(" AND EXTRACT(YEAR FROM t.publication_date)::INT = ");
			query.push_bind(year);
		}
		if let Some(department) = department.map(str::trim).filter(|value| !value.is_empty()) {
			query.push(" AND UPPER(TRIM(t.department)) = ");
			query.push_bind(upper_trim(department));
		}

		query.push(" GROUP BY a.financial_entity, t.department ORDER BY amount DESC LIMIT ");
		query.push_bind(i64::from(self.cfg.aggregate.scan_limit));

		let rows: Vec<EntityGroupRow> = query.build_query_as().fetch_all(&self.db.pool).await?;

		Ok(regroup_by_canonical(rows, &self.alias))
	}

	pub async fn department_ranking(&self, year: Option<i32>) -> ServiceResult<Vec<LocationRanking>> {
		let mut query = QueryBuilder::new(
			"SELECT UPPER(TRIM(t.department)) AS name, COUNT(*) AS count, \
			 COALESCE(SUM(t.estimated_amount), 0) AS amount \
			 FROM tenders t WHERE t.department IS NOT NULL AND TRIM(t.department) <> ''",
		);

		if let Some(year) = year {
			query.push(" AND EXTRACT(YEAR FROM t.publication_date)::INT = ");
			query.push_bind(year);
		}

		query.push(
			" GROUP BY UPPER(TRIM(t.department)) ORDER BY count DESC, amount DESC, name ASC LIMIT ",
		);
		query.push_bind(i64::from(self.cfg.aggregate.scan_limit));

		Ok(query.build_query_as().fetch_all(&self.db.pool).await?)
	}

	/// Provinces are meaningful only inside a department, so one is required.
	pub async fn province_ranking(
		&self,
		department: &str,
		year: Option<i32>,
	) -> ServiceResult<Vec<LocationRanking>> {
		let department = department.trim();

		if department.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "department is required for a province ranking.".to_string(),
			});
		}

		let mut query = QueryBuilder::new(
			"SELECT UPPER(TRIM(t.province)) AS name, COUNT(*) AS count, \
			 COALESCE(SUM(t.estimated_amount), 0) AS amount \
			 FROM tenders t WHERE t.province IS NOT NULL AND TRIM(t.province) <> '' \
			 AND UPPER(TRIM(t.department)) = ",
		);

		query.push_bind(upper_trim(department));

		if let Some(year) = year {
			query.push(" AND EXTRACT(YEAR FROM t.publication_date)::INT = ");
			query.push_bind(year);
		}

		query.push(
			" GROUP BY UPPER(TRIM(t.province)) ORDER BY count DESC, amount DESC, name ASC LIMIT ",
		);
		query.push_bind(i64::from(self.cfg.aggregate.scan_limit));

		Ok(query.build_query_as().fetch_all(&self.db.pool).await?)
	}
}

/// Re-groups raw store groups under their canonical names, summing counts
/// and amounts and collecting the distinct departments each entity touches.
/// Sorted by count desc, amount desc, then name asc.
pub(crate) fn regroup_by_canonical(
	rows: Vec<EntityGroupRow>,
	alias: &AliasTable,
) -> Vec<EntityRanking> {
	let mut grouped: BTreeMap<String, (i64, f64, BTreeSet<String>)> = BTreeMap::new();

	for row in rows {
		let name = alias.normalize(&row.entity);

		if name.is_empty() || GUARANTOR_SENTINELS.contains(&name.as_str()) {
			continue;
		}

		let entry = grouped.entry(name).or_default();

		entry.0 += row.count;
		entry.1 += row.amount;

		if let Some(department) =
			row.department.map(|value| upper_trim(&value)).filter(|value| !value.is_empty())
		{
			entry.2.insert(department);
		}
	}

	let mut ranking = grouped
		.into_iter()
		.map(|(name, (count, amount, departments))| EntityRanking {
			name,
			count,
			amount,
			department_count: departments.len(),
		})
		.collect::<Vec<_>>();

	ranking.sort_by(|a, b| {
		b.count
			.cmp(&a.count)
			.then_with(|| b.amount.total_cmp(&a.amount))
			.then_with(|| a.name.cmp(&b.name))
	});

	ranking
}
