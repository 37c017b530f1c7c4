use crate::{ProcuraService, ServiceResult, predicate::upper_trim};

/// One level of the department → province → district cascade. Only the
/// requested level is populated.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LocationList {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub departments: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub provinces: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub districts: Option<Vec<String>>,
}

impl ProcuraService {
	/// No parameters lists departments; a department lists its provinces; a
	/// department plus province lists districts. Values only surface when
	/// they co-occur with the given ancestors in the stored data.
	pub async fn locations(
		&self,
		department: Option<&str>,
		province: Option<&str>,
	) -> ServiceResult<LocationList> {
		let department = department.map(str::trim).filter(|value| !value.is_empty());
		let province = province.map(str::trim).filter(|value| !value.is_empty());

		match (department, province) {
			(None, _) => {
				let departments: Vec<String> = sqlx::query_scalar(
					"SELECT DISTINCT UPPER(TRIM(department)) FROM tenders \
					 WHERE department IS NOT NULL AND TRIM(department) <> '' ORDER BY 1",
				)
				.fetch_all(&self.db.pool)
				.await?;

				Ok(LocationList { departments: Some(departments), ..Default::default() })
			},
			(Some(department), None) => {
				let provinces: Vec<String> = sqlx::query_scalar(
					"SELECT DISTINCT UPPER(TRIM(province)) FROM tenders \
					 WHERE UPPER(TRIM(department)) = $1 \
					 AND province IS NOT NULL AND TRIM(province) <> '' ORDER BY 1",
				)
				.bind(upper_trim(department))
				.fetch_all(&self.db.pool)
				.await?;

				Ok(LocationList { provinces: Some(provinces), ..Default::default() })
			},
			(Some(department), Some(province)) => {
				let districts: Vec<String> = sqlx::query_scalar(
					"SELECT DISTINCT UPPER(TRIM(district)) FROM tenders \
					 WHERE UPPER(TRIM(department)) = $1 AND UPPER(TRIM(province)) = $2 \
					 AND district IS NOT NULL AND TRIM(district) <> '' ORDER BY 1",
				)
				.bind(upper_trim(department))
				.bind(upper_trim(province))
				.fetch_all(&self.db.pool)
				.await?;

				Ok(LocationList { districts: Some(districts), ..Default::default() })
			},
		}
	}
}
