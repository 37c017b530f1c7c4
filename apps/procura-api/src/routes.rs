use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::Date;

use procura_service::{
	EntityRanking, ExportRequest, ExportResponse, FilterOptions, ListResponse, LocationList,
	LocationRanking, ServiceError, Suggestion, TenderDetail, TenderFilter, TenderWriteRequest,
	clamp_limit, clamp_page,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/tenders", get(list_tenders).post(create_tender))
		.route("/tenders/filters/all", get(filter_options))
		.route("/tenders/suggestions", get(suggestions))
		.route(
			"/tenders/{tender_id}",
			get(get_tender).put(update_tender).delete(delete_tender),
		)
		.route("/locations", get(locations))
		.route("/aggregate/financial-entities", get(financial_entity_ranking))
		.route("/aggregate/departments", get(department_ranking))
		.route("/aggregate/provinces", get(province_ranking))
		.route("/export", post(export))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct TenderListParams {
	search: Option<String>,
	status: Option<String>,
	category: Option<String>,
	buyer: Option<String>,
	department: Option<String>,
	province: Option<String>,
	district: Option<String>,
	year: Option<i32>,
	month: Option<i32>,
	origin: Option<String>,
	winner_tax_id: Option<String>,
	financial_entity: Option<String>,
	guarantee_type: Option<String>,
	#[serde(default, with = "procura_service::time_serde::option")]
	awarded_from: Option<Date>,
	#[serde(default, with = "procura_service::time_serde::option")]
	awarded_to: Option<Date>,
	page: Option<u32>,
	limit: Option<u32>,
}
impl TenderListParams {
	fn into_parts(self) -> (TenderFilter, Option<u32>, Option<u32>) {
		let Self {
			search,
			status,
			category,
			buyer,
			department,
			province,
			district,
			year,
			month,
			origin,
			winner_tax_id,
			financial_entity,
			guarantee_type,
			awarded_from,
			awarded_to,
			page,
			limit,
		} = self;
		let filter = TenderFilter {
			search,
			status,
			category,
			buyer,
			department,
			province,
			district,
			year,
			month,
			origin,
			winner_tax_id,
			financial_entity,
			guarantee_type,
			awarded_from,
			awarded_to,
		};

		(filter, page, limit)
	}
}

#[derive(Debug, Serialize)]
struct ListBody {
	#[serde(flatten)]
	body: ListResponse,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

/// List endpoints answer 200 with an empty, well-formed payload on storage
/// failure so dashboards keep rendering through transient outages.
async fn list_tenders(
	State(state): State<AppState>,
	Query(params): Query<TenderListParams>,
) -> Json<ListBody> {
	let (filter, page, limit) = params.into_parts();

	match state.service.list(&filter, page, limit).await {
		Ok(body) => Json(ListBody { body, error: None }),
		Err(err) => {
			tracing::error!(%err, "Tender listing failed; returning an empty page.");

			let page = clamp_page(page);
			let limit = clamp_limit(limit, &state.service.cfg.pagination);

			Json(ListBody { body: ListResponse::empty(page, limit), error: Some(err.to_string()) })
		},
	}
}

async fn get_tender(
	State(state): State<AppState>,
	Path(tender_id): Path<String>,
) -> Result<Json<TenderDetail>, ApiError> {
	Ok(Json(state.service.get(&tender_id).await?))
}

async fn create_tender(
	State(state): State<AppState>,
	Json(payload): Json<TenderWriteRequest>,
) -> Result<Json<TenderDetail>, ApiError> {
	Ok(Json(state.service.create(payload).await?))
}

async fn update_tender(
	State(state): State<AppState>,
	Path(tender_id): Path<String>,
	Json(payload): Json<TenderWriteRequest>,
) -> Result<Json<TenderDetail>, ApiError> {
	Ok(Json(state.service.update(&tender_id, payload).await?))
}

#[derive(Debug, Serialize)]
struct DeleteBody {
	message: String,
}

async fn delete_tender(
	State(state): State<AppState>,
	Path(tender_id): Path<String>,
) -> Result<Json<DeleteBody>, ApiError> {
	state.service.delete(&tender_id).await?;

	Ok(Json(DeleteBody { message: format!("Tender {tender_id} deleted.") }))
}

#[derive(Debug, Serialize)]
struct FilterOptionsBody {
	#[serde(flatten)]
	options: FilterOptions,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

async fn filter_options(State(state): State<AppState>) -> Json<FilterOptionsBody> {
	match state.service.filter_options().await {
		Ok(options) => Json(FilterOptionsBody { options, error: None }),
		Err(err) => {
			tracing::error!(%err, "Filter options failed; serving the defaults.");

			Json(FilterOptionsBody {
				options: state.service.fallback_filter_options(),
				error: Some(err.to_string()),
			})
		},
	}
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
	query: Option<String>,
}

#[derive(Debug, Serialize)]
struct SuggestionsBody {
	suggestions: Vec<Suggestion>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

async fn suggestions(
	State(state): State<AppState>,
	Query(params): Query<SuggestParams>,
) -> Json<SuggestionsBody> {
	let query = params.query.unwrap_or_default();

	match state.service.suggest(&query).await {
		Ok(suggestions) => Json(SuggestionsBody { suggestions, error: None }),
		Err(err) => {
			tracing::error!(%err, "Suggestions failed; returning an empty list.");

			Json(SuggestionsBody { suggestions: Vec::new(), error: Some(err.to_string()) })
		},
	}
}

#[derive(Debug, Deserialize)]
struct LocationParams {
	department: Option<String>,
	province: Option<String>,
}

#[derive(Debug, Serialize)]
struct LocationsBody {
	#[serde(flatten)]
	locations: LocationList,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

async fn locations(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
) -> Json<LocationsBody> {
	match state
		.service
		.locations(params.department.as_deref(), params.province.as_deref())
		.await
	{
		Ok(locations) => Json(LocationsBody { locations, error: None }),
		Err(err) => {
			tracing::error!(%err, "Location cascade failed; returning an empty level.");

			Json(LocationsBody { locations: LocationList::default(), error: Some(err.to_string()) })
		},
	}
}

#[derive(Debug, Deserialize)]
struct RankingParams {
	year: Option<i32>,
	department: Option<String>,
}

#[derive(Debug, Serialize)]
struct RankingBody<T> {
	data: Vec<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}
impl<T> RankingBody<T> {
	fn empty(error: String) -> Self {
		Self { data: Vec::new(), error: Some(error) }
	}
}

async fn financial_entity_ranking(
	State(state): State<AppState>,
	Query(params): Query<RankingParams>,
) -> Json<RankingBody<EntityRanking>> {
	match state
		.service
		.financial_entity_ranking(params.year, params.department.as_deref())
		.await
	{
		Ok(data) => Json(RankingBody { data, error: None }),
		Err(err) => {
			tracing::error!(%err, "Financial entity ranking failed; returning an empty list.");

			Json(RankingBody::empty(err.to_string()))
		},
	}
}

async fn department_ranking(
	State(state): State<AppState>,
	Query(params): Query<RankingParams>,
) -> Json<RankingBody<LocationRanking>> {
	match state.service.department_ranking(params.year).await {
		Ok(data) => Json(RankingBody { data, error: None }),
		Err(err) => {
			tracing::error!(%err, "Department ranking failed; returning an empty list.");

			Json(RankingBody::empty(err.to_string()))
		},
	}
}

async fn province_ranking(
	State(state): State<AppState>,
	Query(params): Query<RankingParams>,
) -> Result<Json<RankingBody<LocationRanking>>, ApiError> {
	let department = params.department.unwrap_or_default();

	match state.service.province_ranking(&department, params.year).await {
		Ok(data) => Ok(Json(RankingBody { data, error: None })),
		// A missing department is the caller's mistake, not an outage.
		Err(err @ ServiceError::InvalidRequest { .. }) => Err(err.into()),
		Err(err) => {
			tracing::error!(%err, "Province ranking failed; returning an empty list.");

			Ok(Json(RankingBody::empty(err.to_string())))
		},
	}
}

async fn export(
	State(state): State<AppState>,
	Json(payload): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, ApiError> {
	Ok(Json(state.service.export(&payload).await?))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	tender_id: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	body: ErrorBody,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::NotFound { tender_id } => Self {
				status: StatusCode::NOT_FOUND,
				body: ErrorBody {
					error: format!("Tender {tender_id} not found."),
					tender_id: Some(tender_id),
				},
			},
			ServiceError::InvalidRequest { message } => Self {
				status: StatusCode::BAD_REQUEST,
				body: ErrorBody { error: message, tender_id: None },
			},
			ServiceError::Storage { message } => Self {
				status: StatusCode::INTERNAL_SERVER_ERROR,
				body: ErrorBody { error: message, tender_id: None },
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(self.body)).into_response()
	}
}
