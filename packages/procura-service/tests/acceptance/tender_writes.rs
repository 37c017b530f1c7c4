use time::macros::date;

use procura_service::{ExportFormat, ExportRequest, ServiceError, TenderFilter};

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn created_tenders_round_trip_through_detail() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping created_tenders_round_trip_through_detail; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut req = super::write_request("water treatment", Some("PIURA"), Some(date!(2024 - 08 - 01)));

	req.awards = vec![super::award(Some("AVLA PERU"), Some("POLIZA DE CAUCION"), Some(90_000.0))];

	let created = service.create(req).await.expect("Failed to create tender.");

	assert_eq!(created.tender.origin, "manual");
	assert_eq!(created.awards.len(), 1);

	let fetched = service.get(&created.tender.tender_id).await.expect("Failed to fetch detail.");

	assert_eq!(fetched.tender.title, "water treatment");
	assert_eq!(fetched.awards[0].financial_entity.as_deref(), Some("AVLA PERU"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn updating_replaces_the_whole_award_set() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping updating_replaces_the_whole_award_set; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut req = super::write_request("school build", Some("CUSCO"), Some(date!(2024 - 02 - 01)));

	req.awards = vec![
		super::award(Some("BCP"), Some("CARTA FIANZA"), Some(10.0)),
		super::award(Some("MAPFRE"), Some("CARTA FIANZA"), Some(20.0)),
	];

	let created = service.create(req).await.expect("Failed to create tender.");
	let mut replacement =
		super::write_request("school build, phase two", Some("CUSCO"), Some(date!(2024 - 02 - 01)));

	replacement.awards = vec![super::award(Some("RIMAC"), Some("RETENCION"), Some(99.0))];

	let updated = service
		.update(&created.tender.tender_id, replacement)
		.await
		.expect("Failed to update tender.");

	assert_eq!(updated.tender.title, "school build, phase two");
	assert_eq!(updated.tender.origin, "manual", "origin survives updates");
	assert_eq!(updated.awards.len(), 1);
	assert_eq!(updated.awards[0].financial_entity.as_deref(), Some("RIMAC"));

	let award_count: i64 = sqlx::query_scalar("SELECT count(*) FROM awards WHERE tender_id = $1")
		.bind(&created.tender.tender_id)
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count awards.");

	assert_eq!(award_count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn writes_against_unknown_ids_are_not_found() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping writes_against_unknown_ids_are_not_found; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let req = super::write_request("ghost", None, None);
	let err = service.update("missing-id", req).await.expect_err("Expected not found.");

	assert!(matches!(err, ServiceError::NotFound { .. }));

	let err = service.delete("missing-id").await.expect_err("Expected not found.");

	assert!(matches!(err, ServiceError::NotFound { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn deleting_a_tender_cascades_to_its_awards() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping deleting_a_tender_cascades_to_its_awards; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut req = super::write_request("short lived", Some("TACNA"), Some(date!(2024 - 03 - 01)));

	req.awards = vec![super::award(Some("CHUBB"), None, Some(5.0))];

	let created = service.create(req).await.expect("Failed to create tender.");

	service.delete(&created.tender.tender_id).await.expect("Failed to delete tender.");

	let err = service.get(&created.tender.tender_id).await.expect_err("Expected not found.");

	assert!(matches!(err, ServiceError::NotFound { .. }));

	let award_count: i64 = sqlx::query_scalar("SELECT count(*) FROM awards WHERE tender_id = $1")
		.bind(&created.tender.tender_id)
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count awards.");

	assert_eq!(award_count, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn export_requires_an_explicit_selection() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping export_requires_an_explicit_selection; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let req = ExportRequest {
		format: ExportFormat::Csv,
		ids: Vec::new(),
		all_matches: false,
		filters: TenderFilter::default(),
	};
	let err = service.export(&req).await.expect_err("Expected a rejection.");

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn all_matches_exports_reuse_the_filter_plan() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping all_matches_exports_reuse_the_filter_plan; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut lima = super::write_request("lima works", Some("LIMA"), Some(date!(2024 - 04 - 01)));

	lima.awards = vec![super::award(Some("BCP / MAPFRE"), Some("CARTA FIANZA"), Some(10.0))];
	service.create(lima).await.expect("Failed to create lima tender.");
	service
		.create(super::write_request("puno works", Some("PUNO"), Some(date!(2024 - 04 - 02))))
		.await
		.expect("Failed to create puno tender.");

	let req = ExportRequest {
		format: ExportFormat::Excel,
		ids: Vec::new(),
		all_matches: true,
		filters: TenderFilter { department: Some("lima".to_string()), ..Default::default() },
	};
	let response = service.export(&req).await.expect("Failed to export.");

	assert_eq!(response.format, ExportFormat::Excel);
	assert_eq!(response.rows.len(), 1);
	assert_eq!(response.rows[0].financial_entities, "BCP, MAPFRE");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn filter_options_fall_back_on_an_empty_store() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping filter_options_fall_back_on_an_empty_store; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let options = service.filter_options().await.expect("Failed to fetch filter options.");

	assert!(!options.departments.is_empty());
	assert!(!options.statuses.is_empty());
	assert!(!options.years.is_empty());
	assert_eq!(options.financial_entities, service.alias.canonical_names());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
