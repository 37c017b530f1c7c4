use time::macros::date;

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn two_spellings_rank_as_one_canonical_entity() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping two_spellings_rank_as_one_canonical_entity; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut first = super::write_request("guarantee audit A", Some("LIMA"), Some(date!(2024 - 03 - 01)));

	first.awards = vec![super::award(Some("BANCO DE CREDITO DEL PERU"), None, Some(100.0))];
	service.create(first).await.expect("Failed to create first tender.");

	let mut second = super::write_request("guarantee audit B", Some("CUSCO"), Some(date!(2024 - 04 - 01)));

	second.awards = vec![super::award(Some("BCP"), None, Some(50.0))];
	service.create(second).await.expect("Failed to create second tender.");

	let ranking = service
		.financial_entity_ranking(None, None)
		.await
		.expect("Failed to rank financial entities.");

	assert_eq!(ranking.len(), 1);
	assert_eq!(ranking[0].name, "BCP");
	assert_eq!(ranking[0].count, 2);
	assert_eq!(ranking[0].amount, 150.0);
	assert_eq!(ranking[0].department_count, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn sentinel_guarantors_never_reach_the_ranking() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping sentinel_guarantors_never_reach_the_ranking; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut req = super::write_request("no guarantee", Some("LIMA"), Some(date!(2024 - 02 - 01)));

	req.awards = vec![
		super::award(Some("SIN_GARANTIA"), None, Some(10.0)),
		super::award(Some("ERROR_API_500"), None, Some(10.0)),
		super::award(Some("RIMAC SEGUROS"), None, Some(10.0)),
	];
	service.create(req).await.expect("Failed to create tender.");

	let ranking = service
		.financial_entity_ranking(None, None)
		.await
		.expect("Failed to rank financial entities.");
	let names = ranking.iter().map(|entry| entry.name.as_str()).collect::<Vec<_>>();

	assert_eq!(names, ["RIMAC"]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn ranking_filters_match_any_stored_casing() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping ranking_filters_match_any_stored_casing; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut lima = super::write_request("lima tender", Some("lima "), Some(date!(2024 - 05 - 01)));

	lima.awards = vec![super::award(Some("MAPFRE PERU"), None, Some(70.0))];
	service.create(lima).await.expect("Failed to create lima tender.");

	let mut cusco = super::write_request("cusco tender", Some("CUSCO"), Some(date!(2023 - 05 - 01)));

	cusco.awards = vec![super::award(Some("MAPFRE"), None, Some(30.0))];
	service.create(cusco).await.expect("Failed to create cusco tender.");

	let ranking = service
		.financial_entity_ranking(Some(2024), Some("Lima"))
		.await
		.expect("Failed to rank financial entities.");

	assert_eq!(ranking.len(), 1);
	assert_eq!(ranking[0].name, "MAPFRE");
	assert_eq!(ranking[0].count, 1);
	assert_eq!(ranking[0].amount, 70.0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn province_ranking_requires_a_department() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping province_ranking_requires_a_department; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let err = service.province_ranking("  ", None).await.expect_err("Expected a rejection.");

	assert!(matches!(err, procura_service::ServiceError::InvalidRequest { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
