use std::collections::HashSet;

use time::macros::date;

use procura_service::TenderFilter;

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn department_and_year_filters_ignore_stored_casing() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping department_and_year_filters_ignore_stored_casing; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	for (title, department, publication_date) in [
		("lima lower", "lima ", date!(2024 - 01 - 10)),
		("lima mixed", "Lima", date!(2024 - 06 - 10)),
		("lima upper", "LIMA", date!(2024 - 11 - 10)),
		("lima stale", "LIMA", date!(2023 - 11 - 10)),
		("cusco", "CUSCO", date!(2024 - 11 - 10)),
	] {
		service
			.create(super::write_request(title, Some(department), Some(publication_date)))
			.await
			.expect("Failed to create tender.");
	}

	let filter = TenderFilter {
		department: Some("LIMA".to_string()),
		year: Some(2024),
		..Default::default()
	};
	let response = service.list(&filter, None, None).await.expect("Failed to list tenders.");

	assert_eq!(response.total, 3);
	assert!(response.items.iter().all(|item| {
		item.department.as_deref().map(str::trim).map(str::to_uppercase).as_deref() == Some("LIMA")
	}));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn stacked_award_filters_never_multiply_the_count() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping stacked_award_filters_never_multiply_the_count; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let mut req = super::write_request("bridge repair", Some("LIMA"), Some(date!(2024 - 03 - 01)));

	// Three matching awards on one tender. A duplicated join would count
	// this tender three times.
	req.awards = (0..3)
		.map(|_| super::award(Some("BCP"), Some("CARTA FIANZA"), Some(10.0)))
		.collect();
	service.create(req).await.expect("Failed to create tender.");

	let combined = TenderFilter {
		search: Some("bridge".to_string()),
		financial_entity: Some("BCP".to_string()),
		guarantee_type: Some("CARTA FIANZA".to_string()),
		..Default::default()
	};
	let response = service.list(&combined, None, None).await.expect("Failed to list tenders.");

	assert_eq!(response.total, 1);
	assert_eq!(response.items.len(), 1);

	// Each single filter alone agrees with the intersection.
	for filter in [
		TenderFilter { search: Some("bridge".to_string()), ..Default::default() },
		TenderFilter { financial_entity: Some("BCP".to_string()), ..Default::default() },
		TenderFilter { guarantee_type: Some("CARTA FIANZA".to_string()), ..Default::default() },
	] {
		let single = service.list(&filter, None, None).await.expect("Failed to list tenders.");

		assert_eq!(single.total, 1);
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn oversized_limits_are_silently_clamped() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping oversized_limits_are_silently_clamped; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;
	let response = service
		.list(&TenderFilter::default(), Some(1), Some(5_000))
		.await
		.expect("Failed to list tenders.");

	assert_eq!(response.limit, 100);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn paging_reproduces_the_full_result_set() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping paging_reproduces_the_full_result_set; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	for index in 0..25 {
		let day = (index % 28) + 1;
		let publication_date = date!(2024 - 01 - 01).replace_day(day as u8).expect("valid day");

		service
			.create(super::write_request(&format!("tender {index}"), Some("LIMA"), Some(publication_date)))
			.await
			.expect("Failed to create tender.");
	}

	let first = service
		.list(&TenderFilter::default(), Some(1), Some(10))
		.await
		.expect("Failed to list tenders.");

	assert_eq!(first.total, 25);
	assert_eq!(first.total_pages, 3);

	let mut seen = HashSet::new();

	for page in 1..=first.total_pages {
		let response = service
			.list(&TenderFilter::default(), Some(page), Some(10))
			.await
			.expect("Failed to list tenders.");

		for item in response.items {
			assert!(seen.insert(item.tender_id), "page {page} repeated a tender");
		}
	}

	assert_eq!(seen.len(), 25);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn origin_filter_separates_manual_from_etl_rows() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping origin_filter_separates_manual_from_etl_rows; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	service
		.create(super::write_request("manual entry", Some("LIMA"), Some(date!(2024 - 01 - 01))))
		.await
		.expect("Failed to create tender.");
	sqlx::query(
		"INSERT INTO tenders (tender_id, title, origin, publication_date) VALUES ($1, $2, 'etl', $3)",
	)
	.bind("977136")
	.bind("feed entry")
	.bind(date!(2024 - 02 - 01))
	.execute(&service.db.pool)
	.await
	.expect("Failed to insert feed tender.");

	let manual = TenderFilter { origin: Some("manual".to_string()), ..Default::default() };
	let response = service.list(&manual, None, None).await.expect("Failed to list tenders.");

	assert_eq!(response.total, 1);
	assert_eq!(response.items[0].origin, "manual");

	let etl = TenderFilter { origin: Some("etl".to_string()), ..Default::default() };
	let response = service.list(&etl, None, None).await.expect("Failed to list tenders.");

	assert_eq!(response.total, 1);
	assert_eq!(response.items[0].tender_id, "977136");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
