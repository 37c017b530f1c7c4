use time::macros::date;

async fn seed_locations(service: &procura_service::ProcuraService) {
	for (title, department, province, district) in [
		("miraflores park", "lima ", "Lima", "MIRAFLORES"),
		("huacho road", "LIMA", "HUAURA", "huacho"),
		("wanchaq school", "CUSCO", "CUSCO", "WANCHAQ"),
	] {
		let mut req = super::write_request(title, Some(department), Some(date!(2024 - 01 - 15)));

		req.province = Some(province.to_string());
		req.district = Some(district.to_string());
		service.create(req).await.expect("Failed to create tender.");
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn cascade_levels_only_surface_co_occurring_values() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping cascade_levels_only_surface_co_occurring_values; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	seed_locations(&service).await;

	let departments = service
		.locations(None, None)
		.await
		.expect("Failed to list departments.")
		.departments
		.expect("departments level");

	assert_eq!(departments, ["CUSCO", "LIMA"]);

	let provinces = service
		.locations(Some("lima"), None)
		.await
		.expect("Failed to list provinces.")
		.provinces
		.expect("provinces level");

	assert_eq!(provinces, ["HUAURA", "LIMA"]);

	let districts = service
		.locations(Some("LIMA"), Some("huaura"))
		.await
		.expect("Failed to list districts.")
		.districts
		.expect("districts level");

	assert_eq!(districts, ["HUACHO"]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn unknown_ancestors_yield_empty_lists() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping unknown_ancestors_yield_empty_lists; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	seed_locations(&service).await;

	let provinces = service
		.locations(Some("TACNA"), None)
		.await
		.expect("Failed to list provinces.")
		.provinces
		.expect("provinces level");

	assert!(provinces.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
