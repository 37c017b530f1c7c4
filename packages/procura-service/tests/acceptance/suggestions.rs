use time::macros::date;

use procura_service::Suggestion;

async fn seed_suggestion_sources(service: &procura_service::ProcuraService) {
	let mut req = super::write_request(
		"AS-SM-23-2024 medical supplies",
		Some("LIMA"),
		Some(date!(2024 - 01 - 15)),
	);

	req.buyer = Some("MUNICIPALIDAD PROVINCIAL DE HUAURA".to_string());
	req.awards = vec![super::award(Some("BANCO DE CREDITO DEL PERU"), Some("CARTA FIANZA"), Some(10.0))];
	service.create(req).await.expect("Failed to create tender.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn queries_below_the_minimum_length_return_nothing() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping queries_below_the_minimum_length_return_nothing; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	seed_suggestion_sources(&service).await;

	let suggestions = service.suggest("mu").await.expect("Failed to fetch suggestions.");

	assert!(suggestions.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn suggestions_are_deduped_and_capped() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping suggestions_are_deduped_and_capped; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	seed_suggestion_sources(&service).await;

	let suggestions = service.suggest("mun").await.expect("Failed to fetch suggestions.");

	assert!(!suggestions.is_empty());
	assert!(suggestions.len() <= 10);

	let mut values = suggestions.iter().map(|entry| entry.value.as_str()).collect::<Vec<_>>();

	values.sort_unstable();
	values.dedup();

	assert_eq!(values.len(), suggestions.len(), "values must be unique");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PROCURA_PG_DSN to run."]
async fn guarantor_suggestions_surface_canonical_names() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping guarantor_suggestions_surface_canonical_names; set PROCURA_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(test_db.dsn().to_string()).await;

	seed_suggestion_sources(&service).await;

	let suggestions = service.suggest("credito").await.expect("Failed to fetch suggestions.");

	assert!(
		suggestions.iter().any(|Suggestion { value, .. }| value == "BCP"),
		"expected the canonical guarantor name, got {suggestions:?}"
	);
	assert!(suggestions.iter().all(|entry| entry.value != "BANCO DE CREDITO DEL PERU"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
