/// Splits a raw multi-entity field into its parts. Consortium guarantees
/// store several entities in one column joined by `/`.
pub fn split_values(raw: &str) -> Vec<String> {
	raw.split('/').map(str::trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}
