use serde::Serialize;

/// Keywords marking a value as a government buyer entity.
const ENTITY_KEYWORDS: &[&str] =
	&["MUNICIPALIDAD", "GOBIERNO", "MINISTERIO", "HOSPITAL", "UNIVERSIDAD", "EMPRESA", "INSTITUTO"];

/// Word count at which a value reads as a description rather than a name.
const DESCRIPTION_WORDS: usize = 6;

/// Best-effort UI hint for an autocomplete value. Misclassification is
/// acceptable; the label never feeds back into query semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
	TaxId,
	Entity,
	Code,
	Description,
	Other,
}

pub fn classify(value: &str) -> SuggestionKind {
	let cleaned = value.trim();

	if !cleaned.is_empty() && cleaned.chars().all(|c| c.is_ascii_digit()) {
		return SuggestionKind::TaxId;
	}

	let upper = cleaned.to_uppercase();

	if ENTITY_KEYWORDS.iter().any(|keyword| upper.contains(keyword)) {
		return SuggestionKind::Entity;
	}
	if cleaned.contains('-') && cleaned.chars().any(|c| c.is_ascii_digit()) {
		return SuggestionKind::Code;
	}
	if cleaned.split_whitespace().count() >= DESCRIPTION_WORDS {
		return SuggestionKind::Description;
	}

	SuggestionKind::Other
}
