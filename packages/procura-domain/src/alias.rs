/// Alias set for guarantor names as they appear in award records. A token
/// matches by substring containment against the upper-trimmed input; the
/// table is scanned in precedence order and the first hit wins.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
	("BBVA", "BBVA"),
	("CREDITO", "BCP"),
	("BCP", "BCP"),
	("INTERBANK", "INTERBANK"),
	// Banco Internacional del Peru.
	("INTERNACIONAL", "INTERBANK"),
	("CESCE", "CESCE"),
	("MAPFRE", "MAPFRE"),
	("SECREX", "SECREX"),
	("POSITIVA", "LA POSITIVA"),
	("RIMAC", "RIMAC"),
	("INSUR", "INSUR"),
	("CRECER", "CRECER"),
	("AVLA", "AVLA"),
	("MUNDIAL", "MUNDIAL"),
	("LIBERTY", "LIBERTY"),
	("CITI", "CITIBANK"),
	("CHUBB", "CHUBB"),
	("CARDIF", "CARDIF"),
	("OH", "FINANCIERA OH"),
	("CONFIANZA", "FINANCIERA CONFIANZA"),
	("GNB", "BANCO GNB"),
	("PICHINCHA", "BANCO PICHINCHA"),
	("BANBIF", "BANBIF"),
	("BIF", "BANBIF"),
	("SCOTIABANK", "SCOTIABANK"),
	("SCOTIA", "SCOTIABANK"),
];

/// Ordered (token, canonical) pairs resolving inconsistent guarantor
/// spellings to one stable identity.
///
/// Construction reorders tokens longest-first, so a short token (`BIF`)
/// can never shadow a longer, more specific one (`BANBIF`). Equal-length
/// tokens keep their declaration order.
#[derive(Debug, Clone)]
pub struct AliasTable {
	pairs: Vec<(String, String)>,
}
impl AliasTable {
	pub fn new<I, T>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (T, T)>,
		T: Into<String>,
	{
		let mut pairs = pairs
			.into_iter()
			.map(|(token, canonical)| (clean(&token.into()), clean(&canonical.into())))
			.filter(|(token, _)| !token.is_empty())
			.collect::<Vec<_>>();

		pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

		Self { pairs }
	}

	pub fn builtin() -> Self {
		Self::new(BUILTIN_ALIASES.iter().copied())
	}

	/// Resolves a raw guarantor name to its canonical form. Empty input maps
	/// to the empty string; unmatched input passes through upper-trimmed, so
	/// unknown names stay distinct raw buckets rather than being collapsed.
	pub fn normalize(&self, raw: &str) -> String {
		let cleaned = clean(raw);

		if cleaned.is_empty() {
			return cleaned;
		}

		for (token, canonical) in &self.pairs {
			if cleaned.contains(token.as_str()) {
				return canonical.clone();
			}
		}

		cleaned
	}

	/// Distinct canonical names, sorted. Used as the fallback guarantor list
	/// when the store has no award rows yet.
	pub fn canonical_names(&self) -> Vec<String> {
		let mut names =
			self.pairs.iter().map(|(_, canonical)| canonical.clone()).collect::<Vec<_>>();

		names.sort();
		names.dedup();

		names
	}

	pub(crate) fn tokens(&self) -> impl Iterator<Item = &str> {
		self.pairs.iter().map(|(token, _)| token.as_str())
	}
}

fn clean(raw: &str) -> String {
	raw.trim().to_uppercase()
}
