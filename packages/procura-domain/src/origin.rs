use serde::{Deserialize, Serialize};

/// How a tender entered the store. Stored explicitly at creation time and
/// never inferred from the shape of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
	/// Created through the write endpoints.
	Manual,
	/// Loaded by the bulk pipeline from an upstream feed.
	Etl,
}
impl Origin {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Manual => "manual",
			Self::Etl => "etl",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"manual" => Some(Self::Manual),
			"etl" => Some(Self::Etl),
			_ => None,
		}
	}
}

impl std::fmt::Display for Origin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
