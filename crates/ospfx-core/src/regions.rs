use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship between the sites of two adjacent routers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proximity {
    SameCountry,
    SameContinent,
    CrossContinent,
}

/// Country code to continent lookup used by the latency model.
///
/// Codes are matched case-insensitively. A country missing from the table is
/// treated as sitting on its own unknown continent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinentTable {
    entries: HashMap<String, String>,
}

const DEFAULT_REGIONS: &[(&str, &[&str])] = &[
    (
        "EU",
        &[
            "AT", "BE", "BG", "CH", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB", "GR",
            "HR", "HU", "IE", "IS", "IT", "LT", "LU", "LV", "MT", "NL", "NO", "PL", "PT", "RO",
            "RS", "SE", "SI", "SK", "UA",
        ],
    ),
    ("NA", &["CA", "MX", "US", "CR", "PA", "GT"]),
    ("SA", &["AR", "BO", "BR", "CL", "CO", "EC", "PE", "PY", "UY", "VE"]),
    (
        "AS",
        &[
            "AE", "CN", "HK", "ID", "IL", "IN", "JP", "KR", "MY", "PH", "PK", "SA", "SG", "TH",
            "TR", "TW", "VN",
        ],
    ),
    ("AF", &["DZ", "EG", "ET", "GH", "KE", "MA", "NG", "TN", "ZA"]),
    ("OC", &["AU", "FJ", "NZ"]),
];

impl ContinentTable {
    /// An empty table: every country is on its own unknown continent.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of known countries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no countries are known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite a country's continent.
    pub fn insert(&mut self, country: &str, continent: &str) -> Option<String> {
        self.entries
            .insert(country.to_ascii_uppercase(), continent.to_ascii_uppercase())
    }

    /// Look up a country's continent.
    pub fn continent_of(&self, country: &str) -> Option<&str> {
        self.entries
            .get(&country.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Classify the hop between two sites.
    pub fn proximity(&self, a: Option<&str>, b: Option<&str>) -> Proximity {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            _ => return Proximity::CrossContinent,
        };
        if a.eq_ignore_ascii_case(b) {
            return Proximity::SameCountry;
        }
        match (self.continent_of(a), self.continent_of(b)) {
            (Some(ca), Some(cb)) if ca == cb => Proximity::SameContinent,
            _ => Proximity::CrossContinent,
        }
    }
}

impl Default for ContinentTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (continent, countries) in DEFAULT_REGIONS {
            for country in *countries {
                table.insert(country, continent);
            }
        }
        table
    }
}
