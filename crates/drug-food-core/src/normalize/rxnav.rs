//! Terminology lookup (RxNav REST API).

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Terminology lookup errors.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Terminology service returned status {0}")]
    Status(u16),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Term types that denote an ingredient (generic) concept.
pub const INGREDIENT_TERM_TYPES: &[&str] = &["IN", "PIN", "MIN"];

/// Term type for a brand name concept.
pub const BRAND_TERM_TYPE: &str = "BN";

/// A standardized concept name returned by a drug search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConceptCandidate {
    pub name: String,
    /// Term type (synonym type), e.g. `IN`, `BN`, `SBD`
    #[serde(alias = "synonymType", default)]
    pub tty: String,
}

impl ConceptCandidate {
    pub fn new(name: &str, tty: &str) -> Self {
        Self {
            name: name.into(),
            tty: tty.into(),
        }
    }
}

/// External terminology service that maps free-text names to concepts.
pub trait TerminologyService: Send + Sync {
    /// Candidate concept names for a free-text drug name.
    fn search_concepts(&self, name: &str) -> LookupResult<Vec<ConceptCandidate>>;

    /// Canonical concept id for an exact name, if any.
    fn concept_id(&self, name: &str) -> LookupResult<Option<String>>;

    /// Display name of a concept id, if any.
    fn concept_name(&self, concept_id: &str) -> LookupResult<Option<String>>;
}

/// Pick the preferred candidate: ingredient, then brand, then the first.
pub fn select_candidate(candidates: &[ConceptCandidate]) -> Option<&ConceptCandidate> {
    let usable = || candidates.iter().filter(|c| !c.name.trim().is_empty());

    usable()
        .find(|c| INGREDIENT_TERM_TYPES.contains(&c.tty.as_str()))
        .or_else(|| usable().find(|c| c.tty == BRAND_TERM_TYPE))
        .or_else(|| usable().next())
}

/// Default RxNav endpoint.
pub const DEFAULT_RXNAV_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// RxNav HTTP client.
pub struct RxNavClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl RxNavClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> LookupResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LookupError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> LookupResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout(self.timeout_secs)
                } else {
                    LookupError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .json()
            .map_err(|e| LookupError::ResponseParsing(e.to_string()))
    }
}

impl TerminologyService for RxNavClient {
    fn search_concepts(&self, name: &str) -> LookupResult<Vec<ConceptCandidate>> {
        let parsed: DrugsResponse = self.get_json("drugs.json", &[("name", name)])?;
        Ok(parsed.into_candidates())
    }

    fn concept_id(&self, name: &str) -> LookupResult<Option<String>> {
        let parsed: RxcuiResponse = self.get_json("rxcui.json", &[("name", name)])?;
        Ok(parsed.id_group.rxnorm_id.into_iter().find(|id| !id.is_empty()))
    }

    fn concept_name(&self, concept_id: &str) -> LookupResult<Option<String>> {
        let path = format!("rxcui/{}/properties.json", concept_id);
        let parsed: PropertiesResponse = self.get_json(&path, &[])?;
        Ok(parsed
            .properties
            .map(|p| p.name)
            .filter(|n| !n.trim().is_empty()))
    }
}

/// Response body from `/drugs.json`
#[derive(Deserialize, Default)]
struct DrugsResponse {
    #[serde(rename = "drugGroup", default)]
    drug_group: DrugGroup,
}

#[derive(Deserialize, Default)]
struct DrugGroup {
    #[serde(rename = "conceptGroup", default)]
    concept_group: Vec<ConceptGroup>,
}

#[derive(Deserialize)]
struct ConceptGroup {
    #[serde(default)]
    tty: String,
    #[serde(rename = "conceptProperties", default)]
    concept_properties: Vec<ConceptCandidate>,
}

impl DrugsResponse {
    fn into_candidates(self) -> Vec<ConceptCandidate> {
        self.drug_group
            .concept_group
            .into_iter()
            .flat_map(|group| {
                let group_tty = group.tty;
                group.concept_properties.into_iter().map(move |mut c| {
                    if c.tty.is_empty() {
                        c.tty = group_tty.clone();
                    }
                    c
                })
            })
            .collect()
    }
}

/// Response body from `/rxcui.json`
#[derive(Deserialize)]
struct RxcuiResponse {
    #[serde(rename = "idGroup", default)]
    id_group: IdGroup,
}

#[derive(Deserialize, Default)]
struct IdGroup {
    #[serde(rename = "rxnormId", default)]
    rxnorm_id: Vec<String>,
}

/// Response body from `/rxcui/{id}/properties.json`
#[derive(Deserialize)]
struct PropertiesResponse {
    properties: Option<ConceptProperties>,
}

#[derive(Deserialize)]
struct ConceptProperties {
    #[serde(default)]
    name: String,
}
