//! The lookup-service transport abstraction and its HTTP implementation.

use anyhow::{bail, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// The Ensembl REST endpoint for id lookup.
pub const ENSEMBL_LOOKUP_URL: &str = "https://rest.ensembl.org/lookup/id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The fields of one lookup reply record this pipeline consumes. The
/// service returns more (biotype, strand, display name); those are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    /// Chromosome (sequence region) name.
    pub seq_region_name: Option<String>,
    /// Gene start coordinate.
    pub start: Option<i64>,
    /// Gene end coordinate.
    pub end: Option<i64>,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    ids: &'a [String],
}

/// One batched lookup call: identifier set in, identifier-keyed records out.
///
/// Implementations may fail; the resolver treats any error as "no data for
/// this batch" and keeps going. Identifiers absent from the returned map are
/// likewise treated as unresolved.
pub trait LookupTransport {
    /// Resolve a batch of identifiers to genomic records.
    fn resolve(&self, ids: &[String]) -> Result<HashMap<String, LookupRecord>>;
}

/// Blocking HTTP transport posting `{"ids": [...]}` to the Ensembl service.
pub struct EnsemblHttpTransport {
    client: Client,
    endpoint: String,
}

impl EnsemblHttpTransport {
    /// Transport against the production Ensembl endpoint.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(ENSEMBL_LOOKUP_URL)
    }

    /// Transport against an alternate endpoint (e.g. a mirror).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(EnsemblHttpTransport {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl LookupTransport for EnsemblHttpTransport {
    fn resolve(&self, ids: &[String]) -> Result<HashMap<String, LookupRecord>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&LookupRequest { ids })
            .send()?;
        let status = response.status();
        if !status.is_success() {
            bail!("lookup service returned {status}");
        }
        // Unknown ids come back as explicit nulls.
        let raw: HashMap<String, Option<LookupRecord>> = response.json()?;
        Ok(flatten_response(raw))
    }
}

fn flatten_response(raw: HashMap<String, Option<LookupRecord>>) -> HashMap<String, LookupRecord> {
    raw.into_iter()
        .filter_map(|(id, record)| Some((id, record?)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reply_records_tolerate_extra_fields_and_nulls() {
        let payload = r#"{
            "ENSG001": {"seq_region_name": "1", "start": 100, "end": 200,
                        "strand": 1, "biotype": "protein_coding"},
            "ENSG999": null
        }"#;
        let raw: HashMap<String, Option<LookupRecord>> =
            serde_json::from_str(payload).unwrap();
        let records = flatten_response(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records["ENSG001"],
            LookupRecord {
                seq_region_name: Some("1".to_string()),
                start: Some(100),
                end: Some(200),
            }
        );
    }

    #[test]
    fn partial_records_decode_with_absent_fields() {
        let payload = r#"{"ENSG001": {"seq_region_name": "X"}}"#;
        let raw: HashMap<String, Option<LookupRecord>> =
            serde_json::from_str(payload).unwrap();
        let records = flatten_response(raw);
        assert_eq!(records["ENSG001"].start, None);
        assert_eq!(records["ENSG001"].end, None);
    }

    #[test]
    fn request_body_is_an_id_list() {
        let ids = vec!["ENSG001".to_string(), "ENSG002".to_string()];
        let body = serde_json::to_string(&LookupRequest { ids: &ids }).unwrap();
        assert_eq!(body, r#"{"ids":["ENSG001","ENSG002"]}"#);
    }
}
