use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{BirthdayDatasetService, ServiceError, ServiceResult};

/// SPARQL client for the public notable-birthdays dataset
pub struct WikidataClient {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<SparqlBinding>,
}

#[derive(Deserialize)]
struct SparqlBinding {
    #[serde(rename = "humanLabel")]
    human_label: SparqlValue,
}

#[derive(Deserialize)]
struct SparqlValue {
    value: String,
}

/// Humans born on (day, month), ranked by number of encyclopedia sitelinks
fn sparql_query(day: u32, month: u32, limit: u32) -> String {
    format!(
        "SELECT DISTINCT ?human ?humanLabel WHERE {{ \
         ?human wdt:P31 wd:Q5 . \
         ?human wdt:P569 ?dob . \
         ?human rdfs:label ?humanLabel . \
         ?human wikibase:sitelinks ?sitelinks . \
         FILTER(MONTH(?dob) = {month} && DAY(?dob) = {day}) . \
         FILTER(LANG(?humanLabel) = \"en\") \
         }} ORDER BY DESC(?sitelinks) LIMIT {limit}"
    )
}

impl WikidataClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl BirthdayDatasetService for WikidataClient {
    async fn notable_people(&self, day: u32, month: u32, limit: u32) -> ServiceResult<Vec<String>> {
        let query = sparql_query(day, month, limit);
        debug!("Dataset query for {:02}-{:02}, limit {}", day, month, limit);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("format", "json"), ("query", query.as_str())])
            .header(reqwest::header::USER_AGENT, "birthday_skill/0.1")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_status(response.status()));
        }
        let parsed: SparqlResponse = response.json().await?;
        Ok(parsed
            .results
            .bindings
            .into_iter()
            .map(|b| b.human_label.value)
            .collect())
    }
}
