use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::utils::AppError;

/// Label search fields, in the order a lookup tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelField {
    BrandName,
    GenericName,
    SubstanceName,
}

impl LabelField {
    pub const FALLBACK_CHAIN: [LabelField; 3] = [
        LabelField::BrandName,
        LabelField::GenericName,
        LabelField::SubstanceName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelField::BrandName => "brand_name",
            LabelField::GenericName => "generic_name",
            LabelField::SubstanceName => "substance_name",
        }
    }
}

/// External drug-label API.
#[async_trait]
pub trait LabelSource: Send + Sync {
    /// First label matching `field == name`, or None. Transport failures are
    /// reported as None.
    async fn fetch_label(&self, field: LabelField, name: &str) -> Option<serde_json::Value>;
}

#[derive(Debug, Deserialize)]
struct LabelSearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// openFDA drug label endpoint client
pub struct OpenFdaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenFdaClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn search_url(&self, field: LabelField, name: &str) -> String {
        let mut url = format!(
            "{}?search=openfda.{}:\"{}\"&limit=1",
            self.base_url,
            field.as_str(),
            urlencoding::encode(name)
        );

        if let Some(key) = &self.api_key {
            url.push_str("&api_key=");
            url.push_str(&urlencoding::encode(key));
        }

        url
    }

    async fn request(&self, field: LabelField, name: &str) -> Result<Option<serde_json::Value>, String> {
        let response = self
            .client
            .get(self.search_url(field, name))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Failed to fetch label: {}", e))?;

        // openFDA answers 404 when nothing matches
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(format!("Label API error: {}", response.status()));
        }

        let body: LabelSearchResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse label response: {}", e))?;

        Ok(body.results.into_iter().next())
    }
}

#[async_trait]
impl LabelSource for OpenFdaClient {
    async fn fetch_label(&self, field: LabelField, name: &str) -> Option<serde_json::Value> {
        log::info!("🔎 Fetching label: {} = {}", field.as_str(), name);

        match self.request(field, name).await {
            Ok(Some(label)) => Some(label),
            Ok(None) => {
                log::debug!("   no label for {} = {}", field.as_str(), name);
                None
            }
            Err(e) => {
                log::warn!("⚠️  {} lookup failed for {}: {}", field.as_str(), name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> OpenFdaClient {
        OpenFdaClient::new(
            "https://api.fda.gov/drug/label.json/",
            api_key.map(str::to_string),
            Duration::from_secs(8),
        )
        .expect("client")
    }

    #[test]
    fn fallback_chain_order() {
        let fields: Vec<&str> = LabelField::FALLBACK_CHAIN.iter().map(|f| f.as_str()).collect();
        assert_eq!(fields, vec!["brand_name", "generic_name", "substance_name"]);
    }

    #[test]
    fn search_url_encodes_name() {
        let url = client(None).search_url(LabelField::GenericName, "acetyl salicylic");
        assert_eq!(
            url,
            "https://api.fda.gov/drug/label.json?search=openfda.generic_name:\"acetyl%20salicylic\"&limit=1"
        );
    }

    #[test]
    fn search_url_appends_api_key() {
        let url = client(Some("k3y")).search_url(LabelField::BrandName, "Advil");
        assert!(url.ends_with("&limit=1&api_key=k3y"));
    }

    #[tokio::test]
    async fn unreachable_source_yields_none() {
        let source = OpenFdaClient::new("http://127.0.0.1:9/label.json", None, Duration::from_millis(500))
            .expect("client");
        assert!(source.fetch_label(LabelField::BrandName, "Advil").await.is_none());
    }
}
