//! Free-text address search against a Nominatim-style endpoint. Results
//! only ever feed coordinate fields in the editor, so failures degrade to
//! an empty list: logged, never surfaced as an error to the caller.

use serde::Deserialize;
use thiserror::Error;

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 3;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_LIMIT: usize = 5;
// Nominatim has no API key but requires an identifying User-Agent.
const DEFAULT_USER_AGENT: &str = "flowmap/0.1 (+https://github.com/flowmap)";

#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

#[derive(Clone, Debug)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub limit: usize,
    pub user_agent: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        GeocodeConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding response malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Nominatim serializes lat/lon as strings; entries that fail to parse as
/// numbers are dropped rather than failing the whole response.
pub fn parse_results(body: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
    #[derive(Deserialize)]
    struct RawResult {
        lat: String,
        lon: String,
        display_name: String,
    }

    let raw: Vec<RawResult> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .filter_map(|r| {
            let lat = r.lat.parse().ok()?;
            let lon = r.lon.parse().ok()?;
            Some(GeocodeResult {
                lat,
                lon,
                display_name: r.display_name,
            })
        })
        .collect())
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::Geocoder;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{parse_results, GeocodeConfig, GeocodeError, GeocodeResult, MIN_QUERY_LEN};

    pub struct Geocoder {
        config: GeocodeConfig,
        http: reqwest::Client,
    }

    impl Default for Geocoder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Geocoder {
        pub fn new() -> Geocoder {
            Geocoder::with_config(GeocodeConfig::default())
        }

        pub fn with_config(config: GeocodeConfig) -> Geocoder {
            Geocoder {
                config,
                http: reqwest::Client::new(),
            }
        }

        /// Search for an address. Short queries short-circuit to an empty
        /// list without touching the network; so do request and parse
        /// failures, which are logged and swallowed.
        pub async fn search(&self, query: &str) -> Vec<GeocodeResult> {
            let query = query.trim();
            if query.chars().count() < MIN_QUERY_LEN {
                return Vec::new();
            }
            match self.request(query).await {
                Ok(results) => results,
                Err(err) => {
                    log::warn!("geocoding failed for {query:?}: {err}");
                    Vec::new()
                }
            }
        }

        async fn request(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
            let url = format!("{}/search", self.config.base_url);
            let limit = self.config.limit.to_string();
            let body = self
                .http
                .get(&url)
                .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
                .header(reqwest::header::USER_AGENT, &self.config.user_agent)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            Ok(parse_results(&body)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_payload() {
        let body = r#"[
            {"lat": "-23.55", "lon": "-46.63", "display_name": "São Paulo, Brazil"},
            {"lat": "oops", "lon": "-46.63", "display_name": "Broken entry"}
        ]"#;
        let results = parse_results(body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, -23.55);
        assert_eq!(results[0].display_name, "São Paulo, Brazil");
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_results("<html>503</html>").is_err());
    }

    #[tokio::test]
    async fn short_queries_short_circuit() {
        let geocoder = Geocoder::with_config(GeocodeConfig {
            // Unroutable on purpose; a short query must never get this far.
            base_url: "http://127.0.0.1:1".to_string(),
            ..GeocodeConfig::default()
        });
        assert!(geocoder.search("ab").await.is_empty());
        assert!(geocoder.search("  a  ").await.is_empty());
    }
}
