//! HTTP client for the Socrata (SODA) tree census endpoint.

use super::source::RecordSource;
use super::types::CountQuery;
use crate::parser::{parse_records, CountRecord};
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::ProviderError;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde_json::Value;

/// Header carrying the Socrata application token
const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Blocking client for grouped-count queries
pub struct CensusClient {
    client: Client,
    endpoint: String,
    app_token: Option<String>,
}

impl CensusClient {
    /// Create a new census client
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(ProviderError::RequestFailed)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            app_token: None,
        })
    }

    pub fn with_app_token(mut self, token: Option<String>) -> Self {
        self.app_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Run a grouped-count query and return the raw JSON body
    pub fn query(&self, query: &CountQuery) -> Result<Value, ProviderError> {
        info!(
            "Querying {} for {} ({:?} mode)",
            self.endpoint, query.borough, query.mode
        );

        let params = query.to_params();
        debug!("SoQL params: {:?}", params);

        let mut request = self.client.get(&self.endpoint).query(&params);
        if let Some(token) = &self.app_token {
            request = request.header(APP_TOKEN_HEADER, token);
        }

        let response = request.send().map_err(ProviderError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: Value = response.json().map_err(ProviderError::RequestFailed)?;

        if let Some(rows) = body.as_array() {
            debug!("Provider returned {} rows", rows.len());
            if rows.len() >= query.limit {
                warn!(
                    "Response reached the row limit ({}); results may be truncated",
                    query.limit
                );
            }
        }

        Ok(body)
    }
}

impl RecordSource for CensusClient {
    fn fetch(&self, query: &CountQuery) -> Result<Vec<CountRecord>, ProviderError> {
        let raw = self.query(query)?;
        parse_records(&raw, query.mode)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Borough, PipelineMode};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_blank_app_token_is_ignored() {
        let client = CensusClient::new("https://example.org/resource/x.json")
            .unwrap()
            .with_app_token(Some("  ".to_string()));
        assert!(client.app_token.is_none());
    }

    /// Serve one canned HTTP response on an ephemeral local port
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{}/resource/x.json", addr)
    }

    fn bronx_query() -> CountQuery {
        CountQuery::new(Borough::Bronx, PipelineMode::Simple, 10)
    }

    #[test]
    fn test_unreachable_endpoint_is_unavailable() {
        // Bind then release a port so nothing is listening on it
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = CensusClient::new(format!("http://{}/resource/x.json", addr)).unwrap();

        let err = client.fetch(&bronx_query()).unwrap_err();
        assert!(matches!(err, ProviderError::RequestFailed(_)));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_error_status_maps_to_http_status() {
        let endpoint = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\nConnection: close\r\n\r\nbusy",
        );
        let client = CensusClient::new(endpoint).unwrap();

        match client.fetch(&bronx_query()).unwrap_err() {
            ProviderError::HttpStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "busy");
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_success_body_is_parsed() {
        let endpoint = serve_once(concat!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 81\r\n",
            "Connection: close\r\n\r\n",
            r#"[{"boroname":"Bronx","spc_common":"ginkgo","health":"Good","count_tree_id":"12"}]"#,
        ));
        let client = CensusClient::new(endpoint).unwrap();

        let records = client.fetch(&bronx_query()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 12);
    }
}
