//! HTTP client for an ArcGIS MapServer layer query endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::response::{flatten_features, AttributeKeys, FeatureSet};
use crate::error::{HarvestError, Result};
use crate::models::{Envelope, PoiRecord};
use crate::pipeline::PoiSource;

/// NSW Spatial Services points of interest layer
const NSW_POI_ENDPOINT: &str =
    "https://maps.six.nsw.gov.au/arcgis/rest/services/public/NSW_POI/MapServer/0/query";

/// GDA94 geographic
const GDA94_WKID: u32 = 4283;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    /// Spatial reference of the query envelope
    pub in_sr: u32,
    /// Spatial reference of returned geometries
    pub out_sr: u32,
    pub timeout_secs: u64,
    /// Pause after every request
    pub delay_ms: u64,
    pub attributes: AttributeKeys,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: NSW_POI_ENDPOINT.to_string(),
            in_sr: GDA94_WKID,
            out_sr: GDA94_WKID,
            timeout_secs: 30,
            delay_ms: 1000,
            attributes: AttributeKeys::default(),
        }
    }
}

impl ServiceConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Envelope queries against one feature layer
pub struct ArcGisClient {
    client: Client,
    endpoint: Url,
    config: ServiceConfig,
}

impl ArcGisClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = Client::builder()
            .user_agent(concat!("poi-harvest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Full query URL for every feature intersecting `envelope`
    pub fn build_query_url(&self, envelope: &Envelope) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("where", "1=1")
            .append_pair("geometry", &envelope.to_string())
            .append_pair("geometryType", "esriGeometryEnvelope")
            .append_pair("spatialRel", "esriSpatialRelIntersects")
            .append_pair("inSR", &self.config.in_sr.to_string())
            .append_pair("outFields", "*")
            .append_pair("outSR", &self.config.out_sr.to_string())
            .append_pair("f", "json");
        url
    }

    /// Run one envelope query. Non-success statuses and service errors fail.
    pub async fn fetch_features(&self, envelope: &Envelope) -> Result<FeatureSet> {
        let url = self.build_query_url(envelope);
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                status,
                url: url.to_string(),
            });
        }

        let mut set: FeatureSet = response.json().await?;

        if let Some(err) = set.error.take() {
            return Err(HarvestError::Service {
                code: err.code,
                message: err.message,
            });
        }

        if set.exceeded_transfer_limit {
            warn!(
                "Transfer limit exceeded for envelope {}; only {} features returned",
                envelope,
                set.features.len()
            );
        }

        Ok(set)
    }
}

impl PoiSource for ArcGisClient {
    async fn fetch(&self, area_code: &str, envelope: &Envelope) -> Result<Vec<PoiRecord>> {
        let set = self.fetch_features(envelope).await?;
        Ok(flatten_features(&set, area_code, &self.config.attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/arcgis/rest/services/public/NSW_POI/MapServer/0/query", addr)
    }

    fn client_for(endpoint: String) -> ArcGisClient {
        ArcGisClient::new(ServiceConfig {
            endpoint,
            timeout_secs: 5,
            delay_ms: 0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_query_url_parameters() {
        let client = ArcGisClient::new(ServiceConfig::default()).unwrap();
        let url = client.build_query_url(&Envelope::new(151.25, -33.5, 151.5, -33.25));

        assert_eq!(url.host_str(), Some("maps.six.nsw.gov.au"));
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(params["where"], "1=1");
        assert_eq!(params["geometry"], "151.25,-33.5,151.5,-33.25");
        assert_eq!(params["geometryType"], "esriGeometryEnvelope");
        assert_eq!(params["spatialRel"], "esriSpatialRelIntersects");
        assert_eq!(params["inSR"], "4283");
        assert_eq!(params["outFields"], "*");
        assert_eq!(params["outSR"], "4283");
        assert_eq!(params["f"], "json");
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = ArcGisClient::new(ServiceConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(HarvestError::Url(_))));
    }

    #[tokio::test]
    async fn test_fetch_flattens_features() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"features":[{"attributes":{"NAME":"ERINA FAIR","CATEGORY":"Shopping"},"geometry":{"x":151.39,"y":-33.43}}]}"#,
        )
        .await;
        let client = client_for(endpoint);

        let records = client
            .fetch("102011037", &Envelope::new(151.3, -33.5, 151.4, -33.4))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("ERINA FAIR"));
        assert_eq!(records[0].sa2_code, "102011037");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let endpoint = serve_once("503 Service Unavailable", "{}").await;
        let client = client_for(endpoint);

        let err = client
            .fetch_features(&Envelope::new(151.3, -33.5, 151.4, -33.4))
            .await
            .unwrap_err();

        match err {
            HarvestError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_transfer_limit_keeps_features() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"exceededTransferLimit":true,"features":[{"attributes":{"NAME":"THE ENTRANCE"},"geometry":{"x":151.5,"y":-33.34}},{"attributes":{"NAME":"LONG JETTY"},"geometry":{"x":151.48,"y":-33.36}}]}"#,
        )
        .await;
        let client = client_for(endpoint);

        let set = client
            .fetch_features(&Envelope::new(151.4, -33.4, 151.6, -33.3))
            .await
            .unwrap();

        assert!(set.exceeded_transfer_limit);
        assert_eq!(set.features.len(), 2);
    }

    #[tokio::test]
    async fn test_error_body_is_error() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"error":{"code":400,"message":"Invalid or missing input parameters.","details":[]}}"#,
        )
        .await;
        let client = client_for(endpoint);

        let err = client
            .fetch_features(&Envelope::new(151.3, -33.5, 151.4, -33.4))
            .await
            .unwrap_err();

        assert!(matches!(err, HarvestError::Service { code: 400, .. }));
    }
}
