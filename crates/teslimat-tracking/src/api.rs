// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST client for the tracking status endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;

use teslimat_core::traits::shift_api::TrackingApi;
use teslimat_core::{ShipmentId, TeslimatError, TrackingStatus};

/// HTTP client for the pharmacy surface of the delivery API.
pub struct TrackingClient {
    http: reqwest::Client,
    base_url: String,
}

impl TrackingClient {
    /// Builds a client rooted at `base_url` with a bearer credential.
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self, TeslimatError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| TeslimatError::AuthenticationRejected)?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TeslimatError::Api {
                message: "failed to build http client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TrackingApi for TrackingClient {
    async fn tracking_status(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<TrackingStatus, TeslimatError> {
        let url = format!("{}/tracking/{}/status", self.base_url, shipment_id.0);
        let response = self.http.get(url).send().await.map_err(|e| {
            TeslimatError::Api {
                message: "tracking status request failed".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TeslimatError::AuthenticationRejected);
        }
        if !status.is_success() {
            return Err(TeslimatError::Api {
                message: format!("tracking status returned status {status}"),
                source: None,
            });
        }

        response.json().await.map_err(|e| TeslimatError::Api {
            message: "tracking status body was malformed".to_string(),
            source: Some(Box::new(e)),
        })
    }
}
