// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST client for the carrier shift endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use teslimat_core::traits::shift_api::ShiftApi;
use teslimat_core::{Position, ShiftId, ShiftRecord, TeslimatError};

/// HTTP client for the carrier surface of the delivery API.
///
/// The bearer credential is attached to every request; a 401 or 403 maps to
/// [`TeslimatError::AuthenticationRejected`].
pub struct CarrierApi {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionBody {
    latitude: f64,
    longitude: f64,
}

impl From<Position> for PositionBody {
    fn from(p: Position) -> Self {
        Self {
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShiftDto {
    shift_id: String,
    started_at: DateTime<Utc>,
    #[serde(default)]
    last_position: Option<PositionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionDto {
    latitude: f64,
    longitude: f64,
}

impl From<ShiftDto> for ShiftRecord {
    fn from(dto: ShiftDto) -> Self {
        Self {
            shift_id: ShiftId(dto.shift_id),
            started_at: dto.started_at,
            last_position: dto.last_position.map(|p| Position {
                latitude: p.latitude,
                longitude: p.longitude,
            }),
        }
    }
}

impl CarrierApi {
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

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn check_status(status: StatusCode, context: &str) -> Result<(), TeslimatError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(TeslimatError::AuthenticationRejected);
    }
    if !status.is_success() {
        return Err(TeslimatError::Api {
            message: format!("{context} returned status {status}"),
            source: None,
        });
    }
    Ok(())
}

fn transport_error(context: &str, e: reqwest::Error) -> TeslimatError {
    TeslimatError::Api {
        message: format!("{context} request failed"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl ShiftApi for CarrierApi {
    async fn start_shift(&self, position: Option<Position>) -> Result<ShiftRecord, TeslimatError> {
        let body = position.map(PositionBody::from);
        let response = self
            .http
            .post(self.url("shift/start"))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("shift start", e))?;
        check_status(response.status(), "shift start")?;
        let dto: ShiftDto = response
            .json()
            .await
            .map_err(|e| transport_error("shift start", e))?;
        debug!(shift_id = %dto.shift_id, "shift started");
        Ok(dto.into())
    }

    async fn end_shift(&self, position: Option<Position>) -> Result<(), TeslimatError> {
        let body = position.map(PositionBody::from);
        let response = self
            .http
            .post(self.url("shift/end"))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("shift end", e))?;
        check_status(response.status(), "shift end")
    }

    async fn current_shift(&self) -> Result<Option<ShiftRecord>, TeslimatError> {
        let response = self
            .http
            .get(self.url("shift/current"))
            .send()
            .await
            .map_err(|e| transport_error("current shift", e))?;
        if response.status() == StatusCode::NO_CONTENT
            || response.status() == StatusCode::NOT_FOUND
        {
            return Ok(None);
        }
        check_status(response.status(), "current shift")?;
        let dto: ShiftDto = response
            .json()
            .await
            .map_err(|e| transport_error("current shift", e))?;
        Ok(Some(dto.into()))
    }

    async fn put_location(&self, position: Position) -> Result<(), TeslimatError> {
        let response = self
            .http
            .put(self.url("shift/location"))
            .json(&PositionBody::from(position))
            .send()
            .await
            .map_err(|e| transport_error("location write", e))?;
        check_status(response.status(), "location write")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api_for(server: &MockServer) -> CarrierApi {
        CarrierApi::new(format!("{}/api/carrier", server.uri()), "test-token").unwrap()
    }

    #[tokio::test]
    async fn start_shift_posts_position_and_parses_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/carrier/shift/start"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({"latitude": 40.9650})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shiftId": "sh-42",
                "startedAt": "2026-08-23T09:00:00Z"
            })))
            .mount(&server)
            .await;

        let api = api_for(&server).await;
        let record = api
            .start_shift(Some(Position {
                latitude: 40.9650,
                longitude: 29.0800,
            }))
            .await
            .unwrap();
        assert_eq!(record.shift_id, ShiftId("sh-42".to_string()));
        assert!(record.last_position.is_none());
    }

    #[tokio::test]
    async fn refused_credential_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/carrier/shift/start"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = api_for(&server).await;
        assert!(matches!(
            api.start_shift(None).await,
            Err(TeslimatError::AuthenticationRejected)
        ));
    }

    #[tokio::test]
    async fn end_shift_posts_the_final_position() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/carrier/shift/end"))
            .and(body_partial_json(serde_json::json!({"longitude": 29.0860})))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let api = api_for(&server).await;
        api.end_shift(Some(Position {
            latitude: 40.9680,
            longitude: 29.0860,
        }))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn current_shift_no_content_means_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/carrier/shift/current"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let api = api_for(&server).await;
        assert!(api.current_shift().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_shift_parses_active_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/carrier/shift/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shiftId": "sh-7",
                "startedAt": "2026-08-23T08:30:00Z",
                "lastPosition": {"latitude": 40.97, "longitude": 29.09}
            })))
            .mount(&server)
            .await;

        let api = api_for(&server).await;
        let record = api.current_shift().await.unwrap().unwrap();
        assert_eq!(record.shift_id, ShiftId("sh-7".to_string()));
        assert_eq!(record.last_position.unwrap().longitude, 29.09);
    }

    #[tokio::test]
    async fn put_location_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/carrier/shift/location"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = api_for(&server).await;
        let result = api
            .put_location(Position {
                latitude: 40.9,
                longitude: 29.0,
            })
            .await;
        assert!(matches!(result, Err(TeslimatError::Api { .. })));
    }
}
