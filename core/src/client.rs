//! The GET/POST request pipeline.
//!
//! # Design
//! `FetchClient` owns only its `Transport` and carries no state between calls.
//! Each call is split into a pure `build_*` step that produces an
//! `HttpRequest`, the transport round-trip, and a pure `parse` step that
//! consumes the `HttpResponse`. GET and POST differ only in how the request
//! is built; everything after the round-trip is shared.

use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::{decode_body, encode_body};
use crate::config::{GetConfig, PostConfig, ResponseOptions};
use crate::content_type::ContentType;
use crate::error::{HttpError, RequestError};
use crate::http::{merge_headers, HttpMethod, HttpRequest, HttpResponse};
use crate::schema::{validate, Schema};
use crate::target::append_query;
use crate::transport::{ReqwestTransport, Transport};

/// Stateless client running the request pipeline over a `Transport`.
///
/// Calls are independent, so a single client can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct FetchClient<T = ReqwestTransport> {
    transport: T,
}

impl<T: Transport> FetchClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve the URL, append the query and set `Accept`.
    pub fn build_get<S: Schema, M>(&self, config: &GetConfig<S, M>) -> Result<HttpRequest, RequestError> {
        let mut url = config.target.resolve()?;
        append_query(&mut url, &config.query);
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: merge_headers(("Accept", config.content_type.mime()), &config.headers),
            body: None,
        })
    }

    /// Resolve the URL, encode the body and set `Content-Type`.
    pub fn build_post<B: Serialize, S: Schema, M>(
        &self,
        config: &PostConfig<B, S, M>,
    ) -> Result<HttpRequest, RequestError> {
        let url = config.target.resolve()?;
        let body = config
            .body
            .as_ref()
            .ok_or_else(|| RequestError::Configuration("Request body is required for POST".to_string()))?;
        let body = encode_body(body, config.content_type)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: merge_headers(("Content-Type", config.content_type.mime()), &config.headers),
            body: Some(body),
        })
    }

    /// Check the status, decode, validate and transform a response.
    pub fn parse<S: Schema>(
        &self,
        response: HttpResponse,
        content_type: ContentType,
        options: &ResponseOptions<S>,
    ) -> Result<S::Output, RequestError> {
        if !response.is_success() {
            return Err(HttpError::new(response.status, response.body).into());
        }
        let decoded = decode_body(&response.body, content_type)?;
        let validated = validate(&options.schema, decoded, options.safe_parse)?;
        match &options.parse_response {
            Some(map) => map(validated).map_err(RequestError::failed),
            None => Ok(validated),
        }
    }

    pub async fn get<S: Schema, M>(&self, config: GetConfig<S, M>) -> Result<S::Output, RequestError> {
        let request = self.build_get(&config)?;
        let response = self.round_trip(request).await?;
        self.parse(response, config.content_type, &config.response)
    }

    pub async fn post<B: Serialize, S: Schema, M>(
        &self,
        config: PostConfig<B, S, M>,
    ) -> Result<S::Output, RequestError> {
        let request = self.build_post(&config)?;
        let response = self.round_trip(request).await?;
        self.parse(response, config.content_type, &config.response)
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(RequestError::failed)?;

        if response.is_success() {
            debug!(%method, %url, status = response.status, "received response");
        } else {
            warn!(%method, %url, status = response.status, "non-success response");
        }
        Ok(response)
    }
}

/// Run a GET over a default `ReqwestTransport`.
pub async fn get<S: Schema, M>(config: GetConfig<S, M>) -> Result<S::Output, RequestError> {
    FetchClient::<ReqwestTransport>::default().get(config).await
}

/// Run a POST over a default `ReqwestTransport`.
pub async fn post<B: Serialize, S: Schema, M>(config: PostConfig<B, S, M>) -> Result<S::Output, RequestError> {
    FetchClient::<ReqwestTransport>::default().post(config).await
}
