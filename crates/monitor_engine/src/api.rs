use std::time::Duration;

use futures_util::StreamExt;
use monitor_core::{InputSource, JobParameters, ProgressSnapshot};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_result_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_result_bytes: 16 * 1024 * 1024,
        }
    }
}

/// How `/start` answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartReply {
    Started,
    /// Any other JSON body, compact-encoded.
    Other(String),
}

/// The job server's polling API. Every call is one independent round-trip.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn start(&self, params: &JobParameters) -> Result<StartReply, ApiError>;

    async fn progress(&self) -> Result<ProgressSnapshot, ApiError>;

    async fn logs(&self) -> Result<Vec<String>, ApiError>;

    async fn result(&self) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ProgressBody {
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    running: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LogsBody {
    logs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Endpoints are joined relative to the base, so it must read as a directory.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, name: &str) -> Result<Url, ApiError> {
        self.base
            .join(name)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.endpoint(name)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

fn build_start_form(params: &JobParameters) -> Form {
    let form = match params.source() {
        InputSource::Url(url) => Form::new().text("input_url", url.clone()),
        InputSource::File(blob) => Form::new().part(
            "input_file",
            Part::bytes(blob.bytes.clone()).file_name(blob.file_name.clone()),
        ),
    };
    params
        .text_fields()
        .into_iter()
        .fold(form, |form, (name, value)| form.text(name, value))
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn start(&self, params: &JobParameters) -> Result<StartReply, ApiError> {
        let response = self
            .client
            .post(self.endpoint("start")?)
            .multipart(build_start_form(params))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // The server reports refusals as JSON with an error status; the body decides.
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;

        if value.get("status").and_then(serde_json::Value::as_str) == Some("started") {
            Ok(StartReply::Started)
        } else {
            Ok(StartReply::Other(value.to_string()))
        }
    }

    async fn progress(&self) -> Result<ProgressSnapshot, ApiError> {
        let body: ProgressBody = self.get_json("progress").await?;
        Ok(ProgressSnapshot::from_reported(body.progress, body.running))
    }

    async fn logs(&self) -> Result<Vec<String>, ApiError> {
        let body: LogsBody = self.get_json("logs").await?;
        Ok(body.logs)
    }

    async fn result(&self) -> Result<String, ApiError> {
        let response = self
            .client
            .get(self.endpoint("result")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_result_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "result too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "result too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
