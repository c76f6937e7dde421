/*!
 * Remote speech over HTTP.
 *
 * Posts `{"text": ..., "opts": {...}}` to a `/speak` endpoint and treats a
 * 2xx response as the end of the utterance.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::errors::SpeechError;
use crate::speech::{SpeechPort, SpeechRequest};

/// Body of a speak request
#[derive(Debug, Serialize)]
pub struct SpeakBody<'a> {
    pub text: &'a str,
    pub opts: SpeakOptions<'a>,
}

/// Voice parameters sent with the text
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakOptions<'a> {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<&'a str>,
}

impl<'a> SpeakBody<'a> {
    pub fn from_request(request: &'a SpeechRequest) -> Self {
        Self {
            text: &request.text,
            opts: SpeakOptions {
                rate: request.rate,
                pitch: request.pitch,
                volume: request.volume,
                language_code: &request.language_tag,
                voice_name: request.voice.as_deref(),
            },
        }
    }
}

/// Speech port backed by a remote endpoint
#[derive(Debug)]
pub struct HttpSpeechPort {
    client: Client,
    endpoint: String,
    cancel: Arc<Notify>,
}

impl HttpSpeechPort {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            error!("Failed to build HTTP client, using defaults: {}", e);
            Client::new()
        });
        Self {
            client,
            endpoint: endpoint.into(),
            cancel: Arc::new(Notify::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechPort for HttpSpeechPort {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        let request = request.normalized();
        if request.interrupt {
            self.cancel();
        }
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);

        debug!("POST {} ({} chars)", self.endpoint, request.text.len());
        let send = self
            .client
            .post(&self.endpoint)
            .json(&SpeakBody::from_request(&request))
            .send();

        tokio::select! {
            response = send => {
                let response = response.map_err(|e| SpeechError::RequestFailed(e.to_string()))?;
                let status = response.status();
                if status.is_success() {
                    Ok(())
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(SpeechError::RequestFailed(format!("{}: {}", status, body.trim())))
                }
            }
            _ = &mut cancelled => Err(SpeechError::Cancelled),
        }
    }

    fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    fn name(&self) -> &str {
        "http"
    }
}
