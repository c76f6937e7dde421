use async_trait::async_trait;
use log::info;

use crate::errors::SpeechError;
use crate::speech::{SpeechPort, SpeechRequest};

/// Speech port that only logs what it would say
#[derive(Debug, Default)]
pub struct SilentSpeechPort;

#[async_trait]
impl SpeechPort for SilentSpeechPort {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        info!("[silent] {}", request.text);
        Ok(())
    }

    fn cancel(&self) {}

    fn name(&self) -> &str {
        "silent"
    }
}
