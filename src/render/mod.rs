//! Third-party avatar video rendering.
//!
//! Caller contract: submit a script once, then poll the job until it
//! reaches a terminal status or the configured timeout expires. Render jobs
//! routinely take minutes, so polling is bounded by an explicit deadline
//! rather than blocking indefinitely.

use crate::config::VideoRenderSettings;
use crate::error::{LaereError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

/// Status of a render job.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderStatus {
    /// The job is still being processed.
    Processing,
    /// The job finished; the video is available at `url`.
    Completed { url: String },
    /// The render service reported failure.
    Failed { error: Option<String> },
}

/// Client for the avatar video render API.
#[derive(Debug)]
pub struct RenderClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    width: u32,
    height: u32,
    poll_interval: std::time::Duration,
    timeout: std::time::Duration,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    data: Option<SubmitData>,
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct SubmitData {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(default)]
    data: Option<StatusData>,
}

#[derive(Deserialize, Serialize, Default)]
struct StatusData {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RenderClient {
    /// Create a render client from settings.
    ///
    /// Fails with a validation error when no API key is configured.
    pub fn new(settings: &VideoRenderSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .or_else(|| std::env::var("RENDER_API_KEY").ok())
            .ok_or_else(|| {
                LaereError::Validation(
                    "No render API key configured. Set video.api_key in the config file or the \
                     RENDER_API_KEY environment variable."
                        .to_string(),
                )
            })?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key,
            width: settings.width,
            height: settings.height,
            poll_interval: std::time::Duration::from_secs(settings.poll_interval_seconds),
            timeout: std::time::Duration::from_secs(settings.timeout_seconds),
        })
    }

    /// Submit a script for rendering. Returns the job id.
    #[instrument(skip(self, script_text), fields(avatar = %avatar_id, voice = %voice_id))]
    pub async fn submit(
        &self,
        script_text: &str,
        avatar_id: &str,
        voice_id: &str,
        background_color: &str,
    ) -> Result<String> {
        let payload = json!({
            "video_inputs": [{
                "character": {
                    "type": "avatar",
                    "avatar_id": avatar_id,
                    "avatar_style": "normal",
                },
                "voice": {
                    "type": "text",
                    "input_text": script_text,
                    "voice_id": voice_id,
                },
                "background": {
                    "type": "color",
                    "value": background_color,
                },
            }],
            "dimension": {"width": self.width, "height": self.height},
            "aspect_ratio": "16:9",
        });

        let response = self
            .http
            .post(format!("{}/v2/video/generate", self.api_base))
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LaereError::VideoRender(format!(
                "Submit failed: {} {}",
                status, body
            )));
        }

        let parsed: SubmitResponse = response.json().await?;
        let job_id = parsed
            .data
            .and_then(|d| d.video_id)
            .or(parsed.video_id)
            .ok_or_else(|| {
                LaereError::VideoRender("Submit response contained no video id".to_string())
            })?;

        info!("Submitted render job {}", job_id);
        Ok(job_id)
    }

    /// Poll the status of a render job once.
    #[instrument(skip(self))]
    pub async fn poll(&self, job_id: &str) -> Result<RenderStatus> {
        let response = self
            .http
            .get(format!("{}/v1/video_status.get", self.api_base))
            .header("x-api-key", &self.api_key)
            .query(&[("video_id", job_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LaereError::VideoRender(format!(
                "Status check failed: {} {}",
                status, body
            )));
        }

        let parsed: StatusResponse = response.json().await?;
        let data = parsed.data.unwrap_or_default();
        let status = interpret_status(&data);
        debug!("Render job {} status: {:?}", job_id, status);
        Ok(status)
    }

    /// Poll until the job reaches a terminal status, bounded by the
    /// configured timeout. Returns the video URL on completion.
    #[instrument(skip(self))]
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<String> {
        let deadline = tokio::time::Instant::now() + self.timeout;

        loop {
            match self.poll(job_id).await? {
                RenderStatus::Completed { url } => return Ok(url),
                RenderStatus::Failed { error } => {
                    return Err(LaereError::VideoRender(format!(
                        "Render job {} failed: {}",
                        job_id,
                        error.unwrap_or_else(|| "no error reported".to_string())
                    )));
                }
                RenderStatus::Processing => {}
            }

            if tokio::time::Instant::now() + self.poll_interval > deadline {
                return Err(LaereError::VideoRenderTimeout(self.timeout.as_secs()));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Map the wire status onto [`RenderStatus`]. Unknown statuses are treated
/// as still processing; a completed job without a video URL is a failure,
/// never an empty success.
fn interpret_status(data: &StatusData) -> RenderStatus {
    match data.status.as_deref() {
        Some("completed") => match data.video_url.clone().filter(|u| !u.trim().is_empty()) {
            Some(url) => RenderStatus::Completed { url },
            None => RenderStatus::Failed {
                error: Some("Render completed but no video URL was returned".to_string()),
            },
        },
        Some("failed") => RenderStatus::Failed {
            error: data.error.clone(),
        },
        _ => RenderStatus::Processing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_status() {
        let completed: StatusData = serde_json::from_str(
            r#"{"status": "completed", "video_url": "https://example.com/v.mp4"}"#,
        )
        .unwrap();
        assert_eq!(
            interpret_status(&completed),
            RenderStatus::Completed {
                url: "https://example.com/v.mp4".to_string()
            }
        );

        let failed: StatusData =
            serde_json::from_str(r#"{"status": "failed", "error": "bad avatar"}"#).unwrap();
        assert_eq!(
            interpret_status(&failed),
            RenderStatus::Failed {
                error: Some("bad avatar".to_string())
            }
        );

        let pending: StatusData = serde_json::from_str(r#"{"status": "processing"}"#).unwrap();
        assert_eq!(interpret_status(&pending), RenderStatus::Processing);

        let unknown = StatusData::default();
        assert_eq!(interpret_status(&unknown), RenderStatus::Processing);
    }

    #[test]
    fn test_completed_without_url_is_failure() {
        let no_url: StatusData = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert!(matches!(
            interpret_status(&no_url),
            RenderStatus::Failed { .. }
        ));

        let blank_url: StatusData =
            serde_json::from_str(r#"{"status": "completed", "video_url": "  "}"#).unwrap();
        assert!(matches!(
            interpret_status(&blank_url),
            RenderStatus::Failed { .. }
        ));
    }

    #[test]
    fn test_missing_api_key_is_validation_error() {
        let settings = VideoRenderSettings::default();
        if std::env::var("RENDER_API_KEY").is_ok() {
            return; // environment already configured, nothing to assert
        }
        let err = RenderClient::new(&settings).unwrap_err();
        assert!(matches!(err, LaereError::Validation(_)));
    }
}
