//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for source extraction and package generation.

use crate::artifact::{
    ArtifactKind, ClassOutline, InstructorGuide, QuickReferenceGuide, VideoScript,
};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::export::package_to_markdown;
use crate::generation::PackageGenerator;
use crate::ingest::{self, extract_documents, NotesOcr};
use crate::session::SessionContext;
use crate::speech::SpeechService;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    settings: Settings,
    session: Mutex<SessionContext>,
}

/// Build the API router for the given state.
fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/generate", post(generate))
        .route("/session", get(session_status))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        settings,
        session: Mutex::new(SessionContext::new()),
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Laere API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Upload sources", "POST /upload");
    Output::kv("Generate package", "POST /generate");
    Output::kv("Session status", "GET  /session");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    extracted_text: String,
    character_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    extracted_text: String,
    course_title: String,
    #[serde(default = "default_class_type")]
    class_type: String,
    #[serde(default)]
    openai_api_key: Option<String>,
}

fn default_class_type() -> String {
    "Full Class".to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    artifacts: ArtifactPayload,
    degraded: Vec<ArtifactKind>,
    markdown: BTreeMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactPayload {
    outline: ClassOutline,
    instructor_guide: InstructorGuide,
    video_script: VideoScript,
    quick_reference: QuickReferenceGuide,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    has_package: bool,
    degraded: Vec<ArtifactKind>,
    narration_files: usize,
    render_job: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Extract text from uploaded source files.
///
/// Multipart field names select the extraction path: `files` for documents,
/// `audio` for recordings, `notes` for note images. Text form fields
/// (`courseTitle`, `classType`) are accepted alongside the files and echoed
/// back; unrecognized fields are ignored.
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut audio: Vec<(String, Vec<u8>)> = Vec::new();
    let mut notes: Vec<(String, Vec<u8>)> = Vec::new();
    let mut course_title: Option<String> = None;
    let mut class_type: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed multipart request: {}", e),
                    }),
                )
                    .into_response()
            }
        };

        let kind = field.name().unwrap_or_default().to_string();
        let filename = field
            .file_name()
            .unwrap_or("unnamed")
            .to_string();
        let bytes = match field.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read field '{}': {}", filename, e),
                    }),
                )
                    .into_response()
            }
        };

        match kind.as_str() {
            "files" => files.push((filename, bytes)),
            "audio" => audio.push((filename, bytes)),
            "notes" => notes.push((filename, bytes)),
            "courseTitle" => {
                course_title = Some(String::from_utf8_lossy(&bytes).trim().to_string())
            }
            "classType" => class_type = Some(String::from_utf8_lossy(&bytes).trim().to_string()),
            _ => {}
        }
    }

    let document_text = extract_documents(&files);

    let transcript_text = if audio.is_empty() {
        String::new()
    } else {
        let speech = SpeechService::new(&state.settings.speech);
        speech.transcribe_batch(&audio).await
    };

    let notes_text = if notes.is_empty() {
        String::new()
    } else {
        let prompts = match Prompts::load(
            state.settings.prompts.custom_dir.as_deref(),
            Some(&state.settings.prompts.variables),
        ) {
            Ok(p) => p,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
        };
        let ocr = NotesOcr::new(&state.settings.notes.model, &prompts);
        ocr.transcribe_images(&notes).await
    };

    let extracted = ingest::aggregate(&document_text, &transcript_text, &notes_text);
    Json(UploadResponse {
        character_count: extracted.len(),
        extracted_text: extracted,
        course_title,
        class_type,
    })
    .into_response()
}

/// Generate the four-artifact package for previously extracted text.
async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    if req.course_title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "courseTitle must not be empty".to_string(),
            }),
        )
            .into_response();
    }
    if req.extracted_text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "extractedText must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let generator = match PackageGenerator::new(&state.settings, req.openai_api_key.as_deref()) {
        Ok(g) => g,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    let outcome = generator
        .build_package(&req.extracted_text, &req.course_title, &req.class_type)
        .await;

    let markdown: BTreeMap<String, String> =
        package_to_markdown(&outcome.package).into_iter().collect();
    let response = GenerateResponse {
        artifacts: ArtifactPayload {
            outline: outcome.package.outline.clone(),
            instructor_guide: outcome.package.instructor_guide.clone(),
            video_script: outcome.package.video_script.clone(),
            quick_reference: outcome.package.quick_reference.clone(),
        },
        degraded: outcome.degraded.clone(),
        markdown,
    };

    state.session.lock().await.store_outcome(outcome);

    Json(response).into_response()
}

/// Report the state of the server-side session.
async fn session_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(SessionResponse {
        has_package: session.has_package(),
        degraded: session.degraded.clone(),
        narration_files: session.narration.len(),
        render_job: session.render_job.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        router(Arc::new(AppState {
            settings: Settings::default(),
            session: Mutex::new(SessionContext::new()),
        }))
    }

    fn multipart_body(boundary: &str, parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{}\r\n", boundary));
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: text/plain\r\n\r\n",
                    name, f
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", boundary));
        body
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_accepts_files_and_form_fields() {
        let boundary = "laere-test-boundary";
        let body = multipart_body(
            boundary,
            &[
                ("files", Some("source.txt"), "Widgets are small mechanical parts."),
                ("courseTitle", None, "Intro to Widgets"),
                ("classType", None, "Full Class"),
            ],
        );

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["extractedText"]
            .as_str()
            .unwrap()
            .contains("Widgets are small mechanical parts."));
        assert_eq!(json["courseTitle"], "Intro to Widgets");
        assert_eq!(json["classType"], "Full Class");
    }

    #[tokio::test]
    async fn test_upload_ignores_unrecognized_fields() {
        let boundary = "laere-test-boundary";
        let body = multipart_body(
            boundary,
            &[
                ("files", Some("a.txt"), "doc text"),
                ("somethingElse", None, "ignored"),
            ],
        );

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_title() {
        let request = Request::builder()
            .method("POST")
            .uri("/generate")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"extractedText": "some text", "courseTitle": "  "}"#,
            ))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
