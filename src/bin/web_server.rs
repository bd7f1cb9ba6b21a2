//! Web server for the image steganography API
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin web_server -- --config config/stego.toml
//! curl -F image=@cover.png -F message="Secret" http://127.0.0.1:3000/api/embed
//! curl -F image=@stego.png http://127.0.0.1:3000/api/extract
//! ```

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;

use lsb_stego::common::config::{StegoConfig, WebConfig};
use lsb_stego::common::logging::init_logger;
use lsb_stego::processing::{embed_text_image, extract_text_image};
use lsb_stego::StegoError;

/// Command-line arguments for the web server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct EmbedResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    carrier_image_base64: Option<String>,
}

#[derive(Serialize)]
struct ExtractResponse {
    success: bool,
    message: String,
    text: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Fields of a multipart upload.
#[derive(Default)]
struct Upload {
    image: Option<(String, Vec<u8>)>,
    message: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = StegoConfig::load(args.config.as_deref())?;
    init_logger(config.logging.level_filter()?);

    info!("🚀 Initializing web server...");

    let app = router(&config.web);

    let addr = config.web.address.as_str();
    info!("🌐 Web server running on http://{}", addr);
    info!("📡 API endpoints: http://{0}/api/embed, http://{0}/api/extract", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(config: &WebConfig) -> Router {
    Router::new()
        .route("/api/embed", post(embed_handler))
        .route("/api/extract", post(extract_handler))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "steganography-api",
        "scheme": "lsb-delimiter"
    }))
}

async fn embed_handler(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    let (filename, image) = upload
        .image
        .ok_or_else(|| bad_request("No image provided"))?;
    let text = upload
        .message
        .ok_or_else(|| bad_request("No message provided"))?;

    info!(
        "📤 Received cover image: {} ({} bytes), message of {} characters",
        filename,
        image.len(),
        text.chars().count()
    );

    // Image decoding and pixel work are CPU-bound.
    let carrier = tokio::task::spawn_blocking(move || {
        let img = decode_upload(&image)?;
        embed_text_image(img, &text).map_err(map_error)
    })
    .await
    .map_err(|e| internal_error(format!("Embedding task failed: {}", e)))?
    .map_err(|(status, body)| {
        error!("❌ Embedding failed: {}", body.error);
        (status, body)
    })?;

    info!("✅ Embedding complete! Carrier size: {} bytes", carrier.len());
    Ok((
        StatusCode::OK,
        Json(EmbedResponse {
            success: true,
            message: format!("Successfully embedded message into {}", filename),
            carrier_image_base64: Some(general_purpose::STANDARD.encode(&carrier)),
        }),
    ))
}

async fn extract_handler(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    let (filename, image) = upload
        .image
        .ok_or_else(|| bad_request("No image provided"))?;

    info!("📥 Received stego image: {} ({} bytes)", filename, image.len());

    let text = tokio::task::spawn_blocking(move || {
        let img = decode_upload(&image)?;
        extract_text_image(img).map_err(map_error)
    })
    .await
    .map_err(|e| internal_error(format!("Extraction task failed: {}", e)))?
    .map_err(|(status, body)| {
        error!("❌ Extraction failed: {}", body.error);
        (status, body)
    })?;

    info!("✅ Extracted {} characters", text.chars().count());
    Ok((
        StatusCode::OK,
        Json(ExtractResponse {
            success: true,
            message: format!("Successfully extracted message from {}", filename),
            text,
        }),
    ))
}

/// Undecodable uploads are the client's fault.
fn decode_upload(bytes: &[u8]) -> Result<image::DynamicImage, ApiError> {
    image::load_from_memory(bytes)
        .map_err(|e| bad_request(format!("Failed to decode image: {}", e)))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("image.png").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read image data: {}", e)))?;
                upload.image = Some((filename, data.to_vec()));
            }
            "message" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read message: {}", e)))?;
                upload.message = Some(text);
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Payload problems are the caller's fault; anything else is ours.
///
/// Input decoding happens before this in [`decode_upload`], so an
/// `image::ImageError` reaching here comes from encoding the result.
fn map_error(e: anyhow::Error) -> ApiError {
    let status = match e.downcast_ref::<StegoError>() {
        Some(StegoError::CapacityExceeded { .. })
        | Some(StegoError::UnsupportedCharacter { .. })
        | Some(StegoError::ReservedCharacter { .. })
        | Some(StegoError::DelimiterNotFound { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(StegoError::InvariantViolation { .. }) | None => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: format!("{:#}", e),
        }),
    )
}

fn bad_request(error: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn internal_error(error: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use axum::body::Body;
    use axum::http::{header, Request};
    use image::{ImageFormat, Rgb, RgbImage};
    use tower::ServiceExt;

    const BOUNDARY: &str = "stego-test-boundary";

    fn cover_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0x80]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn multipart_body(image: Option<&[u8]>, message: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(image) = image {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cover.png\"\r\nContent-Type: image/png\r\n\r\n",
                    BOUNDARY
                )
                .as_bytes(),
            );
            body.extend_from_slice(image);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(message) = message {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\n{}\r\n",
                    BOUNDARY, message
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn post(uri: &str, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let response = router(&WebConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_payload_errors_map_to_unprocessable() {
        let payload_errors = [
            StegoError::CapacityExceeded {
                required: 56,
                available: 48,
            },
            StegoError::DelimiterNotFound { scanned: 192 },
            StegoError::UnsupportedCharacter {
                ch: '€',
                position: 0,
            },
            StegoError::ReservedCharacter { position: 3 },
        ];
        for err in payload_errors {
            let (status, body) = map_error(anyhow::Error::new(err.clone()).context("Embedding"));
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{:?}", err);
            assert!(body.error.contains(&err.to_string()));
        }
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let (status, _) = map_error(StegoError::InvariantViolation { index: 4, value: 2 }.into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let encode_failure: anyhow::Result<()> = Err(image::ImageError::Limits(
            image::error::LimitError::from_kind(image::error::LimitErrorKind::InsufficientMemory),
        ))
        .context("Failed to encode stego image as PNG");
        let (status, _) = map_error(encode_failure.unwrap_err());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = map_error(anyhow::anyhow!("disk on fire"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_undecodable_upload_is_bad_request() {
        let (status, body) = decode_upload(b"definitely not an image").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Failed to decode image"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(&WebConfig::default())
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_embed_then_extract() {
        let cover = cover_png(16, 16);
        let (status, body) = post(
            "/api/embed",
            multipart_body(Some(cover.as_slice()), Some("This is my secret message!")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let carrier = general_purpose::STANDARD
            .decode(body["carrier_image_base64"].as_str().unwrap())
            .unwrap();
        let (status, body) = post("/api/extract", multipart_body(Some(carrier.as_slice()), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "This is my secret message!");
    }

    #[tokio::test]
    async fn test_embed_too_large_is_unprocessable() {
        // 2x2 RGB = 12 samples, not even room for the delimiter.
        let cover = cover_png(2, 2);
        let (status, body) = post("/api/embed", multipart_body(Some(cover.as_slice()), Some("Hi"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn test_embed_bad_uploads() {
        let (status, _) = post(
            "/api/embed",
            multipart_body(Some(&b"not an image"[..]), Some("Hi")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post("/api/embed", multipart_body(Some(cover_png(8, 8).as_slice()), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No message provided");

        let (status, body) = post("/api/extract", multipart_body(None, Some("Hi"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No image provided");
    }

    #[tokio::test]
    async fn test_extract_clean_image_is_unprocessable() {
        let (status, body) = post("/api/extract", multipart_body(Some(cover_png(8, 8).as_slice()), None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("No embedded message"));
    }
}
