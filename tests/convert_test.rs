//! Conversion API integration tests
//!
//! Drives the full router with hand-built multipart bodies.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use pixforged::config::Config;
use pixforged::server::{create_router, AppContext};
use std::io::{Cursor, Read};
use tower::ServiceExt;

const BOUNDARY: &str = "pixforged-test-boundary";

fn test_app() -> Router {
    create_router(AppContext::new(Config::default()).unwrap())
}

fn test_app_with_config(config: Config) -> Router {
    create_router(AppContext::new(config).unwrap())
}

fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn jpeg_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// A 4x4 palette PNG whose first entry is fully transparent.
fn transparent_palette_png() -> Vec<u8> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, 4, 4);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(vec![0, 0, 0, 255, 128, 0]);
    encoder.set_trns(vec![0]);
    let mut writer = encoder.write_header().unwrap();
    writer
        .write_image_data(&[0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0])
        .unwrap();
    writer.finish().unwrap();
    out
}

/// A multipart part: (field name, optional filename, content).
type Part<'a> = (&'a str, Option<&'a str>, Vec<u8>);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn body_to_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Helper to get response body as string
async fn body_to_string(body: Body) -> String {
    String::from_utf8(body_to_bytes(body).await).unwrap()
}

fn assert_webp(data: &[u8]) {
    assert!(data.len() > 12);
    assert_eq!(&data[0..4], b"RIFF");
    assert_eq!(&data[8..12], b"WEBP");
}

// ============================================================================
// Form and health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_serves_upload_form() {
    let response = test_app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("action=\"/convert\""));
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert!(html.contains("name=\"images\""));
    assert!(html.contains("multiple"));
}

// ============================================================================
// Successful conversions
// ============================================================================

#[tokio::test]
async fn test_single_jpeg_returns_webp() {
    let response = test_app()
        .oneshot(upload_request(&[("images", Some("photo.jpg"), jpeg_bytes())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"photo.webp\""
    );

    let data = body_to_bytes(response.into_body()).await;
    assert_webp(&data);
}

#[tokio::test]
async fn test_uppercase_extension_is_accepted() {
    let response = test_app()
        .oneshot(upload_request(&[("images", Some("LOGO.PNG"), png_bytes())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"LOGO.webp\""
    );
}

#[tokio::test]
async fn test_palette_png_keeps_transparency() {
    let response = test_app()
        .oneshot(upload_request(&[(
            "images",
            Some("sprite.png"),
            transparent_palette_png(),
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");

    let data = body_to_bytes(response.into_body()).await;
    assert_webp(&data);
    let decoded = image::load_from_memory_with_format(&data, ImageFormat::WebP).unwrap();
    assert!(decoded.color().has_alpha());
    assert_eq!(decoded.to_rgba8().get_pixel(0, 0)[3], 0);
}

#[tokio::test]
async fn test_multiple_files_return_archive() {
    let response = test_app()
        .oneshot(upload_request(&[
            ("images", Some("a.png"), png_bytes()),
            ("images", Some("b.jpg"), jpeg_bytes()),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"converted_images.zip\""
    );

    let data = body_to_bytes(response.into_body()).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    assert_eq!(archive.len(), 2);

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["a.webp", "b.webp"]);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_webp(&contents);
    }
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let response = test_app()
        .oneshot(upload_request(&[
            ("note", None, b"hello".to_vec()),
            ("images", Some("photo.jpg"), jpeg_bytes()),
            ("other", Some("ignored.gif"), b"GIF89a".to_vec()),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
}

#[tokio::test]
async fn test_custom_upload_field() {
    let mut config = Config::default();
    config.conversion.upload_field = "files".into();

    let response = test_app_with_config(config)
        .oneshot(upload_request(&[("files", Some("photo.jpg"), jpeg_bytes())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Rejected uploads
// ============================================================================

#[tokio::test]
async fn test_invalid_extension_rejected() {
    let response = test_app()
        .oneshot(upload_request(&[
            ("images", Some("a.png"), png_bytes()),
            ("images", Some("anim.gif"), b"GIF89a".to_vec()),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: Invalid file format. Only JPG and PNG are allowed."));
    assert!(html.contains("<form"));
}

#[tokio::test]
async fn test_zero_byte_file_reports_corruption() {
    let response = test_app()
        .oneshot(upload_request(&[("images", Some("empty.png"), Vec::new())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("empty.png"));
    assert!(html.contains("appears to be corrupted or is not a readable image"));
}

#[tokio::test]
async fn test_corrupt_file_aborts_batch() {
    let response = test_app()
        .oneshot(upload_request(&[
            ("images", Some("a.png"), png_bytes()),
            ("images", Some("broken.jpg"), b"not really a jpeg".to_vec()),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("broken.jpg"));
}

#[tokio::test]
async fn test_missing_upload_field() {
    let response = test_app()
        .oneshot(upload_request(&[("note", None, b"hello".to_vec())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: No file part found."));
}

#[tokio::test]
async fn test_non_multipart_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: No file part found."));
}

#[tokio::test]
async fn test_empty_selection() {
    let response = test_app()
        .oneshot(upload_request(&[("images", Some(""), Vec::new())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: No files selected."));
}

#[tokio::test]
async fn test_upload_over_limit() {
    let mut config = Config::default();
    config.conversion.max_upload_bytes = 1024 * 1024;

    let response = test_app_with_config(config)
        .oneshot(upload_request(&[(
            "images",
            Some("huge.png"),
            vec![0u8; 2 * 1024 * 1024],
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: File too large. The maximum upload size is 1 MB."));
}

#[tokio::test]
async fn test_upload_over_sub_megabyte_limit() {
    let mut config = Config::default();
    config.conversion.max_upload_bytes = 64 * 1024;

    let response = test_app_with_config(config)
        .oneshot(upload_request(&[(
            "images",
            Some("big.png"),
            vec![0u8; 128 * 1024],
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: File too large. The maximum upload size is 64 KB."));
    assert!(!html.contains("0 MB"));
}

// ============================================================================
// Routing errors
// ============================================================================

#[tokio::test]
async fn test_get_convert_not_allowed() {
    let response = test_app()
        .oneshot(Request::get("/convert").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: Method not allowed."));
}

#[tokio::test]
async fn test_unknown_route() {
    let response = test_app()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Error: Page not found."));
}
