//! Custom protocol handlers for efficient data transfer
//!
//! This module implements the `frame://` custom protocol for direct binary
//! transfer of render frames, bypassing Tauri's IPC JSON serialization.
//! The label and session snapshots ride along so the overlay can poll them
//! at frame rate.

use image::{codecs::jpeg::JpegEncoder, ImageBuffer, ImageEncoder, Rgba};
use serde::Serialize;
use tauri::http::Response as HttpResponse;

use super::shared_state::{SharedFrameBuffer, SharedLabels, SharedPerfStats, SharedSession};
use crate::config::{compression::JPEG_QUALITY, RENDER_HEIGHT, RENDER_WIDTH};

type Response = HttpResponse<Vec<u8>>;

/// Everything the protocol can serve
#[derive(Clone)]
pub struct ProtocolState {
    pub frame_buffer: SharedFrameBuffer,
    pub perf_stats: SharedPerfStats,
    pub session: SharedSession,
    pub labels: SharedLabels,
}

/// Handle requests to the custom `frame://` protocol
///
/// Supported endpoints:
/// - `frame` or `frame.jpg`: JPEG-compressed frame (~50-100KB)
/// - `frame.raw`: Raw RGBA frame (~3.5MB)
/// - `stats`: Performance statistics as JSON
/// - `labels`: Label placements as JSON
/// - `session`: Camera mode and selection as JSON
pub fn handle_frame_protocol(uri_path: &str, state: &ProtocolState) -> Response {
    let resource = uri_path.trim_start_matches('/');

    log::trace!("[Protocol] Resolved resource: {}", resource);

    match resource {
        // JPEG compressed frame - much smaller data size!
        "frame" | "frame.jpg" => handle_jpeg_frame(&state.frame_buffer),

        // Raw RGBA frame (for comparison/debugging)
        "frame.raw" => handle_raw_frame(&state.frame_buffer),

        "stats" => match state.perf_stats.0.lock() {
            Ok(guard) => json_response(&*guard),
            Err(_) => text_response(500, "Stats unavailable"),
        },
        "labels" => match state.labels.0.lock() {
            Ok(guard) => json_response(&*guard),
            Err(_) => text_response(500, "Labels unavailable"),
        },
        "session" => match state.session.0.lock() {
            Ok(guard) => json_response(&*guard),
            Err(_) => text_response(500, "Session unavailable"),
        },

        _ => text_response(404, "Not Found"),
    }
}

/// Handle JPEG-compressed frame request
fn handle_jpeg_frame(buffer: &SharedFrameBuffer) -> Response {
    let rgba_data = match buffer.0.lock() {
        Ok(guard) => match &*guard {
            Some(rgba_data) => rgba_data.clone(),
            None => return text_response(503, "Frame not ready"),
        },
        Err(_) => return text_response(500, "Frame buffer unavailable"),
    };

    match encode_jpeg(rgba_data, RENDER_WIDTH, RENDER_HEIGHT) {
        Some(jpeg_data) => frame_response("image/jpeg", jpeg_data),
        None => text_response(500, "Frame encoding failed"),
    }
}

/// Compress RGBA to JPEG - reduces ~3.5MB to ~100KB
fn encode_jpeg(rgba_data: Vec<u8>, width: u32, height: u32) -> Option<Vec<u8>> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, rgba_data)?;

    // Convert RGBA to RGB for JPEG (no alpha channel)
    let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut jpeg_data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY);
    if let Err(err) = encoder.write_image(
        rgb_img.as_raw(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    ) {
        log::warn!("[Protocol] JPEG encoding failed: {}", err);
        return None;
    }
    Some(jpeg_data)
}

/// Handle raw RGBA frame request
fn handle_raw_frame(buffer: &SharedFrameBuffer) -> Response {
    match buffer.0.lock() {
        Ok(guard) => match &*guard {
            Some(rgba_data) => frame_response("application/octet-stream", rgba_data.clone()),
            None => text_response(503, "Frame not ready"),
        },
        Err(_) => text_response(500, "Frame buffer unavailable"),
    }
}

fn frame_response(content_type: &str, body: Vec<u8>) -> Response {
    HttpResponse::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("X-Frame-Width", RENDER_WIDTH.to_string())
        .header("X-Frame-Height", RENDER_HEIGHT.to_string())
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Expose-Headers",
            "X-Frame-Width, X-Frame-Height",
        )
        .body(body)
        .unwrap_or_else(|_| HttpResponse::new(Vec::new()))
}

fn json_response<T: Serialize + ?Sized>(value: &T) -> Response {
    let json = serde_json::to_vec(value).unwrap_or_default();

    HttpResponse::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(json)
        .unwrap_or_else(|_| HttpResponse::new(Vec::new()))
}

fn text_response(status: u16, message: &str) -> Response {
    HttpResponse::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Access-Control-Allow-Origin", "*")
        .body(message.as_bytes().to_vec())
        .unwrap_or_else(|_| HttpResponse::new(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tauri_bridge::shared_state::LabelSnapshot;

    fn state() -> ProtocolState {
        ProtocolState {
            frame_buffer: SharedFrameBuffer::default(),
            perf_stats: SharedPerfStats::default(),
            session: SharedSession::default(),
            labels: SharedLabels::default(),
        }
    }

    #[test]
    fn frame_is_unavailable_before_first_render() {
        let response = handle_frame_protocol("/frame", &state());
        assert_eq!(response.status(), 503);
    }

    #[test]
    fn unknown_resources_are_not_found() {
        let response = handle_frame_protocol("/nope", &state());
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn labels_are_served_as_json() {
        let state = state();
        state.labels.0.lock().unwrap().push(LabelSnapshot {
            text: "Earth".into(),
            color: "#6b93d6".into(),
            x: 10.0,
            y: 20.0,
            width: 64.0,
            opacity: 1.0,
            visible: true,
        });

        let response = handle_frame_protocol("/labels", &state);
        assert_eq!(response.status(), 200);
        let labels: Vec<LabelSnapshot> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(labels[0].text, "Earth");
    }

    #[test]
    fn raw_frame_is_returned_verbatim() {
        let state = state();
        *state.frame_buffer.0.lock().unwrap() = Some(vec![1, 2, 3, 4]);
        let response = handle_frame_protocol("frame.raw", &state);
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), &vec![1, 2, 3, 4]);
    }

    #[test]
    fn jpeg_encoding_rejects_short_buffers() {
        assert!(encode_jpeg(vec![0; 8], 4, 4).is_none());
        assert!(encode_jpeg(vec![128; 4 * 4 * 4], 4, 4).is_some());
    }
}
