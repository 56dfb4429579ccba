//! Frame extraction system
//!
//! Takes the latest frame the render world copied back, strips the GPU row
//! padding and publishes tightly packed RGBA to the shared frame buffer.

use bevy::{prelude::*, render::renderer::RenderDevice, time::Time};
use std::time::Instant;

use crate::bevy::resources::{
    FrameBufferRes, FrameCount, FrameRateLimiter, FrameTimings, MainWorldReceiver, PerfStatsRes,
    PreRollFrames,
};
use crate::config::{performance::*, RENDER_HEIGHT, RENDER_WIDTH};

/// Extract and process frame data from the render pipeline
#[allow(clippy::too_many_arguments)]
pub fn extract_and_process_frame(
    receiver: Res<MainWorldReceiver>,
    buffer: Option<Res<FrameBufferRes>>,
    perf_stats: Option<Res<PerfStatsRes>>,
    mut count: ResMut<FrameCount>,
    mut pre_roll: ResMut<PreRollFrames>,
    mut timings: ResMut<FrameTimings>,
    mut frame_limiter: ResMut<FrameRateLimiter>,
    time: Res<Time>,
) {
    let Some(buffer) = buffer else { return };

    // Let textures and the scene settle before publishing anything
    if pre_roll.0 > 0 {
        while receiver.try_recv().is_ok() {}
        pre_roll.0 -= 1;
        if pre_roll.0 % 10 == 0 && pre_roll.0 > 0 {
            log::debug!("[Bevy] Pre-roll frames remaining: {}", pre_roll.0);
        }
        return;
    }

    let now = Instant::now();
    if now.duration_since(frame_limiter.last_frame_time) < frame_limiter.min_frame_interval {
        // Too early for the next frame; drop what arrived
        while receiver.try_recv().is_ok() {}
        return;
    }
    frame_limiter.last_frame_time = now;

    // Only the newest frame matters
    let Some(image_data) = receiver.try_iter().last() else {
        return;
    };
    let receive_ms = elapsed_ms(now);

    let process_start = Instant::now();
    let Some(rgba) = remove_row_padding(&image_data, RENDER_WIDTH, RENDER_HEIGHT) else {
        return;
    };
    let process_ms = elapsed_ms(process_start);
    let data_size_kb = rgba.len() as f64 / 1024.0;

    let Ok(mut guard) = buffer.0 .0.lock() else {
        return;
    };
    *guard = Some(rgba);
    drop(guard);

    count.0 += 1;
    let total_ms = elapsed_ms(now);
    timings.record(total_ms, FRAME_TIMING_SAMPLES);

    if let Some(perf_res) = &perf_stats {
        if let Ok(mut stats) = perf_res.0 .0.lock() {
            stats.gpu_transfer_ms = receive_ms;
            stats.data_processing_ms = process_ms;
            stats.frame_encoding_ms = total_ms;
            stats.frame_count = count.0;
            stats.data_size_kb = data_size_kb;
            stats.bevy_fps = timings.fps();
        }
    }

    let current_time = time.elapsed_secs_f64();
    if current_time - timings.last_print_time >= STATS_PRINT_INTERVAL {
        let (min_ms, max_ms) = timings.range_ms();
        log::info!(
            "[Bevy] Frame {} | Receive: {:.2}ms | Process: {:.2}ms | Total: {:.2}ms | Avg: {:.2}ms (Min: {:.2}ms, Max: {:.2}ms) | Size: {:.1}KB",
            count.0,
            receive_ms,
            process_ms,
            total_ms,
            timings.average_ms(),
            min_ms,
            max_ms,
            data_size_kb
        );
        timings.last_print_time = current_time;
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

/// Remove GPU buffer row padding alignment, returning pure RGBA data
fn remove_row_padding(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let row_bytes = width as usize * 4;
    strip_padding(
        data,
        row_bytes,
        RenderDevice::align_copy_bytes_per_row(row_bytes),
        height as usize,
    )
}

fn strip_padding(
    data: &[u8],
    row_bytes: usize,
    aligned_row_bytes: usize,
    height: usize,
) -> Option<Vec<u8>> {
    if data.is_empty() || aligned_row_bytes == 0 {
        return None;
    }

    let rgba_data = if row_bytes == aligned_row_bytes {
        // No padding, return as-is
        data.to_vec()
    } else {
        // Remove padding from each row
        data.chunks(aligned_row_bytes)
            .take(height)
            .flat_map(|row| &row[..row_bytes.min(row.len())])
            .cloned()
            .collect()
    };

    Some(rgba_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_dropped_per_row() {
        // Two rows of one pixel, padded to 8 bytes
        let data = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        let rgba = strip_padding(&data, 4, 8, 2).unwrap();
        assert_eq!(rgba, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn unpadded_rows_pass_through() {
        let data = [9u8; 16];
        assert_eq!(strip_padding(&data, 8, 8, 2).unwrap(), data.to_vec());
    }

    #[test]
    fn empty_frames_are_skipped() {
        assert!(strip_padding(&[], 4, 8, 2).is_none());
    }
}
