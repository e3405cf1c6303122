//! Conversion between per-frame durations and descriptor frame rates

/// Frame duration used when neither a rate nor an override is available
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Converts a frame duration into a whole frame rate, `round(1000 / duration)`
///
/// Never returns less than 1 fps.
pub fn rate_from_duration(duration_ms: u32) -> u32 {
    let duration_ms = duration_ms.max(1) as f64;
    ((1000.0 / duration_ms).round() as u32).max(1)
}

/// Converts a frame rate into a frame duration, `round(1000 / rate)`
///
/// Never returns less than 1ms.
pub fn duration_from_rate(rate: u32) -> u32 {
    let rate = rate.max(1) as f64;
    ((1000.0 / rate).round() as u32).max(1)
}

/// Resolves the frame duration applied to every frame of an unpacked bundle
///
/// An explicit override wins, then the descriptor's rate, then `fallback_ms`.
pub fn resolve_duration(
    override_fps: Option<u32>,
    descriptor_rate: Option<u32>,
    fallback_ms: u32,
) -> u32 {
    override_fps
        .filter(|fps| *fps > 0)
        .or(descriptor_rate.filter(|rate| *rate > 0))
        .map(duration_from_rate)
        .unwrap_or(fallback_ms.max(1))
}
