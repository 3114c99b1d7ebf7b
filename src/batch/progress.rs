//! Progress aggregation.
//!
//! Pure functions that convert per-clip fractional progress into the
//! overall batch percentage. Kept free of subprocess plumbing so they can
//! be unit-tested in isolation.

/// Clamp a raw progress unit from the extractor to `[0, 100]`.
///
/// The external tool is not trusted to emit bounded or monotonic values.
pub fn clamp_clip_progress(raw: u32) -> u8 {
    raw.min(100) as u8
}

/// Overall batch percentage for clip `clip_index` (0-based) at
/// `clip_progress` percent, out of `total_clips`.
///
/// `overall = round(((clip_index + clip_progress/100) / total_clips) * 100)`
///
/// Precondition: `total_clips >= 1` and `clip_index <= total_clips`.
pub fn overall_progress(clip_index: usize, clip_progress: u8, total_clips: usize) -> u8 {
    debug_assert!(total_clips >= 1);
    debug_assert!(clip_index <= total_clips);

    let clip_fraction = f64::from(clip_progress.min(100)) / 100.0;
    let overall = ((clip_index as f64 + clip_fraction) / total_clips as f64) * 100.0;
    overall.round().min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halfway_through_second_of_four() {
        // round(((1 + 0.5) / 4) * 100) = 38
        assert_eq!(overall_progress(1, 50, 4), 38);
    }

    #[test]
    fn batch_boundaries() {
        assert_eq!(overall_progress(0, 0, 3), 0);
        assert_eq!(overall_progress(2, 100, 3), 100);
        assert_eq!(overall_progress(3, 0, 3), 100);
    }

    #[test]
    fn single_clip_tracks_clip_progress() {
        assert_eq!(overall_progress(0, 0, 1), 0);
        assert_eq!(overall_progress(0, 37, 1), 37);
        assert_eq!(overall_progress(0, 100, 1), 100);
    }

    #[test]
    fn rounding_is_half_up() {
        // (0 + 0.125) / 1 * 100 = 12.5 -> 13
        assert_eq!(overall_progress(0, 13, 2), 7); // 6.5 -> 7
        assert_eq!(overall_progress(0, 12, 2), 6);
    }

    #[test]
    fn raw_values_are_clamped() {
        assert_eq!(clamp_clip_progress(0), 0);
        assert_eq!(clamp_clip_progress(100), 100);
        assert_eq!(clamp_clip_progress(250), 100);
    }
}
