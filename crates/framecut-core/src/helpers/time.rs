// crates/framecut-core/src/helpers/time.rs
//
// Time conversion and formatting shared by the ruler, the composition
// compiler and anything else that turns seconds into frames or labels.

/// Nearest whole frame for `secs` at `fps`.
///
/// ```
/// use framecut_core::helpers::time::secs_to_frame;
/// assert_eq!(secs_to_frame(2.0, 30.0), 60);
/// assert_eq!(secs_to_frame(0.51, 30.0), 15);
/// ```
pub fn secs_to_frame(secs: f64, fps: f64) -> i64 {
    (secs * fps).round() as i64
}

/// Format a position in seconds as `MM:SS:FF` (minutes, seconds, frames).
///
/// Used for ruler marker labels where frame-level precision matters.
///
/// ```
/// use framecut_core::helpers::time::format_time;
/// assert_eq!(format_time(0.0,    30.0), "00:00:00");
/// assert_eq!(format_time(61.5,   30.0), "01:01:15");
/// assert_eq!(format_time(3599.0, 30.0), "59:59:00");
/// assert_eq!(format_time(1.5,    24.0), "00:01:12");
/// ```
pub fn format_time(s: f64, fps: f64) -> String {
    let s  = s.max(0.0);
    let m  = (s / 60.0) as u32;
    let sc = (s % 60.0) as u32;
    let fr = ((s * fps) as u64 % fps.max(1.0) as u64) as u32;
    format!("{m:02}:{sc:02}:{fr:02}")
}

/// Format a duration in seconds as a compact human-readable string.
///
/// | Range         | Format       | Example   |
/// |---------------|--------------|-----------|
/// | ≥ 3600 s      | `H:MM:SS`    | `1:04:35` |
/// | ≥ 60 s        | `M:SS`       | `3:07`    |
/// | < 60 s        | `S.Xs`       | `4.2s`    |
///
/// ```
/// use framecut_core::helpers::time::format_duration;
/// assert_eq!(format_duration(4.2),    "4.2s");
/// assert_eq!(format_duration(187.0),  "3:07");
/// assert_eq!(format_duration(3875.0), "1:04:35");
/// ```
pub fn format_duration(secs: f64) -> String {
    if secs >= 3600.0 {
        format!(
            "{}:{:02}:{:02}",
            secs as u64 / 3600,
            (secs as u64 % 3600) / 60,
            secs as u64 % 60,
        )
    } else if secs >= 60.0 {
        format!("{}:{:02}", secs as u64 / 60, secs as u64 % 60)
    } else {
        format!("{secs:.1}s")
    }
}
