//! Output artifact naming.

use std::path::Path;

use crate::speed::SpeedFactor;

/// Stem used when an uploaded filename has no usable final component.
const FALLBACK_STEM: &str = "input";

/// Derives the output filename: `<stem>.<speed>x<extension>`.
///
/// The speed is rounded to two decimals with trailing zeros and a trailing
/// decimal point removed, so `clip.mp4` at 2.0 becomes `clip.2x.mp4` and at
/// 1.5 becomes `clip.1.5x.mp4`.
pub fn derive_output_name(original_filename: &str, speed: SpeedFactor) -> String {
    let name = sanitize_filename(original_filename);
    let path = Path::new(&name);

    // A bare trailing dot (`clip.`) is part of the stem, not an empty extension.
    let (stem, extension) = match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => (
            stem.to_string_lossy().into_owned(),
            format!(".{}", ext.to_string_lossy()),
        ),
        _ => (name.clone(), String::new()),
    };

    format!("{}.{}x{}", stem, trimmed_speed(speed), extension)
}

/// Speed rendered with at most two decimals and no trailing zeros.
pub fn trimmed_speed(speed: SpeedFactor) -> String {
    let fixed = format!("{:.2}", speed.value());
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Reduces a client-supplied filename to its final path component.
///
/// Both `/` and `\` count as separators. Names that reduce to nothing,
/// `.` or `..` are replaced by a fixed fallback.
pub fn sanitize_filename(original_filename: &str) -> String {
    let last = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => FALLBACK_STEM.to_string(),
        name => name.replace('\0', ""),
    }
}

/// Whether `filename` carries one of `accepted` extensions (case-insensitive).
pub fn is_accepted_extension(filename: &str, accepted: &[String]) -> bool {
    Path::new(filename)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            accepted
                .iter()
                .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speed(value: f64) -> SpeedFactor {
        SpeedFactor::new(value).unwrap()
    }

    #[test]
    fn test_output_names() {
        assert_eq!(derive_output_name("clip.mp4", speed(2.0)), "clip.2x.mp4");
        assert_eq!(derive_output_name("clip.mp4", speed(1.5)), "clip.1.5x.mp4");
        assert_eq!(derive_output_name("clip.mp4", speed(0.25)), "clip.0.25x.mp4");
    }

    #[test]
    fn test_speed_rounds_to_two_decimals() {
        assert_eq!(trimmed_speed(speed(1.0)), "1");
        assert_eq!(trimmed_speed(speed(0.1)), "0.1");
        assert_eq!(trimmed_speed(speed(1.234)), "1.23");
        assert_eq!(trimmed_speed(speed(3.999)), "4");
        assert_eq!(trimmed_speed(speed(10.0)), "10");
    }

    #[test]
    fn test_multi_dot_and_missing_extension() {
        assert_eq!(
            derive_output_name("holiday.final.mov", speed(0.5)),
            "holiday.final.0.5x.mov"
        );
        assert_eq!(derive_output_name("clip", speed(2.0)), "clip.2x");
        assert_eq!(derive_output_name(".hidden", speed(2.0)), ".hidden.2x");
    }

    #[test]
    fn test_trailing_dot_stays_in_stem() {
        assert_eq!(derive_output_name("clip.", speed(2.0)), "clip..2x");
        assert_eq!(derive_output_name("clip.mp4.", speed(1.5)), "clip.mp4..1.5x");
    }

    #[test]
    fn test_output_name_is_deterministic() {
        let a = derive_output_name("clip.webm", speed(1.75));
        let b = derive_output_name("clip.webm", speed(1.75));
        assert_eq!(a, b);
        assert_ne!(a, "clip.webm");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\clip.mp4"), "clip.mp4");
        assert_eq!(sanitize_filename("dir/"), "input");
        assert_eq!(sanitize_filename(".."), "input");
        assert_eq!(sanitize_filename(""), "input");
        assert_eq!(sanitize_filename("clip.mp4"), "clip.mp4");
    }

    #[test]
    fn test_output_name_uses_sanitized_input() {
        assert_eq!(
            derive_output_name("uploads/../clip.mp4", speed(2.0)),
            "clip.2x.mp4"
        );
    }

    #[test]
    fn test_accepted_extensions() {
        let accepted: Vec<String> = ["mp4", "mov", ".mkv"].iter().map(|s| s.to_string()).collect();
        assert!(is_accepted_extension("clip.mp4", &accepted));
        assert!(is_accepted_extension("CLIP.MOV", &accepted));
        assert!(is_accepted_extension("clip.mkv", &accepted));
        assert!(!is_accepted_extension("clip.gif", &accepted));
        assert!(!is_accepted_extension("clip", &accepted));
    }
}
