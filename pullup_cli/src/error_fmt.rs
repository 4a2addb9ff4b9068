//! Human-readable error descriptions, exit codes and structured JSON error formatting.

use pullup_core::error::{BuildError, FrameError, QualifierError};

/// Exit code for configuration problems (unreadable, unparsable or out of range).
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for keypoint data that breaks the frame contract.
pub const EXIT_FRAME: i32 = 3;
/// Exit code for input that could not be read.
pub const EXIT_INPUT: i32 = 4;

fn find<T: std::error::Error + 'static>(err: &eyre::Report) -> Option<&T> {
    err.chain().find_map(|e| e.downcast_ref::<T>())
}

fn is_config_error(err: &eyre::Report) -> bool {
    if find::<BuildError>(err).is_some() {
        return true;
    }
    let lower = format!("{err:#}").to_ascii_lowercase();
    lower.contains("invalid configuration")
        || lower.contains("failed to parse config")
        || lower.contains("failed to read config")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(BuildError::InvalidConfig(msg)) = find::<BuildError>(err) {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the [qualifier] or [input] section.\nHow to fix: Edit the config file (see etc/pullup_config.toml), then rerun."
        );
    }

    if let Some(fe) = find::<FrameError>(err) {
        return match fe {
            FrameError::MissingJoint(joint) => format!(
                "What happened: A keypoint frame has no entry for {joint}.\nLikely causes: The exporter omits undetected joints instead of writing null.\nHow to fix: Emit every joint key on every line, using null for joints that were not detected."
            ),
            FrameError::TruncatedKeypoints { expected, got } => format!(
                "What happened: An OpenPose keypoint array holds {got} values, expected at least {expected}.\nLikely causes: The data was produced by a different pose model than [input] layout names.\nHow to fix: Set [input] layout to match the model (body25 or coco)."
            ),
            FrameError::InvalidCoordinate { joint, x, y } => format!(
                "What happened: {joint} has an invalid coordinate ({x}, {y}).\nLikely causes: Corrupt export or coordinates normalized to another range.\nHow to fix: Provide non-negative pixel coordinates."
            ),
            FrameError::Malformed(msg) => format!(
                "What happened: Keypoint input could not be parsed ({msg}).\nLikely causes: The file is not JSON or is truncated.\nHow to fix: Check the input file; each frame must be one JSON object."
            ),
        };
    }

    if let Some(io) = find::<std::io::Error>(err) {
        return format!(
            "What happened: Input could not be read ({io}).\nLikely causes: Wrong path, missing permissions or an empty directory.\nHow to fix: Check the --openpose-dir / --frames argument."
        );
    }

    if let Some(qe) = find::<QualifierError>(err) {
        return format!(
            "What happened: {qe}.\nLikely causes: The frame source stopped unexpectedly.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from config loading
    let msg = format!("{err:#}");
    if is_config_error(err) {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: A TOML syntax error, an unknown section, or an out-of-range value.\nHow to fix: Edit the TOML config and try again; `pullup check-config` validates it."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map error categories to stable exit codes.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if is_config_error(err) {
        return EXIT_CONFIG;
    }
    if find::<FrameError>(err).is_some() {
        return EXIT_FRAME;
    }
    if find::<std::io::Error>(err).is_some() || find::<QualifierError>(err).is_some() {
        return EXIT_INPUT;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if is_config_error(err) {
        return "InvalidConfig";
    }
    match find::<FrameError>(err) {
        Some(FrameError::MissingJoint(_)) => "MissingJoint",
        Some(FrameError::TruncatedKeypoints { .. }) => "TruncatedKeypoints",
        Some(FrameError::InvalidCoordinate { .. }) => "InvalidCoordinate",
        Some(FrameError::Malformed(_)) => "MalformedFrame",
        None if exit_code_for_error(err) == EXIT_INPUT => "InputError",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = reason_name(err);
    let code = exit_code_for_error(err);
    match find::<FrameError>(err) {
        Some(FrameError::MissingJoint(joint)) => json!({
            "reason": reason,
            "exit_code": code,
            "details": { "joint": joint.name() },
            "message": humanize(err),
        }),
        Some(FrameError::TruncatedKeypoints { expected, got }) => json!({
            "reason": reason,
            "exit_code": code,
            "details": { "expected": expected, "got": got },
            "message": humanize(err),
        }),
        _ => json!({ "reason": reason, "exit_code": code, "message": humanize(err) }),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;
    use pullup_core::Joint;

    #[test]
    fn build_error_maps_to_config_code() {
        let err = eyre::Report::new(BuildError::InvalidConfig("fps must be > 0"));
        assert_eq!(exit_code_for_error(&err), EXIT_CONFIG);
        assert!(humanize(&err).contains("fps must be > 0"));
    }

    #[test]
    fn wrapped_validation_message_maps_to_config_code() {
        let err = Err::<(), _>(eyre::eyre!("qualifier.neck_chin_ratio must be in (0, 1]"))
            .wrap_err("invalid configuration")
            .unwrap_err();
        assert_eq!(exit_code_for_error(&err), EXIT_CONFIG);
        assert!(humanize(&err).contains("neck_chin_ratio"));
    }

    #[test]
    fn frame_error_json_has_details() {
        let err = eyre::Report::new(FrameError::MissingJoint(Joint::LAnkle));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "MissingJoint");
        assert_eq!(v["exit_code"], EXIT_FRAME);
        assert_eq!(v["details"]["joint"], "LAnkle");
    }

    #[test]
    fn io_error_maps_to_input_code() {
        let err = eyre::Report::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "frames.jsonl: not found",
        ));
        assert_eq!(exit_code_for_error(&err), EXIT_INPUT);
        assert_eq!(reason_name(&err), "InputError");
    }
}
