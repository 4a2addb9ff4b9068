use predicates::prelude::*;
use pullup_core::mocks::{clean_rep, unclean_rep};
use pullup_core::openpose::KeypointLayout;
use pullup_core::{Joint, KeypointFrame};
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use assert_cmd::Command;
use tempfile::tempdir;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("cfg.toml");
    fs::write(&path, body).unwrap();
    path
}

fn write_frames(dir: &Path, frames: &[KeypointFrame]) -> PathBuf {
    let path = dir.join("frames.jsonl");
    let text: String = frames
        .iter()
        .map(|f| serde_json::to_string(f).unwrap() + "\n")
        .collect();
    fs::write(&path, text).unwrap();
    path
}

fn session_frames() -> Vec<KeypointFrame> {
    let mut frames = clean_rep();
    frames.extend(unclean_rep());
    frames
}

fn pullup(dir: &Path, cfg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pullup_cli").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["replay"], 2, "required", "stderr")]
#[case(&["replay", "--frames", "nope.jsonl"], 4, "could not be read", "stderr")]
#[case(&["replay", "--openpose-dir", "."], 4, "_keypoints.json", "stderr")]
#[case(&["replay", "--frames", "FRAMES", "--fps", "0"], 2, "fps must be > 0", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let frames = write_frames(dir.path(), &clean_rep());

    let mut cmd = pullup(dir.path(), &cfg);
    for a in args {
        if *a == "FRAMES" {
            cmd.arg(&frames);
        } else {
            cmd.arg(a);
        }
    }
    let assert = cmd.assert().code(exit_code);
    if stream == "stdout" {
        assert.stdout(predicate::str::contains(needle));
    } else {
        assert.stderr(predicate::str::contains(needle));
    }
}

#[test]
fn replay_counts_clean_and_unclean() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let frames = write_frames(dir.path(), &session_frames());

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("clean=1 unclean=1"));
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let frames = write_frames(dir.path(), &clean_rep());

    pullup(dir.path(), &dir.path().join("absent.toml"))
        .arg("replay")
        .arg("--frames")
        .arg(&frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("clean=1"));
}

#[rstest]
#[case("[qualifier]\nneck_chin_ratio = 0.0\n", "neck_chin_ratio")]
#[case("[qualifier]\nchin_to_wrists_start_ratio = 0.1\nchin_to_wrists_finish_ratio = 0.5\n", "finish_ratio")]
#[case("[input]\nfps = -1.0\n", "input.fps")]
#[case("[qualifier\n", "Configuration is invalid")]
#[case("[bogus]\nx = 1\n", "Configuration is invalid")]
fn bad_config_exits_with_config_code(#[case] body: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), body);
    let frames = write_frames(dir.path(), &clean_rep());

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&frames)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn missing_joint_key_exits_with_frame_code() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let path = dir.path().join("frames.jsonl");
    fs::write(&path, "{\"Nose\": [10, 20]}\n").unwrap();

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no entry for"));
}

#[test]
fn malformed_line_names_the_line() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let mut text = serde_json::to_string(&clean_rep()[0]).unwrap();
    text.push_str("\n{not json\n");
    let path = dir.path().join("frames.jsonl");
    fs::write(&path, text).unwrap();

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn per_frame_text_output_has_one_line_per_frame() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let frames = clean_rep();
    let path = write_frames(dir.path(), &frames);

    let out = pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&path)
        .arg("--per-frame")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let frame_lines = stdout.lines().filter(|l| l.starts_with("frame ")).count();
    assert_eq!(frame_lines, frames.len());
    assert_eq!(stdout.matches("event=clean").count(), 1);
}

#[test]
fn stdin_frames_are_replayed() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let text: String = clean_rep()
        .iter()
        .map(|f| serde_json::to_string(f).unwrap() + "\n")
        .collect();

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg("-")
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("clean=1"));
}

#[test]
fn events_csv_lists_each_repetition() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let frames = write_frames(dir.path(), &session_frames());
    let csv_path = dir.path().join("events.csv");

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&frames)
        .arg("--events-csv")
        .arg(&csv_path)
        .assert()
        .success();

    let text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "kind,frame_index,time_s,clean_total,unclean_total");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("clean,10,"), "{}", lines[1]);
    assert!(lines[2].starts_with("unclean,"), "{}", lines[2]);
}

#[test]
fn events_csv_from_config_section() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "[output]\nevents_csv = \"reps.csv\"\n");
    let frames = write_frames(dir.path(), &clean_rep());

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&frames)
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("reps.csv")).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn check_config_prints_effective_settings() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "[qualifier]\narm_angle_threshold = 150.0\n");

    pullup(dir.path(), &cfg)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("arm_angle_threshold = 150.0"))
        .stdout(predicate::str::contains("[input]"));
}

#[test]
fn log_file_receives_json_lines() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "[logging]\nfile = \"logs/pullup.log\"\nlevel = \"info\"\n");
    let frames = write_frames(dir.path(), &clean_rep());

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--frames")
        .arg(&frames)
        .assert()
        .success();

    let log = fs::read_to_string(dir.path().join("logs/pullup.log")).unwrap();
    let first = log.lines().next().expect("log has lines");
    let v: serde_json::Value = serde_json::from_str(first).unwrap();
    assert!(v.get("level").is_some());
}

fn to_body25(frame: &KeypointFrame) -> serde_json::Value {
    let layout = KeypointLayout::Body25;
    let mut values = vec![0.0_f64; 75];
    for joint in Joint::ALL {
        if let (Some(i), Some(p)) = (layout.index_of(joint), frame.get(joint)) {
            values[i * 3] = p.xf();
            values[i * 3 + 1] = p.yf();
            values[i * 3 + 2] = 0.9;
        }
    }
    serde_json::json!({ "version": 1.3, "people": [{ "person_id": [-1], "pose_keypoints_2d": values }] })
}

#[test]
fn openpose_directory_replay() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "");
    let pose_dir = dir.path().join("pose");
    fs::create_dir(&pose_dir).unwrap();
    for (i, frame) in clean_rep().iter().enumerate() {
        let name = format!("clip_{i:012}_keypoints.json");
        fs::write(pose_dir.join(name), to_body25(frame).to_string()).unwrap();
    }
    // A document without people is skipped rather than counted.
    fs::write(
        pose_dir.join("clip_999999999999_keypoints.json"),
        r#"{"version":1.3,"people":[]}"#,
    )
    .unwrap();

    pullup(dir.path(), &cfg)
        .arg("replay")
        .arg("--openpose-dir")
        .arg(&pose_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("frames={}", clean_rep().len())))
        .stdout(predicate::str::contains("clean=1"));
}
