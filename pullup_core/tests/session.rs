use pullup_core::mocks::{clean_rep, unclean_rep};
use pullup_core::{InputCfg, Phase, PullUpSession, QualifierCfg, RepKind};

fn session(fps: f64) -> PullUpSession {
    let input = InputCfg {
        fps,
        ..InputCfg::default()
    };
    PullUpSession::new(QualifierCfg::default(), &input).expect("valid config")
}

#[test]
fn events_are_timestamped_in_order() {
    let mut s = session(10.0);
    let mut frames = clean_rep();
    frames.extend(unclean_rep());

    let mut reported = Vec::new();
    for f in &frames {
        if let Some(ev) = s.process(f).event {
            reported.push(ev);
        }
    }
    assert_eq!(reported.len(), 2);
    assert_eq!(reported, s.events());

    let clean = reported[0];
    assert_eq!(clean.kind, RepKind::Clean);
    // Three hangs, then pulls at rise 0..=70; the chin crosses at rise 70.
    assert_eq!(clean.frame_index, 10);
    assert!((clean.time_s - 1.0).abs() < 1e-12);
    assert_eq!((clean.clean_total, clean.unclean_total), (1, 0));

    let unclean = reported[1];
    assert_eq!(unclean.kind, RepKind::Unclean);
    assert!(unclean.frame_index > clean.frame_index);
    assert_eq!((unclean.clean_total, unclean.unclean_total), (1, 1));
}

#[test]
fn summary_counts_frames_and_hangs() {
    let mut s = session(30.0);
    let frames = clean_rep();
    for f in &frames {
        s.process(f);
    }
    s.process(&pullup_core::KeypointFrame::empty());
    let sum = s.summary();
    assert_eq!(sum.frames, frames.len() as u64 + 1);
    assert_eq!(sum.hang_frames, frames.len() as u64);
    assert_eq!(sum.clean, 1);
    assert_eq!(sum.unclean, 0);
    assert_eq!(sum.phase, Phase::Beginning);
}

#[test]
fn report_serializes_for_jsonl() {
    let mut s = session(30.0);
    let report = s.process(&clean_rep()[0]);
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["phase"], "beginning");
    assert_eq!(v["hang"], true);
    assert_eq!(v["chin"], serde_json::json!([100, 165]));
    assert_eq!(v["angles"]["legs"], 0.0);
    assert!(v["event"].is_null());
}
