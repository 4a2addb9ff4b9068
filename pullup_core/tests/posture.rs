use pullup_core::chin::estimate_chin;
use pullup_core::posture::{
    chin_to_wrists_distance, head_between_wrists, is_chin_over_wrists_level, wrists_over_body,
};
use pullup_core::{Joint, KeypointFrame, Point, PostureValidator};
use rstest::rstest;

fn validator() -> PostureValidator {
    PostureValidator {
        arm_angle_threshold: 30.0,
        leg_angle_threshold: 30.0,
        wrists_level_angle_threshold: 5.0,
    }
}

#[test]
fn vertically_stacked_wrists_are_not_level() {
    let frame = KeypointFrame::empty()
        .with(Joint::LWrist, (100, 200))
        .with(Joint::RWrist, (100, 200));
    assert!(!validator().wrists_same_level(&frame));
}

#[rstest]
#[case((0, 100), (100, 100), true)]
#[case((0, 100), (100, 108), true)] // ~4.6°
#[case((0, 100), (100, 110), false)] // ~5.7°
#[case((100, 100), (0, 110), false)]
fn wrist_line_tilt(#[case] l: (u32, u32), #[case] r: (u32, u32), #[case] level: bool) {
    let frame = KeypointFrame::empty().with(Joint::LWrist, l).with(Joint::RWrist, r);
    assert_eq!(validator().wrists_same_level(&frame), level);
}

#[test]
fn chin_halfway_between_neck_and_nose() {
    let frame = KeypointFrame::empty()
        .with(Joint::Neck, (50, 100))
        .with(Joint::Nose, (55, 80));
    assert_eq!(estimate_chin(&frame, 0.5), Some(Point::new(52, 90)));
}

#[test]
fn chin_falls_back_to_ear_midpoint() {
    let frame = KeypointFrame::empty()
        .with(Joint::Neck, (50, 100))
        .with(Joint::LEar, (60, 80))
        .with(Joint::REar, (40, 80));
    assert_eq!(estimate_chin(&frame, 0.5), Some(Point::new(50, 90)));
    assert_eq!(estimate_chin(&frame.without(Joint::LEar), 0.5), None);
    assert_eq!(estimate_chin(&frame.without(Joint::Neck), 0.5), None);
}

#[rstest]
#[case(99, true)]
#[case(100, true)]
#[case(101, false)]
fn chin_over_wrists_is_inclusive(#[case] chin_y: u32, #[case] over: bool) {
    let frame = KeypointFrame::empty()
        .with(Joint::LWrist, (130, 98))
        .with(Joint::RWrist, (70, 102));
    let chin = Some(Point::new(100, chin_y));
    assert_eq!(is_chin_over_wrists_level(&frame, chin), over);
    assert_eq!(
        chin_to_wrists_distance(&frame, chin),
        Some(f64::from(chin_y) - 100.0)
    );
}

#[rstest]
#[case(70, false)]
#[case(71, true)]
#[case(129, true)]
#[case(130, false)]
fn head_strictly_between_wrists(#[case] chin_x: u32, #[case] between: bool) {
    let frame = KeypointFrame::empty()
        .with(Joint::LWrist, (130, 100))
        .with(Joint::RWrist, (70, 100));
    assert_eq!(
        head_between_wrists(&frame, Some(Point::new(chin_x, 150))),
        between
    );
}

#[test]
fn wrists_alone_are_not_over_body() {
    let frame = KeypointFrame::empty()
        .with(Joint::LWrist, (130, 100))
        .with(Joint::RWrist, (70, 100));
    assert!(!wrists_over_body(&frame));
    assert!(wrists_over_body(&frame.with(Joint::Nose, (100, 101))));
    assert!(!wrists_over_body(&frame.with(Joint::Nose, (100, 100))));
}

#[test]
fn hang_requires_every_check() {
    use pullup_core::mocks::SyntheticPose;

    let v = validator();
    let hang = SyntheticPose::hang().frame();
    let chin = estimate_chin(&hang, 0.5);
    assert!(v.is_there_hang(&hang, chin));
    assert!(v.hang_check(&hang, chin).passed());

    // Tilted wrist line.
    let tilted = hang.with(Joint::LWrist, (130, 120));
    assert!(!v.is_there_hang(&tilted, estimate_chin(&tilted, 0.5)));

    // Head outside the grip.
    assert!(!v.is_there_hang(&hang, Some(Point::new(20, 165))));
    assert!(!v.is_there_hang(&hang, None));

    // Spread legs.
    let spread = hang.with(Joint::LKnee, (200, 360)).with(Joint::RKnee, (0, 360));
    assert!(!v.is_there_hang(&spread, chin));
}
