#![no_main]
use libfuzzer_sys::fuzz_target;
use pullup_core::openpose::{KeypointLayout, parse_document};
use pullup_core::{PhaseQualifier, QualifierCfg};

fuzz_target!(|data: &str| {
    let Ok(mut q) = PhaseQualifier::new(QualifierCfg::default()) else {
        return;
    };
    for layout in [KeypointLayout::Body25, KeypointLayout::Coco] {
        if let Ok(Some(frame)) = parse_document(data, layout, 0.1) {
            // Feed the same frame repeatedly so every phase handler sees it.
            for _ in 0..4 {
                let before = q.counters();
                q.qualify(&frame);
                let after = q.counters();
                assert!(after.total() <= before.total() + 1);
            }
        }
    }
});
