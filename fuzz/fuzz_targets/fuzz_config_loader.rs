#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must either fail to load or validate without panicking,
    // and anything that validates must also build a qualifier.
    let Ok(cfg) = pullup_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_ok() {
        let core_cfg: pullup_core::QualifierCfg = (&cfg.qualifier).into();
        assert!(pullup_core::PhaseQualifier::new(core_cfg).is_ok());
    }
});
