//! Pull-up phases and repetition counters.

use std::fmt;

use serde::Serialize;

/// Position of the athlete in the pull-up cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Hanging at the bottom on straight arms.
    Beginning,
    /// Arms bending, body rising.
    Pulling,
    /// Chin at or above the wrists.
    Chinning,
    /// Descending back towards the hang.
    Lowering,
    /// No recognised position yet, or tracking was lost.
    #[default]
    Unknown,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Beginning => "beginning",
            Phase::Pulling => "pulling",
            Phase::Chinning => "chinning",
            Phase::Lowering => "lowering",
            Phase::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clean and unclean repetition totals. Both only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RepCounters {
    pub clean: u32,
    pub unclean: u32,
}

impl RepCounters {
    pub fn total(&self) -> u32 {
        self.clean.saturating_add(self.unclean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown() {
        assert_eq!(Phase::default(), Phase::Unknown);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Chinning).unwrap(), "\"chinning\"");
        assert_eq!(Phase::Lowering.to_string(), "lowering");
    }
}
