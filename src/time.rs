//! Timeslot and epoch arithmetic.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// A protocol timeslot index (`τ`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timeslot(pub u32);

impl Timeslot {
    #[must_use]
    pub const fn epoch(self, config: &Config) -> u32 {
        self.0 / config.epoch_length
    }

    #[must_use]
    pub const fn is_first_in_epoch(self, config: &Config) -> bool {
        self.0 % config.epoch_length == 0
    }

    /// Which validator-set rotation (`⌊τ/R⌋`) this timeslot falls in.
    #[must_use]
    pub const fn rotation_index(self, config: &Config) -> u32 {
        self.0 / config.rotation_period
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Timeslot {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            epoch_length: 600,
            rotation_period: 10,
            ..Config::default()
        }
    }

    #[test]
    fn epoch_boundaries() {
        let c = config();
        assert_eq!(Timeslot(0).epoch(&c), 0);
        assert!(Timeslot(0).is_first_in_epoch(&c));
        assert_eq!(Timeslot(599).epoch(&c), 0);
        assert!(!Timeslot(599).is_first_in_epoch(&c));
        assert_eq!(Timeslot(600).epoch(&c), 1);
        assert!(Timeslot(600).is_first_in_epoch(&c));
    }

    #[test]
    fn rotation_index_steps_every_r_slots() {
        let c = config();
        assert_eq!(Timeslot(0).rotation_index(&c), 0);
        assert_eq!(Timeslot(9).rotation_index(&c), 0);
        assert_eq!(Timeslot(10).rotation_index(&c), 1);
    }
}
