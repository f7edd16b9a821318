use crate::{
    io::SensorIo,
    types::{GestureConfig, SensorKind},
};

/// Upper bound on the echo wait, roughly 5 m of round trip.
pub const RANGING_TIMEOUT_US: u32 = 30_000;

/// Reads one sensor and applies its activation policy.
pub fn read_active<IO: SensorIo>(io: &mut IO, kind: SensorKind, config: &GestureConfig) -> bool {
    match kind {
        SensorKind::Proximity { pin, .. } => {
            proximity_active(io.read_level(pin), config.proximity_active_high)
        }
        SensorKind::Ranging { trigger, echo } => {
            let distance_cm = io.measure_distance_cm(trigger, echo, RANGING_TIMEOUT_US);
            range_active(distance_cm, config.threshold_cm)
        }
    }
}

pub const fn proximity_active(level_high: bool, active_high: bool) -> bool {
    level_high == active_high
}

/// A zero distance means timeout / no echo and is never active.
pub const fn range_active(distance_cm: u16, threshold_cm: u16) -> bool {
    distance_cm > 0 && distance_cm <= threshold_cm
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIo {
        level: bool,
        distance_cm: u16,
        last_timeout_us: u32,
    }

    impl SensorIo for FixedIo {
        fn configure_input(&mut self, _channel: u8, _pull_up: bool) {}
        fn configure_output(&mut self, _channel: u8) {}
        fn write_level(&mut self, _channel: u8, _high: bool) {}

        fn read_level(&mut self, _channel: u8) -> bool {
            self.level
        }

        fn measure_distance_cm(&mut self, _trigger: u8, _echo: u8, timeout_us: u32) -> u16 {
            self.last_timeout_us = timeout_us;
            self.distance_cm
        }
    }

    #[test]
    fn proximity_follows_global_polarity() {
        assert!(proximity_active(false, false));
        assert!(!proximity_active(true, false));
        assert!(proximity_active(true, true));
        assert!(!proximity_active(false, true));
    }

    #[test]
    fn zero_distance_is_never_active() {
        assert!(!range_active(0, 25));
        assert!(!range_active(0, u16::MAX));
        assert!(!range_active(0, 0));
    }

    #[test]
    fn range_threshold_is_inclusive() {
        assert!(range_active(1, 25));
        assert!(range_active(25, 25));
        assert!(!range_active(26, 25));
    }

    #[test]
    fn ranging_read_passes_bounded_timeout() {
        let mut io = FixedIo {
            level: false,
            distance_cm: 12,
            last_timeout_us: 0,
        };
        let kind = SensorKind::Ranging {
            trigger: 5,
            echo: 6,
        };
        assert!(read_active(&mut io, kind, &GestureConfig::DEFAULT));
        assert_eq!(io.last_timeout_us, RANGING_TIMEOUT_US);
    }

    #[test]
    fn proximity_read_uses_configured_polarity() {
        let mut io = FixedIo {
            level: true,
            distance_cm: 0,
            last_timeout_us: 0,
        };
        let kind = SensorKind::Proximity {
            pin: 4,
            pull_up: true,
        };
        let mut config = GestureConfig::DEFAULT;
        assert!(!read_active(&mut io, kind, &config));
        config.proximity_active_high = true;
        assert!(read_active(&mut io, kind, &config));
    }
}
