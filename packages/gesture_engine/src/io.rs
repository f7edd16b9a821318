use crate::types::Channel;

/// Hardware access the engine needs from the board.
///
/// Reads are infallible: a channel that cannot be read reports low, and a
/// ranging measurement that times out reports `0` ("no object").
pub trait SensorIo {
    fn configure_input(&mut self, channel: Channel, pull_up: bool);
    fn configure_output(&mut self, channel: Channel);
    fn write_level(&mut self, channel: Channel, high: bool);
    fn read_level(&mut self, channel: Channel) -> bool;

    /// Distance in centimeters, or `0` when no echo arrived within `timeout_us`.
    fn measure_distance_cm(&mut self, trigger: Channel, echo: Channel, timeout_us: u32) -> u16;
}

/// Millisecond clock, monotonic modulo u32 wraparound.
pub trait MonotonicClock {
    fn now_ms(&self) -> u32;
}

impl<T: SensorIo + ?Sized> SensorIo for &mut T {
    fn configure_input(&mut self, channel: Channel, pull_up: bool) {
        (**self).configure_input(channel, pull_up)
    }

    fn configure_output(&mut self, channel: Channel) {
        (**self).configure_output(channel)
    }

    fn write_level(&mut self, channel: Channel, high: bool) {
        (**self).write_level(channel, high)
    }

    fn read_level(&mut self, channel: Channel) -> bool {
        (**self).read_level(channel)
    }

    fn measure_distance_cm(&mut self, trigger: Channel, echo: Channel, timeout_us: u32) -> u16 {
        (**self).measure_distance_cm(trigger, echo, timeout_us)
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
