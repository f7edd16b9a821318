/// Position of a sensor in the registry. Registration order encodes the
/// physical placement the active [`Layout`] expects.
pub type SensorIndex = u8;

/// Hardware channel identifier (GPIO number on target).
pub type Channel = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorKind {
    Proximity { pin: Channel, pull_up: bool },
    Ranging { trigger: Channel, echo: Channel },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Index 0 is the left sensor, index 1 the right one.
    #[default]
    Horizontal,
    /// Index 0 is the top sensor, index 1 the bottom one.
    Vertical,
    /// Four sensors registered in clockwise order starting at index 0.
    Quad,
}

impl Layout {
    pub const fn required_sensors(self) -> usize {
        match self {
            Self::Horizontal | Self::Vertical => 2,
            Self::Quad => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Quad => "quad",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Gesture {
    SwipeLeft = 0,
    SwipeRight = 1,
    SwipeUp = 2,
    SwipeDown = 3,
    CircleClockwise = 4,
    CircleCounterClockwise = 5,
}

impl Gesture {
    pub const COUNT: usize = 6;
    pub const ALL: [Gesture; Self::COUNT] = [
        Self::SwipeLeft,
        Self::SwipeRight,
        Self::SwipeUp,
        Self::SwipeDown,
        Self::CircleClockwise,
        Self::CircleCounterClockwise,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SwipeLeft => "swipe_left",
            Self::SwipeRight => "swipe_right",
            Self::SwipeUp => "swipe_up",
            Self::SwipeDown => "swipe_down",
            Self::CircleClockwise => "circle_cw",
            Self::CircleCounterClockwise => "circle_ccw",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gesture| gesture.label() == label)
    }
}

/// Debounced inactive -> active transition of one sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationEvent {
    pub sensor: SensorIndex,
    pub t_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    pub layout: Layout,
    pub proximity_active_high: bool,
    pub threshold_cm: u16,
    pub debounce_ms: u16,
    pub swipe_timeout_ms: u16,
}

impl GestureConfig {
    pub const DEFAULT: Self = Self {
        layout: Layout::Horizontal,
        proximity_active_high: false,
        threshold_cm: 25,
        debounce_ms: 50,
        swipe_timeout_ms: 500,
    };

    /// Events older than this are pruned at the end of every cycle.
    pub const fn retention_ms(&self) -> u32 {
        self.swipe_timeout_ms as u32 * 3
    }

    pub const fn circle_window_ms(&self) -> u32 {
        self.swipe_timeout_ms as u32 * 2
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Elapsed milliseconds between two clock readings, tolerant of u32 wraparound.
#[inline]
pub(crate) const fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    now_ms.wrapping_sub(since_ms)
}
