#![cfg_attr(not(test), no_std)]

mod debounce;
pub mod engine;
pub mod history;
pub mod io;
pub mod recognizer;
pub mod registry;
pub mod sampler;
pub mod sink;
pub mod types;

pub use engine::GestureEngine;
pub use history::EventHistory;
pub use io::{MonotonicClock, SensorIo};
pub use recognizer::{RecognitionTrace, RejectReason};
pub use registry::{LayoutError, RegisterError};
pub use sink::{GestureBindings, GestureHandler, GestureSink};
pub use types::{
    ActivationEvent, Channel, Gesture, GestureConfig, Layout, SensorIndex, SensorKind,
};

pub const MAX_SENSORS: usize = 4;
pub const HISTORY_CAPACITY: usize = 6;
