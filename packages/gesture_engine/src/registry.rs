use core::fmt;

use heapless::Vec;

use crate::{
    debounce::{DebounceEdge, Debouncer},
    types::{Layout, SensorIndex, SensorKind},
    MAX_SENSORS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterError {
    CapacityExhausted { capacity: usize },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExhausted { capacity } => {
                write!(f, "sensor registry full ({capacity} sensors)")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    TooFewSensors {
        layout: Layout,
        required: usize,
        registered: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewSensors {
                layout,
                required,
                registered,
            } => write!(
                f,
                "{} layout needs {required} sensors, {registered} registered",
                layout.label()
            ),
        }
    }
}

pub(crate) struct Sensor {
    pub(crate) kind: SensorKind,
    debouncer: Debouncer,
}

impl Sensor {
    fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            debouncer: Debouncer::new(),
        }
    }

    pub(crate) fn observe(
        &mut self,
        now_ms: u32,
        active: bool,
        debounce_ms: u16,
    ) -> Option<DebounceEdge> {
        self.debouncer.sample(now_ms, active, debounce_ms)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.debouncer.is_active()
    }

    pub(crate) fn last_change_ms(&self) -> u32 {
        self.debouncer.last_change_ms()
    }

    pub(crate) fn reset(&mut self) {
        self.debouncer = Debouncer::new();
    }
}

/// Fixed-capacity sensor table; index = registration order.
#[derive(Default)]
pub(crate) struct SensorRegistry {
    sensors: Vec<Sensor, MAX_SENSORS>,
}

impl SensorRegistry {
    pub(crate) const fn new() -> Self {
        Self { sensors: Vec::new() }
    }

    pub(crate) fn register(&mut self, kind: SensorKind) -> Result<SensorIndex, RegisterError> {
        let index = self.sensors.len() as SensorIndex;
        self.sensors
            .push(Sensor::new(kind))
            .map_err(|_| RegisterError::CapacityExhausted {
                capacity: MAX_SENSORS,
            })?;
        Ok(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.sensors.len()
    }

    pub(crate) fn get(&self, index: SensorIndex) -> Option<&Sensor> {
        self.sensors.get(index as usize)
    }

    pub(crate) fn get_mut(&mut self, index: SensorIndex) -> Option<&mut Sensor> {
        self.sensors.get_mut(index as usize)
    }

    pub(crate) fn check_layout(&self, layout: Layout) -> Result<(), LayoutError> {
        let required = layout.required_sensors();
        if self.sensors.len() < required {
            return Err(LayoutError::TooFewSensors {
                layout,
                required,
                registered: self.sensors.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        for sensor in &mut self.sensors {
            sensor.reset();
        }
    }
}
