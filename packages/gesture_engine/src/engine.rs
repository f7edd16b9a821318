use log::{debug, info, trace, warn};

use crate::{
    debounce::DebounceEdge,
    history::EventHistory,
    io::{MonotonicClock, SensorIo},
    recognizer::{recognize, RecognitionTrace, RejectReason},
    registry::{LayoutError, RegisterError, SensorRegistry},
    sampler::read_active,
    sink::{GestureBindings, GestureSink},
    types::{ActivationEvent, Channel, GestureConfig, Layout, SensorIndex, SensorKind},
};

/// Polling gesture engine. Everything happens inside [`GestureEngine::update`]:
/// sample, debounce, record activations, recognize, prune.
pub struct GestureEngine<IO, C, S = GestureBindings> {
    io: IO,
    clock: C,
    sink: S,
    config: GestureConfig,
    sensors: SensorRegistry,
    history: EventHistory,
    last_trace: RecognitionTrace,
}

impl<IO, C, S> GestureEngine<IO, C, S>
where
    IO: SensorIo,
    C: MonotonicClock,
    S: GestureSink,
{
    pub fn new(io: IO, clock: C, sink: S, config: GestureConfig) -> Self {
        Self {
            io,
            clock,
            sink,
            config,
            sensors: SensorRegistry::new(),
            history: EventHistory::new(),
            last_trace: RecognitionTrace::default(),
        }
    }

    pub fn register_proximity_sensor(
        &mut self,
        pin: Channel,
        pull_up: bool,
    ) -> Result<SensorIndex, RegisterError> {
        let index = self.register(SensorKind::Proximity { pin, pull_up })?;
        self.io.configure_input(pin, pull_up);
        Ok(index)
    }

    pub fn register_ranging_sensor(
        &mut self,
        trigger: Channel,
        echo: Channel,
    ) -> Result<SensorIndex, RegisterError> {
        let index = self.register(SensorKind::Ranging { trigger, echo })?;
        self.io.configure_output(trigger);
        self.io.write_level(trigger, false);
        self.io.configure_input(echo, false);
        Ok(index)
    }

    fn register(&mut self, kind: SensorKind) -> Result<SensorIndex, RegisterError> {
        match self.sensors.register(kind) {
            Ok(index) => {
                debug!("gesture: sensor {} registered kind={:?}", index, kind);
                Ok(index)
            }
            Err(err) => {
                warn!("gesture: {}; {:?} dropped", err, kind);
                Err(err)
            }
        }
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.config.layout = layout;
    }

    pub fn set_proximity_active_high(&mut self, active_high: bool) {
        self.config.proximity_active_high = active_high;
    }

    pub fn set_threshold_cm(&mut self, threshold_cm: u16) {
        self.config.threshold_cm = threshold_cm;
    }

    pub fn set_debounce_ms(&mut self, debounce_ms: u16) {
        self.config.debounce_ms = debounce_ms;
    }

    pub fn set_swipe_timeout_ms(&mut self, swipe_timeout_ms: u16) {
        self.config.swipe_timeout_ms = swipe_timeout_ms;
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Reports whether the registered sensors can satisfy the layout. The
    /// engine keeps running either way; unmatched rules simply never fire.
    pub fn check_layout(&self) -> Result<(), LayoutError> {
        self.sensors.check_layout(self.config.layout)
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_sensor_active(&self, index: SensorIndex) -> Option<bool> {
        self.sensors.get(index).map(|sensor| sensor.is_active())
    }

    pub fn sensor_last_change_ms(&self, index: SensorIndex) -> Option<u32> {
        self.sensors.get(index).map(|sensor| sensor.last_change_ms())
    }

    pub fn history(&self) -> impl DoubleEndedIterator<Item = &ActivationEvent> + '_ {
        self.history.iter()
    }

    pub fn last_trace(&self) -> RecognitionTrace {
        self.last_trace
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Forgets all activation history and returns every sensor to inactive.
    pub fn reset(&mut self) {
        self.history.clear();
        self.sensors.reset();
        self.last_trace = RecognitionTrace::default();
    }

    pub fn update(&mut self) {
        let now_ms = self.clock.now_ms();
        self.update_at(now_ms);
    }

    pub fn update_at(&mut self, now_ms: u32) {
        for index in 0..self.sensors.len() as SensorIndex {
            let Some(kind) = self.sensors.get(index).map(|sensor| sensor.kind) else {
                continue;
            };
            let active = read_active(&mut self.io, kind, &self.config);
            let Some(sensor) = self.sensors.get_mut(index) else {
                continue;
            };
            match sensor.observe(now_ms, active, self.config.debounce_ms) {
                Some(DebounceEdge::Activated) => {
                    debug!("gesture: sensor {} active at {}ms", index, now_ms);
                    if let Some(evicted) = self.history.push(index, now_ms) {
                        trace!("gesture: history full, evicted {:?}", evicted);
                    }
                    self.recognize(now_ms);
                }
                Some(DebounceEdge::Released) => {
                    debug!("gesture: sensor {} released at {}ms", index, now_ms);
                }
                None => {}
            }
        }

        let dropped = self.history.prune(now_ms, self.config.retention_ms());
        if dropped > 0 {
            trace!("gesture: pruned {} stale events", dropped);
        }
    }

    fn recognize(&mut self, now_ms: u32) {
        let sink = &mut self.sink;
        self.last_trace = recognize(
            &self.history,
            &self.config,
            self.sensors.len(),
            now_ms,
            |gesture| {
                info!("gesture: {} at {}ms", gesture.label(), now_ms);
                sink.on_gesture(gesture);
            },
        );
        if self.last_trace.reject != RejectReason::None {
            trace!(
                "gesture: no match reason={:?} pair={:?} gap={}ms circle={:?} span={}ms",
                self.last_trace.reject,
                self.last_trace.pair,
                self.last_trace.pair_gap_ms,
                self.last_trace.circle,
                self.last_trace.circle_span_ms
            );
        }
    }
}
