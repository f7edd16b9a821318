use crate::{
    history::EventHistory,
    types::{elapsed_ms, ActivationEvent, Gesture, GestureConfig, Layout, SensorIndex},
};

pub const CIRCLE_SENSORS: usize = 4;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum RejectReason {
    #[default]
    None = 0,
    TooFewSensors = 1,
    NoDistinctPair = 2,
    PairTooSlow = 3,
    NoMatchingRule = 4,
    CircleIncomplete = 5,
    CircleTooSlow = 6,
}

impl RejectReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Outcome of the most recent recognition pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecognitionTrace {
    pub now_ms: u32,
    pub pair: Option<(SensorIndex, SensorIndex)>,
    pub pair_gap_ms: u32,
    pub circle: Option<[SensorIndex; CIRCLE_SENSORS]>,
    pub circle_span_ms: u32,
    pub fired: Option<Gesture>,
    pub reject: RejectReason,
}

#[derive(Clone, Copy, Debug)]
struct SwipeRule {
    from: SensorIndex,
    to: SensorIndex,
    gesture: Gesture,
}

#[derive(Clone, Copy, Debug)]
struct CircleRule {
    sequence: [SensorIndex; CIRCLE_SENSORS],
    gesture: Gesture,
}

#[derive(Clone, Copy, Debug)]
struct LayoutRules {
    swipes: &'static [SwipeRule],
    circles: &'static [CircleRule],
}

const HORIZONTAL_SWIPES: [SwipeRule; 2] = [
    SwipeRule {
        from: 0,
        to: 1,
        gesture: Gesture::SwipeRight,
    },
    SwipeRule {
        from: 1,
        to: 0,
        gesture: Gesture::SwipeLeft,
    },
];

const VERTICAL_SWIPES: [SwipeRule; 2] = [
    SwipeRule {
        from: 0,
        to: 1,
        gesture: Gesture::SwipeDown,
    },
    SwipeRule {
        from: 1,
        to: 0,
        gesture: Gesture::SwipeUp,
    },
];

const QUAD_CIRCLES: [CircleRule; 2] = [
    CircleRule {
        sequence: [0, 1, 2, 3],
        gesture: Gesture::CircleClockwise,
    },
    CircleRule {
        sequence: [0, 3, 2, 1],
        gesture: Gesture::CircleCounterClockwise,
    },
];

const fn layout_rules(layout: Layout) -> LayoutRules {
    match layout {
        Layout::Horizontal => LayoutRules {
            swipes: &HORIZONTAL_SWIPES,
            circles: &[],
        },
        Layout::Vertical => LayoutRules {
            swipes: &VERTICAL_SWIPES,
            circles: &[],
        },
        Layout::Quad => LayoutRules {
            swipes: &[],
            circles: &QUAD_CIRCLES,
        },
    }
}

/// Classifies the tail of `history` and hands every match to `emit`.
///
/// Runs once per pushed activation, so it only ever looks at the newest
/// event and what precedes it.
pub fn recognize<F>(
    history: &EventHistory,
    config: &GestureConfig,
    sensor_count: usize,
    now_ms: u32,
    mut emit: F,
) -> RecognitionTrace
where
    F: FnMut(Gesture),
{
    let mut trace = RecognitionTrace {
        now_ms,
        ..RecognitionTrace::default()
    };
    if sensor_count < 2 {
        trace.reject = RejectReason::TooFewSensors;
        return trace;
    }

    let rules = layout_rules(config.layout);
    let pair = last_distinct_pair(history);
    if let Some((a, b)) = pair {
        trace.pair = Some((a.sensor, b.sensor));
        trace.pair_gap_ms = elapsed_ms(b.t_ms, a.t_ms);
    }

    if !rules.swipes.is_empty() {
        trace.reject = match pair {
            None => RejectReason::NoDistinctPair,
            Some(_) if trace.pair_gap_ms > config.swipe_timeout_ms as u32 => {
                RejectReason::PairTooSlow
            }
            Some((a, b)) => {
                match rules
                    .swipes
                    .iter()
                    .find(|rule| rule.from == a.sensor && rule.to == b.sensor)
                {
                    Some(rule) => {
                        trace.fired = Some(rule.gesture);
                        emit(rule.gesture);
                        RejectReason::None
                    }
                    None => RejectReason::NoMatchingRule,
                }
            }
        };
    }

    if !rules.circles.is_empty() {
        let reject = recognize_circle(
            history,
            rules,
            sensor_count,
            config.circle_window_ms(),
            &mut trace,
            &mut emit,
        );
        trace.reject = reject;
    }

    trace
}

fn recognize_circle<F>(
    history: &EventHistory,
    rules: LayoutRules,
    sensor_count: usize,
    window_ms: u32,
    trace: &mut RecognitionTrace,
    emit: &mut F,
) -> RejectReason
where
    F: FnMut(Gesture),
{
    if sensor_count < CIRCLE_SENSORS {
        return RejectReason::TooFewSensors;
    }
    if history.len() < CIRCLE_SENSORS {
        return RejectReason::CircleIncomplete;
    }
    let Some(sequence) = last_distinct_run(history) else {
        return RejectReason::CircleIncomplete;
    };
    trace.circle = Some(sequence);
    trace.circle_span_ms = sequence_span_ms(history, &sequence);
    if trace.circle_span_ms > window_ms {
        return RejectReason::CircleTooSlow;
    }

    match rules.circles.iter().find(|rule| rule.sequence == sequence) {
        Some(rule) => {
            trace.fired = Some(rule.gesture);
            emit(rule.gesture);
            RejectReason::None
        }
        None => RejectReason::NoMatchingRule,
    }
}

/// Newest event plus the nearest earlier event from a different sensor.
fn last_distinct_pair(history: &EventHistory) -> Option<(ActivationEvent, ActivationEvent)> {
    let mut events = history.iter().rev();
    let latest = *events.next()?;
    let previous = *events.find(|event| event.sensor != latest.sensor)?;
    Some((previous, latest))
}

/// Last `CIRCLE_SENSORS` sensor indices in chronological order, collapsing
/// only consecutive repeats: A,B,A counts as three entries.
fn last_distinct_run(history: &EventHistory) -> Option<[SensorIndex; CIRCLE_SENSORS]> {
    let mut sequence = [0; CIRCLE_SENSORS];
    let mut found = 0;
    let mut last_seen: Option<SensorIndex> = None;
    for event in history.iter().rev() {
        if found == CIRCLE_SENSORS {
            break;
        }
        if last_seen != Some(event.sensor) {
            sequence[CIRCLE_SENSORS - 1 - found] = event.sensor;
            last_seen = Some(event.sensor);
            found += 1;
        }
    }
    (found == CIRCLE_SENSORS).then_some(sequence)
}

/// Span between the first and last buffered event of any sensor in
/// `sequence`. This rescans the whole history, so an older activation of a
/// selected sensor widens the span.
fn sequence_span_ms(history: &EventHistory, sequence: &[SensorIndex; CIRCLE_SENSORS]) -> u32 {
    let mut matching = history
        .iter()
        .filter(|event| sequence.contains(&event.sensor));
    let Some(first) = matching.next() else {
        return 0;
    };
    let last = matching.last().unwrap_or(first);
    elapsed_ms(last.t_ms, first.t_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT_MS: u16 = 500;

    fn history_of(events: &[(SensorIndex, u32)]) -> EventHistory {
        let mut history = EventHistory::new();
        for (sensor, t_ms) in events {
            let _ = history.push(*sensor, *t_ms);
        }
        history
    }

    fn run(
        history: &EventHistory,
        layout: Layout,
        sensors: usize,
    ) -> (Vec<Gesture>, RecognitionTrace) {
        let config = GestureConfig {
            layout,
            swipe_timeout_ms: TIMEOUT_MS,
            ..GestureConfig::DEFAULT
        };
        run_with(history, &config, sensors)
    }

    fn run_with(
        history: &EventHistory,
        config: &GestureConfig,
        sensors: usize,
    ) -> (Vec<Gesture>, RecognitionTrace) {
        let mut fired = Vec::new();
        let now_ms = history.latest().map_or(0, |event| event.t_ms);
        let trace = recognize(history, config, sensors, now_ms, |gesture| {
            fired.push(gesture)
        });
        (fired, trace)
    }

    #[test]
    fn horizontal_pair_maps_to_left_and_right() {
        let (fired, _) = run(&history_of(&[(0, 100), (1, 300)]), Layout::Horizontal, 2);
        assert_eq!(fired, vec![Gesture::SwipeRight]);

        let (fired, _) = run(&history_of(&[(1, 100), (0, 300)]), Layout::Horizontal, 2);
        assert_eq!(fired, vec![Gesture::SwipeLeft]);
    }

    #[test]
    fn vertical_pair_maps_to_down_and_up() {
        let (fired, _) = run(&history_of(&[(0, 100), (1, 300)]), Layout::Vertical, 2);
        assert_eq!(fired, vec![Gesture::SwipeDown]);

        let (fired, _) = run(&history_of(&[(1, 100), (0, 300)]), Layout::Vertical, 2);
        assert_eq!(fired, vec![Gesture::SwipeUp]);
    }

    #[test]
    fn swipe_timeout_is_inclusive() {
        let (fired, trace) = run(&history_of(&[(0, 100), (1, 600)]), Layout::Horizontal, 2);
        assert_eq!(fired, vec![Gesture::SwipeRight]);
        assert_eq!(trace.pair_gap_ms, 500);

        let (fired, trace) = run(&history_of(&[(0, 100), (1, 601)]), Layout::Horizontal, 2);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::PairTooSlow);
    }

    #[test]
    fn repeats_of_latest_sensor_are_skipped_when_pairing() {
        let history = history_of(&[(0, 100), (1, 200), (1, 300), (1, 400)]);
        let (fired, trace) = run(&history, Layout::Horizontal, 2);
        assert_eq!(fired, vec![Gesture::SwipeRight]);
        assert_eq!(trace.pair, Some((0, 1)));
        assert_eq!(trace.pair_gap_ms, 300);
    }

    #[test]
    fn pair_uses_nearest_differing_event_not_oldest() {
        // 1 -> 0 -> 1: the pair is (0, 1), so right, not a second left.
        let history = history_of(&[(1, 100), (0, 200), (1, 300)]);
        let (fired, trace) = run(&history, Layout::Horizontal, 2);
        assert_eq!(fired, vec![Gesture::SwipeRight]);
        assert_eq!(trace.pair, Some((0, 1)));
    }

    #[test]
    fn single_sensor_history_has_no_pair() {
        let (fired, trace) = run(&history_of(&[(0, 100), (0, 200)]), Layout::Horizontal, 2);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::NoDistinctPair);
    }

    #[test]
    fn too_few_registered_sensors_short_circuits() {
        let (fired, trace) = run(&history_of(&[(0, 100), (1, 200)]), Layout::Horizontal, 1);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::TooFewSensors);
        assert_eq!(trace.pair, None);
    }

    #[test]
    fn pairs_outside_the_table_fire_nothing() {
        let (fired, trace) = run(&history_of(&[(2, 100), (3, 200)]), Layout::Horizontal, 4);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::NoMatchingRule);
    }

    #[test]
    fn quad_layout_ignores_swipes() {
        let (fired, _) = run(&history_of(&[(0, 100), (1, 200)]), Layout::Quad, 4);
        assert!(fired.is_empty());
    }

    #[test]
    fn quad_clockwise_and_counter_clockwise() {
        let cw = history_of(&[(0, 100), (1, 300), (2, 500), (3, 700)]);
        let (fired, trace) = run(&cw, Layout::Quad, 4);
        assert_eq!(fired, vec![Gesture::CircleClockwise]);
        assert_eq!(trace.circle, Some([0, 1, 2, 3]));
        assert_eq!(trace.circle_span_ms, 600);

        let ccw = history_of(&[(0, 100), (3, 300), (2, 500), (1, 700)]);
        let (fired, _) = run(&ccw, Layout::Quad, 4);
        assert_eq!(fired, vec![Gesture::CircleCounterClockwise]);
    }

    #[test]
    fn other_quad_orders_fire_nothing() {
        for order in [[1, 2, 3, 0], [0, 2, 1, 3], [3, 2, 1, 0]] {
            let events: Vec<(SensorIndex, u32)> = order
                .iter()
                .enumerate()
                .map(|(step, sensor)| (*sensor, 100 + step as u32 * 100))
                .collect();
            let (fired, trace) = run(&history_of(&events), Layout::Quad, 4);
            assert!(fired.is_empty(), "order {order:?} fired {fired:?}");
            assert_eq!(trace.reject, RejectReason::NoMatchingRule);
        }
    }

    #[test]
    fn circle_window_is_twice_the_swipe_timeout() {
        let edge = history_of(&[(0, 0), (1, 400), (2, 800), (3, 1_000)]);
        let (fired, _) = run(&edge, Layout::Quad, 4);
        assert_eq!(fired, vec![Gesture::CircleClockwise]);

        let slow = history_of(&[(0, 0), (1, 400), (2, 800), (3, 1_001)]);
        let (fired, trace) = run(&slow, Layout::Quad, 4);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::CircleTooSlow);
    }

    #[test]
    fn circle_window_follows_configured_timeout() {
        let config = GestureConfig {
            layout: Layout::Quad,
            swipe_timeout_ms: 300,
            ..GestureConfig::DEFAULT
        };
        assert_eq!(config.circle_window_ms(), 600);

        let edge = history_of(&[(0, 0), (1, 200), (2, 400), (3, 600)]);
        let (fired, trace) = run_with(&edge, &config, 4);
        assert_eq!(fired, vec![Gesture::CircleClockwise]);
        assert_eq!(trace.circle_span_ms, 600);

        let slow = history_of(&[(0, 0), (1, 200), (2, 400), (3, 601)]);
        let (fired, trace) = run_with(&slow, &config, 4);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::CircleTooSlow);
    }

    #[test]
    fn circle_collapses_only_consecutive_repeats() {
        let history = history_of(&[(0, 100), (1, 200), (1, 250), (2, 300), (3, 400)]);
        let (fired, trace) = run(&history, Layout::Quad, 4);
        assert_eq!(fired, vec![Gesture::CircleClockwise]);
        assert_eq!(trace.circle, Some([0, 1, 2, 3]));

        // A return to an earlier sensor counts as a new entry.
        let history = history_of(&[(0, 100), (1, 200), (0, 300), (1, 400)]);
        let (fired, trace) = run(&history, Layout::Quad, 4);
        assert!(fired.is_empty());
        assert_eq!(trace.circle, Some([0, 1, 0, 1]));
    }

    #[test]
    fn circle_span_rescans_whole_history() {
        // An old activation of sensor 0 widens the span past the window even
        // though the selected run itself is fast.
        let history = history_of(&[
            (0, 0),
            (3, 10),
            (0, 900),
            (1, 950),
            (2, 1_000),
            (3, 1_050),
        ]);
        let (fired, trace) = run(&history, Layout::Quad, 4);
        assert!(fired.is_empty());
        assert_eq!(trace.circle, Some([0, 1, 2, 3]));
        assert_eq!(trace.circle_span_ms, 1_050);
        assert_eq!(trace.reject, RejectReason::CircleTooSlow);
    }

    #[test]
    fn circle_needs_four_events_and_four_sensors() {
        let short = history_of(&[(0, 100), (1, 200), (2, 300)]);
        let (_, trace) = run(&short, Layout::Quad, 4);
        assert_eq!(trace.reject, RejectReason::CircleIncomplete);

        let full = history_of(&[(0, 100), (1, 200), (2, 300), (3, 400)]);
        let (fired, trace) = run(&full, Layout::Quad, 3);
        assert!(fired.is_empty());
        assert_eq!(trace.reject, RejectReason::TooFewSensors);

        let repeats = history_of(&[(0, 100), (1, 200), (1, 300), (2, 400)]);
        let (_, trace) = run(&repeats, Layout::Quad, 4);
        assert_eq!(trace.reject, RejectReason::CircleIncomplete);
    }
}
