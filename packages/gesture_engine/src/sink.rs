use crate::types::Gesture;

/// Receives recognized gestures synchronously from inside `update()`.
pub trait GestureSink {
    fn on_gesture(&mut self, gesture: Gesture);
}

impl<T: GestureSink + ?Sized> GestureSink for &mut T {
    fn on_gesture(&mut self, gesture: Gesture) {
        (**self).on_gesture(gesture)
    }
}

pub type GestureHandler = fn();

/// One optional handler per gesture kind. Binding again replaces the
/// previous handler; unbound gestures are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureBindings {
    slots: [Option<GestureHandler>; Gesture::COUNT],
}

impl GestureBindings {
    pub const fn new() -> Self {
        Self {
            slots: [None; Gesture::COUNT],
        }
    }

    pub fn bind(&mut self, gesture: Gesture, handler: GestureHandler) {
        self.slots[gesture.index()] = Some(handler);
    }

    pub fn unbind(&mut self, gesture: Gesture) {
        self.slots[gesture.index()] = None;
    }

    pub fn is_bound(&self, gesture: Gesture) -> bool {
        self.slots[gesture.index()].is_some()
    }

    pub fn on_swipe_left(&mut self, handler: GestureHandler) {
        self.bind(Gesture::SwipeLeft, handler);
    }

    pub fn on_swipe_right(&mut self, handler: GestureHandler) {
        self.bind(Gesture::SwipeRight, handler);
    }

    pub fn on_swipe_up(&mut self, handler: GestureHandler) {
        self.bind(Gesture::SwipeUp, handler);
    }

    pub fn on_swipe_down(&mut self, handler: GestureHandler) {
        self.bind(Gesture::SwipeDown, handler);
    }

    pub fn on_circle_clockwise(&mut self, handler: GestureHandler) {
        self.bind(Gesture::CircleClockwise, handler);
    }

    pub fn on_circle_counter_clockwise(&mut self, handler: GestureHandler) {
        self.bind(Gesture::CircleCounterClockwise, handler);
    }
}

impl GestureSink for GestureBindings {
    fn on_gesture(&mut self, gesture: Gesture) {
        if let Some(handler) = self.slots[gesture.index()] {
            handler();
        }
    }
}
