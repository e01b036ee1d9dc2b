// Pointer tracker: the one interaction point the particles react to.
// Visual: where the "hole" in the text opens up.

/// Input delivered by the host between frames, in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    TouchStart,
    TouchMove { x: f32, y: f32 },
    TouchEnd,
}

/// Current interaction point plus whether a finger is down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub x: f32,
    pub y: f32,
    pub touching: bool,
}

pub struct PointerTracker {
    state: InteractionState,
    touch_capable: bool, // result of the host's touch capability probe
}

impl PointerTracker {
    pub fn new(touch_capable: bool) -> Self {
        Self { state: InteractionState::default(), touch_capable }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } | InputEvent::TouchMove { x, y } => {
                self.state.x = x;
                self.state.y = y;
            }
            InputEvent::TouchStart => self.state.touching = true,
            InputEvent::TouchEnd => {
                self.state = InteractionState::default();
            }
            // Touch devices synthesize leave events mid-gesture; ignore them there.
            InputEvent::PointerLeave if !self.touch_capable => {
                self.state.x = 0.0;
                self.state.y = 0.0;
            }
            InputEvent::PointerLeave => {}
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether particles near the point should be pushed away this frame.
    /// Mouse devices always repel; touch devices only while a finger is down.
    pub fn repels(&self) -> bool {
        !self.touch_capable || self.state.touching
    }
}
