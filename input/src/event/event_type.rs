// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Tag of an [`Event`], returned by [`Context::peek_next_event_type()`] without
/// removing the event from the queue.
///
/// [`Context::peek_next_event_type()`]: crate::Context::peek_next_event_type
/// [`Event`]: crate::Event
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    DeviceAdded,
    DeviceRemoved,
    KeyboardKey,
    PointerMotion,
    PointerButton,
    PointerAxis,
    TouchDown,
    TouchUp,
    TouchMotion,
    TouchCancel,
    TouchFrame,
    GestureSwipeBegin,
    GestureSwipeUpdate,
    GestureSwipeEnd,
    GesturePinchBegin,
    GesturePinchUpdate,
    GesturePinchEnd,
}

impl EventType {
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::PointerMotion | Self::PointerButton | Self::PointerAxis)
    }

    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(
            self,
            Self::TouchDown
                | Self::TouchUp
                | Self::TouchMotion
                | Self::TouchCancel
                | Self::TouchFrame
        )
    }

    #[must_use]
    pub const fn is_gesture(self) -> bool {
        matches!(
            self,
            Self::GestureSwipeBegin
                | Self::GestureSwipeUpdate
                | Self::GestureSwipeEnd
                | Self::GesturePinchBegin
                | Self::GesturePinchUpdate
                | Self::GesturePinchEnd
        )
    }
}
