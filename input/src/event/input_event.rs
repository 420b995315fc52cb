// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{
    DeviceNotifyEvent, EventType, GestureEvent, KeyboardEvent, PointerAxisEvent,
    PointerButtonEvent, PointerMotionEvent, Timestamped, TouchEvent,
};
use crate::DeviceId;

/// The payload of an [`Event`], one variant per [`EventType`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    DeviceAdded(DeviceNotifyEvent),
    DeviceRemoved(DeviceNotifyEvent),
    KeyboardKey(KeyboardEvent),
    PointerMotion(PointerMotionEvent),
    PointerButton(PointerButtonEvent),
    PointerAxis(PointerAxisEvent),
    TouchDown(TouchEvent),
    TouchUp(TouchEvent),
    TouchMotion(TouchEvent),
    TouchCancel(TouchEvent),
    TouchFrame(TouchEvent),
    GestureSwipeBegin(GestureEvent),
    GestureSwipeUpdate(GestureEvent),
    GestureSwipeEnd(GestureEvent),
    GesturePinchBegin(GestureEvent),
    GesturePinchUpdate(GestureEvent),
    GesturePinchEnd(GestureEvent),
}

impl EventKind {
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::DeviceAdded(_) => EventType::DeviceAdded,
            Self::DeviceRemoved(_) => EventType::DeviceRemoved,
            Self::KeyboardKey(_) => EventType::KeyboardKey,
            Self::PointerMotion(_) => EventType::PointerMotion,
            Self::PointerButton(_) => EventType::PointerButton,
            Self::PointerAxis(_) => EventType::PointerAxis,
            Self::TouchDown(_) => EventType::TouchDown,
            Self::TouchUp(_) => EventType::TouchUp,
            Self::TouchMotion(_) => EventType::TouchMotion,
            Self::TouchCancel(_) => EventType::TouchCancel,
            Self::TouchFrame(_) => EventType::TouchFrame,
            Self::GestureSwipeBegin(_) => EventType::GestureSwipeBegin,
            Self::GestureSwipeUpdate(_) => EventType::GestureSwipeUpdate,
            Self::GestureSwipeEnd(_) => EventType::GestureSwipeEnd,
            Self::GesturePinchBegin(_) => EventType::GesturePinchBegin,
            Self::GesturePinchUpdate(_) => EventType::GesturePinchUpdate,
            Self::GesturePinchEnd(_) => EventType::GesturePinchEnd,
        }
    }

    #[must_use]
    pub fn time_usec(&self) -> u64 {
        match self {
            Self::DeviceAdded(it) | Self::DeviceRemoved(it) => it.time_usec(),
            Self::KeyboardKey(it) => it.time_usec(),
            Self::PointerMotion(it) => it.time_usec(),
            Self::PointerButton(it) => it.time_usec(),
            Self::PointerAxis(it) => it.time_usec(),
            Self::TouchDown(it)
            | Self::TouchUp(it)
            | Self::TouchMotion(it)
            | Self::TouchCancel(it)
            | Self::TouchFrame(it) => it.time_usec(),
            Self::GestureSwipeBegin(it)
            | Self::GestureSwipeUpdate(it)
            | Self::GestureSwipeEnd(it)
            | Self::GesturePinchBegin(it)
            | Self::GesturePinchUpdate(it)
            | Self::GesturePinchEnd(it) => it.time_usec(),
        }
    }
}

/// One normalized input event.
///
/// An event holds a reference on its device from the moment it is posted until it is
/// handed back to [`Context::event_destroy()`], so [`Self::device()`] stays valid even
/// if the device was removed in the meantime. It is deliberately not [`Clone`]: each
/// value owns exactly one device reference.
///
/// Dropping an event instead of destroying it leaks that reference: the device (and
/// its seat) then stays alive until the [`Context`] is torn down.
///
/// [`Context::event_destroy()`]: crate::Context::event_destroy
/// [`Context`]: crate::Context
#[must_use = "pass the event to Context::event_destroy() to release its device reference"]
#[derive(Debug, PartialEq)]
pub struct Event {
    device: DeviceId,
    kind: EventKind,
}

impl Event {
    pub(crate) fn new(device: DeviceId, kind: EventKind) -> Self { Self { device, kind } }

    #[must_use]
    pub fn device(&self) -> DeviceId { self.device }

    #[must_use]
    pub fn kind(&self) -> &EventKind { &self.kind }

    #[must_use]
    pub fn event_type(&self) -> EventType { self.kind.event_type() }

    #[must_use]
    pub fn time_usec(&self) -> u64 { self.kind.time_usec() }

    #[must_use]
    pub fn device_notify(&self) -> Option<&DeviceNotifyEvent> {
        match &self.kind {
            EventKind::DeviceAdded(it) | EventKind::DeviceRemoved(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn keyboard(&self) -> Option<&KeyboardEvent> {
        match &self.kind {
            EventKind::KeyboardKey(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn pointer_motion(&self) -> Option<&PointerMotionEvent> {
        match &self.kind {
            EventKind::PointerMotion(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn pointer_button(&self) -> Option<&PointerButtonEvent> {
        match &self.kind {
            EventKind::PointerButton(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn pointer_axis(&self) -> Option<&PointerAxisEvent> {
        match &self.kind {
            EventKind::PointerAxis(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn touch(&self) -> Option<&TouchEvent> {
        match &self.kind {
            EventKind::TouchDown(it)
            | EventKind::TouchUp(it)
            | EventKind::TouchMotion(it)
            | EventKind::TouchCancel(it)
            | EventKind::TouchFrame(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn gesture(&self) -> Option<&GestureEvent> {
        match &self.kind {
            EventKind::GestureSwipeBegin(it)
            | EventKind::GestureSwipeUpdate(it)
            | EventKind::GestureSwipeEnd(it)
            | EventKind::GesturePinchBegin(it)
            | EventKind::GesturePinchUpdate(it)
            | EventKind::GesturePinchEnd(it) => Some(it),
            _ => None,
        }
    }
}
