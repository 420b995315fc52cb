// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! One payload struct per event family. Each is reached through a typed accessor on
//! [`Event`], so reading a key code off a pointer event can't compile.
//!
//! [`Event`]: crate::Event

use super::{DeviceCoords, DeviceFloatCoords, NormalizedCoords};
use crate::PressState;

/// Timestamps are kept in microseconds. [`Self::time()`] is the millisecond view,
/// truncated to 32 bits (it wraps after ~49 days).
pub trait Timestamped {
    fn time_usec(&self) -> u64;

    #[allow(clippy::cast_possible_truncation)]
    fn time(&self) -> u32 { (self.time_usec() / 1000) as u32 }
}

macro_rules! impl_timestamped {
    ($($payload:ty),* $(,)?) => {
        $(
            impl Timestamped for $payload {
                fn time_usec(&self) -> u64 { self.time_usec }
            }
        )*
    };
}

impl_timestamped!(
    DeviceNotifyEvent,
    KeyboardEvent,
    PointerMotionEvent,
    PointerButtonEvent,
    PointerAxisEvent,
    TouchEvent,
    GestureEvent,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
}

impl From<KeyState> for PressState {
    fn from(state: KeyState) -> Self {
        match state {
            KeyState::Released => PressState::Released,
            KeyState::Pressed => PressState::Pressed,
        }
    }
}

impl From<ButtonState> for PressState {
    fn from(state: ButtonState) -> Self {
        match state {
            ButtonState::Released => PressState::Released,
            ButtonState::Pressed => PressState::Pressed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAxis {
    ScrollVertical,
    ScrollHorizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSource {
    Wheel,
    Finger,
    Continuous,
    WheelTilt,
}

/// Where a swipe or pinch is in its lifetime. `End` carries whether the gesture was
/// cancelled instead of completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Begin,
    Update,
    End { cancelled: bool },
}

/// Payload of [`EventType::DeviceAdded`] and [`EventType::DeviceRemoved`].
///
/// [`EventType::DeviceAdded`]: crate::EventType::DeviceAdded
/// [`EventType::DeviceRemoved`]: crate::EventType::DeviceRemoved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceNotifyEvent {
    pub time_usec: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub time_usec: u64,
    pub key: u32,
    pub state: KeyState,
    /// Devices in the seat holding `key` down, including this one, right after this
    /// event.
    pub seat_key_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMotionEvent {
    pub time_usec: u64,
    pub delta: NormalizedCoords,
    pub delta_raw: DeviceFloatCoords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerButtonEvent {
    pub time_usec: u64,
    pub button: u32,
    pub state: ButtonState,
    pub seat_button_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerAxisEvent {
    pub time_usec: u64,
    pub delta: NormalizedCoords,
    pub delta_raw: DeviceFloatCoords,
    pub source: AxisSource,
}

impl PointerAxisEvent {
    /// An axis is present when its delta is non-zero.
    #[must_use]
    pub fn has_axis(&self, axis: PointerAxis) -> bool { self.axis_value(axis) != 0.0 }

    #[must_use]
    pub fn axis_value(&self, axis: PointerAxis) -> f64 {
        match axis {
            PointerAxis::ScrollVertical => self.delta.y,
            PointerAxis::ScrollHorizontal => self.delta.x,
        }
    }

    #[must_use]
    pub fn axis_value_raw(&self, axis: PointerAxis) -> f64 {
        match axis {
            PointerAxis::ScrollVertical => self.delta_raw.y,
            PointerAxis::ScrollHorizontal => self.delta_raw.x,
        }
    }
}

/// Payload of every touch event. Frame events carry no slot and use `-1`, as do
/// cancel events for the whole device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub time_usec: u64,
    pub slot: i32,
    pub seat_slot: i32,
    pub point: DeviceCoords,
}

/// Payload of every swipe and pinch event. Swipes leave `scale` at 1.0 and `angle` at
/// 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub time_usec: u64,
    pub finger_count: u32,
    /// Only meaningful on end events.
    pub cancelled: bool,
    pub delta: NormalizedCoords,
    pub delta_unaccel: NormalizedCoords,
    pub scale: f64,
    pub angle: f64,
}

/// Motion carried by a gesture notification. Swipes have no scale or rotation; use
/// [`Self::swipe()`] for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMotion {
    pub delta: NormalizedCoords,
    pub delta_unaccel: NormalizedCoords,
    pub scale: f64,
    pub angle: f64,
}

impl GestureMotion {
    #[must_use]
    pub const fn swipe(delta: NormalizedCoords, delta_unaccel: NormalizedCoords) -> Self {
        Self {
            delta,
            delta_unaccel,
            scale: 1.0,
            angle: 0.0,
        }
    }

    #[must_use]
    pub const fn pinch(
        delta: NormalizedCoords,
        delta_unaccel: NormalizedCoords,
        scale: f64,
        angle: f64,
    ) -> Self {
        Self {
            delta,
            delta_unaccel,
            scale,
            angle,
        }
    }
}
