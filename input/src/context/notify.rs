// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Entry points for device backends. Each one checks the device's capability, builds
//! the event, and posts it.
//!
//! A capability mismatch is a bug in the backend, not something the application can
//! act on: it is logged (rate limited) as a library bug and the call returns `Ok(())`
//! without queueing anything.

use super::Context;
use crate::{AxisSource, BugKind, ButtonState, DeviceCapability, DeviceCoords,
            DeviceFloatCoords, DeviceId, EventKind, GestureEvent, GestureMotion,
            GesturePhase, InputResult, KeyState, KeyboardEvent, NormalizedCoords,
            PointerAxisEvent, PointerButtonEvent, PointerMotionEvent, TouchEvent};

/// Slot value for touch events that don't belong to one touch point.
const NO_SLOT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureKind {
    Swipe,
    Pinch,
}

impl Context {
    /// # Errors
    ///
    /// - [`ContractViolation::StaleDevice`] if the device was destroyed.
    /// - [`ContractViolation::CodeOutOfRange`] if `key > KEY_MAX`.
    ///
    /// [`ContractViolation::CodeOutOfRange`]: crate::ContractViolation::CodeOutOfRange
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn keyboard_notify_key(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        key: u32,
        state: KeyState,
    ) -> InputResult<()> {
        if !self.device_has_capability(device, DeviceCapability::Keyboard)? {
            return Ok(());
        }

        let seat = self.graph.device(device)?.seat();
        let seat_key_count = self
            .graph
            .seat_mut(seat)?
            .update_key_count(key, state.into())?;

        self.post_event(
            device,
            EventKind::KeyboardKey(KeyboardEvent {
                time_usec,
                key,
                state,
                seat_key_count,
            }),
        )
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn pointer_notify_motion(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        delta: NormalizedCoords,
        delta_raw: DeviceFloatCoords,
    ) -> InputResult<()> {
        if !self.device_has_capability(device, DeviceCapability::Pointer)? {
            return Ok(());
        }

        self.post_event(
            device,
            EventKind::PointerMotion(PointerMotionEvent {
                time_usec,
                delta,
                delta_raw,
            }),
        )
    }

    /// # Errors
    ///
    /// - [`ContractViolation::StaleDevice`] if the device was destroyed.
    /// - [`ContractViolation::CodeOutOfRange`] if `button > KEY_MAX`.
    ///
    /// [`ContractViolation::CodeOutOfRange`]: crate::ContractViolation::CodeOutOfRange
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn pointer_notify_button(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        button: u32,
        state: ButtonState,
    ) -> InputResult<()> {
        if !self.device_has_capability(device, DeviceCapability::Pointer)? {
            return Ok(());
        }

        let seat = self.graph.device(device)?.seat();
        let seat_button_count = self
            .graph
            .seat_mut(seat)?
            .update_button_count(button, state.into())?;

        self.post_event(
            device,
            EventKind::PointerButton(PointerButtonEvent {
                time_usec,
                button,
                state,
                seat_button_count,
            }),
        )
    }

    /// Scroll wheel motion. An axis is reported present when its delta is non-zero.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn pointer_notify_axis(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        delta: NormalizedCoords,
        delta_raw: DeviceFloatCoords,
    ) -> InputResult<()> {
        if !self.device_has_capability(device, DeviceCapability::Pointer)? {
            return Ok(());
        }

        self.post_event(
            device,
            EventKind::PointerAxis(PointerAxisEvent {
                time_usec,
                delta,
                delta_raw,
                source: AxisSource::Wheel,
            }),
        )
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn touch_notify_touch_down(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        slot: i32,
        seat_slot: i32,
        point: DeviceCoords,
    ) -> InputResult<()> {
        self.post_touch(device, time_usec, slot, seat_slot, point, EventKind::TouchDown)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn touch_notify_touch_motion(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        slot: i32,
        seat_slot: i32,
        point: DeviceCoords,
    ) -> InputResult<()> {
        self.post_touch(device, time_usec, slot, seat_slot, point, EventKind::TouchMotion)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn touch_notify_touch_up(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        slot: i32,
        seat_slot: i32,
    ) -> InputResult<()> {
        let point = DeviceCoords::default();
        self.post_touch(device, time_usec, slot, seat_slot, point, EventKind::TouchUp)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn touch_notify_touch_cancel(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        slot: i32,
        seat_slot: i32,
    ) -> InputResult<()> {
        let point = DeviceCoords::default();
        self.post_touch(device, time_usec, slot, seat_slot, point, EventKind::TouchCancel)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn touch_notify_frame(&mut self, device: DeviceId, time_usec: u64) -> InputResult<()> {
        let point = DeviceCoords::default();
        self.post_touch(device, time_usec, NO_SLOT, NO_SLOT, point, EventKind::TouchFrame)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn gesture_notify_swipe(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        phase: GesturePhase,
        finger_count: u32,
        motion: GestureMotion,
    ) -> InputResult<()> {
        let motion = GestureMotion::swipe(motion.delta, motion.delta_unaccel);
        self.post_gesture(device, time_usec, GestureKind::Swipe, phase, finger_count, motion)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn gesture_notify_pinch(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        phase: GesturePhase,
        finger_count: u32,
        motion: GestureMotion,
    ) -> InputResult<()> {
        self.post_gesture(device, time_usec, GestureKind::Pinch, phase, finger_count, motion)
    }

    fn post_touch(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        slot: i32,
        seat_slot: i32,
        point: DeviceCoords,
        make_kind: fn(TouchEvent) -> EventKind,
    ) -> InputResult<()> {
        if !self.device_has_capability(device, DeviceCapability::Touch)? {
            return Ok(());
        }

        self.post_event(
            device,
            make_kind(TouchEvent {
                time_usec,
                slot,
                seat_slot,
                point,
            }),
        )
    }

    fn post_gesture(
        &mut self,
        device: DeviceId,
        time_usec: u64,
        kind: GestureKind,
        phase: GesturePhase,
        finger_count: u32,
        motion: GestureMotion,
    ) -> InputResult<()> {
        if !self.device_has_capability(device, DeviceCapability::Gesture)? {
            return Ok(());
        }

        let cancelled = matches!(phase, GesturePhase::End { cancelled: true });
        let payload = GestureEvent {
            time_usec,
            finger_count,
            cancelled,
            delta: motion.delta,
            delta_unaccel: motion.delta_unaccel,
            scale: motion.scale,
            angle: motion.angle,
        };
        let event_kind = match (kind, phase) {
            (GestureKind::Swipe, GesturePhase::Begin) => EventKind::GestureSwipeBegin(payload),
            (GestureKind::Swipe, GesturePhase::Update) => {
                EventKind::GestureSwipeUpdate(payload)
            }
            (GestureKind::Swipe, GesturePhase::End { .. }) => {
                EventKind::GestureSwipeEnd(payload)
            }
            (GestureKind::Pinch, GesturePhase::Begin) => EventKind::GesturePinchBegin(payload),
            (GestureKind::Pinch, GesturePhase::Update) => {
                EventKind::GesturePinchUpdate(payload)
            }
            (GestureKind::Pinch, GesturePhase::End { .. }) => {
                EventKind::GesturePinchEnd(payload)
            }
        };
        self.post_event(device, event_kind)
    }

    /// The capability gate. `Ok(false)` means the caller must drop the event.
    fn device_has_capability(
        &mut self,
        device: DeviceId,
        capability: DeviceCapability,
    ) -> InputResult<bool> {
        let device = self.graph.device(device)?;
        if device.has_capability(capability) {
            return Ok(true);
        }

        let message = format!(
            "Event for missing capability {capability} on device \"{}\"",
            device.name()
        );
        self.logger
            .bug_ratelimited(&mut self.bug_log_ratelimit, BugKind::Library, &message);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BTN_LEFT, ContractViolation, DeviceCapabilities, EventType, InputError,
                KEY_MAX, LogPriority, PointerAxis, Timestamped,
                test_fixtures::{LogCapture, test_context}};
    use pretty_assertions::assert_eq;

    fn drain_types(context: &mut Context) -> Vec<EventType> {
        let mut types = vec![];
        while let Some(event) = context.get_next_event() {
            types.push(event.event_type());
            context.event_destroy(event).unwrap();
        }
        types
    }

    #[test]
    fn test_seat0_key_counts_across_two_devices() {
        let mut context = test_context();
        let seat = context.create_seat("seat0", "seat0");
        let kbd_a = context
            .create_device(seat, "kbd-a", DeviceCapabilities::KEYBOARD)
            .unwrap();
        let kbd_b = context
            .create_device(seat, "kbd-b", DeviceCapabilities::KEYBOARD)
            .unwrap();

        context
            .keyboard_notify_key(kbd_a, 1_000, 30, KeyState::Pressed)
            .unwrap();
        context
            .keyboard_notify_key(kbd_b, 2_000, 30, KeyState::Pressed)
            .unwrap();

        let mut counts = vec![];
        for _ in 0..2 {
            let event = context.get_next_event().unwrap();
            counts.push(event.keyboard().unwrap().seat_key_count);
            context.event_destroy(event).unwrap();
        }
        assert_eq!(counts, vec![1, 2]);

        context
            .keyboard_notify_key(kbd_a, 3_000, 30, KeyState::Released)
            .unwrap();
        context
            .keyboard_notify_key(kbd_b, 4_000, 30, KeyState::Released)
            .unwrap();

        let mut counts = vec![];
        while let Some(event) = context.get_next_event() {
            let keyboard = event.keyboard().unwrap();
            assert_eq!(keyboard.state, KeyState::Released);
            counts.push(keyboard.seat_key_count);
            context.event_destroy(event).unwrap();
        }
        assert_eq!(counts, vec![1, 0]);
        assert_eq!(context.seat(seat).unwrap().key_count(30), Some(0));
    }

    #[test]
    fn test_release_without_press_floors_at_zero() {
        let mut context = test_context();
        let seat = context.create_seat("seat0", "seat0");
        let mouse = context
            .create_device(seat, "mouse", DeviceCapabilities::POINTER)
            .unwrap();

        context
            .pointer_notify_button(mouse, 1, BTN_LEFT, ButtonState::Released)
            .unwrap();
        context
            .pointer_notify_button(mouse, 2, BTN_LEFT, ButtonState::Pressed)
            .unwrap();

        let first = context.get_next_event().unwrap();
        let second = context.get_next_event().unwrap();
        assert_eq!(first.pointer_button().unwrap().seat_button_count, 0);
        assert_eq!(second.pointer_button().unwrap().seat_button_count, 1);
        assert_eq!(context.seat(seat).unwrap().button_count(BTN_LEFT), Some(1));
        // Key and button counts are separate tables.
        assert_eq!(context.seat(seat).unwrap().key_count(BTN_LEFT), Some(0));
        context.event_destroy(first).unwrap();
        context.event_destroy(second).unwrap();
    }

    #[test]
    fn test_capability_gate_logs_once_and_queues_nothing() {
        let capture = LogCapture::default();
        let mut context = test_context();
        context.set_log_handler(Some(capture.handler()));
        let seat = context.create_seat("seat0", "seat0");
        let kbd = context
            .create_device(seat, "kbd", DeviceCapabilities::KEYBOARD)
            .unwrap();

        let before = context.pending_event_count();
        context
            .pointer_notify_button(kbd, 1, BTN_LEFT, ButtonState::Pressed)
            .unwrap();

        assert_eq!(context.pending_event_count(), before);
        assert_eq!(
            capture.entries(),
            vec![(
                LogPriority::Error,
                "library bug: Event for missing capability CAP_POINTER on device \"kbd\""
                    .to_string()
            )]
        );
        // The gate runs before the counters are touched.
        assert_eq!(context.seat(seat).unwrap().button_count(BTN_LEFT), Some(0));
    }

    #[test]
    fn test_capability_gate_is_ratelimited() {
        let capture = LogCapture::default();
        let mut context = test_context();
        context.set_log_handler(Some(capture.handler()));
        let seat = context.create_seat("seat0", "seat0");
        let kbd = context
            .create_device(seat, "kbd", DeviceCapabilities::KEYBOARD)
            .unwrap();

        for it in 0..20 {
            context
                .touch_notify_touch_down(kbd, it, 0, 0, DeviceCoords::new(1, 1))
                .unwrap();
        }

        // Five messages, then the notice.
        assert_eq!(capture.entries().len(), 6);
        assert!(context.get_next_event().is_none());
    }

    #[test]
    fn test_out_of_range_key_is_refused() {
        let mut context = test_context();
        let seat = context.create_seat("seat0", "seat0");
        let kbd = context
            .create_device(seat, "kbd", DeviceCapabilities::KEYBOARD)
            .unwrap();

        let result = context.keyboard_notify_key(kbd, 1, KEY_MAX + 1, KeyState::Pressed);
        assert!(matches!(
            result,
            Err(InputError::ContractViolation(
                ContractViolation::CodeOutOfRange { code: 256, max: 255 }
            ))
        ));
        assert_eq!(context.pending_event_count(), 0);
        // The refused call took no device reference.
        assert_eq!(context.device(kbd).unwrap().refcount(), 1);
    }

    #[test]
    fn test_pointer_motion_and_axis() {
        let mut context = test_context();
        let seat = context.create_seat("seat0", "seat0");
        let mouse = context
            .create_device(seat, "mouse", DeviceCapabilities::POINTER)
            .unwrap();

        context
            .pointer_notify_motion(
                mouse,
                10_500,
                NormalizedCoords::new(1.5, -2.0),
                DeviceFloatCoords::new(3.0, -4.0),
            )
            .unwrap();
        context
            .pointer_notify_axis(
                mouse,
                11_000,
                NormalizedCoords::new(0.0, 4.0),
                DeviceFloatCoords::default(),
            )
            .unwrap();

        let motion = context.get_next_event().unwrap();
        let payload = motion.pointer_motion().unwrap();
        assert_eq!(payload.delta, NormalizedCoords::new(1.5, -2.0));
        assert_eq!(payload.delta_raw, DeviceFloatCoords::new(3.0, -4.0));
        assert_eq!(payload.time(), 10);
        context.event_destroy(motion).unwrap();

        let axis = context.get_next_event().unwrap();
        let payload = axis.pointer_axis().unwrap();
        assert_eq!(payload.source, AxisSource::Wheel);
        assert!(payload.has_axis(PointerAxis::ScrollVertical));
        assert!(!payload.has_axis(PointerAxis::ScrollHorizontal));
        context.event_destroy(axis).unwrap();
    }

    #[test]
    fn test_touch_sequence() {
        let mut context = test_context();
        let seat = context.create_seat("seat0", "seat0");
        let screen = context
            .create_device(seat, "touchscreen", DeviceCapabilities::TOUCH)
            .unwrap();

        context
            .touch_notify_touch_down(screen, 1, 0, 4, DeviceCoords::new(10, 20))
            .unwrap();
        context
            .touch_notify_touch_motion(screen, 2, 0, 4, DeviceCoords::new(11, 22))
            .unwrap();
        context.touch_notify_frame(screen, 3).unwrap();
        context.touch_notify_touch_up(screen, 4, 0, 4).unwrap();
        context.touch_notify_touch_cancel(screen, 5, 1, 5).unwrap();

        let down = context.get_next_event().unwrap();
        assert_eq!(
            down.touch(),
            Some(&TouchEvent {
                time_usec: 1,
                slot: 0,
                seat_slot: 4,
                point: DeviceCoords::new(10, 20),
            })
        );
        context.event_destroy(down).unwrap();

        let motion = context.get_next_event().unwrap();
        assert_eq!(motion.touch().unwrap().point, DeviceCoords::new(11, 22));
        context.event_destroy(motion).unwrap();

        let frame = context.get_next_event().unwrap();
        assert_eq!(frame.event_type(), EventType::TouchFrame);
        assert_eq!(frame.touch().unwrap().slot, -1);
        context.event_destroy(frame).unwrap();

        assert_eq!(
            drain_types(&mut context),
            vec![EventType::TouchUp, EventType::TouchCancel]
        );
    }

    #[test]
    fn test_gesture_phases() {
        let mut context = test_context();
        let seat = context.create_seat("seat0", "seat0");
        let pad = context
            .create_device(seat, "touchpad", DeviceCapabilities::GESTURE)
            .unwrap();
        let delta = NormalizedCoords::new(1.0, 2.0);
        let pinch = GestureMotion::pinch(delta, delta, 1.5, 30.0);

        context
            .gesture_notify_swipe(pad, 1, GesturePhase::Begin, 3, pinch)
            .unwrap();
        context
            .gesture_notify_swipe(pad, 2, GesturePhase::End { cancelled: true }, 3, pinch)
            .unwrap();
        context
            .gesture_notify_pinch(pad, 3, GesturePhase::Update, 2, pinch)
            .unwrap();

        let begin = context.get_next_event().unwrap();
        let payload = begin.gesture().unwrap();
        assert_eq!(begin.event_type(), EventType::GestureSwipeBegin);
        assert_eq!(payload.finger_count, 3);
        // Swipes carry no scale or rotation.
        assert_eq!(payload.scale, 1.0);
        assert_eq!(payload.angle, 0.0);
        assert!(!payload.cancelled);
        context.event_destroy(begin).unwrap();

        let end = context.get_next_event().unwrap();
        assert_eq!(end.event_type(), EventType::GestureSwipeEnd);
        assert!(end.gesture().unwrap().cancelled);
        context.event_destroy(end).unwrap();

        let update = context.get_next_event().unwrap();
        assert_eq!(update.event_type(), EventType::GesturePinchUpdate);
        assert_eq!(update.gesture().unwrap().scale, 1.5);
        assert_eq!(update.gesture().unwrap().angle, 30.0);
        context.event_destroy(update).unwrap();
    }
}
