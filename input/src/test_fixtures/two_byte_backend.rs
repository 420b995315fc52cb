// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A device backend for tests. Each record is two bytes, `[kind, value]`:
//!
//! | kind | meaning                                |
//! | :--- | :------------------------------------- |
//! | 0    | key `value` released                   |
//! | 1    | key `value` pressed                    |
//! | 2    | button `value` released                |
//! | 3    | button `value` pressed                 |
//! | 4    | vertical wheel, `value` as signed step |
//!
//! Unknown kinds are skipped. A trailing odd byte is dropped.

use crate::{ButtonState, Context, DeviceFloatCoords, DeviceId, KeyState, NormalizedCoords};
use std::os::fd::BorrowedFd;

const READ_BUFFER_SIZE: usize = 64;

pub fn two_byte_backend() -> impl FnMut(&mut Context, DeviceId, BorrowedFd<'_>) + 'static {
    |context: &mut Context, device: DeviceId, fd: BorrowedFd<'_>| {
        let mut buffer = [0_u8; READ_BUFFER_SIZE];
        let Ok(len) = rustix::io::read(fd, &mut buffer[..]) else {
            return;
        };
        let time_usec =
            u64::try_from(chrono::Utc::now().timestamp_micros()).unwrap_or_default();

        for record in buffer[..len].chunks_exact(2) {
            let value = record[1];
            let result = match record[0] {
                0 => context.keyboard_notify_key(
                    device,
                    time_usec,
                    u32::from(value),
                    KeyState::Released,
                ),
                1 => context.keyboard_notify_key(
                    device,
                    time_usec,
                    u32::from(value),
                    KeyState::Pressed,
                ),
                2 => context.pointer_notify_button(
                    device,
                    time_usec,
                    u32::from(value),
                    ButtonState::Released,
                ),
                3 => context.pointer_notify_button(
                    device,
                    time_usec,
                    u32::from(value),
                    ButtonState::Pressed,
                ),
                4 => {
                    let step = f64::from(i8::from_ne_bytes([value]));
                    context.pointer_notify_axis(
                        device,
                        time_usec,
                        NormalizedCoords::new(0.0, step),
                        DeviceFloatCoords::new(0.0, step),
                    )
                }
                _ => Ok(()),
            };
            if let Err(err) = result {
                tracing::debug!(message = "two byte backend: record refused", error = %err);
            }
        }
    }
}
