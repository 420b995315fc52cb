// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key and button code ranges. Button codes are the wscons button index plus one, so
//! they share the `0..=KEY_MAX` range with key codes.

/// Highest key or button code a seat tracks.
pub const KEY_MAX: u32 = 255;

/// Entries in each per-seat press count table.
pub const KEY_CNT: usize = KEY_MAX as usize + 1;

pub const BTN_LEFT: u32 = 1;
pub const BTN_MIDDLE: u32 = 2;
pub const BTN_RIGHT: u32 = 3;
pub const BTN_SIDE: u32 = 8;
pub const BTN_EXTRA: u32 = 9;
pub const BTN_FORWARD: u32 = 10;
pub const BTN_BACK: u32 = 11;
pub const BTN_TASK: u32 = 12;
