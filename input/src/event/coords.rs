// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// A dpi-normalized delta, after acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedCoords {
    pub x: f64,
    pub y: f64,
}

/// A delta in device units that may hold fractional values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceFloatCoords {
    pub x: f64,
    pub y: f64,
}

/// An absolute position in device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceCoords {
    pub x: i32,
    pub y: i32,
}

impl NormalizedCoords {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

impl DeviceFloatCoords {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

impl DeviceCoords {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}
