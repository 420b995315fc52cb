// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

bitflags::bitflags! {
    /// The classes of event a device may produce. Every notify function checks the
    /// matching flag before building an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceCapabilities: u8 {
        const KEYBOARD = 1 << 0;
        const POINTER = 1 << 1;
        const TOUCH = 1 << 2;
        const TABLET_TOOL = 1 << 3;
        const TABLET_PAD = 1 << 4;
        const GESTURE = 1 << 5;
        const SWITCH = 1 << 6;
    }
}

impl DeviceCapabilities {
    /// Static rule for wscons nodes: `/dev/wsmouse*` is a pointer, `/dev/wskbd*` is a
    /// keyboard, anything else declares nothing.
    #[must_use]
    pub fn from_device_path(path: &str) -> Self {
        if path.starts_with("/dev/wsmouse") {
            Self::POINTER
        } else if path.starts_with("/dev/wskbd") {
            Self::KEYBOARD
        } else {
            Self::empty()
        }
    }

    #[must_use]
    pub fn has(self, capability: DeviceCapability) -> bool {
        self.contains(capability.flag())
    }
}

/// A single capability, for naming one in diagnostics and queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum DeviceCapability {
    #[strum(serialize = "CAP_KEYBOARD")]
    Keyboard,
    #[strum(serialize = "CAP_POINTER")]
    Pointer,
    #[strum(serialize = "CAP_TOUCH")]
    Touch,
    #[strum(serialize = "CAP_TABLET_TOOL")]
    TabletTool,
    #[strum(serialize = "CAP_TABLET_PAD")]
    TabletPad,
    #[strum(serialize = "CAP_GESTURE")]
    Gesture,
    #[strum(serialize = "CAP_SWITCH")]
    Switch,
}

impl DeviceCapability {
    #[must_use]
    pub const fn flag(self) -> DeviceCapabilities {
        match self {
            Self::Keyboard => DeviceCapabilities::KEYBOARD,
            Self::Pointer => DeviceCapabilities::POINTER,
            Self::Touch => DeviceCapabilities::TOUCH,
            Self::TabletTool => DeviceCapabilities::TABLET_TOOL,
            Self::TabletPad => DeviceCapabilities::TABLET_PAD,
            Self::Gesture => DeviceCapabilities::GESTURE,
            Self::Switch => DeviceCapabilities::SWITCH,
        }
    }
}
