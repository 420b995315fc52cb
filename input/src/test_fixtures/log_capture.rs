// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{LogHandler, LogPriority};
use std::{cell::RefCell, rc::Rc};

/// Collects everything a [`Logger`] emits, for assertions.
///
/// [`Logger`]: crate::Logger
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    entries: Rc<RefCell<Vec<(LogPriority, String)>>>,
}

impl LogCapture {
    #[must_use]
    pub fn handler(&self) -> LogHandler {
        let entries = Rc::clone(&self.entries);
        Box::new(move |priority: LogPriority, message: &str| {
            entries.borrow_mut().push((priority, message.to_owned()));
        })
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(LogPriority, String)> { self.entries.borrow().clone() }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }
}
