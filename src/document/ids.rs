//! Identity generation for new nodes and fields.
//!
//! The engine assumes generated ids are globally unique but never verifies it.

use uuid::Uuid;

/// Produces opaque, unique string ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUID ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids of the form `{prefix}{n}`, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
