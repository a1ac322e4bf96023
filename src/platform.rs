//! The host document the map is mounted in.
//!
//! The map never talks to a browser directly. It looks up elements by id and
//! sets the pointer cursor through `Document`, which a web host implements
//! over the DOM and tests implement in memory.

use crate::{prelude::HashMap, MapError, Result};
use std::sync::{Arc, Mutex};

/// Pointer cursor shown over the map element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a clickable marker
    Pointer,
    /// Over empty map, which can be dragged
    Move,
}

impl Cursor {
    /// CSS cursor keyword
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Move => "move",
        }
    }
}

pub trait Document: Send + Sync {
    fn has_element(&self, id: &str) -> bool;

    /// Sets the cursor style of element `id`
    fn set_cursor(&self, id: &str, cursor: Cursor) -> Result<()>;
}

/// In-memory document. Clones share the same elements.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Arc<Mutex<HashMap<String, Cursor>>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document containing the given element ids
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let document = Self::new();
        for id in ids {
            document.add_element(id);
        }
        document
    }

    pub fn add_element(&self, id: impl Into<String>) {
        if let Ok(mut elements) = self.elements.lock() {
            elements.entry(id.into()).or_default();
        }
    }

    /// Current cursor of an element, `None` when the element does not exist
    pub fn cursor(&self, id: &str) -> Option<Cursor> {
        self.elements.lock().ok()?.get(id).copied()
    }
}

impl Document for MemoryDocument {
    fn has_element(&self, id: &str) -> bool {
        self.elements
            .lock()
            .map(|elements| elements.contains_key(id))
            .unwrap_or(false)
    }

    fn set_cursor(&self, id: &str, cursor: Cursor) -> Result<()> {
        let mut elements = self
            .elements
            .lock()
            .map_err(|_| MapError::ElementNotFound(id.to_string()))?;
        match elements.get_mut(id) {
            Some(current) => {
                *current = cursor;
                Ok(())
            }
            None => Err(MapError::ElementNotFound(id.to_string())),
        }
    }
}
