//! Table of block formats addressed by handle
//!
//! Paragraph presentations refer to their formats, and to the format driving
//! their list numbering, through [`FormatId`] handles instead of references.

use crate::{BlockFormat, DocModelError, Result};
use serde::{Deserialize, Serialize};

/// Handle of a format stored in a [`FormatTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormatId(pub u32);

/// Owning store of block formats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatTable {
    formats: Vec<BlockFormat>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a format and return its handle
    pub fn insert(&mut self, format: BlockFormat) -> FormatId {
        self.formats.push(format);
        FormatId((self.formats.len() - 1) as u32)
    }

    pub fn get(&self, id: FormatId) -> Option<&BlockFormat> {
        self.formats.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: FormatId) -> Option<&mut BlockFormat> {
        self.formats.get_mut(id.0 as usize)
    }

    /// Like [`FormatTable::get`] but reports a missing handle as an error
    pub fn require(&self, id: FormatId) -> Result<&BlockFormat> {
        self.get(id).ok_or(DocModelError::FormatNotFound(id.0))
    }

    /// Replace a format, returning the previous one
    pub fn replace(&mut self, id: FormatId, format: BlockFormat) -> Result<BlockFormat> {
        let slot = self
            .formats
            .get_mut(id.0 as usize)
            .ok_or(DocModelError::FormatNotFound(id.0))?;
        Ok(std::mem::replace(slot, format))
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
