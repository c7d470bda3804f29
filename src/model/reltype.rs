//! Relation-type registry: append-only interned relation names.

use hashbrown::HashMap;

use super::RelTypeMask;
use crate::{Error, Result};

/// Insertion-ordered set of distinct relation-type names.
///
/// A name's position is its bit index in every edge's [`RelTypeMask`].
/// The registry never shrinks; interning past [`RelTypeMask::CAPACITY`]
/// fails with [`Error::RelTypeCapacity`].
#[derive(Debug, Default)]
pub struct RelTypeRegistry {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl RelTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from names in registration order (snapshot load).
    pub(crate) fn from_names(names: Vec<String>) -> Result<Self> {
        let mut reg = Self::new();
        for name in names {
            reg.intern(&name)?;
        }
        Ok(reg)
    }

    /// Return the bit for `name`, registering it if unseen.
    pub fn intern(&mut self, name: &str) -> Result<usize> {
        if let Some(&bit) = self.index.get(name) {
            return Ok(bit);
        }
        if self.names.len() >= RelTypeMask::CAPACITY {
            return Err(Error::RelTypeCapacity {
                name: name.to_string(),
                capacity: RelTypeMask::CAPACITY,
            });
        }
        let bit = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), bit);
        Ok(bit)
    }

    /// Bit index of an already-registered name.
    pub fn bit(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name(&self, bit: usize) -> Option<&str> {
        self.names.get(bit).map(String::as_str)
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
