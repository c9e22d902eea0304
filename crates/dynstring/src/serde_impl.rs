//! `serde` support: a buffer serializes as the sequence of its content cells.
use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use crate::{
    DString,
    allocator::{Allocator, Global},
    cell::CharCell,
};

impl<C: CharCell + Serialize, A: Allocator> Serialize for DString<C, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_cells().serialize(serializer)
    }
}

/// Deserializes with [`DString::from_cells`] semantics: the content ends at
/// the first terminator in the input sequence.
impl<'de, C: CharCell + Deserialize<'de>> Deserialize<'de> for DString<C, Global> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cells = Vec::<C>::deserialize(deserializer)?;
        DString::from_cells_in(&cells, Global).map_err(D::Error::custom)
    }
}
