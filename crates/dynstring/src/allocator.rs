//! Pluggable storage strategies.
//!
//! A [`DString`](crate::DString) never touches the global allocator directly;
//! every allocation, resize and release goes through an [`Allocator`]. Storage
//! is handed around as a `Vec<C>` whose *length* is the buffer's capacity, so
//! every cell is always initialized and no `unsafe` is needed anywhere.
//!
//! Implementations must either perform the whole request or leave `storage`
//! untouched and return [`AllocError`]. The buffer relies on this to stay
//! valid after a refused reallocation.
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::{cell::CharCell, error::AllocError};

/// Allocation strategy injected into a [`DString`](crate::DString).
pub trait Allocator {
    /// Allocate `cells` cells, each initialized to the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the request cannot be satisfied.
    fn allocate<C: CharCell>(&self, cells: usize) -> Result<Vec<C>, AllocError>;

    /// Grow or shrink `storage` to exactly `cells` cells, preserving the first
    /// `min(storage.len(), cells)` of them. New cells hold the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the request cannot be satisfied, in which
    /// case `storage` is unchanged.
    fn reallocate<C: CharCell>(&self, storage: &mut Vec<C>, cells: usize)
    -> Result<(), AllocError>;

    /// Give `storage` back.
    fn release<C: CharCell>(&self, storage: Vec<C>) {
        drop(storage);
    }
}

/// The process allocator, reached through fallible `Vec` reservations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

impl Allocator for Global {
    fn allocate<C: CharCell>(&self, cells: usize) -> Result<Vec<C>, AllocError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(cells)
            .map_err(|_| AllocError { cells })?;
        storage.resize(cells, C::TERMINATOR);
        Ok(storage)
    }

    fn reallocate<C: CharCell>(
        &self,
        storage: &mut Vec<C>,
        cells: usize,
    ) -> Result<(), AllocError> {
        match cells.cmp(&storage.len()) {
            Ordering::Greater => {
                storage
                    .try_reserve_exact(cells - storage.len())
                    .map_err(|_| AllocError { cells })?;
                storage.resize(cells, C::TERMINATOR);
            }
            Ordering::Less => {
                storage.truncate(cells);
                storage.shrink_to_fit();
            }
            Ordering::Equal => {}
        }
        Ok(())
    }
}

/// Refuses any request larger than `max_cells`, otherwise behaves like
/// [`Global`].
///
/// Useful to cap the footprint of untrusted input and to make allocation
/// failure reproducible in tests.
///
/// ```rust
/// use dynstring::{Bounded, DString, Error};
///
/// let mut s = DString::<u8, _>::with_capacity_in(4, Bounded::new(4)).unwrap();
/// s.push_cells(b"abc").unwrap();
/// assert!(matches!(s.push(b'd'), Err(Error::Alloc(_))));
/// assert_eq!(s.as_cells(), b"abc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounded {
    max_cells: usize,
}

impl Bounded {
    /// Cap every allocation at `max_cells` cells.
    #[must_use]
    pub const fn new(max_cells: usize) -> Self {
        Self { max_cells }
    }

    /// The configured cap.
    #[must_use]
    pub const fn max_cells(&self) -> usize {
        self.max_cells
    }

    fn check(&self, cells: usize) -> Result<(), AllocError> {
        if cells > self.max_cells {
            return Err(AllocError { cells });
        }
        Ok(())
    }
}

impl Allocator for Bounded {
    fn allocate<C: CharCell>(&self, cells: usize) -> Result<Vec<C>, AllocError> {
        self.check(cells)?;
        Global.allocate(cells)
    }

    fn reallocate<C: CharCell>(
        &self,
        storage: &mut Vec<C>,
        cells: usize,
    ) -> Result<(), AllocError> {
        self.check(cells)?;
        Global.reallocate(storage, cells)
    }
}
