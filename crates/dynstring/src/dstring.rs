use alloc::vec::Vec;
use core::{alloc::Layout, ffi::CStr, fmt, slice};

use bstr::BStr;

use crate::{
    allocator::{Allocator, Global},
    cell::{CharCell, terminated_len},
    error::{AllocError, Error},
    tracing_compat::{debug, trace},
};

/// A growable, null-terminated buffer of character cells.
///
/// The buffer owns `capacity` cells, of which the first `size` are content and
/// the cell at `size` is always [`CharCell::TERMINATOR`]. Every successful
/// operation leaves `capacity >= size + 1`, so [`DString::to_cstring`] can be
/// handed to any terminator-based API without measuring it first.
///
/// ```rust
/// use dynstring::DString;
///
/// let mut s = DString::from("Hello, World");
/// assert_eq!((s.size(), s.capacity()), (12, 24));
///
/// s.push(b'!').unwrap();
/// assert_eq!(s.to_cstring().unwrap(), b"Hello, World!\0");
/// assert_eq!(s.pop(), Ok(b'!'));
/// ```
pub struct DString<C: CharCell = u8, A: Allocator = Global> {
    /// `None` once released. The vector's length is the capacity.
    storage: Option<Vec<C>>,
    size: usize,
    alloc: A,
}

/// Abort the way the global allocator does when it runs out of memory.
fn fatal<C>(err: AllocError) -> ! {
    let layout = Layout::array::<C>(err.cells).unwrap_or_else(|_| Layout::new::<C>());
    alloc::alloc::handle_alloc_error(layout)
}

impl<C: CharCell> DString<C, Global> {
    /// An empty buffer with room for the terminator only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Copy `source` up to its first terminator into a new buffer with twice
    /// that many cells of capacity.
    ///
    /// # Panics
    ///
    /// Aborts through [`alloc::alloc::handle_alloc_error`] if the allocation
    /// fails.
    #[must_use]
    pub fn from_cells(source: &[C]) -> Self {
        Self::from_cells_in(source, Global).unwrap_or_else(|err| fatal::<C>(err))
    }

    /// An empty buffer with `capacity` cells. A capacity of `0` still reserves
    /// the terminator slot.
    ///
    /// # Panics
    ///
    /// Aborts through [`alloc::alloc::handle_alloc_error`] if the allocation
    /// fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global).unwrap_or_else(|err| fatal::<C>(err))
    }
}

impl<C: CharCell, A: Allocator> DString<C, A> {
    /// Like [`DString::from_cells`], allocating through `alloc`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if `alloc` refuses the request.
    pub fn from_cells_in(source: &[C], alloc: A) -> Result<Self, AllocError> {
        let len = terminated_len(source);
        let capacity = len.checked_mul(2).ok_or(AllocError { cells: usize::MAX })?;
        let mut storage = alloc.allocate::<C>(capacity.max(1))?;
        storage[..len].copy_from_slice(&source[..len]);
        storage[len] = C::TERMINATOR;
        Ok(Self {
            storage: Some(storage),
            size: len,
            alloc,
        })
    }

    /// Like [`DString::with_capacity`], allocating through `alloc`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if `alloc` refuses the request.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut storage = alloc.allocate::<C>(capacity.max(1))?;
        storage[0] = C::TERMINATOR;
        Ok(Self {
            storage: Some(storage),
            size: 0,
            alloc,
        })
    }

    /// Copy of this buffer with the same capacity, from a clone of its
    /// allocator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`] on a destroyed buffer and
    /// [`Error::Alloc`] if the allocator refuses.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        A: Clone,
    {
        let cells = self.cells()?;
        let alloc = self.alloc.clone();
        let mut storage = alloc.allocate::<C>(cells.len())?;
        storage.copy_from_slice(cells);
        Ok(Self {
            storage: Some(storage),
            size: self.size,
            alloc,
        })
    }

    /// Release the storage. Size and capacity drop to zero and every later
    /// operation reports [`Error::Released`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`] if the buffer was already destroyed.
    pub fn destroy(&mut self) -> Result<(), Error> {
        let storage = self.storage.take().ok_or(Error::Released)?;
        debug!(capacity = storage.len(), size = self.size, "releasing buffer");
        self.size = 0;
        self.alloc.release(storage);
        Ok(())
    }

    /// Whether [`DString::destroy`] has been called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.storage.is_none()
    }

    /// Logical cells stored, excluding the terminator.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Allocated cells, including the terminator slot.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, Vec::len)
    }

    /// The allocator this buffer draws from.
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Whether `size == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// All allocated cells.
    pub(crate) fn cells(&self) -> Result<&[C], Error> {
        self.storage.as_deref().ok_or(Error::Released)
    }

    pub(crate) fn cells_mut(&mut self) -> Result<&mut [C], Error> {
        self.storage.as_deref_mut().ok_or(Error::Released)
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        debug_assert!(size < self.capacity(), "terminator slot must stay in bounds");
        self.size = size;
    }

    pub(crate) fn adopt(&self, storage: Vec<C>, size: usize) -> Self
    where
        A: Clone,
    {
        Self {
            storage: Some(storage),
            size,
            alloc: self.alloc.clone(),
        }
    }

    /// Resize storage to exactly `new_capacity` cells without checking that
    /// the terminator still fits.
    pub(crate) fn resize_storage(&mut self, new_capacity: usize) -> Result<(), Error> {
        let storage = self.storage.as_mut().ok_or(Error::Released)?;
        if let Err(err) = self.alloc.reallocate(storage, new_capacity) {
            debug!(new_capacity, size = self.size, "allocator refused reallocation");
            return Err(err.into());
        }
        trace!(new_capacity, size = self.size, "reallocated storage");
        Ok(())
    }

    /// Resize storage to exactly `new_capacity` cells, preserving content.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityTooSmall`] if `new_capacity < size + 1`
    /// - [`Error::Alloc`] if the allocator refuses; the buffer is unchanged
    /// - [`Error::Released`] on a destroyed buffer
    pub fn reallocate(&mut self, new_capacity: usize) -> Result<(), Error> {
        self.cells()?;
        let required = self.size + 1;
        if new_capacity < required {
            return Err(Error::CapacityTooSmall {
                requested: new_capacity,
                required,
            });
        }
        self.resize_storage(new_capacity)
    }

    /// Make sure `n` cells past `size` are allocated.
    ///
    /// When the unused remainder `capacity - size` is smaller than `n`, the
    /// capacity grows by `n` (not to `size + n`), so repeated small
    /// reservations overshoot rather than reallocate every time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if growing fails and [`Error::Released`] on a
    /// destroyed buffer.
    pub fn reserve(&mut self, n: usize) -> Result<(), Error> {
        let capacity = self.cells()?.len();
        if n > capacity - self.size {
            let target = capacity
                .checked_add(n)
                .ok_or(AllocError { cells: usize::MAX })?;
            self.resize_storage(target)?;
        }
        Ok(())
    }

    /// Drop unused capacity, keeping exactly one cell for the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the allocator refuses and
    /// [`Error::Released`] on a destroyed buffer.
    pub fn shrink_to_fit(&mut self) -> Result<(), Error> {
        let capacity = self.cells()?.len();
        if self.size + 1 < capacity {
            self.resize_storage(self.size + 1)?;
        }
        Ok(())
    }

    /// Blank every allocated cell with [`CharCell::FILL`] and empty the
    /// buffer. Capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`] on a destroyed buffer.
    pub fn clear(&mut self) -> Result<(), Error> {
        let cells = self.cells_mut()?;
        cells.fill(C::FILL);
        cells[0] = C::TERMINATOR;
        self.size = 0;
        Ok(())
    }

    /// Append `c`, doubling the capacity first when the new cell and the
    /// terminator would not both fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if growing fails (the buffer is unchanged)
    /// and [`Error::Released`] on a destroyed buffer.
    pub fn push(&mut self, c: C) -> Result<(), Error> {
        let capacity = self.cells()?.len();
        let size = self.size;
        if size + 1 >= capacity {
            let doubled = capacity
                .checked_mul(2)
                .ok_or(AllocError { cells: usize::MAX })?;
            self.resize_storage(doubled)?;
        }
        let cells = self.cells_mut()?;
        cells[size] = c;
        cells[size + 1] = C::TERMINATOR;
        self.size = size + 1;
        Ok(())
    }

    /// Append every cell of `cells` with [`DString::push`]; stops at the
    /// first failure.
    ///
    /// # Errors
    ///
    /// Same as [`DString::push`].
    pub fn push_cells(&mut self, cells: &[C]) -> Result<(), Error> {
        cells.iter().try_for_each(|&c| self.push(c))
    }

    /// Remove and return the last cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if there is nothing to pop and
    /// [`Error::Released`] on a destroyed buffer.
    pub fn pop(&mut self) -> Result<C, Error> {
        let size = self.size;
        let cells = self.cells_mut()?;
        if size == 0 {
            return Err(Error::Empty);
        }
        let c = cells[size - 1];
        cells[size - 1] = C::TERMINATOR;
        self.size = size - 1;
        Ok(c)
    }

    /// The first cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] on an empty buffer and [`Error::Released`] on
    /// a destroyed one.
    pub fn front(&self) -> Result<C, Error> {
        self.content()?.first().copied().ok_or(Error::Empty)
    }

    /// The last cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] on an empty buffer and [`Error::Released`] on
    /// a destroyed one.
    pub fn back(&self) -> Result<C, Error> {
        self.content()?.last().copied().ok_or(Error::Empty)
    }

    /// The cell at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] unless `index < size`, and
    /// [`Error::Released`] on a destroyed buffer.
    pub fn get(&self, index: usize) -> Result<C, Error> {
        let size = self.size;
        self.content()?
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfBounds { index, size })
    }

    /// Overwrite the cell at `index`.
    ///
    /// Writing [`CharCell::TERMINATOR`] is allowed; the view returned by
    /// [`DString::to_cstring`] then ends early for C consumers while `size`
    /// is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] unless `index < size`, and
    /// [`Error::Released`] on a destroyed buffer.
    pub fn set(&mut self, index: usize, c: C) -> Result<(), Error> {
        let size = self.size;
        let cells = self.cells_mut()?;
        if index >= size {
            return Err(Error::IndexOutOfBounds { index, size });
        }
        cells[index] = c;
        Ok(())
    }

    fn content(&self) -> Result<&[C], Error> {
        Ok(&self.cells()?[..self.size])
    }

    /// The content cells, without the terminator. Empty once released.
    #[must_use]
    pub fn as_cells(&self) -> &[C] {
        self.content().unwrap_or_default()
    }

    /// Iterate over the content cells.
    pub fn iter(&self) -> slice::Iter<'_, C> {
        self.as_cells().iter()
    }

    /// The content followed by its terminator, ready for terminator-based
    /// APIs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTerminator`] if the cell at `size` is not the
    /// terminator and [`Error::Released`] on a destroyed buffer.
    pub fn to_cstring(&self) -> Result<&[C], Error> {
        let cells = self.cells()?;
        match cells.get(self.size) {
            Some(&c) if c == C::TERMINATOR => Ok(&cells[..=self.size]),
            _ => Err(Error::MissingTerminator { size: self.size }),
        }
    }
}

impl<A: Allocator> DString<u8, A> {
    /// The content as a C string. Stops at the first NUL, which is earlier
    /// than `size` if one was written with [`DString::set`].
    ///
    /// # Errors
    ///
    /// Same as [`DString::to_cstring`].
    pub fn to_cstr(&self) -> Result<&CStr, Error> {
        let cells = self.to_cstring()?;
        CStr::from_bytes_until_nul(cells).map_err(|_| Error::MissingTerminator { size: self.size })
    }

    /// The content as a byte string.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.as_cells())
    }
}

impl<C: CharCell, A: Allocator> Drop for DString<C, A> {
    fn drop(&mut self) {
        if let Some(storage) = self.storage.take() {
            self.alloc.release(storage);
        }
    }
}

impl<C: CharCell> Default for DString<C, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CharCell, A: Allocator + Clone> Clone for DString<C, A> {
    /// # Panics
    ///
    /// Aborts like [`DString::from_cells`] when the allocator refuses.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(Error::Alloc(err)) => fatal::<C>(err),
            // A released buffer clones to another released buffer.
            Err(_) => Self {
                storage: None,
                size: 0,
                alloc: self.alloc.clone(),
            },
        }
    }
}

impl From<&str> for DString<u8, Global> {
    fn from(source: &str) -> Self {
        Self::from_cells(source.as_bytes())
    }
}

impl From<&[u8]> for DString<u8, Global> {
    fn from(source: &[u8]) -> Self {
        Self::from_cells(source)
    }
}

impl From<&CStr> for DString<u8, Global> {
    fn from(source: &CStr) -> Self {
        Self::from_cells(source.to_bytes())
    }
}

/// Collects with [`DString::from_cells`] semantics, so the content ends at the
/// first terminator.
///
/// ```rust
/// use dynstring::DString;
///
/// let s: DString<char> = "héllo".chars().collect();
/// assert_eq!(s.get(1), Ok('é'));
/// ```
impl<C: CharCell> FromIterator<C> for DString<C, Global> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let cells: Vec<C> = iter.into_iter().collect();
        Self::from_cells(&cells)
    }
}

impl<'a, C: CharCell, A: Allocator> IntoIterator for &'a DString<C, A> {
    type Item = &'a C;
    type IntoIter = slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Content<'a, C>(&'a [C]);

impl<C: CharCell> fmt::Debug for Content<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        C::fmt_debug(self.0, f)
    }
}

impl<C: CharCell, A: Allocator> fmt::Debug for DString<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_released() {
            return f.write_str("DString(<released>)");
        }
        f.debug_struct("DString")
            .field("content", &Content(self.as_cells()))
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Renders the content as text; undecodable cells become U+FFFD.
impl<C: CharCell, A: Allocator> fmt::Display for DString<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        C::fmt_display(self.as_cells(), f)
    }
}
