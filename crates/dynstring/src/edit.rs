//! Structural edits: moving the tail, replacing a region, and extracting a
//! copy.
//!
//! `replace` is built on the same tail moves as `shift`, so a region can grow
//! or shrink in place. The gap a rightward move opens is blanked with
//! [`CharCell::FILL`] before anything is written into it.
use core::cmp::Ordering;

use crate::{
    DString,
    allocator::Allocator,
    cell::{CharCell, terminated_len},
    error::{AllocError, Error},
};

impl<C: CharCell, A: Allocator> DString<C, A> {
    /// Move the tail `[offset, size)` by `amount` cells.
    ///
    /// A positive `amount` opens a gap of blank cells at `offset`, growing the
    /// capacity by `amount` first if the result would not fit. A negative
    /// `amount` closes the `|amount|` cells just before `offset`. Zero leaves
    /// the buffer untouched.
    ///
    /// ```rust
    /// use dynstring::DString;
    ///
    /// let mut s = DString::from("ab");
    /// s.shift(1, 2).unwrap();
    /// assert_eq!(s.as_cells(), b"a  b");
    /// s.shift(3, -2).unwrap();
    /// assert_eq!(s.as_cells(), b"ab");
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::OffsetOutOfBounds`] unless `offset < size`
    /// - [`Error::ShiftUnderflow`] if a leftward move would pass cell 0
    /// - [`Error::Alloc`] if growing fails; the buffer is unchanged
    /// - [`Error::Released`] on a destroyed buffer
    pub fn shift(&mut self, offset: usize, amount: isize) -> Result<(), Error> {
        self.cells()?;
        if offset >= self.size() {
            return Err(Error::OffsetOutOfBounds {
                offset,
                size: self.size(),
            });
        }
        match amount.cmp(&0) {
            Ordering::Equal => Ok(()),
            Ordering::Greater => self.open_gap(offset, amount.unsigned_abs()),
            Ordering::Less => self.close_gap(offset, amount.unsigned_abs()),
        }
    }

    /// Move `[offset, size)` right by `amount`, blanking the cells left
    /// behind. `offset == size` is allowed and only appends blanks.
    fn open_gap(&mut self, offset: usize, amount: usize) -> Result<(), Error> {
        let size = self.size();
        let new_size = size
            .checked_add(amount)
            .ok_or(AllocError { cells: usize::MAX })?;
        let capacity = self.capacity();
        if new_size >= capacity {
            let target = capacity
                .checked_add(amount)
                .ok_or(AllocError { cells: usize::MAX })?;
            self.resize_storage(target)?;
        }

        let cells = self.cells_mut()?;
        cells.copy_within(offset..size, offset + amount);
        cells[offset..offset + amount].fill(C::FILL);
        cells[new_size] = C::TERMINATOR;
        self.set_size(new_size);
        Ok(())
    }

    /// Move `[offset, size)` left by `amount`, overwriting the cells before
    /// `offset`. Capacity is unchanged.
    fn close_gap(&mut self, offset: usize, amount: usize) -> Result<(), Error> {
        if amount > offset {
            return Err(Error::ShiftUnderflow { offset, amount });
        }
        let size = self.size();
        let new_size = size - amount;

        let cells = self.cells_mut()?;
        cells.copy_within(offset..size, offset - amount);
        cells[new_size] = C::TERMINATOR;
        self.set_size(new_size);
        Ok(())
    }

    /// Check that `[offset, offset + count)` lies inside the content and
    /// starts before its end.
    fn check_region(&self, offset: usize, count: usize) -> Result<(), Error> {
        self.cells()?;
        let size = self.size();
        if offset >= size {
            return Err(Error::OffsetOutOfBounds { offset, size });
        }
        match offset.checked_add(count) {
            Some(end) if end <= size => Ok(()),
            _ => Err(Error::RangeOutOfBounds {
                offset,
                count,
                size,
            }),
        }
    }

    /// Swap the `old_len` cells at `offset` for `new_value`, resizing the
    /// region in place.
    fn splice(&mut self, offset: usize, old_len: usize, new_value: &[C]) -> Result<(), Error> {
        let new_len = new_value.len();
        let tail = offset + old_len;
        match new_len.cmp(&old_len) {
            Ordering::Equal => {}
            Ordering::Greater => self.open_gap(tail, new_len - old_len)?,
            Ordering::Less => self.close_gap(tail, old_len - new_len)?,
        }
        self.cells_mut()?[offset..offset + new_len].copy_from_slice(new_value);
        Ok(())
    }

    /// Overwrite `length(old_value)` cells at `offset` with `new_value`,
    /// growing or shrinking the buffer by the difference in lengths. Both
    /// values are read up to their first terminator.
    ///
    /// Only the *length* of `old_value` matters: the cells at `offset` are
    /// replaced whatever they contain. Use [`DString::replace_verified`] to
    /// check them first.
    ///
    /// ```rust
    /// use dynstring::DString;
    ///
    /// let mut s = DString::from("Hello, World!");
    /// s.replace(0, b"Hello, ", b"").unwrap();
    /// assert_eq!(s.to_cstring().unwrap(), b"World!\0");
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::OffsetOutOfBounds`] unless `offset < size`
    /// - [`Error::RangeOutOfBounds`] if `old_value` reaches past `size`
    /// - [`Error::Alloc`] if growing fails; the buffer is unchanged
    /// - [`Error::Released`] on a destroyed buffer
    pub fn replace(&mut self, offset: usize, old_value: &[C], new_value: &[C]) -> Result<(), Error> {
        let old_len = terminated_len(old_value);
        self.check_region(offset, old_len)?;
        self.splice(offset, old_len, &new_value[..terminated_len(new_value)])
    }

    /// Like [`DString::replace`], but only if the cells at `offset` equal
    /// `old_value`.
    ///
    /// # Errors
    ///
    /// Everything [`DString::replace`] reports, plus [`Error::Mismatch`] when
    /// the content differs. Nothing is modified on error.
    pub fn replace_verified(
        &mut self,
        offset: usize,
        old_value: &[C],
        new_value: &[C],
    ) -> Result<(), Error> {
        let old_value = &old_value[..terminated_len(old_value)];
        self.check_region(offset, old_value.len())?;
        if &self.as_cells()[offset..offset + old_value.len()] != old_value {
            return Err(Error::Mismatch { offset });
        }
        self.splice(offset, old_value.len(), &new_value[..terminated_len(new_value)])
    }

    /// Copy `count` cells starting at `offset` into a new, independently
    /// owned buffer with capacity `count + 1`.
    ///
    /// # Errors
    ///
    /// - [`Error::OffsetOutOfBounds`] unless `offset < size`
    /// - [`Error::RangeOutOfBounds`] if `offset + count > size`
    /// - [`Error::Alloc`] if the allocator refuses
    /// - [`Error::Released`] on a destroyed buffer
    pub fn substring(&self, offset: usize, count: usize) -> Result<Self, Error>
    where
        A: Clone,
    {
        self.check_region(offset, count)?;
        let mut storage = self.allocator().allocate::<C>(count + 1)?;
        storage[..count].copy_from_slice(&self.as_cells()[offset..offset + count]);
        storage[count] = C::TERMINATOR;
        Ok(self.adopt(storage, count))
    }
}
