use thiserror::Error;

/// The allocator could not provide the requested number of cells.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("failed to allocate {cells} cells")]
pub struct AllocError {
    /// Total number of cells that were requested.
    pub cells: usize,
}

/// Every way an operation on a [`DString`](crate::DString) can fail.
///
/// All variants except [`Error::Alloc`] are precondition violations: the
/// buffer is left exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The operation needs at least one cell.
    #[error("buffer is empty")]
    Empty,
    /// `get`/`set` outside `0..size`.
    #[error("index {index} out of bounds for size {size}")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Size at the time of the call.
        size: usize,
    },
    /// A structural edit started at or past the end of the content.
    #[error("offset {offset} out of bounds for size {size}")]
    OffsetOutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Size at the time of the call.
        size: usize,
    },
    /// A region `offset..offset + count` reaches past the end of the content.
    #[error("range {offset}..{offset}+{count} out of bounds for size {size}")]
    RangeOutOfBounds {
        /// Start of the region.
        offset: usize,
        /// Length of the region.
        count: usize,
        /// Size at the time of the call.
        size: usize,
    },
    /// A leftward shift would move cells before position 0.
    #[error("cannot shift cells at offset {offset} left by {amount}")]
    ShiftUnderflow {
        /// Start of the tail being moved.
        offset: usize,
        /// Magnitude of the leftward shift.
        amount: usize,
    },
    /// `replace_verified` found different cells at `offset`.
    #[error("cells at offset {offset} do not match the expected value")]
    Mismatch {
        /// Where the comparison started.
        offset: usize,
    },
    /// A reallocation would drop the terminator slot.
    #[error("capacity {requested} cannot hold {required} cells")]
    CapacityTooSmall {
        /// Capacity that was asked for.
        requested: usize,
        /// Minimum capacity for the current content (`size + 1`).
        required: usize,
    },
    /// The cell at `size` is not the terminator.
    #[error("no terminator at position {size}")]
    MissingTerminator {
        /// Position that was checked.
        size: usize,
    },
    /// The buffer was destroyed and owns no storage.
    #[error("buffer has been released")]
    Released,
    /// The allocator refused the request.
    #[error(transparent)]
    Alloc(#[from] AllocError),
}
