use crate::{
    DString,
    allocator::Allocator,
    cell::{CharCell, terminated_len},
};

impl<C: CharCell, A: Allocator> DString<C, A> {
    /// Position of the first `c`, scanning forward.
    #[must_use]
    pub fn find(&self, c: C) -> Option<usize> {
        self.as_cells().iter().position(|&x| x == c)
    }

    /// Position of the last `c`, scanning backward. An empty buffer has no
    /// match.
    #[must_use]
    pub fn reverse_find(&self, c: C) -> Option<usize> {
        self.as_cells().iter().rposition(|&x| x == c)
    }

    /// `strcmp`-style equality: sizes must match and the cells up to the
    /// first terminator must be identical.
    ///
    /// Two buffers whose content differs only after an embedded terminator
    /// therefore compare equal.
    #[must_use]
    pub fn compare<B: Allocator>(&self, other: &DString<C, B>) -> bool {
        let (lhs, rhs) = (self.as_cells(), other.as_cells());
        self.size() == other.size() && lhs[..terminated_len(lhs)] == rhs[..terminated_len(rhs)]
    }
}

impl<C: CharCell, A: Allocator, B: Allocator> PartialEq<DString<C, B>> for DString<C, A> {
    fn eq(&self, other: &DString<C, B>) -> bool {
        self.compare(other)
    }
}

impl<C: CharCell, A: Allocator> Eq for DString<C, A> {}
