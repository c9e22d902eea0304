use alloc::{rc::Rc, vec::Vec};
use core::cell::Cell;

use crate::{Allocator, AllocError, CharCell, DString, Global};

/// Assert the invariants every public operation must leave behind.
#[track_caller]
pub(crate) fn assert_valid<C: CharCell, A: Allocator>(s: &DString<C, A>) {
    assert!(!s.is_released(), "buffer was released");
    assert!(
        s.capacity() > s.size(),
        "capacity {} leaves no terminator slot for size {}",
        s.capacity(),
        s.size()
    );
    let cstring = s.to_cstring().expect("terminator invariant");
    assert_eq!(cstring.len(), s.size() + 1);
    assert_eq!(cstring[s.size()], C::TERMINATOR);
}

#[derive(Debug, Default)]
pub(crate) struct Counts {
    pub allocations: Cell<usize>,
    pub reallocations: Cell<usize>,
    pub releases: Cell<usize>,
    /// Remaining successful requests before every request fails; `None` means
    /// unlimited.
    pub budget: Cell<Option<usize>>,
}

/// Records every request and can be told to start failing.
#[derive(Debug, Default, Clone)]
pub(crate) struct Counting(pub Rc<Counts>);

impl Counting {
    pub(crate) fn fail_after(&self, successes: usize) {
        self.0.budget.set(Some(successes));
    }

    fn spend(&self, cells: usize) -> Result<(), AllocError> {
        match self.0.budget.get() {
            Some(0) => Err(AllocError { cells }),
            Some(n) => {
                self.0.budget.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Allocator for Counting {
    fn allocate<C: CharCell>(&self, cells: usize) -> Result<Vec<C>, AllocError> {
        self.spend(cells)?;
        self.0.allocations.set(self.0.allocations.get() + 1);
        Global.allocate(cells)
    }

    fn reallocate<C: CharCell>(
        &self,
        storage: &mut Vec<C>,
        cells: usize,
    ) -> Result<(), AllocError> {
        self.spend(cells)?;
        self.0.reallocations.set(self.0.reallocations.get() + 1);
        Global.reallocate(storage, cells)
    }

    fn release<C: CharCell>(&self, storage: Vec<C>) {
        self.0.releases.set(self.0.releases.get() + 1);
        drop(storage);
    }
}
