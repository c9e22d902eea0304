//! Refused allocations must surface as errors and leave the buffer usable.
use super::utils::{Counting, assert_valid};
use crate::{AllocError, Bounded, DString, Error};

fn counted(source: &[u8]) -> (DString<u8, Counting>, Counting) {
    let alloc = Counting::default();
    let s = DString::from_cells_in(source, alloc.clone()).unwrap();
    (s, alloc)
}

#[test]
fn construction_reports_refusal() {
    let alloc = Counting::default();
    alloc.fail_after(0);
    assert_eq!(
        DString::<u8, _>::from_cells_in(b"abc", alloc.clone()).err(),
        Some(AllocError { cells: 6 })
    );
    assert_eq!(
        DString::<u8, _>::with_capacity_in(0, alloc).err(),
        Some(AllocError { cells: 1 })
    );
}

#[test]
fn failed_push_leaves_buffer_unchanged() {
    let (mut s, alloc) = counted(b"ab"); // capacity 4
    s.push(b'c').unwrap();
    alloc.fail_after(0);

    assert_eq!(s.push(b'd'), Err(Error::Alloc(AllocError { cells: 8 })));
    assert_eq!(s.to_cstring().unwrap(), b"abc\0");
    assert_eq!(s.capacity(), 4);
    assert_valid(&s);
}

#[test]
fn failed_shift_and_replace_leave_buffer_unchanged() {
    let (mut s, alloc) = counted(b"abc");
    alloc.fail_after(0);

    assert!(matches!(s.shift(0, 10), Err(Error::Alloc(_))));
    assert!(matches!(s.replace(1, b"b", b"bbbbbbbb"), Err(Error::Alloc(_))));
    assert!(matches!(s.reserve(10), Err(Error::Alloc(_))));
    assert_eq!(s.as_cells(), b"abc");
    assert_valid(&s);

    // Shrinking in place needs no allocation.
    s.replace(0, b"abc", b"x").unwrap();
    assert_eq!(s.as_cells(), b"x");
}

#[test]
fn failed_substring_leaves_source_alone() {
    let (s, alloc) = counted(b"Hello, World!");
    alloc.fail_after(0);
    assert_eq!(
        s.substring(0, 5).err(),
        Some(Error::Alloc(AllocError { cells: 6 }))
    );
    assert_eq!(s.as_cells(), b"Hello, World!");
}

#[test]
fn bounded_caps_growth() {
    let mut s = DString::<u8, _>::with_capacity_in(8, Bounded::new(8)).unwrap();
    s.push_cells(b"1234567").unwrap();
    assert_eq!(s.push(b'8'), Err(Error::Alloc(AllocError { cells: 16 })));
    assert_eq!(s.size(), 7);
    assert_valid(&s);
}

#[test]
fn substring_uses_the_source_allocator() {
    let (s, alloc) = counted(b"Hello, World!");
    let sub = s.substring(7, 5).unwrap();
    assert_eq!(sub.as_cells(), b"World");
    assert_eq!(alloc.0.allocations.get(), 2);
    drop(sub);
    assert_eq!(alloc.0.releases.get(), 1);
}
