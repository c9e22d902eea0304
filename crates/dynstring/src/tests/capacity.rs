use rstest::rstest;

use super::utils::{Counting, assert_valid};
use crate::{DString, Error};

#[test]
fn push_doubles_when_terminator_would_not_fit() {
    let mut s = DString::<u8>::with_capacity(2);
    s.push(b'a').unwrap();
    assert_eq!(s.capacity(), 2);
    s.push(b'b').unwrap();
    assert_eq!(s.capacity(), 4);
    s.push(b'c').unwrap();
    assert_eq!(s.capacity(), 4);
    s.push(b'd').unwrap();
    assert_eq!(s.capacity(), 8);
    assert_eq!(s.to_cstring().unwrap(), b"abcd\0");
}

#[test]
fn push_on_new_buffer_grows_from_one() {
    let mut s = DString::<u8>::new();
    assert_eq!(s.capacity(), 1);
    s.push(b'x').unwrap();
    assert_eq!(s.capacity(), 2);
    assert_valid(&s);
}

#[test]
fn push_then_pop_restores_everything() {
    let mut s = DString::from("Hello, World");
    s.push(b'!').unwrap();
    assert_eq!(s.to_cstring().unwrap(), b"Hello, World!\0");
    assert_eq!(s.pop(), Ok(b'!'));
    assert_eq!(s.to_cstring().unwrap(), b"Hello, World\0");
    assert_eq!(s.size(), 12);
}

#[test]
fn pop_on_empty_is_an_error() {
    let mut s = DString::<u8>::new();
    assert_eq!(s.pop(), Err(Error::Empty));
    assert_eq!(s.front(), Err(Error::Empty));
    assert_eq!(s.back(), Err(Error::Empty));
}

#[test]
fn get_and_set_are_bounded_by_size() {
    let mut s = DString::from("abc");
    assert_eq!(s.get(2), Ok(b'c'));
    assert_eq!(s.get(3), Err(Error::IndexOutOfBounds { index: 3, size: 3 }));
    // Capacity is 6, but the cells past `size` are not addressable.
    assert_eq!(s.set(4, b'x'), Err(Error::IndexOutOfBounds { index: 4, size: 3 }));
    s.set(0, b'A').unwrap();
    assert_eq!((s.front(), s.back()), (Ok(b'A'), Ok(b'c')));
}

#[rstest]
#[case::fits(3, 6)]
#[case::one_over(4, 10)]
#[case::further_over(5, 11)]
fn reserve_grows_by_request(#[case] n: usize, #[case] capacity: usize) {
    // "abc" has capacity 6, so 3 cells remain before any growth.
    let mut s = DString::from("abc");
    s.reserve(n).unwrap();
    assert_eq!(s.capacity(), capacity);
    assert_valid(&s);
}

#[test]
fn reserve_policy_is_capacity_plus_request() {
    let mut s = DString::from("abcd"); // capacity 8, remainder 4
    s.reserve(4).unwrap();
    assert_eq!(s.capacity(), 8);
    s.reserve(5).unwrap();
    assert_eq!(s.capacity(), 13);
}

#[test]
fn shrink_to_fit_keeps_the_terminator_slot() {
    let mut s = DString::from("Hello");
    assert_eq!(s.capacity(), 10);
    s.shrink_to_fit().unwrap();
    assert_eq!(s.capacity(), 6);
    assert_eq!(s.to_cstring().unwrap(), b"Hello\0");

    // Already tight: nothing to do.
    s.shrink_to_fit().unwrap();
    assert_eq!(s.capacity(), 6);
}

#[rstest]
#[case::push(|s: &mut DString| s.push(b'!'))]
#[case::pop(|s: &mut DString| s.pop().map(drop))]
#[case::reserve(|s: &mut DString| s.reserve(1))]
#[case::shift(|s: &mut DString| s.shift(1, 2))]
#[case::replace(|s: &mut DString| s.replace(0, b"He", b"Je"))]
#[case::clear(|s: &mut DString| s.clear())]
fn shrink_then_mutate_keeps_terminator(#[case] op: fn(&mut DString) -> Result<(), Error>) {
    let mut s = DString::from("Hello");
    s.shrink_to_fit().unwrap();
    op(&mut s).unwrap();
    assert_valid(&s);
}

#[test]
fn shrink_empty_buffer() {
    let mut s = DString::<u8>::with_capacity(32);
    s.shrink_to_fit().unwrap();
    assert_eq!(s.capacity(), 1);
    s.push(b'a').unwrap();
    assert_eq!(s.to_cstring().unwrap(), b"a\0");
}

#[test]
fn reallocate_refuses_to_drop_the_terminator() {
    let mut s = DString::from("abc");
    assert_eq!(
        s.reallocate(3),
        Err(Error::CapacityTooSmall {
            requested: 3,
            required: 4
        })
    );
    s.reallocate(4).unwrap();
    assert_eq!(s.capacity(), 4);
    s.reallocate(100).unwrap();
    assert_eq!(s.capacity(), 100);
    assert_eq!(s.to_cstring().unwrap(), b"abc\0");
}

#[test]
fn clear_blanks_the_allocation_but_keeps_capacity() {
    let alloc = Counting::default();
    let mut s = DString::<u8, _>::from_cells_in(b"abc", alloc.clone()).unwrap();
    s.clear().unwrap();

    assert!(s.is_empty());
    assert_eq!(s.capacity(), 6);
    assert_eq!(s.cells().unwrap(), b"\0     ");
    assert_eq!(alloc.0.reallocations.get(), 0);
    assert_valid(&s);
}
