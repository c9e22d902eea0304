#![no_main]
use arbitrary::Arbitrary;
use dynstring::{Bounded, DString, Error};
use libfuzzer_sys::fuzz_target;

/// Cap allocations so runaway shifts surface as `Error::Alloc` instead of
/// exhausting the fuzzer's memory.
const MAX_CELLS: usize = 1 << 16;

#[derive(Arbitrary, Debug)]
enum Op {
    Push(u8),
    Pop,
    Get(u16),
    Set(u16, u8),
    Reserve(u16),
    Reallocate(u16),
    ShrinkToFit,
    Clear,
    Shift(u16, i16),
    Replace(u16, Vec<u8>, Vec<u8>),
    ReplaceVerified(u16, Vec<u8>, Vec<u8>),
    Substring(u16, u16),
    Find(u8),
    ReverseFind(u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    seed: Vec<u8>,
    ops: Vec<Op>,
}

fn until_nul(cells: &[u8]) -> &[u8] {
    let end = cells.iter().position(|&c| c == 0).unwrap_or(cells.len());
    &cells[..end]
}

fn check(s: &DString<u8, Bounded>, model: &[u8]) {
    assert!(s.capacity() > s.size());
    assert_eq!(s.as_cells(), model);
    let cstring = s.to_cstring().expect("terminator invariant");
    assert_eq!(cstring.last(), Some(&0));
}

fuzz_target!(|input: Input| {
    let Ok(mut s) = DString::from_cells_in(&input.seed, Bounded::new(MAX_CELLS)) else {
        return;
    };
    let mut model = until_nul(&input.seed).to_vec();

    for op in input.ops {
        let size = model.len();
        let verified = matches!(op, Op::ReplaceVerified(..));
        match op {
            Op::Push(c) => match s.push(c) {
                Ok(()) => model.push(c),
                Err(err) => assert!(matches!(err, Error::Alloc(_))),
            },
            Op::Pop => assert_eq!(s.pop(), model.pop().ok_or(Error::Empty)),
            Op::Get(i) => assert_eq!(s.get(i.into()).ok(), model.get(usize::from(i)).copied()),
            Op::Set(i, c) => {
                let i = usize::from(i);
                if s.set(i, c).is_ok() {
                    model[i] = c;
                } else {
                    assert!(i >= size);
                }
            }
            Op::Reserve(n) => {
                let _ = s.reserve(n.into());
            }
            Op::Reallocate(n) => {
                let n = usize::from(n);
                if n <= size {
                    assert!(s.reallocate(n).is_err());
                } else if s.reallocate(n).is_ok() {
                    assert_eq!(s.capacity(), n);
                }
            }
            Op::ShrinkToFit => {
                s.shrink_to_fit().expect("shrinking never allocates more");
                assert_eq!(s.capacity(), size + 1);
            }
            Op::Clear => {
                s.clear().expect("live buffer");
                model.clear();
            }
            Op::Shift(offset, amount) => {
                let offset = usize::from(offset);
                let amount = isize::from(amount);
                let result = s.shift(offset, amount);
                if offset >= size {
                    assert!(result.is_err());
                } else if result.is_ok() {
                    let k = amount.unsigned_abs();
                    if amount > 0 {
                        model.splice(offset..offset, std::iter::repeat_n(b' ', k));
                    } else {
                        model.drain(offset - k..offset);
                    }
                }
            }
            Op::Replace(offset, old, new) | Op::ReplaceVerified(offset, old, new) => {
                let offset = usize::from(offset);
                let (old, new) = (until_nul(&old), until_nul(&new));
                let result = if verified {
                    s.replace_verified(offset, old, new)
                } else {
                    s.replace(offset, old, new)
                };
                if result.is_ok() {
                    let end = offset + old.len();
                    assert!(offset < size && end <= size);
                    if verified {
                        assert_eq!(&model[offset..end], old);
                    }
                    model.splice(offset..end, new.iter().copied());
                }
            }
            Op::Substring(offset, count) => {
                let (offset, count) = (usize::from(offset), usize::from(count));
                if let Ok(sub) = s.substring(offset, count) {
                    check(&sub, &model[offset..offset + count]);
                } else {
                    assert!(offset >= size || offset + count > size);
                }
            }
            Op::Find(c) => assert_eq!(s.find(c), model.iter().position(|&x| x == c)),
            Op::ReverseFind(c) => {
                assert_eq!(s.reverse_find(c), model.iter().rposition(|&x| x == c));
            }
        }
        check(&s, &model);
    }

    s.destroy().expect("first destroy");
    assert_eq!(s.destroy(), Err(Error::Released));
});
