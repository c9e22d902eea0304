//! A growable, null-terminated character buffer with explicit capacity
//! control.
//!
//! [`DString`] keeps its content followed by a terminator cell at all times,
//! so the storage can be handed to terminator-based APIs without measuring it.
//! Capacity only changes through a small set of operations with documented
//! growth policies:
//!
//! | operation | growth |
//! |---|---|
//! | [`DString::push`] | doubles when the new cell and terminator do not fit |
//! | [`DString::reserve`] | grows by the requested amount when the remainder is short |
//! | [`DString::shift`] / [`DString::replace`] | grow by the shift amount |
//! | [`DString::shrink_to_fit`] | shrinks to `size + 1` |
//!
//! The character width is a type parameter ([`NarrowString`], [`WideString`])
//! and every allocation goes through an injected [`Allocator`].
//!
//! ```rust
//! use dynstring::DString;
//!
//! let mut s = DString::from("Hello, World!");
//! let hello = s.substring(0, 5).unwrap();
//! s.replace(0, b"Hello", b"Goodbye").unwrap();
//!
//! assert_eq!(hello.to_cstr().unwrap(), c"Hello");
//! assert_eq!(s.to_cstr().unwrap(), c"Goodbye, World!");
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod allocator;
mod cell;
mod dstring;
mod edit;
mod error;
mod search;
#[cfg(feature = "serde")]
mod serde_impl;
mod tracing_compat;

#[cfg(test)]
mod tests;

pub use allocator::{Allocator, Bounded, Global};
pub use cell::{CharCell, WideChar};
pub use dstring::DString;
pub use error::{AllocError, Error};

/// A buffer of `u8` cells.
pub type NarrowString<A = Global> = DString<u8, A>;

/// A buffer of platform `wchar_t` cells.
pub type WideString<A = Global> = DString<WideChar, A>;
