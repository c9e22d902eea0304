//! Builds a buffer, mutates it, and prints `content | size | capacity` after
//! each step.
//!
//! Run with
//!
//! ```bash
//! cargo run -p dynstring --example basic
//! ```
#![allow(missing_docs)]

use dynstring::{DString, Error};

fn show(s: &DString) {
    println!("{s} | {} | {}", s.size(), s.capacity());
}

fn main() -> Result<(), Error> {
    let mut s = DString::from("Hello, World");
    show(&s);

    s.push(b'!')?;
    show(&s);

    let c = s.pop()?;
    println!("popped {:?}", char::from(c));
    show(&s);

    s.replace(7, b"World", b"Rust")?;
    show(&s);

    let greeting = s.substring(0, 5)?;
    show(&greeting);

    s.destroy()?;
    Ok(())
}
