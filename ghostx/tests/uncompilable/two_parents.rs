#![allow(dead_code)]
use ghostx::ghost;

#[ghost]
struct Twice {
    #[ghost(extends)]
    first: Base,
    #[ghost(extends)]
    second: Base,
}

#[ghost(ancestor)]
struct Base {}

fn main() {}
