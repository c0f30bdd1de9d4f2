#![allow(dead_code)]
use ghostx::ghost;

#[ghost]
struct Skipper {
    #[ghost(extends, skip)]
    base: Base,
}

#[ghost(ancestor)]
struct Base {}

fn main() {}
