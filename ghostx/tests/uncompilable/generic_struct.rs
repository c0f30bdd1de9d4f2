#![allow(dead_code)]
use ghostx::ghost;

#[ghost]
struct Holder<T> {
    value: T,
}

fn main() {}
