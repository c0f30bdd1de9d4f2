#![allow(dead_code)]
use ghostx::ghost;

#[ghost(ancestor)]
struct Base {
    #[ghost(get)]
    x: i32,
}

fn main() {}
