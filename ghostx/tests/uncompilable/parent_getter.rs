#![allow(dead_code)]
use ghostx::ghost;

#[ghost]
struct Reader {
    #[ghost(extends, get)]
    base: Base,
}

#[ghost(ancestor)]
struct Base {}

fn main() {}
