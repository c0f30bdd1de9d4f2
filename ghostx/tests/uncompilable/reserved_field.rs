#![allow(dead_code)]
use ghostx::ghost;

#[ghost]
struct Clash {
    __ghostx_state: u8,
}

fn main() {}
