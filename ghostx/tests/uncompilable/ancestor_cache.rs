#![allow(dead_code)]
use ghostx::{ghost, AccessorCache};

#[ghost(ancestor, cache = own_cache)]
struct Base {
    x: i32,
}

fn own_cache() -> &'static AccessorCache {
    AccessorCache::global()
}

fn main() {}
