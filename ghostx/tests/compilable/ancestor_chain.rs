#![allow(dead_code)]

use ghostx::{ghost, GhostObject};

mod inner {
    use ghostx::ghost;

    #[ghost(ancestor)]
    #[derive(Debug)]
    pub struct Node {
        r#type:   String,
        #[ghost(default(None))]
        pub next: Option<Box<Self>>,
    }

    #[ghost(ancestor)]
    pub struct Named {
        #[ghost(extends)]
        pub node: Node,
        #[ghost(default = "anonymous")]
        name:     String,
    }
}

#[ghost]
pub struct Item {
    #[ghost(extends)]
    named:     inner::Named,
    #[ghost(get, get_mut)]
    pub count: usize,
    /// Not managed.
    #[ghost(skip)]
    scratch:   Vec<u8>,
}

fn main() {
    let mut item = Item::new_ghost(|cycle| {
        cycle.set("Node::type", String::from("leaf"))?;
        cycle.set("Named::name", String::from("first"))?;
        cycle.clear_initializer();
        Ok(())
    });
    let _ = item.count();
}
