use ghostx::{ghost, GhostObject};

#[ghost]
#[derive(Debug)]
struct Empty {}

#[ghost]
struct Counter {
    #[ghost(default(1), get)]
    value: u32,
}

fn main() {
    let mut empty = Empty::new_ghost(|cycle| {
        cycle.clear_initializer();
        Ok(())
    });
    empty.initialize_ghost().unwrap();

    let mut counter = Counter::new_ghost(|cycle| {
        *cycle.get_mut::<u32>("value")? += 1;
        cycle.clear_initializer();
        Ok(())
    });
    assert_eq!(*counter.value().unwrap(), 2);
}
