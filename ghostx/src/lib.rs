#![doc(html_root_url = "https://docs.rs/ghostx/")]
//! # ghostx
//!
//! Lazy-loading ghost objects for Rust structs.
//!
//! A ghost is an instance that has every field of its type, all of them at their declared defaults, and an
//! initializer that is run on the first access requiring real state. The initializer gets a read/write handle for
//! every field of the object, including fields declared private by the types the struct extends, and decides when the
//! object is fully loaded.
//!
//! ```ignore
//! use ghostx::{ghost, GhostError, GhostObject};
//!
//! mod model {
//!     use ghostx::ghost;
//!
//!     #[ghost(ancestor)]
//!     pub struct Base {
//!         #[ghost(default(1))]
//!         x: i32,
//!     }
//!
//!     impl Base {
//!         pub fn x(&self) -> i32 {
//!             self.x
//!         }
//!     }
//! }
//!
//! #[ghost]
//! struct Derived {
//!     #[ghost(extends)]
//!     base: model::Base,
//!     #[ghost(default("a"), get)]
//!     y: String,
//! }
//!
//! let mut derived = Derived::new_ghost(|cycle| {
//!     // `x` is private to `Base`, yet the initializer can write it.
//!     cycle.set("Base::x", 42)?;
//!     cycle.clear_initializer();
//!     Ok(())
//! });
//!
//! assert_eq!(derived.y()?, "a");
//! assert_eq!(derived.base.x(), 42);
//! ```
//!
//! # The load protocol
//!
//! Every ghost carries a [`GhostState`] with two cells: the pending initializer and the `running` flag. A guarded
//! access (any generated getter, or [`GhostObject::ghost_load`]) does nothing if the object is being loaded right now
//! or if there is no pending initializer. Otherwise it raises `running`, resets every field to its declared default,
//! builds the [`FieldRefs`] map and invokes the initializer with a [`LoadCycle`]. `running` is dropped on every exit
//! path, so a failing initializer leaves the object ready for another attempt.
//!
//! The initializer reports that the object is fully loaded by clearing the pending cell with
//! [`LoadCycle::clear_initializer`]. If it doesn't, the next guarded access loads the object again.
//!
//! # Ancestors and field keys
//!
//! Rust has no inheritance; a ghost type *extends* another type by embedding it in a field marked with
//! `#[ghost(extends)]`. The embedded type must itself be annotated with `#[ghost]` or `#[ghost(ancestor)]`. Since the
//! attribute expands in the module of the struct it annotates, it can see the struct's private fields and records an
//! accessor table for them. That table is what lets a ghost reach private fields of its ancestors.
//!
//! Fields are addressed by internal keys:
//!
//! - own fields and non-private ancestor fields are known by their name;
//! - private ancestor fields are known as `Type::name`;
//! - a name shadowed by a nearer declaration is known as `Type::name` too.
//!
//! Accessors for ancestor-private fields are created once per declaring type and field and are kept in an
//! [`AccessorCache`]. Unless `#[ghost(cache = path::to::fn)]` names a function returning another one, the
//! process-wide [`AccessorCache::global`] is used.
//!
//! # Attribute arguments
//!
//! Struct level:
//!
//! - `ancestor` – only publish the field tables; no ghost state, no load routine.
//! - `cache = path` – a `fn() -> &'static AccessorCache` to use instead of the global cache.
//!
//! Field level:
//!
//! - `default(expr)` or `default = expr` – the value the field is reset to before each load; string literals are
//!   turned into `String`. Without it, `Default::default()` is used.
//! - `extends` – the field holds the parent type.
//! - `skip` – keep the field out of the ghost machinery.
//! - `get`, `get_mut` – generate a getter that triggers the load before returning a reference.
//!
//! # Feature flags
//!
//! - `sync` – [`SharedGhost`](sync::SharedGhost), a thread-safe wrapper.
//! - `serde` – `Serialize` for [`LayoutReport`] and the types it consists of.

pub mod accessor;
pub mod classify;
pub mod defaults;
pub mod error;
pub mod field;
pub mod guard;
pub mod load;
pub mod refs;
pub mod report;
#[cfg(feature = "sync")]
pub mod sync;
pub mod traits;

#[cfg(test)]
mod test_types;

pub use accessor::{Accessor, AccessorCache, AccessorKey};
pub use classify::{classify, ClassifiedField, FieldClass, FieldGroup, FieldKey, GhostLayout};
pub use defaults::{resolve_default, DefaultValue};
pub use error::GhostError;
pub use field::{DeclaringType, FieldDefault, FieldDescriptor, FieldVisibility};
pub use ghostx_derive::ghost;
pub use guard::{GhostPhase, GhostState};
pub use load::{call_initializer, Initializer, LoadCycle};
pub use refs::{FieldHandle, FieldRefs};
pub use report::{FieldReport, LayoutReport};
#[cfg(feature = "sync")]
pub use sync::SharedGhost;
pub use traits::{GhostFields, GhostObject};
