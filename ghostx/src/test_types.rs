// Hand-written counterparts of what `#[ghost]` generates, for testing the runtime without the macro.
//
// Chain: Leaf extends Middle extends Root. Root and Middle live in their own modules so that their private fields are
// really out of reach for everything else.

use crate::{
    accessor::AccessorCache,
    error::GhostError,
    field::{DeclaringType, FieldDefault, FieldDescriptor, FieldVisibility},
    guard::GhostState,
    load::{call_initializer, LoadCycle},
    traits::{GhostFields, GhostObject},
};
use std::{
    any::{Any, TypeId},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub(crate) use self::{middle::Middle, root::Root};

pub(crate) mod root {
    use super::*;

    pub(crate) struct Root {
        id:   u64,
        name: String,
    }

    impl Root {
        pub(crate) fn id(&self) -> u64 {
            self.id
        }

        pub(crate) fn name(&self) -> &str {
            &self.name
        }
    }

    impl GhostFields for Root {
        fn ghost_declared_fields() -> Vec<FieldDescriptor> {
            fn project_id(this: &mut dyn Any) -> Option<&mut dyn Any> {
                this.downcast_mut::<Root>().map(|this| &mut this.id as &mut dyn Any)
            }
            fn default_id() -> Box<dyn Any> {
                Box::new(7u64)
            }
            fn project_name(this: &mut dyn Any) -> Option<&mut dyn Any> {
                this.downcast_mut::<Root>().map(|this| &mut this.name as &mut dyn Any)
            }
            fn default_name() -> Box<dyn Any> {
                Box::new(String::new())
            }

            let declaring = DeclaringType::of::<Root>();
            vec![
                FieldDescriptor::new::<u64>(
                    "id",
                    declaring,
                    FieldVisibility::Private,
                    FieldDefault::declared("7", default_id),
                    project_id,
                ),
                FieldDescriptor::new::<String>(
                    "name",
                    declaring,
                    FieldVisibility::Private,
                    FieldDefault::empty(default_name),
                    project_name,
                ),
            ]
        }

        fn ghost_parent() -> Option<DeclaringType> {
            None
        }

        fn ghost_blank() -> Self {
            Root {
                id:   7,
                name: String::new(),
            }
        }

        fn ghost_ancestor_mut(&mut self, declaring: TypeId) -> Option<&mut dyn Any> {
            if declaring == TypeId::of::<Self>() {
                return Some(self as &mut dyn Any);
            }
            None
        }
    }
}

pub(crate) mod middle {
    use super::*;

    pub(crate) struct Middle {
        pub(crate) level: u8,
        secret:           i32,
        root:             Root,
    }

    impl Middle {
        pub(crate) fn secret(&self) -> i32 {
            self.secret
        }

        pub(crate) fn root(&self) -> &Root {
            &self.root
        }
    }

    impl GhostFields for Middle {
        fn ghost_declared_fields() -> Vec<FieldDescriptor> {
            fn project_level(this: &mut dyn Any) -> Option<&mut dyn Any> {
                this.downcast_mut::<Middle>().map(|this| &mut this.level as &mut dyn Any)
            }
            fn default_level() -> Box<dyn Any> {
                Box::new(3u8)
            }
            fn project_secret(this: &mut dyn Any) -> Option<&mut dyn Any> {
                this.downcast_mut::<Middle>().map(|this| &mut this.secret as &mut dyn Any)
            }
            fn default_secret() -> Box<dyn Any> {
                Box::new(-1i32)
            }

            let declaring = DeclaringType::of::<Middle>();
            vec![
                FieldDescriptor::new::<u8>(
                    "level",
                    declaring,
                    FieldVisibility::Crate,
                    FieldDefault::declared("3", default_level),
                    project_level,
                ),
                FieldDescriptor::new::<i32>(
                    "secret",
                    declaring,
                    FieldVisibility::Private,
                    FieldDefault::declared("-1", default_secret),
                    project_secret,
                ),
            ]
        }

        fn ghost_parent() -> Option<DeclaringType> {
            Some(DeclaringType::of::<Root>())
        }

        fn ghost_blank() -> Self {
            Middle {
                level:  3,
                secret: -1,
                root:   Root::ghost_blank(),
            }
        }

        fn ghost_ancestor_mut(&mut self, declaring: TypeId) -> Option<&mut dyn Any> {
            if declaring == TypeId::of::<Self>() {
                return Some(self as &mut dyn Any);
            }
            self.root.ghost_ancestor_mut(declaring)
        }
    }
}

pub(crate) struct Leaf {
    pub(crate) middle: Middle,
    pub(crate) name:   String,
    pub(crate) label:  Option<String>,
    state:             GhostState<Leaf>,
}

/// Counts initializer invocations.
#[derive(Clone, Default)]
pub(crate) struct LeafLog(Arc<AtomicUsize>);

impl LeafLog {
    pub(crate) fn calls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Leaf {
    pub(crate) fn logged<F>(initializer: F) -> (Self, LeafLog)
    where
        F: Fn(&mut LoadCycle<'_, Leaf>) -> Result<(), GhostError> + Send + Sync + 'static,
    {
        let log = LeafLog::default();
        let counter = log.clone();
        let leaf = Leaf::new_ghost(move |cycle| {
            counter.0.fetch_add(1, Ordering::SeqCst);
            initializer(cycle)
        });
        (leaf, log)
    }
}

impl GhostFields for Leaf {
    fn ghost_declared_fields() -> Vec<FieldDescriptor> {
        fn project_name(this: &mut dyn Any) -> Option<&mut dyn Any> {
            this.downcast_mut::<Leaf>().map(|this| &mut this.name as &mut dyn Any)
        }
        fn default_name() -> Box<dyn Any> {
            Box::new(String::from("leaf"))
        }
        fn project_label(this: &mut dyn Any) -> Option<&mut dyn Any> {
            this.downcast_mut::<Leaf>().map(|this| &mut this.label as &mut dyn Any)
        }
        fn default_label() -> Box<dyn Any> {
            Box::new(None::<String>)
        }

        let declaring = DeclaringType::of::<Leaf>();
        vec![
            FieldDescriptor::new::<String>(
                "name",
                declaring,
                FieldVisibility::Crate,
                FieldDefault::declared("\"leaf\"", default_name),
                project_name,
            ),
            FieldDescriptor::new::<Option<String>>(
                "label",
                declaring,
                FieldVisibility::Crate,
                FieldDefault::empty(default_label),
                project_label,
            ),
        ]
    }

    fn ghost_parent() -> Option<DeclaringType> {
        Some(DeclaringType::of::<Middle>())
    }

    fn ghost_blank() -> Self {
        Leaf {
            middle: Middle::ghost_blank(),
            name:   String::from("leaf"),
            label:  None,
            state:  GhostState::idle(),
        }
    }

    fn ghost_ancestor_mut(&mut self, declaring: TypeId) -> Option<&mut dyn Any> {
        if declaring == TypeId::of::<Self>() {
            return Some(self as &mut dyn Any);
        }
        self.middle.ghost_ancestor_mut(declaring)
    }
}

impl GhostObject for Leaf {
    fn ghost_state(&self) -> &GhostState<Self> {
        &self.state
    }

    fn ghost_state_mut(&mut self) -> &mut GhostState<Self> {
        &mut self.state
    }

    fn ghost_load(&mut self, member: &str, arguments: &[&dyn Any]) -> Result<(), GhostError> {
        call_initializer(self, member, arguments, AccessorCache::global())
    }
}

/// Extends Root, but hides it from the ghost machinery while `detached` is set.
pub(crate) struct Detachable {
    root:                Root,
    pub(crate) detached: bool,
    state:               GhostState<Detachable>,
}

impl Detachable {
    pub(crate) fn logged<F>(initializer: F) -> (Self, LeafLog)
    where
        F: Fn(&mut LoadCycle<'_, Detachable>) -> Result<(), GhostError> + Send + Sync + 'static,
    {
        let log = LeafLog::default();
        let counter = log.clone();
        let ghost = Detachable::new_ghost(move |cycle| {
            counter.0.fetch_add(1, Ordering::SeqCst);
            initializer(cycle)
        });
        (ghost, log)
    }
}

impl GhostFields for Detachable {
    fn ghost_declared_fields() -> Vec<FieldDescriptor> {
        Vec::new()
    }

    fn ghost_parent() -> Option<DeclaringType> {
        Some(DeclaringType::of::<Root>())
    }

    fn ghost_blank() -> Self {
        Detachable {
            root:     Root::ghost_blank(),
            detached: false,
            state:    GhostState::idle(),
        }
    }

    fn ghost_ancestor_mut(&mut self, declaring: TypeId) -> Option<&mut dyn Any> {
        if declaring == TypeId::of::<Self>() {
            return Some(self as &mut dyn Any);
        }
        if self.detached {
            return None;
        }
        self.root.ghost_ancestor_mut(declaring)
    }
}

impl GhostObject for Detachable {
    fn ghost_state(&self) -> &GhostState<Self> {
        &self.state
    }

    fn ghost_state_mut(&mut self) -> &mut GhostState<Self> {
        &mut self.state
    }

    fn ghost_load(&mut self, member: &str, arguments: &[&dyn Any]) -> Result<(), GhostError> {
        call_initializer(self, member, arguments, AccessorCache::global())
    }
}
