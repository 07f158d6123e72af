//! Storage utilities.
//!
//! This module provides [BaseArena], an append-only arena that owns the
//! entities of a function description (blocks, instructions and functions).
//! Entities refer to each other through [BaseArenaPtr] handles instead of
//! references, so arbitrary (cyclic) control flow graphs can be expressed
//! without reference cycles.
//!
//! - [ArenaPtr]: The trait for the pointer in the arena.
//! - [ArenaDeref]: The trait for dereferencing the arena pointer.
//! - [ArenaAlloc]: The trait for allocating values in the arena.
//!
//! Entities are never freed: everything allocated for an analysis lives until
//! the arena is dropped.
//!
//! # Examples
//!
//! Several arenas can be combined into one container, with a typed handle for
//! each of them.
//!
//! ```rust
//! use rda::collections::storage::*;
//! use rda::impl_arena;
//!
//! struct Node { name: String, succs: Vec<NodeRef> }
//! struct Graph { entry: NodeRef }
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! struct NodeRef(BaseArenaPtr<Node>);
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! struct GraphRef(BaseArenaPtr<Graph>);
//!
//! #[derive(Default)]
//! struct Store {
//!     nodes: BaseArena<Node>,
//!     graphs: BaseArena<Graph>,
//! }
//!
//! impl_arena!(Store, Node, NodeRef, nodes);
//! impl_arena!(Store, Graph, GraphRef, graphs);
//!
//! let mut store = Store::default();
//!
//! // a node that loops back to itself
//! let head: NodeRef = store.alloc_with(|this| Node { name: "head".into(), succs: vec![this] });
//! let graph: GraphRef = store.alloc(Graph { entry: head });
//!
//! assert_eq!(graph.deref(&store).entry, head);
//! assert_eq!(head.deref(&store).succs[0], head);
//!
//! head.deref_mut(&mut store).name = "loop".into();
//! assert_eq!(head.deref(&store).name, "loop");
//! ```

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// Indicates that the type can be used to dereference an arena pointer.
pub trait ArenaDeref<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Try to dereference a pointer and get a value in the arena.
    ///
    /// # Returns
    ///
    /// - `Some(&T)` if the pointer is in bounds.
    /// - `None` if the pointer does not belong to this arena.
    fn try_deref(&self, ptr: Ptr) -> Option<&T>;

    /// Try to dereference a pointer and get a mutable value in the arena.
    fn try_deref_mut(&mut self, ptr: Ptr) -> Option<&mut T>;
}

/// Indicates that the type can be used to allocate values in the arena.
pub trait ArenaAlloc<T, Ptr>: ArenaDeref<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Allocate a value with a closure accepting the future pointer.
    ///
    /// This is useful when the value needs to reference itself, e.g. a block
    /// remembering its own handle.
    fn alloc_with<F>(&mut self, f: F) -> Ptr
    where
        F: FnOnce(Ptr) -> T;

    /// Allocate a value in the arena.
    fn alloc(&mut self, val: T) -> Ptr { self.alloc_with(|_| val) }
}

/// The pointer-like trait that can be used to deref and get the value from the
/// corresponding [ArenaDeref] type.
pub trait ArenaPtr: Copy + Sized + Eq {
    /// The type of dereferenced value.
    type T;

    /// The type of the corresponding arena.
    type A: ArenaDeref<Self::T, Self>;

    fn try_deref(self, arena: &Self::A) -> Option<&Self::T>;

    fn try_deref_mut(self, arena: &mut Self::A) -> Option<&mut Self::T>;

    /// Dereference the pointer.
    ///
    /// # Panics
    ///
    /// Panics if the pointer was not allocated by `arena`.
    fn deref(self, arena: &Self::A) -> &Self::T {
        self.try_deref(arena).expect("the arena pointer is invalid")
    }

    /// Dereference the pointer mutably.
    ///
    /// # Panics
    ///
    /// Panics if the pointer was not allocated by `arena`.
    fn deref_mut(self, arena: &mut Self::A) -> &mut Self::T {
        self.try_deref_mut(arena)
            .expect("the arena pointer is invalid")
    }
}

/// [BaseArenaPtr] is a handle to an object in the [BaseArena].
///
/// Handles are ordered by allocation order, which gives every analysis a
/// stable, deterministic ordering of blocks and functions.
pub struct BaseArenaPtr<T> {
    id: usize,
    _marker: PhantomData<T>,
}

impl<T> fmt::Debug for BaseArenaPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseArenaPtr({})", self.id)
    }
}

impl<T> PartialEq for BaseArenaPtr<T> {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl<T> Eq for BaseArenaPtr<T> {}

impl<T> PartialOrd for BaseArenaPtr<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<T> Ord for BaseArenaPtr<T> {
    fn cmp(&self, other: &Self) -> Ordering { self.id.cmp(&other.id) }
}

impl<T> Hash for BaseArenaPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

impl<T> From<usize> for BaseArenaPtr<T> {
    fn from(id: usize) -> Self {
        BaseArenaPtr {
            id,
            _marker: PhantomData,
        }
    }
}

#[allow(clippy::non_canonical_clone_impl)]
impl<T> Clone for BaseArenaPtr<T> {
    fn clone(&self) -> Self {
        // `T` itself need not be `Clone`.
        BaseArenaPtr {
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T> Copy for BaseArenaPtr<T> {}

impl<T> BaseArenaPtr<T> {
    /// Get the index of the object in the arena.
    pub fn id(self) -> usize { self.id }
}

impl<T> ArenaPtr for BaseArenaPtr<T> {
    type A = BaseArena<T>;
    type T = T;

    fn try_deref(self, arena: &BaseArena<T>) -> Option<&T> { arena.try_deref(self) }

    fn try_deref_mut(self, arena: &mut BaseArena<T>) -> Option<&mut T> { arena.try_deref_mut(self) }
}

/// An append-only arena backed by a vector.
pub struct BaseArena<T> {
    pool: Vec<T>,
}

impl<T> Default for BaseArena<T> {
    fn default() -> Self { BaseArena { pool: Vec::new() } }
}

impl<T> ArenaAlloc<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn alloc_with<F>(&mut self, f: F) -> BaseArenaPtr<T>
    where
        F: FnOnce(BaseArenaPtr<T>) -> T,
    {
        let ptr = BaseArenaPtr::from(self.pool.len());
        let val = f(ptr);
        self.pool.push(val);
        ptr
    }
}

impl<T> ArenaDeref<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn try_deref(&self, ptr: BaseArenaPtr<T>) -> Option<&T> { self.pool.get(ptr.id()) }

    fn try_deref_mut(&mut self, ptr: BaseArenaPtr<T>) -> Option<&mut T> {
        self.pool.get_mut(ptr.id())
    }
}

impl<T> BaseArena<T> {
    /// The number of allocated values.
    pub fn len(&self) -> usize { self.pool.len() }

    pub fn is_empty(&self) -> bool { self.pool.is_empty() }

    /// Iterate over the arena in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (BaseArenaPtr<T>, &T)> {
        self.pool
            .iter()
            .enumerate()
            .map(|(index, val)| (BaseArenaPtr::from(index), val))
    }
}

/// Implement the arena traits for a handle type stored in a field of a
/// container.
#[macro_export]
macro_rules! impl_arena {
    ($arena:ty, $value:ty, $ptr:path, $field:ident) => {
        impl $crate::collections::storage::ArenaPtr for $ptr {
            type A = $arena;
            type T = $value;

            fn try_deref(self, arena: &Self::A) -> Option<&Self::T> {
                $crate::collections::storage::ArenaDeref::try_deref(arena, self)
            }

            fn try_deref_mut(self, arena: &mut Self::A) -> Option<&mut Self::T> {
                $crate::collections::storage::ArenaDeref::try_deref_mut(arena, self)
            }
        }

        impl $crate::collections::storage::ArenaAlloc<$value, $ptr> for $arena {
            fn alloc_with<F>(&mut self, f: F) -> $ptr
            where
                F: FnOnce($ptr) -> $value,
            {
                $ptr($crate::collections::storage::ArenaAlloc::alloc_with(
                    &mut self.$field,
                    |ptr| f($ptr(ptr)),
                ))
            }
        }

        impl $crate::collections::storage::ArenaDeref<$value, $ptr> for $arena {
            fn try_deref(&self, ptr: $ptr) -> Option<&$value> {
                $crate::collections::storage::ArenaDeref::try_deref(&self.$field, ptr.0)
            }

            fn try_deref_mut(&mut self, ptr: $ptr) -> Option<&mut $value> {
                $crate::collections::storage::ArenaDeref::try_deref_mut(&mut self.$field, ptr.0)
            }
        }
    };
}
