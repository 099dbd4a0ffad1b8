//! Sorted and hashed generic containers: AVL and red-black trees with
//! multiplicity, a chained hash table whose buckets are red-black trees,
//! an indexed binary-heap priority queue, and an exact extended-rational
//! [`Fraction`] type. A small directed [`Graph`] and a handful of slice
//! sorts round it out.

mod arena;
mod bst;
mod depth;
mod error;
mod queue;
mod stats;

pub mod avl;
pub mod fraction;
pub mod graph;
pub mod hash;
pub mod heap;
pub mod rb;
pub mod sort;

pub use crate::avl::AvlTree;
pub use crate::depth::Depth;
pub use crate::error::{Error, Result};
pub use crate::fraction::{FracOrdering, Fraction, Sign, Truth};
pub use crate::graph::{Edge, Graph};
pub use crate::hash::HashTable;
pub use crate::heap::{heap_sort, heap_sort_by, PriorityQueue};
pub use crate::rb::{Colour, RbTree};
pub use crate::stats::Stats;

#[cfg(test)]
mod graph_test;
#[cfg(test)]
mod heap_test;
#[cfg(test)]
mod rb_test;
#[cfg(test)]
mod sort_test;
