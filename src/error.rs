//! Error type shared by every container in this crate.

use thiserror::Error;

/// Result type alias using our [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Key is not present in the container.
    #[error("key not found")]
    KeyNotFound,

    /// Remove or pop on a container holding no entries.
    #[error("remove from empty container")]
    RemoveFromEmpty,

    /// Index outside `0..len`.
    #[error("invalid index {index}, length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Two parallel inputs, like priorities and payloads, differ in length.
    #[error("length mismatch, expected {expected} got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Backing storage could not be grown.
    #[error("allocation failed")]
    AllocationFailed,

    /// Bucket array could not be grown, table is left unchanged.
    #[error("rehash to capacity {capacity} failed")]
    RehashFailed { capacity: usize },

    /// Returned by insert_unique() API when key is already present.
    #[error("duplicate key")]
    Duplicate,

    /// Graph contains a cycle, no topological order exists.
    #[error("cycle detected")]
    CycleDetected,

    /// Fraction arithmetic left the 32-bit numerator/denominator range.
    #[error("fraction overflow")]
    Overflow,

    /// Fatal case, a red node has a red child.
    #[error("consecutive red nodes")]
    ConsecutiveReds,

    /// Fatal case, root of a red-black tree is red.
    #[error("red root")]
    RedRoot,

    /// Fatal case, paths from a node to its leaves carry different
    /// number of blacks. The String component can be used for debugging.
    #[error("unbalanced blacks: {0}")]
    UnbalancedBlacks(String),

    /// Fatal case, AVL balance factor outside -1..=1.
    #[error("unbalanced node, balance {balance}")]
    Unbalanced { balance: i64 },

    /// Fatal case, stored AVL height does not match recomputed height.
    #[error("height mismatch, stored {stored} computed {computed}")]
    HeightMismatch { stored: u32, computed: u32 },

    /// Fatal case, entries are not in sort order. `rank` is the position
    /// in inorder where the violation was detected.
    #[error("sort order violated at rank {rank}")]
    SortOrder { rank: usize },

    /// Fatal case, a child does not point back to its parent.
    #[error("broken parent link")]
    BrokenLink,

    /// Fatal case, bookkept length differs from the number of live nodes.
    #[error("count mismatch, bookkept {bookkept} counted {counted}")]
    CountMismatch { bookkept: usize, counted: usize },

    /// Fatal case, heap order violated between `index` and its parent.
    #[error("heap order violated at index {index}")]
    HeapOrder { index: usize },

    /// Fatal case, a key lives in a bucket other than the one it hashes to.
    #[error("key stored in wrong bucket {index}")]
    WrongBucket { index: usize },

    /// Fatal case, hash table load factor above its limit.
    #[error("load factor exceeded, {len} entries over {capacity} buckets")]
    LoadFactor { len: usize, capacity: usize },
}
