use crate::depth::Depth;

/// Statistics on a tree or a hash table. Serves two purpose:
///
/// * To get partial but quick statistics via the `stats()` method.
/// * To get full statisics via the `validate()` method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of distinct keys.
    node_size: usize,
    blacks: Option<usize>,
    height: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            height: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    pub(crate) fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: usize) {
        self.height = Some(height)
    }

    #[inline]
    pub(crate) fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number of distinct entries.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including link and balancing overhead. The
    /// overhead is constant, node size varies with the stored type.
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return black-height of a red-black tree. For a hash table this
    /// is the largest black-height among its buckets.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return height of an AVL tree.
    #[inline]
    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// Return [`Depth`] statistics, None if nothing was sampled.
    pub fn depths(&self) -> Option<&Depth> {
        self.depths.as_ref().filter(|d| d.samples() > 0)
    }
}
