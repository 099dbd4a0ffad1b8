//! Directed weighted graph over the dense vertex domain `0..n`.
//!
//! Each vertex keeps its outgoing edges sorted by endpoint, with at
//! most one edge per ordered pair. The shortest-path and spanning-tree
//! routines drive [`PriorityQueue`] through its indexed operations.

use std::{cmp::Ordering, collections::VecDeque};

use crate::{
    error::{Error, Result},
    heap::PriorityQueue,
};

/// Directed edge `from -> to` carrying `weight`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    n_edges: usize,
}

// lighter tentative distance ranks higher.
fn lighter_first(a: &f64, b: &f64) -> Ordering {
    b.total_cmp(a)
}

type MinQueue = PriorityQueue<f64, usize, fn(&f64, &f64) -> Ordering>;

fn min_queue(capacity: usize) -> Result<MinQueue> {
    let cmp: fn(&f64, &f64) -> Ordering = lighter_first;
    PriorityQueue::with_capacity(capacity, cmp)
}

// push `vertex` with `priority`, or lower the priority it already has.
fn offer(queue: &mut MinQueue, vertex: usize, priority: f64) -> Result<()> {
    match queue.find_index_by_payload(&vertex) {
        Some(index) => queue.change_priority(index, priority).map(|_| ()),
        None => queue.push(priority, Some(vertex)),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unseen,
    Open,
    Done,
}

/// Construction and edits.
impl Graph {
    /// Graph with `n` vertices and no edges.
    pub fn new(n: usize) -> Graph {
        Graph {
            adjacency: vec![Vec::new(); n],
            n_edges: 0,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.n_edges
    }

    /// Append a vertex and return its id.
    pub fn add_vertex(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Drop `v` with every edge touching it. Vertices above `v` are
    /// renumbered down by one.
    pub fn remove_vertex(&mut self, v: usize) -> Result<()> {
        self.check(v)?;
        let outgoing = self.adjacency.remove(v);
        let mut dropped = outgoing.len();
        for edges in self.adjacency.iter_mut() {
            let before = edges.len();
            edges.retain(|e| e.to != v);
            dropped += before - edges.len();
            for edge in edges.iter_mut() {
                if edge.from > v {
                    edge.from -= 1;
                }
                if edge.to > v {
                    edge.to -= 1;
                }
            }
        }
        self.n_edges -= dropped;
        tracing::debug!(vertex = v, edges = dropped, "vertex removed");
        Ok(())
    }

    /// Add `u -> v` with `weight`, replacing the weight of an existing
    /// edge. Return true when the edge is new.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) -> Result<bool> {
        self.check(u)?;
        self.check(v)?;
        let edges = &mut self.adjacency[u];
        match edges.binary_search_by(|e| e.to.cmp(&v)) {
            Ok(i) => {
                edges[i].weight = weight;
                Ok(false)
            }
            Err(i) => {
                edges.insert(i, Edge { from: u, to: v, weight });
                self.n_edges += 1;
                Ok(true)
            }
        }
    }

    /// Remove `u -> v` and return its weight.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Result<f64> {
        self.check(u)?;
        self.check(v)?;
        let edges = &mut self.adjacency[u];
        match edges.binary_search_by(|e| e.to.cmp(&v)) {
            Ok(i) => {
                self.n_edges -= 1;
                Ok(edges.remove(i).weight)
            }
            Err(_) => Err(Error::KeyNotFound),
        }
    }

    /// Graph with every edge reversed.
    pub fn transpose(&self) -> Graph {
        let mut adjacency = vec![Vec::new(); self.vertex_count()];
        // visiting sources in order keeps each list sorted by endpoint.
        for edge in self.adjacency.iter().flatten() {
            adjacency[edge.to].push(Edge {
                from: edge.to,
                to: edge.from,
                weight: edge.weight,
            });
        }
        Graph {
            adjacency,
            n_edges: self.n_edges,
        }
    }

    fn check(&self, v: usize) -> Result<()> {
        let len = self.vertex_count();
        if v < len {
            Ok(())
        } else {
            Err(Error::InvalidIndex { index: v, len })
        }
    }
}

/// Queries and traversals.
impl Graph {
    pub fn weight(&self, u: usize, v: usize) -> Result<Option<f64>> {
        self.check(u)?;
        self.check(v)?;
        let edges = &self.adjacency[u];
        let found = edges.binary_search_by(|e| e.to.cmp(&v)).ok();
        Ok(found.map(|i| edges[i].weight))
    }

    /// Outgoing edges of `u`, ascending by endpoint.
    pub fn neighbours(&self, u: usize) -> Result<&[Edge]> {
        self.check(u)?;
        Ok(&self.adjacency[u])
    }

    /// Vertices reachable from `start` in breadth-first order.
    pub fn bfs(&self, start: usize) -> Result<Vec<usize>> {
        self.check(start)?;
        let mut seen = vec![false; self.vertex_count()];
        let mut order = vec![];
        let mut queue = VecDeque::new();
        seen[start] = true;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            order.push(u);
            for edge in self.adjacency[u].iter() {
                if !seen[edge.to] {
                    seen[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }
        Ok(order)
    }

    /// Vertices reachable from `start` in depth-first preorder.
    pub fn dfs(&self, start: usize) -> Result<Vec<usize>> {
        self.check(start)?;
        let mut seen = vec![false; self.vertex_count()];
        let mut order = vec![];
        self.dfs_from(start, &mut seen, &mut order);
        Ok(order)
    }

    // Stack entries are (vertex, next edge to follow).
    fn dfs_from(&self, u: usize, seen: &mut [bool], order: &mut Vec<usize>) {
        seen[u] = true;
        order.push(u);
        let mut stack = vec![(u, 0)];
        while let Some(top) = stack.last_mut() {
            let (v, i) = *top;
            match self.adjacency[v].get(i) {
                Some(edge) => {
                    top.1 += 1;
                    if !seen[edge.to] {
                        seen[edge.to] = true;
                        order.push(edge.to);
                        stack.push((edge.to, 0));
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    pub fn has_cycle(&self) -> bool {
        let mut marks = vec![Mark::Unseen; self.vertex_count()];
        let mut finished = vec![];
        (0..self.vertex_count())
            .any(|v| marks[v] == Mark::Unseen && self.finish_from(v, &mut marks, &mut finished))
    }

    /// Vertices ordered so that every edge points forward, the reverse
    /// of depth-first finish order.
    pub fn topological_sort(&self) -> Result<Vec<usize>> {
        let mut marks = vec![Mark::Unseen; self.vertex_count()];
        let mut finished = Vec::with_capacity(self.vertex_count());
        for v in 0..self.vertex_count() {
            if marks[v] == Mark::Unseen && self.finish_from(v, &mut marks, &mut finished) {
                tracing::debug!(vertex = v, "cycle found during topological sort");
                return Err(Error::CycleDetected);
            }
        }
        finished.reverse();
        Ok(finished)
    }

    // Record `u`'s reachable vertices in finish order. Return true on
    // reaching a vertex still open on the stack.
    fn finish_from(&self, u: usize, marks: &mut [Mark], finished: &mut Vec<usize>) -> bool {
        marks[u] = Mark::Open;
        let mut stack = vec![(u, 0)];
        while let Some(top) = stack.last_mut() {
            let (v, i) = *top;
            match self.adjacency[v].get(i) {
                Some(edge) => {
                    top.1 += 1;
                    match marks[edge.to] {
                        Mark::Open => return true,
                        Mark::Unseen => {
                            marks[edge.to] = Mark::Open;
                            stack.push((edge.to, 0));
                        }
                        Mark::Done => (),
                    }
                }
                None => {
                    marks[v] = Mark::Done;
                    finished.push(v);
                    stack.pop();
                }
            }
        }
        false
    }

    /// Strongly connected components, Kosaraju's two passes. Components
    /// come out in discovery order of the second pass, members ascending.
    pub fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.vertex_count();
        let mut seen = vec![false; n];
        let mut finished = Vec::with_capacity(n);
        for v in 0..n {
            if !seen[v] {
                self.postorder_from(v, &mut seen, &mut finished);
            }
        }

        let transposed = self.transpose();
        let mut seen = vec![false; n];
        let mut components = vec![];
        for &v in finished.iter().rev() {
            if !seen[v] {
                let mut members = vec![];
                transposed.dfs_from(v, &mut seen, &mut members);
                members.sort_unstable();
                components.push(members);
            }
        }
        components
    }

    fn postorder_from(&self, u: usize, seen: &mut [bool], finished: &mut Vec<usize>) {
        seen[u] = true;
        let mut stack = vec![(u, 0)];
        while let Some(top) = stack.last_mut() {
            let (v, i) = *top;
            match self.adjacency[v].get(i) {
                Some(edge) => {
                    top.1 += 1;
                    if !seen[edge.to] {
                        seen[edge.to] = true;
                        stack.push((edge.to, 0));
                    }
                }
                None => {
                    finished.push(v);
                    stack.pop();
                }
            }
        }
    }
}

/// Shortest paths and spanning trees.
impl Graph {
    /// Single-source shortest paths over non-negative weights. Entry
    /// `v` is `Some((distance, predecessor))` for reachable vertices,
    /// the source has no predecessor.
    pub fn dijkstra(&self, source: usize) -> Result<Vec<Option<(f64, Option<usize>)>>> {
        self.check(source)?;
        let n = self.vertex_count();
        let mut best: Vec<Option<(f64, Option<usize>)>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut queue = min_queue(n)?;

        best[source] = Some((0.0, None));
        queue.push(0.0, Some(source))?;
        while let Ok((distance, payload)) = queue.pop() {
            let u = match payload {
                Some(u) => u,
                None => continue,
            };
            settled[u] = true;
            for edge in self.adjacency[u].iter() {
                if settled[edge.to] {
                    continue;
                }
                let candidate = distance + edge.weight;
                let improves = match best[edge.to] {
                    Some((current, _)) => candidate < current,
                    None => true,
                };
                if improves {
                    best[edge.to] = Some((candidate, Some(u)));
                    offer(&mut queue, edge.to, candidate)?;
                }
            }
        }
        Ok(best)
    }

    /// Minimum spanning tree of the component holding `root`, edges in
    /// the order they join the tree. Edge direction is ignored, when
    /// both directions exist the lighter one is used.
    pub fn prim(&self, root: usize) -> Result<Vec<Edge>> {
        self.check(root)?;
        let n = self.vertex_count();
        let undirected = self.undirected();
        let mut link: Vec<Option<Edge>> = vec![None; n];
        let mut in_tree = vec![false; n];
        let mut tree = Vec::with_capacity(n.saturating_sub(1));
        let mut queue = min_queue(n)?;

        queue.push(0.0, Some(root))?;
        while let Ok((_, payload)) = queue.pop() {
            let u = match payload {
                Some(u) => u,
                None => continue,
            };
            in_tree[u] = true;
            if let Some(edge) = link[u] {
                tree.push(edge);
            }
            for &(v, weight) in undirected[u].iter() {
                if in_tree[v] {
                    continue;
                }
                let lighter = match link[v] {
                    Some(edge) => weight < edge.weight,
                    None => true,
                };
                if lighter {
                    link[v] = Some(Edge { from: u, to: v, weight });
                    offer(&mut queue, v, weight)?;
                }
            }
        }
        Ok(tree)
    }

    // symmetric adjacency keeping the lighter of two opposite edges.
    fn undirected(&self) -> Vec<Vec<(usize, f64)>> {
        let mut undirected: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.vertex_count()];
        for edge in self.adjacency.iter().flatten() {
            for &(a, b) in [(edge.from, edge.to), (edge.to, edge.from)].iter() {
                let list = &mut undirected[a];
                match list.iter_mut().find(|(to, _)| *to == b) {
                    Some(entry) if edge.weight < entry.1 => entry.1 = edge.weight,
                    Some(_) => (),
                    None => list.push((b, edge.weight)),
                }
            }
        }
        undirected
    }

    /// All-pairs shortest distances, `f64::INFINITY` where no path exists.
    pub fn floyd_warshall(&self) -> Vec<Vec<f64>> {
        let n = self.vertex_count();
        let mut dist = vec![vec![f64::INFINITY; n]; n];
        for (u, row) in dist.iter_mut().enumerate() {
            row[u] = 0.0;
            for edge in self.adjacency[u].iter() {
                if edge.weight < row[edge.to] {
                    row[edge.to] = edge.weight;
                }
            }
        }
        for k in 0..n {
            for i in 0..n {
                if dist[i][k] == f64::INFINITY {
                    continue;
                }
                for j in 0..n {
                    let through = dist[i][k] + dist[k][j];
                    if through < dist[i][j] {
                        dist[i][j] = through;
                    }
                }
            }
        }
        dist
    }
}
