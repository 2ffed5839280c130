//! Disjoint-set forest and Kruskal's minimum spanning tree
//!
//! Used for merging spatially connected object groups: build edges between
//! nearby bounding volumes, then extract the cheapest connecting structure.

/// Disjoint-set forest with union by rank and path compression
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create `count` singleton sets
    pub fn new(count: usize) -> Self {
        Self {
            parent: (0..count as u32).collect(),
            rank: vec![0; count],
        }
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `x`.
    ///
    /// Iterative two-pass compression: walk up to the root, then repoint
    /// every node on the path directly at it. No recursion, so pathological
    /// chains cannot blow the stack.
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns false when they were already in the same set.
    pub fn union(&mut self, a: u32, b: u32) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }

        // Attach the shallower tree under the deeper one.
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            core::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            core::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            core::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
        true
    }

    /// Check whether two elements share a set
    #[inline]
    pub fn connected(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of distinct sets
    pub fn set_count(&mut self) -> usize {
        let len = self.parent.len();
        (0..len as u32).filter(|&x| self.find(x) == x).count()
    }
}

/// Weighted undirected edge between two node indices
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: u32,
    pub b: u32,
    pub weight: f32,
}

impl Edge {
    #[inline]
    pub const fn new(a: u32, b: u32, weight: f32) -> Self {
        Self { a, b, weight }
    }
}

/// Minimum spanning tree (or forest, for disconnected input)
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinimumSpanningTree {
    /// Accepted edges, in ascending weight order
    pub edges: Vec<Edge>,
    /// Sum of accepted edge weights
    pub total_weight: f32,
}

/// Kruskal's algorithm over `node_count` nodes.
///
/// Edges are considered in ascending weight order (`total_cmp`, so NaN
/// weights sort last instead of panicking); an edge is accepted when it
/// connects two different components. Disconnected input yields a spanning
/// forest. Edges referencing nodes outside `0..node_count` are skipped.
pub fn kruskal(node_count: usize, edges: &[Edge]) -> MinimumSpanningTree {
    let mut sorted: Vec<Edge> = edges
        .iter()
        .copied()
        .filter(|e| (e.a as usize) < node_count && (e.b as usize) < node_count)
        .collect();
    sorted.sort_by(|x, y| x.weight.total_cmp(&y.weight));

    let mut sets = UnionFind::new(node_count);
    let mut mst = MinimumSpanningTree {
        edges: Vec::with_capacity(node_count.saturating_sub(1)),
        total_weight: 0.0,
    };

    for edge in sorted {
        if sets.union(edge.a, edge.b) {
            log::trace!("mst edge {} - {} ({})", edge.a, edge.b, edge.weight);
            mst.total_weight += edge.weight;
            mst.edges.push(edge);
            if mst.edges.len() + 1 == node_count {
                break;
            }
        }
    }

    log::debug!(
        "kruskal: {} nodes, {} edges accepted, total weight {}",
        node_count,
        mst.edges.len(),
        mst.total_weight
    );
    mst
}
