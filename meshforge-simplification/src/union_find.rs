//! Disjoint-set structure over vertex indices
//!
//! Path compression only, no union by rank: merge direction is chosen by
//! the caller so the smaller vertex index always survives a collapse.
//! Owned exclusively by one simplification run and discarded afterward.

#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
        }
    }

    /// Root of `v`, flattening the path behind it
    pub fn find(&mut self, v: u32) -> u32 {
        let mut root = v;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = v;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Attach the root of `child` beneath the root of `target`.
    ///
    /// Both arguments must already be roots.
    pub fn union_into(&mut self, child: u32, target: u32) {
        debug_assert_eq!(self.parent[child as usize], child);
        debug_assert_eq!(self.parent[target as usize], target);
        self.parent[child as usize] = target;
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_disjoint() {
        let mut uf = UnionFind::new(4);
        for v in 0..4 {
            assert_eq!(uf.find(v), v);
        }
    }

    #[test]
    fn test_union_and_find() {
        let mut uf = UnionFind::new(4);
        uf.union_into(1, 0);
        uf.union_into(2, 0);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.find(1), 0);
        assert_eq!(uf.find(3), 3);
    }

    #[test]
    fn test_path_compression_flattens() {
        // Build the chain 0 -> 1 -> 2 -> 3 -> 4 by always merging roots
        let mut uf = UnionFind::new(5);
        uf.union_into(0, 1);
        uf.union_into(1, 2);
        uf.union_into(2, 3);
        uf.union_into(3, 4);
        assert_eq!(uf.find(0), 4);
        // After one find the whole chain points at the root
        assert_eq!(uf.parent, vec![4, 4, 4, 4, 4]);
    }
}
