//! Lock-free disjoint set over vertex ids, used to merge seam duplicates.

use std::sync::atomic::{AtomicU32, Ordering};

/// Union-find whose links can be written from several threads at once.
///
/// Roots are always the smallest id of their class, so the partition and the
/// chosen representatives do not depend on the order in which unions land.
pub struct DisjointSet {
    parent: Vec<AtomicU32>,
}

impl DisjointSet {
    /// `len` singleton classes.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).map(AtomicU32::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s class, halving the path on the way.
    pub fn find(&self, mut x: u32) -> u32 {
        loop {
            let p = self.parent[x as usize].load(Ordering::Acquire);
            if p == x {
                return x;
            }
            let gp = self.parent[p as usize].load(Ordering::Acquire);
            if gp != p {
                // Lost races only skip the shortcut; `gp` is still an ancestor.
                let _ = self.parent[x as usize].compare_exchange(
                    p,
                    gp,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
            }
            x = p;
        }
    }

    /// Merge the classes of `a` and `b`. Returns `false` if they were already joined.
    pub fn union(&self, a: u32, b: u32) -> bool {
        loop {
            let ra = self.find(a);
            let rb = self.find(b);
            if ra == rb {
                return false;
            }
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            if self.parent[child as usize]
                .compare_exchange(child, root, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    /// Attach `child` to `target`'s class.
    ///
    /// `child` must be a singleton that no other thread touches; seam
    /// interiors qualify because every mid-edge vertex sits on exactly one
    /// seam.
    pub fn link_exclusive(&self, child: u32, target: u32) {
        self.union(child, target);
    }

    /// Number of distinct classes.
    pub fn class_count(&self) -> usize {
        (0..self.parent.len() as u32)
            .filter(|&x| self.find(x) == x)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_singletons() {
        let set = DisjointSet::new(4);
        for i in 0..4 {
            assert_eq!(set.find(i), i);
        }
        assert_eq!(set.class_count(), 4);
    }

    #[test]
    fn test_union_picks_smallest_root() {
        let set = DisjointSet::new(6);
        assert!(set.union(5, 3));
        assert!(set.union(3, 4));
        assert!(set.union(4, 1));
        assert!(!set.union(5, 1));
        for x in [1, 3, 4, 5] {
            assert_eq!(set.find(x), 1);
        }
        assert_eq!(set.find(0), 0);
        assert_eq!(set.find(2), 2);
        assert_eq!(set.class_count(), 3);
    }

    #[test]
    fn test_link_exclusive_joins_existing_class() {
        let set = DisjointSet::new(5);
        set.union(2, 4);
        set.link_exclusive(3, 4);
        assert_eq!(set.find(3), 2);
    }

    #[test]
    fn test_concurrent_unions_agree() {
        let set = DisjointSet::new(1000);
        thread::scope(|s| {
            for t in 0..4u32 {
                let set = &set;
                s.spawn(move || {
                    for i in (t..999).step_by(4) {
                        set.union(i, i + 1);
                    }
                });
            }
        });
        for i in 0..1000 {
            assert_eq!(set.find(i), 0);
        }
        assert_eq!(set.class_count(), 1);
    }
}
