use std::{
    collections::BTreeMap,
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use lazy_static::lazy_static;

pub type StatsNode = Arc<Mutex<Stats>>;

lazy_static! {
    static ref ROOT_STATS: StatsNode = Arc::new(Mutex::new(Stats::new(1)));
}

/// A node of the hierarchical timing statistics.
pub struct Stats {
    /// The hierarchical depth of the stats node
    depth: usize,

    /// The accumulated timings in nanoseconds
    timings_ns: u128,

    /// The number of recorded timings
    num_calls: usize,

    /// Further children timings, ordered by their name
    children: BTreeMap<String, StatsNode>,
}

/// Adds the elapsed time to the destination node when dropped.
pub struct TimeRecording {
    dst_node: StatsNode,
    t0: Instant,
}

pub trait StatsNodeTrait {
    /// Starts a new time recording that ends when the returned guard is dropped.
    fn register_timing(&self) -> TimeRecording;

    /// Returns the child node with the given name, creating it if necessary.
    fn get_child(&self, name: &str) -> StatsNode;
}

/// Locks the node, a poisoned lock only means a panic during a recording.
fn lock(node: &StatsNode) -> MutexGuard<'_, Stats> {
    node.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TimeRecording {
    pub fn new(dst_node: StatsNode) -> Self {
        let t0 = Instant::now();

        Self { dst_node, t0 }
    }
}

impl Drop for TimeRecording {
    #[inline]
    fn drop(&mut self) {
        let ns = self.t0.elapsed().as_nanos();

        let mut node = lock(&self.dst_node);
        node.timings_ns += ns;
        node.num_calls += 1;
    }
}

impl Stats {
    /// Returns the root stats node
    #[inline]
    pub fn root() -> StatsNode {
        ROOT_STATS.clone()
    }

    /// Creates a new detached root node.
    pub fn new_root() -> StatsNode {
        Arc::new(Mutex::new(Stats::new(1)))
    }

    /// Returns a children time node for the given identifier.
    ///
    /// # Arguments
    /// * `name` - The name of the children time.
    #[inline]
    pub fn get_child(&mut self, name: String) -> StatsNode {
        let depth = self.depth + 1;
        let node = self
            .children
            .entry(name)
            .or_insert_with(|| Arc::new(Mutex::new(Stats::new(depth))));

        node.clone()
    }

    /// Returns the elapsed time of the node in nano-seconds
    #[inline]
    pub fn as_nanos(&self) -> u128 {
        self.timings_ns
    }

    /// Returns the elapsed time of the node in milli-seconds
    #[inline]
    pub fn as_millis(&self) -> u128 {
        self.timings_ns / 1000000u128
    }

    /// Returns the number of recorded timings
    #[inline]
    pub fn num_calls(&self) -> usize {
        self.num_calls
    }

    fn new(depth: usize) -> Self {
        Self {
            depth,
            timings_ns: 0u128,
            num_calls: 0,
            children: BTreeMap::new(),
        }
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.children.is_empty() {
            writeln!(f, "{} ms ({} calls),", self.as_millis(), self.num_calls)
        } else {
            if self.num_calls == 0 {
                writeln!(f, "{{")?;
            } else {
                writeln!(
                    f,
                    "{} ms ({} calls) {{",
                    self.as_millis(),
                    self.num_calls
                )?;
            }

            for (name, child) in self.children.iter() {
                for _ in 0..(self.depth * 2) {
                    write!(f, " ")?;
                }

                write!(f, "{}: ", name)?;
                lock(child).fmt(f)?;
            }

            writeln!(f, "}},")
        }
    }
}

impl StatsNodeTrait for StatsNode {
    #[inline]
    fn register_timing(&self) -> TimeRecording {
        TimeRecording::new(self.clone())
    }

    #[inline]
    fn get_child(&self, name: &str) -> StatsNode {
        lock(self).get_child(name.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stats_hierarchy() {
        let s = Stats::new_root();

        for _ in 0..3 {
            let _t = s.get_child("raycast").register_timing();
        }
        {
            let _t = s.get_child("build_scene").register_timing();
        }

        let raycast = s.get_child("raycast");
        assert_eq!(raycast.lock().unwrap().num_calls(), 3);
        assert!(Arc::ptr_eq(&raycast, &s.get_child("raycast")));

        let printed = format!("{}", *s.lock().unwrap());
        let build = printed.find("build_scene").unwrap();
        let raycast = printed.find("raycast").unwrap();
        assert!(build < raycast);
        assert!(printed.contains("(3 calls)"));
    }
}
