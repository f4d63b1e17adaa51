//! Occupancy statistics and the human-readable dump. Debugging aid only.

use crate::chain_map::ChainMap;
use core::fmt;
use std::io::{self, Write};

/// Snapshot of bucket occupancy. Percentages are integer and relative to
/// the bucket count.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub capacity: usize,
    pub load_percent: usize,
    /// Non-empty buckets.
    pub used_percent: usize,
    /// Entries sitting behind another entry in their chain.
    pub collision_percent: usize,
    pub max_chain: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "num={}, capacity={}({}%), used={}%, collision={}%, max_chain={}",
            self.count,
            self.capacity,
            self.load_percent,
            self.used_percent,
            self.collision_percent,
            self.max_chain
        )
    }
}

impl<V> ChainMap<V> {
    pub fn stats(&self) -> Stats {
        let capacity = self.capacity();
        let mut used = 0usize;
        let mut collisions = 0usize;
        let mut max_chain = 0usize;
        for idx in 0..capacity {
            let n = self.chain(idx).count();
            if n == 0 {
                continue;
            }
            used += 1;
            collisions += n - 1;
            max_chain = max_chain.max(n);
        }
        Stats {
            count: self.len(),
            capacity,
            load_percent: self.load_percent(),
            used_percent: used * 100 / capacity,
            collision_percent: collisions * 100 / capacity,
            max_chain,
        }
    }
}

impl<V: fmt::Debug> ChainMap<V> {
    /// Write a one-line summary labelled `label`; with `verbose`, also every
    /// chain as `bucket: "key", value`.
    pub fn dump_to<W: Write>(&self, w: &mut W, label: &str, verbose: bool) -> io::Result<()> {
        writeln!(w, "= {}: {}", label, self.stats())?;
        if !verbose {
            return Ok(());
        }
        for idx in 0..self.capacity() {
            for (pos, (_, e)) in self.chain(idx).enumerate() {
                let key = String::from_utf8_lossy(&e.key);
                if pos == 0 {
                    writeln!(w, "{:03}: \"{}\", {:?}", idx, key, e.value)?;
                } else {
                    writeln!(w, "   : \"{}\", {:?}", key, e.value)?;
                }
            }
        }
        Ok(())
    }

    /// [`dump_to`](Self::dump_to) on stderr. Write errors are ignored.
    pub fn dump(&self, label: &str, verbose: bool) {
        let stderr = io::stderr();
        let _ = self.dump_to(&mut stderr.lock(), label, verbose);
    }
}
