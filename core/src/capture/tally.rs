use std::collections::BTreeMap;

/// Per source port count of post-handshake segments seen from the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynTally {
    counts: BTreeMap<u16, u64>,
}

impl SynTally {
    pub fn record(&mut self, port: u16) {
        *self.counts.entry(port).or_insert(0) += 1;
    }

    pub fn count(&self, port: u16) -> u64 {
        self.counts.get(&port).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts.iter().map(|(port, count)| (*port, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(u16, u64)> for SynTally {
    fn from_iter<T: IntoIterator<Item = (u16, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
