//! Directed link set realizing the signal path.
//!
//! The patchbay knows nothing about units beyond their ids. It stores the
//! links the chain manager asks for and can walk them from the input
//! boundary to prove the realized path is a simple serial chain.

use core::fmt;
use std::collections::HashSet;

use pedalboard_core::UnitId;
use thiserror::Error;

/// A node in the signal graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Chain input boundary.
    Input,
    /// A unit in the chain.
    Unit(UnitId),
    /// Chain output boundary.
    Output,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Input => f.write_str("input"),
            Endpoint::Unit(id) => write!(f, "unit {id}"),
            Endpoint::Output => f.write_str("output"),
        }
    }
}

/// A directed connection `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    /// Source node.
    pub from: Endpoint,
    /// Destination node.
    pub to: Endpoint,
}

/// Why a link set is not a simple serial path from input to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The walk reached a node with no outgoing link before the output.
    #[error("signal path ends at {0} before reaching the output")]
    DeadEnd(Endpoint),
    /// A node has more than one outgoing link.
    #[error("{0} feeds more than one node")]
    Fanout(Endpoint),
    /// The walk revisited a node.
    #[error("signal path loops back to {0}")]
    Cycle(Endpoint),
    /// Links exist that the walk from input never reached.
    #[error("{0} link(s) are not on the signal path")]
    Detached(usize),
}

/// Set of directed links between endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patchbay {
    links: Vec<Link>,
}

impl Default for Patchbay {
    fn default() -> Self {
        Self::new()
    }
}

impl Patchbay {
    /// A bypassed chain: input wired straight to output.
    pub fn new() -> Self {
        Self {
            links: vec![Link {
                from: Endpoint::Input,
                to: Endpoint::Output,
            }],
        }
    }

    /// All links in connection order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Add a link. Returns `false` if it already existed.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> bool {
        let link = Link { from, to };
        if self.links.contains(&link) {
            return false;
        }
        tracing::debug!(%from, %to, "connect");
        self.links.push(link);
        true
    }

    /// Remove a link. Returns `false` if it did not exist.
    pub fn disconnect(&mut self, from: Endpoint, to: Endpoint) -> bool {
        let before = self.links.len();
        self.links.retain(|l| !(l.from == from && l.to == to));
        let removed = self.links.len() != before;
        if removed {
            tracing::debug!(%from, %to, "disconnect");
        }
        removed
    }

    /// Remove every link. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let n = self.links.len();
        self.links.clear();
        tracing::debug!(links = n, "patchbay cleared");
        n
    }

    /// Replace all links with `input -> order... -> output`.
    pub fn rebuild(&mut self, order: &[UnitId]) {
        self.clear();
        let mut prev = Endpoint::Input;
        for &id in order {
            self.connect(prev, Endpoint::Unit(id));
            prev = Endpoint::Unit(id);
        }
        self.connect(prev, Endpoint::Output);
    }

    fn successor(&self, node: Endpoint) -> Result<Option<Endpoint>, TopologyError> {
        let mut outgoing = self.links.iter().filter(|l| l.from == node);
        let first = outgoing.next().map(|l| l.to);
        if outgoing.next().is_some() {
            return Err(TopologyError::Fanout(node));
        }
        Ok(first)
    }

    /// Walk the links from the input boundary to the output boundary.
    ///
    /// Succeeds only when the links form exactly one simple path
    /// `input -> ... -> output` and nothing else.
    pub fn signal_path(&self) -> Result<Vec<Endpoint>, TopologyError> {
        let mut path = vec![Endpoint::Input];
        let mut seen = HashSet::from([Endpoint::Input]);
        let mut node = Endpoint::Input;
        while node != Endpoint::Output {
            let next = self.successor(node)?.ok_or(TopologyError::DeadEnd(node))?;
            if !seen.insert(next) {
                return Err(TopologyError::Cycle(next));
            }
            path.push(next);
            node = next;
        }
        let walked = path.len() - 1;
        if self.links.len() != walked {
            return Err(TopologyError::Detached(self.links.len() - walked));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(n: u64) -> Endpoint {
        Endpoint::Unit(UnitId(n))
    }

    #[test]
    fn new_patchbay_bypasses() {
        let bay = Patchbay::new();
        assert_eq!(bay.signal_path().unwrap(), vec![Endpoint::Input, Endpoint::Output]);
    }

    #[test]
    fn rebuild_serial_chain() {
        let mut bay = Patchbay::new();
        bay.rebuild(&[UnitId(3), UnitId(1)]);
        assert_eq!(
            bay.signal_path().unwrap(),
            vec![Endpoint::Input, unit(3), unit(1), Endpoint::Output]
        );
        assert_eq!(bay.links().len(), 3);
    }

    #[test]
    fn duplicate_connect_is_ignored() {
        let mut bay = Patchbay::new();
        assert!(!bay.connect(Endpoint::Input, Endpoint::Output));
        assert!(bay.disconnect(Endpoint::Input, Endpoint::Output));
        assert!(!bay.disconnect(Endpoint::Input, Endpoint::Output));
    }

    #[test]
    fn detects_broken_topologies() {
        let mut bay = Patchbay::new();
        bay.clear();
        assert_eq!(bay.signal_path(), Err(TopologyError::DeadEnd(Endpoint::Input)));

        bay.connect(Endpoint::Input, unit(1));
        bay.connect(unit(1), unit(2));
        bay.connect(unit(2), unit(1));
        assert_eq!(bay.signal_path(), Err(TopologyError::Cycle(unit(1))));

        let mut bay = Patchbay::new();
        bay.connect(Endpoint::Input, unit(1));
        assert_eq!(bay.signal_path(), Err(TopologyError::Fanout(Endpoint::Input)));

        let mut bay = Patchbay::new();
        bay.connect(unit(7), unit(8));
        assert_eq!(bay.signal_path(), Err(TopologyError::Detached(1)));
    }
}
