// src/timing.rs
use std::collections::HashMap;

/// Cycle timing for one opcode, as scraped from the reference page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    pub opcode: String,
    pub cycles: u32,
    /// `+1` in the catalog: an extra cycle when a page boundary is crossed.
    pub page_penalty: bool,
}

impl Timing {
    pub fn new<S: Into<String>>(opcode: S, cycles: u32, page_penalty: bool) -> Self {
        Self { opcode: opcode.into(), cycles, page_penalty }
    }
}

/// Opcode → timing. Built fresh each run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingTable {
    entries: HashMap<String, Timing>,
}

impl TimingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. Returns the entry that was replaced, if any.
    pub fn insert(&mut self, timing: Timing) -> Option<Timing> {
        self.entries.insert(timing.opcode.clone(), timing)
    }

    pub fn get(&self, opcode: &str) -> Option<&Timing> {
        self.entries.get(opcode)
    }

    /// Matching entry, or zero cycles with no penalty. The flag says which.
    pub fn get_or_default(&self, opcode: Option<&str>) -> (Timing, bool) {
        match opcode.and_then(|op| self.entries.get(op)) {
            Some(t) => (t.clone(), true),
            None => (Timing::new(opcode.unwrap_or_default(), 0, false), false),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timing> {
        self.entries.values()
    }
}

impl FromIterator<Timing> for TimingTable {
    fn from_iter<I: IntoIterator<Item = Timing>>(iter: I) -> Self {
        let mut table = TimingTable::new();
        for t in iter {
            table.insert(t);
        }
        table
    }
}
