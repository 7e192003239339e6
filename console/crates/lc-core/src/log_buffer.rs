use crate::LogLine;

use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 500;

/// Bounded console history. Appends past capacity evict the oldest lines.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
    next_seq: u64,
}

impl LogBuffer {
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) -> &LogLine {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }

        let line = LogLine::new(self.next_seq, text);
        self.next_seq += 1;
        self.lines.push_back(line);

        &self.lines[self.lines.len() - 1]
    }

    pub fn extend<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for text in texts {
            self.push(text);
        }
    }

    /// Replace everything except the newest `keep_newest` lines with `history`.
    ///
    /// Kept lines follow the history lines. Everything is renumbered so
    /// sequence numbers still increase front to back. Returns how many
    /// history lines survived eviction; they sit at the front.
    pub fn backfill<I, S>(&mut self, history: I, keep_newest: usize) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keep_from = self.lines.len().saturating_sub(keep_newest);
        let live: Vec<String> = self.lines.drain(keep_from..).map(|line| line.text).collect();
        let live_kept = live.len().min(self.capacity);

        self.lines.clear();
        self.extend(history);
        self.extend(live);

        self.lines.len() - live_kept
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    /// Owned copy of the line texts, oldest first
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
