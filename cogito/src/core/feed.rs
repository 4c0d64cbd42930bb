//! Append-only log of execution outcomes.

/// Number of feed lines surfaced for display.
pub const FEED_VIEW_LINES: usize = 5;

/// Ordered result/status lines. Entries are never mutated or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    lines: Vec<String>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The last `n` lines, oldest first.
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }

    /// Full history.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_is_bounded_and_ordered() {
        let mut feed = Feed::new();
        for i in 0..8 {
            feed.append(format!("line {i}"));
        }
        let recent = feed.recent(FEED_VIEW_LINES);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent.first().map(String::as_str), Some("line 3"));
        assert_eq!(recent.last().map(String::as_str), Some("line 7"));
        assert_eq!(feed.len(), 8);
    }

    #[test]
    fn recent_on_short_history_returns_everything() {
        let mut feed = Feed::new();
        feed.append("only");
        assert_eq!(feed.recent(FEED_VIEW_LINES), ["only".to_string()]);
        assert!(Feed::new().recent(FEED_VIEW_LINES).is_empty());
    }

    #[test]
    fn reading_recent_does_not_mutate() {
        let mut feed = Feed::new();
        feed.append("a");
        feed.append("b");
        let before = feed.clone();
        let _ = feed.recent(1);
        let _ = feed.recent(FEED_VIEW_LINES);
        assert_eq!(feed, before);
    }
}
