use std::collections::{HashSet, VecDeque};

/// FIFO frontier plus the seen-set of URLs already dequeued.
///
/// Owned by a single crawl. Callers only get `enqueue` / `dequeue` /
/// `has_seen` / `mark_seen`; `mark_seen` is the single check-and-mark step
/// that guarantees a URL is fetched at most once.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, url: String) {
        self.queue.push_back(url);
    }

    pub fn dequeue(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn has_seen(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Returns `true` if the URL was not seen before.
    pub fn mark_seen(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string())
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.enqueue("a".to_string());
        frontier.enqueue("b".to_string());
        frontier.enqueue("c".to_string());

        assert_eq!(frontier.pending(), 3);
        assert_eq!(frontier.dequeue().as_deref(), Some("a"));
        assert_eq!(frontier.dequeue().as_deref(), Some("b"));
        assert_eq!(frontier.dequeue().as_deref(), Some("c"));
        assert_eq!(frontier.dequeue(), None);
    }

    #[test]
    fn test_mark_seen_once() {
        let mut frontier = Frontier::new();

        assert!(!frontier.has_seen("https://example.com/"));
        assert!(frontier.mark_seen("https://example.com/"));
        assert!(frontier.has_seen("https://example.com/"));
        assert!(!frontier.mark_seen("https://example.com/"));
        assert_eq!(frontier.seen_count(), 1);
    }

    #[test]
    fn test_duplicates_may_queue_but_mark_once() {
        let mut frontier = Frontier::new();
        frontier.enqueue("x".to_string());
        frontier.enqueue("x".to_string());

        let mut marked = 0;
        while let Some(url) = frontier.dequeue() {
            if frontier.mark_seen(&url) {
                marked += 1;
            }
        }
        assert_eq!(marked, 1);
    }
}
