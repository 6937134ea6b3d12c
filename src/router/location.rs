//! Location
//!
//! The navigation surface: a current fragment with history. Every change is
//! published on a watch channel, which is what drives the router loop.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

/// Strip a leading `#` and surrounding whitespace
pub fn normalize_fragment(fragment: &str) -> &str {
    fragment.trim().trim_start_matches('#')
}

#[derive(Debug)]
struct History {
    entries: Vec<String>,
    index: usize,
}

/// Current fragment plus back/forward history
#[derive(Debug)]
pub struct Location {
    current: watch::Sender<String>,
    history: Mutex<History>,
}

impl Location {
    pub fn new(initial: &str) -> Self {
        let initial = normalize_fragment(initial).to_string();
        let (current, _) = watch::channel(initial.clone());
        Self {
            current,
            history: Mutex::new(History {
                entries: vec![initial],
                index: 0,
            }),
        }
    }

    /// Current fragment without the leading `#`
    pub fn fragment(&self) -> String {
        self.current.borrow().clone()
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Move to `fragment`, recording it in history.
    ///
    /// Returns `false` (and notifies nobody) when the fragment is unchanged.
    pub fn set_fragment(&self, fragment: &str) -> bool {
        let fragment = normalize_fragment(fragment).to_string();
        if *self.current.borrow() == fragment {
            return false;
        }

        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            let keep = history.index + 1;
            history.entries.truncate(keep);
            history.entries.push(fragment.clone());
            history.index = history.entries.len() - 1;
        }

        self.current.send_replace(fragment);
        true
    }

    /// Re-announce the current fragment (reload, post-login re-dispatch)
    pub fn refresh(&self) {
        self.current.send_modify(|_| {});
    }

    /// Step back in history; `false` at the oldest entry
    pub fn back(&self) -> bool {
        self.step(-1)
    }

    /// Step forward in history; `false` at the newest entry
    pub fn forward(&self) -> bool {
        self.step(1)
    }

    fn step(&self, delta: isize) -> bool {
        let target = {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            let index = history.index as isize + delta;
            if index < 0 || index as usize >= history.entries.len() {
                return false;
            }
            history.index = index as usize;
            history.entries[history.index].clone()
        };

        self.current.send_replace(target);
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.index + 1 < history.entries.len()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_fragment("#home"), "home");
        assert_eq!(normalize_fragment("  audience-growth "), "audience-growth");
        assert_eq!(normalize_fragment(""), "");
    }

    #[test]
    fn test_unchanged_fragment_does_not_notify() {
        let location = Location::new("#home");
        let mut rx = location.subscribe();
        rx.borrow_and_update();

        assert!(!location.set_fragment("home"));
        assert!(!rx.has_changed().unwrap());

        assert!(location.set_fragment("#network-growth"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "network-growth");
    }

    #[test]
    fn test_refresh_notifies() {
        let location = Location::new("home");
        let mut rx = location.subscribe();
        rx.borrow_and_update();

        location.refresh();
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_history() {
        let location = Location::new("");
        location.set_fragment("a");
        location.set_fragment("b");

        assert!(location.back());
        assert_eq!(location.fragment(), "a");
        assert!(location.back());
        assert_eq!(location.fragment(), "");
        assert!(!location.back());

        assert!(location.forward());
        assert_eq!(location.fragment(), "a");

        location.set_fragment("c");
        assert!(!location.can_go_forward());
        assert!(location.back());
        assert_eq!(location.fragment(), "a");
    }
}
