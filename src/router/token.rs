//! Navigation tokens
//!
//! Every navigation bumps the router epoch. A token remembers the epoch it
//! was issued for and reports when a newer navigation has started.

use tokio::sync::watch;

/// Identity of one navigation
#[derive(Debug, Clone)]
pub struct NavigationToken {
    epoch: u64,
    current: watch::Receiver<u64>,
}

impl NavigationToken {
    pub(crate) fn new(epoch: u64, current: watch::Receiver<u64>) -> Self {
        Self { epoch, current }
    }

    /// Token that is never superseded, for renders outside a router
    pub fn detached() -> Self {
        let (tx, rx) = watch::channel(0);
        // Dropping the sender freezes the epoch at 0.
        drop(tx);
        Self::new(0, rx)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether this is still the latest navigation
    pub fn is_current(&self) -> bool {
        *self.current.borrow() == self.epoch
    }

    /// Resolves once a newer navigation starts; never resolves otherwise
    pub async fn cancelled(&self) {
        let mut current = self.current.clone();
        loop {
            if *current.borrow_and_update() != self.epoch {
                return;
            }
            if current.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_token_cancelled_on_new_epoch() {
        let (tx, rx) = watch::channel(1u64);
        let token = NavigationToken::new(1, rx);
        assert!(token.is_current());

        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        tx.send_replace(2);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(!token.is_current());
    }

    #[tokio::test]
    async fn test_detached_never_cancels() {
        let token = NavigationToken::detached();
        assert!(token.is_current());

        let result = tokio::time::timeout(Duration::from_millis(20), token.cancelled()).await;
        assert!(result.is_err());
    }
}
