use std::future::Future;
use tokio::sync::watch;

/// Scope of a mounted view.
///
/// Futures started on behalf of the view run under a [`LifetimeGuard`] and resolve to
/// `None` as soon as the lifetime is closed, either explicitly or by dropping it.
#[derive(Debug)]
pub struct ViewLifetime {
    closed_tx: watch::Sender<bool>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        let (closed_tx, _) = watch::channel(false);
        Self { closed_tx }
    }

    pub fn guard(&self) -> LifetimeGuard {
        LifetimeGuard {
            closed_rx: self.closed_tx.subscribe(),
        }
    }

    pub fn close(&self) {
        self.closed_tx.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewLifetime {
    fn drop(&mut self) {
        self.close();
    }
}

#[derive(Debug, Clone)]
pub struct LifetimeGuard {
    closed_rx: watch::Receiver<bool>,
}

impl LifetimeGuard {
    pub fn is_closed(&self) -> bool {
        *self.closed_rx.borrow()
    }

    /// Drive `fut` to completion unless the owning view closes first.
    pub async fn run<F>(mut self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.is_closed() {
            return None;
        }

        tokio::select! {
            biased;
            _ = wait_closed(&mut self.closed_rx) => None,
            output = fut => Some(output),
        }
    }
}

async fn wait_closed(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        // Sender gone means the view is gone.
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_passes_output_through() {
        let lifetime = ViewLifetime::new();
        let output = lifetime.guard().run(async { 7 }).await;
        assert_eq!(output, Some(7));
    }

    #[tokio::test]
    async fn test_closed_lifetime_short_circuits() {
        let lifetime = ViewLifetime::new();
        let guard = lifetime.guard();
        lifetime.close();
        assert!(lifetime.is_closed());
        assert_eq!(guard.run(async { 7 }).await, None);
    }

    #[tokio::test]
    async fn test_close_cancels_pending_future() {
        let lifetime = ViewLifetime::new();
        let guard = lifetime.guard();

        let handle = tokio::spawn(guard.run(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "late"
        }));

        tokio::task::yield_now().await;
        lifetime.close();

        let output = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(output, None);
    }

    #[tokio::test]
    async fn test_dropping_lifetime_cancels() {
        let lifetime = ViewLifetime::new();
        let guard = lifetime.guard();
        drop(lifetime);
        assert!(guard.is_closed());
        assert_eq!(guard.run(std::future::pending::<()>()).await, None);
    }
}
