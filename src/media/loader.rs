//! Process-wide lazy loading of third-party widget APIs
//!
//! Each widget provider's API is injected at most once per process. The first
//! adapter that needs it performs the injection; adapters arriving while the
//! load is in flight queue as waiters and are all notified with the same
//! result. A failed load returns to idle so a later `initialize()` can retry.
//! A loaded API is never unloaded: re-injection is not safe.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::LoadError;

/// Host capability that injects a provider's script and waits for the API's
/// global ready signal
#[async_trait]
pub trait ApiInjector<A: ?Sized + Send + Sync>: Send + Sync {
    async fn inject(&self) -> Result<Arc<A>, LoadError>;
}

enum LoadState<A: ?Sized> {
    Idle,
    Loading(Vec<oneshot::Sender<Result<Arc<A>, LoadError>>>),
    Loaded(Arc<A>),
}

/// Shared, lazily loaded API for one widget provider
pub struct ApiLoader<A: ?Sized + Send + Sync> {
    provider: &'static str,
    injector: Arc<dyn ApiInjector<A>>,
    state: Mutex<LoadState<A>>,
}

impl<A: ?Sized + Send + Sync> ApiLoader<A> {
    pub fn new(provider: &'static str, injector: Arc<dyn ApiInjector<A>>) -> Self {
        Self {
            provider,
            injector,
            state: Mutex::new(LoadState::Idle),
        }
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.lock(), LoadState::Loaded(_))
    }

    /// Get the API, injecting it first if nobody has yet
    pub async fn api(&self) -> Result<Arc<A>, LoadError> {
        let waiter = {
            let mut state = self.state.lock();
            match &mut *state {
                LoadState::Loaded(api) => return Ok(api.clone()),
                LoadState::Loading(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                LoadState::Idle => {
                    *state = LoadState::Loading(Vec::new());
                    None
                }
            }
        };

        match waiter {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(LoadError::Injection {
                    provider: self.provider,
                    reason: "loader abandoned".to_string(),
                })
            }),
            None => self.load().await,
        }
    }

    async fn load(&self) -> Result<Arc<A>, LoadError> {
        tracing::info!("Injecting {} api", self.provider);
        let guard = InFlight {
            loader: self,
            finished: false,
        };
        let result = self.injector.inject().await;
        guard.finish(&result);

        match &result {
            Ok(_) => tracing::info!("{} api loaded", self.provider),
            Err(e) => tracing::warn!("{} api failed to load: {}", self.provider, e),
        }
        result
    }
}

/// Resets the loader if the injecting future is dropped mid-flight
struct InFlight<'a, A: ?Sized + Send + Sync> {
    loader: &'a ApiLoader<A>,
    finished: bool,
}

impl<A: ?Sized + Send + Sync> InFlight<'_, A> {
    fn finish(mut self, result: &Result<Arc<A>, LoadError>) {
        self.finished = true;
        let waiters = {
            let mut state = self.loader.state.lock();
            let next = match result {
                Ok(api) => LoadState::Loaded(api.clone()),
                Err(_) => LoadState::Idle,
            };
            match std::mem::replace(&mut *state, next) {
                LoadState::Loading(waiters) => waiters,
                _ => Vec::new(),
            }
        };
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
    }
}

impl<A: ?Sized + Send + Sync> Drop for InFlight<'_, A> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Dropping the waiters' senders fails them; the next caller retries.
        let mut state = self.loader.state.lock();
        if matches!(*state, LoadState::Loading(_)) {
            *state = LoadState::Idle;
        }
    }
}
