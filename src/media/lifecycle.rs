//! Shared adapter lifecycle
//!
//! Each `initialize()` opens a new binding generation. Widget callbacks carry
//! the generation they were bound under, so anything arriving after teardown
//! or after a rebind is recognised as stale and dropped. A second
//! `initialize()` while a binding is still loading joins that binding instead
//! of opening another one.

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::events::{AdapterEvent, AdapterEventSender, PlaybackState};
use super::source::AudioSourceDescriptor;
use crate::error::{LoadError, StaleCallbackError};

/// Signal raised by a wrapped surface's callback
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Signal {
    Ready,
    Failed(LoadError),
    State(PlaybackState),
}

type ReadyTx = oneshot::Sender<Result<(), LoadError>>;

/// Outcome of opening a binding
pub(crate) enum Binding {
    /// Already ready, nothing to bind
    Ready,
    /// Another caller's binding is still loading; `ready` resolves with it
    Joined {
        ready: oneshot::Receiver<Result<(), LoadError>>,
    },
    /// New generation opened; `ready` resolves on the first Ready/Failed signal
    Opened {
        generation: u64,
        ready: oneshot::Receiver<Result<(), LoadError>>,
    },
}

struct CoreState {
    generation: u64,
    bound: bool,
    ready: bool,
    torn_down: bool,
    /// Everyone waiting on the in-flight binding
    waiters: Vec<ReadyTx>,
}

/// State every adapter variant shares
pub(crate) struct AdapterCore {
    provider: &'static str,
    descriptor: AudioSourceDescriptor,
    events: AdapterEventSender,
    state: Mutex<CoreState>,
}

impl AdapterCore {
    pub fn new(
        provider: &'static str,
        descriptor: AudioSourceDescriptor,
        events: AdapterEventSender,
    ) -> Self {
        Self {
            provider,
            descriptor,
            events,
            state: Mutex::new(CoreState {
                generation: 0,
                bound: false,
                ready: false,
                torn_down: false,
                waiters: Vec::new(),
            }),
        }
    }

    pub fn descriptor(&self) -> &AudioSourceDescriptor {
        &self.descriptor
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    /// Open a new binding generation, or join the one still loading
    pub fn bind(&self) -> Result<Binding, LoadError> {
        let mut state = self.state.lock();
        if state.torn_down {
            return Err(LoadError::TornDown);
        }
        if state.ready {
            return Ok(Binding::Ready);
        }
        let (tx, rx) = oneshot::channel();
        if state.bound && !state.waiters.is_empty() {
            state.waiters.push(tx);
            return Ok(Binding::Joined { ready: rx });
        }
        state.generation += 1;
        state.bound = true;
        state.waiters.push(tx);
        Ok(Binding::Opened {
            generation: state.generation,
            ready: rx,
        })
    }

    /// Whether callbacks bound under `generation` are still live
    pub fn is_current(&self, generation: u64) -> bool {
        let state = self.state.lock();
        !state.torn_down && state.bound && state.generation == generation
    }

    /// Route a callback from the wrapped surface to the owner
    pub fn dispatch(&self, generation: u64, signal: Signal) -> Result<(), StaleCallbackError> {
        let mut state = self.state.lock();
        if state.torn_down || !state.bound || state.generation != generation {
            tracing::debug!(
                "{}: dropping stale {:?} from generation {}",
                self.provider,
                signal,
                generation
            );
            return Err(StaleCallbackError { generation });
        }

        let event = match signal {
            Signal::Ready => {
                if state.ready {
                    return Ok(());
                }
                state.ready = true;
                for tx in state.waiters.drain(..) {
                    let _ = tx.send(Ok(()));
                }
                tracing::info!("{}: ready ({})", self.provider, self.descriptor.name);
                AdapterEvent::Ready
            }
            Signal::Failed(error) => {
                for tx in state.waiters.drain(..) {
                    let _ = tx.send(Err(error.clone()));
                }
                tracing::warn!("{}: {}", self.provider, error);
                AdapterEvent::Error(error)
            }
            Signal::State(playback) => AdapterEvent::PlaybackStateChanged(playback),
        };
        let _ = self.events.send(event);
        Ok(())
    }

    /// Fail the current binding from inside `initialize()` itself
    pub fn fail(&self, generation: u64, error: LoadError) {
        let _ = self.dispatch(generation, Signal::Failed(error));
        self.unbind_generation(generation);
    }

    /// Close a failed binding so a later `initialize()` starts fresh
    fn unbind_generation(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation == generation {
            state.bound = false;
            state.ready = false;
        }
    }

    /// Invalidate every binding. Returns false when already torn down.
    pub fn teardown(&self) -> bool {
        let mut state = self.state.lock();
        if state.torn_down {
            return false;
        }
        state.torn_down = true;
        state.bound = false;
        state.ready = false;
        state.generation += 1;
        // Dropping the senders resolves every pending initialize() with TornDown
        state.waiters.clear();
        true
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.lock().torn_down
    }

    /// Wait for the binding opened or joined by [`Self::bind`] to resolve
    pub async fn await_ready(
        &self,
        ready: oneshot::Receiver<Result<(), LoadError>>,
    ) -> Result<(), LoadError> {
        match ready.await {
            Ok(result) => result,
            Err(_) => Err(LoadError::TornDown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::events::adapter_event_channel;

    fn core() -> (AdapterCore, crate::media::AdapterEventReceiver) {
        let (tx, rx) = adapter_event_channel();
        let descriptor = AudioSourceDescriptor::local_file("/tmp/a.wav");
        (AdapterCore::new("test", descriptor, tx), rx)
    }

    fn opened(binding: Binding) -> (u64, oneshot::Receiver<Result<(), LoadError>>) {
        match binding {
            Binding::Opened { generation, ready } => (generation, ready),
            _ => panic!("expected a fresh binding"),
        }
    }

    #[tokio::test]
    async fn test_ready_resolves_binding_and_emits_event() {
        let (core, mut rx) = core();
        let (generation, ready) = opened(core.bind().unwrap());

        core.dispatch(generation, Signal::Ready).unwrap();

        assert_eq!(core.await_ready(ready).await, Ok(()));
        assert!(core.is_ready());
        assert_eq!(rx.try_recv().unwrap(), AdapterEvent::Ready);
    }

    #[tokio::test]
    async fn test_teardown_before_ready_discards_late_signals() {
        let (core, mut rx) = core();
        let (generation, ready) = opened(core.bind().unwrap());

        assert!(core.teardown());
        assert!(!core.teardown());

        assert!(core.dispatch(generation, Signal::Ready).is_err());
        assert!(
            core.dispatch(generation, Signal::Failed(LoadError::TornDown))
                .is_err()
        );
        assert_eq!(core.await_ready(ready).await, Err(LoadError::TornDown));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_rebind_invalidates_previous_generation() {
        let (core, mut rx) = core();
        let (first, _ready) = opened(core.bind().unwrap());
        core.fail(first, LoadError::Media("boom".to_string()));
        assert!(matches!(rx.try_recv(), Ok(AdapterEvent::Error(_))));

        let (second, _ready) = opened(core.bind().unwrap());
        assert_ne!(first, second);
        assert!(core.dispatch(first, Signal::Ready).is_err());
        assert!(core.dispatch(second, Signal::Ready).is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_binds_share_one_generation() {
        let (core, mut rx) = core();
        let (generation, first) = opened(core.bind().unwrap());
        let second = match core.bind().unwrap() {
            Binding::Joined { ready } => ready,
            _ => panic!("second bind should join the loading one"),
        };

        assert!(core.is_current(generation));
        core.dispatch(generation, Signal::Ready).unwrap();

        assert_eq!(core.await_ready(first).await, Ok(()));
        assert_eq!(core.await_ready(second).await, Ok(()));
        assert_eq!(rx.try_recv().unwrap(), AdapterEvent::Ready);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_teardown_resolves_every_waiter() {
        let (core, _rx) = core();
        let (_generation, first) = opened(core.bind().unwrap());
        let second = match core.bind().unwrap() {
            Binding::Joined { ready } => ready,
            _ => panic!("second bind should join the loading one"),
        };

        core.teardown();

        assert_eq!(core.await_ready(first).await, Err(LoadError::TornDown));
        assert_eq!(core.await_ready(second).await, Err(LoadError::TornDown));
    }

    #[test]
    fn test_bind_after_teardown_fails() {
        let (core, _rx) = core();
        core.teardown();
        assert!(matches!(core.bind(), Err(LoadError::TornDown)));
    }
}
