//! Native media element
//!
//! `MediaElement` is the host-side playback primitive the embedded adapter
//! wraps. It behaves like a browser audio element: loading and end-of-media
//! are reported through a listener, state reads are synchronous.
//!
//! `NativeElement` implements it with rodio. The output stream is opened once,
//! on first play, on a dedicated thread that keeps it alive for the rest of the
//! process; loading only probes the file, on a short-lived thread of its own,
//! so no audio device is needed until something actually plays.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use parking_lot::Mutex;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};

/// Events a media element raises
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// Media is loaded and playable
    CanPlay,
    Playing,
    Paused,
    /// Playback reached the end of the media
    Ended,
    Error(String),
}

/// Listener bound to a media element's events
pub type ElementListener = Arc<dyn Fn(ElementEvent) + Send + Sync>;

/// A native playback element
pub trait MediaElement: Send + Sync {
    /// Replace the event listener; `None` unbinds
    fn set_listener(&self, listener: Option<ElementListener>);
    /// Start loading media; reports `CanPlay` or `Error` to the listener
    fn load(&self, locator: &str);
    fn play(&self);
    fn pause(&self);
    fn set_current_time(&self, seconds: f64);
    /// Volume in `0.0..=1.0`
    fn set_volume(&self, volume: f32);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    /// Stop playback and free the decoder and sink
    fn release(&self);
}

/// Watcher polling interval for end-of-media detection
const END_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Output mixer shared by every native element (stream lives on its own thread)
static OUTPUT_MIXER: once_cell::sync::OnceCell<Result<Mixer, String>> =
    once_cell::sync::OnceCell::new();

fn output_mixer() -> Result<Mixer, String> {
    OUTPUT_MIXER.get_or_init(open_output).clone()
}

fn open_output() -> Result<Mixer, String> {
    let (tx, rx) = std::sync::mpsc::channel();
    thread::Builder::new()
        .name("media-output".to_string())
        .spawn(move || match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                let _ = tx.send(Ok(stream.mixer().clone()));
                // The stream must outlive every sink; park for the process lifetime
                loop {
                    thread::park();
                }
            }
            Err(e) => {
                let _ = tx.send(Err(format!("Failed to create audio output: {}", e)));
            }
        })
        .map_err(|e| format!("Failed to spawn output thread: {}", e))?;

    rx.recv()
        .map_err(|_| "Output thread exited before opening a stream".to_string())?
}

/// Probe a file's duration with lofty, falling back to the decoder
fn probe_duration(path: &Path) -> Result<Duration, String> {
    let from_tags = Probe::open(path)
        .and_then(|probe| probe.read())
        .map(|tagged| tagged.properties().duration())
        .ok()
        .filter(|d| !d.is_zero());

    let decoder = open_decoder(path)?;
    Ok(from_tags
        .or_else(|| decoder.total_duration())
        .unwrap_or(Duration::ZERO))
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| format!("Failed to decode audio: {}", e))
}

struct NativeState {
    /// Bumped by every load and release; a probe finishing under an older
    /// value is discarded
    load_seq: u64,
    path: Option<PathBuf>,
    duration: Duration,
    volume: f32,
    /// Position to apply when the sink is (re)created
    pending_position: Duration,
    sink: Option<Arc<Sink>>,
    watcher_stop: Option<Arc<AtomicBool>>,
}

impl NativeState {
    fn stop_sink(&mut self) {
        if let Some(stop) = self.watcher_stop.take() {
            stop.store(true, Ordering::Release);
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

/// rodio-backed media element for local files
#[derive(Clone)]
pub struct NativeElement {
    state: Arc<Mutex<NativeState>>,
    listener: Arc<Mutex<Option<ElementListener>>>,
}

impl Default for NativeElement {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeElement {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NativeState {
                load_seq: 0,
                path: None,
                duration: Duration::ZERO,
                volume: 1.0,
                pending_position: Duration::ZERO,
                sink: None,
                watcher_stop: None,
            })),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    fn emit(&self, event: ElementEvent) {
        emit_to(&self.listener, event);
    }

    /// Create a sink for the loaded file, positioned at the pending position
    fn start_sink(&self, state: &mut NativeState) -> Result<Arc<Sink>, String> {
        let path = state.path.clone().ok_or("No media loaded")?;
        let mixer = output_mixer()?;
        let source = open_decoder(&path)?;

        let sink = Sink::connect_new(&mixer);
        sink.append(source);
        sink.set_volume(state.volume);
        if !state.pending_position.is_zero() {
            if let Err(e) = sink.try_seek(state.pending_position) {
                tracing::warn!("Initial seek failed: {}", e);
            }
        }

        let sink = Arc::new(sink);
        let stop = Arc::new(AtomicBool::new(false));
        self.spawn_end_watcher(sink.clone(), stop.clone());
        state.sink = Some(sink.clone());
        state.watcher_stop = Some(stop);
        Ok(sink)
    }

    fn spawn_end_watcher(&self, sink: Arc<Sink>, stop: Arc<AtomicBool>) {
        let state = self.state.clone();
        let listener = self.listener.clone();
        let spawned = thread::Builder::new()
            .name("media-element-watch".to_string())
            .spawn(move || {
                loop {
                    thread::sleep(END_POLL_INTERVAL);
                    if stop.load(Ordering::Acquire) {
                        return;
                    }
                    if sink.empty() {
                        {
                            let mut state = state.lock();
                            if state.sink.as_ref().is_some_and(|s| Arc::ptr_eq(s, &sink)) {
                                state.sink = None;
                                state.watcher_stop = None;
                                state.pending_position = Duration::ZERO;
                            }
                        }
                        emit_to(&listener, ElementEvent::Ended);
                        return;
                    }
                }
            });
        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn end-of-media watcher: {}", e);
        }
    }
}

/// Probe `path` and publish the result if no later load or release happened
fn finish_load(
    state: &Mutex<NativeState>,
    listener: &Mutex<Option<ElementListener>>,
    path: PathBuf,
    seq: u64,
) {
    let probed = probe_duration(&path);
    {
        let mut state = state.lock();
        if state.load_seq != seq {
            tracing::debug!("Discarding superseded load of {}", path.display());
            return;
        }
        if let Ok(duration) = &probed {
            state.path = Some(path);
            state.duration = *duration;
        }
    }
    match probed {
        Ok(duration) => {
            tracing::debug!("Loaded media, duration: {:?}", duration);
            emit_to(listener, ElementEvent::CanPlay);
        }
        Err(e) => emit_to(listener, ElementEvent::Error(e)),
    }
}

fn emit_to(listener: &Mutex<Option<ElementListener>>, event: ElementEvent) {
    // Clone out of the lock so the listener may call back into the element
    let listener = listener.lock().clone();
    if let Some(listener) = listener {
        listener(event);
    }
}

impl MediaElement for NativeElement {
    fn set_listener(&self, listener: Option<ElementListener>) {
        *self.listener.lock() = listener;
    }

    fn load(&self, locator: &str) {
        let path = PathBuf::from(locator.strip_prefix("file://").unwrap_or(locator));
        let seq = {
            let mut state = self.state.lock();
            state.stop_sink();
            state.load_seq += 1;
            state.path = None;
            state.duration = Duration::ZERO;
            state.pending_position = Duration::ZERO;
            state.load_seq
        };

        let state = self.state.clone();
        let listener = self.listener.clone();
        let spawned = thread::Builder::new()
            .name("media-element-load".to_string())
            .spawn({
                let path = path.clone();
                move || finish_load(&state, &listener, path, seq)
            });
        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn loader thread, probing inline: {}", e);
            finish_load(&self.state, &self.listener, path, seq);
        }
    }

    fn play(&self) {
        let result = {
            let mut state = self.state.lock();
            match state.sink.clone() {
                Some(sink) => {
                    sink.play();
                    Ok(())
                }
                None => self.start_sink(&mut state).map(|sink| sink.play()),
            }
        };
        match result {
            Ok(()) => self.emit(ElementEvent::Playing),
            Err(e) => self.emit(ElementEvent::Error(e)),
        }
    }

    fn pause(&self) {
        let paused = {
            let mut state = self.state.lock();
            match state.sink.clone() {
                Some(sink) => {
                    sink.pause();
                    state.pending_position = sink.get_pos();
                    true
                }
                None => false,
            }
        };
        if paused {
            self.emit(ElementEvent::Paused);
        }
    }

    fn set_current_time(&self, seconds: f64) {
        let position = match Duration::try_from_secs_f64(seconds.max(0.0)) {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("Ignoring seek to {}: {}", seconds, e);
                return;
            }
        };
        let mut state = self.state.lock();
        state.pending_position = position;
        if let Some(sink) = &state.sink {
            if let Err(e) = sink.try_seek(position) {
                tracing::warn!("Seek failed: {}", e);
            }
        }
    }

    fn set_volume(&self, volume: f32) {
        let mut state = self.state.lock();
        state.volume = volume;
        if let Some(sink) = &state.sink {
            sink.set_volume(volume);
        }
    }

    fn current_time(&self) -> f64 {
        let state = self.state.lock();
        match &state.sink {
            Some(sink) => sink.get_pos().as_secs_f64(),
            None => state.pending_position.as_secs_f64(),
        }
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration.as_secs_f64()
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.stop_sink();
        state.load_seq += 1;
        state.path = None;
    }
}


#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Instant;

    use super::*;

    const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

    fn channel_listener() -> (ElementListener, mpsc::Receiver<ElementEvent>) {
        let (tx, rx) = mpsc::channel();
        let listener: ElementListener = Arc::new(move |e: ElementEvent| {
            let _ = tx.send(e);
        });
        (listener, rx)
    }

    /// Load `path` and block until the element reports back
    fn load_and_wait(element: &NativeElement, path: &Path) -> ElementEvent {
        let (listener, rx) = channel_listener();
        element.set_listener(Some(listener));
        element.load(path.to_str().unwrap());
        let event = rx.recv_timeout(LOAD_TIMEOUT).unwrap();
        element.set_listener(None);
        event
    }

    #[test]
    fn test_load_probes_duration_without_output_device() {
        let path = fixtures::silent_wav(2);
        let element = NativeElement::new();

        assert_eq!(load_and_wait(&element, &path), ElementEvent::CanPlay);

        assert!((element.duration() - 2.0).abs() < 0.05);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_reports_from_its_own_thread() {
        let path = fixtures::silent_wav(1);
        let element = NativeElement::new();
        let (tx, rx) = mpsc::channel();
        let listener: ElementListener = Arc::new(move |e: ElementEvent| {
            let name = thread::current().name().map(str::to_string);
            let _ = tx.send((e, name));
        });
        element.set_listener(Some(listener));

        element.load(path.to_str().unwrap());

        let (event, thread_name) = rx.recv_timeout(LOAD_TIMEOUT).unwrap();
        assert_eq!(event, ElementEvent::CanPlay);
        assert_eq!(thread_name.as_deref(), Some("media-element-load"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_missing_file_reports_error() {
        let element = NativeElement::new();

        let event = load_and_wait(&element, Path::new("/definitely/not/here.flac"));

        assert!(matches!(event, ElementEvent::Error(_)));
        assert_eq!(element.duration(), 0.0);
    }

    #[test]
    fn test_seek_before_play_is_remembered() {
        let path = fixtures::silent_wav(3);
        let element = NativeElement::new();
        load_and_wait(&element, &path);

        element.set_current_time(1.5);
        assert!((element.current_time() - 1.5).abs() < 1e-9);

        element.set_current_time(-4.0);
        assert_eq!(element.current_time(), 0.0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unrepresentable_seek_is_ignored() {
        let path = fixtures::silent_wav(3);
        let element = NativeElement::new();
        load_and_wait(&element, &path);
        element.set_current_time(1.5);

        element.set_current_time(f64::INFINITY);
        element.set_current_time(1e20);

        assert!((element.current_time() - 1.5).abs() < 1e-9);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unbound_listener_receives_nothing() {
        let path = fixtures::silent_wav(1);
        let element = NativeElement::new();
        let (listener, rx) = channel_listener();
        element.set_listener(Some(listener));
        element.set_listener(None);

        element.load(path.to_str().unwrap());

        let started = Instant::now();
        while element.duration() == 0.0 && started.elapsed() < LOAD_TIMEOUT {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(element.duration() > 0.0);
        assert!(rx.try_recv().is_err());
        let _ = std::fs::remove_file(path);
    }
}
