//! # Asynchronous Log Sink
//!
//! Moves the I/O cost of diagnostics off the render thread. Producers push
//! strings onto a FIFO queue and return immediately; a single background
//! worker drains the queue and writes each message to the output.
//!
//! ## Lifetime
//!
//! A [`LogSink`] is constructed explicitly by the top-level entry point and
//! owns the worker thread. Anything that needs to log gets a cloned
//! [`LogHandle`]. Dropping the sink (or calling [`LogSink::shutdown`]) blocks
//! until every message enqueued so far has been written, so nothing is lost
//! at process exit.
//!
//! ## Usage
//!
//! ```no_run
//! use sandbox3d::logging::LogSink;
//!
//! let sink = LogSink::new();
//! let log = sink.handle();
//!
//! log.log("loading model");
//! log.disable();
//! log.log("dropped");
//! log.log_forced(">>> ERROR: still written");
//!
//! sink.shutdown();
//! ```
//!
//! The [`facade`] submodule routes the `log` crate macros into the same sink.

pub mod facade;

use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;

pub use facade::install;

/// State shared between producers and the worker.
struct Shared {
    queue: Mutex<VecDeque<String>>,
    available: Condvar,
    enabled: AtomicBool,
    shutdown: AtomicBool,
}

impl Shared {
    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A writer that panicked mid-write leaves the queue itself intact.
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owner of the background flush worker.
pub struct LogSink {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl LogSink {
    /// Sink that writes to stdout.
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Sink that writes every message, newline terminated, to `writer`.
    ///
    /// # Arguments
    /// * `writer` - Destination owned by the worker thread
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            enabled: AtomicBool::new(true),
            shutdown: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("log-sink".into())
            .spawn(move || process_messages(&worker_shared, writer))
            .ok();

        if worker.is_none() {
            // No worker means nobody would ever drain the queue.
            shared.shutdown.store(true, Ordering::SeqCst);
            eprintln!("log-sink: failed to spawn worker thread, logging disabled");
        }

        Self { shared, worker }
    }

    /// Producer handle for this sink.
    pub fn handle(&self) -> LogHandle {
        LogHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Request shutdown and wait for the worker to drain the queue.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        {
            // Holding the lock while flagging closes the window between the
            // worker's predicate check and its wait.
            let _queue = self.shared.lock_queue();
            self.shared.shutdown.store(true, Ordering::SeqCst);
        }
        self.shared.available.notify_all();

        if worker.join().is_err() {
            eprintln!("log-sink: worker thread panicked");
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogSink {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cheap, clonable producer side of a [`LogSink`].
#[derive(Clone)]
pub struct LogHandle {
    shared: Arc<Shared>,
}

impl LogHandle {
    /// Enqueue `message` unless logging is disabled.
    pub fn log(&self, message: impl Into<String>) {
        self.push(message.into(), false);
    }

    /// Enqueue `message` regardless of the enabled flag.
    pub fn log_forced(&self, message: impl Into<String>) {
        self.push(message.into(), true);
    }

    pub fn enable(&self) {
        self.shared.enabled.store(true, Ordering::SeqCst);
    }

    pub fn disable(&self) {
        self.shared.enabled.store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }

    fn push(&self, message: String, force: bool) {
        if !force && !self.is_enabled() {
            return;
        }

        {
            let mut queue = self.shared.lock_queue();
            // The worker is gone once shutdown is flagged.
            if self.shared.shutdown.load(Ordering::SeqCst) {
                return;
            }
            queue.push_back(message);
        }
        self.shared.available.notify_one();
    }
}

/// Worker loop: drain everything queued, exit once shutdown is requested and
/// the queue is empty.
fn process_messages(shared: &Shared, mut writer: Box<dyn Write + Send>) {
    let mut queue = shared.lock_queue();

    loop {
        queue = shared
            .available
            .wait_while(queue, |pending| {
                pending.is_empty() && !shared.shutdown.load(Ordering::SeqCst)
            })
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        while let Some(message) = queue.pop_front() {
            drop(queue);
            // Write failures have nowhere better to go.
            let _ = writeln!(writer, "{message}");
            queue = shared.lock_queue();
        }

        if shared.shutdown.load(Ordering::SeqCst) && queue.is_empty() {
            break;
        }
    }

    drop(queue);
    let _ = writer.flush();
}
