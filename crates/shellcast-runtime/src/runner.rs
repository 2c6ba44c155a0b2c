#![forbid(unsafe_code)]

//! Background playback thread.
//!
//! [`Runner`] moves a [`SequencerHost`] onto a dedicated thread driven by the
//! wall clock. The thread sleeps on its command channel with a timeout equal
//! to the time until the next transition, so control commands interrupt the
//! wait immediately and the thread stays the only writer.
//!
//! # Failure Modes
//!
//! - Spawning the thread can fail ([`RunnerError::Spawn`]).
//! - Commands sent after the thread exited report
//!   [`RunnerError::Disconnected`].

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use shellcast_core::{Snapshot, StepSequencer};

use crate::clock::MonotonicClock;
use crate::host::SequencerHost;
use crate::store::SnapshotStore;

/// Errors from the background runner.
#[derive(Debug)]
pub enum RunnerError {
    /// The playback thread could not be spawned.
    Spawn(io::Error),
    /// The playback thread is gone.
    Disconnected,
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to spawn playback thread: {e}"),
            Self::Disconnected => write!(f, "playback thread is no longer running"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Disconnected => None,
        }
    }
}

enum Command {
    Start,
    Stop,
    Reset,
    Subscribe(mpsc::Sender<mpsc::Receiver<Snapshot>>),
    Shutdown,
}

/// Handle to a sequencer playing on its own thread.
pub struct Runner {
    commands: mpsc::Sender<Command>,
    store: Arc<SnapshotStore>,
    thread: Option<thread::JoinHandle<()>>,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("store", &self.store)
            .field("running", &self.thread.is_some())
            .finish()
    }
}

impl Runner {
    /// Spawn the playback thread. Honors the sequencer's `auto_start`.
    pub fn spawn(sequencer: StepSequencer) -> Result<Self, RunnerError> {
        let host = SequencerHost::new(sequencer, MonotonicClock::new());
        let store = host.store();
        let (commands, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("shellcast-runner".into())
            .spawn(move || run_loop(host, rx))
            .map_err(RunnerError::Spawn)?;
        tracing::debug!("runner spawned");
        Ok(Self {
            commands,
            store,
            thread: Some(thread),
        })
    }

    /// Start playback. No-op unless idle.
    pub fn start(&self) -> Result<(), RunnerError> {
        self.send(Command::Start)
    }

    /// Stop playback and return to the initial state.
    pub fn stop(&self) -> Result<(), RunnerError> {
        self.send(Command::Stop)
    }

    /// Same as [`stop`](Self::stop).
    pub fn reset(&self) -> Result<(), RunnerError> {
        self.send(Command::Reset)
    }

    /// Register an observer on the playback thread.
    ///
    /// Blocks until the thread has registered it, so the first snapshot
    /// received reflects the state at registration time.
    pub fn subscribe(&self) -> Result<mpsc::Receiver<Snapshot>, RunnerError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(Command::Subscribe(reply_tx))?;
        reply_rx.recv().map_err(|_| RunnerError::Disconnected)
    }

    /// Latest published snapshot. Never blocks the playback thread.
    pub fn latest(&self) -> Arc<Snapshot> {
        self.store.load()
    }

    /// Shared latest-snapshot store.
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) -> Result<(), RunnerError> {
        self.join()
    }

    fn send(&self, command: Command) -> Result<(), RunnerError> {
        self.commands
            .send(command)
            .map_err(|_| RunnerError::Disconnected)
    }

    fn join(&mut self) -> Result<(), RunnerError> {
        let Some(handle) = self.thread.take() else {
            return Ok(());
        };
        // The thread may already be gone; joining still reaps it.
        let _ = self.commands.send(Command::Shutdown);
        handle.join().map_err(|_| RunnerError::Disconnected)
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        // Commands interrupt the wait, so this join returns promptly.
        let _ = self.join();
    }
}

fn run_loop(mut host: SequencerHost<MonotonicClock>, commands: mpsc::Receiver<Command>) {
    loop {
        host.pump();
        let received = match host.time_until_next() {
            Some(wait) => commands.recv_timeout(wait),
            None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(Command::Start) => {
                host.start();
            }
            Ok(Command::Stop) => host.stop(),
            Ok(Command::Reset) => host.reset(),
            Ok(Command::Subscribe(reply)) => {
                let _ = reply.send(host.subscribe());
            }
            Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
    tracing::debug!(transitions = host.transitions_fired(), "runner exited");
}
