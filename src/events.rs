//! Terminal input thread and application event channel.
//!
//! `crossterm::event::poll()` blocks, so input is read on an OS thread and
//! forwarded to the async loop. Drop only signals shutdown.

use color_eyre::eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// The system browser was launched on a summary page.
    SummaryOpened(String),
    /// Shown in the error popup. Terminal and browser failures both land here.
    Error(String),
}

impl AppEvent {
    /// Event reporting the outcome of opening `url` in the browser.
    pub fn summary_launch(url: String, result: Result<()>) -> Self {
        match result {
            Ok(()) => AppEvent::SummaryOpened(url),
            Err(e) => AppEvent::Error(format!("Could not open {url}: {e}")),
        }
    }
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let input_tx = tx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        let thread = std::thread::spawn(move || {
            while !shutdown_flag.load(Ordering::Relaxed) {
                match event::poll(tick_rate) {
                    Err(e) => {
                        tracing::error!("input poll failed: {e}");
                        let _ = input_tx.send(AppEvent::Error(format!("Lost terminal input: {e}")));
                        break;
                    }
                    Ok(false) => {
                        if input_tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                        continue;
                    }
                    Ok(true) => {}
                }
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) => {
                        if input_tx.send(AppEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        tracing::error!("input read failed: {e}");
                        let _ = input_tx.send(AppEvent::Error(format!("Lost terminal input: {e}")));
                        break;
                    }
                    // Resize redraws on the next tick anyway
                    _ => {}
                }
            }
        });

        Self {
            rx,
            tx,
            shutdown,
            thread: Some(thread),
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::error!("input thread panicked");
            }
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        // Joining here could hang if poll is blocked while unwinding.
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
