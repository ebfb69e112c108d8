//! Event handling module for the application
//!
//! Terminal input is read on a separate thread and forwarded to the main
//! thread over a channel, together with periodic ticks.
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use log::error;

/// Events that can be processed by the application
#[derive(Debug, Clone, Copy)]
pub enum Event
{
    /// Regular time tick for updating UI elements
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Terminal resize event with new dimensions
    Resize(u16, u16),
}

/// Handles terminal events
///
/// Manages event handling in a separate thread and provides
/// a way to receive events through a channel.
pub struct EventHandler
{
    /// Receiver side of the event channel to get events from the handler thread
    event_receiver: mpsc::Receiver<Event>,
    /// Sender for shutdown the thread for graceful shutdown
    shutdown_sender: mpsc::Sender<()>,
    /// Handle to join the thread on drop
    // Option is used to move the handle out of `&mut self` in `drop`
    thread_handle: Option<JoinHandle<()>>,
}

impl EventHandler
{
    /// Creates a new event handler with the specified tick rate
    ///
    /// # Arguments
    ///
    /// * `tick_rate` - The duration between tick events
    ///
    /// # Returns
    ///
    /// A new `EventHandler` instance with a running background thread
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self
    {
        let (event_sender, event_receiver) = mpsc::channel();
        let (shutdown_sender, shutdown_receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop
            {
                if shutdown_receiver.try_recv().is_ok()
                {
                    break;
                }

                // If more time than tick_rate has passed, don't wait at all
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                match poll_event(timeout)
                {
                    Ok(Some(event)) =>
                    {
                        // Receiver dropped
                        if event_sender.send(event).is_err()
                        {
                            break;
                        }
                    }
                    Ok(None) =>
                    {}
                    Err(err) =>
                    {
                        // Dropping the sender makes `next` fail on the main thread
                        error!("{err:#}");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate
                {
                    if event_sender.send(Event::Tick).is_err()
                    {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            event_receiver,
            shutdown_sender,
            thread_handle: Some(handle),
        }
    }

    /// Gets the next event from the event channel
    ///
    /// This method blocks until an event is available
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is disconnected.
    pub fn next(&self) -> Result<Event>
    {
        self.event_receiver
            .recv()
            .context("Event channel disconnected")
    }
}

/// Waits up to `timeout` for a terminal event worth forwarding.
///
/// Key releases and repeats are dropped so that a single key press is seen
/// once on every platform.
fn poll_event(timeout: Duration) -> Result<Option<Event>>
{
    if !event::poll(timeout).context("Error polling events")?
    {
        return Ok(None);
    }

    let event = match event::read().context("Error reading event")?
    {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    };

    Ok(event)
}

impl Drop for EventHandler
{
    fn drop(&mut self)
    {
        // Signal shutdown (ignore if already closed)
        let _ = self.shutdown_sender.send(());

        if let Some(handle) = self.thread_handle.take()
        {
            let _ = handle.join();
        }
    }
}
