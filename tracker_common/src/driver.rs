//! Single-threaded event loop that owns a `TrackerSession`.
//!
//! The driver multiplexes three sources with crossbeam `select!`:
//!
//! - feed events from the transport, applied strictly in arrival order;
//! - the connect timer, armed with `crossbeam_channel::at` while the session is
//!   `Connecting` and replaced by `never()` once it settles;
//! - a shutdown channel (message or disconnect both stop the loop).
//!
//! When the session falls back to `Mock` or `Error` the transport is told to
//! give up through `FeedControl::terminate`. A closed feed channel is not an
//! error; the loop keeps running on the timer and the shutdown channel.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, at, never, select};
use log::{debug, info};

use crate::session::{ConnectionStatus, FeedEvent, SessionUpdate, TrackerSession};

/// Handle the driver uses to stop a pending or running transport.
pub trait FeedControl {
    /// Abort the connection attempt or close the connection. Called at most once.
    fn terminate(&mut self);
}

impl<F: FnMut()> FeedControl for F {
    fn terminate(&mut self) {
        self()
    }
}

/// Owns the session and serializes every mutation through one loop.
pub struct SessionDriver<C: FeedControl> {
    session: TrackerSession,
    control: Option<C>,
    connect_timeout: Duration,
}

impl<C: FeedControl> SessionDriver<C> {
    /// Creates a driver; the connect timer starts when `run` is called.
    pub fn new(session: TrackerSession, control: C, connect_timeout: Duration) -> Self {
        Self {
            session,
            control: Some(control),
            connect_timeout,
        }
    }

    /// Run until `shutdown` fires, calling `render` after every handled event.
    ///
    /// Events already queued when shutdown arrives are still applied. Returns
    /// the final session.
    pub fn run<R>(mut self, events: Receiver<FeedEvent>, shutdown: Receiver<()>, mut render: R) -> TrackerSession
    where
        R: FnMut(&TrackerSession, &SessionUpdate),
    {
        let deadline = Instant::now() + self.connect_timeout;
        let idle = never::<FeedEvent>();
        let mut feed_open = true;

        loop {
            let timer = if self.session.status() == ConnectionStatus::Connecting {
                at(deadline)
            } else {
                never()
            };
            let feed = if feed_open { &events } else { &idle };

            select! {
                recv(shutdown) -> _ => {
                    info!("Shutdown requested");
                    while let Ok(event) = feed.try_recv() {
                        self.step(event, &mut render);
                    }
                    break;
                }
                recv(feed) -> msg => match msg {
                    Ok(event) => self.step(event, &mut render),
                    Err(_) => {
                        debug!("Feed channel closed");
                        feed_open = false;
                    }
                },
                recv(timer) -> _ => self.step(FeedEvent::TimeoutElapsed, &mut render),
            }
        }
        self.session
    }

    fn step<R>(&mut self, event: FeedEvent, render: &mut R)
    where
        R: FnMut(&TrackerSession, &SessionUpdate),
    {
        let update = self.session.handle(event);
        if matches!(
            self.session.status(),
            ConnectionStatus::Mock | ConnectionStatus::Error
        ) {
            if let Some(mut control) = self.control.take() {
                debug!("Terminating feed transport");
                control.terminate();
            }
        }
        render(&self.session, &update);
    }
}
