//! Wall-clock driver for a session.
//!
//! A single tokio task owns the `Session`. Commands and timer wakeups are
//! handled one at a time by that task, so the engine never sees concurrent
//! mutation even on the multi-threaded runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::session::{Action, Session, SessionSnapshot};
use crate::tension::TensionSink;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

/// An event with the wall-clock time it was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedEvent {
    pub session_id: Uuid,
    pub wall: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

enum Command {
    Act {
        action: Action,
        reply: oneshot::Sender<Result<Vec<Event>>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// Client side of a running session.
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<StampedEvent>,
    task: JoinHandle<SessionSnapshot>,
}

/// Start `session` on the current tokio runtime. Session time 0 is now.
pub fn spawn_session<S>(session: Session<S>) -> SessionHandle
where
    S: TensionSink + Send + 'static,
{
    let id = Uuid::new_v4();
    let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let actor = Actor {
        id,
        session,
        started: Instant::now(),
        events: events.clone(),
    };
    let task = tokio::spawn(actor.run(rx).instrument(info_span!("session", %id)));
    SessionHandle {
        id,
        commands,
        events,
        task,
    }
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StampedEvent> {
        self.events.subscribe()
    }

    /// Apply a player action and return the events it caused.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::SessionClosed` if the actor has stopped, or the
    /// action's own validation error.
    pub async fn act(&self, action: Action) -> Result<Vec<Event>> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Act { action, reply })
            .await
            .map_err(|_| CoreError::SessionClosed)?;
        rx.await.map_err(|_| CoreError::SessionClosed)?
    }

    /// # Errors
    ///
    /// Returns `CoreError::SessionClosed` if the actor has stopped.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| CoreError::SessionClosed)?;
        rx.await.map_err(|_| CoreError::SessionClosed)
    }

    /// Stop the actor and return the final state.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor task panicked.
    pub async fn shutdown(self) -> Result<SessionSnapshot> {
        // A closed channel means the actor is already on its way out.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task
            .await
            .map_err(|e| CoreError::Custom(format!("session task failed: {e}")))
    }
}

struct Actor<S> {
    id: Uuid,
    session: Session<S>,
    started: Instant,
    events: broadcast::Sender<StampedEvent>,
}

impl<S: TensionSink> Actor<S> {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) -> SessionSnapshot {
        loop {
            let deadline = self
                .session
                .next_deadline()
                .map(|ms| self.started + Duration::from_millis(ms));

            tokio::select! {
                cmd = rx.recv() => match cmd {
                    None | Some(Command::Shutdown) => break,
                    Some(Command::Act { action, reply }) => {
                        let now = self.elapsed_ms();
                        let result = self.session.apply(action, now);
                        if let Ok(events) = &result {
                            self.publish(events);
                        }
                        let _ = reply.send(result);
                    }
                    Some(Command::Snapshot { reply }) => {
                        let now = self.elapsed_ms();
                        let events = self.session.advance_to(now);
                        self.publish(&events);
                        let _ = reply.send(self.session.snapshot());
                    }
                },
                () = wait_until(deadline) => {
                    let now = self.elapsed_ms();
                    let events = self.session.advance_to(now);
                    self.publish(&events);
                }
            }
        }
        debug!(outcome = ?self.session.outcome(), "session actor stopped");
        self.session.snapshot()
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn publish(&self, events: &[Event]) {
        let wall = Utc::now();
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(StampedEvent {
                session_id: self.id,
                wall,
                event: event.clone(),
            });
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
