//! Async tracker runtime
//!
//! Runs a [`Cursometer`] on a single tokio task that owns it exclusively.
//! Host notifications, queries and fired timers all arrive through one
//! queue and are handled one at a time, so no locking is needed around the
//! tracker. Speed callbacks run on that task and must not block.

pub mod scheduler;

use crate::capture::types::{ElementId, Point, Sample};
use crate::commands::{CommandOutput, Invocation};
use crate::error::{TrackerError, TrackerResult};
use crate::host::{Clock, TimerEvent, TimerHandle};
use crate::tracker::config::TrackerOptions;
use crate::tracker::Cursometer;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub use scheduler::{TokioClock, TokioScheduler};

pub(crate) enum Request {
    Init {
        elements: Vec<ElementId>,
        options: TrackerOptions,
        reply: oneshot::Sender<Vec<ElementId>>,
    },
    Dispatch {
        elements: Vec<ElementId>,
        invocation: Invocation,
        reply: oneshot::Sender<TrackerResult<CommandOutput>>,
    },
    CurrentSpeed {
        element: ElementId,
        reply: oneshot::Sender<TrackerResult<f64>>,
    },
    Enter {
        element: ElementId,
        reply: oneshot::Sender<TrackerResult<()>>,
    },
    Leave {
        element: ElementId,
        reply: oneshot::Sender<TrackerResult<()>>,
    },
    Move {
        element: ElementId,
        point: Point,
        reply: oneshot::Sender<TrackerResult<Option<Sample>>>,
    },
    Teardown {
        element: ElementId,
        reply: oneshot::Sender<TrackerResult<()>>,
    },
    TimerFired {
        handle: TimerHandle,
        event: TimerEvent,
    },
    Shutdown,
}

/// Cloneable front-end to a running tracker
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    requests: mpsc::UnboundedSender<Request>,
}

impl TrackerHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> TrackerResult<T> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(build(reply))
            .map_err(|_| TrackerError::RuntimeClosed)?;
        response.await.map_err(|_| TrackerError::RuntimeClosed)
    }

    pub async fn init(&self, elements: Vec<ElementId>, options: TrackerOptions) -> TrackerResult<Vec<ElementId>> {
        self.request(|reply| Request::Init {
            elements,
            options,
            reply,
        })
        .await
    }

    pub async fn dispatch(&self, elements: Vec<ElementId>, invocation: Invocation) -> TrackerResult<CommandOutput> {
        self.request(|reply| Request::Dispatch {
            elements,
            invocation,
            reply,
        })
        .await?
    }

    pub async fn current_speed(&self, element: ElementId) -> TrackerResult<f64> {
        self.request(|reply| Request::CurrentSpeed { element, reply })
            .await?
    }

    pub async fn pointer_enter(&self, element: ElementId) -> TrackerResult<()> {
        self.request(|reply| Request::Enter { element, reply }).await?
    }

    pub async fn pointer_leave(&self, element: ElementId) -> TrackerResult<()> {
        self.request(|reply| Request::Leave { element, reply }).await?
    }

    pub async fn pointer_move(&self, element: ElementId, point: Point) -> TrackerResult<Option<Sample>> {
        self.request(|reply| Request::Move {
            element,
            point,
            reply,
        })
        .await?
    }

    pub async fn teardown(&self, element: ElementId) -> TrackerResult<()> {
        self.request(|reply| Request::Teardown { element, reply })
            .await?
    }

    /// Ask the runtime to stop. Pending timers are aborted.
    pub fn shutdown(&self) -> TrackerResult<()> {
        self.requests
            .send(Request::Shutdown)
            .map_err(|_| TrackerError::RuntimeClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

/// A spawned tracker task and its handle
#[derive(Debug)]
pub struct TrackerRuntime {
    handle: TrackerHandle,
    task: JoinHandle<()>,
}

impl TrackerRuntime {
    /// Spawn a tracker on the current tokio runtime using [`TokioClock`]
    pub fn spawn() -> Self {
        Self::spawn_with_clock(TokioClock::new())
    }

    pub fn spawn_with_clock<C>(clock: C) -> Self
    where
        C: Clock + Send + 'static,
    {
        let (requests, queue) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(requests.downgrade());
        let cursometer = Cursometer::new(scheduler, clock);

        let task = tokio::spawn(run(cursometer, queue));
        tracing::info!("Tracker runtime started");

        Self {
            handle: TrackerHandle { requests },
            task,
        }
    }

    pub fn handle(&self) -> TrackerHandle {
        self.handle.clone()
    }

    /// Stop the runtime and wait for its task to finish
    pub async fn shutdown(self) -> TrackerResult<()> {
        // Already closed is fine; the task is awaited either way.
        let _ = self.handle.shutdown();
        self.task.await.map_err(|_| TrackerError::RuntimeClosed)
    }
}

async fn run<C: Clock>(
    mut cursometer: Cursometer<TokioScheduler, C>,
    mut queue: mpsc::UnboundedReceiver<Request>,
) {
    while let Some(request) = queue.recv().await {
        match request {
            Request::Init {
                elements,
                options,
                reply,
            } => {
                let _ = reply.send(cursometer.initialize(&elements, &options));
            }
            Request::Dispatch {
                elements,
                invocation,
                reply,
            } => {
                let _ = reply.send(cursometer.dispatch(&elements, invocation));
            }
            Request::CurrentSpeed { element, reply } => {
                let _ = reply.send(cursometer.get_current_speed(element));
            }
            Request::Enter { element, reply } => {
                let _ = reply.send(cursometer.pointer_enter(element));
            }
            Request::Leave { element, reply } => {
                let _ = reply.send(cursometer.pointer_leave(element));
            }
            Request::Move {
                element,
                point,
                reply,
            } => {
                let _ = reply.send(cursometer.pointer_move(element, point));
            }
            Request::Teardown { element, reply } => {
                let _ = reply.send(cursometer.teardown(element));
            }
            Request::TimerFired { handle, event } => {
                cursometer.scheduler_mut().complete(handle);
                cursometer.on_timer(event);
            }
            Request::Shutdown => break,
        }
    }

    cursometer.teardown_all();
    cursometer.scheduler_mut().abort_all();
    tracing::info!("Tracker runtime stopped");
}
