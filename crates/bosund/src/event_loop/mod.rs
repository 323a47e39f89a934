//! Single-threaded cooperative event loop.
//!
//! The loop drains a FIFO task queue on the thread that calls
//! [`EventLoop::run`] until a stop request arrives. Plugin callbacks run as
//! ordinary queued tasks and may post further work, so tasks are popped one
//! at a time and the queue borrow is released before a task executes.
//!
//! Stop requests arrive through a [`StopHandle`], a `Send` handle over a
//! shared atomic flag. Signal handlers and [`EventLoop::quit`] both reduce to
//! the same request, so signal delivery is observed by the loop as ordinary
//! serialized control flow rather than racing handler code.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

type Task = Box<dyn FnOnce()>;

const IDLE_POLL: Duration = Duration::from_millis(10);

/// `Send` handle that requests the loop to stop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the loop to stop; idempotent.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once a stop has been requested.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }
}

/// Thread-local handle for posting work onto the loop.
///
/// The handle is deliberately not `Send`: all tasks execute on the loop
/// thread, and only code already on that thread may enqueue more.
#[derive(Clone)]
pub struct TaskHandle {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskHandle {
    /// Enqueues a task at the back of the queue.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }
}

/// The host's cooperative scheduler.
#[derive(Default)]
pub struct EventLoop {
    tasks: Rc<RefCell<VecDeque<Task>>>,
    stop: Arc<AtomicBool>,
}

impl EventLoop {
    /// Creates an idle loop with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for posting tasks from loop-thread code.
    #[must_use]
    pub fn handle(&self) -> TaskHandle {
        TaskHandle {
            tasks: Rc::clone(&self.tasks),
        }
    }

    /// Handle for requesting a stop, usable from any thread.
    #[must_use]
    pub fn stopper(&self) -> StopHandle {
        StopHandle {
            stop: Arc::clone(&self.stop),
        }
    }

    /// Enqueues a task directly.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.handle().post(task);
    }

    /// Requests a stop without going through a handle.
    pub fn quit(&self) {
        self.stopper().request_stop();
    }

    /// Runs the loop on the calling thread until a stop is requested.
    ///
    /// Tasks run strictly in FIFO order. The stop flag is checked between
    /// tasks, so a request made mid-task takes effect before the next task;
    /// tasks still queued when the loop stops are dropped unrun.
    pub fn run(&self) {
        loop {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task(),
                None => thread::sleep(IDLE_POLL),
            }
        }
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("queued", &self.tasks.borrow().len())
            .field("stop", &self.stop.load(Ordering::SeqCst))
            .finish()
    }
}
