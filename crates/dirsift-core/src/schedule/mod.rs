// crates/dirsift-core/src/schedule/mod.rs

//! # Scheduling
//!
//! The cooperative half of the pipeline. Nothing here spawns threads: work is
//! split into tasks that a host [`EventLoop`] runs one at a time, so shared
//! state is `Rc` + `RefCell`/`Cell` and no type in this module is `Send`.
//!
//! - [`EventLoop`] is the seam to the host (browser window, test clock, CLI).
//! - [`VirtualLoop`] is a deterministic host with a manual clock.
//! - [`TimerRegistry`] gives named, replace-on-set timers (debounce).
//! - [`RenderScheduler`] hands results to a [`Presenter`] in batches.

pub mod render;
pub mod timers;
pub mod virtual_loop;

pub use render::{Presenter, RenderBatch, RenderScheduler};
pub use timers::TimerRegistry;
pub use virtual_loop::VirtualLoop;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Handle for a scheduled task, unique per event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Host scheduling primitives.
///
/// Methods take `&self` because tasks routinely schedule follow-up work
/// while the loop is running them; implementations use interior mutability
/// and must not hold a borrow while a task runs.
pub trait EventLoop {
    /// Runs `task` after at least `delay_ms` milliseconds.
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TaskId;

    /// Runs `task` at the next paint opportunity.
    fn request_frame(&self, task: Task) -> TaskId;

    /// Runs `task` when the host is idle, or after `timeout_ms` at the latest.
    ///
    /// Only meaningful when [`EventLoop::supports_idle`] is true; callers fall
    /// back to [`EventLoop::set_timeout`] otherwise.
    fn request_idle(&self, timeout_ms: u32, task: Task) -> TaskId;

    fn supports_idle(&self) -> bool {
        true
    }

    /// Drops a pending task. Unknown or already-run IDs are ignored.
    fn cancel(&self, id: TaskId);
}
