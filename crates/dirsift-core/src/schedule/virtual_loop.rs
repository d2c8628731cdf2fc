// crates/dirsift-core/src/schedule/virtual_loop.rs
use super::{EventLoop, Task, TaskId};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// Deterministic, single-threaded [`EventLoop`] driven by hand.
///
/// Time only moves when [`VirtualLoop::advance`] or
/// [`VirtualLoop::run_until_stalled`] is called, which makes debounce and
/// batching behaviour reproducible in tests and lets the CLI drain the
/// pipeline without sleeping.
///
/// ```rust
/// use dirsift_core::schedule::{EventLoop, VirtualLoop};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let ev = VirtualLoop::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// ev.set_timeout(100, Box::new(move || flag.set(true)));
///
/// ev.advance(99);
/// assert!(!fired.get());
/// ev.advance(1);
/// assert!(fired.get());
/// ```
#[derive(Clone, Default)]
pub struct VirtualLoop {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    now_ms: u64,
    next_id: u64,
    /// Keyed by (due time, id): ties fire in scheduling order.
    timers: BTreeMap<(u64, u64), Task>,
    frames: VecDeque<(u64, Task)>,
    idle: VecDeque<(u64, Task)>,
    idle_unsupported: bool,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl VirtualLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loop that reports no idle scheduling, forcing timeout fallbacks.
    pub fn without_idle() -> Self {
        let ev = Self::default();
        ev.inner.borrow_mut().idle_unsupported = true;
        ev
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of tasks waiting in any queue.
    pub fn pending(&self) -> usize {
        let inner = self.inner.borrow();
        inner.timers.len() + inner.frames.len() + inner.idle.len()
    }

    /// Moves the clock forward by `ms`, firing every timer that comes due.
    ///
    /// Timers scheduled by a firing task also fire if they fall inside the
    /// window. Frame and idle queues are left alone.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms() + ms;
        let mut ran = 0;
        while let Some(task) = self.pop_timer_due_by(target) {
            task();
            ran += 1;
        }
        self.inner.borrow_mut().now_ms = target;
        ran
    }

    /// Runs the frame callbacks queued before this frame started.
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.inner.borrow_mut().frames);
        let ran = frames.len();
        for (_, task) in frames {
            task();
        }
        ran
    }

    /// Runs the oldest idle callback, if any.
    pub fn run_idle(&self) -> bool {
        let task = self.inner.borrow_mut().idle.pop_front();
        match task {
            Some((_, task)) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Drains every queue: frames first, then one idle callback, then the
    /// clock jumps to the next timer. Returns the number of tasks run.
    ///
    /// A task that unconditionally reschedules itself keeps this running forever.
    pub fn run_until_stalled(&self) -> usize {
        let mut ran = 0;
        loop {
            let frames = self.run_frame();
            if frames > 0 {
                ran += frames;
                continue;
            }
            if self.run_idle() {
                ran += 1;
                continue;
            }
            let next_due = self.inner.borrow().timers.keys().next().map(|&(due, _)| due);
            match next_due {
                Some(due) => ran += self.advance(due.saturating_sub(self.now_ms())),
                None => break,
            }
        }
        ran
    }

    fn pop_timer_due_by(&self, target: u64) -> Option<Task> {
        let mut inner = self.inner.borrow_mut();
        let key = *inner.timers.keys().next()?;
        if key.0 > target {
            return None;
        }
        inner.now_ms = inner.now_ms.max(key.0);
        inner.timers.remove(&key)
    }
}

impl EventLoop for VirtualLoop {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        let due = inner.now_ms + u64::from(delay_ms);
        inner.timers.insert((due, id), task);
        TaskId(id)
    }

    fn request_frame(&self, task: Task) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.frames.push_back((id, task));
        TaskId(id)
    }

    fn request_idle(&self, _timeout_ms: u32, task: Task) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.idle.push_back((id, task));
        TaskId(id)
    }

    fn supports_idle(&self) -> bool {
        !self.inner.borrow().idle_unsupported
    }

    fn cancel(&self, id: TaskId) {
        let mut inner = self.inner.borrow_mut();
        inner.timers.retain(|&(_, tid), _| tid != id.0);
        inner.frames.retain(|(tid, _)| *tid != id.0);
        inner.idle.retain(|(tid, _)| *tid != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |label: &'static str| -> Task {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(label))
        };
        (log, make)
    }

    #[test]
    fn timers_fire_in_due_then_schedule_order() {
        let ev = VirtualLoop::new();
        let (log, task) = recorder();
        ev.set_timeout(20, task("b"));
        ev.set_timeout(10, task("a"));
        ev.set_timeout(20, task("c"));
        assert_eq!(ev.advance(25), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(ev.now_ms(), 25);
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let ev = VirtualLoop::new();
        let (log, task) = recorder();
        let t = ev.set_timeout(5, task("timer"));
        let f = ev.request_frame(task("frame"));
        let i = ev.request_idle(100, task("idle"));
        ev.cancel(t);
        ev.cancel(f);
        ev.cancel(i);
        assert_eq!(ev.run_until_stalled(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn frame_callbacks_queued_during_a_frame_wait() {
        let ev = VirtualLoop::new();
        let (log, task) = recorder();
        let inner_ev = ev.clone();
        let later = task("second");
        ev.request_frame(Box::new(move || {
            inner_ev.request_frame(later);
        }));
        ev.request_frame(task("first"));
        assert_eq!(ev.run_frame(), 2);
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(ev.run_frame(), 1);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn run_until_stalled_jumps_the_clock() {
        let ev = VirtualLoop::without_idle();
        assert!(!ev.supports_idle());
        let (log, task) = recorder();
        ev.set_timeout(500, task("late"));
        ev.request_frame(task("frame"));
        assert_eq!(ev.run_until_stalled(), 2);
        assert_eq!(*log.borrow(), vec!["frame", "late"]);
        assert_eq!(ev.now_ms(), 500);
        assert_eq!(ev.pending(), 0);
    }
}
