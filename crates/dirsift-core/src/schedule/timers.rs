// crates/dirsift-core/src/schedule/timers.rs
use super::{EventLoop, TaskId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Named one-shot timers with replace-on-set semantics.
///
/// At most one timer is pending per name. Setting a name that is already
/// pending cancels the old timer and starts the full delay again, which is
/// exactly a debounce. Clones share the same registry.
#[derive(Clone)]
pub struct TimerRegistry {
    event_loop: Rc<dyn EventLoop>,
    timers: Rc<RefCell<HashMap<String, Pending>>>,
    next_token: Rc<Cell<u64>>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    /// Distinguishes successive timers under one name.
    token: u64,
    task: TaskId,
}

impl TimerRegistry {
    pub fn new(event_loop: Rc<dyn EventLoop>) -> Self {
        Self {
            event_loop,
            timers: Rc::new(RefCell::new(HashMap::new())),
            next_token: Rc::new(Cell::new(0)),
        }
    }

    /// Cancels any timer named `name`, then runs `callback` after `delay_ms`.
    pub fn set<F>(&self, name: &str, callback: F, delay_ms: u32)
    where
        F: FnOnce() + 'static,
    {
        self.clear(name);

        let token = self.next_token.get() + 1;
        self.next_token.set(token);

        let timers = Rc::downgrade(&self.timers);
        let key = name.to_owned();
        let task = self.event_loop.set_timeout(
            delay_ms,
            Box::new(move || {
                // Deregister before running so the callback may re-arm its own name.
                if let Some(timers) = timers.upgrade() {
                    let mut timers = timers.borrow_mut();
                    if timers.get(&key).is_some_and(|p| p.token == token) {
                        timers.remove(&key);
                    }
                }
                callback();
            }),
        );

        self.timers
            .borrow_mut()
            .insert(name.to_owned(), Pending { token, task });
    }

    /// Cancels the pending timer for `name`; no-op when there is none.
    pub fn clear(&self, name: &str) {
        let pending = self.timers.borrow_mut().remove(name);
        if let Some(pending) = pending {
            self.event_loop.cancel(pending.task);
        }
    }

    /// Cancels every pending timer. Call on teardown.
    pub fn clear_all(&self) {
        let drained: Vec<Pending> = self.timers.borrow_mut().drain().map(|(_, p)| p).collect();
        for pending in drained {
            self.event_loop.cancel(pending.task);
        }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.timers.borrow().contains_key(name)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.borrow().len()
    }
}
