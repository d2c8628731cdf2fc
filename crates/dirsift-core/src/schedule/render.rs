// crates/dirsift-core/src/schedule/render.rs
use super::EventLoop;
use crate::config::RenderSettings;
use crate::model::ItemId;
use crate::search::Results;
use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

/// A contiguous run of the result list, ready to mount.
#[derive(Debug, Clone)]
pub struct RenderBatch {
    results: Results,
    range: Range<usize>,
    stagger_ms: u32,
}

impl RenderBatch {
    /// Offset of the first item within the full result list.
    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn items(&self) -> &[ItemId] {
        &self.results[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Size of the whole result list this batch belongs to.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The first batch replaces whatever the presenter showed before.
    pub fn replaces_previous(&self) -> bool {
        self.range.start == 0
    }

    /// Cosmetic entrance delay for the batch. Has no effect on ordering.
    pub fn stagger_ms(&self) -> u32 {
        self.stagger_ms
    }
}

/// The presentation collaborator.
///
/// Implementations must not call back into the pipeline from these methods.
pub trait Presenter {
    fn mount(&mut self, batch: RenderBatch);

    /// Called once after the final batch of a delivery that was not superseded.
    fn announce(&mut self, count: usize);
}

struct Shared {
    event_loop: Rc<dyn EventLoop>,
    presenter: Rc<RefCell<dyn Presenter>>,
    settings: RenderSettings,
    generation: Cell<u64>,
}

/// Hands result lists to a [`Presenter`] a batch at a time.
///
/// The first batch goes out on the next frame; the rest follow one per idle
/// callback (or per `frame_ms` timeout when the host has no idle
/// scheduling). Every [`RenderScheduler::deliver`] stamps a new generation,
/// and a scheduled step whose stamp is no longer current drops itself, so an
/// older delivery can never interleave with a newer one.
#[derive(Clone)]
pub struct RenderScheduler {
    shared: Rc<Shared>,
}

impl RenderScheduler {
    pub fn new(
        event_loop: Rc<dyn EventLoop>,
        presenter: Rc<RefCell<dyn Presenter>>,
        settings: RenderSettings,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                event_loop,
                presenter,
                settings,
                generation: Cell::new(0),
            }),
        }
    }

    /// Starts delivering `results`, superseding any delivery in flight.
    ///
    /// Returns the generation stamped on this delivery.
    pub fn deliver(&self, results: Results) -> u64 {
        let generation = self.bump();
        log::debug!(
            "deliver #{generation}: {} items in batches of {}",
            results.len(),
            self.shared.settings.batch_size
        );

        let shared = Rc::clone(&self.shared);
        self.shared.event_loop.request_frame(Box::new(move || {
            Shared::step(&shared, results, 0, generation);
        }));
        generation
    }

    /// Invalidates the delivery in flight without starting a new one.
    pub fn cancel(&self) {
        self.bump();
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.get()
    }

    fn bump(&self) -> u64 {
        let next = self.shared.generation.get() + 1;
        self.shared.generation.set(next);
        next
    }
}

impl Shared {
    fn step(shared: &Rc<Shared>, results: Results, start: usize, generation: u64) {
        if shared.generation.get() != generation {
            log::trace!("dropping stale batch at {start} from delivery #{generation}");
            return;
        }

        let total = results.len();
        let end = (start + shared.settings.batch_size.max(1)).min(total);
        let batch = RenderBatch {
            results: Rc::clone(&results),
            range: start..end,
            stagger_ms: shared.stagger_for(start),
        };
        shared.presenter.borrow_mut().mount(batch);

        if end >= total {
            shared.presenter.borrow_mut().announce(total);
            return;
        }

        let next = Rc::clone(shared);
        let task = Box::new(move || Shared::step(&next, results, end, generation));
        let ev = &shared.event_loop;
        if ev.supports_idle() {
            ev.request_idle(shared.settings.idle_timeout_ms, task);
        } else {
            ev.set_timeout(shared.settings.frame_ms, task);
        }
    }

    fn stagger_for(&self, start: usize) -> u32 {
        let step = u64::from(self.settings.stagger_step_ms);
        let raw = (start as u64).saturating_mul(step);
        raw.min(u64::from(self.settings.max_stagger_ms)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::VirtualLoop;

    #[derive(Default)]
    struct Recorder {
        batches: Vec<(usize, Vec<ItemId>, u32)>,
        announced: Vec<usize>,
    }

    impl Presenter for Recorder {
        fn mount(&mut self, batch: RenderBatch) {
            self.batches
                .push((batch.start(), batch.items().to_vec(), batch.stagger_ms()));
        }

        fn announce(&mut self, count: usize) {
            self.announced.push(count);
        }
    }

    fn setup(ev: VirtualLoop) -> (Rc<RefCell<Recorder>>, RenderScheduler) {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let scheduler =
            RenderScheduler::new(Rc::new(ev), recorder.clone(), RenderSettings::default());
        (recorder, scheduler)
    }

    fn ids(n: u32) -> Results {
        (0..n).collect::<Vec<_>>().into()
    }

    #[test]
    fn first_batch_waits_for_a_frame() {
        let ev = VirtualLoop::new();
        let (rec, scheduler) = setup(ev.clone());
        scheduler.deliver(ids(5));
        assert!(rec.borrow().batches.is_empty());
        ev.run_frame();
        assert_eq!(rec.borrow().batches, vec![(0, vec![0, 1, 2, 3, 4], 0)]);
        assert_eq!(rec.borrow().announced, vec![5]);
    }

    #[test]
    fn later_batches_go_through_idle_callbacks() {
        let ev = VirtualLoop::new();
        let (rec, scheduler) = setup(ev.clone());
        scheduler.deliver(ids(45));
        ev.run_frame();
        assert_eq!(rec.borrow().batches.len(), 1);
        assert!(ev.run_idle());
        assert_eq!(rec.borrow().batches.len(), 2);
        assert!(rec.borrow().announced.is_empty());
        assert!(ev.run_idle());
        assert!(!ev.run_idle());
        assert_eq!(rec.borrow().announced, vec![45]);
    }

    #[test]
    fn falls_back_to_timeouts_without_idle() {
        let ev = VirtualLoop::without_idle();
        let (rec, scheduler) = setup(ev.clone());
        scheduler.deliver(ids(45));
        ev.run_frame();
        ev.advance(15);
        assert_eq!(rec.borrow().batches.len(), 1);
        ev.advance(1);
        assert_eq!(rec.borrow().batches.len(), 2);
        ev.advance(16);
        assert_eq!(rec.borrow().batches.len(), 3);
    }

    #[test]
    fn stagger_is_capped() {
        let ev = VirtualLoop::new();
        let (rec, scheduler) = setup(ev.clone());
        scheduler.deliver(ids(60));
        ev.run_until_stalled();
        let staggers: Vec<u32> = rec.borrow().batches.iter().map(|b| b.2).collect();
        assert_eq!(staggers, vec![0, 400, 500]);
    }

    #[test]
    fn empty_results_emit_one_empty_batch() {
        let ev = VirtualLoop::new();
        let (rec, scheduler) = setup(ev.clone());
        scheduler.deliver(ids(0));
        ev.run_until_stalled();
        assert_eq!(rec.borrow().batches, vec![(0, vec![], 0)]);
        assert_eq!(rec.borrow().announced, vec![0]);
    }

    #[test]
    fn cancel_silences_the_delivery_in_flight() {
        let ev = VirtualLoop::new();
        let (rec, scheduler) = setup(ev.clone());
        scheduler.deliver(ids(45));
        ev.run_frame();
        scheduler.cancel();
        ev.run_until_stalled();
        assert_eq!(rec.borrow().batches.len(), 1);
        assert!(rec.borrow().announced.is_empty());
    }
}
