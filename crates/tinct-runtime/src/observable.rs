//! Observable Primitive
//!
//! A minimal dependency-tracked cell. Reading with an effect subscribes the
//! effect; writing a different value notifies every subscriber, either
//! immediately or through a [`Batch`] that runs each notified effect once
//! after the triggering operation completes.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). There is no
//! preemption between a batch collecting effects and running them, so no
//! locking is needed.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

static NEXT_EFFECT_ID: AtomicU64 = AtomicU64::new(1);

struct EffectInner {
    id: u64,
    run: RefCell<Box<dyn FnMut()>>,
    /// Unsubscribe callbacks registered by every observable read
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
}

/// A reactive subscriber
#[derive(Clone)]
pub struct Effect(Rc<EffectInner>);

impl Effect {
    pub fn new(run: impl FnMut() + 'static) -> Self {
        Self(Rc::new(EffectInner {
            id: NEXT_EFFECT_ID.fetch_add(1, Ordering::Relaxed),
            run: RefCell::new(Box::new(run)),
            cleanups: RefCell::new(Vec::new()),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Run the callback. A re-entrant run from inside the callback is skipped.
    pub fn run(&self) {
        match self.0.run.try_borrow_mut() {
            Ok(mut run) => run(),
            Err(_) => tracing::trace!("effect {} is already running", self.0.id),
        }
    }

    /// Drop every subscription. Later writes no longer reach this effect.
    pub fn cleanup(&self) {
        let cleanups = std::mem::take(&mut *self.0.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
    }

    fn on_cleanup(&self, cleanup: Box<dyn FnOnce()>) {
        self.0.cleanups.borrow_mut().push(cleanup);
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Effect").field(&self.0.id).finish()
    }
}

/// Transaction collecting notified effects.
///
/// Each effect runs at most once per flush, in the order it was first notified.
#[derive(Default)]
pub struct Batch {
    pending: RefCell<IndexMap<u64, Effect>>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` inside a fresh batch and flush it afterwards
    pub fn run<R>(f: impl FnOnce(&Batch) -> R) -> R {
        let batch = Batch::new();
        let result = f(&batch);
        batch.flush();
        result
    }

    /// Join `batch` when one is given, otherwise open and flush a new one
    pub fn within<R>(batch: Option<&Batch>, f: impl FnOnce(&Batch) -> R) -> R {
        match batch {
            Some(batch) => f(batch),
            None => Self::run(f),
        }
    }

    pub fn add(&self, effect: Effect) {
        self.pending.borrow_mut().entry(effect.id()).or_insert(effect);
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run every collected effect once
    pub fn flush(&self) {
        loop {
            let pending = std::mem::take(&mut *self.pending.borrow_mut());
            if pending.is_empty() {
                break;
            }
            for effect in pending.values() {
                effect.run();
            }
        }
    }
}

struct ObservableInner<T> {
    value: RefCell<T>,
    observers: RefCell<IndexMap<u64, Weak<EffectInner>>>,
    equals: fn(&T, &T) -> bool,
}

/// Dependency-tracked cell
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self::with_equality(value, |a, b| a == b)
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Cell whose writes are dropped when `equals(old, new)` holds
    pub fn with_equality(value: T, equals: fn(&T, &T) -> bool) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                observers: RefCell::new(IndexMap::new()),
                equals,
            }),
        }
    }

    /// Read the value, subscribing `effect` when one is given
    pub fn get(&self, effect: Option<&Effect>) -> T {
        if let Some(effect) = effect {
            self.subscribe(effect);
        }
        self.inner.value.borrow().clone()
    }

    /// Read with a borrowed view, without cloning
    pub fn with<R>(&self, effect: Option<&Effect>, read: impl FnOnce(&T) -> R) -> R {
        if let Some(effect) = effect {
            self.subscribe(effect);
        }
        read(&self.inner.value.borrow())
    }

    pub fn subscribe(&self, effect: &Effect) {
        let id = effect.id();
        let mut observers = self.inner.observers.borrow_mut();
        if observers.contains_key(&id) {
            return;
        }
        observers.insert(id, Rc::downgrade(&effect.0));
        drop(observers);

        let cell = Rc::downgrade(&self.inner);
        effect.on_cleanup(Box::new(move || {
            if let Some(cell) = cell.upgrade() {
                cell.observers.borrow_mut().shift_remove(&id);
            }
        }));
    }

    /// Write a value. Equal writes are ignored.
    pub fn set(&self, value: T, batch: Option<&Batch>) {
        {
            let mut current = self.inner.value.borrow_mut();
            if (self.inner.equals)(&current, &value) {
                return;
            }
            *current = value;
        }
        self.notify(batch);
    }

    fn notify(&self, batch: Option<&Batch>) {
        let effects: Vec<Effect> = {
            let mut observers = self.inner.observers.borrow_mut();
            observers.retain(|_, weak| weak.strong_count() > 0);
            observers.values().filter_map(Weak::upgrade).map(Effect).collect()
        };
        match batch {
            Some(batch) => effects.into_iter().for_each(|effect| batch.add(effect)),
            None => effects.iter().for_each(Effect::run),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().values().filter(|weak| weak.strong_count() > 0).count()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.inner.value.borrow())
            .field("observers", &self.inner.observers.borrow().len())
            .finish()
    }
}

/// Observables created lazily per key
pub struct ObservableFamily<K, T> {
    cells: RefCell<IndexMap<K, Observable<T>>>,
}

impl<K, T> Default for ObservableFamily<K, T> {
    fn default() -> Self {
        Self { cells: RefCell::new(IndexMap::new()) }
    }
}

impl<K, T> ObservableFamily<K, T>
where
    K: Hash + Eq + Clone,
    T: Clone + PartialEq + Default + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell for `key`, created with the default value on first use
    pub fn cell(&self, key: &K) -> Observable<T> {
        if let Some(cell) = self.cells.borrow().get(key) {
            return cell.clone();
        }
        let cell = Observable::new(T::default());
        self.cells.borrow_mut().insert(key.clone(), cell.clone());
        cell
    }

    pub fn get(&self, key: &K, effect: Option<&Effect>) -> T {
        self.cell(key).get(effect)
    }

    pub fn set(&self, key: &K, value: T, batch: Option<&Batch>) {
        self.cell(key).set(value, batch);
    }

    pub fn keys(&self) -> Vec<K> {
        self.cells.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }

    /// Drop cells that hold the default value and have no observers
    pub fn prune(&self) {
        self.cells
            .borrow_mut()
            .retain(|_, cell| {
                cell.observer_count() > 0 || cell.with(None, |value| *value != T::default())
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Effect, Rc<Cell<u32>>) {
        let runs = Rc::new(Cell::new(0));
        let seen = runs.clone();
        (Effect::new(move || seen.set(seen.get() + 1)), runs)
    }

    #[test]
    fn test_get_without_effect_does_not_subscribe() {
        let cell = Observable::new(1);
        assert_eq!(cell.get(None), 1);
        assert_eq!(cell.observer_count(), 0);
    }

    #[test]
    fn test_set_notifies_subscribers() {
        let cell = Observable::new(1);
        let (effect, runs) = counter();
        cell.get(Some(&effect));
        cell.set(2, None);
        assert_eq!(runs.get(), 1);
        assert_eq!(cell.get(None), 2);
    }

    #[test]
    fn test_equal_set_is_noop() {
        let cell = Observable::new("a".to_string());
        let (effect, runs) = counter();
        cell.get(Some(&effect));
        cell.set("a".to_string(), None);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_batch_runs_each_effect_once() {
        let width = Observable::new(1.0);
        let height = Observable::new(1.0);
        let (effect, runs) = counter();
        width.get(Some(&effect));
        height.get(Some(&effect));

        Batch::run(|batch| {
            width.set(2.0, Some(batch));
            height.set(2.0, Some(batch));
            assert_eq!(batch.len(), 1);
            assert_eq!(runs.get(), 0);
        });
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_cleanup_unsubscribes() {
        let cell = Observable::new(0);
        let (effect, runs) = counter();
        cell.get(Some(&effect));
        cell.get(Some(&effect));
        assert_eq!(cell.observer_count(), 1);

        effect.cleanup();
        assert_eq!(cell.observer_count(), 0);
        cell.set(1, None);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_dropped_effect_is_not_run() {
        let cell = Observable::new(0);
        let (effect, runs) = counter();
        cell.get(Some(&effect));
        drop(effect);
        cell.set(1, None);
        assert_eq!(runs.get(), 0);
        assert_eq!(cell.observer_count(), 0);
    }

    #[test]
    fn test_custom_equality() {
        let cell = Observable::with_equality(1.0_f64, |a, b| (a - b).abs() < 0.5);
        let (effect, runs) = counter();
        cell.get(Some(&effect));
        cell.set(1.2, None);
        assert_eq!(runs.get(), 0);
        cell.set(2.0, None);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_family_prunes_unobserved_defaults() {
        let family: ObservableFamily<String, bool> = ObservableFamily::new();
        let (effect, _runs) = counter();
        family.get(&"watched".to_string(), Some(&effect));
        family.get(&"idle".to_string(), None);
        family.set(&"set".to_string(), true, None);
        assert_eq!(family.len(), 3);

        family.prune();
        assert_eq!(family.keys(), ["watched", "set"]);
    }
}
