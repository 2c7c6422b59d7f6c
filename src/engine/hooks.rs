//! Hook runtime - per-element state, effects and event listeners.
//!
//! Hooks are plain functions called from [`StatefulWidget::build`]. While a
//! build runs, the engine binds a hook context for the element being built in
//! a thread-local slot; each hook call claims the next positional slot of
//! that element's [`HookStore`].
//!
//! # Architecture
//!
//! ```text
//! build() ──► use_state ──► slot 0 ─┐
//!         ──► use_ref   ──► slot 1 ─┼─ HookStore (Arc, shared with setters)
//!         ──► use_state ──► slot 2 ─┘
//!         ──► use_effect ─► effects collected, reconciled after build
//!         ──► use_event  ─► listeners replaced wholesale after build
//! ```
//!
//! Setters hold a `Weak` to the store, so they can be called from any thread
//! (listener tasks, timers, effect threads) and become no-ops once the element
//! is destroyed.
//!
//! # Ordering
//!
//! Slots are addressed by call order. A widget must call the same hooks in
//! the same order on every build; a slot whose stored type no longer matches
//! panics, and a changed number of effects fails the frame.
//!
//! [`StatefulWidget::build`]: super::widget::StatefulWidget::build

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crossterm::event::Event;
use tracing::trace;

use crate::error::{Error, Result};
use crate::layout::{Pos, Size};

// =============================================================================
// Types
// =============================================================================

/// Cleanup returned by an effect setup.
pub type Cleanup = Box<dyn FnOnce() + Send>;

/// Effect setup. Runs after the build that declared it.
pub type Setup = Box<dyn FnOnce() -> Option<Cleanup> + Send>;

/// Event listener registered with [`use_event`].
pub type Listener = Arc<dyn Fn(&EventContext) + Send + Sync>;

// =============================================================================
// HookStore
// =============================================================================

/// Positional hook slots of one element plus its dirty flag.
#[derive(Default)]
pub(crate) struct HookStore {
    slots: Mutex<Vec<Box<dyn Any + Send>>>,
    needs_build: AtomicBool,
}

impl HookStore {
    fn slots(&self) -> MutexGuard<'_, Vec<Box<dyn Any + Send>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn mark_needs_build(&self) {
        self.needs_build.store(true, Ordering::Release);
    }

    /// Read and clear the dirty flag.
    pub(crate) fn take_needs_build(&self) -> bool {
        self.needs_build.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots().len()
    }
}

impl fmt::Debug for HookStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookStore")
            .field("slots", &self.slot_count())
            .field("needs_build", &self.needs_build.load(Ordering::Acquire))
            .finish()
    }
}

// =============================================================================
// Build context
// =============================================================================

struct HookContext {
    store: Arc<HookStore>,
    next_slot: usize,
    effects: Vec<Effect>,
    listeners: Vec<Listener>,
}

thread_local! {
    static CURRENT: RefCell<Option<HookContext>> = const { RefCell::new(None) };
}

/// Unbinds the context even if `build` panics.
struct ContextGuard;

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT.with(|current| current.borrow_mut().take());
    }
}

/// What a build declared besides its child widget.
pub(crate) struct Declared {
    pub(crate) effects: Vec<Effect>,
    pub(crate) listeners: Vec<Listener>,
}

/// Run `build` with hooks bound to `store`.
pub(crate) fn with_hooks<R>(store: &Arc<HookStore>, build: impl FnOnce() -> R) -> (R, Declared) {
    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        assert!(current.is_none(), "nested widget builds on one thread");
        *current = Some(HookContext {
            store: Arc::clone(store),
            next_slot: 0,
            effects: Vec::new(),
            listeners: Vec::new(),
        });
    });

    let guard = ContextGuard;
    let output = build();

    let context = CURRENT.with(|current| current.borrow_mut().take());
    drop(guard);

    let declared = match context {
        Some(ctx) => Declared {
            effects: ctx.effects,
            listeners: ctx.listeners,
        },
        None => Declared {
            effects: Vec::new(),
            listeners: Vec::new(),
        },
    };
    (output, declared)
}

fn with_context<R>(hook: &str, f: impl FnOnce(&mut HookContext) -> R) -> R {
    CURRENT.with(|current| match current.borrow_mut().as_mut() {
        Some(ctx) => f(ctx),
        None => panic!("{hook} called outside of a widget build"),
    })
}

/// Claim the next slot, initializing it with `init` on first use, and return
/// a clone of the stored value.
fn claim_slot<T: Clone + Send + 'static>(hook: &str, init: impl FnOnce() -> T) -> (T, Arc<HookStore>, usize) {
    let (store, index) = with_context(hook, |ctx| {
        let index = ctx.next_slot;
        ctx.next_slot += 1;
        (Arc::clone(&ctx.store), index)
    });

    let mut slots = store.slots();
    if index >= slots.len() {
        // init may itself be user code; never run it under the lock
        drop(slots);
        let value = init();
        slots = store.slots();
        assert_eq!(index, slots.len(), "{hook}: hook slots claimed out of order");
        slots.push(Box::new(value));
    }

    let value = match slots[index].downcast_ref::<T>() {
        Some(value) => value.clone(),
        None => panic!(
            "{hook}: slot {index} holds a different type than {}; hooks must be called in the same order on every build",
            std::any::type_name::<T>()
        ),
    };
    drop(slots);
    (value, store, index)
}

// =============================================================================
// State hooks
// =============================================================================

/// Handle that replaces a state slot and schedules a rebuild.
///
/// Cheap to clone and safe to call from any thread. Calls after the owning
/// element was destroyed do nothing.
pub struct StateSetter<T> {
    store: Weak<HookStore>,
    index: usize,
    unchanged: Option<fn(&T, &T) -> bool>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Clone + Send + 'static> StateSetter<T> {
    /// Store `value`.
    pub fn set(&self, value: T) {
        self.update(|_| value);
    }

    /// Compute the next value from the current one.
    ///
    /// `next` runs without the slot lock held, so it may call other setters
    /// of the same element.
    pub fn update(&self, next: impl FnOnce(&T) -> T) {
        let Some(store) = self.store.upgrade() else {
            trace!(slot = self.index, "state set on destroyed element ignored");
            return;
        };

        let Some(current) = self.read(&store) else {
            return;
        };
        let value = next(&current);
        if self.unchanged.is_some_and(|eq| eq(&current, &value)) {
            return;
        }

        {
            let mut slots = store.slots();
            let Some(slot) = slots.get_mut(self.index).and_then(|slot| slot.downcast_mut::<T>()) else {
                return;
            };
            *slot = value;
        }
        store.mark_needs_build();
    }

    fn read(&self, store: &HookStore) -> Option<T> {
        store
            .slots()
            .get(self.index)
            .and_then(|slot| slot.downcast_ref::<T>())
            .cloned()
    }
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            index: self.index,
            unchanged: self.unchanged,
            _marker: PhantomData,
        }
    }
}

/// Setters for the same slot compare equal, so widgets can carry them.
impl<T> PartialEq for StateSetter<T> {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.store, &other.store) && self.index == other.index
    }
}

impl<T> fmt::Debug for StateSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSetter").field("slot", &self.index).finish()
    }
}

/// Component state with an initial value.
///
/// Setting a value equal to the current one does not schedule a rebuild.
pub fn use_state<T>(initial: T) -> (T, StateSetter<T>)
where
    T: Clone + PartialEq + Send + 'static,
{
    use_state_with(move || initial)
}

/// Like [`use_state`], with a lazily computed initial value.
pub fn use_state_with<T>(init: impl FnOnce() -> T) -> (T, StateSetter<T>)
where
    T: Clone + PartialEq + Send + 'static,
{
    let (value, store, index) = claim_slot("use_state", init);
    let unchanged: fn(&T, &T) -> bool = |a, b| a == b;
    let setter = StateSetter {
        store: Arc::downgrade(&store),
        index,
        unchanged: Some(unchanged),
        _marker: PhantomData,
    };
    (value, setter)
}

/// State for values without equality. Every set schedules a rebuild.
pub fn use_raw_state<T>(initial: T) -> (T, StateSetter<T>)
where
    T: Clone + Send + 'static,
{
    let (value, store, index) = claim_slot("use_raw_state", move || initial);
    let setter = StateSetter {
        store: Arc::downgrade(&store),
        index,
        unchanged: None,
        _marker: PhantomData,
    };
    (value, setter)
}

/// Mutable cell that persists across builds without triggering them.
pub fn use_ref<T>(init: impl FnOnce() -> T) -> Arc<Mutex<T>>
where
    T: Send + 'static,
{
    let (cell, _, _) = claim_slot("use_ref", move || Arc::new(Mutex::new(init())));
    cell
}

/// Handle that forces the element to rebuild.
#[derive(Clone)]
pub struct RenderTrigger {
    store: Weak<HookStore>,
}

impl RenderTrigger {
    pub fn trigger(&self) {
        if let Some(store) = self.store.upgrade() {
            store.mark_needs_build();
        }
    }
}

impl PartialEq for RenderTrigger {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.store, &other.store)
    }
}

impl fmt::Debug for RenderTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderTrigger")
    }
}

/// Returns a [`RenderTrigger`] for the element being built. Uses no slot.
pub fn use_trigger_render() -> RenderTrigger {
    with_context("use_trigger_render", |ctx| RenderTrigger {
        store: Arc::downgrade(&ctx.store),
    })
}

// =============================================================================
// Dependencies
// =============================================================================

/// A value an effect depends on.
pub trait Dependency: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn dep_eq(&self, other: &dyn Dependency) -> bool;
}

impl<T> Dependency for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dep_eq(&self, other: &dyn Dependency) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// Ordered dependency list of an effect. Build with [`deps!`](crate::deps).
///
/// Two lists are equal when they have the same length and each pair of
/// entries has the same type and value. An empty list never changes, so its
/// effect runs once.
#[derive(Debug, Default)]
pub struct Deps(Vec<Box<dyn Dependency>>);

impl Deps {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, dep: impl Dependency) -> Self {
        self.0.push(Box::new(dep));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Deps {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.dep_eq(b.as_ref()))
    }
}

/// Build a [`Deps`] list: `deps![]`, `deps![self.id, label.clone()]`.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::none()
    };
    ($($dep:expr),+ $(,)?) => {
        $crate::Deps::none()$(.with($dep))+
    };
}

// =============================================================================
// Effects
// =============================================================================

/// One declared effect and, once run, its cleanup.
pub(crate) struct Effect {
    setup: Option<Setup>,
    cleanup: Option<Cleanup>,
    deps: Deps,
}

impl Effect {
    fn run_setup(&mut self) {
        if let Some(setup) = self.setup.take() {
            self.cleanup = setup();
        }
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

/// Declare a side effect.
///
/// `setup` runs after the first build, and again after any later build whose
/// `deps` differ from the previous build's. Before re-running, the previous
/// cleanup runs. The last cleanup runs when the element is destroyed.
pub fn use_effect<F>(setup: F, deps: Deps)
where
    F: FnOnce() -> Option<Cleanup> + Send + 'static,
{
    with_context("use_effect", |ctx| {
        ctx.effects.push(Effect {
            setup: Some(Box::new(setup)),
            cleanup: None,
            deps,
        });
    });
}

/// Run `setup` once, after the first build.
pub fn use_setup(setup: impl FnOnce() + Send + 'static) {
    use_effect(
        move || {
            setup();
            None
        },
        Deps::none(),
    );
}

/// Run `cleanup` once, when the element is destroyed.
pub fn use_cleanup(cleanup: impl FnOnce() + Send + 'static) {
    use_effect(move || Some(Box::new(cleanup) as Cleanup), Deps::none());
}

/// Store a build's effects and run the setups that are due.
pub(crate) fn reconcile_effects(
    stored: &mut Vec<Effect>,
    declared: Vec<Effect>,
    first_build: bool,
    widget: &'static str,
) -> Result<()> {
    if first_build {
        *stored = declared;
        for effect in stored.iter_mut() {
            effect.run_setup();
        }
        return Ok(());
    }

    if stored.len() != declared.len() {
        return Err(Error::EffectCountMismatch {
            widget,
            previous: stored.len(),
            current: declared.len(),
        });
    }

    for (old, mut new) in stored.iter_mut().zip(declared) {
        if old.deps == new.deps {
            continue;
        }
        old.run_cleanup();
        new.run_setup();
        *old = new;
    }
    Ok(())
}

/// Run every pending cleanup, in declaration order.
pub(crate) fn run_cleanups(effects: &mut Vec<Effect>) {
    for mut effect in effects.drain(..) {
        effect.run_cleanup();
    }
}

// =============================================================================
// Events
// =============================================================================

/// What a listener receives.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub event: Event,
    /// Absolute position of the listening element.
    pub position: Pos,
    pub size: Size,
}

impl EventContext {
    /// Whether a terminal cell lies inside the listening element.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let (x, y) = (i64::from(column), i64::from(row));
        let (left, top) = (i64::from(self.position.x), i64::from(self.position.y));
        let right = left + i64::from(self.size.width.cells_or_max());
        let bottom = top + i64::from(self.size.height.cells_or_max());
        x >= left && x < right && y >= top && y < bottom
    }

    /// Mouse position relative to the element, if this is a mouse event.
    pub fn local_mouse(&self) -> Option<Pos> {
        match &self.event {
            Event::Mouse(mouse) => Some(Pos::new(
                i32::from(mouse.column) - self.position.x,
                i32::from(mouse.row) - self.position.y,
            )),
            _ => None,
        }
    }
}

/// Register an event listener for the element being built.
///
/// Listeners are replaced wholesale on every build and receive every event.
pub fn use_event(listener: impl Fn(&EventContext) + Send + Sync + 'static) {
    with_context("use_event", |ctx| ctx.listeners.push(Arc::new(listener)));
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
    use std::sync::atomic::AtomicUsize;

    fn build_with<R>(store: &Arc<HookStore>, f: impl FnOnce() -> R) -> (R, Declared) {
        with_hooks(store, f)
    }

    #[test]
    fn test_state_persists_across_builds() {
        let store = Arc::new(HookStore::default());
        let ((value, setter), _) = build_with(&store, || use_state(1));
        assert_eq!(value, 1);

        setter.set(5);
        assert!(store.take_needs_build());

        let ((value, _), _) = build_with(&store, || use_state(1));
        assert_eq!(value, 5);
    }

    #[test]
    fn test_equal_value_does_not_schedule() {
        let store = Arc::new(HookStore::default());
        let ((_, setter), _) = build_with(&store, || use_state(String::from("a")));
        setter.set(String::from("a"));
        assert!(!store.take_needs_build());
        setter.update(|s| format!("{s}b"));
        assert!(store.take_needs_build());
    }

    #[test]
    fn test_raw_state_always_schedules() {
        let store = Arc::new(HookStore::default());
        let ((_, setter), _) = build_with(&store, || use_raw_state(3));
        setter.set(3);
        assert!(store.take_needs_build());
    }

    #[test]
    fn test_setter_after_drop_is_noop() {
        let store = Arc::new(HookStore::default());
        let ((_, setter), _) = build_with(&store, || use_state(0));
        drop(store);
        setter.set(9);
    }

    #[test]
    fn test_setter_from_other_thread() {
        let store = Arc::new(HookStore::default());
        let ((_, setter), _) = build_with(&store, || use_state(0u64));
        std::thread::spawn(move || setter.set(7))
            .join()
            .expect("setter thread");
        assert!(store.take_needs_build());
        let ((value, _), _) = build_with(&store, || use_state(0u64));
        assert_eq!(value, 7);
    }

    #[test]
    fn test_update_may_set_sibling_state() {
        let store = Arc::new(HookStore::default());
        let (((_, set_a), (_, set_b)), _) = build_with(&store, || (use_state(1u32), use_state(0u32)));

        let worker = std::thread::spawn(move || {
            set_a.update(|a| {
                set_b.set(*a + 10);
                a + 1
            })
        });
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while !worker.is_finished() {
            assert!(std::time::Instant::now() < deadline, "nested update never returned");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        worker.join().expect("update thread");

        assert!(store.take_needs_build());
        let (((a, _), (b, _)), _) = build_with(&store, || (use_state(1u32), use_state(0u32)));
        assert_eq!((a, b), (2, 11));
    }

    #[test]
    fn test_ref_is_shared_and_silent() {
        let store = Arc::new(HookStore::default());
        let (cell, _) = build_with(&store, || use_ref(|| 0));
        *cell.lock().expect("ref lock") += 2;
        assert!(!store.take_needs_build());
        let (cell, _) = build_with(&store, || use_ref(|| 0));
        assert_eq!(*cell.lock().expect("ref lock"), 2);
    }

    #[test]
    fn test_trigger_render_uses_no_slot() {
        let store = Arc::new(HookStore::default());
        let (trigger, _) = build_with(&store, use_trigger_render);
        assert_eq!(store.slot_count(), 0);
        trigger.trigger();
        assert!(store.take_needs_build());
    }

    #[test]
    #[should_panic(expected = "outside of a widget build")]
    fn test_hook_outside_build_panics() {
        let _ = use_state(0);
    }

    #[test]
    #[should_panic(expected = "different type")]
    fn test_slot_type_mismatch_panics() {
        let store = Arc::new(HookStore::default());
        let _ = build_with(&store, || use_state(0i32));
        let _ = build_with(&store, || use_state("x"));
    }

    #[test]
    fn test_context_unbound_after_build() {
        let store = Arc::new(HookStore::default());
        let _ = build_with(&store, || use_state(0));
        assert!(CURRENT.with(|c| c.borrow().is_none()));
    }

    #[test]
    fn test_deps_equality() {
        assert_eq!(deps![], Deps::none());
        assert_eq!(deps![1, "a"], deps![1, "a"]);
        assert_ne!(deps![1], deps![2]);
        assert_ne!(deps![1], deps![1u8]);
        assert_ne!(deps![1], deps![1, 2]);
    }

    fn counting_effect(setups: &Arc<AtomicUsize>, cleanups: &Arc<AtomicUsize>, deps: Deps) -> Effect {
        let setups = Arc::clone(setups);
        let cleanups = Arc::clone(cleanups);
        Effect {
            setup: Some(Box::new(move || {
                setups.fetch_add(1, Ordering::SeqCst);
                Some(Box::new(move || {
                    cleanups.fetch_add(1, Ordering::SeqCst);
                }) as Cleanup)
            })),
            cleanup: None,
            deps,
        }
    }

    #[test]
    fn test_effect_reconcile() {
        let setups = Arc::new(AtomicUsize::new(0));
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut stored = Vec::new();

        reconcile_effects(&mut stored, vec![counting_effect(&setups, &cleanups, deps!["a"])], true, "W")
            .expect("first build");
        assert_eq!((setups.load(Ordering::SeqCst), cleanups.load(Ordering::SeqCst)), (1, 0));

        reconcile_effects(&mut stored, vec![counting_effect(&setups, &cleanups, deps!["a"])], false, "W")
            .expect("same deps");
        assert_eq!((setups.load(Ordering::SeqCst), cleanups.load(Ordering::SeqCst)), (1, 0));

        reconcile_effects(&mut stored, vec![counting_effect(&setups, &cleanups, deps!["b"])], false, "W")
            .expect("changed deps");
        assert_eq!((setups.load(Ordering::SeqCst), cleanups.load(Ordering::SeqCst)), (2, 1));

        run_cleanups(&mut stored);
        assert_eq!(cleanups.load(Ordering::SeqCst), 2);
        assert!(stored.is_empty());
    }

    #[test]
    fn test_effect_count_mismatch() {
        let setups = Arc::new(AtomicUsize::new(0));
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut stored = Vec::new();
        reconcile_effects(&mut stored, vec![counting_effect(&setups, &cleanups, deps![])], true, "W")
            .expect("first build");

        let err = reconcile_effects(&mut stored, Vec::new(), false, "W").unwrap_err();
        assert!(matches!(
            err,
            Error::EffectCountMismatch { previous: 1, current: 0, .. }
        ));
    }

    #[test]
    fn test_listeners_collected() {
        let store = Arc::new(HookStore::default());
        let (_, declared) = build_with(&store, || {
            use_event(|_| {});
            use_event(|_| {});
            use_setup(|| {});
        });
        assert_eq!(declared.listeners.len(), 2);
        assert_eq!(declared.effects.len(), 1);
    }

    #[test]
    fn test_event_context_contains() {
        let ctx = EventContext {
            event: Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            position: Pos::new(2, 1),
            size: Size::new(3, 2),
        };
        assert!(ctx.contains(2, 1));
        assert!(ctx.contains(4, 2));
        assert!(!ctx.contains(5, 1));
        assert!(!ctx.contains(2, 3));
        assert_eq!(ctx.local_mouse(), None);

        let mouse = EventContext {
            event: Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column: 4,
                row: 2,
                modifiers: KeyModifiers::NONE,
            }),
            ..ctx
        };
        assert_eq!(mouse.local_mouse(), Some(Pos::new(2, 1)));
    }
}
