//! Single-slot interrupt notification.
//!
//! At most one callback is registered per slot; registering a new one
//! discards the previous registration. `fire` runs on the interrupt
//! execution context, so callbacks must not block indefinitely.

use alloc::boxed::Box;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

type Callback = Box<dyn FnMut() + Send>;

struct SlotState {
    callback: Option<Callback>,
    /// Bumped by `register` and `clear`; lets `fire` detect a slot
    /// mutation that happened while the callback was out being invoked.
    generation: u32,
}

/// One-subscriber callback slot.
pub struct InterruptSlot {
    slot: Mutex<CriticalSectionRawMutex, RefCell<SlotState>>,
}

impl InterruptSlot {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(SlotState {
                callback: None,
                generation: 0,
            })),
        }
    }

    /// Store a callback, replacing any previous registration.
    pub fn register(&self, callback: impl FnMut() + Send + 'static) {
        self.slot.lock(|slot| {
            let mut state = slot.borrow_mut();
            state.callback = Some(Box::new(callback));
            state.generation = state.generation.wrapping_add(1);
        });
    }

    /// Drop the current registration, if any.
    pub fn clear(&self) {
        self.slot.lock(|slot| {
            let mut state = slot.borrow_mut();
            state.callback = None;
            state.generation = state.generation.wrapping_add(1);
        });
    }

    pub fn is_registered(&self) -> bool {
        self.slot.lock(|slot| slot.borrow().callback.is_some())
    }

    /// Invoke the registered callback synchronously.
    ///
    /// The callback is taken out of the slot for the duration of the call
    /// and restored only if neither `register` nor `clear` ran meanwhile:
    /// a replace-while-firing resolves in favor of the newest registration,
    /// and a callback that clears its own slot stays cleared.
    pub fn fire(&self) {
        let taken = self.slot.lock(|slot| {
            let mut state = slot.borrow_mut();
            let generation = state.generation;
            state.callback.take().map(|callback| (callback, generation))
        });

        let Some((mut callback, generation)) = taken else {
            log::trace!("interrupt fired with no registered callback");
            return;
        };

        callback();

        self.slot.lock(|slot| {
            let mut state = slot.borrow_mut();
            if state.generation == generation {
                state.callback = Some(callback);
            }
        });
    }
}

impl Default for InterruptSlot {
    fn default() -> Self {
        Self::new()
    }
}
