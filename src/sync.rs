use std::sync::{Condvar as StdCondvar, Mutex as StdMutex, MutexGuard, PoisonError};

/// Non-poisoning mutex.
pub(crate) struct Mutex<T: ?Sized> {
    std: StdMutex<T>,
}

impl<T> Mutex<T> {
    pub(crate) fn new(value: T) -> Self {
        Mutex {
            std: StdMutex::new(value),
        }
    }

    pub(crate) fn into_inner(self) -> T {
        self.std.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ?Sized> Mutex<T> {
    pub(crate) fn lock(&self) -> MutexGuard<T> {
        self.std.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Condition variable paired with the non-poisoning mutex above.
pub(crate) struct Condvar {
    std: StdCondvar,
}

impl Condvar {
    pub(crate) fn new() -> Self {
        Condvar {
            std: StdCondvar::new(),
        }
    }

    pub(crate) fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        self.std.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn notify_all(&self) {
        self.std.notify_all();
    }
}
