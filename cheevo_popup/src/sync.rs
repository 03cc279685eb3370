//! Lock used around the popup state.
//!
//! Threaded video hosts share the widget between the unlock producer and the
//! render thread and get a real mutex. Single-threaded hosts get a `RefCell`,
//! which costs a borrow flag and nothing else.

use std::cell::{RefCell, RefMut};
use std::ops::DerefMut;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub trait StateLock<T> {
    type Guard<'a>: DerefMut<Target = T>
    where
        Self: 'a;

    fn wrap(value: T) -> Self;

    fn acquire(&self) -> Self::Guard<'_>;
}

impl<T> StateLock<T> for Mutex<T> {
    type Guard<'a>
        = MutexGuard<'a, T>
    where
        Self: 'a;

    fn wrap(value: T) -> Self {
        Mutex::new(value)
    }

    fn acquire(&self) -> Self::Guard<'_> {
        // Popup state holds no invariants a panic can break mid-update.
        self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> StateLock<T> for RefCell<T> {
    type Guard<'a>
        = RefMut<'a, T>
    where
        Self: 'a;

    fn wrap(value: T) -> Self {
        RefCell::new(value)
    }

    fn acquire(&self) -> Self::Guard<'_> {
        self.borrow_mut()
    }
}
