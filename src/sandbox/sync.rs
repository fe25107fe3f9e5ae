use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// A cell that can be set exactly once and waited on by any number of
/// threads. Used for the per-instance termination signal, the proxy's
/// sandbox-client gate and child-exit bookkeeping.
pub struct WaitableCell<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    value: Mutex<Option<T>>,
    cvar: Condvar,
}

impl<T> Clone for WaitableCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for WaitableCell<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(None),
                cvar: Condvar::new(),
            }),
        }
    }
}

impl<T: Clone> WaitableCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value and wakes all waiters. Returns the value back if
    /// the cell was already set.
    pub fn set(&self, value: T) -> Result<(), T> {
        let mut slot = self.inner.value.lock().unwrap();
        if slot.is_some() {
            return Err(value);
        }
        *slot = Some(value);
        self.inner.cvar.notify_all();
        Ok(())
    }

    /// Non-blocking read.
    pub fn get(&self) -> Option<T> {
        self.inner.value.lock().unwrap().clone()
    }

    /// Blocks until the cell is set.
    pub fn wait(&self) -> T {
        let slot = self.inner.value.lock().unwrap();
        let slot = self
            .inner
            .cvar
            .wait_while(slot, |value| value.is_none())
            .unwrap();
        slot.clone().unwrap()
    }

    /// Blocks until the cell is set or the timeout elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        let slot = self.inner.value.lock().unwrap();
        let (slot, _) = self
            .inner
            .cvar
            .wait_timeout_while(slot, timeout, |value| value.is_none())
            .unwrap();
        slot.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread::{sleep, spawn};
    use std::time::Duration;

    use super::WaitableCell;

    #[test]
    fn basic() {
        let cell = WaitableCell::<i32>::new();
        cell.set(42).unwrap();
        assert_eq!(42, cell.wait());
        assert_eq!(Some(42), cell.get());
    }

    #[test]
    fn unset_get() {
        let cell = WaitableCell::<i32>::new();
        assert_eq!(None, cell.get());
        assert_eq!(None, cell.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn double_set() {
        let cell = WaitableCell::<i32>::new();
        assert_eq!(Ok(()), cell.set(42));
        assert_eq!(Err(24), cell.set(24));
        assert_eq!(42, cell.wait());
    }

    #[test]
    fn set_from_another_thread() {
        let cell = WaitableCell::<i32>::new();
        {
            let cell = cell.clone();
            spawn(move || {
                sleep(Duration::from_millis(1));
                let _ = cell.set(42);
            });
        }
        assert_eq!(42, cell.wait());
    }
}
