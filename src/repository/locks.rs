//! In-process mutual exclusion for snapshot read-modify-write cycles.
//!
//! Writers of the global document (accounts, categories) hold the global
//! lock exclusively. Writers of a user document hold it shared plus that
//! owner's mutex. A category cascade thus never interleaves with any
//! user-document mutation, while different owners proceed in parallel.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::domain::types::Username;

#[derive(Debug, Default)]
pub struct ScopeLocks {
    global: RwLock<()>,
    owners: Mutex<HashMap<Username, Arc<Mutex<()>>>>,
}

impl ScopeLocks {
    /// Exclusive access to every document.
    pub fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.global.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shared access to the global document. Required before taking an owner lock.
    pub fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.global.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The mutex guarding `owner`'s document.
    pub fn owner(&self, owner: &Username) -> Arc<Mutex<()>> {
        let mut owners = self.owners.lock().unwrap_or_else(PoisonError::into_inner);
        owners.entry(owner.clone()).or_default().clone()
    }

    /// Runs `f` while holding the shared global lock and `owner`'s mutex.
    pub fn with_owner<T>(&self, owner: &Username, f: impl FnOnce() -> T) -> T {
        let _shared = self.shared();
        let lock = self.owner(owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn owner_locks_are_shared_per_user() {
        let locks = ScopeLocks::default();
        let ann = Username::new("ann").unwrap();
        let bob = Username::new("bob").unwrap();

        assert!(Arc::ptr_eq(&locks.owner(&ann), &locks.owner(&ann)));
        assert!(!Arc::ptr_eq(&locks.owner(&ann), &locks.owner(&bob)));
    }

    #[test]
    fn owner_sections_do_not_overlap() {
        let locks = Arc::new(ScopeLocks::default());
        let inside = Arc::new(AtomicUsize::new(0));
        let owner = Username::new("ann").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let owner = owner.clone();
                thread::spawn(move || {
                    locks.with_owner(&owner, || {
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
