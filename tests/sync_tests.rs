use std::sync::Arc;
use std::thread;
use std::time::Duration;

use toolbox::internal::sync::{FlagLock, LockCompatible, ToolkitLock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release() {
        let lock = LockCompatible::new(FlagLock::new());

        assert!(!lock.locked());
        lock.acquire();
        assert!(lock.locked());
        lock.release();
        assert!(!lock.locked());
    }

    #[test]
    fn test_locked_query_never_leaves_lock_held() {
        let lock = LockCompatible::new(FlagLock::new());

        for _ in 0..3 {
            assert!(!lock.locked());
        }
        assert!(lock.inner().try_lock());
        lock.inner().unlock();
    }

    #[test]
    fn test_scoped_releases_on_exit() {
        let lock = LockCompatible::new(FlagLock::new());
        {
            let _guard = lock.scoped();
            assert!(lock.locked());
        }
        assert!(!lock.locked());
    }

    #[test]
    fn test_scoped_releases_on_panic() {
        let lock = LockCompatible::new(FlagLock::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = lock.scoped();
            panic!("inside the critical section");
        }));

        assert!(result.is_err());
        assert!(!lock.locked());
    }

    #[test]
    fn test_mutual_exclusion_across_threads() {
        let lock = Arc::new(LockCompatible::new(FlagLock::new()));
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let inside = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = lock.clone();
                let counter = counter.clone();
                let inside = inside.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        let _guard = lock.scoped();
                        assert!(!inside.swap(true, std::sync::atomic::Ordering::SeqCst));
                        thread::sleep(Duration::from_micros(10));
                        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                        inside.store(false, std::sync::atomic::Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 100);
        assert!(!lock.locked());
    }
}
