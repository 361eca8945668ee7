//! View loading for screens embedding this library.
//!
//! A [`Loader`] holds the data, error and loading flag of one view (dashboard, loan list,
//! member rows) and wraps the service call that fills it. Starting a fetch supersedes the one
//! in flight, so a slow stale response never overwrites a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use crate::core::library::{LibraryError, LibraryResult};

// Snapshot of one view's data
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub error: Option<LibraryError>,
    pub loading: bool,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState {
            data: None,
            error: None,
            loading: false,
        }
    }
}

/// Handle of one in-flight fetch.
///
/// Starting a new fetch on the same [`Loader`] cancels the previous handle, so only the last
/// issued fetch may publish its result.
#[derive(Debug, Clone)]
pub struct FetchToken {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl FetchToken {
    fn new(generation: u64) -> Self {
        FetchToken {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct LoaderState<T> {
    state: FetchState<T>,
    generation: u64,
    current: Option<FetchToken>,
}

#[derive(Clone)]
pub struct Loader<T> {
    inner: Arc<Mutex<LoaderState<T>>>,
}

impl<T: Clone> Loader<T> {
    pub fn new() -> Self {
        Loader {
            inner: Arc::new(Mutex::new(LoaderState {
                state: FetchState::default(),
                generation: 0,
                current: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState<T>> {
        // state is replaced wholesale, a poisoned guard still holds a consistent value
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn begin(&self) -> FetchToken {
        let mut inner = self.lock();
        if let Some(previous) = inner.current.take() {
            previous.cancel();
        }
        inner.generation += 1;
        let token = FetchToken::new(inner.generation);
        inner.current = Some(token.clone());
        inner.state.loading = true;
        token
    }

    // Returns false when the result was discarded.
    pub fn complete(&self, token: &FetchToken, result: LibraryResult<T>) -> bool {
        let mut inner = self.lock();
        if token.is_cancelled() || token.generation != inner.generation {
            tracing::debug!("discarding stale fetch {} (current {})", token.generation, inner.generation);
            return false;
        }
        match result {
            Ok(data) => {
                inner.state.data = Some(data);
                inner.state.error = None;
            }
            Err(err) => {
                inner.state.error = Some(err);
            }
        }
        inner.state.loading = false;
        inner.current = None;
        true
    }

    pub async fn load<F>(&self, fetch: F) -> FetchState<T>
        where F: Future<Output=LibraryResult<T>> {
        let token = self.begin();
        let result = fetch.await;
        self.complete(&token, result);
        self.snapshot()
    }

    pub fn cancel(&self) {
        let mut inner = self.lock();
        if let Some(current) = inner.current.take() {
            current.cancel();
        }
        inner.state.loading = false;
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.lock().state.clone()
    }
}

impl<T: Clone> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use crate::core::library::LibraryError;
    use crate::core::loader::Loader;

    #[tokio::test]
    async fn test_should_load_data() {
        let loader: Loader<Vec<i32>> = Loader::new();
        let state = loader.load(async { Ok(vec![1, 2]) }).await;
        assert_eq!(Some(vec![1, 2]), state.data);
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_should_keep_data_on_failure() {
        let loader: Loader<i32> = Loader::new();
        let _ = loader.load(async { Ok(1) }).await;
        let state = loader.load(async { Err(LibraryError::network("down", None, true)) }).await;
        assert_eq!(Some(1), state.data);
        assert!(matches!(state.error, Some(LibraryError::Network { .. })));
        assert!(!state.loading);

        let state = loader.load(async { Ok(2) }).await;
        assert_eq!(Some(2), state.data);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_should_discard_superseded_fetch() {
        let loader: Loader<&'static str> = Loader::new();
        let first = loader.begin();
        assert!(loader.snapshot().loading);
        let second = loader.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        assert!(loader.complete(&second, Ok("second")));
        assert!(!loader.complete(&first, Ok("first")));
        assert_eq!(Some("second"), loader.snapshot().data);
    }

    #[tokio::test]
    async fn test_should_let_last_issued_win_when_racing() {
        let loader: Loader<&'static str> = Loader::new();
        let slow_loader = loader.clone();
        let slow = tokio::spawn(async move {
            slow_loader.load(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok("slow")
            }).await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fast = loader.load(async { Ok("fast") }).await;
        assert_eq!(Some("fast"), fast.data);
        let _ = slow.await.unwrap();
        assert_eq!(Some("fast"), loader.snapshot().data);
    }

    #[tokio::test]
    async fn test_should_cancel_in_flight_fetch() {
        let loader: Loader<i32> = Loader::new();
        let token = loader.begin();
        loader.cancel();
        assert!(!loader.snapshot().loading);
        assert!(!loader.complete(&token, Ok(5)));
        assert_eq!(None, loader.snapshot().data);
    }
}
