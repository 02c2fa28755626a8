use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{config::CalcConfig, session::Calc};

/// A thread-safe pool of [`Calc`] sessions.
///
/// Sessions are handed out one at a time so every thread works on its own
/// session and cache. Closed sessions are not returned to the pool.
#[derive(Debug, Default)]
pub struct CalcPool {
    config: CalcConfig,
    calcs: Mutex<Vec<Calc>>,
}

impl CalcPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions created by this pool use `config`.
    pub fn with_config(config: CalcConfig) -> Self {
        Self {
            config,
            calcs: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Calc>> {
        self.calcs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a session out of the pool or creates a new one.
    pub fn get(&self) -> Calc {
        self.lock()
            .pop()
            .unwrap_or_else(|| Calc::with_config(self.config.clone()))
    }

    /// Returns a session to the pool.
    pub fn put(&self, calc: Calc) {
        if calc.is_open() {
            self.lock().push(calc);
        }
    }

    /// Runs `f` with a pooled session and returns the session afterwards.
    pub fn with_calc<R>(&self, f: impl FnOnce(&mut Calc) -> R) -> R {
        let mut calc = self.get();
        let res = f(&mut calc);
        self.put(calc);

        res
    }

    /// Fills the pool up to `count` idle sessions.
    pub fn pre_populate(&self, count: usize) {
        let mut calcs = self.lock();
        let missing = count.saturating_sub(calcs.len());

        calcs.extend((0..missing).map(|_| Calc::with_config(self.config.clone())));
    }

    /// Amount of idle sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops all idle sessions.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
