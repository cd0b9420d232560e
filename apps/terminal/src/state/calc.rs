//! # Calculator State
//!
//! The expression engine behind a mutex. Each tap is one atomic
//! transition, so concurrent callers never observe a half-applied tap.

use std::sync::{Arc, Mutex, PoisonError};

use heartcalc_core::{CalcButton, EngineState, ExpressionEngine, TapOutcome};

use super::AppConfig;

#[derive(Debug, Clone, Default)]
pub struct CalcState {
    engine: Arc<Mutex<ExpressionEngine>>,
}

impl CalcState {
    pub fn new(engine: ExpressionEngine) -> Self {
        CalcState {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// A fresh engine that fires the easter egg on the configured result.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ExpressionEngine::new().with_easter_egg(config.easter_egg.result.clone()))
    }

    /// Applies one tap.
    pub fn apply(&self, button: CalcButton) -> TapOutcome {
        self.with_engine_mut(|engine| engine.apply(button))
    }

    pub fn snapshot(&self) -> EngineState {
        self.with_engine(ExpressionEngine::state)
    }

    /// Executes a function with read access to the engine.
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ExpressionEngine) -> R,
    {
        let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&engine)
    }

    /// Executes a function with write access to the engine.
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ExpressionEngine) -> R,
    {
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }
}
