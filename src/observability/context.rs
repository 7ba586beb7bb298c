//! Thread-local context tracking for crash reports.
//!
//! Records which phase of a run the current thread is in and which file it is
//! touching, so the panic hook can say what appseed was doing when it died.
//! Guards restore the previous context on drop. Guards must not be held
//! across an `.await`, since the task may resume on another thread.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<OperationContext> = const { RefCell::new(OperationContext::new()) };
}

/// Context snapshot for the current operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationContext {
    pub phase: Option<RunPhase>,
    pub current_file: Option<PathBuf>,
}

impl OperationContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// Major stages of an appseed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Parsing arguments and installing hooks
    Startup,
    /// Discovering and parsing `.appseed.toml`
    ConfigLoading,
    /// Binding and running the static server
    Serving,
    /// Dispatching probe calls to a target
    ShapeTesting,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Startup => write!(f, "startup"),
            Self::ConfigLoading => write!(f, "config_loading"),
            Self::Serving => write!(f, "serving"),
            Self::ShapeTesting => write!(f, "shape_testing"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: OperationContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current phase until the returned guard drops.
#[must_use]
pub fn set_phase(phase: RunPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the current phase without a guard. Used for top-level transitions in
/// `main` that last until the next transition.
pub fn set_phase_persistent(phase: RunPhase) {
    CURRENT_CONTEXT.with(|ctx| {
        ctx.borrow_mut().phase = Some(phase);
    });
}

/// Set the file currently being read until the returned guard drops.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn get_current_context() -> OperationContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Reset the current thread's context to empty.
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = OperationContext::new();
    });
}
