//! Seam to the desktop runtime that hosts the test windows.
//!
//! The runtime itself is a black box. Everything here is expressed against
//! [`DesktopRuntime`] so the helpers can be driven by a real runtime bridge
//! or by an in-memory fake in tests.

mod helpers;

pub use helpers::{
    close_app, close_window, close_windows, create_app, create_window, create_windows,
    launch_external_process, process_info, terminate_external_process, TERMINATE_KILL_TREE,
    TERMINATE_TIMEOUT,
};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::launch::{AppOptions, WindowOptions};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no window was passed in to be closed")]
    NoWindow,

    #[error("{operation} needs a url; build options with `for_launch`")]
    MissingUrl { operation: &'static str },

    #[error("{operation} failed: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    #[error("{failed} of {total} windows failed to close: {first}")]
    CloseWindows {
        failed: usize,
        total: usize,
        first: Box<RuntimeError>,
    },
}

impl RuntimeError {
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppHandle {
    pub uuid: String,
}

/// One entry of the runtime's process list. Every field is optional so an
/// unknown application can be reported as an empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_set_size: Option<u64>,
}

impl ProcessInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Operations the helpers need from the desktop runtime.
#[allow(async_fn_in_trait)]
pub trait DesktopRuntime {
    async fn create_window(&self, options: &WindowOptions) -> Result<WindowHandle, RuntimeError>;

    /// `force` skips any close-request handlers the window registered.
    async fn close_window(&self, window: &WindowHandle, force: bool) -> Result<(), RuntimeError>;

    async fn create_application(&self, options: &AppOptions) -> Result<AppHandle, RuntimeError>;

    async fn run_application(&self, app: &AppHandle) -> Result<(), RuntimeError>;

    async fn close_application(&self, app: &AppHandle) -> Result<(), RuntimeError>;

    async fn process_list(&self) -> Result<Vec<ProcessInfo>, RuntimeError>;

    /// Returns the uuid the runtime assigned to the new process.
    async fn launch_external_process(
        &self,
        path: &str,
        arguments: &str,
    ) -> Result<String, RuntimeError>;

    async fn terminate_external_process(
        &self,
        uuid: &str,
        timeout: Duration,
        kill_tree: bool,
    ) -> Result<(), RuntimeError>;
}
