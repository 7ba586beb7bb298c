use std::time::Duration;
use tracing::{debug, error, warn};

use super::{AppHandle, DesktopRuntime, ProcessInfo, RuntimeError, WindowHandle};
use crate::launch::{AppOptions, WindowOptions};

/// How long the runtime waits for an external process to exit.
pub const TERMINATE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Child processes are terminated along with the target.
pub const TERMINATE_KILL_TREE: bool = true;

/// Create one window, filling in name and geometry defaults first.
///
/// The url has no default here; [`WindowOptions::for_launch`] points it at
/// the bootstrap document. An empty url is rejected before the runtime sees it.
pub async fn create_window<R: DesktopRuntime>(
    runtime: &R,
    options: WindowOptions,
) -> Result<WindowHandle, RuntimeError> {
    if options.url.trim().is_empty() {
        return Err(RuntimeError::MissingUrl {
            operation: "create_window",
        });
    }
    let options = options.normalized();
    debug!(name = %options.name, url = %options.url, "creating window");
    runtime.create_window(&options).await
}

/// Create `count` windows from copies of `options`. Each copy without a name
/// gets its own uuid. Stops at the first failure.
pub async fn create_windows<R: DesktopRuntime>(
    runtime: &R,
    options: &WindowOptions,
    count: usize,
) -> Result<Vec<WindowHandle>, RuntimeError> {
    let mut windows = Vec::with_capacity(count);
    for _ in 0..count {
        windows.push(create_window(runtime, options.clone()).await?);
    }
    Ok(windows)
}

/// Force-close a window. A missing window is an error.
pub async fn close_window<R: DesktopRuntime>(
    runtime: &R,
    window: Option<&WindowHandle>,
) -> Result<(), RuntimeError> {
    let Some(window) = window else {
        error!("No window was passed in to be closed");
        return Err(RuntimeError::NoWindow);
    };
    debug!(name = %window.name, "closing window");
    runtime.close_window(window, true).await
}

/// Close every window, even after a failure. Reports the first failure.
pub async fn close_windows<R: DesktopRuntime>(
    runtime: &R,
    windows: &[WindowHandle],
) -> Result<(), RuntimeError> {
    let mut first = None;
    let mut failed = 0;

    for window in windows {
        if let Err(e) = close_window(runtime, Some(window)).await {
            warn!(name = %window.name, error = %e, "window failed to close");
            failed += 1;
            first.get_or_insert(e);
        }
    }

    match first {
        None => Ok(()),
        Some(first) => Err(RuntimeError::CloseWindows {
            failed,
            total: windows.len(),
            first: Box::new(first),
        }),
    }
}

/// Create an application and run it. Like [`create_window`], the url must
/// be set.
pub async fn create_app<R: DesktopRuntime>(
    runtime: &R,
    options: AppOptions,
) -> Result<AppHandle, RuntimeError> {
    if options.url.trim().is_empty() {
        return Err(RuntimeError::MissingUrl {
            operation: "create_app",
        });
    }
    let options = options.normalized();
    debug!(uuid = %options.uuid, url = %options.url, "creating application");
    let app = runtime.create_application(&options).await?;
    runtime.run_application(&app).await?;
    Ok(app)
}

pub async fn close_app<R: DesktopRuntime>(runtime: &R, app: &AppHandle) -> Result<(), RuntimeError> {
    debug!(uuid = %app.uuid, "closing application");
    runtime.close_application(app).await
}

/// Process list entry for `uuid`, or an empty record when the runtime does
/// not know it.
pub async fn process_info<R: DesktopRuntime>(
    runtime: &R,
    uuid: &str,
) -> Result<ProcessInfo, RuntimeError> {
    let list = runtime.process_list().await?;
    Ok(list
        .into_iter()
        .find(|info| info.uuid.as_deref() == Some(uuid))
        .unwrap_or_default())
}

/// Launch `name` with no arguments and return its process uuid.
pub async fn launch_external_process<R: DesktopRuntime>(
    runtime: &R,
    name: &str,
) -> Result<String, RuntimeError> {
    let uuid = runtime.launch_external_process(name, "").await?;
    debug!(process = name, uuid = %uuid, "launched external process");
    Ok(uuid)
}

pub async fn terminate_external_process<R: DesktopRuntime>(
    runtime: &R,
    uuid: &str,
) -> Result<(), RuntimeError> {
    runtime
        .terminate_external_process(uuid, TERMINATE_TIMEOUT, TERMINATE_KILL_TREE)
        .await
}
