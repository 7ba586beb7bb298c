//! Options and bootstrap URLs for the windows, applications and
//! notifications a test spawns.

mod options;
mod url;

pub use options::{
    AppOptions, LaunchContext, LaunchParams, NotificationOptions, NotificationParams,
    WindowOptions, APP_DOCUMENT_PATH, CDN, DEFAULT_HEIGHT, DEFAULT_LEFT,
    DEFAULT_NOTIFICATION_TIMEOUT_MS, DEFAULT_TOP, DEFAULT_WIDTH, EMPTY_DOCUMENT_PATH,
};
pub use url::{encode_uri_component, CodeSnippet, FrameMode, LaunchUrl};
