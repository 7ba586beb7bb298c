use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::url::{CodeSnippet, FrameMode, LaunchUrl};
use crate::ident;

/// Asset bucket the test documents pull fixtures from.
pub const CDN: &str = "http://testing-assets.openfin.co/test_runner/";

/// Bootstrap document that evaluates the `code` parameters.
pub const APP_DOCUMENT_PATH: &str = "/agents/JavaScript/app.html";

/// Minimal document with no script at all.
pub const EMPTY_DOCUMENT_PATH: &str = "/agents/JavaScript/empty.html";

pub const DEFAULT_TOP: u32 = 220;
pub const DEFAULT_LEFT: u32 = 0;
pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 120;
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 500;

/// Where the appseed is served from and which test is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    origin: String,
    test_name: String,
}

impl LaunchContext {
    pub fn new(origin: &str, test_name: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            test_name: test_name.to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    #[must_use]
    pub fn app_url(&self) -> String {
        format!("{}{}", self.origin, APP_DOCUMENT_PATH)
    }

    #[must_use]
    pub fn empty_url(&self) -> String {
        format!("{}{}", self.origin, EMPTY_DOCUMENT_PATH)
    }
}

/// What the new window should run once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Document to load; the context's app document when unset.
    pub url: Option<String>,
    pub code: Option<CodeSnippet>,
    pub code_om: Option<CodeSnippet>,
    pub frame: Option<FrameMode>,
    pub response_headers: BTreeMap<String, String>,
}

impl LaunchParams {
    pub fn with_code(code: CodeSnippet) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// Full bootstrap URL, `testName` included.
    #[must_use]
    pub fn launch_url(&self, ctx: &LaunchContext) -> String {
        let base = self.url.clone().unwrap_or_else(|| ctx.app_url());
        LaunchUrl::new(base)
            .test_name(ctx.test_name())
            .response_headers(self.response_headers.clone())
            .code(self.code.clone())
            .code_om(self.code_om.clone())
            .frame(self.frame)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default = "default_auto_show")]
    pub auto_show: bool,
    #[serde(default)]
    pub default_top: u32,
    #[serde(default)]
    pub default_left: u32,
    #[serde(default)]
    pub default_width: u32,
    #[serde(default)]
    pub default_height: u32,
}

fn default_auto_show() -> bool {
    true
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            auto_show: true,
            default_top: DEFAULT_TOP,
            default_left: DEFAULT_LEFT,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
        }
    }
}

impl WindowOptions {
    /// Window loading the bootstrap document for `params`.
    pub fn for_launch(ctx: &LaunchContext, params: &LaunchParams) -> Self {
        Self {
            url: params.launch_url(ctx),
            ..Self::default()
        }
    }

    /// Fill the unset fields: an empty name gets a fresh uuid and zero
    /// geometry gets the default placement.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.name.is_empty() {
            self.name = ident::uuid();
        }
        self.normalize_geometry();
        self
    }

    fn normalize_geometry(&mut self) {
        fn or_default(value: &mut u32, default: u32) {
            if *value == 0 {
                *value = default;
            }
        }
        or_default(&mut self.default_top, DEFAULT_TOP);
        or_default(&mut self.default_left, DEFAULT_LEFT);
        or_default(&mut self.default_width, DEFAULT_WIDTH);
        or_default(&mut self.default_height, DEFAULT_HEIGHT);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOptions {
    pub uuid: String,
    pub name: String,
    pub url: String,
    pub main_window_options: WindowOptions,
}

impl AppOptions {
    /// Application with a fresh uuid, named after it.
    pub fn for_launch(ctx: &LaunchContext, params: &LaunchParams) -> Self {
        let uuid = ident::uuid();
        Self {
            name: uuid.clone(),
            uuid,
            url: params.launch_url(ctx),
            main_window_options: WindowOptions::default(),
        }
    }

    /// Empty uuid or name are filled in, the main window gets default
    /// geometry. The main window never carries its own name or url.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.uuid.is_empty() {
            self.uuid = ident::uuid();
        }
        if self.name.is_empty() {
            self.name = self.uuid.clone();
        }
        self.main_window_options.name.clear();
        self.main_window_options.url.clear();
        self.main_window_options.normalize_geometry();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub url: String,
    pub timeout: u64,
}

/// Inputs for [`NotificationOptions::for_launch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationParams {
    pub url: Option<String>,
    pub title: Option<String>,
    pub code: Option<CodeSnippet>,
    pub code_om: Option<CodeSnippet>,
    /// Zero or unset means the default timeout.
    pub timeout_ms: Option<u64>,
}

impl NotificationOptions {
    /// Notifications carry no `testName` and no frame flag.
    pub fn for_launch(ctx: &LaunchContext, params: &NotificationParams) -> Self {
        let base = params.url.clone().unwrap_or_else(|| ctx.app_url());
        let url = LaunchUrl::new(base)
            .code(params.code.clone())
            .code_om(params.code_om.clone())
            .title(params.title.clone().unwrap_or_default())
            .build();
        Self {
            url,
            timeout: params
                .timeout_ms
                .filter(|t| *t > 0)
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_MS),
        }
    }
}
