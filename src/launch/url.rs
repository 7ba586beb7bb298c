//! Bootstrap URLs for test windows, applications and notifications.
//!
//! The bootstrap document reads its instructions from the query string:
//! `testName`, `responseHeaders` (JSON object), `code` and `codeOM` (script
//! bodies to evaluate) and one frame flag such as `withIframe=true`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Characters `encodeURIComponent` leaves alone besides alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `input` the way browsers encode a URI component.
///
/// ```rust
/// use appseed::launch::encode_uri_component;
///
/// assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
/// assert_eq!(encode_uri_component("(it's)!"), "(it's)!");
/// ```
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Script handed to a new window through the `code`/`codeOM` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum CodeSnippet {
    /// Used verbatim.
    Source(String),
    /// Full function text; only the body is shipped.
    Function(String),
}

impl CodeSnippet {
    /// The script text that ends up in the URL.
    ///
    /// For `Function` this is everything after the first `{` up to, but not
    /// including, the final character. Without a `{` the text is kept minus
    /// its final character.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Source(text) => text,
            Self::Function(text) => {
                let start = text.find('{').map_or(0, |i| i + 1);
                let end = text.char_indices().last().map_or(0, |(i, _)| i);
                if start >= end {
                    ""
                } else {
                    &text[start..end]
                }
            }
        }
    }
}

/// Which frame arrangement the bootstrap document sets up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameMode {
    WithIframe,
    WithCorsIframe,
    WithinIframe,
    WithinCorsIframe,
}

impl FrameMode {
    pub const ALL: [FrameMode; 4] = [
        Self::WithIframe,
        Self::WithCorsIframe,
        Self::WithinIframe,
        Self::WithinCorsIframe,
    ];

    /// Query parameter name set to `true`.
    #[must_use]
    pub const fn param(&self) -> &'static str {
        match self {
            Self::WithIframe => "withIframe",
            Self::WithCorsIframe => "withCorsIframe",
            Self::WithinIframe => "withinIframe",
            Self::WithinCorsIframe => "withinCorsIframe",
        }
    }

    /// Pick one mode from independent flags. Earlier flags win.
    #[must_use]
    pub fn from_flags(
        with_iframe: bool,
        with_cors_iframe: bool,
        within_iframe: bool,
        within_cors_iframe: bool,
    ) -> Option<Self> {
        [with_iframe, with_cors_iframe, within_iframe, within_cors_iframe]
            .into_iter()
            .zip(Self::ALL)
            .find_map(|(set, mode)| set.then_some(mode))
    }
}

impl fmt::Display for FrameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WithIframe => "with-iframe",
            Self::WithCorsIframe => "with-cors-iframe",
            Self::WithinIframe => "within-iframe",
            Self::WithinCorsIframe => "within-cors-iframe",
        };
        f.write_str(name)
    }
}

impl FromStr for FrameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string() == s || mode.param() == s)
            .ok_or_else(|| format!("unknown frame mode '{}'", s))
    }
}

/// Builder for a bootstrap URL. Parameters are always emitted in the same
/// order regardless of the order the setters were called in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchUrl {
    base: String,
    test_name: Option<String>,
    response_headers: Option<BTreeMap<String, String>>,
    code: Option<CodeSnippet>,
    code_om: Option<CodeSnippet>,
    frame: Option<FrameMode>,
    title: Option<String>,
}

impl LaunchUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    pub fn test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Headers the server should add when it serves the document. An empty
    /// map adds nothing.
    pub fn response_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.response_headers = Some(headers).filter(|h| !h.is_empty());
        self
    }

    pub fn code(mut self, code: Option<CodeSnippet>) -> Self {
        self.code = code;
        self
    }

    pub fn code_om(mut self, code: Option<CodeSnippet>) -> Self {
        self.code_om = code;
        self
    }

    pub fn frame(mut self, frame: Option<FrameMode>) -> Self {
        self.frame = frame;
        self
    }

    /// Empty titles are dropped.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into()).filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        let mut url = self.base.clone();
        if !url.contains('?') {
            url.push('?');
        }

        if let Some(name) = &self.test_name {
            push_param(&mut url, "testName", name);
        }
        if let Some(headers) = &self.response_headers {
            // A map of strings always serializes.
            let json = serde_json::to_string(headers).unwrap_or_default();
            push_param(&mut url, "responseHeaders", &json);
        }
        if let Some(code) = &self.code {
            push_param(&mut url, "code", code.body());
        }
        if let Some(code) = &self.code_om {
            push_param(&mut url, "codeOM", code.body());
        }
        if let Some(frame) = self.frame {
            url.push('&');
            url.push_str(frame.param());
            url.push_str("=true");
        }
        if let Some(title) = &self.title {
            push_param(&mut url, "title", title);
        }
        url
    }
}

impl fmt::Display for LaunchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

fn push_param(url: &mut String, key: &str, value: &str) {
    url.push('&');
    url.push_str(key);
    url.push('=');
    url.push_str(&encode_uri_component(value));
}
