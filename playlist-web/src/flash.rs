//! One-shot status messages
//!
//! A handler that renders a page directly passes its `Flash` straight into
//! the render call. A handler that redirects stores the flash in a signed
//! `flash` cookie; the next response reads it through the
//! [`Session`](crate::session::Session) and clears the cookie, so the message
//! is shown at most once.

use axum::http::{HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::session::{read_cookie, SessionKey, FLASH_PURPOSE};

/// Cookie carrying a flash across one redirect
pub const FLASH_COOKIE: &str = "flash";

/// Flash category, used as the CSS class of the rendered message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCategory {
    Success,
    Error,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashCategory::Success),
            "error" => Some(FlashCategory::Error),
            _ => None,
        }
    }
}

/// A status message shown on one page only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.into(),
        }
    }

    /// Cookie value: `<category>.<base64url(message)>`
    fn encode(&self) -> String {
        format!(
            "{}.{}",
            self.category.as_str(),
            URL_SAFE_NO_PAD.encode(self.message.as_bytes())
        )
    }

    fn decode(value: &str) -> Option<Self> {
        let (category, payload) = value.split_once('.')?;
        let category = FlashCategory::parse(category)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let message = String::from_utf8(bytes).ok()?;
        Some(Self { category, message })
    }

    /// `Set-Cookie` header value that carries this flash to the next page
    pub fn set_cookie(&self, key: &SessionKey) -> HeaderValue {
        // base64url output and the fixed attributes are always valid header bytes
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            key.sign(FLASH_PURPOSE, &self.encode())
        ))
        .unwrap_or_else(|_| clear_cookie())
    }

    /// Read the flash cookie from request headers, if present, well formed
    /// and signed with `key`
    pub fn from_headers(key: &SessionKey, headers: &HeaderMap) -> Option<Self> {
        read_cookie(headers, FLASH_COOKIE)
            .and_then(|value| key.unsign(FLASH_PURPOSE, value))
            .and_then(Self::decode)
    }
}

/// `Set-Cookie` header value that deletes the flash cookie
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
