//! Signed browser session
//!
//! The session is a random id held in a `session` cookie signed with the
//! server's [`SessionKey`]. It anchors the CSRF token embedded in every form
//! and is the scope of the flash cookie.
//!
//! Signed values have the form `<value>.<base64url(HMAC-SHA256)>`. The MAC
//! covers a purpose label as well as the value, so a tag minted for one
//! cookie cannot be replayed as another.

use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{digest::generic_array::GenericArray, Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};

use crate::flash::{clear_cookie, Flash, FLASH_COOKIE};

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the signed session id
pub const SESSION_COOKIE: &str = "session";

/// HMAC-SHA256 keys are one SHA-256 block long
const KEY_LEN: usize = 64;
const SESSION_ID_LEN: usize = 18;

const SESSION_PURPOSE: &str = "session";
const CSRF_PURPOSE: &str = "csrf";
pub(crate) const FLASH_PURPOSE: &str = "flash";

/// Server secret used to sign cookies and derive CSRF tokens
#[derive(Clone)]
pub struct SessionKey([u8; KEY_LEN]);

impl SessionKey {
    /// Random key; sessions signed with it end when the process exits
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Key derived from a configured secret string
    pub fn from_secret(secret: &str) -> Self {
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&Sha512::digest(secret.as_bytes()));
        Self(bytes)
    }

    fn mac(&self, purpose: &str, value: &str) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new(GenericArray::from_slice(&self.0));
        mac.update(purpose.as_bytes());
        mac.update(&[0]);
        mac.update(value.as_bytes());
        mac
    }

    /// base64url MAC of `value` for `purpose`
    pub fn tag(&self, purpose: &str, value: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.mac(purpose, value).finalize().into_bytes())
    }

    /// Constant-time check of a tag produced by [`SessionKey::tag`]
    pub fn verify_tag(&self, purpose: &str, value: &str, tag: &str) -> bool {
        match URL_SAFE_NO_PAD.decode(tag) {
            Ok(bytes) => self.mac(purpose, value).verify_slice(&bytes).is_ok(),
            Err(_) => false,
        }
    }

    /// `<value>.<tag>`
    pub fn sign(&self, purpose: &str, value: &str) -> String {
        format!("{}.{}", value, self.tag(purpose, value))
    }

    /// The value of a signed string, if its tag verifies
    pub fn unsign<'a>(&self, purpose: &str, signed: &'a str) -> Option<&'a str> {
        let (value, tag) = signed.rsplit_once('.')?;
        self.verify_tag(purpose, value, tag).then_some(value)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Value of the named cookie in the request headers
pub(crate) fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(cookie, _)| *cookie == name)
        .map(|(_, value)| value)
}

/// The caller's session, plus the flash the previous response left for it
#[derive(Debug, Clone)]
pub struct Session {
    key: SessionKey,
    id: String,
    is_new: bool,
    flash: Option<Flash>,
    flash_cookie_seen: bool,
}

impl Session {
    /// Begin a new session with a random id
    pub fn start(key: SessionKey) -> Self {
        let mut bytes = [0u8; SESSION_ID_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            key,
            id: URL_SAFE_NO_PAD.encode(bytes),
            is_new: true,
            flash: None,
            flash_cookie_seen: false,
        }
    }

    /// Resume the session named by a validly signed cookie, or start one
    pub fn from_headers(key: &SessionKey, headers: &HeaderMap) -> Self {
        let resumed = read_cookie(headers, SESSION_COOKIE)
            .and_then(|value| key.unsign(SESSION_PURPOSE, value))
            .map(str::to_string);

        let mut session = match resumed {
            Some(id) => Self {
                key: key.clone(),
                id,
                is_new: false,
                flash: None,
                flash_cookie_seen: false,
            },
            None => Self::start(key.clone()),
        };

        session.flash_cookie_seen = read_cookie(headers, FLASH_COOKIE).is_some();
        session.flash = Flash::from_headers(key, headers);
        session
    }

    /// True when the request carried no valid session cookie
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Flash left by the previous response
    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Token for the hidden `csrf_token` form field
    pub fn csrf_token(&self) -> String {
        self.key.tag(CSRF_PURPOSE, &self.id)
    }

    /// A submitted token is valid only for the session that rendered the form
    pub fn verify_csrf(&self, token: &str) -> bool {
        !self.is_new && self.key.verify_tag(CSRF_PURPOSE, &self.id, token.trim())
    }

    /// `Set-Cookie` value carrying `flash` to the next page
    pub fn flash_cookie(&self, flash: &Flash) -> HeaderValue {
        flash.set_cookie(&self.key)
    }

    /// `Set-Cookie` values every response to this request carries: the new
    /// session cookie, and a deletion of any flash cookie that came in
    pub fn response_cookies(&self) -> Vec<HeaderValue> {
        let mut cookies = Vec::new();
        if self.is_new {
            let value = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE,
                self.key.sign(SESSION_PURPOSE, &self.id)
            );
            cookies.extend(HeaderValue::from_str(&value).ok());
        }
        if self.flash_cookie_seen {
            cookies.push(clear_cookie());
        }
        cookies
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    SessionKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let key = SessionKey::from_ref(state);
        Ok(Session::from_headers(&key, &parts.headers))
    }
}
