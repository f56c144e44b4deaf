use serde::{Deserialize, Serialize};
use url::Url;

const CHAT_BASE_URL: &str = "https://api.whatsapp.com/send";
const STORE_WEB_BASE_URL: &str = "https://play.google.com/store/apps/details";

/// Messaging app variants the order can be sent through
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessagingApp {
    #[default]
    Standard,
    Business,
}

impl MessagingApp {
    pub fn package_name(&self) -> &'static str {
        match self {
            MessagingApp::Standard => "com.whatsapp",
            MessagingApp::Business => "com.whatsapp.w4b",
        }
    }

    /// Store listing opened when the app is not installed.
    pub fn store_listing_link(&self) -> String {
        format!("market://details?id={}", self.package_name())
    }

    /// Browser fallback for [`MessagingApp::store_listing_link`].
    pub fn store_listing_web_link(&self) -> Result<Url, DispatchError> {
        Ok(Url::parse_with_params(STORE_WEB_BASE_URL, &[("id", self.package_name())])?)
    }
}

/// Digits only; if there are none, the input without spaces.
pub fn normalize_phone(phone: &str) -> Result<String, DispatchError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let normalized = if digits.is_empty() {
        phone.replace(' ', "")
    } else {
        digits
    };

    if normalized.is_empty() {
        return Err(DispatchError::BlankPhone);
    }
    Ok(normalized)
}

/// Link that opens a chat with `phone` and the message pre-filled.
pub fn chat_link(phone: &str, message: &str) -> Result<Url, DispatchError> {
    let phone = normalize_phone(phone)?;
    Ok(Url::parse_with_params(CHAT_BASE_URL, &[("phone", phone.as_str()), ("text", message)])?)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Destination phone is blank")]
    BlankPhone,

    #[error("Invalid link: {0}")]
    InvalidLink(#[from] url::ParseError),
}
