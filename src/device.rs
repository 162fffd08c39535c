//! User-agent classification.
//!
//! Classification is ordered substring matching on the lower-cased agent
//! string; the first matching pattern wins. Order matters: Edge agents also
//! carry "chrome", and Chrome agents also carry "safari".
use crate::models::DeviceInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Android,
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "Windows Phone")]
    WindowsPhone,
    Windows,
    #[serde(rename = "MacOS")]
    MacOs,
    Linux,
    Unknown,
}

impl Os {
    pub fn label(self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::WindowsPhone => "Windows Phone",
            Self::Windows => "Windows",
            Self::MacOs => "MacOS",
            Self::Linux => "Linux",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Tablet => "Tablet",
            Self::Desktop => "Desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Browser {
    Edge,
    Chrome,
    Safari,
    Firefox,
    Opera,
    Unknown,
}

/// Classify a user-agent string. Never fails; an empty string yields
/// `Unknown` / `Desktop` / `Unknown`.
pub fn detect_device(user_agent: &str) -> DeviceInfo {
    let ua = user_agent.to_lowercase();

    DeviceInfo {
        os: detect_os(&ua),
        device_type: detect_device_type(&ua),
        browser: detect_browser(&ua),
        user_agent: user_agent.to_string(),
    }
}

fn detect_os(ua: &str) -> Os {
    if ua.contains("android") {
        Os::Android
    } else if contains_any(ua, &["iphone", "ipad", "ipod"]) {
        Os::Ios
    } else if ua.contains("windows phone") {
        Os::WindowsPhone
    } else if ua.contains("windows") {
        Os::Windows
    } else if contains_any(ua, &["macintosh", "mac os x"]) {
        Os::MacOs
    } else if ua.contains("linux") {
        Os::Linux
    } else {
        Os::Unknown
    }
}

fn detect_device_type(ua: &str) -> DeviceType {
    if contains_any(ua, &["mobile", "android", "iphone"]) {
        DeviceType::Mobile
    } else if contains_any(ua, &["tablet", "ipad"]) {
        DeviceType::Tablet
    } else {
        DeviceType::Desktop
    }
}

fn detect_browser(ua: &str) -> Browser {
    if ua.contains("edg") {
        Browser::Edge
    } else if ua.contains("chrome") {
        Browser::Chrome
    } else if ua.contains("safari") {
        Browser::Safari
    } else if ua.contains("firefox") {
        Browser::Firefox
    } else if contains_any(ua, &["opera", "opr"]) {
        Browser::Opera
    } else {
        Browser::Unknown
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
