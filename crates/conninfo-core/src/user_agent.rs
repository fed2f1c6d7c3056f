use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Browser families the classifier can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    Edge,
    Opera,
    Chrome,
    Firefox,
    Safari,
    #[default]
    Unknown,
}

impl std::fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserFamily::Edge => write!(f, "Edge"),
            BrowserFamily::Opera => write!(f, "Opera"),
            BrowserFamily::Chrome => write!(f, "Chrome"),
            BrowserFamily::Firefox => write!(f, "Firefox"),
            BrowserFamily::Safari => write!(f, "Safari"),
            BrowserFamily::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Operating system families the classifier can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Windows11,
    Windows10,
    Windows81,
    Windows8,
    Windows7,
    Windows,
    Ios,
    MacOs,
    Android,
    ChromeOs,
    Linux,
    #[default]
    Unknown,
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsFamily::Windows11 => write!(f, "Windows 11"),
            OsFamily::Windows10 => write!(f, "Windows 10"),
            OsFamily::Windows81 => write!(f, "Windows 8.1"),
            OsFamily::Windows8 => write!(f, "Windows 8"),
            OsFamily::Windows7 => write!(f, "Windows 7"),
            OsFamily::Windows => write!(f, "Windows"),
            OsFamily::Ios => write!(f, "iOS"),
            OsFamily::MacOs => write!(f, "macOS"),
            OsFamily::Android => write!(f, "Android"),
            OsFamily::ChromeOs => write!(f, "ChromeOS"),
            OsFamily::Linux => write!(f, "Linux"),
            OsFamily::Unknown => write!(f, "Unknown"),
        }
    }
}

// Ordered rule tables, more specific patterns first. The order encodes the
// precedence policy (a Chrome UA also contains "Safari", a ChromeOS UA
// contains "Linux"), so these stay explicit sequences, never maps.
static BROWSER_RULES: Lazy<Vec<(BrowserFamily, Regex)>> = Lazy::new(|| {
    vec![
        (
            BrowserFamily::Edge,
            Regex::new(r"Edg(?:e|A|iOS)?/(\d+(?:\.\d+)?)").unwrap(),
        ),
        (
            BrowserFamily::Opera,
            Regex::new(r"(?:OPR|Opera)[/ ](\d+(?:\.\d+)?)").unwrap(),
        ),
        (
            BrowserFamily::Chrome,
            Regex::new(r"Chrome/(\d+(?:\.\d+)?)").unwrap(),
        ),
        (
            BrowserFamily::Firefox,
            Regex::new(r"Firefox/(\d+(?:\.\d+)?)").unwrap(),
        ),
        (
            BrowserFamily::Safari,
            Regex::new(r"Version/(\d+(?:\.\d+)?).*Safari").unwrap(),
        ),
    ]
});

static OS_RULES: Lazy<Vec<(OsFamily, Regex)>> = Lazy::new(|| {
    vec![
        (
            OsFamily::Windows11,
            Regex::new(r"Windows NT 10\.0.*Win64").unwrap(),
        ),
        (OsFamily::Windows10, Regex::new(r"Windows NT 10\.0").unwrap()),
        (OsFamily::Windows81, Regex::new(r"Windows NT 6\.3").unwrap()),
        (OsFamily::Windows8, Regex::new(r"Windows NT 6\.2").unwrap()),
        (OsFamily::Windows7, Regex::new(r"Windows NT 6\.1").unwrap()),
        (OsFamily::Windows, Regex::new(r"Windows").unwrap()),
        // iOS before macOS: iOS UA strings contain "like Mac OS X"
        (OsFamily::Ios, Regex::new(r"iPhone|iPad|iPod").unwrap()),
        (OsFamily::MacOs, Regex::new(r"Mac OS X|Macintosh").unwrap()),
        (OsFamily::Android, Regex::new(r"Android").unwrap()),
        // ChromeOS before Linux: ChromeOS UA strings contain "Linux"
        (OsFamily::ChromeOs, Regex::new(r"CrOS").unwrap()),
        (OsFamily::Linux, Regex::new(r"Linux").unwrap()),
    ]
});

/// Heuristic classification of a User-Agent string.
///
/// Absence of a match is the normal `Unknown` outcome, not an error; the
/// classifier aims for deterministic behavior on the rule tables above,
/// not coverage of the full space of real User-Agent strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BrowserClassification {
    /// The User-Agent header as received (empty when not provided)
    pub raw: String,
    pub browser: BrowserFamily,
    /// Major or major.minor, captured next to the browser token
    pub browser_version: Option<String>,
    pub os: OsFamily,
    /// True when either the browser or the OS matched a known rule
    pub matched: bool,
}

impl BrowserClassification {
    /// Classify a raw User-Agent string, first rule match wins in each
    /// dimension.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let raw = user_agent.unwrap_or_default();
        let mut classification = Self {
            raw: raw.to_string(),
            ..Self::default()
        };
        if raw.is_empty() {
            return classification;
        }

        for (family, rule) in BROWSER_RULES.iter() {
            if let Some(captures) = rule.captures(raw) {
                classification.browser = *family;
                classification.browser_version = captures.get(1).map(|m| m.as_str().to_string());
                classification.matched = true;
                break;
            }
        }

        for (family, rule) in OS_RULES.iter() {
            if rule.is_match(raw) {
                classification.os = *family;
                classification.matched = true;
                break;
            }
        }

        // Chrome UA strings satisfy the Safari rule too. When the scan
        // settled on Safari but the string mentions Chrome, reclassify
        // from the Chrome rule.
        if classification.browser == BrowserFamily::Safari && raw.contains("Chrome") {
            let chrome = BROWSER_RULES
                .iter()
                .find(|(family, _)| *family == BrowserFamily::Chrome);
            if let Some((_, rule)) = chrome {
                if let Some(captures) = rule.captures(raw) {
                    classification.browser = BrowserFamily::Chrome;
                    classification.browser_version =
                        captures.get(1).map(|m| m.as_str().to_string());
                }
            }
        }

        classification
    }
}
