//! Primitive format predicates.
//!
//! [`FormatLibrary`] is the seam between the check engine and the code that
//! knows what an IP address or a UUID looks like. [`StandardFormats`] is the
//! implementation used unless a validator is given another one.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use uuid::{Uuid, Variant};

use super::Format;

static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:0|[1-9][0-9]*)$").expect("valid regex"));

static TLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z\x{00a1}-\x{d7ff}\x{e000}-\x{ffff}]{2,}$").expect("valid regex")
});

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9\x{00a1}-\x{d7ff}\x{e000}-\x{ffff}-]+$").expect("valid regex")
});

static EMAIL_LOCAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid regex")
});

const MAX_FQDN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_URL_LEN: usize = 2083;
const MAX_EMAIL_LOCAL_LEN: usize = 64;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Predicates for the named formats.
///
/// Implementations decide acceptance only; claim texts belong to
/// [`Format`] and cannot be changed by a library.
pub trait FormatLibrary: Send + Sync {
    /// Returns `true` when `text` satisfies `format`.
    fn accepts(&self, format: Format, text: &str) -> bool;
}

/// The built-in format predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormats;

impl FormatLibrary for StandardFormats {
    fn accepts(&self, format: Format, text: &str) -> bool {
        match format {
            Format::Any => true,
            Format::Int => is_int(text),
            Format::Nat | Format::Duration | Format::Timestamp => int_within(text, 0.0, f64::MAX),
            Format::Port => int_within(text, 0.0, f64::from(u16::MAX)),
            Format::Fqdn => is_fqdn(text),
            Format::Url => is_url(text),
            Format::Email => is_email(text),
            Format::Ip => text.parse::<IpAddr>().is_ok(),
            Format::Ipv4 => text.parse::<Ipv4Addr>().is_ok(),
            Format::Ipv6 => text.parse::<Ipv6Addr>().is_ok(),
            Format::Uuid => parse_uuid(text).is_some(),
            Format::Uuid3 => parse_uuid(text).is_some_and(|u| u.get_version_num() == 3),
            Format::Uuid4 => parse_uuid(text).is_some_and(|u| is_rfc_uuid(&u, 4)),
            Format::Uuid5 => parse_uuid(text).is_some_and(|u| is_rfc_uuid(&u, 5)),
            Format::Date => is_date(text),
            Format::Isbn => is_isbn(text),
            Format::Json => serde_json::from_str::<Value>(text)
                .is_ok_and(|v| v.is_object() || v.is_array()),
        }
    }
}

fn is_int(text: &str) -> bool {
    INT_RE.is_match(text)
}

/// Integer syntax plus an inclusive numeric range.
fn int_within(text: &str, min: f64, max: f64) -> bool {
    is_int(text)
        && text
            .parse::<f64>()
            .is_ok_and(|n| n >= min && n <= max)
}

fn is_fqdn(text: &str) -> bool {
    let text = text.strip_suffix('.').unwrap_or(text);
    if text.is_empty() || text.len() > MAX_FQDN_LEN {
        return false;
    }

    let labels: Vec<&str> = text.split('.').collect();
    let Some(tld) = labels.last() else {
        return false;
    };
    if labels.len() < 2 || !TLD_RE.is_match(tld) {
        return false;
    }

    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && LABEL_RE.is_match(label)
    })
}

fn is_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost") || host.parse::<Ipv4Addr>().is_ok() || is_fqdn(host)
}

fn is_port(port: &str) -> bool {
    !port.is_empty()
        && port.bytes().all(|b| b.is_ascii_digit())
        && port.parse::<u16>().is_ok_and(|p| p > 0)
}

fn is_url(text: &str) -> bool {
    if text.is_empty() || text.len() > MAX_URL_LEN || text.chars().any(char::is_whitespace) {
        return false;
    }

    let rest = match text.split_once("://") {
        Some((scheme, rest)) => {
            let scheme = scheme.to_ascii_lowercase();
            if !matches!(scheme.as_str(), "http" | "https" | "ftp") {
                return false;
            }
            rest
        }
        None => text,
    };

    let authority_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let host_port = match authority.rsplit_once('@') {
        Some(("", _)) => return false,
        Some((_, host_port)) => host_port,
        None => authority,
    };

    if let Some(bracketed) = host_port.strip_prefix('[') {
        let Some((ipv6, after)) = bracketed.split_once(']') else {
            return false;
        };
        if ipv6.parse::<Ipv6Addr>().is_err() {
            return false;
        }
        return after.is_empty() || after.strip_prefix(':').is_some_and(is_port);
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => is_host(host) && is_port(port),
        None => is_host(host_port),
    }
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.rsplit_once('@') else {
        return false;
    };
    if local.is_empty()
        || local.len() > MAX_EMAIL_LOCAL_LEN
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }
    EMAIL_LOCAL_RE.is_match(local) && is_fqdn(domain)
}

/// Parses the hyphenated 36-character form only.
fn parse_uuid(text: &str) -> Option<Uuid> {
    if text.len() != 36 {
        return None;
    }
    Uuid::try_parse(text).ok()
}

fn is_rfc_uuid(uuid: &Uuid, version: usize) -> bool {
    uuid.get_version_num() == version && uuid.get_variant() == Variant::RFC4122
}

fn is_date(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_rfc2822(text).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|f| NaiveDate::parse_from_str(text, f).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(text, f).is_ok())
}

fn is_isbn(text: &str) -> bool {
    let chars: Vec<char> = text.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
    match chars.len() {
        10 => is_isbn10(&chars),
        13 => is_isbn13(&chars),
        _ => false,
    }
}

fn is_isbn10(chars: &[char]) -> bool {
    let mut sum = 0;
    for (weight, c) in (1..=10u32).zip(chars) {
        let digit = match (weight, c) {
            (10, 'X' | 'x') => 10,
            (_, c) => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += weight * digit;
    }
    sum % 11 == 0
}

fn is_isbn13(chars: &[char]) -> bool {
    let Some(digits) = chars
        .iter()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10 == digits[12]
}
