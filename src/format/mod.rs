//! Named formats and the static format table.
//!
//! A check specification given as a string names one of the formats below.
//! Each canonical [`Format`] owns a fixed claim text; aliases in the table
//! point at the very same `Format` value as their target, so an alias can
//! never drift from the behaviour of the name it stands for.

pub mod library;

pub use library::{FormatLibrary, StandardFormats};

/// A canonical named format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Accepts anything (`*`)
    Any,
    /// Signed integer without leading zeros
    Int,
    /// Integer >= 0
    Nat,
    /// Integer within 0..=65535
    Port,
    /// Fully qualified domain name
    Fqdn,
    /// URL with optional scheme
    Url,
    /// Email address
    Email,
    /// IPv4 or IPv6 address
    Ip,
    /// IPv4 address
    Ipv4,
    /// IPv6 address
    Ipv6,
    /// Any hyphenated UUID
    Uuid,
    /// Version 3 UUID
    Uuid3,
    /// Version 4 UUID
    Uuid4,
    /// Version 5 UUID
    Uuid5,
    /// Duration as a non-negative integer
    Duration,
    /// Timestamp as a non-negative integer
    Timestamp,
    /// Date or date-time
    Date,
    /// ISBN-10 or ISBN-13
    Isbn,
    /// JSON object or array text
    Json,
}

/// Every name a string check may use, with the format it resolves to.
///
/// Canonical names come first, in table order; aliases follow.
const FORMAT_TABLE: &[(&str, Format)] = &[
    ("*", Format::Any),
    ("int", Format::Int),
    ("nat", Format::Nat),
    ("port", Format::Port),
    ("fqdn", Format::Fqdn),
    ("url", Format::Url),
    ("email", Format::Email),
    ("ip", Format::Ip),
    ("ipv4", Format::Ipv4),
    ("ipv6", Format::Ipv6),
    ("uuid", Format::Uuid),
    ("uuid3", Format::Uuid3),
    ("uuid4", Format::Uuid4),
    ("uuid5", Format::Uuid5),
    ("duration", Format::Duration),
    ("timestamp", Format::Timestamp),
    ("date", Format::Date),
    ("isbn", Format::Isbn),
    ("json", Format::Json),
    // aliases
    ("domain", Format::Fqdn),
    ("ipaddress", Format::Ip),
    ("integer", Format::Int),
];

impl Format {
    /// Looks up a format by name, including aliases.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        FORMAT_TABLE
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, format)| *format)
    }

    /// Returns all names in the table, canonical names first.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        FORMAT_TABLE.iter().map(|(name, _)| *name).collect()
    }

    /// Returns the canonical table name of this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "*",
            Self::Int => "int",
            Self::Nat => "nat",
            Self::Port => "port",
            Self::Fqdn => "fqdn",
            Self::Url => "url",
            Self::Email => "email",
            Self::Ip => "ip",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Uuid => "uuid",
            Self::Uuid3 => "uuid3",
            Self::Uuid4 => "uuid4",
            Self::Uuid5 => "uuid5",
            Self::Duration => "duration",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Isbn => "isbn",
            Self::Json => "json",
        }
    }

    /// The fixed claim reported when a value fails this format.
    #[must_use]
    pub const fn claim(self) -> &'static str {
        match self {
            Self::Any => "may be any value",
            Self::Int => "must be an integer",
            Self::Nat | Self::Duration | Self::Timestamp => "must be a positive integer",
            Self::Port => "must be within range 0 - 65535",
            Self::Fqdn => "must be a domain name",
            Self::Url => "must be a URL",
            Self::Email => "must be an email address",
            Self::Ip => "must be an IP address",
            Self::Ipv4 => "must be an IPv4 address",
            Self::Ipv6 => "must be an IPv6 address",
            Self::Uuid => "must be a UUID",
            Self::Uuid3 => "must be a version 3 UUID",
            Self::Uuid4 => "must be a version 4 UUID",
            Self::Uuid5 => "must be a version 5 UUID",
            Self::Date => "must be a date",
            Self::Isbn => "must be a book number",
            Self::Json => "must be a JSON string",
        }
    }

    /// Suggests the closest known name for a mistyped one.
    ///
    /// Returns the nearest table name whose Damerau-Levenshtein distance is
    /// at most `max_distance`.
    #[must_use]
    pub fn suggest(input: &str, max_distance: usize) -> Option<String> {
        FORMAT_TABLE
            .iter()
            .map(|(name, _)| (*name, strsim::damerau_levenshtein(input, name)))
            .filter(|(_, dist)| *dist <= max_distance)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name.to_string())
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
