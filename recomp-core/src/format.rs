use crate::error::{RecompError, Result};
use serde::Serialize;
use std::fmt;

/// Compression formats a file can be stored under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    Identity,
    GZip,
    ZLib,
    ZStd,
    Brotli,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Identity,
        Format::GZip,
        Format::ZLib,
        Format::ZStd,
        Format::Brotli,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Format::Identity => "Identity",
            Format::GZip => "GZip",
            Format::ZLib => "ZLib",
            Format::ZStd => "ZStd",
            Format::Brotli => "Brotli",
        }
    }

    /// "Identity, GZip, ZLib, ZStd, Brotli"
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Case-insensitive lookup. `None` is accepted for `Identity`.
    pub fn lookup(s: &str) -> Option<Format> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Some(Format::Identity);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
    }

    /// Parse the value of a named option, reporting the option on failure.
    pub fn parse_option(option: &'static str, value: &str) -> Result<Format> {
        Self::lookup(value).ok_or_else(|| RecompError::UnknownFormat {
            option,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = RecompError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_option("format", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Format::lookup("gzip"), Some(Format::GZip));
        assert_eq!(Format::lookup("ZSTD"), Some(Format::ZStd));
        assert_eq!(Format::lookup(" Brotli "), Some(Format::Brotli));
        assert_eq!(Format::lookup("none"), Some(Format::Identity));
        assert_eq!(Format::lookup("identity"), Some(Format::Identity));
        assert_eq!(Format::lookup("lz4"), None);
    }

    #[test]
    fn unknown_format_names_option_and_allowed_set() {
        let err = Format::parse_option("InputFormat", "lzma").unwrap_err();
        assert!(err.is_config());
        let msg = err.to_string();
        assert!(msg.contains("'InputFormat'"), "{msg}");
        assert!(msg.contains("Identity, GZip, ZLib, ZStd, Brotli"), "{msg}");
        assert!(msg.contains("lzma"), "{msg}");
    }

    #[test]
    fn display_round_trips_through_lookup() {
        for f in Format::ALL {
            assert_eq!(f.to_string().parse::<Format>().unwrap(), f);
        }
    }
}
