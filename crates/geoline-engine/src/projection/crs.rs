use std::fmt;
use std::str::FromStr;

/// A coordinate reference system identifier.
///
/// `EPSG:<code>` strings (case-insensitive) parse into [`Crs::Epsg`]; anything
/// else is kept verbatim as [`Crs::Named`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Crs {
    Epsg(u32),
    Named(String),
}

impl Crs {
    /// Geographic longitude/latitude in degrees.
    pub const WGS84: Crs = Crs::Epsg(4326);
    /// Spherical Web Mercator in meters.
    pub const WEB_MERCATOR: Crs = Crs::Epsg(3857);

    pub fn epsg_code(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            Crs::Named(_) => None,
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Crs::WGS84
    }
}

impl FromStr for Crs {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("epsg:"))
            .and_then(|_| trimmed[5..].parse::<u32>().ok());
        Ok(match code {
            // EPSG:900913 is the legacy alias of Web Mercator.
            Some(900913) => Crs::WEB_MERCATOR,
            Some(code) => Crs::Epsg(code),
            None => Crs::Named(trimmed.to_string()),
        })
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{code}"),
            Crs::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Crs {
        match s.parse::<Crs>() {
            Ok(crs) => crs,
            Err(never) => match never {},
        }
    }

    #[test]
    fn parses_epsg_codes_case_insensitively() {
        assert_eq!(parse("EPSG:4326"), Crs::WGS84);
        assert_eq!(parse("epsg:3857"), Crs::WEB_MERCATOR);
        assert_eq!(parse(" EPSG:32654 "), Crs::Epsg(32654));
    }

    #[test]
    fn legacy_mercator_alias() {
        assert_eq!(parse("EPSG:900913"), Crs::WEB_MERCATOR);
    }

    #[test]
    fn other_strings_are_named() {
        assert_eq!(parse("+proj=longlat"), Crs::Named("+proj=longlat".into()));
        assert_eq!(parse("EPSG:abc"), Crs::Named("EPSG:abc".into()));
    }

    #[test]
    fn display_round_trips_epsg() {
        assert_eq!(Crs::Epsg(3857).to_string(), "EPSG:3857");
    }
}
