//! Definitions of the values that appear in DTX commands.

pub mod lane;
pub mod mixin;

use std::{fmt, str::FromStr};

use thiserror::Error;

/// The source dialect of the chart text. Both dialects share the command syntax but not the lane code tables.
///
/// The lane codes of the two dialects overlap, so it must be given by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// `.dtx` files made by DTXCreator.
    #[default]
    Dtx,
    /// `.gda` files made by GDA Creator.
    Gda,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dtx => "dtx",
            Self::Gda => "gda",
        })
    }
}

/// An error occurred when parsing a [`Dialect`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown dialect {0:?}, expected \"dtx\" or \"gda\"")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dtx") {
            Ok(Self::Dtx)
        } else if s.eq_ignore_ascii_case("gda") {
            Ok(Self::Gda)
        } else {
            Err(UnknownDialect(s.to_owned()))
        }
    }
}

/// An instrument that a chart can be played with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instrument {
    /// The drums.
    Drum,
    /// The guitar.
    Guitar,
    /// The bass guitar.
    Bass,
}

impl Instrument {
    /// All the instruments.
    pub const ALL: [Self; 3] = [Self::Drum, Self::Guitar, Self::Bass];

    /// Returns the lower case name used in level commands and file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Drum => "drum",
            Self::Guitar => "guitar",
            Self::Bass => "bass",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A measure, or bar, in the score. The first measure is `000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure(pub usize);

impl Measure {
    /// Parses the three decimal digits of a measure message key.
    #[must_use]
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// A difficulty level, stored exactly in hundredths.
///
/// `#DLEVEL: 85` and `#DLEVEL: 850` both mean the level `8.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level(pub u16);

impl Level {
    /// Parses the value of a level command. Up to two digits are tenths, and three digits are hundredths.
    ///
    /// Returns `None` unless the value is one to three digits.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.len() > 3 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::parse_leading(value))
    }

    /// Reads the leading digits of a level value, scaled by the length of the whole value.
    ///
    /// `5.2` is three characters long, so it reads as the level `0.05`. A value without leading digits or
    /// longer than three characters is the zero level.
    #[must_use]
    pub fn parse_leading(value: &str) -> Self {
        let value = value.trim();
        let digits = value.bytes().take_while(u8::is_ascii_digit).count();
        let Ok(number) = value[..digits].parse::<u16>() else {
            return Self(0);
        };
        match value.len() {
            0..=2 => Self(number * 10),
            3 => Self(number),
            _ => Self(0),
        }
    }

    /// Returns whether the chart of the instrument is absent.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the level as a decimal number.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scales_by_token_length() {
        assert_eq!(Level::parse("85"), Some(Level(850)));
        assert_eq!(Level::parse("5"), Some(Level(50)));
        assert_eq!(Level::parse("850"), Some(Level(850)));
        assert_eq!(Level::parse("123"), Some(Level(123)));
        assert_eq!(Level::parse("1234"), None);
        assert_eq!(Level::parse("x1"), None);
        assert_eq!(Level::parse("5.2"), None);
        assert_eq!(Level::parse_leading("5.2"), Level(5));
        assert_eq!(Level::parse_leading("50a"), Level(50));
        assert_eq!(Level::parse_leading("x1"), Level(0));
        assert_eq!(Level::parse_leading("1234"), Level(0));
        assert_eq!(Level(123).to_string(), "1.23");
        assert_eq!(Level(50).to_string(), "0.50");
    }

    #[test]
    fn dialect_from_str() {
        assert_eq!("GDA".parse(), Ok(Dialect::Gda));
        assert_eq!("dtx".parse(), Ok(Dialect::Dtx));
        assert!("bms".parse::<Dialect>().is_err());
    }

    #[test]
    fn measure_digits() {
        assert_eq!(Measure::from_digits("012"), Some(Measure(12)));
        assert_eq!(Measure::from_digits("12"), None);
        assert_eq!(Measure::from_digits("+12"), None);
        assert_eq!(Measure(7).to_string(), "007");
    }
}
