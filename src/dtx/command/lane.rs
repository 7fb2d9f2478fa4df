//! Definitions of the lane codes in a measure message.
//!
//! A measure message is written as `#XXXYY: ZZ...`, where `YY` is the lane code. The same two characters
//! mean different lanes in the DTX and the GDA dialect, so every lookup here takes a [`Dialect`].

use std::{fmt, str::FromStr};

use thiserror::Error;

use super::{Dialect, Instrument};

/// A drum lane. The declaration order is the left to right order of the full lane layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrumLane {
    /// The left crash cymbal, `LC`.
    LeftCymbal,
    /// The hi-hat, both closed and open, `HH`.
    HiHat,
    /// The left pedal, `LP`.
    LeftPedal,
    /// The left bass drum, `LB`.
    LeftBass,
    /// The snare drum, `SD`.
    Snare,
    /// The high tom, `HT`.
    HighTom,
    /// The bass drum, `BD`.
    BassDrum,
    /// The low tom, `LT`.
    LowTom,
    /// The floor tom, `FT`.
    FloorTom,
    /// The right crash cymbal, `RC`.
    RightCymbal,
    /// The ride cymbal, `RD`.
    Ride,
}

impl DrumLane {
    /// All the drum lanes in the declaration order.
    pub const ALL: [Self; 11] = [
        Self::LeftCymbal,
        Self::HiHat,
        Self::LeftPedal,
        Self::LeftBass,
        Self::Snare,
        Self::HighTom,
        Self::BassDrum,
        Self::LowTom,
        Self::FloorTom,
        Self::RightCymbal,
        Self::Ride,
    ];

    /// Returns the canonical two letters label of the lane.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LeftCymbal => "LC",
            Self::HiHat => "HH",
            Self::LeftPedal => "LP",
            Self::LeftBass => "LB",
            Self::Snare => "SD",
            Self::HighTom => "HT",
            Self::BassDrum => "BD",
            Self::LowTom => "LT",
            Self::FloorTom => "FT",
            Self::RightCymbal => "RC",
            Self::Ride => "RD",
        }
    }

    /// Parses the canonical label made by [`DrumLane::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lane| lane.label() == label)
    }

    /// Looks up the lane of an upper case lane code in `dialect`.
    ///
    /// GDA files have no lanes for `LC`, `LP`, `LB` and `RD`, and its `CY` is the right cymbal.
    #[must_use]
    pub fn from_code(code: &str, dialect: Dialect) -> Option<Self> {
        use Dialect::{Dtx, Gda};
        let lane = match (dialect, code) {
            (Dtx, "1A") => Self::LeftCymbal,
            (Dtx, "11" | "18") | (Gda, "HH") => Self::HiHat,
            (Dtx, "1B") => Self::LeftPedal,
            (Dtx, "1C") => Self::LeftBass,
            (Dtx, "12") | (Gda, "SD") => Self::Snare,
            (Dtx, "14") | (Gda, "HT") => Self::HighTom,
            (Dtx, "13") | (Gda, "BD") => Self::BassDrum,
            (Dtx, "15") | (Gda, "LT") => Self::LowTom,
            (Dtx, "17") | (Gda, "FT") => Self::FloorTom,
            (Dtx, "16") | (Gda, "CY") => Self::RightCymbal,
            (Dtx, "19") => Self::Ride,
            _ => return None,
        };
        Some(lane)
    }
}

impl fmt::Display for DrumLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fret button of the guitar and the bass. The declaration order is the left to right order on the neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// The red button.
    Red,
    /// The green button.
    Green,
    /// The blue button.
    Blue,
    /// The yellow button. Not present on the three buttons layout.
    Yellow,
    /// The magenta button. Not present on the three buttons layout.
    Magenta,
}

impl Button {
    /// All the buttons in the declaration order.
    pub const ALL: [Self; 5] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Magenta,
    ];

    /// Returns the index of the button from the left.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the initial letter of the button color.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Yellow => 'Y',
            Self::Magenta => 'M',
        }
    }
}

/// How many buttons a chord pattern describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlagWidth {
    /// Red, green and blue. Used by the GDA dialect.
    Three,
    /// Red, green, blue, yellow and magenta. Used by the DTX dialect.
    Five,
}

impl FlagWidth {
    /// Returns the number of buttons.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Five => 5,
        }
    }

    /// Always `false`, a layout has at least three buttons.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }
}

/// A set of pressed buttons, stored as a bit pattern whose most significant used bit is [`Button::Red`].
///
/// The all-zero pattern is the open (no fret) note, which is still a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonFlags {
    bits: u8,
    width: FlagWidth,
}

impl ButtonFlags {
    /// Creates flags from the bit pattern, or `None` if `bits` has a bit outside of `width`.
    #[must_use]
    pub const fn new(bits: u8, width: FlagWidth) -> Option<Self> {
        if (bits as usize) >> width.len() != 0 {
            return None;
        }
        Some(Self { bits, width })
    }

    /// Creates flags with the given buttons pressed. Buttons outside of `width` are ignored.
    #[must_use]
    pub fn from_buttons(buttons: impl IntoIterator<Item = Button>, width: FlagWidth) -> Self {
        let bits = buttons
            .into_iter()
            .filter(|button| button.index() < width.len())
            .fold(0u8, |bits, button| {
                bits | 1 << (width.len() - 1 - button.index())
            });
        Self { bits, width }
    }

    /// Parses a string of `0` and `1` such as `"01100"`. Its length decides the width.
    #[must_use]
    pub fn from_digits(digits: &str) -> Option<Self> {
        let width = match digits.len() {
            3 => FlagWidth::Three,
            5 => FlagWidth::Five,
            _ => return None,
        };
        if !digits.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }
        let bits = u8::from_str_radix(digits, 2).ok()?;
        Self::new(bits, width)
    }

    /// Returns the raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns the number of buttons described.
    #[must_use]
    pub const fn width(self) -> FlagWidth {
        self.width
    }

    /// Returns whether no button is pressed.
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.bits == 0
    }

    /// Returns whether `button` is pressed.
    #[must_use]
    pub const fn is_pressed(self, button: Button) -> bool {
        let len = self.width.len();
        button.index() < len && (self.bits >> (len - 1 - button.index())) & 1 == 1
    }

    /// Iterates the pressed buttons from the left.
    pub fn pressed(self) -> impl Iterator<Item = Button> {
        Button::ALL
            .into_iter()
            .take(self.width.len())
            .filter(move |&button| self.is_pressed(button))
    }
}

impl fmt::Display for ButtonFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.width.len())
    }
}

/// A note of the guitar or the bass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonChord {
    /// Picks with the buttons held.
    Press(ButtonFlags),
    /// Wails the neck. Counted apart from the notes.
    Wail,
}

/// Button patterns of the DTX codes, in the same order as [`DTX_GUITAR_CODES`] and [`DTX_BASS_CODES`].
const DTX_BUTTON_PATTERNS: [u8; 32] = [
    0b00000, 0b00100, 0b01000, 0b10000, 0b00010, 0b00001, 0b01100, 0b10100, 0b11000, 0b00110,
    0b01010, 0b10010, 0b00101, 0b01001, 0b10001, 0b00011, 0b11100, 0b01110, 0b10110, 0b11010,
    0b01101, 0b10101, 0b11001, 0b00111, 0b01011, 0b10011, 0b11110, 0b11101, 0b01111, 0b10111,
    0b11011, 0b11111,
];

const DTX_GUITAR_CODES: [&str; 32] = [
    "20", "21", "22", "24", "93", "9B", "23", "25", "26", "94", "95", "97", "9C", "9D", "9F", "AC",
    "27", "96", "98", "99", "9E", "A9", "AA", "AD", "AE", "D0", "9A", "AB", "AF", "D1", "D2", "D3",
];

const DTX_BASS_CODES: [&str; 32] = [
    "A0", "A1", "A2", "A4", "C5", "CE", "A3", "A5", "A6", "C6", "C8", "CA", "CF", "DA", "DC", "E1",
    "A7", "C9", "CB", "CC", "DB", "DD", "DE", "E2", "E3", "E5", "CD", "DF", "E4", "E6", "E7", "E8",
];

impl ButtonChord {
    /// Looks up the chord of an upper case lane code of `half` in `dialect`.
    ///
    /// DTX codes are hexadecimal-looking pairs from a fixed table. GDA codes are the half letter followed by
    /// the octal digit of the three button pattern, or `W` for the wail.
    #[must_use]
    pub fn from_code(code: &str, half: Half, dialect: Dialect) -> Option<Self> {
        match dialect {
            Dialect::Dtx => {
                let (codes, wail) = match half {
                    Half::Guitar => (&DTX_GUITAR_CODES, "28"),
                    Half::Bass => (&DTX_BASS_CODES, "A8"),
                };
                if code == wail {
                    return Some(Self::Wail);
                }
                let index = codes.iter().position(|&c| c == code)?;
                let bits = *DTX_BUTTON_PATTERNS.get(index)?;
                ButtonFlags::new(bits, FlagWidth::Five).map(Self::Press)
            }
            Dialect::Gda => {
                let rest = code.strip_prefix(half.prefix())?;
                match rest.as_bytes() {
                    [b'W'] => Some(Self::Wail),
                    [digit @ b'0'..=b'7'] => {
                        ButtonFlags::new(digit - b'0', FlagWidth::Three).map(Self::Press)
                    }
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for ButtonChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Press(flags) => fmt::Display::fmt(flags, f),
            Self::Wail => f.write_str("Wail"),
        }
    }
}

/// One of the two instruments sharing the button code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Half {
    /// The guitar, prefixed with `G` in labels.
    Guitar,
    /// The bass, prefixed with `B` in labels.
    Bass,
}

impl Half {
    /// Returns the letter that prefixes its labels.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Guitar => 'G',
            Self::Bass => 'B',
        }
    }

    /// Returns the instrument played on this half.
    #[must_use]
    pub const fn instrument(self) -> Instrument {
        match self {
            Self::Guitar => Instrument::Guitar,
            Self::Bass => Instrument::Bass,
        }
    }
}

/// The canonical label that a lane code is stored under in a measure.
///
/// Displayed as `HH` for drums, or `G01100`, `B101` and `GWail` for the buttons. It is serialized in the
/// display form, so that it can be a key of JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneLabel {
    /// A drum lane.
    Drum(DrumLane),
    /// A chord on the guitar or the bass.
    Button {
        /// The instrument that the chord belongs to.
        half: Half,
        /// The buttons.
        chord: ButtonChord,
    },
}

impl LaneLabel {
    /// Returns the instrument the label belongs to.
    #[must_use]
    pub const fn instrument(self) -> Instrument {
        match self {
            Self::Drum(_) => Instrument::Drum,
            Self::Button { half, .. } => half.instrument(),
        }
    }
}

impl fmt::Display for LaneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drum(lane) => fmt::Display::fmt(lane, f),
            Self::Button { half, chord } => write!(f, "{}{chord}", half.prefix()),
        }
    }
}

/// An error occurred when parsing a [`LaneLabel`] from its display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown lane label: {0:?}")]
pub struct UnknownLaneLabel(pub String);

impl FromStr for LaneLabel {
    type Err = UnknownLaneLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(lane) = DrumLane::from_label(s) {
            return Ok(Self::Drum(lane));
        }
        let half = match s.chars().next() {
            Some('G') => Half::Guitar,
            Some('B') => Half::Bass,
            _ => return Err(UnknownLaneLabel(s.to_owned())),
        };
        let rest = &s[1..];
        let chord = if rest == "Wail" {
            Some(ButtonChord::Wail)
        } else {
            ButtonFlags::from_digits(rest).map(ButtonChord::Press)
        };
        chord
            .map(|chord| Self::Button { half, chord })
            .ok_or_else(|| UnknownLaneLabel(s.to_owned()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LaneLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LaneLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// The meaning of a lane code, as the exhaustive classification over the closed code tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// `01`, the background audio. Its first chip is the playback start.
    Bgm,
    /// `02`, the length of the measure relative to four beats.
    SectionLength,
    /// `08`, tempo changes referring to `#BPMxx` labels.
    BpmChange,
    /// `C2`, shows (`01`) or hides the measure lines from the position.
    ShowHideLine,
    /// A playable lane.
    Lane(LaneLabel),
    /// A code out of every table of the dialect, such as sound effects and video lanes.
    Unrecognized,
}

/// Reads the lane code `code` in `dialect`, ignoring its case.
#[must_use]
pub fn read_channel(code: &str, dialect: Dialect) -> Channel {
    let code = code.to_ascii_uppercase();
    match code.as_str() {
        "01" => return Channel::Bgm,
        "02" => return Channel::SectionLength,
        "08" => return Channel::BpmChange,
        "C2" => return Channel::ShowHideLine,
        _ => {}
    }
    if let Some(lane) = DrumLane::from_code(&code, dialect) {
        return Channel::Lane(LaneLabel::Drum(lane));
    }
    [Half::Guitar, Half::Bass]
        .into_iter()
        .find_map(|half| {
            ButtonChord::from_code(&code, half, dialect)
                .map(|chord| Channel::Lane(LaneLabel::Button { half, chord }))
        })
        .unwrap_or(Channel::Unrecognized)
}
