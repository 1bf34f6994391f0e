//! Key records and switch/stabilizer variants.

use serde::Deserialize;

/// Switch cutout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i64")]
pub enum SwitchType {
    /// Plain 14×14 MX square.
    Mx = 1,
    /// MX square with Alps-compatible side tabs.
    MxAlps = 2,
    /// MX with clip-relief side wings for plate-mount switches.
    MxH = 3,
    /// Alps SKCM/SKCL rectangle.
    Alps = 4,
}

impl SwitchType {
    /// Maps a layout integer code to a template. Unknown codes return `None`
    /// so callers can fall back to the sheet default.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Mx),
            2 => Some(Self::MxAlps),
            3 => Some(Self::MxH),
            4 => Some(Self::Alps),
            _ => None,
        }
    }
}

impl TryFrom<i64> for SwitchType {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown switch type code {code}"))
    }
}

/// Stabilizer cutout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i64")]
pub enum StabType {
    /// No stabilizer openings.
    Remove = 0,
    /// Cherry pocket with a Costar wire slot, both styles fit.
    CherryCostar = 1,
    /// Cherry spec pocket only.
    Cherry = 2,
    /// Costar wire slots only.
    Costar = 3,
    /// Alps/Matias slots.
    Alps = 4,
    /// Kailh Choc low-profile pockets.
    KailhChoc = 5,
}

impl StabType {
    /// Maps a layout integer code to a template. Unknown codes (including
    /// the `-1` inherit sentinel) return `None`.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Remove),
            1 => Some(Self::CherryCostar),
            2 => Some(Self::Cherry),
            3 => Some(Self::Costar),
            4 => Some(Self::Alps),
            5 => Some(Self::KailhChoc),
            _ => None,
        }
    }

    /// True for the templates built around the Cherry pocket.
    #[must_use]
    pub fn is_cherry_family(self) -> bool {
        matches!(self, Self::CherryCostar | Self::Cherry)
    }
}

impl TryFrom<i64> for StabType {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown stabilizer type code {code}"))
    }
}

/// Cherry stabilizer stem offsets from the key centre, keyed on key size in
/// units. Also used by Costar slots.
const CHERRY_STAB_OFFSETS: &[(f64, f64)] = &[
    (2.0, 11.9),
    (2.25, 11.9),
    (2.75, 11.9),
    (3.0, 19.05),
    (4.0, 28.575),
    (4.5, 34.671),
    (5.5, 42.8625),
    (6.0, 47.5),
    (6.25, 50.0),
    (6.5, 52.38),
    (7.0, 57.15),
    (8.0, 66.675),
    (9.0, 66.675),
    (10.0, 66.675),
];

const ALPS_STAB_OFFSETS: &[(f64, f64)] = &[
    (1.75, 11.938),
    (2.0, 14.096),
    (2.25, 14.096),
    (2.75, 14.096),
    (6.25, 41.859),
    (6.5, 45.3),
];

const KAILH_CHOC_STAB_OFFSETS: &[(f64, f64)] = &[
    (1.75, 11.975),
    (2.0, 11.975),
    (2.25, 11.975),
    (2.75, 11.975),
    (6.25, 37.95),
];

fn lookup(table: &[(f64, f64)], size: f64) -> Option<f64> {
    table.iter().find(|(s, _)| *s == size).map(|(_, off)| *off)
}

/// Cherry stem offset for a key of `size` units, `None` for unknown sizes.
#[must_use]
pub fn cherry_stab_offset(size: f64) -> Option<f64> {
    lookup(CHERRY_STAB_OFFSETS, size)
}

/// Alps stem offset for a key of `size` units, `None` for unknown sizes.
#[must_use]
pub fn alps_stab_offset(size: f64) -> Option<f64> {
    lookup(ALPS_STAB_OFFSETS, size)
}

/// Kailh Choc stem offset for a key of `size` units, `None` for unknown sizes.
#[must_use]
pub fn kailh_choc_stab_offset(size: f64) -> Option<f64> {
    lookup(KAILH_CHOC_STAB_OFFSETS, size)
}

/// One logical keycap, flattened from the layout description.
///
/// Field names mirror the layout override map: sizes and offsets are in key
/// units, rotations in degrees. `stab` keeps the `-1` inherit sentinel since
/// `0` (remove) is a valid template.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Key {
    /// Width in key units.
    #[serde(rename = "w")]
    pub width: f64,
    /// Height in key units.
    #[serde(rename = "h")]
    pub height: f64,
    /// Alternate cap width for strangely shaped keys (ISO enter, stepped caps).
    #[serde(rename = "w2")]
    pub alt_width: f64,
    /// Alternate cap height for strangely shaped keys.
    #[serde(rename = "h2")]
    pub alt_height: f64,
    /// X offset relative to the previous key, applied before placement.
    #[serde(rename = "x")]
    pub x_rel: f64,
    /// Y offset relative to the previous row.
    #[serde(rename = "y")]
    pub y_rel: f64,
    /// Absolute X origin for a rotated cluster.
    #[serde(rename = "rx")]
    pub x_abs: f64,
    /// Absolute Y origin for a rotated cluster.
    #[serde(rename = "ry")]
    pub y_abs: f64,
    /// X offset of the alternate cap region.
    #[serde(rename = "x2")]
    pub x_alt: f64,
    /// Y offset of the alternate cap region.
    #[serde(rename = "y2")]
    pub y_alt: f64,
    /// Switch template code; unknown codes inherit the sheet default.
    #[serde(rename = "_t")]
    pub switch: i64,
    /// Stabilizer template code; `-1` inherits the sheet default.
    #[serde(rename = "_s")]
    pub stab: i64,
    /// Per-key kerf override in mm; `0` inherits the sheet kerf.
    #[serde(rename = "_k")]
    pub kerf: f64,
    /// Comma-separated custom polygon indices anchored at this key.
    #[serde(rename = "_c")]
    pub custom: String,
    /// Switch opening rotation in degrees.
    #[serde(rename = "_r")]
    pub rotate: f64,
    /// Stabilizer opening rotation in degrees.
    #[serde(rename = "_rs")]
    pub rotate_stab: f64,
    /// Rotation of the cluster this key opens, in degrees.
    #[serde(rename = "r")]
    pub rotate_cluster: f64,
    /// Set when a later key overlaps this one via a negative `x` offset.
    #[serde(skip)]
    pub stacked: bool,
}

impl Default for Key {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            alt_width: 0.0,
            alt_height: 0.0,
            x_rel: 0.0,
            y_rel: 0.0,
            x_abs: 0.0,
            y_abs: 0.0,
            x_alt: 0.0,
            y_alt: 0.0,
            switch: 0,
            stab: -1,
            kerf: 0.0,
            custom: String::new(),
            rotate: 0.0,
            rotate_stab: 0.0,
            rotate_cluster: 0.0,
            stacked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cherry_offsets_table_values() {
        assert_eq!(cherry_stab_offset(2.0), Some(11.9));
        assert_eq!(cherry_stab_offset(3.0), Some(19.05));
        assert_eq!(cherry_stab_offset(6.25), Some(50.0));
        assert_eq!(cherry_stab_offset(7.0), Some(57.15));
        assert_eq!(cherry_stab_offset(1.5), None);
    }

    #[test]
    fn test_alps_and_choc_offsets() {
        assert_eq!(alps_stab_offset(1.75), Some(11.938));
        assert_eq!(alps_stab_offset(6.5), Some(45.3));
        assert_eq!(alps_stab_offset(1.5), None);
        assert_eq!(kailh_choc_stab_offset(2.0), Some(11.975));
        assert_eq!(kailh_choc_stab_offset(6.25), Some(37.95));
        assert_eq!(kailh_choc_stab_offset(6.5), None);
    }

    #[test]
    fn test_codes_round_trip() {
        assert_eq!(SwitchType::from_code(3), Some(SwitchType::MxH));
        assert_eq!(SwitchType::from_code(9), None);
        assert_eq!(StabType::from_code(0), Some(StabType::Remove));
        assert_eq!(StabType::from_code(-1), None);
        assert!(StabType::Cherry.is_cherry_family());
        assert!(!StabType::Costar.is_cherry_family());
    }

    #[test]
    fn test_key_deserialize_overrides() {
        let key: Key = serde_json::from_str(r#"{"w":2.25,"_s":1,"x":0.5,"_rs":90}"#).unwrap();
        assert_eq!(key.width, 2.25);
        assert_eq!(key.stab, 1);
        assert_eq!(key.x_rel, 0.5);
        assert_eq!(key.rotate_stab, 90.0);
        // Untouched fields keep their inherit defaults.
        assert_eq!(key.height, 0.0);
        assert_eq!(key.switch, 0);
    }

    #[test]
    fn test_key_ignores_unknown_fields() {
        // Layout files from editors carry extra fields like label font sizes.
        let key: Key = serde_json::from_str(r#"{"f":3,"w":2}"#).unwrap();
        assert_eq!(key.width, 2.0);
    }
}
