use std::collections::HashMap;

use colorsys::{Hsl, Rgb};
use homedata_api_types::{Bedroom, DataType};

const PALETTE: [(&str, &str); 6] = [
    ("Manhattan", "#4e79a7"),
    ("Brooklyn", "#f28e2c"),
    ("Queens", "#e15759"),
    ("Bronx", "#76b7b2"),
    ("Staten Island", "#59a14f"),
    ("All", "#af7aa1"),
];

fn palette_color(neighborhood: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(name, _)| *name == neighborhood)
        .map(|(_, color)| *color)
}

fn hue_offset(bedroom: Bedroom) -> f64 {
    match bedroom {
        Bedroom::All => 0.0,
        Bedroom::Studio => 10.0,
        Bedroom::OneBd => 20.0,
        Bedroom::TwoBd => 30.0,
        Bedroom::ThreePlusBd => 40.0,
    }
}

/// Shift-and-subtract string hash over UTF-16 code units. Only the shifted
/// term is cut to 32 bits, the running value itself is not.
pub fn key_hash(key: &str) -> i64 {
    key.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit) + (shifted - hash)
    })
}

fn rounded_hsl(hex: &str) -> Option<(f64, f64, f64)> {
    let hsl = Hsl::from(&Rgb::from_hex_str(hex).ok()?);
    Some((
        hsl.get_hue().round(),
        hsl.get_saturation().round(),
        hsl.get_lightness().round(),
    ))
}

fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    Rgb::from(&Hsl::new(hue, saturation, lightness, None)).to_hex_string()
}

/// Palette color for the neighborhood rotated by bedroom count, or a hashed
/// hue for neighborhoods outside the palette.
pub fn derive_color(data_type: DataType, bedroom: Bedroom, neighborhood: &str) -> String {
    let Some(base) = palette_color(neighborhood) else {
        let key = format!("{data_type}_{bedroom}_{neighborhood}");
        let hue = (key_hash(&key).abs() % 360) as f64;
        return hsl_to_hex(hue, 70.0, 60.0);
    };
    if bedroom == Bedroom::All {
        return base.to_string();
    }
    match rounded_hsl(base) {
        Some((hue, saturation, lightness)) => {
            let hue = (hue + hue_offset(bedroom)).rem_euclid(360.0);
            let lightness = if data_type.is_inventory() {
                (lightness + 15.0).min(90.0)
            } else {
                lightness
            };
            hsl_to_hex(hue, saturation, lightness)
        }
        None => base.to_string(),
    }
}

/// Darker shade of a series color for its seasonally adjusted twin.
pub fn adjusted_variant(hex: &str) -> String {
    match rounded_hsl(hex) {
        Some((hue, saturation, lightness)) => {
            hsl_to_hex(hue, saturation, (lightness - 15.0).max(30.0))
        }
        None => hex.to_string(),
    }
}

/// Memoized colors, one per data type, bedroom and neighborhood.
#[derive(Debug, Default)]
pub struct ColorResolver {
    memo: HashMap<(DataType, Bedroom, String), String>,
}

impl ColorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, data_type: DataType, bedroom: Bedroom, neighborhood: &str) -> String {
        self.memo
            .entry((data_type, bedroom, neighborhood.to_string()))
            .or_insert_with(|| derive_color(data_type, bedroom, neighborhood))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}
