//! core/layers.rs — Layer bitmask decoding and layer-combination labels.
//!
//! Bit i of a layer binary marks a hit in layer i (1..=11, bit 0 unused).
//! Layers 1-6 are barrel, 7-11 are endcap.
//! Example: 0b1000_0110 → [1, 2, 7] → "BBE".

use serde::{Deserialize, Serialize};

/// Highest layer index encoded in a layer binary.
pub const MAX_LAYER: u32 = 11;
/// Last barrel layer; anything above is endcap.
pub const LAST_BARREL_LAYER: u32 = 6;

/// Decode a layer binary into ascending layer indices in 1..=11.
pub fn decode_layers(layer_binary: u32) -> Vec<u32> {
    let mut layers = Vec::new();
    for i in 1..=MAX_LAYER {
        if (layer_binary >> i) & 1 == 1 {
            layers.push(i);
        }
    }
    layers
}

/// 'B' for barrel layers, 'E' for endcap, one character per layer.
pub fn layer_type(layers: &[u32]) -> String {
    layers
        .iter()
        .map(|&l| if l <= LAST_BARREL_LAYER { 'B' } else { 'E' })
        .collect()
}

/// Concatenated decimal layer indices, e.g. [1, 2, 7] → "127".
pub fn layer_numbers(layers: &[u32]) -> String {
    layers.iter().map(|l| l.to_string()).collect()
}

/// Reconstructed object kind; selects which module-type bits are inspected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    Segment,
    T3,
    T4,
    #[default]
    T5,
}

impl ObjectKind {
    /// Bit positions of the module-type binary that belong to this object.
    pub fn module_type_bits(self) -> &'static [u32] {
        match self {
            Self::Segment => &[0, 2],
            Self::T3 => &[0, 2, 6],
            Self::T4 => &[0, 2, 4, 6],
            Self::T5 => &[0, 2, 4, 6, 8],
        }
    }
}

/// Decode a module-type binary into one 0/1 flag per inspected module.
pub fn decode_module_types(module_type_binary: u32, kind: ObjectKind) -> Vec<u8> {
    kind.module_type_bits()
        .iter()
        .map(|&bit| ((module_type_binary >> bit) & 1) as u8)
        .collect()
}

/// Module-type flags rendered as a label, e.g. [0, 1, 1] → "011".
pub fn module_type_label(flags: &[u8]) -> String {
    flags
        .iter()
        .map(|&f| if f == 0 { '0' } else { '1' })
        .collect()
}

/// How objects are grouped into separately plotted layer combinations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    #[default]
    BarrelEndcap,
    LayerNumbers,
    ModuleTypes,
}

impl std::str::FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "barrel-endcap" => Ok(Self::BarrelEndcap),
            "layer-numbers" => Ok(Self::LayerNumbers),
            "module-types" => Ok(Self::ModuleTypes),
            other => Err(format!(
                "unknown split mode '{other}' (expected barrel-endcap, layer-numbers or module-types)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_zero_is_empty() {
        assert!(decode_layers(0).is_empty());
    }

    #[test]
    fn decode_single_bit() {
        for k in 1..=MAX_LAYER {
            assert_eq!(decode_layers(1 << k), vec![k], "bit {k}");
        }
    }

    #[test]
    fn decode_ignores_bit_zero_and_high_bits() {
        assert!(decode_layers(1).is_empty());
        assert!(decode_layers(1 << 12).is_empty());
        assert_eq!(decode_layers(0b1000_0111), vec![1, 2, 7]);
    }

    #[test]
    fn decode_is_ascending() {
        let layers = decode_layers(0b1111_1111_1110);
        assert_eq!(layers, (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn layer_type_examples() {
        assert_eq!(layer_type(&[1, 7]), "BE");
        assert_eq!(layer_type(&[2, 4, 6]), "BBB");
        assert_eq!(layer_type(&[]), "");
        assert_eq!(layer_type(&[6, 7, 8, 9, 10]), "BEEEE");
    }

    #[test]
    fn layer_numbers_concatenates() {
        assert_eq!(layer_numbers(&[1, 2, 7, 11]), "12711");
        assert_eq!(layer_numbers(&[]), "");
    }

    #[test]
    fn module_types_follow_object_kind() {
        let binary = 0b1_0101_0101;
        assert_eq!(decode_module_types(binary, ObjectKind::T5), vec![1, 1, 1, 1, 1]);
        assert_eq!(decode_module_types(binary, ObjectKind::Segment), vec![1, 1]);
        assert_eq!(decode_module_types(0b100, ObjectKind::T3), vec![0, 1, 0]);
        assert_eq!(decode_module_types(0b100_0000, ObjectKind::T4), vec![0, 0, 0, 1]);
        assert_eq!(module_type_label(&[0, 1, 1]), "011");
    }

    #[test]
    fn split_mode_parses_kebab_case() {
        assert_eq!("layer-numbers".parse::<SplitMode>(), Ok(SplitMode::LayerNumbers));
        assert!("barrel".parse::<SplitMode>().is_err());
    }
}
