//! Named color schemes for tier classification.
//!
//! The catalog is the CARTO color set (<https://carto.com/carto-colors>),
//! seven stops per scheme. It is fixed at compile time; grouping by category
//! is a filtered view over the same static data.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Fallback fill when no classification is active (Tailwind blue-500).
pub const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeCategory {
    Sequential,
    Diverging,
}

impl SchemeCategory {
    pub const ALL: [SchemeCategory; 2] = [SchemeCategory::Sequential, SchemeCategory::Diverging];

    pub fn label(&self) -> &'static str {
        match self {
            SchemeCategory::Sequential => "Sequential",
            SchemeCategory::Diverging => "Diverging",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub name: &'static str,
    pub category: SchemeCategory,
    pub colors: &'static [&'static str],
}

const fn seq(name: &'static str, colors: &'static [&'static str]) -> ColorScheme {
    ColorScheme {
        name,
        category: SchemeCategory::Sequential,
        colors,
    }
}

const fn div(name: &'static str, colors: &'static [&'static str]) -> ColorScheme {
    ColorScheme {
        name,
        category: SchemeCategory::Diverging,
        colors,
    }
}

static COLOR_SCHEMES: [ColorScheme; 26] = [
    seq("Burg", &["#ffc6c4", "#f4a3a8", "#e38191", "#cc607d", "#ad466c", "#8b3058", "#672044"]),
    seq("BurgYl", &["#fbe6c5", "#f5ba98", "#ee8a82", "#dc7176", "#c8586c", "#9c3f5d", "#70284a"]),
    seq("RedOr", &["#f6d2a9", "#f5b78e", "#f19c7c", "#ea8171", "#dd686c", "#ca5268", "#b13f64"]),
    seq("OrYel", &["#ecda9a", "#efc47e", "#f3ad6a", "#f7945d", "#f97b57", "#f66356", "#ee4d5a"]),
    seq("Peach", &["#fde0c5", "#facba6", "#f8b58b", "#f59e72", "#f2855d", "#ef6a4c", "#eb4a40"]),
    seq("PinkYl", &["#fef6b5", "#ffdd9a", "#ffc285", "#ffa679", "#fa8a76", "#f16d7a", "#e15383"]),
    seq("Mint", &["#e4f1e1", "#b4d9cc", "#89c0b6", "#63a6a0", "#448c8a", "#287274", "#0d585f"]),
    seq("BlueGrn", &["#c4e6c3", "#96d2a4", "#6dbc90", "#4da284", "#36877a", "#266b6e", "#1d4f60"]),
    seq("DarkMint", &["#d2fbd4", "#a5dbc2", "#7bbcb0", "#559c9e", "#3a7c89", "#235d72", "#123f5a"]),
    seq("Emrld", &["#d3f2a3", "#97e196", "#6cc08b", "#4c9b82", "#217a79", "#105965", "#074050"]),
    seq("BluYl", &["#f7feae", "#b7e6a5", "#7ccba2", "#46aea0", "#089099", "#00718b", "#045275"]),
    seq("Teal", &["#d1eeea", "#a8dbd9", "#85c4c9", "#68abb8", "#4f90a6", "#3b738f", "#2a5674"]),
    seq("TealGrn", &["#b0f2bc", "#89e8ac", "#67dba5", "#4cc8a3", "#38b2a3", "#2c98a0", "#257d98"]),
    seq("Purp", &["#f3e0f7", "#e4c7f1", "#d1afe8", "#b998dd", "#9f82ce", "#826dba", "#63589f"]),
    seq("PurpOr", &["#f9ddda", "#f2b9c4", "#e597b9", "#ce78b3", "#ad5fad", "#834ba0", "#573b88"]),
    seq("Sunset", &["#f3e79b", "#fac484", "#f8a07e", "#eb7f86", "#ce6693", "#a059a0", "#5c53a5"]),
    seq("Magenta", &["#f3cbd3", "#eaa9bd", "#dd88ac", "#ca699d", "#b14d8e", "#91357d", "#6c2167"]),
    seq("SunsetDark", &["#fcde9c", "#faa476", "#f0746e", "#e34f6f", "#dc3977", "#b9257a", "#7c1d6f"]),
    seq("BrwnYl", &["#ede5cf", "#e0c2a2", "#d39c83", "#c1766f", "#a65461", "#813753", "#541f3f"]),
    div("ArmyRose", &["#798234", "#a3ad62", "#d0d3a2", "#fdfbe4", "#f0c6c3", "#df91a3", "#d46780"]),
    div("Fall", &["#3d5941", "#778868", "#b5b991", "#f6edbd", "#edbb8a", "#de8a5a", "#ca562c"]),
    div("Geyser", &["#008080", "#70a494", "#b4c8a8", "#f6edbd", "#edbb8a", "#de8a5a", "#ca562c"]),
    div("Temps", &["#009392", "#39b185", "#9ccb86", "#e9e29c", "#eeb479", "#e88471", "#cf597e"]),
    div("TealRose", &["#009392", "#72aaa1", "#b1c7b3", "#f1eac8", "#e5b9ad", "#d98994", "#d0587e"]),
    div("Tropic", &["#009B9E", "#42B7B9", "#A7D3D4", "#F1F1F1", "#E4C1D9", "#D691C1", "#C75DAB"]),
    div("Earth", &["#A16928", "#bd925a", "#d6bd8d", "#edeac2", "#b5c8b8", "#79a7ac", "#2887a1"]),
];

/// Every scheme, in catalog order.
pub fn schemes() -> &'static [ColorScheme] {
    &COLOR_SCHEMES
}

/// Find a scheme by its exact (case-sensitive) name.
pub fn lookup(name: &str) -> Option<&'static ColorScheme> {
    COLOR_SCHEMES.iter().find(|s| s.name == name)
}

pub fn by_category(category: SchemeCategory) -> impl Iterator<Item = &'static ColorScheme> {
    COLOR_SCHEMES.iter().filter(move |s| s.category == category)
}

/// Schemes grouped for a picker: one group per category, sequential first.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeGroup {
    pub category: SchemeCategory,
    pub label: &'static str,
    pub schemes: Vec<&'static ColorScheme>,
}

pub fn theme_groups() -> Vec<ThemeGroup> {
    SchemeCategory::ALL
        .iter()
        .map(|&category| ThemeGroup {
            category,
            label: category.label(),
            schemes: by_category(category).collect(),
        })
        .collect()
}

/// 8-bit RGB color parsed from a `#rrggbb` string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").expect("valid hex regex")
});

impl Rgb8 {
    /// Parse `#rrggbb` (the leading `#` is optional). Returns `None` for anything else.
    pub fn from_hex(s: &str) -> Option<Self> {
        let caps = HEX_COLOR.captures(s.trim())?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
        Some(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_known_and_rejects_unknown() {
        let burg = lookup("Burg").unwrap();
        assert_eq!(burg.category, SchemeCategory::Sequential);
        assert_eq!(burg.colors.first(), Some(&"#ffc6c4"));
        assert_eq!(burg.colors.last(), Some(&"#672044"));
        assert!(lookup("burg").is_none());
        assert!(lookup("Viridis").is_none());
    }

    #[test]
    fn names_are_unique_and_palettes_have_two_or_more_colors() {
        let mut names: Vec<_> = schemes().iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), schemes().len());
        assert!(schemes().iter().all(|s| s.colors.len() >= 2));
    }

    #[test]
    fn groups_partition_the_catalog() {
        let groups = theme_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, SchemeCategory::Sequential);
        assert_eq!(groups[0].schemes.len(), 19);
        assert_eq!(groups[1].schemes.len(), 7);
        let total: usize = groups.iter().map(|g| g.schemes.len()).sum();
        assert_eq!(total, schemes().len());
        // Views point at catalog entries rather than copies.
        assert!(std::ptr::eq(groups[1].schemes[0], lookup("ArmyRose").unwrap()));
    }

    #[test]
    fn every_catalog_color_parses() {
        for s in schemes() {
            for c in s.colors {
                assert!(Rgb8::from_hex(c).is_some(), "{} in {}", c, s.name);
            }
        }
    }

    #[test]
    fn hex_round_trip_and_rejections() {
        let c = Rgb8::from_hex("#3b82f6").unwrap();
        assert_eq!(c, Rgb8 { r: 0x3b, g: 0x82, b: 0xf6 });
        assert_eq!(c.to_hex(), DEFAULT_COLOR);
        assert!(Rgb8::from_hex("#abc").is_none());
        assert!(Rgb8::from_hex("rgb(1,2,3)").is_none());
        assert!(Rgb8::from_hex("#gg0000").is_none());
    }
}
