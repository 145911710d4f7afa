//! Active choropleth classification for a map view.
//!
//! A [`TierStyleConfig`] pairs one color with each break: break `i` is the
//! inclusive upper bound of tier `i`, so `colors.len() == breaks.len()` for a
//! complete config.

use crate::color::{tier_colors, tier_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStyleConfig {
    pub field: String,
    pub breaks: Vec<f64>,
    pub colors: Vec<String>,
}

impl TierStyleConfig {
    /// True when every break has a color.
    pub fn is_complete(&self) -> bool {
        !self.breaks.is_empty() && self.colors.len() == self.breaks.len()
    }
}

/// One row of a rendered legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// Holder of the single active classification.
#[derive(Debug, Clone, Default)]
pub struct TierStore {
    active: Option<TierStyleConfig>,
}

impl TierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active classification.
    ///
    /// Colors beyond `breaks.len()` are dropped; the number dropped is returned.
    pub fn apply_tier(
        &mut self,
        field: impl Into<String>,
        breaks: Vec<f64>,
        mut colors: Vec<String>,
    ) -> usize {
        let field = field.into();
        let discarded = colors.len().saturating_sub(breaks.len());
        colors.truncate(breaks.len());
        if discarded > 0 {
            log::debug!("tier {field:?}: dropped {discarded} color(s) beyond {} breaks", breaks.len());
        }
        log::debug!("tier applied on {field:?} with {} breaks", breaks.len());
        self.active = Some(TierStyleConfig {
            field,
            breaks,
            colors,
        });
        discarded
    }

    /// Apply breaks colored from a named scheme, one color per break.
    ///
    /// An unknown scheme leaves the config with no colors rather than failing.
    pub fn apply_scheme(&mut self, field: impl Into<String>, breaks: Vec<f64>, scheme_name: &str) {
        let colors = tier_colors(scheme_name, breaks.len());
        self.apply_tier(field, breaks, colors);
    }

    /// Drop the active classification, e.g. when the selected dataset changes.
    pub fn clear_tier(&mut self) {
        if self.active.take().is_some() {
            log::debug!("tier cleared");
        }
    }

    pub fn current(&self) -> Option<&TierStyleConfig> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Range label for tier `index` of the active config; empty when inactive.
    pub fn range_label(&self, index: usize) -> String {
        self.active
            .as_ref()
            .map(|t| tier_range(index, &t.breaks))
            .unwrap_or_default()
    }

    /// Label/color rows for every tier that has a color.
    pub fn legend_items(&self) -> Vec<LegendItem> {
        let Some(t) = self.active.as_ref() else {
            return Vec::new();
        };
        t.colors
            .iter()
            .enumerate()
            .map(|(i, color)| LegendItem {
                label: tier_range(i, &t.breaks),
                color: color.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn apply_truncates_colors_to_breaks() {
        let mut store = TierStore::new();
        let dropped = store.apply_tier("pop", vec![5.0, 10.0], s(&["#a", "#b", "#c"]));
        assert_eq!(dropped, 1);
        let t = store.current().unwrap();
        assert_eq!(t.field, "pop");
        assert_eq!(t.colors, s(&["#a", "#b"]));
        assert!(t.is_complete());
    }

    #[test]
    fn apply_replaces_wholesale() {
        let mut store = TierStore::new();
        store.apply_tier("a", vec![1.0, 2.0, 3.0], s(&["#1", "#2", "#3"]));
        store.apply_tier("b", vec![7.0], s(&["#7"]));
        let t = store.current().unwrap();
        assert_eq!(t.field, "b");
        assert_eq!(t.breaks, vec![7.0]);
        assert_eq!(t.colors, s(&["#7"]));
    }

    #[test]
    fn clear_leaves_nothing_active() {
        let mut store = TierStore::new();
        store.apply_tier("pop", vec![5.0, 10.0], s(&["#a", "#b"]));
        store.clear_tier();
        assert!(store.current().is_none());
        assert!(!store.is_active());
        assert_eq!(store.range_label(0), "");
        assert!(store.legend_items().is_empty());
    }

    #[test]
    fn scheme_colors_follow_break_count() {
        let mut store = TierStore::new();
        store.apply_scheme("density", vec![1.0, 2.0, 3.0, 4.0, 5.0], "Burg");
        let t = store.current().unwrap();
        assert_eq!(t.colors.len(), 5);
        assert_eq!(t.colors[0], "#ffc6c4");
        assert_eq!(t.colors[4], "#672044");

        store.apply_scheme("density", vec![1.0, 2.0], "Nope");
        assert!(store.current().unwrap().colors.is_empty());
        assert!(!store.current().unwrap().is_complete());
    }

    #[test]
    fn legend_items_pair_labels_and_colors() {
        let mut store = TierStore::new();
        store.apply_tier("pop", vec![10.0, 20.0, 30.0], s(&["#1", "#2", "#3"]));
        let items = store.legend_items();
        assert_eq!(
            items,
            vec![
                LegendItem { label: "≤ 10".into(), color: "#1".into() },
                LegendItem { label: "10 - 20".into(), color: "#2".into() },
                LegendItem { label: "20 - 30".into(), color: "#3".into() },
            ]
        );
        assert_eq!(store.range_label(2), "20 - 30");
    }
}
