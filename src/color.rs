//! Palette sampling and tier range labels.

use crate::palette;

/// Reduce a palette to `count` colors, always keeping both endpoints.
///
/// Picks source index `round(i * (len - 1) / (count - 1))` for each output
/// slot, so 7 colors sampled down to 5 take indices 0, 2, 3, 5, 6.
/// `count >= len` returns the palette unchanged; `count <= 1` returns just the
/// first color.
pub fn sample_colors<S: AsRef<str>>(colors: &[S], count: usize) -> Vec<String> {
    let owned = |i: usize| colors[i].as_ref().to_string();

    if count >= colors.len() {
        return (0..colors.len()).map(owned).collect();
    }
    if count <= 1 {
        return vec![owned(0)];
    }

    let last = (colors.len() - 1) as f64;
    let span = (count - 1) as f64;
    (0..count)
        .map(|i| {
            let index = (i as f64 * last / span).round() as usize;
            owned(index.min(colors.len() - 1))
        })
        .collect()
}

/// Colors of a named scheme sampled to `class_count`; empty for an unknown scheme.
pub fn tier_colors(scheme_name: &str, class_count: usize) -> Vec<String> {
    match palette::lookup(scheme_name) {
        Some(scheme) => sample_colors(scheme.colors, class_count),
        None => {
            log::debug!("unknown color scheme {scheme_name:?}, no tier colors");
            Vec::new()
        }
    }
}

/// Human label for tier `index`: `"≤ b0"` for the first tier, `"b[i-1] - b[i]"` after.
///
/// Returns an empty string when there are no breaks or the index is past the last break.
pub fn tier_range(index: usize, breaks: &[f64]) -> String {
    if breaks.is_empty() || index >= breaks.len() {
        return String::new();
    }
    if index == 0 {
        format!("≤ {}", breaks[0])
    } else {
        format!("{} - {}", breaks[index - 1], breaks[index])
    }
}
