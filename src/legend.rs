//! Legend settings and SVG legend export.
//!
//! The legend is a vertical list of color swatches with range labels,
//! optionally headed by a title. Layout uses a width heuristic because the
//! SVG backend leaves text measurement to the viewer.

use crate::palette::{DEFAULT_COLOR, Rgb8};
use crate::tier::LegendItem;
use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const SWATCH_PX: i32 = 14;
const SWATCH_GAP_PX: i32 = 8;
const ROW_GAP_PX: i32 = 6;
const TITLE_GAP_PX: i32 = 8;

/// Corner of the map frame the legend is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Font families offered for legend text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendFont {
    #[default]
    Inter,
    #[serde(rename = "IBM Plex Sans")]
    IbmPlexSans,
    Barlow,
    Manrope,
    #[serde(rename = "Space Grotesk")]
    SpaceGrotesk,
}

impl LegendFont {
    pub const ALL: [LegendFont; 5] = [
        LegendFont::Inter,
        LegendFont::IbmPlexSans,
        LegendFont::Barlow,
        LegendFont::Manrope,
        LegendFont::SpaceGrotesk,
    ];

    pub fn family_name(&self) -> &'static str {
        match self {
            LegendFont::Inter => "Inter",
            LegendFont::IbmPlexSans => "IBM Plex Sans",
            LegendFont::Barlow => "Barlow",
            LegendFont::Manrope => "Manrope",
            LegendFont::SpaceGrotesk => "Space Grotesk",
        }
    }
}

/// Font weights offered for legend text, serialized as CSS weight strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontWeight {
    #[serde(rename = "400")]
    Normal,
    #[serde(rename = "500")]
    Medium,
    #[serde(rename = "600")]
    Semibold,
    #[serde(rename = "700")]
    Bold,
}

impl FontWeight {
    pub const ALL: [FontWeight; 4] = [
        FontWeight::Normal,
        FontWeight::Medium,
        FontWeight::Semibold,
        FontWeight::Bold,
    ];

    /// Numeric CSS weight.
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::Semibold => 600,
            FontWeight::Bold => 700,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontWeight::Normal => "Normal",
            FontWeight::Medium => "Medium",
            FontWeight::Semibold => "Semibold",
            FontWeight::Bold => "Bold",
        }
    }

    /// The SVG backend only knows normal and bold.
    fn style(self) -> FontStyle {
        if self.value() >= 600 {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSettings {
    pub title: String,
    pub font_family: LegendFont,
    pub font_size: u32,
    pub title_font_weight: FontWeight,
    pub item_font_weight: FontWeight,
    pub position: LegendPosition,
    pub padding: u32,
    pub visible: bool,
}

impl Default for LegendSettings {
    fn default() -> Self {
        Self {
            title: "Legend".into(),
            font_family: LegendFont::Inter,
            font_size: 12,
            title_font_weight: FontWeight::Semibold,
            item_font_weight: FontWeight::Normal,
            position: LegendPosition::BottomRight,
            padding: 16,
            visible: true,
        }
    }
}

impl LegendSettings {
    /// Top-left corner of a `legend`-sized box inside `frame`, `padding` away
    /// from the anchored corner. Clamped to the frame origin when the legend
    /// does not fit.
    pub fn origin_in(&self, frame: (u32, u32), legend: (u32, u32)) -> (u32, u32) {
        let pad = self.padding;
        let far_x = frame.0.saturating_sub(legend.0).saturating_sub(pad);
        let far_y = frame.1.saturating_sub(legend.1).saturating_sub(pad);
        let near_x = pad.min(frame.0.saturating_sub(legend.0));
        let near_y = pad.min(frame.1.saturating_sub(legend.1));
        match self.position {
            LegendPosition::TopLeft => (near_x, near_y),
            LegendPosition::TopRight => (far_x, near_y),
            LegendPosition::BottomLeft => (near_x, far_y),
            LegendPosition::BottomRight => (far_x, far_y),
        }
    }

    fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    fn title_font_px(&self) -> u32 {
        self.font_size + 2
    }

    /// Pixel size of the legend box for `items`.
    pub fn legend_size(&self, items: &[LegendItem]) -> (u32, u32) {
        let font = self.font_size as i32;
        let pad = self.padding as i32;
        let row_h = font.max(SWATCH_PX) + ROW_GAP_PX;

        let label_w = items
            .iter()
            .map(|it| estimate_text_width_px(&it.label, self.font_size) as i32)
            .max()
            .unwrap_or(0);
        let title_w = if self.has_title() {
            estimate_text_width_px(&self.title, self.title_font_px()) as i32
        } else {
            0
        };
        let inner_w = (SWATCH_PX + SWATCH_GAP_PX + label_w).max(title_w);
        let title_h = if self.has_title() {
            self.title_font_px() as i32 + TITLE_GAP_PX
        } else {
            0
        };
        let inner_h = title_h + row_h * items.len() as i32 - ROW_GAP_PX.min(row_h);

        ((inner_w + 2 * pad) as u32, (inner_h.max(0) + 2 * pad) as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:2")]
    Photo,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Widescreen,
        AspectRatio::Standard,
        AspectRatio::Photo,
        AspectRatio::Square,
    ];

    /// Width divided by height.
    pub fn value(&self) -> f64 {
        match self {
            AspectRatio::Widescreen => 16.0 / 9.0,
            AspectRatio::Standard => 4.0 / 3.0,
            AspectRatio::Photo => 3.0 / 2.0,
            AspectRatio::Square => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
            AspectRatio::Photo => "3:2",
            AspectRatio::Square => "1:1",
        }
    }

    /// Frame of the given width with this ratio, height rounded to whole pixels.
    pub fn frame_size(&self, width: u32) -> (u32, u32) {
        let height = (width as f64 / self.value()).round() as u32;
        (width, height.max(1))
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportSettings {
    pub aspect_ratio: AspectRatio,
}

/// Heuristic pixel width of `text` at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

fn swatch_color(hex: &str) -> RGBColor {
    let c = Rgb8::from_hex(hex)
        .or_else(|| Rgb8::from_hex(DEFAULT_COLOR))
        .unwrap_or_default();
    RGBColor(c.r, c.g, c.b)
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[LegendItem],
    settings: &LegendSettings,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let family = settings.font_family.family_name();
    let pad = settings.padding as i32;
    let row_h = (settings.font_size as i32).max(SWATCH_PX) + ROW_GAP_PX;

    let mut y = pad;
    if settings.has_title() {
        let title_font = (family, settings.title_font_px())
            .into_font()
            .style(settings.title_font_weight.style());
        let title_style = TextStyle::from(title_font).pos(Pos::new(HPos::Left, VPos::Top));
        area.draw(&Text::new(settings.title.as_str(), (pad, y), title_style))
            .map_err(|e| anyhow!("{:?}", e))?;
        y += settings.title_font_px() as i32 + TITLE_GAP_PX;
    }

    let label_font = (family, settings.font_size)
        .into_font()
        .style(settings.item_font_weight.style());
    let label_style = TextStyle::from(label_font).pos(Pos::new(HPos::Left, VPos::Center));

    for item in items {
        let swatch_top = y + (row_h - ROW_GAP_PX - SWATCH_PX) / 2;
        area.draw(&Rectangle::new(
            [(pad, swatch_top), (pad + SWATCH_PX, swatch_top + SWATCH_PX)],
            swatch_color(&item.color).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            item.label.as_str(),
            (pad + SWATCH_PX + SWATCH_GAP_PX, swatch_top + SWATCH_PX / 2),
            label_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        y += row_h;
    }
    Ok(())
}

fn check_renderable(items: &[LegendItem], settings: &LegendSettings) -> Result<()> {
    if !settings.visible {
        bail!("legend is hidden");
    }
    if items.is_empty() {
        bail!("no tiers to draw in the legend");
    }
    Ok(())
}

/// Render the legend to an SVG document in memory.
pub fn legend_svg_string(items: &[LegendItem], settings: &LegendSettings) -> Result<String> {
    check_renderable(items, settings)?;
    let size = settings.legend_size(items);
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        draw_legend(&root, items, settings)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(out)
}

/// Render the legend to an SVG file at `path`.
pub fn render_legend_svg<P: AsRef<Path>>(
    items: &[LegendItem],
    settings: &LegendSettings,
    path: P,
) -> Result<()> {
    check_renderable(items, settings)?;
    let size = settings.legend_size(items);
    let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
    draw_legend(&root, items, settings)?;
    root.present().map_err(|e| anyhow!("{:?}", e))?;
    log::debug!(
        "legend with {} item(s) written to {}",
        items.len(),
        path.as_ref().display()
    );
    Ok(())
}
