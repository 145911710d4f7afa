use std::fs;
use tempfile::tempdir;
use tileset_lab::legend::{self, AspectRatio, LegendPosition, LegendSettings};
use tileset_lab::TierStore;

fn store() -> TierStore {
    let mut s = TierStore::new();
    s.apply_scheme("population", vec![10.0, 20.0, 30.0, 40.5], "Teal");
    s
}

#[test]
fn svg_legend_lists_every_tier() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legend.svg");
    let items = store().legend_items();
    assert_eq!(items.len(), 4);

    legend::render_legend_svg(&items, &LegendSettings::default(), &path).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    for label in ["≤ 10", "10 - 20", "20 - 30", "30 - 40.5", "Legend"] {
        assert!(svg.contains(label), "missing {label}");
    }
}

#[test]
fn untitled_legend_is_shorter() {
    let items = store().legend_items();
    let titled = LegendSettings::default();
    let untitled = LegendSettings {
        title: String::new(),
        ..LegendSettings::default()
    };
    assert!(untitled.legend_size(&items).1 < titled.legend_size(&items).1);
    let svg = legend::legend_svg_string(&items, &untitled).unwrap();
    assert!(!svg.contains("Legend"));
}

#[test]
fn legend_fits_inside_an_exported_frame() {
    let items = store().legend_items();
    let settings = LegendSettings {
        position: LegendPosition::TopRight,
        ..LegendSettings::default()
    };
    let frame = AspectRatio::Widescreen.frame_size(1280);
    assert_eq!(frame, (1280, 720));
    let size = settings.legend_size(&items);
    let (x, y) = settings.origin_in(frame, size);
    assert_eq!(y, settings.padding);
    assert_eq!(x + size.0 + settings.padding, frame.0);
}

#[test]
fn inactive_classification_has_nothing_to_draw() {
    let mut s = store();
    s.clear_tier();
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    assert!(legend::render_legend_svg(&s.legend_items(), &LegendSettings::default(), &path).is_err());
    assert!(!path.exists());
}
