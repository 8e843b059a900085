#![allow(clippy::float_cmp)]

use super::*;

fn make_stroke(points: &[(f64, f64)]) -> SceneObject {
    SceneObject::stroke(
        points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        Style::new(Color::BLACK, 6.0),
        Transform::at(Point::new(100.0, 50.0)),
    )
}

fn make_fill() -> SceneObject {
    SceneObject::fill(FillRegion {
        position: Point::new(10.0, 10.0),
        width: 5.0,
        height: 5.0,
        color: Color::RED,
        opacity: 1.0,
    })
}

// =============================================================
// Color
// =============================================================

#[test]
fn color_parses_long_hex() {
    assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
}

#[test]
fn color_parses_short_hex_without_hash() {
    assert_eq!(Color::from_hex("f0a").unwrap(), Color::rgb(255, 0, 170));
}

#[test]
fn color_parses_alpha_hex() {
    let c = Color::from_hex("#00000080").unwrap();
    assert_eq!(c.a, 0x80);
    assert_eq!(c.to_string(), "#00000080");
}

#[test]
fn color_rejects_bad_input() {
    for raw in ["", "#12", "#gggggg", "#12345", "#ff00ff0"] {
        assert!(Color::from_hex(raw).is_err(), "{raw:?} should be rejected");
    }
}

#[test]
fn color_display_omits_opaque_alpha() {
    assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
}

#[test]
fn color_serde_as_hex_string() {
    let json = serde_json::to_string(&Color::RED).unwrap();
    assert_eq!(json, "\"#ff0000\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::RED);
}

#[test]
fn color_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<Color>("\"tomato\"").is_err());
}

// =============================================================
// Style / ShapeKind
// =============================================================

#[test]
fn style_new_is_opaque() {
    assert_eq!(Style::new(Color::BLACK, 3.0).opacity, 1.0);
}

#[test]
fn style_opacity_is_clamped() {
    assert_eq!(Style::new(Color::BLACK, 3.0).with_opacity(1.7).opacity, 1.0);
    assert_eq!(Style::new(Color::BLACK, 3.0).with_opacity(-0.2).opacity, 0.0);
}

#[test]
fn shape_kind_serde_lowercase() {
    let cases = [(ShapeKind::Line, "\"line\""), (ShapeKind::Rect, "\"rect\""), (ShapeKind::Circle, "\"circle\"")];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
    }
}

#[test]
fn object_body_tagged_by_type() {
    let value = serde_json::to_value(&make_fill().body).unwrap();
    assert_eq!(value["type"], "fill");
    assert_eq!(value["color"], "#ff0000");
}

#[test]
fn masks_omitted_when_empty() {
    let value = serde_json::to_value(&make_stroke(&[(0.0, 0.0)]).body).unwrap();
    assert!(value.get("masks").is_none());
}

// =============================================================
// SceneObject identity
// =============================================================

#[test]
fn new_objects_get_distinct_ids() {
    let a = make_stroke(&[(0.0, 0.0)]);
    let b = make_stroke(&[(0.0, 0.0)]);
    assert_ne!(a.id, b.id);
}

#[test]
fn deep_copy_is_equal_but_independent() {
    let original = make_stroke(&[(0.0, 0.0), (4.0, 4.0)]);
    let mut copy = original.deep_copy();
    assert_eq!(copy, original);
    assert_ne!(copy.id, original.id);

    copy.transform_mut().unwrap().x = 999.0;
    assert_ne!(copy, original);
    assert_eq!(original.transform().unwrap().x, 100.0);
}

#[test]
fn transform_mut_bumps_revision() {
    let mut obj = make_stroke(&[(0.0, 0.0)]);
    assert_eq!(obj.revision, 0);
    obj.transform_mut().unwrap().rotation = 1.0;
    assert_eq!(obj.revision, 1);
}

#[test]
fn fill_has_no_transform() {
    let mut fill = make_fill();
    assert!(fill.transform().is_none());
    assert!(fill.transform_mut().is_none());
    assert!(!fill.is_transformable());
}

// =============================================================
// Bounding boxes
// =============================================================

#[test]
fn stroke_bounding_box_is_local_and_unscaled() {
    let mut obj = make_stroke(&[(-10.0, -4.0), (10.0, 4.0), (2.0, 0.0)]);
    obj.transform_mut().unwrap().scale_x = 3.0;
    let bbox = obj.bounding_box().unwrap();
    assert_eq!(bbox.center(), Point::new(0.0, 0.0));
    assert_eq!(bbox.width, 20.0);
    assert_eq!(bbox.height, 8.0);
}

#[test]
fn shape_bounding_box_spans_start_and_end() {
    let obj = SceneObject::shape(
        ShapeKind::Rect,
        Point::new(5.0, -5.0),
        Point::new(-15.0, 5.0),
        Style::new(Color::BLACK, 3.0),
        Transform::default(),
    );
    let bbox = obj.bounding_box().unwrap();
    assert_eq!(bbox.center(), Point::new(-5.0, 0.0));
    assert_eq!(bbox.width, 20.0);
    assert_eq!(bbox.height, 10.0);
}

#[test]
fn empty_stroke_and_fill_have_no_bounding_box() {
    assert!(make_stroke(&[]).bounding_box().is_none());
    assert!(make_fill().bounding_box().is_none());
}

#[test]
fn hit_padding_is_half_stroke_width() {
    assert_eq!(make_stroke(&[(0.0, 0.0)]).hit_padding(), 3.0);
    assert_eq!(make_fill().hit_padding(), 0.0);
}
