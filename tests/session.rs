//! End-to-end editing sessions driven through the public engine API.

#![allow(clippy::float_cmp)]

use flipbook::config::ProjectConfig;
use flipbook::doc::{ObjectBody, SceneObject};
use flipbook::engine::{Action, Engine};
use flipbook::geom::Point;
use flipbook::input::{Modifiers, Tool};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn stroke(engine: &mut Engine, from: Point, to: Point) {
    engine.on_pointer_down(from);
    engine.on_pointer_move(Point::new((from.x + to.x) / 2.0, from.y), Modifiers::default());
    engine.on_pointer_move(to, Modifiers::default());
    engine.on_pointer_up(to);
}

fn bodies(objects: &[SceneObject]) -> Vec<ObjectBody> {
    objects.iter().map(|o| o.body.clone()).collect()
}

#[test]
fn keyframe_propagation_through_the_engine() {
    init_tracing();
    let mut engine = Engine::new(ProjectConfig::default());

    engine.select_frame(2);
    stroke(&mut engine, pt(10.0, 10.0), pt(60.0, 40.0));
    let l = bodies(engine.active_objects());
    assert_eq!(l.len(), 1);

    for f in 0..2 {
        assert!(engine.timeline.exposed(f, 0).is_empty(), "frame {f}");
    }
    for f in 2..10 {
        assert_eq!(bodies(engine.timeline.exposed(f, 0)), l, "frame {f}");
    }

    engine.select_frame(5);
    engine.insert_blank_keyframe();
    stroke(&mut engine, pt(100.0, 100.0), pt(150.0, 120.0));
    let m = bodies(engine.active_objects());
    assert_ne!(m, l);

    for f in 2..5 {
        assert_eq!(bodies(engine.timeline.exposed(f, 0)), l, "frame {f}");
    }
    for f in 5..10 {
        assert_eq!(bodies(engine.timeline.exposed(f, 0)), m, "frame {f}");
        assert_eq!(bodies(&engine.timeline.cell(f, 0).unwrap().objects), m, "stored frame {f}");
    }
}

#[test]
fn animate_a_moving_stroke_and_play_it() {
    init_tracing();
    let config = ProjectConfig::from_lookup(|key| match key {
        "FLIPBOOK_FRAMES" => Some("4".to_string()),
        "FLIPBOOK_FPS" => Some("10".to_string()),
        _ => None,
    })
    .unwrap();
    let mut engine = Engine::new(config);

    stroke(&mut engine, pt(0.0, 50.0), pt(40.0, 50.0));
    let start = *engine.active_objects()[0].transform().unwrap();

    // Frame 2: duplicate the drawing and slide it right.
    engine.select_frame(2);
    engine.insert_duplicate_keyframe();
    engine.set_tool(Tool::Transform);
    let grab = start.pivot();
    let down = engine.on_pointer_down(grab);
    assert!(down.iter().any(|a| matches!(a, Action::SelectionChanged(Some(_)))));
    engine.on_pointer_move(pt(grab.x + 30.0, grab.y), Modifiers::default());
    engine.on_pointer_up(pt(grab.x + 30.0, grab.y));

    let pivot_at = |engine: &Engine, frame: usize| engine.timeline.exposed(frame, 0)[0].transform().unwrap().pivot();
    assert_eq!(pivot_at(&engine, 1), start.pivot());
    assert_eq!(pivot_at(&engine, 2).x, start.x + 30.0);
    assert_eq!(pivot_at(&engine, 3).x, start.x + 30.0);

    // Play from the top: 100 ms per frame, wrapping after the last.
    engine.select_frame(0);
    engine.play(0.0);
    let mut seen = Vec::new();
    for i in 1..=5 {
        let now = f64::from(i) * 100.0;
        for action in engine.tick(now) {
            if let Action::PlayheadMoved(f) = action {
                seen.push(f);
            }
        }
    }
    assert_eq!(seen, vec![1, 2, 3, 0, 1]);
    engine.stop();
    assert_eq!(engine.tick(10_000.0), vec![Action::PlaybackStopped]);
}

#[test]
fn erase_across_layers_only_touches_active_layer() {
    init_tracing();
    let mut engine = Engine::new(ProjectConfig::default());
    stroke(&mut engine, pt(0.0, 100.0), pt(200.0, 100.0));
    engine.add_layer();
    stroke(&mut engine, pt(0.0, 100.0), pt(200.0, 100.0));

    engine.set_tool(Tool::Eraser);
    engine.on_pointer_down(pt(100.0, 100.0));
    engine.on_pointer_up(pt(100.0, 100.0));

    assert_eq!(engine.timeline.exposed(0, 1).len(), 2);
    assert_eq!(engine.timeline.exposed(0, 0).len(), 1);
    assert!(engine.timeline.exposed(0, 1).iter().all(|o| !o.masks().is_empty()));
}

#[test]
fn timeline_snapshot_serializes_tagged_objects() {
    init_tracing();
    let mut engine = Engine::new(ProjectConfig::default());
    stroke(&mut engine, pt(0.0, 0.0), pt(20.0, 0.0));

    let json = serde_json::to_value(&engine.timeline).unwrap();
    let text = json.to_string();
    assert!(text.contains("\"type\":\"stroke\""));
    assert!(text.contains("\"#000000\""));
}
