#![allow(clippy::float_cmp)]

use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn fewer_than_two_samples_pass_through() {
    assert!(catmull_rom(&[], 20).is_empty());
    assert_eq!(catmull_rom(&pts(&[(3.0, 4.0)]), 20), pts(&[(3.0, 4.0)]));
}

#[test]
fn output_length_matches_subdivision() {
    let samples = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 5.0), (30.0, 0.0)]);
    assert_eq!(catmull_rom(&samples, 3).len(), 3 * 3 + 1);
    assert_eq!(catmull_rom(&samples, 20).len(), 3 * 20 + 1);
}

#[test]
fn curve_passes_through_every_sample() {
    let samples = pts(&[(0.0, 0.0), (10.0, 8.0), (20.0, -3.0), (35.0, 2.0)]);
    let steps = 4;
    let out = catmull_rom(&samples, steps);
    for (i, sample) in samples.iter().enumerate() {
        let p = out[i * steps];
        assert!((p.x - sample.x).abs() < 1e-9 && (p.y - sample.y).abs() < 1e-9, "sample {i}: {p:?}");
    }
}

#[test]
fn collinear_evenly_spaced_samples_stay_on_the_line() {
    let samples = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
    let out = catmull_rom(&samples, 5);
    assert!(out.iter().all(|p| p.y == 0.0));
    // Interior segment of a uniform line is linear in t.
    assert!((out[5 + 2].x - 14.0).abs() < 1e-9);
}

#[test]
fn spline_midpoint_matches_formula() {
    let samples = pts(&[(0.0, 0.0), (10.0, 10.0)]);
    // Padded window is (p0, p0, p1, p1); at t = 0.5 the curve is at the midpoint.
    let out = catmull_rom(&samples, 2);
    assert_eq!(out.len(), 3);
    assert!((out[1].x - 5.0).abs() < 1e-9);
    assert!((out[1].y - 5.0).abs() < 1e-9);
}

#[test]
fn center_on_bounds_shifts_to_box_center() {
    let (local, center) = center_on_bounds(&pts(&[(10.0, 20.0), (30.0, 60.0), (20.0, 40.0)]));
    assert_eq!(center, Point::new(20.0, 40.0));
    assert_eq!(local, pts(&[(-10.0, -20.0), (10.0, 20.0), (0.0, 0.0)]));
}

#[test]
fn center_on_bounds_empty() {
    let (local, center) = center_on_bounds(&[]);
    assert!(local.is_empty());
    assert_eq!(center, Point::default());
}
