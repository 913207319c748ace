use egui::pos2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use snotes::canvas::{
    CircleObject, ERASER_FILL, LineObject, ObjectStyle, PathCommand, PathObject, RectObject,
};
use snotes::{CanvasItem, CanvasObject, DrawableObject, EraseError, EraserRect, remove_intersecting};

fn eraser(left: f32, top: f32, width: f32, height: f32) -> (CanvasObject, EraserRect) {
    let object = CanvasObject::new(
        DrawableObject::Rect(RectObject {
            left,
            top,
            width,
            height,
        }),
        ObjectStyle {
            fill: ERASER_FILL,
            ..ObjectStyle::default()
        },
    );
    let rect = EraserRect::from_object(&object).expect("eraser fill marks the rect");
    (object, rect)
}

fn line(left: f32, top: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> CanvasObject {
    CanvasObject::new(
        DrawableObject::Line(LineObject {
            left,
            top,
            x1,
            y1,
            x2,
            y2,
        }),
        ObjectStyle::default(),
    )
}

fn circle(left: f32, top: f32, radius: f32, angle: f32) -> CanvasObject {
    CanvasObject::new(
        DrawableObject::Circle(CircleObject {
            left,
            top,
            radius,
            angle,
        }),
        ObjectStyle::default(),
    )
}

fn path(commands: Vec<PathCommand>) -> CanvasObject {
    CanvasObject::new(
        DrawableObject::Path(PathObject::new(commands)),
        ObjectStyle::default(),
    )
}

fn user_rect(left: f32, top: f32, width: f32, height: f32) -> CanvasObject {
    CanvasObject::new(
        DrawableObject::Rect(RectObject {
            left,
            top,
            width,
            height,
        }),
        ObjectStyle::default(),
    )
}

/// Runs the eraser over `objects` with the eraser appended last, as the canvas does
fn erase(objects: &[CanvasObject], eraser: (CanvasObject, EraserRect)) -> Vec<CanvasItem> {
    let (eraser_object, rect) = eraser;
    let mut items: Vec<CanvasItem> = objects.iter().cloned().map(CanvasItem::from).collect();
    items.push(eraser_object.into());
    remove_intersecting(&items, &rect).unwrap()
}

fn items(objects: &[CanvasObject]) -> Vec<CanvasItem> {
    objects.iter().cloned().map(CanvasItem::from).collect()
}

#[test]
fn test_line_inside_is_removed() {
    let inside = line(0.0, 0.0, 10.0, 10.0, 20.0, 20.0);
    let kept = erase(&[inside], eraser(0.0, 0.0, 100.0, 100.0));
    assert!(kept.is_empty());
}

#[test]
fn test_distant_line_survives_unchanged() {
    let far = line(0.0, 0.0, 200.0, 200.0, 300.0, 300.0);
    let kept = erase(&[far.clone()], eraser(0.0, 0.0, 100.0, 100.0));
    assert_eq!(kept, items(&[far]));
}

#[test]
fn test_circle_with_center_inside_is_removed() {
    // Center lands at (50, 50)
    let c = circle(40.0, 50.0, 10.0, 0.0);
    let kept = erase(&[c], eraser(0.0, 0.0, 60.0, 60.0));
    assert!(kept.is_empty());
}

#[test]
fn test_path_crossing_without_vertices_inside_is_removed() {
    let diagonal = path(vec![
        PathCommand::MoveTo(pos2(-50.0, -50.0)),
        PathCommand::LineTo(pos2(150.0, 150.0)),
    ]);
    let kept = erase(&[diagonal], eraser(0.0, 0.0, 100.0, 100.0));
    assert!(kept.is_empty());
}

#[test]
fn test_curve_crossing_eraser_edge_is_removed() {
    // Endpoints and control point lie outside, the curve bulges through x = 15
    let arc = path(vec![
        PathCommand::MoveTo(pos2(0.0, 0.0)),
        PathCommand::QuadCurveTo(pos2(30.0, 50.0), pos2(0.0, 100.0)),
    ]);
    let kept = erase(&[arc], eraser(10.0, 45.0, 15.0, 10.0));
    assert!(kept.is_empty());
}

#[test]
fn test_curve_bending_away_survives() {
    let arc = path(vec![
        PathCommand::MoveTo(pos2(0.0, 0.0)),
        PathCommand::QuadCurveTo(pos2(-30.0, 50.0), pos2(0.0, 100.0)),
    ]);
    let kept = erase(&[arc.clone()], eraser(10.0, 45.0, 15.0, 10.0));
    assert_eq!(kept, items(&[arc]));
}

#[test]
fn test_survivors_keep_their_order() {
    let a = line(0.0, 0.0, 200.0, 0.0, 210.0, 0.0);
    let hit = line(0.0, 0.0, 5.0, 5.0, 6.0, 6.0);
    let b = circle(300.0, 300.0, 5.0, 90.0);
    let c = path(vec![
        PathCommand::MoveTo(pos2(500.0, 500.0)),
        PathCommand::LineTo(pos2(510.0, 520.0)),
    ]);

    let kept = erase(
        &[a.clone(), hit, b.clone(), c.clone()],
        eraser(0.0, 0.0, 50.0, 50.0),
    );
    assert_eq!(kept, items(&[a, b, c]));
}

#[test]
fn test_eraser_is_never_returned() {
    let (eraser_object, rect) = eraser(1000.0, 1000.0, 5.0, 5.0);
    let far = line(0.0, 0.0, 1.0, 1.0, 2.0, 2.0);
    let all = vec![CanvasItem::from(eraser_object.clone()), far.clone().into()];

    let kept = remove_intersecting(&all, &rect).unwrap();
    assert_eq!(kept, items(&[far]));
    assert!(kept.iter().all(|item| item.id() != Some(eraser_object.id)));
}

#[test]
fn test_missing_eraser_is_reported() {
    let (_, rect) = eraser(0.0, 0.0, 10.0, 10.0);
    let all = items(&[line(0.0, 0.0, 1.0, 1.0, 2.0, 2.0)]);
    assert_eq!(
        remove_intersecting(&all, &rect),
        Err(EraseError::EraserNotFound(rect.id()))
    );
}

#[test]
fn test_equal_valued_rect_is_not_the_eraser() {
    // Same geometry and fill as the eraser, but a different object
    let (eraser_object, rect) = eraser(0.0, 0.0, 10.0, 10.0);
    let twin = CanvasObject::new(eraser_object.shape.clone(), eraser_object.style);

    let all = vec![CanvasItem::from(twin.clone()), eraser_object.into()];
    let kept = remove_intersecting(&all, &rect).unwrap();
    // The twin overlaps the eraser, so it is erased like any other shape
    assert!(kept.is_empty());

    let far_twin = CanvasObject::new(
        DrawableObject::Rect(RectObject {
            left: 500.0,
            top: 500.0,
            width: 10.0,
            height: 10.0,
        }),
        twin.style,
    );
    let (eraser_object, rect) = eraser(0.0, 0.0, 10.0, 10.0);
    let all = vec![CanvasItem::from(far_twin.clone()), eraser_object.into()];
    assert_eq!(remove_intersecting(&all, &rect).unwrap(), items(&[far_twin]));
}

#[test]
fn test_disjoint_objects_are_idempotent() {
    let objects = vec![
        line(0.0, 0.0, 200.0, 200.0, 300.0, 250.0),
        circle(400.0, 400.0, 20.0, 45.0),
        user_rect(150.0, 0.0, 10.0, 10.0),
    ];
    let first = erase(&objects, eraser(0.0, 0.0, 100.0, 100.0));
    assert_eq!(first, items(&objects));

    let second = erase(&objects, eraser(0.0, 0.0, 100.0, 100.0));
    assert_eq!(first, second);
}

#[test]
fn test_only_rects_touching_eraser_are_removed() {
    // Enclosing the eraser without touching it is not an overlap
    let around = user_rect(-10.0, -10.0, 200.0, 200.0);
    let crossing = user_rect(50.0, 50.0, 100.0, 100.0);

    let kept = erase(&[around.clone(), crossing], eraser(0.0, 0.0, 100.0, 100.0));
    assert_eq!(kept, items(&[around]));
}

#[test]
fn test_point_test_includes_boundary() {
    let on_edge = line(0.0, 0.0, 100.0, 50.0, 150.0, 50.0);
    let kept = erase(&[on_edge], eraser(0.0, 0.0, 100.0, 100.0));
    assert!(kept.is_empty());
}

#[test]
fn test_circle_fast_path_excludes_tangency() {
    // Center (110, 50), radius 10: touches x = 100 exactly.
    // The fast path needs distance strictly below the radius
    let tangent = circle(100.0, 50.0, 10.0, 0.0);
    let bounds = egui::Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
    let DrawableObject::Circle(shape) = tangent.shape else {
        unreachable!()
    };
    assert!(!snotes::geometry::circle_overlaps_rect(
        shape.center(),
        shape.radius,
        bounds
    ));

    let clear = circle(101.0, 50.0, 10.0, 0.0);
    let kept = erase(&[clear.clone()], eraser(0.0, 0.0, 100.0, 100.0));
    assert_eq!(kept, items(&[clear]));
}

#[test]
fn test_circle_enclosing_eraser_is_removed() {
    let big = circle(-200.0, 50.0, 250.0, 0.0);
    let kept = erase(&[big], eraser(0.0, 0.0, 100.0, 100.0));
    assert!(kept.is_empty());
}

#[test]
fn test_zero_radius_circle_is_a_dot() {
    // A dot is erased wherever its center would be, inside or on the edge
    let dot_inside = circle(50.0, 50.0, 0.0, 0.0);
    let dot_on_edge = circle(100.0, 50.0, 0.0, 0.0);
    let dot_outside = circle(500.0, 10.0, 0.0, 0.0);
    let kept = erase(
        &[dot_inside, dot_on_edge, dot_outside.clone()],
        eraser(0.0, 0.0, 100.0, 100.0),
    );
    assert_eq!(kept, items(&[dot_outside]));
}

#[test]
fn test_curved_path_inside_eraser_is_removed() {
    let squiggle = path(vec![
        PathCommand::MoveTo(pos2(20.0, 20.0)),
        PathCommand::QuadCurveTo(pos2(40.0, 10.0), pos2(60.0, 30.0)),
        PathCommand::LineTo(pos2(70.0, 70.0)),
        PathCommand::QuadCurveTo(pos2(50.0, 80.0), pos2(30.0, 60.0)),
        PathCommand::Close,
    ]);
    let kept = erase(&[squiggle], eraser(0.0, 0.0, 100.0, 100.0));
    assert!(kept.is_empty());
}

#[test]
fn test_closing_edge_alone_can_touch() {
    // Only the edge back from (120, -20) to (-20, 50) crosses the eraser
    let open = vec![
        PathCommand::MoveTo(pos2(-20.0, 50.0)),
        PathCommand::LineTo(pos2(-20.0, -20.0)),
        PathCommand::LineTo(pos2(120.0, -20.0)),
    ];
    let mut closed = open.clone();
    closed.push(PathCommand::Close);

    let open = path(open);
    let kept = erase(&[open.clone(), path(closed)], eraser(0.0, 0.0, 100.0, 100.0));
    assert_eq!(kept, items(&[open]));
}

fn coord(rng: &mut StdRng) -> f32 {
    rng.gen_range(-200.0..300.0)
}

fn random_object(rng: &mut StdRng) -> CanvasObject {
    match rng.gen_range(0..4) {
        0 => line(
            coord(rng),
            coord(rng),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
        ),
        1 => {
            let radius = if rng.gen_bool(0.1) { 0.0 } else { rng.gen_range(0.5..40.0) };
            circle(coord(rng), coord(rng), radius, rng.gen_range(0.0..360.0))
        }
        2 => {
            let mut commands = vec![PathCommand::MoveTo(pos2(coord(rng), coord(rng)))];
            for _ in 0..rng.gen_range(1..5) {
                commands.push(if rng.gen_bool(0.5) {
                    PathCommand::LineTo(pos2(coord(rng), coord(rng)))
                } else {
                    PathCommand::QuadCurveTo(pos2(coord(rng), coord(rng)), pos2(coord(rng), coord(rng)))
                });
            }
            if rng.gen_bool(0.3) {
                commands.push(PathCommand::Close);
            }
            path(commands)
        }
        _ => user_rect(
            coord(rng),
            coord(rng),
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
        ),
    }
}

#[test]
fn test_random_canvases_follow_eraser_rules() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..300 {
        let count = rng.gen_range(0..12);
        let objects: Vec<CanvasObject> = (0..count).map(|_| random_object(&mut rng)).collect();
        let (eraser_object, rect) = eraser(
            rng.gen_range(-50.0..150.0),
            rng.gen_range(-50.0..150.0),
            rng.gen_range(-120.0..120.0),
            rng.gen_range(-120.0..120.0),
        );
        let bounds = rect.bounds();
        let kept = erase(&objects, (eraser_object.clone(), rect));

        assert!(kept.len() <= objects.len());
        assert!(kept.iter().all(|item| item.id() != Some(eraser_object.id)));

        // Survivors appear in their original order
        let mut remaining = objects.iter();
        for item in &kept {
            assert!(remaining.any(|object| Some(object.id) == item.id()));
        }

        for object in &objects {
            let extent = object.shape.bounds();
            let survived = kept.iter().any(|item| item.id() == Some(object.id));
            // The margin covers curve flattening of circle outlines
            if !extent.expand(1.0).intersects(bounds) {
                assert!(survived, "{:?} is clear of {:?}", object.shape, bounds);
            }
            if bounds.contains_rect(extent) {
                assert!(!survived, "{:?} lies inside {:?}", object.shape, bounds);
            }
        }

        let mut again = kept.clone();
        again.push(eraser_object.into());
        assert_eq!(remove_intersecting(&again, &rect).unwrap(), kept);
    }
}

#[test]
fn test_malformed_objects_survive() {
    let negative = circle(10.0, 10.0, -5.0, 0.0);
    let draw_first = path(vec![
        PathCommand::LineTo(pos2(10.0, 10.0)),
        PathCommand::LineTo(pos2(20.0, 20.0)),
    ]);
    let unreadable: CanvasItem =
        serde_json::from_value(json!({ "shape": { "type": "triangle", "a": 1 } })).unwrap();
    assert!(matches!(unreadable, CanvasItem::Malformed(_)));

    let (eraser_object, rect) = eraser(0.0, 0.0, 100.0, 100.0);
    let all = vec![
        CanvasItem::from(negative.clone()),
        unreadable.clone(),
        CanvasItem::from(draw_first.clone()),
        CanvasItem::from(line(0.0, 0.0, 1.0, 1.0, 2.0, 2.0)),
        eraser_object.into(),
    ];

    let kept = remove_intersecting(&all, &rect).unwrap();
    assert_eq!(kept, vec![negative.into(), unreadable, draw_first.into()]);
}

#[test]
fn test_result_never_grows() {
    let objects = vec![
        line(0.0, 0.0, 10.0, 10.0, 90.0, 90.0),
        line(0.0, 0.0, 200.0, 200.0, 300.0, 300.0),
        circle(0.0, 0.0, 5.0, 0.0),
        path(vec![
            PathCommand::MoveTo(pos2(-10.0, 50.0)),
            PathCommand::QuadCurveTo(pos2(50.0, -40.0), pos2(110.0, 50.0)),
        ]),
    ];
    let kept = erase(&objects, eraser(20.0, 20.0, 30.0, 30.0));
    assert!(kept.len() <= objects.len());
    for item in &kept {
        assert!(objects.iter().any(|o| Some(o.id) == item.id()));
    }
}
