use super::*;

fn p(x: f64, y: f64) -> Point<f64> {
    Point::new(x, y)
}

fn collinear_segments() -> Vec<Segment<f64>> {
    (1..=10)
        .map(|i| Segment::new(p(0.0, i as f64), p(i as f64, i as f64)))
        .collect()
}

#[test]
fn scenario_segmental_knn_to_point_collinear() {
    let tree = SegTree::new(collinear_segments()).unwrap();
    let got = tree.n_nearest_to_point_indices(2, p(0.0, 0.0)).unwrap();
    assert_eq!(got, vec![0, 1]);
}

#[test]
fn scenario_segmental_nearest_intersecting_probe() {
    let tree = SegTree::new(collinear_segments()).unwrap();
    let probe = Segment::new(p(0.0, 0.0), p(10.0, 0.0));
    let nearest = tree.nearest_item(&probe).unwrap();
    assert_eq!(nearest.1, Segment::new(p(0.0, 1.0), p(1.0, 1.0)));
    assert_eq!(tree.nearest_index(&probe).unwrap(), 0);
}

#[test]
fn primitive_at_matches_input_order() {
    let segs = collinear_segments();
    let tree = SegTree::new(segs.clone()).unwrap();
    for (i, s) in segs.iter().enumerate() {
        assert_eq!(tree.segments()[i], *s);
    }
}

#[test]
fn knn_to_point_matches_brute_force() {
    let segs: Vec<_> = (0..60)
        .map(|i| {
            let x = (i * 7 % 29) as f64;
            let y = (i * 13 % 23) as f64;
            Segment::new(p(x, y), p(x + 2.0, y + 1.0))
        })
        .collect();
    let tree = SegTree::new_with_max_children(segs.clone(), 5).unwrap();
    let probe = p(10.0, 10.0);

    let mut all: Vec<f64> = segs
        .iter()
        .map(|s| s.squared_distance_to_point(probe))
        .collect();
    all.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let got = tree.n_nearest_to_point_indices(6, probe).unwrap();
    let mut got_dists: Vec<f64> = got
        .iter()
        .map(|&i| segs[i].squared_distance_to_point(probe))
        .collect();
    got_dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(got_dists, all[..6]);
}

#[test]
fn knn_to_segment_finds_zero_distance_intersection_first() {
    let segs: Vec<_> = (0..20)
        .map(|i| {
            let x = i as f64 * 3.0;
            Segment::new(p(x, 0.0), p(x + 1.0, 5.0))
        })
        .collect();
    let tree = SegTree::new_with_max_children(segs, 4).unwrap();
    // crosses the segment at index 3 (x in [9, 10])
    let probe = Segment::new(p(9.5, -1.0), p(9.5, 6.0));
    let nearest = tree.nearest_item(&probe).unwrap();
    assert_eq!(nearest.0, 3);
}

#[test]
fn n_exceeding_len_returns_every_index() {
    let tree = SegTree::new(collinear_segments()).unwrap();
    let got = tree.n_nearest_to_point_indices(100, p(0.0, 0.0)).unwrap();
    assert_eq!(got.len(), 10);
}

#[test]
fn rejects_invalid_max_children() {
    let err = SegTree::new_with_max_children(collinear_segments(), 1).unwrap_err();
    assert!(matches!(err, GeoIndexError::InvalidMaxChildren { got: 1 }));
}
