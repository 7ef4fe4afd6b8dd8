use georoute_core::*;

fn corridor() -> GeoGraph {
    // a zig-zag corridor with a few long shortcuts
    let cities: Vec<City> = (0..24)
        .map(|i| {
            let lat = if i % 2 == 0 { 0.0 } else { 0.45 };
            City::new(i, format!("z{i}"), "S", lat, i as f64 * 0.35, 1_000 + (i as u64 * 131) % 97)
        })
        .collect();
    build(&cities, Some(0.95), None).unwrap()
}

fn route_certainty(g: &GeoGraph, path: &[CityId], max_distance: f64, params: &FuzzyParams) -> f64 {
    path.windows(2)
        .map(|w| membership(g.edge(w[0], w[1]).unwrap().weight, max_distance, params))
        .fold(1.0, f64::min)
}

#[test]
fn reported_certainty_matches_the_route() {
    let g = corridor();
    let params = FuzzyParams::default();
    let r = fuzzy(&g, 0, 23, Some(0.95), None);
    let path = r.path.clone().unwrap();
    assert_eq!(path.first(), Some(&0));
    assert_eq!(path.last(), Some(&23));
    let c = route_certainty(&g, &path, 0.95, &params);
    assert!((r.certainty.unwrap() - c).abs() < 1e-12);
    assert!((path_distance(&g, &path).unwrap() - r.total_distance).abs() < 1e-9);
}

#[test]
fn extending_a_route_never_raises_certainty() {
    let g = corridor();
    let params = FuzzyParams::default();
    let path = fuzzy(&g, 0, 23, Some(0.95), None).path.unwrap();
    let mut last = 1.0;
    for k in 2..=path.len() {
        let c = route_certainty(&g, &path[..k], 0.95, &params);
        assert!(c <= last);
        last = c;
    }
}

#[test]
fn no_other_engine_finds_a_more_certain_route() {
    let g = corridor();
    let params = FuzzyParams::default();
    let best = fuzzy(&g, 0, 23, Some(0.95), None).certainty.unwrap();
    for r in [dijkstra(&g, 0, 23), a_star(&g, 0, 23, None), bfs(&g, 0, 23, 5_000), dfs(&g, 0, 23, None)] {
        let c = route_certainty(&g, &r.path.unwrap(), 0.95, &params);
        assert!(c <= best + 1e-12, "{c} > {best}");
    }
}

#[test]
fn custom_params_shift_certainty() {
    let g = corridor();
    let strict = FuzzyParams { alpha: 10.0, min_certainty: 0.0, decay_factor: 1.0 };
    let loose = FuzzyParams { alpha: 1.0, ..FuzzyParams::default() };
    let a = fuzzy_with(&g, 0, 23, Some(0.95), None, &strict, &ZeroHeuristic);
    let b = fuzzy_with(&g, 0, 23, Some(0.95), None, &loose, &ZeroHeuristic);
    assert_eq!(b.certainty, Some(1.0), "every edge is within max_distance / 1");
    assert!(a.certainty.unwrap() < b.certainty.unwrap());
}

#[test]
fn kilometre_bound_converts_on_degree_graphs() {
    let g = corridor();
    let by_deg = fuzzy(&g, 0, 23, Some(0.95), None);
    let by_km = fuzzy(&g, 0, 23, None, Some(0.95 * KM_PER_DEGREE));
    assert_eq!(by_deg.path, by_km.path);
    assert!((by_deg.certainty.unwrap() - by_km.certainty.unwrap()).abs() < 1e-12);
}
