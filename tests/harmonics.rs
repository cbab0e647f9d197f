use spectral_markers::data::harmonics::expand_harmonics;
use spectral_markers::data::marker::*;

fn marker_100hz() -> Marker {
    let mut m = Marker::new("Shaft", 100.0, Axis::X);
    m.harmonics = 2;
    m.sub_harmonics = 1;
    m.side_bands = SideBands {
        enabled: true,
        count: 1,
        spacing: 10.0,
        left_enabled: true,
        right_enabled: true,
    };
    m
}

#[test]
fn expands_sub_harmonics_harmonics_then_side_bands() {
    let hs = expand_harmonics(&marker_100hz());
    let freqs: Vec<f64> = hs.iter().map(|h| h.frequency).collect();
    assert_eq!(freqs, vec![50.0, 200.0, 300.0, 90.0, 110.0]);

    assert_eq!(hs[0].order.as_deref(), Some("1/2"));
    assert!(hs[0].is_harmonic && !hs[0].is_side_band);
    assert!(hs[1].is_harmonic && hs[1].order.is_none());
    assert_eq!(hs[3].side, Some(SideBandSide::Left));
    assert_eq!(hs[4].side, Some(SideBandSide::Right));
    assert!(hs[3].is_side_band && !hs[3].is_harmonic);
    assert!(hs.iter().all(|h| h.band_width == 20.0));
}

#[test]
fn expansion_is_idempotent() {
    let m = marker_100hz();
    assert_eq!(expand_harmonics(&m), expand_harmonics(&m));
    assert_eq!(m.harmonic_markers(), expand_harmonics(&m));
}

#[test]
fn sub_harmonics_round_half_up() {
    let mut m = Marker::new("odd", 101.0, Axis::X);
    m.sub_harmonics = 3;
    let freqs: Vec<f64> = expand_harmonics(&m).iter().map(|h| h.frequency).collect();
    // 50.5 -> 51, 33.67 -> 34, 25.25 -> 25
    assert_eq!(freqs, vec![51.0, 34.0, 25.0]);
    let orders: Vec<_> = expand_harmonics(&m)
        .into_iter()
        .map(|h| h.order.unwrap())
        .collect();
    assert_eq!(orders, ["1/2", "1/3", "1/4"]);
}

#[test]
fn side_bands_interleave_per_step_and_keep_fractions() {
    let mut m = Marker::new("gear", 100.0, Axis::Y);
    m.side_bands = SideBands {
        enabled: true,
        count: 2,
        spacing: 2.5,
        left_enabled: true,
        right_enabled: true,
    };
    let freqs: Vec<f64> = expand_harmonics(&m).iter().map(|h| h.frequency).collect();
    assert_eq!(freqs, vec![97.5, 102.5, 95.0, 105.0]);
}

#[test]
fn one_sided_and_disabled_side_bands() {
    let mut m = Marker::new("gear", 100.0, Axis::Y);
    m.side_bands.count = 3;
    assert!(expand_harmonics(&m).is_empty(), "disabled by default");

    m.side_bands.enabled = true;
    m.side_bands.left_enabled = false;
    let hs = expand_harmonics(&m);
    assert_eq!(hs.len(), 3);
    assert!(hs.iter().all(|h| h.side == Some(SideBandSide::Right)));

    m.side_bands.right_enabled = false;
    assert!(expand_harmonics(&m).is_empty());
}

#[test]
fn harmonic_labels() {
    let hs = expand_harmonics(&marker_100hz());
    assert_eq!(hs[1].label(), "200 Hz");
    assert_eq!(hs[3].label(), "90 Hz");
}

#[test]
fn expansion_tracks_marker_changes() {
    let mut store = spectral_markers::data::markers::MarkerStore::default();
    let i = store.create_marker(100.0, Axis::X, "").unwrap();
    store.update(i, MarkerUpdate::Harmonics(1)).unwrap();
    assert_eq!(store.get(i).unwrap().harmonic_markers()[0].frequency, 200.0);
    store.update(i, MarkerUpdate::Frequency(120.0)).unwrap();
    assert_eq!(store.get(i).unwrap().harmonic_markers()[0].frequency, 240.0);
}
