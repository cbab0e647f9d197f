use spectral_markers::config::{MarkerDefaults, MarkerLimits};
use spectral_markers::data::marker::*;
use spectral_markers::data::markers::MarkerStore;
use spectral_markers::error::EngineError;

fn store_with(n: usize) -> MarkerStore {
    let mut store = MarkerStore::default();
    for i in 0..n {
        store.create_marker(100.0 * (i + 1) as f64, Axis::X, "").unwrap();
    }
    store
}

fn display_names(store: &MarkerStore) -> Vec<String> {
    store.display_order().map(|(_, m)| m.name.clone()).collect()
}

#[test]
fn create_uses_defaults_and_generated_name() {
    let mut store = MarkerStore::default();
    let i = store.create_marker(99.6, Axis::Y, "").unwrap();
    let m = store.get(i).unwrap();
    assert_eq!(m.name, "Marker 1");
    assert_eq!(m.frequency, 100);
    assert_eq!(m.band_width, 20.0);
    assert_eq!(m.axis, Axis::Y);
    assert!(m.visible);
    assert!(!m.side_bands.enabled);
    assert_eq!(m.side_bands.count, 2);
    assert_eq!(m.side_bands.spacing, 10.0);
    assert_eq!(m.color, marker_color(0));

    let j = store.create_marker(10.0, Axis::X, "").unwrap();
    assert_eq!(store.get(j).unwrap().name, "Marker 2");
    assert_eq!(store.get(j).unwrap().color, marker_color(1));
}

#[test]
fn custom_defaults_apply_to_new_markers() {
    let defaults = MarkerDefaults {
        band_width: 5.0,
        side_band_count: 4,
        side_band_spacing: 2.5,
        side_band_left: false,
        side_band_right: true,
    };
    let mut store = MarkerStore::new(defaults, MarkerLimits::default());
    let i = store.create_marker(50.0, Axis::Z, "bearing").unwrap();
    let m = store.get(i).unwrap();
    assert_eq!(m.band_width, 5.0);
    assert_eq!(m.side_bands.count, 4);
    assert_eq!(m.side_bands.direction_code(), "R");
}

#[test]
fn color_counter_never_reuses_after_removal() {
    let mut store = store_with(2);
    store.remove(1).unwrap();
    let i = store.create_marker(1.0, Axis::X, "").unwrap();
    assert_eq!(store.get(i).unwrap().color, marker_color(2));
    assert_eq!(store.color_index(), 3);
}

/// Small xorshift generator so mutation sequences are reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

#[test]
fn order_stays_a_permutation_across_mutations() {
    for seed in [1u64, 7, 42, 0x9e37_79b9_7f4a_7c15, 123_456_789] {
        let mut rng = XorShift(seed);
        let mut store = store_with(3);
        for step in 0..400 {
            let len = store.len();
            match rng.below(3) {
                0 => {
                    store
                        .create_marker(rng.below(5000) as f64, Axis::X, "")
                        .unwrap();
                }
                1 if len > 0 => {
                    store.remove(rng.below(len)).unwrap();
                }
                2 if len > 0 => {
                    let (from, to) = (rng.below(len), rng.below(len));
                    store.move_in_display_order(from, to).unwrap();
                }
                _ => {
                    assert!(store.remove(0).is_err());
                }
            }
            assert!(
                store.order_is_consistent(),
                "seed {seed} step {step}: {:?}",
                store.order()
            );
            assert_eq!(store.order().len(), store.len());
        }
    }
}

#[test]
fn non_finite_click_frequency_is_rejected() {
    let mut store = MarkerStore::default();
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(
            store.create_marker(f, Axis::X, "").unwrap_err(),
            EngineError::NonFiniteFrequency
        );
    }
    assert!(store.is_empty());
    assert_eq!(store.color_index(), 0);
}

#[test]
fn added_and_edited_counts_are_capped() {
    let mut store = MarkerStore::default();
    let mut m = Marker::new("big", 100.0, Axis::Y);
    m.harmonics = u32::MAX;
    m.sub_harmonics = 500;
    m.side_bands.count = u32::MAX;
    let i = store.add(m);
    let stored = store.get(i).unwrap();
    assert_eq!(stored.harmonics, 20);
    assert_eq!(stored.sub_harmonics, 10);
    assert_eq!(stored.side_bands.count, 10);

    store
        .update(i, MarkerUpdate::SideBand(SideBandUpdate::Count(3)))
        .unwrap();
    assert_eq!(store.get(i).unwrap().side_bands.count, 3);
    store
        .update(i, MarkerUpdate::SideBand(SideBandUpdate::Count(500)))
        .unwrap();
    assert_eq!(store.get(i).unwrap().side_bands.count, 10);
}

#[test]
fn remove_keeps_relative_display_order() {
    let mut store = store_with(4);
    // display: Marker 4, Marker 1, Marker 2, Marker 3
    store.move_in_display_order(3, 0).unwrap();
    store.remove(1).unwrap(); // Marker 2
    assert_eq!(display_names(&store), ["Marker 4", "Marker 1", "Marker 3"]);
    assert_eq!(store.order(), &[2, 0, 1]);
}

#[test]
fn move_changes_display_not_storage() {
    let mut store = store_with(3);
    store.move_in_display_order(0, 2).unwrap();
    assert_eq!(display_names(&store), ["Marker 2", "Marker 3", "Marker 1"]);
    assert_eq!(store.markers()[0].name, "Marker 1");
}

#[test]
fn out_of_range_indices_are_errors() {
    let mut store = store_with(2);
    assert_eq!(
        store.remove(5).unwrap_err(),
        EngineError::MarkerIndex { index: 5, len: 2 }
    );
    assert_eq!(
        store.move_in_display_order(0, 2).unwrap_err(),
        EngineError::DisplayPosition { position: 2, len: 2 }
    );
    assert!(store.update(9, MarkerUpdate::Visible(false)).is_err());
    assert!(store.toggle_visibility(2).is_err());
    assert_eq!(store.len(), 2);
}

#[test]
fn frequency_update_is_rounded() {
    let mut store = store_with(1);
    assert!(store.update(0, MarkerUpdate::Frequency(150.5)).unwrap());
    assert_eq!(store.get(0).unwrap().frequency, 151);
    store.update(0, MarkerUpdate::Frequency(149.4)).unwrap();
    assert_eq!(store.get(0).unwrap().frequency, 149);
}

#[test]
fn non_finite_update_is_rejected() {
    let mut store = store_with(1);
    assert!(!store.update(0, MarkerUpdate::Frequency(f64::NAN)).unwrap());
    assert!(!store
        .update(0, MarkerUpdate::SideBand(SideBandUpdate::Spacing(f64::INFINITY)))
        .unwrap());
    let m = store.get(0).unwrap();
    assert_eq!(m.frequency, 100);
    assert_eq!(m.side_bands.spacing, 10.0);
}

#[test]
fn side_band_updates_touch_only_side_bands() {
    let mut store = store_with(1);
    let before = store.get(0).unwrap().clone();
    store
        .update(0, MarkerUpdate::SideBand(SideBandUpdate::Enabled(true)))
        .unwrap();
    store
        .update(0, MarkerUpdate::SideBand(SideBandUpdate::Count(3)))
        .unwrap();
    store
        .update(0, MarkerUpdate::SideBand(SideBandUpdate::LeftEnabled(false)))
        .unwrap();
    let after = store.get(0).unwrap();
    assert!(after.side_bands.enabled);
    assert_eq!(after.side_bands.count, 3);
    assert!(!after.side_bands.left_enabled);
    assert_eq!(after.frequency, before.frequency);
    assert_eq!(after.name, before.name);
    assert_eq!(after.harmonics, before.harmonics);
}

#[test]
fn updates_are_clamped_to_limits() {
    let mut store = store_with(1);
    store.update(0, MarkerUpdate::Harmonics(50)).unwrap();
    store.update(0, MarkerUpdate::SubHarmonics(50)).unwrap();
    store.update(0, MarkerUpdate::BandWidth(-3.0)).unwrap();
    store
        .update(0, MarkerUpdate::Name("a very long marker name indeed".into()))
        .unwrap();
    let m = store.get(0).unwrap();
    assert_eq!(m.harmonics, 20);
    assert_eq!(m.sub_harmonics, 10);
    assert_eq!(m.band_width, 0.0);
    assert_eq!(m.name.chars().count(), 20);
}

#[test]
fn toggle_visibility_flips() {
    let mut store = store_with(1);
    assert!(!store.toggle_visibility(0).unwrap());
    assert!(store.toggle_visibility(0).unwrap());
}

#[test]
fn set_order_requires_permutation() {
    let mut store = store_with(3);
    assert!(!store.set_order(vec![0, 0, 1]));
    assert!(!store.set_order(vec![0, 1]));
    assert!(store.set_order(vec![2, 0, 1]));
    assert_eq!(display_names(&store), ["Marker 3", "Marker 1", "Marker 2"]);
}
