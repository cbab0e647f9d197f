use spectral_markers::data::marker::Axis;
use spectral_markers::data::samples::AxisBounds;
use spectral_markers::data::view::*;

#[test]
fn x_ticks_follow_domain() {
    let mut v = ViewSettings::default();
    assert_eq!(v.format_x_tick(250.0), "250");
    assert_eq!(v.x_tick_layout(), (34, 20.0));

    v.domain = DomainType::Order;
    assert_eq!(v.format_x_tick(250.0), "2.5x");
    assert_eq!(v.x_tick_layout(), (22, 10.0));
    assert_eq!(v.format_order(150.0), "1.50x");
}

#[test]
fn tooltip_lists_visible_channels() {
    let v = ViewSettings::default();
    let lines = v.tooltip_lines(123.4, &[(Axis::X, Some(1.234)), (Axis::Z, None)]);
    assert_eq!(
        lines,
        ["Freq: 123 Hz", "Order: x1.23", "X: 1.23 mg", "Z: N/A mg"]
    );
}

#[test]
fn log_scale_raises_lower_bound() {
    let mut v = ViewSettings::default();
    let bounds = AxisBounds {
        x_min: 0.0,
        x_max: 10.0,
        y_min: -2.0,
        y_max: 9.0,
    };
    assert_eq!(v.y_range(&bounds), [-2.0, 9.0]);
    v.toggle_y_scale();
    assert_eq!(v.y_scale, YScale::Log);
    assert_eq!(v.y_range(&bounds), [0.0001, 9.0]);
    v.toggle_y_scale();
    assert_eq!(v.y_scale, YScale::Linear);
}

#[test]
fn base_frequency_is_rounded() {
    let mut v = ViewSettings::new(99.5, 0.001);
    assert_eq!(v.base_frequency(), 100.0);
    assert!(!v.set_base_frequency(-4.0));
    assert!(v.set_base_frequency(0.5));
    assert_eq!(v.base_frequency(), 1.0);
}

#[test]
fn first_visible_axis() {
    let mut axes = VisibleAxes::default();
    assert_eq!(axes.first_visible(), Some(Axis::X));
    axes.toggle(Axis::X);
    axes.toggle(Axis::Y);
    assert_eq!(axes.first_visible(), Some(Axis::Z));
    axes.toggle(Axis::Z);
    assert_eq!(axes.first_visible(), None);
}
