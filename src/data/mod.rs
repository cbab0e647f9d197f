pub mod harmonics;
pub mod marker;
pub mod marker_csv;
pub mod markers;
pub mod overlay_look;
pub mod samples;
pub mod thresholds;
pub mod view;
pub mod window;
