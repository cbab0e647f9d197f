//! CSV export/import of the marker collection.
//!
//! Column layout:
//! `Name,Order,Frequency (Hz),Band Size (Hz),Harmonics,Sub-Harmonics,Axis,Side Bands,Count,Spacing,Left/Right`
//!
//! Export walks the display order. Import validates every row before touching
//! the store, so a bad row leaves the existing markers untouched.

use std::io::Write;

use crate::data::marker::{clamp_count, round_to_i64, Axis, Marker, SideBands};
use crate::config::MarkerLimits;
use crate::data::markers::MarkerStore;
use crate::error::ImportError;

pub const HEADERS: [&str; 11] = [
    "Name",
    "Order",
    "Frequency (Hz)",
    "Band Size (Hz)",
    "Harmonics",
    "Sub-Harmonics",
    "Axis",
    "Side Bands",
    "Count",
    "Spacing",
    "Left/Right",
];

/// Default download name: `<analysis>_export.csv`, or `markers_export.csv` when unnamed.
pub fn export_file_name(analysis_name: &str) -> String {
    let name = analysis_name.trim();
    if name.is_empty() {
        "markers_export.csv".to_string()
    } else {
        format!("{name}_export.csv")
    }
}

fn format_order(frequency: i64, base_frequency: f64) -> String {
    if base_frequency > 0.0 && base_frequency.is_finite() {
        format!("{:.2}", frequency as f64 / base_frequency)
    } else {
        String::new()
    }
}

fn marker_record(marker: &Marker, base_frequency: f64) -> [String; 11] {
    [
        marker.name.clone(),
        format_order(marker.frequency, base_frequency),
        marker.frequency.to_string(),
        marker.band_width.to_string(),
        marker.harmonics.to_string(),
        marker.sub_harmonics.to_string(),
        marker.axis.label().to_string(),
        if marker.side_bands.enabled { "Yes" } else { "No" }.to_string(),
        marker.side_bands.count.to_string(),
        marker.side_bands.spacing.to_string(),
        marker.side_bands.direction_code().to_string(),
    ]
}

/// Write the header and one row per marker, in display order.
pub fn write_markers_csv<W: Write>(
    w: W,
    store: &MarkerStore,
    base_frequency: f64,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(w);
    wtr.write_record(HEADERS)?;
    for (_, marker) in store.display_order() {
        wtr.write_record(marker_record(marker, base_frequency))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export to a string. Lines are joined with `\n`, without a trailing newline.
pub fn export_markers(store: &MarkerStore, base_frequency: f64) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_markers_csv(&mut buf, store, base_frequency)?;
    let mut s = String::from_utf8_lossy(&buf).into_owned();
    if s.ends_with('\n') {
        s.pop();
    }
    Ok(s)
}

/// Parse a marker file with the default [`MarkerLimits`].
pub fn parse_markers_csv(text: &str) -> Result<Vec<Marker>, ImportError> {
    parse_markers_csv_with_limits(text, &MarkerLimits::default())
}

/// Parse a marker file. Colors are left gray; the store assigns fresh ones.
///
/// Blank lines are skipped. The first remaining line is the header (checked
/// only for presence). Any invalid data row fails the whole parse with its
/// 1-based data row number. Harmonic, sub-harmonic and side-band counts are
/// capped at `limits`.
pub fn parse_markers_csv_with_limits(
    text: &str,
    limits: &MarkerLimits,
) -> Result<Vec<Marker>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut saw_header = false;
    let mut markers = Vec::new();
    let mut line = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if !saw_header {
            saw_header = true;
            continue;
        }
        line += 1;
        let fields: Vec<&str> = record.iter().collect();
        let marker = parse_row(&fields, limits).ok_or_else(|| ImportError::Validation {
            line,
            content: fields.join(","),
        })?;
        markers.push(marker);
    }

    if !saw_header {
        return Err(ImportError::MissingHeader);
    }
    if markers.is_empty() {
        return Err(ImportError::NoRows);
    }
    Ok(markers)
}

fn parse_row(fields: &[&str], limits: &MarkerLimits) -> Option<Marker> {
    if fields.len() < HEADERS.len() {
        return None;
    }
    let frequency = parse_number(fields[2])?;
    let band_width = parse_number(fields[3])?;
    let harmonics = parse_number(fields[4])?;
    let sub_harmonics = parse_number(fields[5])?;
    let axis = Axis::from_label(fields[6])?;

    let count = parse_number(fields[8]).unwrap_or_else(|| {
        log::warn!("side-band count {:?} is not a number, using 0", fields[8]);
        0.0
    });
    let spacing = parse_number(fields[9]).unwrap_or_else(|| {
        log::warn!("side-band spacing {:?} is not a number, using 0", fields[9]);
        0.0
    });

    let mut marker = Marker {
        frequency: round_to_i64(frequency),
        band_width: band_width.max(0.0),
        color: egui::Color32::GRAY,
        harmonics: clamp_count(harmonics),
        sub_harmonics: clamp_count(sub_harmonics),
        axis,
        name: fields[0].to_string(),
        visible: true,
        side_bands: SideBands {
            enabled: fields[7].eq_ignore_ascii_case("yes"),
            count: clamp_count(count),
            spacing,
            left_enabled: fields[10].contains('L'),
            right_enabled: fields[10].contains('R'),
        },
    };
    marker.clamp_counts(limits);
    Some(marker)
}

/// A finite decimal number; empty text and `inf`/`NaN` spellings are rejected.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl MarkerStore {
    /// Replace all markers with the contents of a marker CSV.
    ///
    /// On error nothing changes. On success the display order is reset to
    /// file order and every marker gets a fresh color.
    pub fn import_csv(&mut self, text: &str) -> Result<usize, ImportError> {
        let mut markers = parse_markers_csv_with_limits(text, self.limits())?;
        for m in markers.iter_mut() {
            m.color = self.next_color();
        }
        let n = markers.len();
        self.replace_all(markers);
        log::info!("imported {n} markers");
        Ok(n)
    }

    /// See [`export_markers`].
    pub fn export_csv(&self, base_frequency: f64) -> Result<String, csv::Error> {
        export_markers(self, base_frequency)
    }
}
