// File: crates/demo/src/main.rs
// Summary: Demo feeds synthetic LC-MS data through the controller, walks a selection session, and exports CSVs.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use mzchart_core::chart::{ChartHandle, ChartId, ChartRenderer, ChartSpec};
use mzchart_core::point::keys;
use mzchart_core::{
    ChartController, ChartError, ClickEvent, CsvExporter, DataProvider, ExportService, PlotData,
    Point, SeriesDescriptor, SeriesId, SpectraData, SpectrumId,
};

/// Stand-in for a charting engine: prints what a real renderer would draw.
struct ConsoleRenderer;

struct ConsoleHandle {
    chart: ChartId,
}

impl ChartHandle for ConsoleHandle {
    fn rerender(&mut self) {
        log::info!("[{}] redraw", self.chart);
    }

    fn hide_series(&mut self, id: &SeriesId) {
        log::info!("[{}] hide series {id}", self.chart);
    }

    fn show_series(&mut self, id: &SeriesId) {
        log::info!("[{}] show series {id}", self.chart);
    }
}

impl ChartRenderer for ConsoleRenderer {
    fn make_chart(&mut self, spec: &ChartSpec<'_>) -> Box<dyn ChartHandle> {
        log::info!(
            "[{}] built: {} series, {} points, {} guides, legend={}",
            spec.chart,
            spec.series.len(),
            spec.points.len(),
            spec.guides.len(),
            spec.legend.enabled
        );
        for series in spec.series {
            log::info!("[{}]   {} ({})", spec.chart, series.title, series.color);
        }
        Box::new(ConsoleHandle { chart: spec.chart })
    }
}

/// In-memory spectrum store keyed by spectrum id.
struct MemoryProvider {
    spectra: BTreeMap<SpectrumId, Vec<(f64, f64)>>,
}

impl DataProvider for MemoryProvider {
    fn derived_spectra(&self, spectra: &[SpectrumId]) -> Result<SpectraData, ChartError> {
        let mut data = SpectraData::default();
        for key in spectra {
            let peaks = self
                .spectra
                .get(key)
                .ok_or(ChartError::UnresolvedSpectrum { spectrum_id: *key })?;
            let id = SeriesId::spectrum(*key);
            data.descriptors.insert(id.clone(), SeriesDescriptor::new("mz", "intensity"));
            for &(mz, intensity) in peaks {
                data.points.push(Point::with_xy(id.clone(), "mz", mz, "intensity", intensity));
            }
        }
        Ok(data)
    }
}

fn gaussian(rt: f64, apex: f64, width: f64, height: f64) -> f64 {
    (-((rt - apex) * (rt - apex)) / (2.0 * width * width)).exp() * height
}

/// One consensus feature measured in two samples: XIC elution profiles with
/// an MS2 precursor marker near each apex, and MS1 isotope sticks.
fn plot_data() -> PlotData {
    let consensus_mz = 301.1;
    let samples = [
        (SeriesId::feature(1, 42), "blood_1", 60.0, 8.0e5, 100i64, 7i64),
        (SeriesId::feature(2, 42), "blood_2", 64.0, 6.5e5, 200i64, 9i64),
    ];

    let mut data = PlotData::default();
    for (id, name, apex, height, spectrum, scan) in samples {
        data.xic_descriptors.insert(
            id.clone(),
            SeriesDescriptor::new("rt", "intensity")
                .with_sample(name)
                .with_consensus_mz(consensus_mz)
                .with_compounds(vec!["caffeine".to_string()])
                .with_feature_range(apex - 12.0, apex + 12.0),
        );
        for step in 0..=40 {
            let rt = apex - 20.0 + step as f64;
            let mut p = Point::with_xy(id.clone(), "rt", rt, "intensity", gaussian(rt, apex, 5.0, height));
            if rt == apex {
                p.set(keys::PRECURSOR_MZ, consensus_mz);
                p.set(keys::SPECTRUM_ID, spectrum);
                p.set(keys::SCAN_ID, scan);
            }
            data.xic_points.push(p);
        }

        data.ms1_descriptors.insert(
            id.clone(),
            SeriesDescriptor::new("mz", "intensity")
                .with_sample(name)
                .with_consensus_mz(consensus_mz),
        );
        // A three-peak isotope pattern.
        for (iso, fraction) in [(0.0, 1.0), (1.003, 0.22), (2.006, 0.04)] {
            data.ms1_points.push(Point::with_xy(
                id.clone(),
                "mz",
                consensus_mz + iso,
                "intensity",
                height * fraction,
            ));
        }
    }
    data
}

fn precursor_index(ctl: &ChartController, spectrum: u64) -> Result<usize> {
    let chart = ctl
        .chart(ChartId::Chromatogram)
        .context("chromatogram chart not built")?;
    chart
        .points
        .iter()
        .position(|p| p.spectrum_id() == Some(SpectrumId(spectrum)))
        .context("precursor point not found")
}

fn main() -> Result<()> {
    env_logger::init();

    let spectra = BTreeMap::from([
        (SpectrumId(100), vec![(84.1, 2.1e4), (155.3, 9.8e4), (213.0, 4.4e4), (301.1, 1.2e4)]),
        (SpectrumId(200), vec![(84.1, 1.8e4), (155.3, 8.1e4), (213.0, 3.9e4), (301.1, 0.9e4)]),
    ]);
    let mut ctl = ChartController::new(
        Box::new(ConsoleRenderer),
        Box::new(MemoryProvider { spectra }),
    );

    ctl.update_plot(plot_data())?;

    // Click the first precursor, then add the second with the modifier held.
    let first = precursor_index(&ctl, 100)?;
    ctl.point_clicked(&mut ClickEvent::new(false), ChartId::Chromatogram, first)?;
    let second = precursor_index(&ctl, 200)?;
    ctl.point_clicked(&mut ClickEvent::new(true), ChartId::Chromatogram, second)?;
    log::info!("{} spectra selected", ctl.selection().entries().len());

    // Export both charts as the user would see them right now.
    let exporter = CsvExporter::new("demo_out");
    for chart in [ChartId::Chromatogram, ChartId::MassPeak] {
        let records = ctl.visible_coordinates(chart)?;
        exporter.export_graph(chart, "csv", &records)?;
        println!("wrote demo_out/{chart}.csv ({} rows)", records.len());
    }

    // Background click drops the selection and the mass chart returns to MS1.
    ctl.background_clicked(&ClickEvent::new(false))?;
    log::info!("selection active after background click: {}", ctl.selection().is_active());

    Ok(())
}
