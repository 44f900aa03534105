//! Terminal rendering of an analysis report.

use super::chart::{bin_counts, value_range, BarChart};
use crate::analysis::{AnalysisReport, SeriesSummary, BUCKETS};
use crate::config::AnalysisConfig;
use std::io::{self, Write};

/// Renders the byte distribution, chi-square and percentage excess charts.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    width: usize,
    chi_square_bins: usize,
    excess_bins: usize,
    values_per_row: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default(), 50)
    }
}

impl ReportRenderer {
    /// Creates a renderer using the bin counts from `config`.
    pub fn from_config(config: &AnalysisConfig, width: usize) -> Self {
        Self {
            width: width.max(1),
            chi_square_bins: config.chi_square_bins.max(1),
            excess_bins: config.excess_bins.max(1),
            values_per_row: config.values_per_row.clamp(1, BUCKETS),
        }
    }

    /// Writes all three charts.
    pub fn render<W: Write + ?Sized>(&self, report: &AnalysisReport, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{} bytes in {} chunks of up to {} bytes",
            report.total_bytes(),
            report.chunk_count(),
            report.chunk_size()
        )?;
        writeln!(out)?;
        self.render_distribution(report, out)?;
        writeln!(out)?;
        self.render_chi_square(report, out)?;
        writeln!(out)?;
        self.render_excess(report, out)
    }

    /// Byte-value probabilities, one row per byte value by default.
    pub fn distribution_chart(&self, report: &AnalysisReport) -> BarChart {
        let title = match report.mean() {
            Some(mean) => format!("Distribution of randomness [mu={mean:.4}]"),
            None => "Distribution of randomness [mu=undefined]".to_string(),
        };
        let mut chart = BarChart::new(title, self.width);

        let probabilities = report.normalized_histogram();
        for (row, group) in probabilities.chunks(self.values_per_row).enumerate() {
            let start = row * self.values_per_row;
            let end = start + group.len() - 1;
            let label = if start == end {
                format!("{start:02x}")
            } else {
                format!("{start:02x}-{end:02x}")
            };
            let p: f64 = group.iter().sum();
            chart.row(label, p, format!("{p:.5}"));
        }
        chart
    }

    /// Writes the distribution chart and the uniform expectation per row.
    pub fn render_distribution<W: Write + ?Sized>(
        &self,
        report: &AnalysisReport,
        out: &mut W,
    ) -> io::Result<()> {
        self.distribution_chart(report).render(out)?;
        writeln!(
            out,
            "expected per row: {:.5}",
            self.values_per_row as f64 / BUCKETS as f64
        )
    }

    /// Density histogram of per-chunk chi-square statistics.
    ///
    /// `None` when no chunk produced a finite statistic.
    pub fn chi_square_chart(&self, report: &AnalysisReport) -> Option<BarChart> {
        let values = report.chi_square_values();
        let (lo, hi) = value_range(&values)?;
        let title = series_title("Distribution of chi-square (density)", &values);
        Some(self.binned_chart(title, &values, self.chi_square_bins, lo, hi, true))
    }

    /// Writes the chi-square density histogram.
    pub fn render_chi_square<W: Write + ?Sized>(
        &self,
        report: &AnalysisReport,
        out: &mut W,
    ) -> io::Result<()> {
        match self.chi_square_chart(report) {
            Some(chart) => chart.render(out),
            None => write_empty(
                &series_title("Distribution of chi-square (density)", &[]),
                out,
            ),
        }
    }

    /// Histogram of per-chunk percentage excess in one-percent bins by default.
    ///
    /// `None` when no chunk produced a finite value.
    pub fn excess_chart(&self, report: &AnalysisReport) -> Option<BarChart> {
        let values = report.percentage_excess_values();
        SeriesSummary::of(&values)?;
        let title = series_title("Distribution of percentage excess", &values);
        Some(self.binned_chart(title, &values, self.excess_bins, 0.0, 100.0, false))
    }

    /// Writes the percentage excess histogram over 0..=100.
    pub fn render_excess<W: Write + ?Sized>(
        &self,
        report: &AnalysisReport,
        out: &mut W,
    ) -> io::Result<()> {
        match self.excess_chart(report) {
            Some(chart) => chart.render(out),
            None => write_empty(
                &series_title("Distribution of percentage excess", &[]),
                out,
            ),
        }
    }

    fn binned_chart(
        &self,
        title: String,
        values: &[f64],
        bins: usize,
        lo: f64,
        hi: f64,
        density: bool,
    ) -> BarChart {
        let counts = bin_counts(values, bins, lo, hi);
        let step = (hi - lo) / bins as f64;
        let total: u64 = counts.iter().sum();
        let mut chart = BarChart::new(title, self.width);
        for (i, &count) in counts.iter().enumerate() {
            let start = lo + step * i as f64;
            let label = format!("{:>10.2} - {:<10.2}", start, start + step);
            if density {
                // Integrates to one over the plotted range.
                let d = if total > 0 {
                    count as f64 / (total as f64 * step)
                } else {
                    0.0
                };
                chart.row(label, d, format!("{d:.6} ({count})"));
            } else {
                chart.row(label, count as f64, count.to_string());
            }
        }
        chart
    }
}

fn series_title(name: &str, values: &[f64]) -> String {
    match SeriesSummary::of(values) {
        Some(s) => format!("{name} [mu={:.4}, Mdn={:.4}]", s.mean, s.median),
        None => format!("{name} [no chunks]"),
    }
}

fn write_empty<W: Write + ?Sized>(title: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "(nothing to plot)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_reader;
    use std::io::Cursor;

    fn render(data: Vec<u8>, chunk_size: usize) -> String {
        let report = analyze_reader(Cursor::new(data), chunk_size).unwrap();
        let mut out = Vec::new();
        ReportRenderer::default().render(&report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_renders_all_sections() {
        let data: Vec<u8> = (0..40_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        let text = render(data, 10_000);

        assert!(text.starts_with("40000 bytes in 4 chunks of up to 10000 bytes"));
        assert!(text.contains("Distribution of randomness [mu="));
        assert!(text.contains("Distribution of chi-square (density) [mu="));
        assert!(text.contains("Distribution of percentage excess [mu="));
        assert!(text.lines().any(|l| l.trim_start().starts_with("00 |")));
        assert!(text.lines().any(|l| l.trim_start().starts_with("ff |")));
    }

    #[test]
    fn test_renders_empty_sample() {
        let text = render(Vec::new(), 10_000);

        assert!(text.contains("[mu=undefined]"));
        assert!(text.contains("Distribution of chi-square (density) [no chunks]"));
        assert_eq!(text.matches("(nothing to plot)").count(), 2);
    }

    #[test]
    fn test_distribution_rows() {
        let data: Vec<u8> = (0..=255).collect();
        let report = analyze_reader(Cursor::new(data), 256).unwrap();
        let mut out = Vec::new();
        ReportRenderer::default()
            .render_distribution(&report, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Distribution of randomness [mu=127.5000]"));
        // Every one of the 256 rows plus the expectation line.
        assert_eq!(text.matches("0.00391").count(), BUCKETS + 1);
    }

    #[test]
    fn test_default_resolution() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i.wrapping_mul(2654435761) >> 11) as u8).collect();
        let report = analyze_reader(Cursor::new(data), 1_000).unwrap();
        let renderer = ReportRenderer::default();

        let distribution = renderer.distribution_chart(&report);
        assert_eq!(distribution.rows().len(), 256);
        assert_eq!(distribution.rows()[0x41].label, "41");

        let chi_square = renderer.chi_square_chart(&report).unwrap();
        assert_eq!(chi_square.rows().len(), 401);
        assert_eq!(renderer.excess_chart(&report).unwrap().rows().len(), 100);
    }

    #[test]
    fn test_chi_square_density_integrates_to_one() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i.wrapping_mul(2654435761) >> 11) as u8).collect();
        let report = analyze_reader(Cursor::new(data), 1_000).unwrap();
        let (lo, hi) = value_range(&report.chi_square_values()).unwrap();
        let step = (hi - lo) / 401.0;

        let chart = ReportRenderer::default().chi_square_chart(&report).unwrap();
        let area: f64 = chart.rows().iter().map(|r| r.value * step).sum();
        assert!((area - 1.0).abs() < 1e-9, "area {area}");
    }

    #[test]
    fn test_grouped_rows_from_config() {
        let data: Vec<u8> = (0..=255).collect();
        let report = analyze_reader(Cursor::new(data), 256).unwrap();
        let config = AnalysisConfig {
            values_per_row: 8,
            ..Default::default()
        };

        let chart = ReportRenderer::from_config(&config, 50).distribution_chart(&report);
        assert_eq!(chart.rows().len(), 32);
        assert_eq!(chart.rows()[0].label, "00-07");
        assert_eq!(chart.rows()[31].label, "f8-ff");
    }
}
