//! Plain-text bar charts and histogram binning.

use std::io::{self, Write};

/// Counts values into `bins` equal-width bins over `[lo, hi]`.
///
/// The last bin includes its right edge. Values outside the range and
/// NaNs are dropped.
pub fn bin_counts(values: &[f64], bins: usize, lo: f64, hi: f64) -> Vec<u64> {
    let mut counts = vec![0u64; bins];
    if bins == 0 || !(hi > lo) {
        return counts;
    }

    let width = (hi - lo) / bins as f64;
    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Range covering all finite values, widened when they are all equal.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (lo, hi) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi {
        Some((lo - 0.5, hi + 0.5))
    } else {
        Some((lo, hi))
    }
}

/// One labelled row of a bar chart.
#[derive(Debug, Clone)]
pub struct BarRow {
    /// Text left of the bar.
    pub label: String,
    /// Bar length relative to the largest row.
    pub value: f64,
    /// Text right of the bar.
    pub annotation: String,
}

/// Horizontal bar chart written as text.
#[derive(Debug, Clone)]
pub struct BarChart {
    title: String,
    rows: Vec<BarRow>,
    width: usize,
}

impl BarChart {
    /// Creates an empty chart whose longest bar is `width` characters.
    pub fn new(title: impl Into<String>, width: usize) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            width: width.max(1),
        }
    }

    /// Appends a row.
    pub fn row(&mut self, label: impl Into<String>, value: f64, annotation: impl Into<String>) {
        self.rows.push(BarRow {
            label: label.into(),
            value,
            annotation: annotation.into(),
        });
    }

    /// Rows added so far.
    pub fn rows(&self) -> &[BarRow] {
        &self.rows
    }

    /// Writes the chart.
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.title)?;
        writeln!(out, "{}", "=".repeat(self.title.chars().count()))?;

        let max = self
            .rows
            .iter()
            .map(|r| r.value)
            .filter(|v| v.is_finite())
            .fold(0.0f64, f64::max);
        let label_width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);

        for row in &self.rows {
            let len = if max > 0.0 && row.value.is_finite() {
                ((row.value / max) * self.width as f64).round() as usize
            } else {
                0
            };
            writeln!(
                out,
                "{:>lw$} |{:<bw$}| {}",
                row.label,
                "#".repeat(len),
                row.annotation,
                lw = label_width,
                bw = self.width,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_counts_edges() {
        let counts = bin_counts(&[0.0, 0.5, 1.0, 9.99, 10.0, 11.0, f64::NAN], 10, 0.0, 10.0);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[9], 2);
        assert_eq!(counts.iter().sum::<u64>(), 5);
    }

    #[test]
    fn test_bin_counts_degenerate_range() {
        assert_eq!(bin_counts(&[1.0], 4, 1.0, 1.0), vec![0; 4]);
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[3.0, 1.0, 2.0]), Some((1.0, 3.0)));
        assert_eq!(value_range(&[2.0, 2.0]), Some((1.5, 2.5)));
        assert_eq!(value_range(&[f64::NAN]), None);
        assert_eq!(value_range(&[]), None);
    }

    #[test]
    fn test_render_scales_to_width() {
        let mut chart = BarChart::new("Title", 10);
        chart.row("a", 2.0, "full");
        chart.row("bb", 1.0, "half");
        chart.row("c", 0.0, "empty");

        let mut out = Vec::new();
        chart.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Title");
        assert_eq!(lines[1], "=====");
        assert_eq!(lines[2], " a |##########| full");
        assert_eq!(lines[3], "bb |#####     | half");
        assert_eq!(lines[4], " c |          | empty");
    }
}
