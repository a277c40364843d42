//! ASCII table rendering of an [`InstanceSegReport`].
//!
//! The layout is a bordered grid with a separator under the header and
//! another above the `Overall` footer:
//!
//! ```text
//! +---------+---------+---------+--------+
//! | classes | AP_0.25 | AP_0.50 | AP     |
//! +---------+---------+---------+--------+
//! | chair   | 1.0000  | 1.0000  | 1.0000 |
//! +---------+---------+---------+--------+
//! | Overall | 1.0000  | 1.0000  | 1.0000 |
//! +---------+---------+---------+--------+
//! ```

use crate::compute::InstanceSegReport;

/// Column titles of the table.
pub const HEADER: [&str; 4] = ["classes", "AP_0.25", "AP_0.50", "AP"];
/// First cell of the dataset-wide row.
pub const FOOTER_LABEL: &str = "Overall";

/// Formats an AP value with four decimals.
pub fn format_ap(value: f64) -> String {
    format!("{value:.4}")
}

/// Cells of a rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub header: [String; 4],
    pub rows: Vec<[String; 4]>,
    pub footer: [String; 4],
}

impl ReportTable {
    /// Collects the cells of `report`, one row per class in report order.
    pub fn from_report(report: &InstanceSegReport) -> Self {
        let rows = report
            .classes
            .iter()
            .map(|class| {
                [
                    class.label.clone(),
                    format_ap(class.ap25),
                    format_ap(class.ap50),
                    format_ap(class.ap),
                ]
            })
            .collect();

        Self {
            header: HEADER.map(str::to_owned),
            rows,
            footer: [
                FOOTER_LABEL.to_owned(),
                format_ap(report.all_ap_25),
                format_ap(report.all_ap_50),
                format_ap(report.all_ap),
            ],
        }
    }

    /// Width of each column in characters.
    fn column_widths(&self) -> [usize; 4] {
        let mut widths = [0; 4];
        for row in std::iter::once(&self.header)
            .chain(&self.rows)
            .chain(std::iter::once(&self.footer))
        {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    /// Renders the table, lines joined by `\n` without a trailing newline.
    pub fn render(&self) -> String {
        let widths = self.column_widths();

        let border = widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+");
        let border = format!("+{border}+");

        let line = |row: &[String; 4]| {
            let cells = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!(" {cell:<width$} "))
                .collect::<Vec<_>>()
                .join("|");
            format!("|{cells}|")
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 6);
        lines.push(border.clone());
        lines.push(line(&self.header));
        lines.push(border.clone());
        lines.extend(self.rows.iter().map(&line));
        lines.push(border.clone());
        lines.push(line(&self.footer));
        lines.push(border);

        lines.join("\n")
    }
}

/// Renders `report` as an ASCII table.
pub fn render_report(report: &InstanceSegReport) -> String {
    ReportTable::from_report(report).render()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::compute::ClassAp;

    fn report() -> InstanceSegReport {
        InstanceSegReport::new(
            vec![
                ClassAp::new("chair".to_owned(), 1.0, 1.0, 1.0),
                ClassAp::new("bookshelf".to_owned(), 0.123_456, 0.5, 0.0),
            ],
            0.561_728,
            0.75,
            0.5,
        )
    }

    #[rstest]
    #[case(1.0, "1.0000")]
    #[case(0.0, "0.0000")]
    #[case(0.123_456_78, "0.1235")]
    #[case(0.5, "0.5000")]
    #[case(0.999_99, "1.0000")]
    fn test_format_ap(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_ap(value), expected);
    }

    #[test]
    fn test_rows() {
        let table = ReportTable::from_report(&report());

        assert_eq!(table.header, HEADER.map(str::to_owned));
        assert_eq!(
            table.rows[0],
            ["chair", "1.0000", "1.0000", "1.0000"].map(str::to_owned)
        );
        assert_eq!(
            table.rows[1],
            ["bookshelf", "0.1235", "0.5000", "0.0000"].map(str::to_owned)
        );
        assert_eq!(
            table.footer,
            ["Overall", "0.5617", "0.7500", "0.5000"].map(str::to_owned)
        );
    }

    #[test]
    fn test_render() {
        let expected = "\
+-----------+---------+---------+--------+
| classes   | AP_0.25 | AP_0.50 | AP     |
+-----------+---------+---------+--------+
| chair     | 1.0000  | 1.0000  | 1.0000 |
| bookshelf | 0.1235  | 0.5000  | 0.0000 |
+-----------+---------+---------+--------+
| Overall   | 0.5617  | 0.7500  | 0.5000 |
+-----------+---------+---------+--------+";

        assert_eq!(render_report(&report()), expected);
    }

    #[test]
    fn test_render_without_classes() {
        let report = InstanceSegReport::new(Vec::new(), 0.0, 0.0, 0.0);
        let rendered = render_report(&report);

        assert_eq!(rendered.lines().count(), 6);
        assert!(rendered.contains("| Overall | 0.0000  | 0.0000  | 0.0000 |"));
    }

    #[test]
    fn test_every_value_has_four_decimals() {
        let table = ReportTable::from_report(&report());

        for row in table.rows.iter().chain(std::iter::once(&table.footer)) {
            for cell in &row[1..] {
                let (_, decimals) = cell.split_once('.').unwrap();
                assert_eq!(decimals.len(), 4, "cell {cell}");
            }
        }
    }
}
