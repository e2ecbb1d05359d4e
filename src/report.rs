//! Plain-text rendering of a dashboard view.

use std::fmt;

use num_format::{Locale, ToFormattedString};

use crate::pipeline::{DashboardView, HeterogeneityView, TableView};
use crate::types::Kpi;

/// Whole-number rendering with thousands separators: `12,345`.
pub fn format_number(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_formatted_string(&Locale::en);
    if rounded < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Signed rendering for deltas: `+1,234` / `-56`.
pub fn format_signed(value: f64) -> String {
    let rounded = value.round() as i64;
    if rounded < 0 {
        format_number(value)
    } else {
        format!("+{}", format_number(value))
    }
}

fn volume_line(label: &str, kpi: &Kpi) -> String {
    format!(
        "{label:<24}{:>18} m³  ({} m³)",
        format_number(kpi.total),
        format_signed(kpi.delta)
    )
}

fn revenue_line(label: &str, kpi: &Kpi) -> String {
    format!(
        "{label:<24}{:>18}     (${})",
        format!("${}", format_number(kpi.total)),
        format_signed(kpi.delta)
    )
}

/// Fixed-width text rendering of a dashboard view.
pub struct TextReport<'a>(pub &'a DashboardView);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "Production report: {} as of {}", view.well, view.date)?;
        writeln!(f)?;
        writeln!(f, "{}", volume_line("Total Oil Production", &view.kpis.oil_m3))?;
        writeln!(f, "{}", volume_line("Total Gas Production", &view.kpis.gas_m3))?;
        writeln!(f, "{}", volume_line("Total Water Production", &view.kpis.water_m3))?;
        writeln!(f, "{}", revenue_line("Total Revenue", &view.kpis.revenue))?;
        writeln!(f)?;

        writeln!(f, "Production on {}", view.date)?;
        write_table(f, &view.table)?;
        writeln!(f)?;

        writeln!(f, "Heterogeneity Index - Production Opportunities")?;
        write_heterogeneity(f, &view.heterogeneity)?;

        if !view.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommended Actions")?;
            for rec in &view.recommendations {
                writeln!(f, "{}:", rec.well)?;
                for action in &rec.actions {
                    writeln!(f, "  • {action}")?;
                }
            }
        }
        Ok(())
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, table: &TableView) -> fmt::Result {
    match table {
        TableView::Rows { rows } => {
            writeln!(
                f,
                "{:<12}{:>12}{:>14}{:>12}{:>14}{:>14}{:>16}{:>14}{:>16}",
                "well", "oil_m3", "gas_m3", "water_m3", "revenue", "cum_oil_m3", "cum_gas_m3", "cum_water_m3", "cum_revenue"
            )?;
            for r in rows {
                writeln!(
                    f,
                    "{:<12}{:>12.1}{:>14.1}{:>12.1}{:>14.0}{:>14.1}{:>16.1}{:>14.1}{:>16.0}",
                    r.well,
                    r.oil_m3,
                    r.gas_m3,
                    r.water_m3,
                    r.daily_revenue,
                    r.cum_oil_m3,
                    r.cum_gas_m3,
                    r.cum_water_m3,
                    r.cum_revenue
                )?;
            }
            Ok(())
        }
        TableView::Empty { message } => writeln!(f, "  (no data: {message})"),
    }
}

fn write_heterogeneity(f: &mut fmt::Formatter<'_>, panel: &HeterogeneityView) -> fmt::Result {
    match panel {
        HeterogeneityView::Scored(report) => {
            writeln!(
                f,
                "  averages: oil {:.1} m³, gas {:.1} m³, water {:.1} m³",
                report.avg_oil_m3, report.avg_gas_m3, report.avg_water_m3
            )?;
            writeln!(f, "{:<12}{:>10}{:>10}{:>10}", "well", "HI_oil", "HI_gas", "HI_water")?;
            for s in &report.scores {
                writeln!(
                    f,
                    "{:<12}{:>10.3}{:>10.3}{:>10.3}",
                    s.well, s.hi_oil, s.hi_gas, s.hi_water
                )?;
            }
            Ok(())
        }
        HeterogeneityView::InsufficientData { message } => {
            writeln!(f, "  Insufficient data: {message}")
        }
    }
}

/// Render the view as a fixed-width text report.
pub fn render_text(view: &DashboardView) -> String {
    TextReport(view).to_string()
}
