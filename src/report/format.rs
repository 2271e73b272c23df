//! Formatted terminal output.
//!
//! All currency rounding happens here, never in the rebate computation.

use crate::domain::{RebateConfig, RebateResult};
use crate::io::ingest::IngestStats;

/// Format the four-line rebate summary printed on stdout.
pub fn format_summary(result: &RebateResult, config: &RebateConfig) -> String {
    let sym = &config.currency_symbol;
    let mut out = String::new();
    out.push_str(&format!("Total Slots: {}\n", result.total_slots));
    out.push_str(&format!("Unstable Slots: {}\n", result.unstable_slots));
    out.push_str(&format!("Rebate Amount: {sym}{}\n", fmt_money(result.rebate_amount)));
    out.push_str(&format!("Final Payable Amount: {sym}{}", fmt_money(result.payable_amount)));
    out
}

/// One-line description of what the loader repaired, for the log.
pub fn format_ingest_note(stats: &IngestStats) -> Option<String> {
    if stats.coerced_speeds == 0 && stats.unknown_status == 0 {
        return None;
    }
    Some(format!(
        "{} rows read: {} speed value(s) set to 0, {} empty status(es) set to Unknown",
        stats.rows_read,
        stats.coerced_speeds,
        stats.unknown_status,
    ))
}

fn fmt_money(v: f64) -> String {
    // Avoid printing "-0.00" for a tiny negative payable amount.
    let rounded = (v * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(total: usize, unstable: usize, rebate: f64) -> RebateResult {
        RebateResult {
            total_slots: total,
            unstable_slots: unstable,
            monthly_bill: 580.0,
            rebate_amount: rebate,
            payable_amount: 580.0 - rebate,
        }
    }

    #[test]
    fn summary_has_four_lines_with_two_decimals() {
        let text = format_summary(&result(4, 1, 145.0), &RebateConfig::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Total Slots: 4",
                "Unstable Slots: 1",
                "Rebate Amount: ₹145.00",
                "Final Payable Amount: ₹435.00",
            ]
        );
    }

    #[test]
    fn rounding_only_at_presentation() {
        let text = format_summary(&result(3, 1, 580.0 / 3.0), &RebateConfig::default());
        assert!(text.contains("Rebate Amount: ₹193.33"));
        assert!(text.contains("Final Payable Amount: ₹386.67"));
    }

    #[test]
    fn full_rebate_prints_zero_not_negative_zero() {
        let mut r = result(2, 2, 580.0);
        r.payable_amount = -1e-13;
        let text = format_summary(&r, &RebateConfig::default());
        assert!(text.ends_with("Final Payable Amount: ₹0.00"));
    }

    #[test]
    fn custom_currency_symbol() {
        let config = RebateConfig {
            currency_symbol: "$".to_string(),
            ..RebateConfig::default()
        };
        assert!(format_summary(&result(4, 1, 145.0), &config).contains("Rebate Amount: $145.00"));
    }

    #[test]
    fn ingest_note_only_when_repairs_happened() {
        assert!(format_ingest_note(&IngestStats::default()).is_none());
        let stats = IngestStats {
            rows_read: 10,
            coerced_speeds: 2,
            unknown_status: 1,
        };
        let note = format_ingest_note(&stats).unwrap();
        assert!(note.contains("2 speed value(s)"));
    }
}
