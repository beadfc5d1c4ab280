//! Results reporting and formatting.

use crate::checks::CheckResult;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

/// Formats check results for output.
pub struct SmokeReport;

impl SmokeReport {
    /// Format results as a console table.
    pub fn format_table(base_url: &str, results: &[CheckResult]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Check", "Result", "Time (ms)", "Detail"]);

        for result in results {
            let outcome = match (result.passed, result.status_code) {
                (true, _) => "PASS".to_string(),
                (false, Some(code)) => format!("FAIL ({})", code),
                (false, None) => "FAIL".to_string(),
            };
            table.add_row(vec![
                result.name.to_string(),
                outcome,
                format!("{:.1}", result.duration_ms),
                result.detail.clone(),
            ]);
        }

        let passed = Self::passed(results);
        format!(
            "Smoke test against {}\n{}\n{}/{} checks passed",
            base_url,
            table,
            passed,
            results.len()
        )
    }

    /// Format results as JSON.
    pub fn format_json(base_url: &str, results: &[CheckResult]) -> anyhow::Result<String> {
        let report = serde_json::json!({
            "baseUrl": base_url,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "passed": Self::passed(results),
            "total": results.len(),
            "checks": results,
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn passed(results: &[CheckResult]) -> usize {
        results.iter().filter(|r| r.passed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<CheckResult> {
        vec![
            CheckResult {
                name: "seismic.earthquakes",
                passed: true,
                duration_ms: 12.5,
                detail: "3 features".to_string(),
                status_code: None,
            },
            CheckResult {
                name: "fire.wildfires",
                passed: false,
                duration_ms: 3.0,
                detail: "Invalid API key".to_string(),
                status_code: Some(401),
            },
        ]
    }

    #[test]
    fn test_table_counts_passes() {
        let table = SmokeReport::format_table("https://api.test.com", &results());
        assert!(table.contains("FAIL (401)"));
        assert!(table.ends_with("1/2 checks passed"));
    }

    #[test]
    fn test_json_report() {
        let json = SmokeReport::format_json("https://api.test.com", &results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["checks"][1]["status_code"], 401);
        assert!(value["checks"][0].get("status_code").is_none());
    }
}
