//! JSON report generation

use super::RunReport;
use crate::error::BenchResult;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generate a pretty-printed JSON report
    pub fn generate(report: &RunReport) -> BenchResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Generate a compact JSON report
    pub fn generate_compact(report: &RunReport) -> BenchResult<String> {
        Ok(serde_json::to_string(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_json_report_shape() {
        let json = JsonReporter::generate(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["prompt"], "hello");
        assert_eq!(value["token_count"], "char");
        assert_eq!(value["rows"][0]["totalThroughput"], 6.0);
        assert_eq!(value["rows"][1]["totalThroughput"], "Error");
        assert_eq!(value["rows"][1]["firstTokenLatencySeconds"], "Error");
        assert_eq!(value["ranking"][0]["position"], 1);
        assert_eq!(value["responses"]["2"]["content"], "Unauthorized (401)");
    }

    #[test]
    fn test_compact_is_single_line() {
        let json = JsonReporter::generate_compact(&sample_report()).unwrap();
        assert!(!json.contains('\n'));
    }
}
