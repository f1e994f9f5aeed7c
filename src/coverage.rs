use serde_json::{Map, Value};

/// Line coverage the build bot demands from this project, in percent.
pub const REQUIRED_LINE_COVERAGE: f64 = 100.0;

/// Build bot hook: fill in the coverage requirements for this project.
pub fn coverage_settings(options: &mut Map<String, Value>) {
    options.insert(
        "required_line_coverage".to_string(),
        Value::from(REQUIRED_LINE_COVERAGE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sets_full_line_coverage() {
        let mut options = Map::new();
        options.insert("other".to_string(), json!("kept"));
        coverage_settings(&mut options);
        assert_eq!(options["required_line_coverage"], json!(100.0));
        assert_eq!(options["other"], json!("kept"));
    }
}
