use crate::error::{DriverError, Result};
use serde_json::Value;

/// Ordered `key[=value]` flags forwarded to the build tool inside `--options=`.
///
/// Order follows the JSON object the options were decoded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOptions {
    entries: Vec<(String, Option<String>)>,
}

impl ToolOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from the `tool_options` value of a property bag.
    ///
    /// `null` means no options. Any other non-object value is rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self {
                entries: map
                    .iter()
                    .map(|(k, v)| (k.clone(), render_scalar(v)))
                    .collect(),
            }),
            other => Err(DriverError::InvalidInput(format!(
                "tool_options must be an object, got {other}"
            ))),
        }
    }

    /// Append a bare flag (`value == None`) or a `key=value` pair.
    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.push((key.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry with a leading comma: `,flag,key=value`.
    ///
    /// Empty options render as the empty string, so the result can be appended
    /// directly to an existing options value.
    pub fn to_option_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push(',');
            out.push_str(key);
            if let Some(value) = value {
                out.push('=');
                out.push_str(value);
            }
        }
        out
    }
}

/// Text of a scalar JSON value as the build tool should see it.
///
/// Strings are taken verbatim and `null` has no text. Booleans are spelled
/// `True`/`False`, the way the waf side has always received them; numbers use
/// their JSON form.
pub(crate) fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        other => Some(other.to_string()),
    }
}

/// Accumulates the comma separated value of a single `--options=` argument.
#[derive(Debug, Default)]
pub(crate) struct OptionList {
    items: Vec<String>,
}

impl OptionList {
    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `--options=<a>,<b>` followed by any extra tool options.
    pub fn into_argument(self, extra: &ToolOptions) -> String {
        format!("--options={}{}", self.items.join(","), extra.to_option_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_options_render_nothing() {
        assert_eq!(ToolOptions::new().to_option_string(), "");
        let opts = ToolOptions::from_value(&Value::Null).unwrap();
        assert_eq!(opts.to_option_string(), "");
    }

    #[test]
    fn flags_and_pairs_keep_order() {
        let opts = ToolOptions::from_value(&json!({"a": null, "b": "1"})).unwrap();
        assert_eq!(opts.to_option_string(), ",a,b=1");

        let opts = ToolOptions::from_value(&json!({"z": "1", "a": null, "m": "x"})).unwrap();
        assert_eq!(opts.to_option_string(), ",z=1,a,m=x");
    }

    #[test]
    fn non_string_values_render_like_waf_expects() {
        let opts =
            ToolOptions::from_value(&json!({"jobs": 4, "strict": true, "lto": false})).unwrap();
        assert_eq!(opts.to_option_string(), ",jobs=4,strict=True,lto=False");
    }

    #[test]
    fn non_object_is_rejected() {
        let err = ToolOptions::from_value(&json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, DriverError::InvalidInput(_)));
    }

    #[test]
    fn option_list_joins_items_then_extras() {
        let mut list = OptionList::default();
        assert!(list.is_empty());
        list.push("run_tests");
        list.push("run_always");
        let mut extra = ToolOptions::new();
        extra.push("cxx_debug", None);
        assert_eq!(
            list.into_argument(&extra),
            "--options=run_tests,run_always,cxx_debug"
        );
    }
}
