//! The property bag handed to the driver by the build bot.
//!
//! The bag arrives as one JSON object. Every key the operations understand is
//! decoded here, once, into a typed and defaulted field. Keys nobody asks for are
//! dropped silently.

use crate::error::{DriverError, Result};
use crate::options::{ToolOptions, render_scalar};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Properties {
    /// Run `distclean` before `configure`.
    #[serde(deserialize_with = "truthy")]
    pub build_distclean: bool,

    /// Directory the build tool should place bundled dependencies in.
    #[serde(deserialize_with = "scalar_text")]
    pub waf_bundle_path: Option<String>,

    /// Dependency to build from a local checkout instead of a release.
    #[serde(deserialize_with = "scalar_text")]
    pub dependency_project: Option<String>,

    /// Checkout (branch, tag or commit) used for `dependency_project`.
    #[serde(deserialize_with = "scalar_text")]
    pub dependency_checkout: Option<String>,

    /// Compiler make-spec; `configure` refuses to run without it.
    #[serde(deserialize_with = "scalar_text")]
    pub cxx_mkspec: Option<String>,

    #[serde(deserialize_with = "tool_options")]
    pub tool_options: ToolOptions,

    /// Run the test binaries under valgrind.
    #[serde(deserialize_with = "truthy")]
    pub valgrind_run: bool,

    #[serde(deserialize_with = "scalar_text")]
    pub install_path: Option<String>,

    #[serde(deserialize_with = "truthy")]
    pub install_relative: bool,
}

impl Properties {
    /// Decode the bag from its JSON text.
    ///
    /// Fails with [`DriverError::InvalidInput`] for malformed JSON, for a top level
    /// that is not an object, and for known keys holding unusable values.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            DriverError::InvalidInput(format!("properties are not valid JSON: {e}"))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DriverError::InvalidInput(format!(
                "properties must be a JSON object, got {value}"
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| DriverError::InvalidInput(format!("bad property value: {e}")))
    }

    /// Both halves of a dependency checkout override, if both are set.
    pub fn checkout_override(&self) -> Option<(&str, &str)> {
        match (&self.dependency_project, &self.dependency_checkout) {
            (Some(project), Some(checkout)) => Some((project.as_str(), checkout.as_str())),
            _ => None,
        }
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

fn scalar_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(_) | Value::Object(_) => {
            Err(de::Error::custom(format!("expected a scalar, got {value}")))
        }
        scalar => Ok(render_scalar(&scalar)),
    }
}

fn tool_options<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ToolOptions, D::Error> {
    let value = Value::deserialize(deserializer)?;
    ToolOptions::from_value(&value).map_err(de::Error::custom)
}
