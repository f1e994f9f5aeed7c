use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Variable naming the interpreter that runs the build tool script.
pub const PYTHON_VAR: &str = "WAF_BUILDBOT_PYTHON";
/// Variable naming the build tool script.
pub const SCRIPT_VAR: &str = "WAF_BUILDBOT_SCRIPT";

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_SCRIPT: &str = "waf";

/// View of the process environment the build tool is launched in.
///
/// - `vars`: environment variables passed to the build tool, also the source of
///   the launcher configuration. Names and values need not be UTF-8.
/// - `current_dir`: working directory of the build tool.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<OsString, OsString>,
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state.
    pub fn new() -> Self {
        let vars = stdenv::vars_os().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// Environment with no variables at all, rooted at `current_dir`.
    pub fn empty(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: current_dir.into(),
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    pub fn set_var(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Launcher configured by [`PYTHON_VAR`] and [`SCRIPT_VAR`].
    ///
    /// Empty values count as unset. Values that are not UTF-8 are converted lossily.
    pub fn launcher(&self) -> Launcher {
        let pick = |key: &str, default: &str| {
            self.get_var(key)
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string_lossy().into_owned())
                .unwrap_or_else(|| default.to_string())
        };
        Launcher::new(
            pick(PYTHON_VAR, DEFAULT_PYTHON),
            vec![pick(SCRIPT_VAR, DEFAULT_SCRIPT)],
        )
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// How the build tool is started: a program plus the arguments that precede
/// every operation (normally the interpreter and the waf script).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub program: String,
    pub leading_args: Vec<String>,
}

impl Launcher {
    pub fn new(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }
}
