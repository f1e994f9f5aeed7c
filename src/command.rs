use crate::env::{Environment, Launcher};
use crate::error::{DriverError, ExitCode, Result};
use crate::options::OptionList;
use crate::properties::Properties;
use std::fmt;

/// Valgrind wrapper handed to the build tool; `%s` is filled in by the tool.
pub const VALGRIND_RUN_CMD: &str = "valgrind --error-exitcode=1 %s";

/// The operations the driver knows about.
///
/// Any other command name lands in [`Operation::Unrecognized`], which is reported
/// and otherwise ignored: it never starts a process and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Configure,
    Build,
    RunTests,
    Install,
    Unrecognized(String),
}

impl Operation {
    pub fn parse(name: &str) -> Self {
        match name {
            "configure" => Operation::Configure,
            "build" => Operation::Build,
            "run_tests" => Operation::RunTests,
            "install" => Operation::Install,
            other => Operation::Unrecognized(other.to_string()),
        }
    }

    /// Build tool arguments for this operation, without the launcher prefix.
    ///
    /// Returns `Ok(None)` for an unrecognized operation.
    pub fn arguments(&self, props: &Properties) -> Result<Option<Vec<String>>> {
        let args = match self {
            Operation::Configure => configure(props)?,
            Operation::Build => vec!["build".into(), "-v".into()],
            Operation::RunTests => run_tests(props),
            Operation::Install => install(props),
            Operation::Unrecognized(_) => return Ok(None),
        };
        Ok(Some(args))
    }
}

fn configure(props: &Properties) -> Result<Vec<String>> {
    let mkspec = props
        .cxx_mkspec
        .as_deref()
        .ok_or(DriverError::MissingProperty("cxx_mkspec"))?;

    let mut args = Vec::new();
    if props.build_distclean {
        args.push("distclean".to_string());
    }
    args.push("configure".into());
    args.push("--git-protocol=git@".into());

    if let Some(path) = &props.waf_bundle_path {
        args.push(format!("--bundle-path={path}"));
    }
    if let Some((project, checkout)) = props.checkout_override() {
        args.push(format!("--{project}-use-checkout={checkout}"));
    }

    let mut options = OptionList::default();
    options.push(format!("cxx_mkspec={mkspec}"));
    args.push(options.into_argument(&props.tool_options));
    Ok(args)
}

fn run_tests(props: &Properties) -> Vec<String> {
    let mut options = OptionList::default();
    options.push("run_tests");
    options.push("run_always");
    if props.valgrind_run {
        options.push(format!("run_cmd={VALGRIND_RUN_CMD}"));
    }
    vec!["-v".into(), options.into_argument(&props.tool_options)]
}

fn install(props: &Properties) -> Vec<String> {
    let mut args = vec!["-v".to_string(), "install".to_string()];

    let mut options = OptionList::default();
    if let Some(path) = &props.install_path {
        options.push(format!("install_path={path}"));
    }
    if props.install_relative {
        options.push("install_relative");
    }
    if !options.is_empty() {
        args.push(options.into_argument(&Default::default()));
    }
    args
}

/// One fully assembled build tool command line.
///
/// Arguments stay separate tokens all the way to the process boundary; they are
/// only joined for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(launcher: &Launcher, args: Vec<String>) -> Self {
        let mut all = launcher.leading_args.clone();
        all.extend(args);
        Self {
            program: launcher.program.clone(),
            args: all,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Everything after the program, launcher arguments included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.argv())
    }
}

/// Something that can execute an [`Invocation`] to completion.
///
/// Implemented by [`crate::external::ProcessRunner`]; tests substitute a recorder.
pub trait Runner {
    /// Run the invocation and return its exit code.
    fn run(&mut self, invocation: &Invocation, env: &Environment) -> Result<ExitCode>;
}
