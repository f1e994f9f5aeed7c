use crate::command::{Invocation, Operation, Runner};
use crate::env::Environment;
use crate::error::{DriverError, Result};
use crate::external::ProcessRunner;
use crate::properties::Properties;
use std::io::Write;
use tracing::{debug, info};

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The build tool ran and exited with status 0.
    Completed(Invocation),
    /// The command name was not recognized; nothing was run.
    Skipped(String),
}

/// Turns a command name and a property bag into one build tool run.
///
/// Example
/// ```no_run
/// use waf_buildbot::{Dispatcher, Properties};
/// let props = Properties::from_json(r#"{"cxx_mkspec": "cxx_default"}"#).unwrap();
/// let mut driver = Dispatcher::default();
/// driver.dispatch("configure", &props, &mut std::io::stdout()).unwrap();
/// ```
pub struct Dispatcher {
    env: Environment,
    runner: Box<dyn Runner>,
}

impl Dispatcher {
    pub fn new(env: Environment, runner: Box<dyn Runner>) -> Self {
        Self { env, runner }
    }

    /// Assemble the invocation for `command` without running it.
    ///
    /// Returns `Ok(None)` for an unrecognized command.
    pub fn plan(&self, command: &str, props: &Properties) -> Result<Option<Invocation>> {
        let operation = Operation::parse(command);
        debug!(?operation, "resolved command");
        let Some(args) = operation.arguments(props)? else {
            return Ok(None);
        };
        Ok(Some(Invocation::new(&self.env.launcher(), args)))
    }

    /// Run `command` with `props`, announcing the invocation on `out` first.
    ///
    /// A non-zero exit of the build tool becomes [`DriverError::PropagatedExit`].
    pub fn dispatch(
        &mut self,
        command: &str,
        props: &Properties,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        let Some(invocation) = self.plan(command, props)? else {
            info!(command, "unknown command, nothing to do");
            writeln!(out, "Unknown command: {command}")?;
            return Ok(Outcome::Skipped(command.to_string()));
        };

        writeln!(out, "Running: {invocation}")?;
        out.flush()?;

        info!(%invocation, "starting build tool");
        let code = self.runner.run(&invocation, &self.env)?;
        info!(code, "build tool finished");
        if code != 0 {
            return Err(DriverError::PropagatedExit { code });
        }
        Ok(Outcome::Completed(invocation))
    }
}

impl Default for Dispatcher {
    /// Dispatcher over the current process environment, launching real processes.
    fn default() -> Self {
        Self::new(Environment::new(), Box::new(ProcessRunner))
    }
}
