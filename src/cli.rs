//! Command line surface: `waf_buildbot <command> <properties>`.

use crate::dispatcher::Dispatcher;
use crate::error::{DriverError, ExitCode};
use crate::properties::Properties;
use anyhow::Context;
use argh::{EarlyExit, FromArgs};
use std::io::Write;

#[derive(FromArgs, Debug, PartialEq)]
/// Run one waf step (configure, build, run_tests or install) for the build bot.
pub struct Args {
    #[argh(positional)]
    /// step to run: configure, build, run_tests or install.
    pub command: String,

    #[argh(positional)]
    /// build properties as a JSON object.
    pub properties: String,
}

/// Result of reading the command line.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Run(Args),
    /// Print `output` and stop with `code` without doing anything else.
    Exit { output: String, code: ExitCode },
}

/// Parse a full argv, program name included.
///
/// Anything but exactly two arguments prints a usage line and exits with status 0,
/// which is what the build bot configuration has always relied on. The two
/// arguments are always taken as values, so `help` or `-h` is just another
/// command name.
pub fn parse(argv: &[String]) -> Parsed {
    let program = argv.first().map(String::as_str).unwrap_or("waf_buildbot");
    let usage = || Parsed::Exit {
        output: format!("Usage: {program} <command> <properties>\n"),
        code: 0,
    };
    let [_, command, properties] = argv else {
        return usage();
    };
    match Args::from_args(&[program], &["--", command, properties]) {
        Ok(args) => Parsed::Run(args),
        Err(EarlyExit { .. }) => usage(),
    }
}

/// Decode the properties and dispatch the step.
pub fn execute(
    dispatcher: &mut Dispatcher,
    args: &Args,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let props = Properties::from_json(&args.properties).context("reading build properties")?;
    dispatcher
        .dispatch(&args.command, &props, out)
        .with_context(|| format!("running {}", args.command))?;
    Ok(())
}

/// Everything `main` does, with the streams and dispatcher supplied by the caller.
///
/// Returns the status the process should exit with.
pub fn run(
    argv: &[String],
    dispatcher: &mut Dispatcher,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> ExitCode {
    let args = match parse(argv) {
        Parsed::Run(args) => args,
        Parsed::Exit { output, code } => {
            // a closed stdout must not change the exit status
            let _ = out.write_all(output.as_bytes());
            return code;
        }
    };

    match execute(dispatcher, &args, out) {
        Ok(()) => 0,
        Err(e) => {
            // nowhere left to report a failing stderr; the status still carries it
            let _ = writeln!(err, "error: {e:#}");
            e.downcast_ref::<DriverError>()
                .map(DriverError::exit_code)
                .unwrap_or(1)
        }
    }
}
