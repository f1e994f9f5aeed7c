//! A small continuous-integration driver for waf based projects.
//!
//! The build bot calls the driver with a command name (`configure`, `build`,
//! `run_tests` or `install`) and a JSON property bag. The driver turns the two into
//! a single waf command line, prints it, runs it and hands back the exit status.
//!
//! The main entry point is [`Dispatcher`]. [`Properties`] decodes the property bag,
//! [`command`] holds the per-operation argument rules and the [`command::Runner`]
//! seam used to execute them.

pub mod cli;
pub mod command;
pub mod coverage;
mod dispatcher;
pub mod env;
pub mod error;
pub mod external;
pub mod logging;
pub mod options;
pub mod properties;

pub use dispatcher::{Dispatcher, Outcome};
pub use error::{DriverError, ExitCode, Result};
pub use properties::Properties;
