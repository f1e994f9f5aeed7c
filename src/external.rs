use crate::command::{Invocation, Runner};
use crate::env::Environment;
use crate::error::{DriverError, ExitCode, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Runs invocations as child processes with inherited stdio.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation, env: &Environment) -> Result<ExitCode> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let program = find_command_path(
            search_paths,
            &env.current_dir,
            Path::new(invocation.program()),
        )
        .ok_or_else(|| DriverError::ToolNotFound(invocation.program().to_string()))?;

        let mut child = Command::new(&*program)
            .args(invocation.args())
            .env_clear()
            .envs(&env.vars)
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    DriverError::ToolNotFound(format!("{}: {e}", program.display()))
                }
                _ => DriverError::Io(e),
            })?;
        let exit_status = child.wait()?;
        Ok(match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        })
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a program path the way a typical shell would.
///
/// - Absolute path: returned if it exists.
/// - `./foo` (any platform) or any relative path on non-Unix: looked up in `current_dir`.
/// - Relative with multiple components (e.g. `bin/python`): looked up in `current_dir`.
/// - Single component: searched in each directory of `search_paths` (PATH).
/// - Empty path: `None`.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    current_dir: &Path,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir {
        if let Some(found) = find_by_path(&current_dir.join(path)) {
            return Some(Cow::Owned(found.to_owned()));
        }
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(&current_dir.join(path)).map(|p| Cow::Owned(p.to_owned())),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| path.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Launcher;
    use std::fs::{self, File};

    #[test]
    #[cfg(unix)]
    fn absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(OsStr::new("/nowhere"), Path::new("/"), path)
            .expect("Expected to find /bin/sh via absolute path");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        let res = find_command_path(
            OsStr::new("/bin"),
            Path::new("/"),
            Path::new("/bin/nonexisting"),
        );
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_path() {
        let found = find_command_path(OsStr::new("/bin"), Path::new("/"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert!(found.as_ref().starts_with("/bin"), "got {:?}", found);
        assert!(found.as_ref().ends_with("sh"));
    }

    #[test]
    #[cfg(unix)]
    fn single_component_not_found_in_path() {
        let res = find_command_path(OsStr::new("/bin"), Path::new("/"), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    fn relative_paths_resolve_against_current_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(tmp.path().join("bin")).expect("create bin");
        File::create(tmp.path().join("bin").join("tool")).expect("touch bin/tool");
        File::create(tmp.path().join("local")).expect("touch local");

        let found = find_command_path(OsStr::new(""), tmp.path(), Path::new("bin/tool"))
            .expect("Expected to find bin/tool in current dir");
        assert_eq!(found.as_ref(), tmp.path().join("bin").join("tool"));

        let found = find_command_path(OsStr::new(""), tmp.path(), Path::new("./local"))
            .expect("Expected to find ./local in current dir");
        assert!(found.as_ref().ends_with("local"));
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(OsStr::new("/bin"), Path::new("/"), Path::new("")).is_none());
    }

    #[cfg(unix)]
    fn shell_env(dir: &Path) -> Environment {
        let mut env = Environment::empty(dir);
        env.set_var("PATH", "/bin:/usr/bin");
        env
    }

    #[test]
    #[cfg(unix)]
    fn exit_code_is_reported() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let launcher = Launcher::new("sh", vec!["-c".into(), "exit 3".into()]);
        let inv = Invocation::new(&launcher, vec!["build".into()]);
        let code = ProcessRunner.run(&inv, &shell_env(tmp.path())).unwrap();
        assert_eq!(code, 3);
    }

    #[test]
    #[cfg(unix)]
    fn signal_maps_above_128() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let launcher = Launcher::new("sh", vec!["-c".into(), "kill -9 $$".into()]);
        let inv = Invocation::new(&launcher, vec![]);
        let code = ProcessRunner.run(&inv, &shell_env(tmp.path())).unwrap();
        assert_eq!(code, 128 + 9);
    }

    #[test]
    fn missing_program_is_tool_not_found() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut env = Environment::empty(tmp.path());
        env.set_var("PATH", tmp.path());
        let launcher = Launcher::new("definitely-not-a-python", vec!["waf".into()]);
        let inv = Invocation::new(&launcher, vec!["build".into()]);
        let err = ProcessRunner.run(&inv, &env).unwrap_err();
        assert!(matches!(err, DriverError::ToolNotFound(_)));
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_program_is_tool_not_found() {
        let tmp = tempfile::tempdir().expect("tempdir");
        File::create(tmp.path().join("python3")).expect("touch python3");
        let mut env = Environment::empty(tmp.path());
        env.set_var("PATH", tmp.path());
        let launcher = Launcher::new("python3", vec!["waf".into()]);
        let inv = Invocation::new(&launcher, vec!["build".into()]);
        let err = ProcessRunner.run(&inv, &env).unwrap_err();
        assert!(matches!(err, DriverError::ToolNotFound(_)));
    }
}
