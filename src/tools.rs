// This file is part of fpgaplat, a collection of FPGA board descriptions for gateware builds.
//
// Copyright 2025 Canonical Ltd.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// fpgaplat is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// fpgaplat is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! Invocations of external programs (Vivado, ISE, xc3sprog, OpenOCD).
//!
//! Toolchains and programmers describe what they want to run as a [`ToolInvocation`] so the
//! exact command line can be inspected, printed, or run.

use crate::error::PlatformError;
use log::{debug, info, trace};
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// Script fed to the program's standard input.
    pub stdin: Option<String>,
    pub current_dir: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        ToolInvocation {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, script: impl Into<String>) -> Self {
        self.stdin = Some(script.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Run the program to completion.
    ///
    /// # Returns: `Result<String, PlatformError>`
    /// * `Ok(String)` - Standard output of the program
    /// * `Err(PlatformError::Tool)` - The program could not be started, or exited with a
    ///   failure status (the error then carries its standard error output)
    pub fn run(&self) -> Result<String, PlatformError> {
        info!("Running {self}");
        let tool_error = |e: io::Error| PlatformError::Tool {
            program: self.program.clone(),
            e,
        };

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(tool_error)?;
        let stdin = child.stdin.take();
        // stdin is fed from its own thread while stdout and stderr are drained here.
        let output = thread::scope(|scope| -> io::Result<Output> {
            let writer = match (&self.stdin, stdin) {
                (Some(script), Some(mut pipe)) => {
                    trace!("Writing script to {} stdin:\n{script}", self.program);
                    Some(scope.spawn(move || pipe.write_all(script.as_bytes())))
                }
                _ => None,
            };
            let output = child.wait_with_output()?;
            if let Some(writer) = writer {
                match writer.join() {
                    Ok(Ok(())) => {}
                    // The tool exited without reading all of its input; its status decides.
                    Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
                    Ok(Err(e)) => return Err(e),
                    Err(_) => return Err(io::Error::other("stdin writer panicked")),
                }
            }
            Ok(output)
        })
        .map_err(tool_error)?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("{} output:\n{stdout}", self.program);

        if output.status.success() {
            Ok(stdout)
        } else {
            Err(tool_error(io::Error::other(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            ))))
        }
    }
}

impl fmt::Display for ToolInvocation {
    /// Shell-like rendering, for logs and `--dry-run` output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        if let Some(dir) = &self.current_dir {
            write!(f, " (in {})", dir.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    fn display_quotes_arguments_with_spaces() {
        let invocation = ToolInvocation::new("openocd")
            .arg("-f")
            .arg("board/digilent_arty.cfg")
            .arg("-c")
            .arg("init; exit");
        expect_that!(
            invocation.to_string(),
            eq("openocd -f board/digilent_arty.cfg -c 'init; exit'")
        );
    }

    #[gtest]
    fn run_returns_stdout() {
        let output = ToolInvocation::new("sh")
            .args(["-c", "echo built"])
            .run()
            .expect("sh should run");
        expect_that!(output, eq("built\n"));
    }

    #[gtest]
    fn run_feeds_stdin() {
        let output = ToolInvocation::new("cat")
            .stdin("open_hw\nquit\n")
            .run()
            .expect("cat should run");
        expect_that!(output, eq("open_hw\nquit\n"));
    }

    #[gtest]
    fn large_stdin_is_echoed_back() {
        // Far more than a pipe buffer in both directions.
        let script = "set_property PROGRAM.FILE {top.bit} [current_hw_device]\n".repeat(20_000);
        let output = ToolInvocation::new("cat")
            .stdin(script.clone())
            .run()
            .expect("cat should run");
        assert_eq!(output.len(), script.len());
        assert!(output == script);
    }

    #[gtest]
    fn failing_tool_reports_stderr() {
        let result = ToolInvocation::new("sh")
            .args(["-c", "echo 'no cable found' >&2; exit 3"])
            .run();
        expect_that!(
            result,
            err(displays_as(contains_substring("no cable found")))
        );
    }

    #[gtest]
    fn missing_tool_is_an_error() {
        let result = ToolInvocation::new("fpgaplat-no-such-tool").run();
        expect_that!(
            result,
            err(displays_as(contains_substring("fpgaplat-no-such-tool")))
        );
    }
}
