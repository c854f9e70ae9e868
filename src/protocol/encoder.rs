// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Renders typed worker commands into their wire text form.
//!
//! A command is used in one of two places: as the argument list of a newly
//! launched worker ([`Command::invocation_args`]), or as one line written to
//! an interactive worker's input channel ([`Command::to_line`]).

use std::fmt;

use crate::boards::BoardAddress;

use super::values::{format_value, PWM_MAX_STEPS};

/// Flag that points the worker at a remote server.
pub const SERVER_FLAG: &str = "-s";
/// Flag that puts the worker in interactive (line-per-command) mode.
pub const INTERACTIVE_FLAG: &str = "-i";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `adisc2`: enumerate boards and print the table as JSON.
    Discover,
    /// `din <address> <pin>`: stream digital input edges.
    DigitalRead { address: BoardAddress, pin: u32 },
    /// `ain_stdio <address> <pin>`: stream analog diagnostic samples.
    AnalogRead { address: BoardAddress, pin: u32 },
    /// `dout <address> <pin>`: keep running, reading one level per input line.
    DigitalWriteStream { address: BoardAddress, pin: u32 },
    /// `dout <address> <pin> <level>`: set a boolean output.
    DigitalWrite { address: BoardAddress, pin: u32, level: f64 },
    /// `aout <address> <pin> <steps>`: set a PWM output, `0..=1439`.
    AnalogWrite { address: BoardAddress, pin: u32, steps: u32 },
    /// `-i`: accept successive `dout`/`aout` lines on the input channel.
    Interactive,
}

impl Command {
    /// Subcommand and arguments, without any server prefix.
    pub fn args(&self) -> Vec<String> {
        match self {
            Command::Discover => vec!["adisc2".to_string()],
            Command::DigitalRead { address, pin } => {
                vec!["din".to_string(), address.to_string(), pin.to_string()]
            }
            Command::AnalogRead { address, pin } => {
                vec!["ain_stdio".to_string(), address.to_string(), pin.to_string()]
            }
            Command::DigitalWriteStream { address, pin } => {
                vec!["dout".to_string(), address.to_string(), pin.to_string()]
            }
            Command::DigitalWrite { address, pin, level } => vec![
                "dout".to_string(),
                address.to_string(),
                pin.to_string(),
                format_value(*level),
            ],
            Command::AnalogWrite { address, pin, steps } => vec![
                "aout".to_string(),
                address.to_string(),
                pin.to_string(),
                (*steps).min(PWM_MAX_STEPS).to_string(),
            ],
            Command::Interactive => vec![INTERACTIVE_FLAG.to_string()],
        }
    }

    /// Full argument list for launching a worker, optionally prefixed with
    /// the remote server flag.
    pub fn invocation_args(&self, server: Option<&str>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(server) = server {
            args.push(SERVER_FLAG.to_string());
            args.push(server.to_string());
        }
        args.extend(self.args());
        args
    }

    /// The command as one input line for an interactive worker (no newline).
    pub fn to_line(&self) -> String {
        self.args().join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> BoardAddress {
        BoardAddress::from(5)
    }

    #[test]
    fn test_wire_forms() {
        struct TestCase {
            command: Command,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase { command: Command::Discover, expected: "adisc2" },
            TestCase { command: Command::DigitalRead { address: addr(), pin: 3 }, expected: "din 5 3" },
            TestCase { command: Command::AnalogRead { address: addr(), pin: 9 }, expected: "ain_stdio 5 9" },
            TestCase { command: Command::DigitalWriteStream { address: addr(), pin: 2 }, expected: "dout 5 2" },
            TestCase { command: Command::DigitalWrite { address: addr(), pin: 2, level: 1.0 }, expected: "dout 5 2 1" },
            TestCase { command: Command::DigitalWrite { address: addr(), pin: 2, level: 0.0 }, expected: "dout 5 2 0" },
            TestCase { command: Command::AnalogWrite { address: addr(), pin: 1, steps: 720 }, expected: "aout 5 1 720" },
            TestCase { command: Command::AnalogWrite { address: addr(), pin: 1, steps: 5000 }, expected: "aout 5 1 1439" },
            TestCase { command: Command::Interactive, expected: "-i" },
        ];

        for case in test_cases {
            assert_eq!(case.command.to_line(), case.expected);
        }
    }

    #[test]
    fn test_invocation_with_server_override() {
        let command = Command::DigitalRead { address: addr(), pin: 3 };
        assert_eq!(
            command.invocation_args(Some("tcp://192.168.2.11:5555")),
            vec!["-s", "tcp://192.168.2.11:5555", "din", "5", "3"]
        );
        assert_eq!(command.invocation_args(None), vec!["din", "5", "3"]);
        assert_eq!(Command::Interactive.invocation_args(Some("x")), vec!["-s", "x", "-i"]);
    }
}
