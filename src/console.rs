// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use std::error::Error;
use std::io::{self, BufRead, Write};

use crate::color::Color;
use crate::universe::Universe;

const HELP: &str = r#"Commands:
  patch <fixture> <channels>        declare a new fixture
  set <fixture> <channel> <value>   set a single channel (0-255)
  rgb <fixture> <r> <g> <b>         map the fixture's RGB channel indices
  master <fixture> <channel>        map the fixture's master brightness channel
  color <fixture> <color>           set the fixture color (name or hex)
  brightness <fixture> <value>      set the fixture master brightness (0-255)
  list                              list fixtures and channel values
  send                              apply all buffered channel values
  help                              show this help
  quit                              exit"#;

/// A parsed console command.
#[derive(Debug, PartialEq)]
enum ConsoleCommand {
    Patch { name: String, channels: u16 },
    Set { name: String, channel: u16, value: u8 },
    Rgb { name: String, red: u16, green: u16, blue: u16 },
    Master { name: String, channel: u16 },
    Color { name: String, color: Color },
    Brightness { name: String, value: u8 },
    List,
    Send,
    Help,
    Quit,
}

/// Runs the interactive console against the universe until EOF or `quit`.
/// Malformed input and failed operations are reported and the loop continues.
pub fn run(universe: &mut Universe) -> Result<(), Box<dyn Error>> {
    println!("dmxbridge console. Type 'help' for commands, 'quit' to exit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => return Ok(()),
            Ok(Some(command)) => {
                if let Err(e) = execute(universe, command) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Parses a single console line. Empty lines parse to nothing.
fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, Box<dyn Error>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    let command = match fields[0] {
        "patch" => {
            require_args(&fields, 2, "patch <fixture> <channels>")?;
            ConsoleCommand::Patch {
                name: fields[1].to_string(),
                channels: fields[2].parse()?,
            }
        }
        "set" => {
            require_args(&fields, 3, "set <fixture> <channel> <value>")?;
            ConsoleCommand::Set {
                name: fields[1].to_string(),
                channel: fields[2].parse()?,
                value: fields[3].parse()?,
            }
        }
        "rgb" => {
            require_args(&fields, 4, "rgb <fixture> <r> <g> <b>")?;
            ConsoleCommand::Rgb {
                name: fields[1].to_string(),
                red: fields[2].parse()?,
                green: fields[3].parse()?,
                blue: fields[4].parse()?,
            }
        }
        "master" => {
            require_args(&fields, 2, "master <fixture> <channel>")?;
            ConsoleCommand::Master {
                name: fields[1].to_string(),
                channel: fields[2].parse()?,
            }
        }
        "color" => {
            require_args(&fields, 2, "color <fixture> <color>")?;
            ConsoleCommand::Color {
                name: fields[1].to_string(),
                color: fields[2].parse()?,
            }
        }
        "brightness" => {
            require_args(&fields, 2, "brightness <fixture> <value>")?;
            ConsoleCommand::Brightness {
                name: fields[1].to_string(),
                value: fields[2].parse()?,
            }
        }
        "list" => ConsoleCommand::List,
        "send" => ConsoleCommand::Send,
        "help" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        unknown => return Err(format!("unknown command '{}'", unknown).into()),
    };
    Ok(Some(command))
}

/// Checks the argument count of a console command.
fn require_args(fields: &[&str], expected: usize, usage: &str) -> Result<(), Box<dyn Error>> {
    if fields.len() != expected + 1 {
        return Err(format!("usage: {}", usage).into());
    }
    Ok(())
}

/// Executes a parsed console command against the universe.
fn execute(universe: &mut Universe, command: ConsoleCommand) -> Result<(), Box<dyn Error>> {
    match command {
        ConsoleCommand::Patch { name, channels } => universe.create_fixture(&name, channels)?,
        ConsoleCommand::Set {
            name,
            channel,
            value,
        } => universe.update_channel(&name, channel, value)?,
        ConsoleCommand::Rgb {
            name,
            red,
            green,
            blue,
        } => universe.set_rgb_channels(&name, red, green, blue)?,
        ConsoleCommand::Master { name, channel } => {
            universe.set_brightness_channel(&name, channel)?
        }
        ConsoleCommand::Color { name, color } => universe.update_color(&name, color)?,
        ConsoleCommand::Brightness { name, value } => universe.update_brightness(&name, value)?,
        ConsoleCommand::List => {
            for fixture in universe.fixtures() {
                println!(
                    "- {} ({} channels): {:?}",
                    fixture.name(),
                    fixture.num_channels(),
                    fixture.channels()
                );
            }
        }
        ConsoleCommand::Send => universe.send()?,
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}
