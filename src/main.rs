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
mod color;
mod config;
mod console;
mod fixture;
mod protocol;
mod transport;
mod universe;

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A serial command bridge for DMX lighting fixtures."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available serial devices.
    Devices {},
    /// Loads and verifies a fixture patch and lists its contents.
    Fixtures {
        /// The path to the patch file.
        patch_path: String,
    },
    /// Declares the patch to the controller and applies a scene.
    Scene {
        /// The path to the patch file.
        patch_path: String,
        /// The name of the scene to apply.
        scene_name: String,
    },
    /// Declares the patch to the controller and starts the interactive console.
    Run {
        /// The path to the patch file.
        patch_path: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Devices {} => {
            let ports = serialport::available_ports()?;

            if ports.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for port in ports {
                println!("- {}", port.port_name);
            }
        }
        Commands::Fixtures { patch_path } => {
            let patch = config::load_patch(&PathBuf::from(patch_path))?;

            println!("Fixtures (count: {}):", patch.fixtures().len());
            for fixture in patch.fixtures() {
                println!("- {}", fixture);
            }

            let mut scenes: Vec<String> = patch.scenes().into_keys().collect();
            if !scenes.is_empty() {
                // Sort the scenes so that the output is consistent.
                scenes.sort();

                println!("\nScenes (count: {}):", scenes.len());
                for scene in scenes.iter() {
                    println!("- {}", scene);
                }
            }
        }
        Commands::Scene {
            patch_path,
            scene_name,
        } => {
            let patch = config::load_patch(&PathBuf::from(patch_path))?;
            let mut universe = config::init_universe(&patch)?;
            config::apply_scene(&patch, &mut universe, &scene_name)?;
        }
        Commands::Run { patch_path } => {
            let patch = config::load_patch(&PathBuf::from(patch_path))?;
            let mut universe = config::init_universe(&patch)?;
            console::run(&mut universe)?;
        }
    }

    Ok(())
}
