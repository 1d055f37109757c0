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

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use super::error::ConfigError;
use super::scene::Scene;
use crate::color::Color;

/// The default serial baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// A YAML representation of the serial link configuration.
#[derive(Deserialize, Clone)]
pub struct Serial {
    /// The path to the serial device. When absent, commands are written to
    /// stdout instead.
    device: Option<String>,

    /// The baud rate of the serial link.
    baud_rate: Option<u32>,
}

impl Serial {
    /// Creates a new serial configuration.
    #[allow(dead_code)]
    pub fn new(device: Option<String>, baud_rate: Option<u32>) -> Serial {
        Serial { device, baud_rate }
    }

    /// Gets the serial device path.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Gets the baud rate.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate.unwrap_or(DEFAULT_BAUD_RATE)
    }
}

/// A YAML representation of one fixture in the patch.
#[derive(Deserialize, Clone)]
pub struct Fixture {
    /// The name of the fixture.
    name: String,

    /// The number of channels.
    channels: u16,

    /// The red, green, and blue channel indices.
    rgb: Option<[u16; 3]>,

    /// The master brightness channel index.
    brightness: Option<u16>,
}

impl Fixture {
    /// Creates a new fixture configuration.
    #[allow(dead_code)]
    pub fn new(
        name: String,
        channels: u16,
        rgb: Option<[u16; 3]>,
        brightness: Option<u16>,
    ) -> Fixture {
        Fixture {
            name,
            channels,
            rgb,
            brightness,
        }
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Gets the RGB channel indices.
    pub fn rgb(&self) -> Option<[u16; 3]> {
        self.rgb
    }

    /// Gets the master brightness channel index.
    pub fn brightness(&self) -> Option<u16> {
        self.brightness
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} channels", self.name, self.channels)?;
        if let Some(rgb) = self.rgb {
            write!(f, ", rgb {}/{}/{}", rgb[0], rgb[1], rgb[2])?;
        }
        if let Some(brightness) = self.brightness {
            write!(f, ", brightness {}", brightness)?;
        }
        write!(f, ")")
    }
}

/// A YAML representation of a fixture patch: the serial link, the fixtures,
/// and any predefined scenes.
#[derive(Deserialize, Clone)]
pub struct Patch {
    /// The serial link configuration.
    serial: Option<Serial>,

    /// The fixtures, in declaration order.
    fixtures: Vec<Fixture>,

    /// Named scenes.
    scenes: Option<HashMap<String, Scene>>,
}

impl Patch {
    /// Creates a new patch.
    #[allow(dead_code)]
    pub fn new(
        serial: Option<Serial>,
        fixtures: Vec<Fixture>,
        scenes: Option<HashMap<String, Scene>>,
    ) -> Patch {
        Patch {
            serial,
            fixtures,
            scenes,
        }
    }

    /// Gets the serial configuration.
    pub fn serial(&self) -> Option<&Serial> {
        self.serial.as_ref()
    }

    /// Gets the fixtures.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Gets the scenes.
    pub fn scenes(&self) -> HashMap<String, Scene> {
        self.scenes.clone().unwrap_or_default()
    }

    /// Gets a scene by name.
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.as_ref().and_then(|scenes| scenes.get(name))
    }

    /// Validates the patch: channel mappings must be in range and scenes may
    /// only reference declared fixtures, valid channels, and parseable
    /// colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for fixture in &self.fixtures {
            if let Some(rgb) = fixture.rgb {
                for channel in rgb {
                    Self::check_channel(fixture, channel)?;
                }
            }
            if let Some(brightness) = fixture.brightness {
                Self::check_channel(fixture, brightness)?;
            }
        }

        for (name, scene) in self.scenes().iter() {
            for entry in scene {
                let fixture = match self
                    .fixtures
                    .iter()
                    .find(|fixture| fixture.name() == entry.fixture())
                {
                    Some(fixture) => fixture,
                    None => {
                        return Err(ConfigError::InvalidPatch(format!(
                            "scene '{}' references unknown fixture '{}'",
                            name,
                            entry.fixture()
                        )))
                    }
                };

                for channel in entry.channels().keys() {
                    Self::check_channel(fixture, *channel)?;
                }
                if entry.color().is_some() && fixture.rgb.is_none() {
                    return Err(ConfigError::InvalidPatch(format!(
                        "scene '{}' sets a color on fixture '{}', which has no RGB mapping",
                        name,
                        entry.fixture()
                    )));
                }
                if entry.brightness().is_some() && fixture.brightness.is_none() {
                    return Err(ConfigError::InvalidPatch(format!(
                        "scene '{}' sets brightness on fixture '{}', which has no brightness channel",
                        name,
                        entry.fixture()
                    )));
                }
                if let Some(color) = entry.color() {
                    if color.parse::<Color>().is_err() {
                        return Err(ConfigError::InvalidPatch(format!(
                            "scene '{}' has unparseable color '{}'",
                            name, color
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validates a configured channel index against the fixture's channel
    /// count.
    fn check_channel(fixture: &Fixture, channel: u16) -> Result<(), ConfigError> {
        if channel >= fixture.channels {
            return Err(ConfigError::InvalidPatch(format!(
                "channel {} is out of range for fixture '{}' ({} channels)",
                channel, fixture.name, fixture.channels
            )));
        }
        Ok(())
    }
}
