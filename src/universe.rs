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

use tracing::{debug, warn};

use crate::color::Color;
use crate::fixture::{Fixture, RgbChannels};
use crate::protocol::Command;
use crate::transport::LineTransport;

/// Typed errors for fixture operations. A failed operation mutates no state
/// and emits no command.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("no fixture named '{0}'")]
    UnknownFixture(String),

    #[error("channel {channel} is out of range for fixture '{fixture}' ({num_channels} channels)")]
    InvalidChannel {
        fixture: String,
        channel: u16,
        num_channels: u16,
    },

    #[error("fixture '{0}' has no RGB channel mapping")]
    RgbChannelsNotMapped(String),

    #[error("fixture '{0}' has no master brightness channel")]
    BrightnessChannelNotMapped(String),

    #[error("transport write error: {0}")]
    Transport(#[from] std::io::Error),
}

/// The full set of fixtures tracked for one controller, together with the
/// transport the command stream is written to. The universe is owned by its
/// caller; operations mutate in-memory state and emit one command line per
/// mutation.
pub struct Universe {
    /// The fixtures, in creation order. Lookups return the first name match.
    fixtures: Vec<Fixture>,

    /// The transport commands are written to.
    transport: Box<dyn LineTransport>,
}

impl Universe {
    /// Creates a new, empty universe writing to the given transport.
    pub fn new(transport: Box<dyn LineTransport>) -> Universe {
        Universe {
            fixtures: Vec::new(),
            transport,
        }
    }

    /// Gets the fixtures in creation order.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Finds a fixture by exact name. When several fixtures share a name the
    /// first one created wins.
    pub fn find_fixture(&self, name: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|fixture| fixture.name() == name)
    }

    /// Creates a fixture with the given number of zero valued channels and
    /// declares it to the controller.
    pub fn create_fixture(&mut self, name: &str, num_channels: u16) -> Result<(), FixtureError> {
        if self.find_fixture(name).is_some() {
            warn!(
                fixture = name,
                "Duplicate fixture name, lookups will resolve to the first definition."
            );
        }

        self.fixtures.push(Fixture::new(name, num_channels));
        self.emit(Command::AddFixture {
            name: name.to_string(),
            num_channels,
        })
    }

    /// Sets the value of a single fixture channel and sends the update.
    pub fn update_channel(
        &mut self,
        name: &str,
        channel: u16,
        value: u8,
    ) -> Result<(), FixtureError> {
        let index = self.find_index(name)?;
        Self::check_channel(&self.fixtures[index], channel)?;

        self.fixtures[index].set_channel_value(channel, value);
        self.emit(Command::SetChannelValue {
            fixture: name.to_string(),
            channel,
            value,
        })
    }

    /// Records which of the fixture's channels are its red, green, and blue
    /// channels.
    pub fn set_rgb_channels(
        &mut self,
        name: &str,
        red: u16,
        green: u16,
        blue: u16,
    ) -> Result<(), FixtureError> {
        let index = self.find_index(name)?;
        for channel in [red, green, blue] {
            Self::check_channel(&self.fixtures[index], channel)?;
        }

        self.fixtures[index].map_rgb_channels(RgbChannels::new(red, green, blue));
        Ok(())
    }

    /// Records which of the fixture's channels is its master brightness
    /// channel.
    pub fn set_brightness_channel(&mut self, name: &str, channel: u16) -> Result<(), FixtureError> {
        let index = self.find_index(name)?;
        Self::check_channel(&self.fixtures[index], channel)?;

        self.fixtures[index].map_brightness_channel(channel);
        Ok(())
    }

    /// Writes a color into the fixture's mapped RGB channels, sends the three
    /// channel updates, and flushes. Requires the RGB channel mapping to have
    /// been recorded.
    pub fn update_color(&mut self, name: &str, color: Color) -> Result<(), FixtureError> {
        let index = self.find_index(name)?;
        let mapping = self.fixtures[index]
            .rgb_channels()
            .ok_or_else(|| FixtureError::RgbChannelsNotMapped(name.to_string()))?;

        let (red, green, blue) = color.components();
        let updates = [
            (mapping.red(), red),
            (mapping.green(), green),
            (mapping.blue(), blue),
        ];

        for (channel, value) in updates {
            self.fixtures[index].set_channel_value(channel, value);
        }
        for (channel, value) in updates {
            self.emit(Command::SetChannelValue {
                fixture: name.to_string(),
                channel,
                value,
            })?;
        }
        self.send()
    }

    /// Writes a value into the fixture's master brightness channel, sends the
    /// channel update, and flushes. Requires the brightness channel to have
    /// been recorded.
    pub fn update_brightness(&mut self, name: &str, value: u8) -> Result<(), FixtureError> {
        let index = self.find_index(name)?;
        let channel = self.fixtures[index]
            .brightness_channel()
            .ok_or_else(|| FixtureError::BrightnessChannelNotMapped(name.to_string()))?;

        self.fixtures[index].set_channel_value(channel, value);
        self.emit(Command::SetChannelValue {
            fixture: name.to_string(),
            channel,
            value,
        })?;
        self.send()
    }

    /// Signals the controller to apply all buffered channel values.
    pub fn send(&mut self) -> Result<(), FixtureError> {
        self.emit(Command::UpdateChannels)
    }

    /// Writes a single command to the transport.
    fn emit(&mut self, command: Command) -> Result<(), FixtureError> {
        let line = command.to_string();
        debug!(command = line.as_str(), "Sending controller command.");
        self.transport.write_line(&line)?;
        Ok(())
    }

    /// Finds the index of a fixture by exact name, first match wins.
    fn find_index(&self, name: &str) -> Result<usize, FixtureError> {
        self.fixtures
            .iter()
            .position(|fixture| fixture.name() == name)
            .ok_or_else(|| FixtureError::UnknownFixture(name.to_string()))
    }

    /// Validates a channel index against the fixture's channel count.
    fn check_channel(fixture: &Fixture, channel: u16) -> Result<(), FixtureError> {
        if channel >= fixture.num_channels() {
            return Err(FixtureError::InvalidChannel {
                fixture: fixture.name().to_string(),
                channel,
                num_channels: fixture.num_channels(),
            });
        }
        Ok(())
    }
}
