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

use std::fmt;

/// A command in the controller wire protocol. Commands are comma/colon
/// delimited ASCII, one per line, with no checksum or acknowledgment.
/// Fixtures are addressed by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Declares a fixture and its channel count.
    AddFixture { name: String, num_channels: u16 },

    /// Sets a single channel of a fixture.
    SetChannelValue {
        fixture: String,
        channel: u16,
        value: u8,
    },

    /// Applies all buffered channel values.
    UpdateChannels,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddFixture { name, num_channels } => {
                write!(f, "addFixture:{},{}", name, num_channels)
            }
            Command::SetChannelValue {
                fixture,
                channel,
                value,
            } => {
                write!(f, "setChannelValue:{},{},{}", fixture, channel, value)
            }
            Command::UpdateChannels => write!(f, "updateChannels"),
        }
    }
}
