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

use serde::Deserialize;

/// A scene is an ordered list of fixture looks.
pub type Scene = Vec<SceneEntry>;

/// A YAML representation of one fixture look within a scene.
#[derive(Deserialize, Clone)]
pub struct SceneEntry {
    /// The fixture the look applies to.
    fixture: String,

    /// Raw channel values, keyed by channel index.
    channels: Option<HashMap<u16, u8>>,

    /// A color for the fixture's RGB channels. Accepts well known names and
    /// hex notation.
    color: Option<String>,

    /// A value for the fixture's master brightness channel.
    brightness: Option<u8>,
}

impl SceneEntry {
    /// Creates a new scene entry.
    #[allow(dead_code)]
    pub fn new(
        fixture: String,
        channels: Option<HashMap<u16, u8>>,
        color: Option<String>,
        brightness: Option<u8>,
    ) -> SceneEntry {
        SceneEntry {
            fixture,
            channels,
            color,
            brightness,
        }
    }

    /// Gets the fixture name.
    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    /// Gets the raw channel values.
    pub fn channels(&self) -> HashMap<u16, u8> {
        self.channels.clone().unwrap_or_default()
    }

    /// Gets the color.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Gets the master brightness value.
    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }
}
