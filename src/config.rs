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
use std::fs;
use std::path::Path;

use tracing::info;

use crate::color::Color;
use crate::transport;
use crate::universe::Universe;

use self::error::ConfigError;
use self::patch::Patch;

pub mod error;
pub mod patch;
pub mod scene;

/// Loads and validates a patch from a YAML file.
pub fn load_patch(file: &Path) -> Result<Patch, ConfigError> {
    let patch: Patch = serde_yml::from_str(&fs::read_to_string(file)?)?;
    patch.validate()?;
    Ok(patch)
}

/// Creates a universe from the given patch: opens the transport and declares
/// every fixture and its channel mappings in declaration order.
pub fn init_universe(patch: &Patch) -> Result<Universe, Box<dyn Error>> {
    let transport = transport::create_transport(patch.serial())?;
    let mut universe = Universe::new(transport);
    declare_patch(patch, &mut universe)?;
    Ok(universe)
}

/// Declares every fixture in the patch into the universe.
pub fn declare_patch(patch: &Patch, universe: &mut Universe) -> Result<(), Box<dyn Error>> {
    for fixture in patch.fixtures() {
        universe.create_fixture(fixture.name(), fixture.channels())?;
        if let Some(rgb) = fixture.rgb() {
            universe.set_rgb_channels(fixture.name(), rgb[0], rgb[1], rgb[2])?;
        }
        if let Some(brightness) = fixture.brightness() {
            universe.set_brightness_channel(fixture.name(), brightness)?;
        }
    }

    info!(fixtures = patch.fixtures().len(), "Patch declared.");
    Ok(())
}

/// Applies the named scene from the patch: raw channel writes first, then
/// colors, then brightness, one fixture look at a time, with a final flush.
pub fn apply_scene(
    patch: &Patch,
    universe: &mut Universe,
    name: &str,
) -> Result<(), Box<dyn Error>> {
    let scene = patch
        .scene(name)
        .ok_or_else(|| format!("no scene named '{}'", name))?;

    for entry in scene {
        let mut channels: Vec<(u16, u8)> = entry.channels().into_iter().collect();
        channels.sort_by_key(|(channel, _)| *channel);
        for (channel, value) in channels {
            universe.update_channel(entry.fixture(), channel, value)?;
        }

        if let Some(color) = entry.color() {
            universe.update_color(entry.fixture(), color.parse::<Color>()?)?;
        }
        if let Some(brightness) = entry.brightness() {
            universe.update_brightness(entry.fixture(), brightness)?;
        }
    }

    universe.send()?;
    info!(scene = name, "Scene applied.");
    Ok(())
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::io::Write;

    use crate::transport::RecordingTransport;
    use crate::universe::Universe;

    use super::error::ConfigError;
    use super::patch::{Patch, DEFAULT_BAUD_RATE};

    const PATCH: &str = r##"
serial:
  device: /dev/ttyACM0
  baud_rate: 57600
fixtures:
  - name: par1
    channels: 4
    rgb: [0, 1, 2]
    brightness: 3
  - name: strobe
    channels: 2
scenes:
  warm:
    - fixture: par1
      color: "#ff8000"
      brightness: 200
    - fixture: strobe
      channels:
        0: 10
        1: 128
"##;

    fn parse(yaml: &str) -> Result<Patch, ConfigError> {
        let patch: Patch = serde_yml::from_str(yaml)?;
        patch.validate()?;
        Ok(patch)
    }

    #[test]
    fn test_parse_patch() -> Result<(), Box<dyn Error>> {
        let patch = parse(PATCH)?;

        let serial = patch.serial().unwrap();
        assert_eq!(serial.device(), Some("/dev/ttyACM0"));
        assert_eq!(serial.baud_rate(), 57600);

        assert_eq!(patch.fixtures().len(), 2);
        let par1 = &patch.fixtures()[0];
        assert_eq!(par1.name(), "par1");
        assert_eq!(par1.channels(), 4);
        assert_eq!(par1.rgb(), Some([0, 1, 2]));
        assert_eq!(par1.brightness(), Some(3));
        assert_eq!(par1.to_string(), "par1 (4 channels, rgb 0/1/2, brightness 3)");

        let strobe = &patch.fixtures()[1];
        assert!(strobe.rgb().is_none());
        assert_eq!(strobe.to_string(), "strobe (2 channels)");

        assert!(patch.scene("warm").is_some());
        assert!(patch.scene("cold").is_none());
        Ok(())
    }

    #[test]
    fn test_baud_rate_default() -> Result<(), Box<dyn Error>> {
        let patch =
            parse("fixtures:\n  - name: par1\n    channels: 4\nserial:\n  device: /dev/null\n")?;
        assert_eq!(patch.serial().unwrap().baud_rate(), DEFAULT_BAUD_RATE);
        Ok(())
    }

    #[test]
    fn test_validate_rgb_out_of_range() {
        let result = parse("fixtures:\n  - name: par1\n    channels: 3\n    rgb: [0, 1, 3]\n");
        assert!(matches!(result, Err(ConfigError::InvalidPatch(_))));
    }

    #[test]
    fn test_validate_brightness_out_of_range() {
        let result = parse("fixtures:\n  - name: par1\n    channels: 3\n    brightness: 3\n");
        assert!(matches!(result, Err(ConfigError::InvalidPatch(_))));
    }

    #[test]
    fn test_validate_scene_unknown_fixture() {
        let result = parse(
            "fixtures:\n  - name: par1\n    channels: 4\nscenes:\n  warm:\n    - fixture: par2\n      channels:\n        0: 1\n",
        );
        assert!(matches!(result, Err(ConfigError::InvalidPatch(_))));
    }

    #[test]
    fn test_validate_scene_color_without_rgb_mapping() {
        let result = parse(
            "fixtures:\n  - name: par1\n    channels: 4\nscenes:\n  warm:\n    - fixture: par1\n      color: red\n",
        );
        assert!(matches!(result, Err(ConfigError::InvalidPatch(_))));
    }

    #[test]
    fn test_validate_scene_bad_color() {
        let result = parse(
            "fixtures:\n  - name: par1\n    channels: 4\n    rgb: [0, 1, 2]\nscenes:\n  warm:\n    - fixture: par1\n      color: sparkly\n",
        );
        assert!(matches!(result, Err(ConfigError::InvalidPatch(_))));
    }

    #[test]
    fn test_load_patch_from_file() -> Result<(), Box<dyn Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(PATCH.as_bytes())?;

        let patch = super::load_patch(file.path())?;
        assert_eq!(patch.fixtures().len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_patch_missing_file() {
        let result = super::load_patch(std::path::Path::new("/nonexistent/patch.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_declare_patch() -> Result<(), Box<dyn Error>> {
        let patch = parse(PATCH)?;
        let transport = RecordingTransport::new();
        let lines = transport.lines_handle();
        let mut universe = Universe::new(Box::new(transport));

        super::declare_patch(&patch, &mut universe)?;

        assert_eq!(
            *lines.lock().unwrap(),
            vec![
                "addFixture:par1,4".to_string(),
                "addFixture:strobe,2".to_string()
            ]
        );
        let par1 = universe.find_fixture("par1").unwrap();
        assert!(par1.rgb_channels().is_some());
        assert_eq!(par1.brightness_channel(), Some(3));
        Ok(())
    }

    #[test]
    fn test_apply_scene() -> Result<(), Box<dyn Error>> {
        let patch = parse(PATCH)?;
        let transport = RecordingTransport::new();
        let lines = transport.lines_handle();
        let mut universe = Universe::new(Box::new(transport));
        super::declare_patch(&patch, &mut universe)?;
        lines.lock().unwrap().clear();

        super::apply_scene(&patch, &mut universe, "warm")?;

        assert_eq!(
            universe.find_fixture("par1").unwrap().channels(),
            &[255, 128, 0, 200]
        );
        assert_eq!(universe.find_fixture("strobe").unwrap().channels(), &[10, 128]);
        assert_eq!(
            lines.lock().unwrap().last(),
            Some(&"updateChannels".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_apply_unknown_scene() -> Result<(), Box<dyn Error>> {
        let patch = parse(PATCH)?;
        let transport = RecordingTransport::new();
        let mut universe = Universe::new(Box::new(transport));
        super::declare_patch(&patch, &mut universe)?;

        assert!(super::apply_scene(&patch, &mut universe, "cold").is_err());
        Ok(())
    }
}
