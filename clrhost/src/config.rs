//! Location of the managed bridge assembly and its runtime descriptor.

use crate::HostError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// File name of the managed bridge assembly.
pub const BRIDGE_ASSEMBLY_FILE: &str = "Bridge.dll";
/// File name of the runtime descriptor shipped next to the assembly.
pub const BRIDGE_RUNTIME_CONFIG_FILE: &str = "Bridge.runtimeconfig.json";

/// Where the managed side lives. Fixed once a backend initializes with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    pub assembly_path: PathBuf,
    pub config_path: PathBuf,
}

impl HostConfig {
    /// Config for an assembly whose descriptor sits alongside it
    /// (`Foo.dll` -> `Foo.runtimeconfig.json`).
    pub fn for_assembly(assembly_path: impl Into<PathBuf>) -> Self {
        let assembly_path = assembly_path.into();
        let config_path = assembly_path.with_extension("runtimeconfig.json");
        Self {
            assembly_path,
            config_path,
        }
    }

    /// Standard bridge layout inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            assembly_path: dir.join(BRIDGE_ASSEMBLY_FILE),
            config_path: dir.join(BRIDGE_RUNTIME_CONFIG_FILE),
        }
    }

    /// Standard bridge layout next to the running executable.
    pub fn from_loader_module() -> Result<Self, HostError> {
        let exe = std::env::current_exe()
            .map_err(|e| HostError::Config(format!("Failed to locate loader module: {}", e)))?;
        let dir = exe.parent().ok_or_else(|| {
            HostError::Config(format!("Loader module {:?} has no parent directory", exe))
        })?;
        Ok(Self::from_dir(dir))
    }

    /// Load a JSON descriptor.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        info!("Loading host config from {:?}", path);
        let file =
            File::open(path).map_err(|e| HostError::Config(format!("{:?}: {}", path, e)))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| HostError::Config(format!("{:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_dir_joins_fixed_names() {
        let config = HostConfig::from_dir(Path::new("/opt/game"));
        assert_eq!(config.assembly_path, PathBuf::from("/opt/game/Bridge.dll"));
        assert_eq!(
            config.config_path,
            PathBuf::from("/opt/game/Bridge.runtimeconfig.json")
        );
    }

    #[test]
    fn test_for_assembly_derives_descriptor_name() {
        let config = HostConfig::for_assembly("/opt/game/Bridge.dll");
        assert_eq!(
            config.config_path,
            PathBuf::from("/opt/game/Bridge.runtimeconfig.json")
        );

        // Dots in the assembly stem survive the extension swap.
        let config = HostConfig::for_assembly("Game.Bridge.dll");
        assert_eq!(config.config_path, PathBuf::from("Game.Bridge.runtimeconfig.json"));
    }

    #[test]
    fn test_from_loader_module_uses_exe_directory() {
        let config = HostConfig::from_loader_module().unwrap();
        assert!(config.assembly_path.ends_with(BRIDGE_ASSEMBLY_FILE));
        assert!(config.config_path.ends_with(BRIDGE_RUNTIME_CONFIG_FILE));
        assert_eq!(config.assembly_path.parent(), config.config_path.parent());
    }

    #[test]
    fn test_load_reads_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{"assembly_path": "/opt/game/Bridge.dll",
                "config_path": "/opt/game/Bridge.runtimeconfig.json"}}"#
        )
        .unwrap();

        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config, HostConfig::from_dir(Path::new("/opt/game")));
    }

    #[test]
    fn test_load_missing_descriptor_is_config_error() {
        let err = HostConfig::load(Path::new("/nonexistent/host.json")).unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }
}
