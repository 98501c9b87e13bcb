//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { preset, force } => {
            let written = init_config(path, preset.into(), force)?;
            println!("{}", formatter.success(&format!("Wrote {}", written.display())));
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Write a fresh configuration file using the given reduction settings.
pub fn init_config<'p>(
    path: &'p Path,
    reduction: factsift_reducer::ReductionConfig,
    force: bool,
) -> Result<&'p Path> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let config = Config {
        reduction,
        ..Config::default()
    };
    config.save_to(path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use factsift_reducer::ReductionConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_preset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        init_config(&path, ReductionConfig::lenient(), false).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.reduction, ReductionConfig::lenient());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        init_config(&path, ReductionConfig::default(), false).unwrap();
        let result = init_config(&path, ReductionConfig::aggressive(), false);
        assert!(matches!(result, Err(CliError::Config(_))));

        init_config(&path, ReductionConfig::aggressive(), true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().reduction, ReductionConfig::aggressive());
    }
}
