//! The `formbar-rs` binary.

use std::path::PathBuf;

use anyhow::Context;
use formbar_rs_cli::commands::register_builtin_commands;
use formbar_rs_cli::CommandRegistry;
use formbar_rs_core::logging::setup_logging;
use formbar_rs_core::settings_loader;

fn main() -> anyhow::Result<()> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings = match matches.get_one::<PathBuf>("settings") {
        Some(path) => settings_loader::from_file_with_env(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => settings_loader::from_env(),
    };
    setup_logging(&settings);

    registry.execute(&matches, &settings)?;
    Ok(())
}
