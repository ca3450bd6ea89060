//! `compdb config`: inspects the configuration.

use compdb_config::{local_config_path, user_config_path, KNOWN_KEYS};

use crate::{ConfigCommand, GlobalArgs};

/// Runs one `compdb config` subcommand.
pub fn run(command: &ConfigCommand, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    match command {
        ConfigCommand::PrintUserConf => {
            let path = user_config_path().ok_or("cannot determine the user configuration directory")?;
            println!("{}", path.display());
        }
        ConfigCommand::PrintLocalConf => match local_config_path(&global.cwd) {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("error: local configuration not found");
                return Ok(1);
            }
        },
        ConfigCommand::List => {
            for key in KNOWN_KEYS {
                println!("{key}");
            }
        }
        ConfigCommand::Dump => {
            let config = global.load_config()?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Get { key } => {
            let config = global.load_config()?;
            println!("{}", config.get(key)?);
        }
    }
    Ok(0)
}
