use clap::Subcommand;
use fittartans_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-separated key (e.g. "top_k", "active_window.start")
    Get { key: String },
    /// Update one value and save; lists and tables are given as JSON
    Set { key: String, value: String },
    /// Print the whole configuration
    List {
        /// JSON instead of the on-disk TOML
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the config file with defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    if let ConfigAction::Reset = action {
        Config::default().save()?;
        println!("config reset to defaults");
        return Ok(());
    }
    if let ConfigAction::Path = action {
        println!("{}", Config::path()?.display());
        return Ok(());
    }

    let mut config = Config::load()?;
    match action {
        ConfigAction::Get { key } => {
            let value = config.get(&key).ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            if let Some(updated) = config.get(&key) {
                println!("{key} = {updated}");
            }
        }
        ConfigAction::List { json: true } => println!("{}", serde_json::to_string_pretty(&config)?),
        ConfigAction::List { json: false } => print!("{}", toml::to_string_pretty(&config)?),
        ConfigAction::Reset | ConfigAction::Path => {}
    }
    Ok(())
}
