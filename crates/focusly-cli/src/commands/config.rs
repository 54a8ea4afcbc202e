use clap::Subcommand;
use focusly_core::storage::Database;
use focusly_core::UserSettings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Dot-separated key (e.g. "theme", "pomodoro.focusTime")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut snapshot = db.load_snapshot()?;

    match action {
        ConfigAction::Get { key } => match snapshot.settings.get(&key) {
            Some(value) => println!("{value}"),
            None => {
                eprintln!("unknown key: {key}");
                std::process::exit(1);
            }
        },
        ConfigAction::Set { key, value } => {
            snapshot.settings.set(&key, &value)?;
            db.save_snapshot(&snapshot)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(&snapshot.settings)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            snapshot.settings = UserSettings::default();
            db.save_snapshot(&snapshot)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
