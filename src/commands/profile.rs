//! `profile` subcommand

use crate::config::{ProfileAction, ProfileStore, TomlProfileStore};
use crate::types::FlattenError;
use crate::ui::format_request;

pub fn run(action: &ProfileAction, store: &TomlProfileStore) -> Result<(), FlattenError> {
    match action {
        ProfileAction::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No saved profiles in {}", store.dir().display());
            }
            for name in names {
                println!("{}", name);
            }
        }
        ProfileAction::Show { name } => {
            let request = store.load(name)?;
            let saved_at = store.saved_at(name)?;
            println!("Profile '{}' (saved {})", name, saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("{}", format_request(&request));
        }
        ProfileAction::Delete { name } => {
            store.delete(name)?;
            println!("Deleted profile '{}'", name);
        }
    }
    Ok(())
}
