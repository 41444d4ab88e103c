//! Command-line configuration

mod profile;

pub use profile::{ProfileStore, TomlProfileStore};

use crate::types::{ConsolidationRequest, ExtensionFilter, FlattenError, OperationMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Collect files from a nested tree into one flat folder
#[derive(Debug, Parser)]
#[command(name = "flattener", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding saved profiles
    #[arg(long, global = true, value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Consolidate SOURCE into DEST
    Run(RunArgs),

    /// Manage saved profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List saved profiles
    List,

    /// Print a saved profile
    Show { name: String },

    /// Delete a saved profile
    Delete { name: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Nested directory to collect files from
    pub source: Option<PathBuf>,

    /// Flat destination directory (created if missing)
    pub destination: Option<PathBuf>,

    /// Only include these extensions (repeatable or comma-separated)
    #[arg(short = 'e', long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Move files instead of copying them
    #[arg(long = "move", conflicts_with = "copy_files")]
    pub move_files: bool,

    /// Copy files (the default); overrides a profile saved with --move
    #[arg(long = "copy")]
    pub copy_files: bool,

    /// Start from a saved profile; explicit arguments override it
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Save the effective request as a profile before running
    #[arg(long, value_name = "NAME")]
    pub save_as: Option<String>,

    /// Print the result as JSON instead of a human summary
    #[arg(long)]
    pub json: bool,

    /// Hide progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Whether this run reads or writes a saved profile
    pub fn needs_profile_store(&self) -> bool {
        self.profile.is_some() || self.save_as.is_some()
    }

    /// Build the request for this run, layering explicit arguments over `base`.
    ///
    /// # Errors
    /// * `FlattenError::Config` if source or destination is missing from both,
    ///   or an extension is invalid
    pub fn to_request(
        &self,
        base: Option<ConsolidationRequest>,
    ) -> Result<ConsolidationRequest, FlattenError> {
        let source = self
            .source
            .clone()
            .or_else(|| base.as_ref().map(|b| b.source_root.clone()))
            .ok_or_else(|| FlattenError::Config("Missing SOURCE directory".to_string()))?;

        let destination = self
            .destination
            .clone()
            .or_else(|| base.as_ref().map(|b| b.dest_root.clone()))
            .ok_or_else(|| FlattenError::Config("Missing DEST directory".to_string()))?;

        let extension_filter = if self.extensions.is_empty() {
            base.as_ref().and_then(|b| b.extension_filter.clone())
        } else {
            Some(ExtensionFilter::new(&self.extensions)?)
        };

        let operation_mode = if self.move_files {
            OperationMode::Move
        } else if self.copy_files {
            OperationMode::Copy
        } else {
            base.as_ref()
                .map(|b| b.operation_mode)
                .unwrap_or(OperationMode::Copy)
        };

        let request = ConsolidationRequest {
            source_root: source,
            dest_root: destination,
            extension_filter,
            operation_mode,
        };
        request.validate()?;
        Ok(request)
    }
}

impl Cli {
    /// Profile store selected by `--profile-dir`, or the platform default
    pub fn profile_store(&self) -> Result<TomlProfileStore, FlattenError> {
        match &self.profile_dir {
            Some(dir) => Ok(TomlProfileStore::new(dir)),
            None => TomlProfileStore::default_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_run_with_extensions() {
        let cli = Cli::try_parse_from([
            "flattener", "run", "in", "out", "-e", "wav,aif", "--ext", "mp3", "--move",
        ])
        .expect("parse");

        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.source, Some(PathBuf::from("in")));
        assert_eq!(args.destination, Some(PathBuf::from("out")));
        assert_eq!(args.extensions, vec!["wav", "aif", "mp3"]);
        assert!(args.move_files);
    }

    #[test]
    fn test_parse_profile_subcommands() {
        let cli = Cli::try_parse_from(["flattener", "--profile-dir", "/p", "profile", "show", "x"])
            .expect("parse");
        assert_eq!(cli.profile_dir, Some(PathBuf::from("/p")));
        assert!(matches!(
            cli.command,
            Command::Profile {
                action: ProfileAction::Show { ref name }
            } if name == "x"
        ));
    }

    #[test]
    fn test_to_request_requires_paths() {
        let args = RunArgs::default();
        assert!(args.to_request(None).unwrap_err().is_config_error());
    }

    #[test]
    fn test_to_request_from_arguments() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let args = RunArgs {
            source: Some(src.path().to_path_buf()),
            destination: Some(dst.path().to_path_buf()),
            extensions: vec![".WAV".to_string()],
            ..RunArgs::default()
        };

        let request = args.to_request(None).unwrap();
        assert_eq!(request.operation_mode, OperationMode::Copy);
        assert_eq!(
            request.extension_filter.unwrap().iter().collect::<Vec<_>>(),
            vec!["wav"]
        );
    }

    #[test]
    fn test_to_request_overrides_profile() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let base = ConsolidationRequest::new(src.path(), dst.path())
            .with_extensions(ExtensionFilter::new(["wav"]).unwrap())
            .with_mode(OperationMode::Move);

        let args = RunArgs {
            destination: Some(other.path().to_path_buf()),
            ..RunArgs::default()
        };
        let request = args.to_request(Some(base)).unwrap();

        assert_eq!(request.source_root, src.path());
        assert_eq!(request.dest_root, other.path());
        assert_eq!(request.operation_mode, OperationMode::Move);
        assert!(request.extension_filter.is_some());
    }

    #[test]
    fn test_to_request_rejects_bad_extension() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let args = RunArgs {
            source: Some(src.path().to_path_buf()),
            destination: Some(dst.path().to_path_buf()),
            extensions: vec!["".to_string()],
            ..RunArgs::default()
        };
        assert!(args.to_request(None).unwrap_err().is_config_error());
    }

    #[test]
    fn test_copy_flag_overrides_move_profile() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let base = ConsolidationRequest::new(src.path(), dst.path()).with_mode(OperationMode::Move);

        let args = RunArgs {
            copy_files: true,
            ..RunArgs::default()
        };
        let request = args.to_request(Some(base)).unwrap();
        assert_eq!(request.operation_mode, OperationMode::Copy);
    }

    #[test]
    fn test_copy_and_move_conflict() {
        let err = Cli::try_parse_from(["flattener", "run", "in", "out", "--copy", "--move"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_needs_profile_store() {
        assert!(!RunArgs::default().needs_profile_store());
        let saving = RunArgs {
            save_as: Some("p".to_string()),
            ..RunArgs::default()
        };
        assert!(saving.needs_profile_store());
    }
}
