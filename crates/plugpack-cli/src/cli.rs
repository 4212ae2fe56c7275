//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use plugpack_core::config::DEFAULT_DEPENDENCY_STUB;
use plugpack_core::config::DEFAULT_MAIN_FILE;
use plugpack_core::config::DEFAULT_PLUGIN_FOLDER;
use plugpack_core::config::DEFAULT_PLUGIN_NAME;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plugpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a plugin archive from the source folder
    Build(BuildArgs),
    /// Verify an archive's layout and, optionally, its contents
    Verify(VerifyArgs),
    /// List archive contents
    List(ListArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Identity of the plugin inside the archive.
#[derive(clap::Args)]
pub struct PluginArgs {
    /// Plugin folder name (top-level directory in the archive)
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PLUGIN_FOLDER)]
    pub folder: String,

    /// Main plugin file inside the folder
    #[arg(long, value_name = "FILE", default_value = DEFAULT_MAIN_FILE)]
    pub main_file: String,
}

#[derive(clap::Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub plugin: PluginArgs,

    /// Directory containing the plugin folder
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub source_root: PathBuf,

    /// Expected "Plugin Name:" header value
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PLUGIN_NAME)]
    pub plugin_name: String,

    /// Directory to write the archive to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Additional exclusion substring (case-insensitive, can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Do not apply the built-in exclusion list
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Compression level (1-9)
    #[arg(short = 'l', long, default_value = "6", value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: u8,

    /// Dependency loader expected inside the plugin folder
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DEPENDENCY_STUB)]
    pub dependency_stub: PathBuf,

    /// Skip the dependency loader check
    #[arg(long, conflicts_with = "dependency_stub")]
    pub no_dependency_check: bool,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub plugin: PluginArgs,

    /// Plugin source folder to audit archive contents against
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Additional exclusion substring used by the audit (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN", requires = "source")]
    pub exclude: Vec<String>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show detailed entry information
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["plugpack", "build"]).unwrap_or_else(|e| panic!("{e}"));
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.plugin.folder, DEFAULT_PLUGIN_FOLDER);
        assert_eq!(args.plugin.main_file, DEFAULT_MAIN_FILE);
        assert_eq!(args.plugin_name, DEFAULT_PLUGIN_NAME);
        assert_eq!(args.compression_level, 6);
        assert_eq!(args.source_root, PathBuf::from("."));
        assert!(args.exclude.is_empty());
        assert!(!args.no_default_excludes);
    }

    #[test]
    fn test_build_rejects_bad_compression_level() {
        assert!(Cli::try_parse_from(["plugpack", "build", "-l", "0"]).is_err());
        assert!(Cli::try_parse_from(["plugpack", "build", "-l", "10"]).is_err());
    }

    #[test]
    fn test_verify_exclude_requires_source() {
        assert!(Cli::try_parse_from(["plugpack", "verify", "a.zip", "-x", "secret"]).is_err());
        assert!(
            Cli::try_parse_from(["plugpack", "verify", "a.zip", "--source", "src", "-x", "secret"])
                .is_ok()
        );
    }
}
