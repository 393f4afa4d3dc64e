use clap::CommandFactory;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "restitch",
    about = "Reapply AI chat responses onto your local files from the terminal",
    long_about = None,
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip wrapper markup (fences, XML tags, thinking blocks) from a response.
    ///
    /// Reads FILE, or stdin when no file is given, and prints the cleaned
    /// text to stdout.
    Clean {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Parse a response into its ordered file and text items.
    Parse {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Known workspace names; leading path components matching one are
        /// split off into the item's workspace
        #[arg(long = "workspace")]
        workspaces: Vec<String>,
        /// Merge repeated mentions of a file by appending instead of
        /// overwriting
        #[arg(long)]
        append: bool,
        /// Output the item sequence as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a response's file changes onto a directory tree.
    ///
    /// Every file item is reconciled against its on-disk original (unified
    /// diff, conflict markers, truncated rewrite or full body) and written
    /// atomically. One file's failure never aborts the rest.
    Apply {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Directory the response's paths are resolved under
        #[arg(long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
        root: PathBuf,
        /// Show the diffs without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Snapshot touched files to a backup manifest before writing
        #[arg(long)]
        backup: bool,
        /// Merge repeated mentions of a file by appending instead of
        /// overwriting
        #[arg(long)]
        append: bool,
        /// Known workspace names for path resolution
        #[arg(long = "workspace")]
        workspaces: Vec<String>,
    },

    /// Compact source files for pasting into a chat prompt.
    ///
    /// Strips comments and elides function bodies per language family,
    /// printing `File:` headed blocks to stdout.
    Compact {
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// Force a language family (c-style, css, html, python) instead of
        /// inferring it from the file extension
        #[arg(long)]
        language: Option<String>,
    },

    /// Restore files from a backup manifest written by `apply --backup`.
    Restore {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,
        /// Directory the manifest's paths are resolved under
        #[arg(long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
        root: PathBuf,
    },

    /// Show instructions for enabling shell completions.
    Completions,
}

fn main() {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean { input } => restitch::commands::clean::run(input),
        Commands::Parse {
            input,
            workspaces,
            append,
            json,
        } => restitch::commands::parse::run(input, workspaces, append, json),
        Commands::Apply {
            input,
            root,
            dry_run,
            backup,
            append,
            workspaces,
        } => restitch::commands::apply::run(input, root, dry_run, backup, append, workspaces),
        Commands::Compact { files, language } => {
            restitch::commands::compact::run(files, language)
        }
        Commands::Restore { manifest, root } => restitch::commands::restore::run(manifest, root),
        Commands::Completions => {
            println!(
                "Bash:\n\
                echo \"source <(COMPLETE=bash restitch)\" >> ~/.bashrc\n\
                \n\
                Elvish:\n\
                echo \"eval (E:COMPLETE=elvish restitch | slurp)\" >> ~/.elvish/rc.elv\n\
                \n\
                Fish:\n\
                echo \"COMPLETE=fish restitch | source\" >> ~/.config/fish/config.fish\n\
                \n\
                Zsh:\n\
                echo \"source <(COMPLETE=zsh restitch)\" >> ~/.zshrc\n"
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
