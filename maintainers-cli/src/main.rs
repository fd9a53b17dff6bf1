use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use maintainers_rs::{
    change::parse_name_status,
    report,
    review::{ByEmail, IdentityJoin},
    source::{ApproverSource, ChangeSource, FileOwnershipSource},
    ChangedPathEntry, ComponentReviewInfo, Engine, Error, Identity,
};

const EXIT_INCOMPLETE: u8 = 1;
const EXIT_MALFORMED: u8 = 2;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[arg(short = 'f', long = "file")]
    maintainers_file: Option<PathBuf>,

    /// Log resolution details to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// How approvers are matched to maintainers.
    #[arg(long, value_enum, default_value_t = Join::Name)]
    join: Join,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Join {
    Name,
    Email,
}

#[derive(Subcommand)]
enum Command {
    /// Print the component and maintainers owning each file.
    Owners { paths: Vec<PathBuf> },

    /// Check whether the approvers cover every component touched by a change.
    Review {
        /// Output of `git diff --name-status -M`, or `-` for stdin.
        #[arg(long)]
        changes: PathBuf,

        /// Display name of an approver.
        #[arg(long = "approver")]
        approvers: Vec<String>,

        /// Email of an approver.
        #[arg(long = "approver-email")]
        approver_emails: Vec<String>,
    },

    /// List the components declared in the MAINTAINERS file.
    Components,
}

impl Cli {
    fn maintainers_path(&self) -> PathBuf {
        self.maintainers_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("./MAINTAINERS"))
    }

    fn approvers(&self) -> Vec<Identity> {
        let Command::Review {
            approvers,
            approver_emails,
            ..
        } = &self.command
        else {
            return Vec::new();
        };
        approvers
            .iter()
            .map(|name| Identity::new(name.as_str(), ""))
            .chain(approver_emails.iter().map(|email| Identity::new("", email.as_str())))
            .collect()
    }
}

/// Reads `git diff --name-status` output from a file, or stdin for `-`.
struct NameStatusFiles;

impl ChangeSource<Path> for NameStatusFiles {
    fn list_changed_entries(&self, path: &Path) -> maintainers_rs::Result<Vec<ChangedPathEntry>> {
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let output = if path == Path::new("-") {
            let mut output = String::new();
            io::stdin().read_to_string(&mut output).map_err(io_error)?;
            output
        } else {
            fs::read_to_string(path).map_err(io_error)?
        };
        parse_name_status(&output)
    }
}

struct Approvers(Vec<Identity>);

impl ApproverSource<Path> for Approvers {
    fn list_approvers(&self, _revision: &Path) -> maintainers_rs::Result<Vec<Identity>> {
        Ok(self.0.clone())
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let maintainers_path = cli.maintainers_path();
    let engine = match Engine::from_source(&FileOwnershipSource::new(&maintainers_path)) {
        Ok(engine) => engine,
        Err(Error::Format(err)) => {
            eprintln!("error: malformed {}: {}", maintainers_path.display(), err);
            return Ok(ExitCode::from(EXIT_MALFORMED));
        }
        Err(err) => return Err(err).context("unable to load maintainers file"),
    };
    tracing::debug!(
        path = %maintainers_path.display(),
        components = engine.index().components().len(),
        "loaded maintainers file"
    );

    match cli.join {
        Join::Name => run(&cli, &engine),
        Join::Email => run(&cli, &engine.with_join(ByEmail)),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run<J: IdentityJoin + Sync>(cli: &Cli, engine: &Engine<J>) -> Result<ExitCode> {
    match &cli.command {
        Command::Owners { paths } => {
            print_owners(engine, paths);
            Ok(ExitCode::SUCCESS)
        }
        Command::Review { changes, .. } => review(engine, changes, &Approvers(cli.approvers())),
        Command::Components => {
            for component in engine.index().components() {
                let kind = if component.is_review_component() {
                    "review"
                } else {
                    "unmaintained"
                };
                println!("{:<60}  {:<12}  {}", component.title, kind, join_patterns(component));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn review<J: IdentityJoin>(
    engine: &Engine<J>,
    changes: &Path,
    approvers: &Approvers,
) -> Result<ExitCode> {
    let entries = NameStatusFiles
        .list_changed_entries(changes)
        .with_context(|| format!("unable to read changes from {}", changes.display()))?;
    let approvers = approvers.list_approvers(changes)?;
    tracing::debug!(
        entries = entries.len(),
        approvers = approvers.len(),
        "evaluating review"
    );

    print!("{}", report::drift_report(&engine.detect_rename_drift(&entries)));
    print!("{}", report::reviewer_report(&engine.review_infos(&entries)));

    let info = engine.evaluate_review(&entries, &approvers);
    print!("{}", report::review_summary(&info));
    if info.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INCOMPLETE))
    }
}

fn print_owners<J: IdentityJoin + Sync>(engine: &Engine<J>, roots: &[PathBuf]) {
    let paths = collect_paths(roots);
    tracing::debug!(count = paths.len(), "resolving owners");

    #[cfg(feature = "rayon")]
    let infos = paths
        .par_iter()
        .map(|path| engine.resolve_ownership(path))
        .collect::<Vec<_>>();
    #[cfg(not(feature = "rayon"))]
    let infos = paths
        .iter()
        .map(|path| engine.resolve_ownership(path))
        .collect::<Vec<_>>();

    for info in &infos {
        print_owner(info);
    }
}

fn print_owner(info: &ComponentReviewInfo) {
    match &info.component {
        Some(component) if !info.maintainers.is_empty() => {
            let maintainers = info
                .maintainers
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{:<70}  {} ({})", info.affected_file, component, maintainers);
        }
        Some(component) => println!("{:<70}  {} (unmaintained)", info.affected_file, component),
        None => println!("{:<70}  (unowned)", info.affected_file),
    }
}

fn join_patterns(component: &maintainers_rs::Component) -> String {
    component
        .patterns
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

// Directories are walked; anything else, including paths that don't exist in
// the working tree, is resolved as given.
fn collect_paths(roots: &[PathBuf]) -> Vec<String> {
    let roots = if roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        roots.to_vec()
    };

    let mut paths = Vec::new();
    for root in roots {
        if root.is_dir() {
            paths.extend(walk_files(&root).map(|e| relative_path(e.path())));
        } else {
            paths.push(relative_path(&root));
        }
    }
    paths
}

fn relative_path(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

fn walk_files(root: impl AsRef<Path>) -> impl Iterator<Item = walkdir::DirEntry> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| !entry.file_type().is_dir())
        .filter(|entry| !entry.path().components().any(|c| c.as_os_str() == ".git"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::parse_from([
            "maintainers",
            "-f",
            "MAINTAINERS.test",
            "review",
            "--changes",
            "-",
            "--approver",
            "Dave Barach",
            "--approver-email",
            "ksekera@cisco.com",
        ]);
        assert_eq!(cli.maintainers_path(), PathBuf::from("MAINTAINERS.test"));
        assert_eq!(
            cli.approvers(),
            vec![
                Identity::new("Dave Barach", ""),
                Identity::new("", "ksekera@cisco.com"),
            ]
        );
    }

    #[test]
    fn test_default_maintainers_path() {
        let cli = Cli::parse_from(["maintainers", "components"]);
        assert_eq!(cli.maintainers_path(), PathBuf::from("./MAINTAINERS"));
        assert!(cli.approvers().is_empty());
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(Path::new("./src/vlib/main.c")), "src/vlib/main.c");
        assert_eq!(relative_path(Path::new("src/vlib/main.c")), "src/vlib/main.c");
    }
}
