use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};

use membank_cli::doc_index::{generate_index, GenerateIndexInput};
use membank_cli::session_archive::{archive_session, parse_session_payload, ArchiveSessionInput};
use membank_cli::tech_debt::{update_readme, UpdateReadmeInput};
use membank_cli::{default_development_dir, default_docs_dir, default_tech_debt_dir};

#[derive(Parser)]
#[command(
    name = "membank-cli",
    about = "Documentation maintenance for a .development/.memory-bank project layout",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    UpdateTechDebt(UpdateTechDebtArgs),
    GenerateIndex(GenerateIndexArgs),
    ArchiveSession(ArchiveSessionArgs),
}

/// Rewrite the generated issues section of the tech-debt README.
#[derive(Parser)]
struct UpdateTechDebtArgs {
    /// Project root (default: current directory)
    #[arg(long, value_name = "PATH", default_value = ".")]
    root: PathBuf,

    /// Issues directory (default: {root}/.development/tech-debt)
    #[arg(long, value_name = "PATH")]
    issues_dir: Option<PathBuf>,

    /// README to update (default: {issues-dir}/README.md)
    #[arg(long, value_name = "PATH")]
    readme: Option<PathBuf>,

    /// Output JSON instead of key=value lines
    #[arg(long)]
    json: bool,
}

/// Regenerate the development documentation index.
#[derive(Parser)]
struct GenerateIndexArgs {
    /// Project root (default: current directory)
    #[arg(long, value_name = "PATH", default_value = ".")]
    root: PathBuf,

    /// Development tree (default: {root}/.development)
    #[arg(long, value_name = "PATH")]
    development_dir: Option<PathBuf>,

    /// Public docs tree (default: {root}/docs)
    #[arg(long, value_name = "PATH")]
    docs_dir: Option<PathBuf>,

    /// Index file to write (default: {development-dir}/INDEX.md)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Project name for the index header (default: root directory name)
    #[arg(long, value_name = "NAME")]
    project_name: Option<String>,

    /// Output JSON instead of key=value lines
    #[arg(long)]
    json: bool,
}

/// Archive a session transcript described by a JSON payload on stdin.
#[derive(Parser)]
struct ArchiveSessionArgs {
    /// Output JSON instead of key=value lines
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::UpdateTechDebt(args) => run_update_tech_debt(args),
        Commands::GenerateIndex(args) => run_generate_index(args),
        Commands::ArchiveSession(args) => run_archive_session(args),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run_update_tech_debt(args: UpdateTechDebtArgs) -> Result<(), String> {
    let issues_dir = args
        .issues_dir
        .unwrap_or_else(|| default_tech_debt_dir(&args.root));
    let readme_path = args.readme.unwrap_or_else(|| issues_dir.join("README.md"));

    let out = update_readme(UpdateReadmeInput {
        issues_dir,
        readme_path,
        now: Local::now().naive_local(),
    })
    .map_err(|err| err.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "readme": out.readme_path,
            "issues": out.issues,
            "high": out.high,
            "medium": out.medium,
            "low": out.low,
            "changed": out.changed,
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
    } else {
        println!("readme={}", out.readme_path.display());
        println!("issues={}", out.issues);
        println!("high={}", out.high);
        println!("medium={}", out.medium);
        println!("low={}", out.low);
        println!("changed={}", out.changed);
    }

    Ok(())
}

fn run_generate_index(args: GenerateIndexArgs) -> Result<(), String> {
    let development_dir = args
        .development_dir
        .unwrap_or_else(|| default_development_dir(&args.root));
    let docs_dir = args.docs_dir.unwrap_or_else(|| default_docs_dir(&args.root));
    let output_path = args
        .output
        .unwrap_or_else(|| development_dir.join("INDEX.md"));
    let project_name = args.project_name.unwrap_or_else(|| root_name(&args.root));

    let out = generate_index(GenerateIndexInput {
        root: args.root,
        development_dir,
        docs_dir,
        output_path,
        project_name,
        now: Local::now().naive_local(),
    })
    .map_err(|err| err.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "index": out.index_path,
            "development_files": out.development_files,
            "docs_files": out.docs_files,
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
    } else {
        println!("index={}", out.index_path.display());
        println!("development_files={}", out.development_files);
        println!("docs_files={}", out.docs_files);
    }

    Ok(())
}

fn run_archive_session(args: ArchiveSessionArgs) -> Result<(), String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| format!("read stdin: {}", err))?;
    let payload = parse_session_payload(&raw).map_err(|err| err.to_string())?;

    let out = archive_session(ArchiveSessionInput {
        payload,
        now: Local::now().naive_local(),
    })
    .map_err(|err| err.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "destination": out.destination,
            "project_root": out.project_root,
            "filename": out.filename,
            "reason": out.reason,
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
    } else {
        println!("destination={}", out.destination.display());
        println!("project_root={}", out.project_root.display());
        println!("filename={}", out.filename);
        println!("reason={}", out.reason);
    }

    Ok(())
}

/// Header fallback for `--project-name`: the root directory's own name,
/// resolved so `.` names the current directory rather than nothing.
fn root_name(root: &Path) -> String {
    root.canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| "project".to_string())
}
