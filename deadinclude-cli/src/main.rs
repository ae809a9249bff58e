//! deadinclude CLI - unused #include detector for C and C++ projects.
//!
//! Features:
//! - Recursive, parallel scan of a directory or a single file
//! - `deadinclude.toml` configuration
//! - Plain or JSON findings, dependency report, ledger dump
//! - Graphviz DOT visualization
//! - Auto-fix of unused include lines

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use deadinclude_core::{
    generate_dot, init_structured_logging, load_config, print_json, print_plain, AnalysisResult,
    Deadinclude, FixResult, UsageMode,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Unused #include detector for C and C++")]
pub struct Cli {
    /// File or directory to analyze
    #[arg(default_value = ".")]
    path: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Header names or patterns to ignore
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// How usage is decided: correlate (symbol intersection) or flags
    #[arg(long, value_name = "MODE")]
    mode: Option<UsageMode>,

    /// Print the dependency report (who includes each header)
    #[arg(long)]
    deps: bool,

    /// Print the full include ledger
    #[arg(long)]
    dump: bool,

    /// Generate Graphviz DOT output for the include graph
    #[arg(long)]
    dot: bool,

    /// Write DOT output to a specified file instead of stdout
    #[arg(long, value_name = "FILE")]
    dot_file: Option<String>,

    /// Remove the include lines of unused headers
    #[arg(long)]
    fix: bool,

    /// Show what --fix would remove without writing
    #[arg(long)]
    fix_dry_run: bool,
}

/// Security: Validates output file paths to prevent path traversal.
///
/// Rejects absolute paths, paths containing `..` and paths with NUL bytes.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() || path.starts_with('/') || path.starts_with('\\') {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    let normalized = path.replace('\\', "/");
    let traverses = p
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
        || normalized.split('/').any(|segment| segment == "..");
    if traverses {
        return Err(anyhow!(
            "Path traversal (..) not allowed in output paths: {}",
            path
        ));
    }

    Ok(p)
}

/// Directory holding `deadinclude.toml` for the analyzed path.
fn config_dir(path: &Path) -> &Path {
    if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    }
}

fn exit_code(result: &AnalysisResult) -> i32 {
    if result.has_unused() {
        1
    } else {
        0
    }
}

fn print_fix_summary(fix: &FixResult, dry_run: bool) {
    let mode = if dry_run { "DRY-RUN" } else { "FIX" };
    for removed in &fix.removed_includes {
        if dry_run {
            println!("[{}] Would remove {}", mode, removed);
        } else {
            println!("[{}] Removed {}", mode, removed);
        }
    }
    println!();
    println!("=== {} Summary ===", mode);
    println!("Includes removed: {}", fix.removed_includes.len());
    println!("Files modified:   {}", fix.modified_files.len());
    if !fix.kept_headers.is_empty() {
        println!(
            "Kept (no declared types): {}",
            fix.kept_headers.join(", ")
        );
    }
    if !fix.errors.is_empty() {
        println!("Errors: {}", fix.errors.len());
        for err in &fix.errors {
            eprintln!("  - {}", err);
        }
    }
}

/// Runs the CLI and returns the process exit code.
fn run(cli: Cli) -> Result<i32> {
    // Security: reject bad output paths before doing any work
    let dot_path = cli
        .dot_file
        .as_deref()
        .map(|file| validate_output_path(file).with_context(|| format!("Invalid output path: {}", file)))
        .transpose()?;

    let root = PathBuf::from(&cli.path);
    let config = load_config(config_dir(&root))?.unwrap_or_default();

    let mut builder = Deadinclude::new(&root)
        .with_config(&config)
        .ignore_patterns(cli.ignore.iter().cloned())
        .dry_run(cli.fix_dry_run);
    if let Some(mode) = cli.mode {
        builder = builder.mode(mode);
    }

    let result = builder
        .analyze()
        .with_context(|| format!("Failed to analyze {}", cli.path))?;

    if !result.skipped.is_empty() {
        eprintln!(
            "[WARN] {} file(s) could not be analyzed and were skipped.",
            result.skipped.len()
        );
    }

    // 1. Auto-fix mode
    if cli.fix || cli.fix_dry_run {
        let fix = builder.fix(&result)?;
        print_fix_summary(&fix, cli.fix_dry_run);
        return Ok(exit_code(&result));
    }

    // 2. Diagnostic reports replace the findings listing
    if cli.deps || cli.dump {
        if cli.dump {
            print!("{}", result.ledger.dump());
        }
        if cli.deps {
            print!("{}", result.ledger.dependency_report());
        }
    } else if cli.json || config.wants_json() {
        print_json(&result.findings, &result.stats);
    } else {
        print_plain(&result.findings);
    }

    // 3. DOT/Graphviz output (don't crash on write errors)
    if cli.dot || dot_path.is_some() {
        let dot = generate_dot(&result.ledger, &result.findings);
        match dot_path {
            Some(safe_path) => {
                if let Err(e) = fs::write(&safe_path, &dot) {
                    eprintln!("[WARN] DOT write failed to {}: {}", safe_path.display(), e);
                } else {
                    eprintln!("DOT graph saved to: {}", safe_path.display());
                }
            }
            None => println!("{}", dot),
        }
    }

    Ok(exit_code(&result))
}

fn main() {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadinclude internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    let code = match std::panic::catch_unwind(|| run(cli)) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            eprintln!("[ERROR] {:#}", e);
            2
        }
        Err(_) => 2,
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadinclude_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deadinclude").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_validate_output_path_accepts_relative() {
        assert_eq!(
            validate_output_path("out/graph.dot").unwrap(),
            PathBuf::from("out/graph.dot")
        );
    }

    #[test]
    fn test_validate_output_path_rejects_absolute() {
        assert!(validate_output_path("/tmp/graph.dot").is_err());
    }

    #[test]
    fn test_validate_output_path_rejects_traversal() {
        assert!(validate_output_path("../graph.dot").is_err());
        assert!(validate_output_path("out/../../graph.dot").is_err());
        assert!(validate_output_path("out\\..\\graph.dot").is_err());
    }

    #[test]
    fn test_validate_output_path_rejects_nul() {
        assert!(validate_output_path("graph\0.dot").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let parsed = cli(&["src", "--json", "--mode", "flags", "--ignore", "a.h", "b_*"]);
        assert_eq!(parsed.path, "src");
        assert!(parsed.json);
        assert_eq!(parsed.mode, Some(UsageMode::Flags));
        assert_eq!(parsed.ignore, vec!["a.h".to_string(), "b_*".to_string()]);

        let defaults = cli(&[]);
        assert_eq!(defaults.path, ".");
        assert_eq!(defaults.mode, None);
        assert!(!defaults.fix && !defaults.fix_dry_run);
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let parsed = Cli::try_parse_from(["deadinclude", "--mode", "sometimes"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_run_exit_codes() {
        let dir = create_temp_dir("exit");
        fs::write(dir.join("used.h"), "class Used {};\n").unwrap();
        fs::write(dir.join("main.cpp"), "#include \"used.h\"\nUsed u;\n").unwrap();
        let path = dir.display().to_string();
        assert_eq!(run(cli(&[path.as_str()])).unwrap(), 0);

        fs::write(dir.join("dead.h"), "class Dead {};\n").unwrap();
        fs::write(
            dir.join("main.cpp"),
            "#include \"used.h\"\n#include \"dead.h\"\nUsed u;\n",
        )
        .unwrap();
        assert_eq!(run(cli(&[path.as_str(), "--deps"])).unwrap(), 1);
        assert_eq!(run(cli(&[path.as_str(), "--ignore", "dead.h"])).unwrap(), 0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_run_fix_dry_run_keeps_files() {
        let dir = create_temp_dir("dry_run");
        fs::write(dir.join("dead.h"), "class Dead {};\n").unwrap();
        fs::write(dir.join("main.cpp"), "#include \"dead.h\"\n").unwrap();
        let path = dir.display().to_string();

        assert_eq!(run(cli(&[path.as_str(), "--fix-dry-run"])).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(dir.join("main.cpp")).unwrap(),
            "#include \"dead.h\"\n"
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_run_rejects_bad_dot_file() {
        let dir = create_temp_dir("dot");
        let path = dir.display().to_string();
        assert!(run(cli(&[path.as_str(), "--dot-file", "../escape.dot"])).is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_dir_for_file_and_directory() {
        let dir = create_temp_dir("config_dir");
        let file = dir.join("main.cpp");
        fs::write(&file, "").unwrap();
        assert_eq!(config_dir(&file), dir.as_path());
        assert_eq!(config_dir(&dir), dir.as_path());
        fs::remove_dir_all(&dir).ok();
    }
}
