//! tachyon-scene CLI - check and dump Tachyon scene files
//!
//! Parses each file into a recorded call list, reporting failures per file.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};
use tachyon_scene::{parse_scene_file_with, ErrorKind, ParseError, ParseOptions, RecordingScene};

#[derive(Parser)]
#[command(name = "tachyon-scene")]
#[command(about = "Parse Tachyon scene files and report what they build", long_about = None)]
struct Cli {
    /// Scene files to parse
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML file with parser options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the recorded scene calls as JSON
    #[arg(long)]
    dump: bool,

    /// Fail when a file ends without END_SCENE
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = match &cli.config {
        Some(path) => ParseOptions::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => ParseOptions::default(),
    };
    if cli.strict {
        options = options.strict_end_of_input(true);
    }

    let mut failed = 0;
    for file in &cli.files {
        if let Some(format) = foreign_format(file) {
            println!(
                "{}: {} files are read by a separate importer, skipping",
                file.display(),
                format
            );
            continue;
        }
        if let Err(err) = parse_one(file, &options, cli.dump) {
            eprintln!("{}", describe(&err));
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} scene files failed to parse", failed, cli.files.len());
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

/// Scene formats that other importers handle.
fn foreign_format(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    match ext.to_lowercase().as_str() {
        "nff" => Some("NFF"),
        "ac" => Some("AC3D"),
        "mgf" => Some("MGF"),
        _ => None,
    }
}

fn parse_one(path: &Path, options: &ParseOptions, dump: bool) -> Result<(), ParseError> {
    let mut scene = RecordingScene::new();
    let summary = parse_scene_file_with(path, &mut scene, options)?;
    info!("{}: {} scene calls recorded", path.display(), scene.calls.len());

    if dump {
        match serde_json::to_string_pretty(&scene.calls) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{}: cannot serialize scene: {}", path.display(), e),
        }
    }
    println!(
        "{}: {} objects, {} named textures, {} primitives",
        path.display(),
        summary.objects_parsed,
        summary.textures_defined,
        scene.object_count()
    );
    Ok(())
}

/// User-facing message for a failed parse.
fn describe(err: &ParseError) -> String {
    let hint = match err.kind() {
        ErrorKind::FileNotFound => "could not open the scene file",
        ErrorKind::IncludeFileNotFound => "could not open an included file",
        ErrorKind::SyntaxError => "the scene file has a syntax error",
        ErrorKind::UnexpectedEndOfInput => "the scene file ended early",
        ErrorKind::AllocationExhausted => "ran out of memory while parsing",
        ErrorKind::InvalidVertexIndex => "a vertex array references a missing vertex",
        ErrorKind::BadAttenuationOrColorBlock => "a light has a malformed colour block",
        ErrorKind::IncludeDepthExceeded => "INCLUDE files are nested too deeply",
        ErrorKind::Config => "the parser configuration is invalid",
    };
    format!("error: {hint}: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_formats_skipped() {
        assert_eq!(foreign_format(Path::new("room.NFF")), Some("NFF"));
        assert_eq!(foreign_format(Path::new("model.ac")), Some("AC3D"));
        assert_eq!(foreign_format(Path::new("a/b.mgf")), Some("MGF"));
        assert_eq!(foreign_format(Path::new("teapot.dat")), None);
        assert_eq!(foreign_format(Path::new("README")), None);
    }

    #[test]
    fn test_describe_names_kind() {
        let err = ParseError::IncludeDepthExceeded {
            path: "loop.dat".into(),
            limit: 3,
        };
        let text = describe(&err);
        assert!(text.contains("nested too deeply"));
        assert!(text.contains("loop.dat"));
    }

    #[test]
    fn test_cli_flags() {
        let cli =
            Cli::try_parse_from(["tachyon-scene", "-vv", "--strict", "a.dat", "b.nff"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.strict);
        assert!(!cli.dump);
        assert_eq!(cli.files.len(), 2);
    }
}
