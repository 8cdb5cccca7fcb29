//! CLI tool for extracting normalized slide content from PPTX files.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use slides_core::{ExtractOptions, Extraction, TitleStrategy};
use slides_pptx::{Package, PptxParser};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

/// Extract titles, paragraphs and image references from PPTX files as JSON.
#[derive(Parser, Debug)]
#[command(name = "pptx-slides")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file(s) (.pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// How slide titles are detected
    #[arg(long, value_enum, default_value_t = TitleArg::Placeholder)]
    title_strategy: TitleArg,

    /// Keep paragraph text as written instead of capitalizing the first letter
    #[arg(long)]
    no_capitalize: bool,

    /// Keep every paragraph separate instead of merging same-kind neighbours
    #[arg(long)]
    no_merge: bool,

    /// Also copy referenced images next to the JSON output
    #[arg(short, long)]
    images: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TitleArg {
    /// Title and centered-title placeholders
    Placeholder,
    /// First shape with any text
    FirstText,
}

impl From<TitleArg> for TitleStrategy {
    fn from(arg: TitleArg) -> Self {
        match arg {
            TitleArg::Placeholder => TitleStrategy::Placeholder,
            TitleArg::FirstText => TitleStrategy::FirstText,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let options = ExtractOptions::new()
        .with_title_strategy(args.title_strategy.into())
        .with_capitalize_lead(!args.no_capitalize)
        .with_merge_paragraphs(!args.no_merge);
    let parser = PptxParser::new().with_options(options);

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        if let Err(e) = process_file(input_path, &args, &parser) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    Ok(())
}

/// Process a single PPTX file.
fn process_file(input_path: &Path, args: &Args, parser: &PptxParser) -> Result<()> {
    let mut package = Package::open_path(input_path)
        .with_context(|| format!("Failed to read {} as a PPTX package", input_path.display()))?;

    let extraction = parser.parse_package(&mut package);

    if args.verbose {
        eprintln!(
            "  Extracted {} slides ({} warnings)",
            extraction.slides.len(),
            extraction.warnings.len()
        );
    }
    for warning in &extraction.warnings {
        log::info!("{}: {}", warning.part, warning.message);
    }

    let json = serde_json::to_string_pretty(&extraction)
        .context("Failed to serialize slides")?;

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let output_dir = get_output_dir(input_path, args.output.as_ref())?;

    if args.print {
        println!("{}", json);
    } else {
        let output_path = output_dir.join(format!("{}.slides.json", stem));
        write_output(&output_path, json.as_bytes())?;
        if args.verbose {
            eprintln!("Written to: {}", output_path.display());
        }
    }

    if args.images {
        let media_dir = output_dir.join(format!("{}_media", stem));
        let written = export_images(&mut package, &extraction, &media_dir)?;
        if args.verbose {
            eprintln!("  Copied {} images to {}", written, media_dir.display());
        }
    }

    Ok(())
}

/// Copy every image referenced by the extracted slides into `dir`, keeping
/// the package folder layout so equal file names cannot collide.
fn export_images<R: Read + Seek>(
    package: &mut Package<R>,
    extraction: &Extraction,
    dir: &Path,
) -> Result<usize> {
    let mut seen = HashSet::new();
    let mut written = 0;
    for path in extraction.image_paths() {
        if !seen.insert(path) {
            continue;
        }

        let target = media_target(dir, path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create image directory: {}", parent.display()))?;
        }

        match package.read_image(path) {
            Ok((_, bytes)) => {
                write_output(&target, &bytes)?;
                written += 1;
            }
            Err(e) => log::warn!("Skipping image {}: {}", path, e),
        }
    }

    Ok(written)
}

/// Where a package image lands below the media directory.
fn media_target(dir: &Path, package_path: &str) -> PathBuf {
    package_path
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .fold(dir.to_path_buf(), |target, segment| target.join(segment))
}

/// Determine the output directory for a processed file.
fn get_output_dir(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            Ok(dir.clone())
        }
        None => Ok(input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()),
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_options() {
        let args = Args::parse_from([
            "pptx-slides",
            "deck.pptx",
            "--title-strategy",
            "first-text",
            "--no-merge",
        ]);
        assert_eq!(TitleStrategy::from(args.title_strategy), TitleStrategy::FirstText);
        assert!(args.no_merge);
        assert!(!args.no_capitalize);
        assert_eq!(args.input, vec![PathBuf::from("deck.pptx")]);
    }

    #[test]
    fn test_output_dir_defaults_to_input_parent() {
        let dir = get_output_dir(Path::new("decks/q3.pptx"), None).unwrap();
        assert_eq!(dir, PathBuf::from("decks"));

        let dir = get_output_dir(Path::new("q3.pptx"), None).unwrap();
        assert_eq!(dir, PathBuf::from(""));
    }

    #[test]
    fn test_media_target_keeps_package_folders() {
        let dir = Path::new("out/q3_media");
        assert_eq!(
            media_target(dir, "ppt/media/image1.png"),
            PathBuf::from("out/q3_media/ppt/media/image1.png")
        );
        assert_ne!(
            media_target(dir, "ppt/media/image1.png"),
            media_target(dir, "ppt/embeddings/image1.png")
        );
        assert_eq!(
            media_target(dir, "../media/logo.jpg"),
            PathBuf::from("out/q3_media/media/logo.jpg")
        );
    }

    #[test]
    fn test_write_output_replaces_existing_file() {
        let path = std::env::temp_dir().join(format!("pptx-slides-{}.png", std::process::id()));
        write_output(&path, b"first run").unwrap();
        write_output(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        std::fs::remove_file(&path).unwrap();
    }
}
