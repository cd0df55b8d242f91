//! pdftrans CLI - layout-preserving PDF translation tool

mod openai;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftrans::render::{self, default_output_path, write_document};
use pdftrans::{
    parse_file_with_options, CjkCollection, DocumentTranslator, JsonFormat, OutputFormat,
    ParseOptions, RenderOptions, TranslateOptions, TranslationStyle,
};

use openai::{OpenAiTranslator, DEFAULT_BASE_URL, DEFAULT_MODEL};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdftrans")]
#[command(version)]
#[command(about = "Translate PDFs while preserving their layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a PDF and write it as PDF or Markdown
    Translate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: <stem>_translated.<ext> next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format: pdf or markdown
        #[arg(short, long, default_value = "pdf")]
        format: String,

        /// Number of leading pages to translate (0 = all)
        #[arg(long, value_name = "N")]
        pages: Option<usize>,

        /// Source language
        #[arg(long, default_value = "English")]
        source_language: String,

        /// Target language
        #[arg(long, default_value = "Chinese")]
        target_language: String,

        /// Translation style (standard, novel, news, academic, casual, poetic, technical, humorous)
        #[arg(long, default_value = "standard")]
        style: String,

        /// Chat model name
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// API base URL
        #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// TrueType font embedded in PDF output (needed for CJK targets)
        #[arg(long, env = "PDFTRANS_FONT", value_name = "TTF")]
        font: Option<PathBuf>,
    },

    /// Re-lay out a PDF without translating it
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format: pdf or markdown
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Number of leading pages (0 = all)
        #[arg(long, value_name = "N")]
        pages: Option<usize>,

        /// TrueType font embedded in PDF output
        #[arg(long, env = "PDFTRANS_FONT", value_name = "TTF")]
        font: Option<PathBuf>,
    },

    /// Print the extracted document model as JSON
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of leading pages (0 = all)
        #[arg(long, value_name = "N")]
        pages: Option<usize>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate {
            input,
            output,
            format,
            pages,
            source_language,
            target_language,
            style,
            model,
            api_key,
            base_url,
            font,
        } => {
            let options = TranslateOptions::new()
                .with_source_language(source_language)
                .with_target_language(target_language)
                .with_style(TranslationStyle::from_tag(&style));
            cmd_translate(
                &input,
                output.as_deref(),
                &format,
                pages,
                options,
                &ApiConfig {
                    api_key,
                    base_url,
                    model,
                },
                font,
            )
        }
        Commands::Extract {
            input,
            output,
            format,
            pages,
            font,
        } => cmd_extract(&input, output.as_deref(), &format, pages, font),
        Commands::Inspect {
            input,
            output,
            pages,
            compact,
        } => cmd_inspect(&input, output.as_deref(), pages, compact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

struct ApiConfig {
    api_key: String,
    base_url: String,
    model: String,
}

fn parse_options(pages: Option<usize>) -> ParseOptions {
    match pages {
        Some(n) => ParseOptions::new().with_page_limit(n),
        None => ParseOptions::new(),
    }
}

fn render_options(font: Option<PathBuf>, cjk: CjkCollection) -> RenderOptions {
    let options = RenderOptions::new().with_cjk_font(cjk);
    match font {
        Some(path) => options.with_font(path),
        None => options,
    }
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn cmd_translate(
    input: &Path,
    output: Option<&Path>,
    format: &str,
    pages: Option<usize>,
    options: TranslateOptions,
    api: &ApiConfig,
    font: Option<PathBuf>,
) -> CliResult {
    // Reject bad formats before touching any file
    let format: OutputFormat = format.parse()?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, format));

    let pb = spinner("Extracting PDF...")?;
    let mut doc = parse_file_with_options(input, parse_options(pages))?;
    pb.finish_and_clear();

    let translator = OpenAiTranslator::new(&api.api_key, &api.base_url, &api.model)?;
    println!(
        "{} {} → {} ({})",
        "Translating".cyan().bold(),
        options.source_language,
        options.target_language,
        options.style
    );

    let cjk = CjkCollection::for_language(&options.target_language);
    let pb = ProgressBar::new(doc.content_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} items")?
            .progress_chars("#>-"),
    );
    let summary = DocumentTranslator::new(translator, options)
        .on_progress(|done, _| pb.set_position(done as u64))
        .translate(&mut doc);
    pb.finish_and_clear();

    write_document(&doc, &output, format, &render_options(font, cjk))?;

    println!(
        "{} {} items translated, {} kept in the source language",
        "Done!".green().bold(),
        summary.translated,
        summary.failed
    );
    if summary.failed > 0 {
        println!("{}", "Some items could not be translated; see the log for details".yellow());
    }
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: &str,
    pages: Option<usize>,
    font: Option<PathBuf>,
) -> CliResult {
    let format: OutputFormat = format.parse()?;
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        input.with_file_name(format!("{}_extracted.{}", stem, format.extension()))
    });

    let doc = parse_file_with_options(input, parse_options(pages))?;
    write_document(&doc, &output, format, &render_options(font, CjkCollection::default()))?;

    println!(
        "{} {} pages, {} items",
        "Extracted".green().bold(),
        doc.page_count(),
        doc.content_count()
    );
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_inspect(input: &Path, output: Option<&Path>, pages: Option<usize>, compact: bool) -> CliResult {
    let doc = parse_file_with_options(input, parse_options(pages))?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdftrans".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-preserving PDF translation tool");
    println!();
    println!("Library: pdftrans {}", pdftrans::VERSION);
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_args() {
        let cli = Cli::try_parse_from([
            "pdftrans",
            "translate",
            "paper.pdf",
            "--format",
            "md",
            "--pages",
            "2",
            "--style",
            "news",
            "--api-key",
            "k",
        ])
        .unwrap();
        match cli.command {
            Commands::Translate {
                format,
                pages,
                style,
                target_language,
                ..
            } => {
                assert_eq!(format, "md");
                assert_eq!(pages, Some(2));
                assert_eq!(style, "news");
                assert_eq!(target_language, "Chinese");
            }
            _ => panic!("expected translate"),
        }
    }

    #[test]
    fn test_bad_format_rejected_before_reading() {
        let api = ApiConfig {
            api_key: "k".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        };
        let err = cmd_translate(
            Path::new("/nonexistent.pdf"),
            None,
            "docx",
            None,
            TranslateOptions::new(),
            &api,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unsupported output format"));
    }

    #[test]
    fn test_extract_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.md");
        let err = cmd_extract(Path::new("/nonexistent.pdf"), Some(&out), "md", None, None);
        assert!(err.is_err());
        assert!(!out.exists());
    }
}
