//! texguard CLI - LaTeX structure checker for translated documents

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use texguard::{
    annotate, annotate_detailed_with_options, annotate_validated_with_options,
    compare_elements_with_options,
    diagnostics::{check_document, format_diagnostics},
    tokenize, CompareOptions, DocumentReport, GuardError, GuardResult,
};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texguard")]
#[command(version)]
#[command(about = "texguard - check that a LaTeX translation keeps the original markup", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Log engine activity to stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check a translated document against its original
    Check {
        /// Original LaTeX file
        original: String,

        /// Translated LaTeX file
        translated: String,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Print the paragraph report as JSON
        #[arg(long)]
        json: bool,

        /// Also require \eqref, \pageref, \cref, natbib citations and links to match exactly
        #[arg(long)]
        strict_refs: bool,

        /// Extra command whose content must not be translated (repeatable)
        #[arg(long = "reference", value_name = "NAME")]
        references: Vec<String>,
    },

    /// List the LaTeX elements found in a file
    Tokens {
        /// Input file (reads from stdin if not provided)
        input: Option<String>,

        /// Print elements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a file with its LaTeX elements wrapped in HTML spans
    Highlight {
        /// Input file (reads from stdin if not provided)
        input: Option<String>,

        /// Translated file; elements it lost are flagged as missing
        #[arg(long, value_name = "FILE")]
        against: Option<String>,

        /// Emphasize the missing content of flagged elements
        #[arg(long, requires = "against")]
        detailed: bool,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show translation progress of a document
    Stats {
        /// Original LaTeX file
        original: String,

        /// Translated LaTeX file
        translated: String,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version and rule info
    Info,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Execute a subcommand and return the process exit code
#[cfg(feature = "cli")]
fn run(cmd: Commands) -> GuardResult<i32> {
    match cmd {
        Commands::Check {
            original,
            translated,
            no_color,
            json,
            strict_refs,
            references,
        } => {
            let original_text = read_input(Some(&original))?;
            let translated_text = read_input(Some(&translated))?;

            let base = if strict_refs {
                CompareOptions::strict_references()
            } else {
                CompareOptions::default()
            };
            let options = references
                .into_iter()
                .fold(base, |opts, name| opts.with_reference_command(name));

            let report = DocumentReport::build(&original_text, &translated_text, &options);
            let result = check_document(&report, &original_text, &translated_text, &options);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", format_diagnostics(&result, !no_color));
            }

            Ok(if result.has_errors() { 1 } else { 0 })
        }

        Commands::Tokens { input, json } => {
            let content = read_input(input.as_deref())?;
            let elements = tokenize(&content);

            if json {
                println!("{}", serde_json::to_string_pretty(&elements)?);
            } else {
                for e in &elements {
                    println!(
                        "{:>6}..{:<6} {:<13} {:<24} {:?}",
                        e.start,
                        e.end,
                        e.kind,
                        e.command_structure.as_deref().unwrap_or(""),
                        e.content
                    );
                }
                eprintln!("{} element(s)", elements.len());
            }

            Ok(0)
        }

        Commands::Highlight {
            input,
            against,
            detailed,
            output,
        } => {
            let content = read_input(input.as_deref())?;
            let elements = tokenize(&content);

            let result = match against {
                Some(path) => {
                    let translated = read_input(Some(&path))?;
                    let options = CompareOptions::default();
                    let comparison =
                        compare_elements_with_options(&elements, &tokenize(&translated), &options);
                    if detailed {
                        annotate_detailed_with_options(
                            &content,
                            &elements,
                            &comparison.missing,
                            &translated,
                            &options,
                        )
                    } else {
                        annotate_validated_with_options(
                            &content,
                            &elements,
                            &comparison.missing,
                            &options,
                        )
                    }
                }
                None => annotate(&content, &elements),
            };

            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path).map_err(|e| GuardError::io_at(e, &path))?;
                    writeln!(file, "{}", result).map_err(|e| GuardError::io_at(e, &path))?;
                    eprintln!("✓ Output written to: {}", path);
                }
                None => {
                    println!("{}", result);
                }
            }

            Ok(0)
        }

        Commands::Stats {
            original,
            translated,
            json,
        } => {
            let original_text = read_input(Some(&original))?;
            let translated_text = read_input(Some(&translated))?;
            let stats = DocumentReport::new(&original_text, &translated_text).stats();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "Paragraphs: {}/{} translated ({}%)",
                    stats.translated, stats.total, stats.percentage
                );
                if !stats.untranslated.is_empty() {
                    println!();
                    println!("Untranslated:");
                    for preview in &stats.untranslated {
                        println!("  - {}", preview.replace('\n', " "));
                    }
                }
            }

            Ok(0)
        }

        Commands::Info => {
            println!("texguard - LaTeX structure checker for translated documents");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Recognized elements:");
            println!("  ✓ Commands with [optional] and {{required}} parameters");
            println!("  ✓ Inline math: $...$, \\(...\\)");
            println!("  ✓ Display math: $$...$$, \\[...\\]");
            println!("  ✓ Equation environments");
            println!();
            println!("Matching rules:");
            println!("  - \\begin / \\end: environment name must be unchanged");
            println!("  - \\label, \\ref, \\cite, \\citet: content must be unchanged");
            println!("  - other commands: shape must be unchanged, text may be translated");
            println!("  - math and equations: must be copied verbatim");
            println!();

            Ok(0)
        }
    }
}

/// Read a file, or stdin when no path is given
#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> GuardResult<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| GuardError::io_at(e, path)),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texguard --features cli");
    eprintln!("  texguard check ORIGINAL TRANSLATED");
}
