//! FastRemap CLI entry point
//!
//! Remaps GFF3 features from component to assembled coordinates.

use clap::{Parser, ValueEnum};
use fast_remap::core::{run, MappingSourceFormat, RemapConfig};
use std::path::PathBuf;
use std::time::Instant;

/// Mapping source format (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum SourceFormatArg {
    /// Detect from the file name (.agp, .agp.gz -> AGP; otherwise GFF3)
    #[default]
    #[value(name = "auto")]
    Auto,
    /// AGP assembly description
    #[value(name = "agp")]
    Agp,
    /// GFF3 features, one mapping per feature ID
    #[value(name = "gff")]
    Gff,
}

impl From<SourceFormatArg> for MappingSourceFormat {
    fn from(arg: SourceFormatArg) -> Self {
        match arg {
            SourceFormatArg::Auto => MappingSourceFormat::Auto,
            SourceFormatArg::Agp => MappingSourceFormat::Agp,
            SourceFormatArg::Gff => MappingSourceFormat::Gff,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-remap")]
#[command(about = "Remap GFF3 features between component and assembled coordinates")]
#[command(version)]
#[command(author = "FastRemap Contributors")]
struct Cli {
    /// Mapping source (AGP or GFF3, optionally gzip/bzip2 compressed)
    mapping: PathBuf,
    /// Input GFF3 features ('-' for stdin)
    input: PathBuf,
    /// Output file (optional, stdout if not specified)
    output: Option<PathBuf>,
    /// Mapping source format
    #[arg(long = "source-format", default_value = "auto")]
    source_format: SourceFormatArg,
    /// Only use mapping-source features of this type (GFF3 sources)
    #[arg(long = "feature-type")]
    feature_type: Option<String>,
    /// Emit features with no mapping unchanged instead of dropping them
    #[arg(short = 'p', long = "pass-through-unmapped")]
    pass_through_unmapped: bool,
    /// Map from assembled to component coordinates
    #[arg(long)]
    reverse: bool,
    /// Also write features that span a mapping boundary to this file
    #[arg(long = "failed")]
    failed: Option<PathBuf>,
    /// Log per-feature decisions and list failed feature IDs
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    let config = RemapConfig {
        mapping_source: Some(cli.mapping),
        source_format: cli.source_format.into(),
        feature_type_filter: cli.feature_type,
        input: Some(cli.input),
        output: cli.output,
        failed_output: cli.failed,
        pass_through_unmapped: cli.pass_through_unmapped,
        reverse: cli.reverse,
        verbose: cli.verbose,
    };

    let report = run(&config)?;

    eprintln!("\n=== Conversion Statistics ===");
    report.write_to(&mut std::io::stderr().lock(), config.verbose)?;
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
