use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prodchart_core::config_file;
use prodchart_parsing::{ExtractorConfigBuilder, ReportExtractor};
use prodchart_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// Production report charts - turn report PDFs into per-entity chart data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract totals, breakdowns and charts as JSON
    Extract {
        /// Path to the report PDF
        file_path: PathBuf,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the recovered page text, tables and breakdown
    Inspect {
        /// Path to the report PDF
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = ExtractorConfigBuilder::from_config_file(&config_file::load_config()).build()?;
    let extractor = ReportExtractor::with_config(config);

    match cli.command {
        Command::Extract {
            file_path,
            compact,
            output,
        } => extract(&extractor, &file_path, compact, output),
        Command::Inspect {
            file_path,
            no_color,
        } => inspect(&extractor, &file_path, no_color),
    }
}

fn read_pdf(file_path: &Path) -> anyhow::Result<Vec<u8>> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    let is_pdf = file_path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        anyhow::bail!("Invalid file format. Please upload a PDF.");
    }
    Ok(std::fs::read(file_path)?)
}

fn extract(
    extractor: &ReportExtractor,
    file_path: &Path,
    compact: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let pdf = read_pdf(file_path)?;
    let data = extractor.extract(&pdf, &MupdfBackend::new())?;

    let json = if compact {
        serde_json::to_string(&data)?
    } else {
        serde_json::to_string_pretty(&data)?
    };

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };
    writeln!(writer, "{}", json)?;
    Ok(())
}

fn inspect(extractor: &ReportExtractor, file_path: &Path, no_color: bool) -> anyhow::Result<()> {
    use prodchart_core::PdfBackend;

    let color = ColorMode(!no_color);
    let mut writer = std::io::stdout();

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let pdf = read_pdf(file_path)?;
    let layout = MupdfBackend::new().first_page_layout(&pdf)?;
    let report = extractor.analyze(&layout);

    output::print_header(&mut writer, &file_name, &layout, &report, color)?;
    output::print_page_text(&mut writer, &report.text, color)?;
    output::print_tables(&mut writer, &report.tables, color)?;

    match extractor.extract_from_report(&report) {
        Ok(data) => output::print_breakdown(&mut writer, &data, color)?,
        Err(e) => output::print_failure(&mut writer, &e.to_string(), color)?,
    }
    Ok(())
}
