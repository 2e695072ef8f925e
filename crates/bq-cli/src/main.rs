//! Biquad Filter Calculator
//!
//! Usage:
//!   biquad calc --type low_shelf --freq 120 --gain -3   - One-shot calculation
//!   biquad repl                                         - Interactive session

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use bq_cli::display::{self, OutputFormat};
use bq_cli::input::RawParameters;
use bq_cli::plot::{self, PlotConfig};
use bq_cli::session::Session;
use bq_cli::{Calculation, calculate, plot_title};
use bq_dsp::ResponseConfig;
use bq_dsp::response::DEFAULT_POINT_COUNT;

#[derive(Parser)]
#[command(name = "biquad", about = "Biquad filter coefficient calculator")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate once and print the result
    Calc {
        #[command(flatten)]
        fields: FieldArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Skip the plot in text output
        #[arg(long)]
        no_plot: bool,
    },
    /// Edit fields interactively; Enter recalculates
    Repl {
        #[command(flatten)]
        fields: FieldArgs,
    },
}

/// Form fields, taken as text and parsed by the calculator
#[derive(Args)]
struct FieldArgs {
    /// Filter type: parametric, low_shelf, high_shelf
    #[arg(short = 't', long = "type", default_value = "parametric")]
    filter_type: String,

    /// Frequency (Hz)
    #[arg(long, default_value = "1000", allow_hyphen_values = true)]
    freq: String,

    /// Boost/cut (dB)
    #[arg(short, long, default_value = "6", allow_hyphen_values = true)]
    gain: String,

    /// Q factor
    #[arg(short, long, default_value = "0.707", allow_hyphen_values = true)]
    q: String,

    /// Output gain (dB)
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    output_gain: String,

    /// Sample rate (Hz)
    #[arg(short = 'r', long, default_value = "48000")]
    sample_rate: String,

    /// Response resolution
    #[arg(short = 'n', long, default_value_t = DEFAULT_POINT_COUNT)]
    points: usize,
}

impl FieldArgs {
    fn raw(&self) -> RawParameters {
        RawParameters {
            filter_type: self.filter_type.clone(),
            frequency: self.freq.clone(),
            boost_cut: self.gain.clone(),
            q: self.q.clone(),
            output_gain: self.output_gain.clone(),
            sample_rate: self.sample_rate.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Calc {
            fields,
            format,
            no_plot,
        } => run_calc(&fields, format, no_plot),
        Commands::Repl { fields } => run_repl(&fields),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run_calc(fields: &FieldArgs, format: OutputFormat, no_plot: bool) -> Result<()> {
    let params = fields.raw().parse().context("Failed to parse filter parameters")?;
    log::debug!("parsed {params:?}");

    let config = ResponseConfig::new(params.sample_rate_hz).with_point_count(fields.points);
    let calc = calculate(&params, &config).context("Failed to calculate filter")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => write!(out, "{}", render_text(&calc, !no_plot))?,
        OutputFormat::Csv => write!(out, "{}", display::format_csv(&calc))?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            display::format_json(&calc).context("Failed to serialize report")?
        )?,
    }
    Ok(())
}

fn render_text(calc: &Calculation, with_plot: bool) -> String {
    let mut text = display::format_summary(calc);
    text.push('\n');
    text.push_str(&display::format_coefficients(&calc.coefficients.normalized));
    if with_plot {
        text.push('\n');
        text.push_str(&plot::render(
            &calc.response,
            &plot_title(&calc.params),
            &PlotConfig::default(),
        ));
    }
    text
}

const REPL_HELP: &str = "\
Enter key=value edits (type, freq, gain, q, output, rate), e.g.
  type=low_shelf freq=120 gain=-3
An empty line recalculates. Commands: show, help, quit";

fn run_repl(fields: &FieldArgs) -> Result<()> {
    let mut session = Session::new(fields.raw(), fields.points);
    log::info!("starting interactive session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{REPL_HELP}\n")?;
    match session.recalculate() {
        Ok(calc) => write!(out, "{}", render_text(calc, true))?,
        Err(e) => writeln!(out, "error: {e}")?,
    }

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }

        let result = match line.trim() {
            "quit" | "exit" => break,
            "help" => {
                writeln!(out, "{REPL_HELP}")?;
                continue;
            }
            "show" => {
                let f = session.fields();
                writeln!(
                    out,
                    "type={} freq={} gain={} q={} output={} rate={}",
                    f.filter_type, f.frequency, f.boost_cut, f.q, f.output_gain, f.sample_rate
                )?;
                continue;
            }
            "" => session.recalculate(),
            edits => session.edit(edits),
        };

        match result {
            Ok(calc) => write!(out, "{}", render_text(calc, true))?,
            Err(e) => writeln!(out, "error: {e} (showing previous result)")?,
        }
    }

    Ok(())
}
