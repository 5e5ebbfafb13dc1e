//! A binary for running the `metmatch` reconciliation pipelines over
//! delimited-text tables.
//!
//! ```shell
//! cargo run --bin=metmatch --features=binaries -- annotate points.csv intervals.csv out.csv
//! ```
//!
//! Inputs ending in `.gz` are transparently decompressed. Every subcommand
//! reads its inputs fully, writes its output file, and logs the run's
//! summary counts; reruns over the same inputs produce identical output.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use flate2::read::GzDecoder;
use metmatch::columns::IntervalColumns;
use metmatch::columns::PointColumns;
use metmatch::columns::RangeColumns;
use metmatch::columns::UniqueColumns;
use metmatch::pipeline;
use metmatch::table;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// Opens a delimited-text table, decompressing `.gz` inputs transparently.
fn open(path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader))
}

/// Creates the output table writer.
fn create(path: &Path) -> Result<csv::Writer<File>> {
    csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))
}

/// Logs the summary of a finished pipeline run.
fn report(summary: &pipeline::Summary) {
    info!("{}", summary);

    if summary.matched() == 0 {
        warn!("no rows matched; check the column mappings and inputs");
    }
}

/// Reconciles genomic point records against interval ranges.
#[derive(Parser)]
struct Args {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// The verbosity flags.
    #[command(flatten)]
    verbose: Verbosity,
}

/// The subcommands.
#[derive(Subcommand)]
enum Command {
    /// Annotates every interval row with its matched, normalized offsets.
    Annotate {
        /// The point records table.
        points: PathBuf,

        /// The interval records table.
        intervals: PathBuf,

        /// Where to write the annotated table.
        output: PathBuf,

        /// The 0-based column holding each point's position.
        #[arg(long, default_value_t = 0)]
        position_column: usize,

        /// The 0-based column holding each point's category key.
        #[arg(long, default_value_t = 3)]
        point_key_column: usize,

        /// The 0-based column holding each point's carried value.
        #[arg(long, default_value_t = 2)]
        value_column: usize,

        /// The 0-based column holding each interval's start bound.
        #[arg(long, default_value_t = 4)]
        start_column: usize,

        /// The 0-based column holding each interval's end bound.
        #[arg(long, default_value_t = 5)]
        end_column: usize,

        /// The 0-based column holding each interval's category key.
        #[arg(long, default_value_t = 7)]
        interval_key_column: usize,

        /// The 0-based column holding each interval's strand.
        #[arg(long, default_value_t = 6)]
        strand_column: usize,

        /// Skip the strand transform and report raw offsets.
        #[arg(long, default_value_t = false)]
        ignore_strand: bool,
    },

    /// Reports, per range row, the cross-unique values it contains as
    /// offsets.
    UniqueOffsets {
        /// The source table holding the two value columns.
        source: PathBuf,

        /// The range table.
        ranges: PathBuf,

        /// Where to write the `[label, start, end, offsets]` projection.
        output: PathBuf,

        /// The 0-based first value column of the source table.
        #[arg(long, default_value_t = 1)]
        left_column: usize,

        /// The 0-based second value column of the source table.
        #[arg(long, default_value_t = 2)]
        right_column: usize,

        /// The 0-based tag column of the source table.
        #[arg(long, default_value_t = 5)]
        tag_column: usize,

        /// The 0-based column holding each range's start bound.
        #[arg(long, default_value_t = 4)]
        start_column: usize,

        /// The 0-based column holding each range's end bound.
        #[arg(long, default_value_t = 5)]
        end_column: usize,

        /// The 0-based column holding each range's label.
        #[arg(long, default_value_t = 2)]
        label_column: usize,
    },

    /// Flags every table row by probing a shifted value against the source
    /// table's cross-unique set.
    Probe {
        /// The source table holding the two value columns.
        source: PathBuf,

        /// The table whose rows are flagged.
        table: PathBuf,

        /// Where to write the flagged table.
        output: PathBuf,

        /// The 0-based first value column of the source table.
        #[arg(long, default_value_t = 1)]
        left_column: usize,

        /// The 0-based second value column of the source table.
        #[arg(long, default_value_t = 2)]
        right_column: usize,

        /// The 0-based tag column of the source table.
        #[arg(long, default_value_t = 5)]
        tag_column: usize,

        /// The 0-based column of the flagged table holding the probed value.
        #[arg(long, default_value_t = 5)]
        probe_column: usize,
    },

    /// Removes the given 1-based columns from a table.
    Strip {
        /// The input table.
        input: PathBuf,

        /// Where to write the stripped table.
        output: PathBuf,

        /// The 1-based columns to remove.
        #[arg(required = true)]
        columns: Vec<usize>,
    },

    /// Prepends a y/n field to every row by whether a column is non-empty.
    Flag {
        /// The input table.
        input: PathBuf,

        /// Where to write the flagged table.
        output: PathBuf,

        /// The 0-based column whose non-emptiness is flagged.
        #[arg(long, default_value_t = 3)]
        column: usize,
    },

    /// Retains the rows whose column meets a numeric cutoff.
    Trim {
        /// The input table.
        input: PathBuf,

        /// Where to write the retained rows.
        output: PathBuf,

        /// The 0-based column holding the thresholded value.
        #[arg(long, default_value_t = 9)]
        column: usize,

        /// The inclusive cutoff.
        #[arg(long, default_value_t = 10.0)]
        cutoff: f64,
    },
}

fn throw(args: Args) -> Result<()> {
    match args.command {
        Command::Annotate {
            points,
            intervals,
            output,
            position_column,
            point_key_column,
            value_column,
            start_column,
            end_column,
            interval_key_column,
            strand_column,
            ignore_strand,
        } => {
            let point_columns = PointColumns::try_new(position_column, point_key_column, value_column)
                .context("invalid point column mapping")?;

            let strand = (!ignore_strand).then_some(strand_column);
            let interval_columns =
                IntervalColumns::try_new(start_column, end_column, interval_key_column, strand)
                    .context("invalid interval column mapping")?;

            // Inputs are opened before the output is created so that a
            // missing input never leaves a partial output file behind.
            let points = open(&points)?;
            let intervals = open(&intervals)?;

            let mut writer = create(&output)?;
            let summary = pipeline::annotate(
                points,
                intervals,
                &mut writer,
                &point_columns,
                &interval_columns,
            )
            .context("annotating intervals")?;

            report(&summary);
        }
        Command::UniqueOffsets {
            source,
            ranges,
            output,
            left_column,
            right_column,
            tag_column,
            start_column,
            end_column,
            label_column,
        } => {
            let unique_columns = UniqueColumns::try_new(left_column, right_column, Some(tag_column))
                .context("invalid value column mapping")?;
            let range_columns = RangeColumns::try_new(start_column, end_column, label_column)
                .context("invalid range column mapping")?;

            let source = open(&source)?;
            let ranges = open(&ranges)?;

            let mut writer = create(&output)?;
            let summary = pipeline::unique_offsets(
                source,
                ranges,
                &mut writer,
                &unique_columns,
                &range_columns,
            )
            .context("reporting unique offsets")?;

            report(&summary);
        }
        Command::Probe {
            source,
            table,
            output,
            left_column,
            right_column,
            tag_column,
            probe_column,
        } => {
            let unique_columns = UniqueColumns::try_new(left_column, right_column, Some(tag_column))
                .context("invalid value column mapping")?;

            let source = open(&source)?;
            let table = open(&table)?;

            let mut writer = create(&output)?;
            let summary = pipeline::probe(
                source,
                table,
                &mut writer,
                &unique_columns,
                probe_column,
            )
            .context("probing rows")?;

            report(&summary);
        }
        Command::Strip {
            input,
            output,
            columns,
        } => {
            let rows = table::read_rows(&mut open(&input)?).context("reading input table")?;
            let removal = table::remove_columns(&rows, &columns);

            for column in removal.out_of_range() {
                warn!("column {} is out of range and was ignored", column);
            }

            let mut writer = create(&output)?;
            table::write_rows(&mut writer, removal.rows()).context("writing stripped table")?;
            info!("{} rows written", removal.rows().len());
        }
        Command::Flag {
            input,
            output,
            column,
        } => {
            let rows = table::read_rows(&mut open(&input)?).context("reading input table")?;
            let flagged = table::flag_nonempty(&rows, column);

            let mut writer = create(&output)?;
            table::write_rows(&mut writer, &flagged).context("writing flagged table")?;
            info!("{} rows written", flagged.len());
        }
        Command::Trim {
            input,
            output,
            column,
            cutoff,
        } => {
            let rows = table::read_rows(&mut open(&input)?).context("reading input table")?;
            let kept = table::retain_at_least(&rows, column, cutoff);

            info!(
                "{} of {} rows at or above the cutoff",
                kept.len(),
                rows.len()
            );

            let mut writer = create(&output)?;
            table::write_rows(&mut writer, &kept).context("writing retained rows")?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    throw(args)
}
