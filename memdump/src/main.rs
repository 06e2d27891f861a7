//! memdump - decode data logger memory dumps
//!
//! Modes:
//! 1. decode: decode a raw dump file already saved to disk
//! 2. capture: request a dump over a serial port or a TCP serial bridge,
//!    then decode it
//! 3. ports: list the serial ports present on this machine

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use memdump::prelude::*;
use memdump_capture::list_ports;
use memdump_capture::protocol::DEFAULT_MEMORY_CAPACITY;
use memdump_capture::serial::DEFAULT_BAUD_RATE;
use memmap2::Mmap;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_TABLE_ROWS: usize = 20;

#[derive(Parser)]
#[command(name = "memdump")]
#[command(about = "Decode data logger memory dumps into tables and CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw dump file
    Decode {
        /// Raw dump file
        input: PathBuf,

        /// Write the dataset as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// How to print the dataset
        #[arg(short, long, value_enum, default_value_t = Format::Summary)]
        format: Format,

        /// Rows printed by the table format
        #[arg(long, default_value_t = DEFAULT_TABLE_ROWS)]
        rows: usize,

        /// Decode cells with sign-extended bytes, as older captures were
        #[arg(long)]
        legacy_signed_cells: bool,
    },

    /// Request a dump from a device on a serial port or behind a TCP bridge
    Capture {
        /// Serial port, e.g. /dev/ttyUSB0 or COM3
        #[arg(short, long, required_unless_present = "connect")]
        port: Option<String>,

        /// Serial line speed
        #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,

        /// Bridge address instead of a serial port, e.g. 192.168.1.20:4001
        #[arg(short, long, conflicts_with = "port")]
        connect: Option<String>,

        /// Quiet period in milliseconds before the buffer is decoded
        #[arg(long, default_value_t = 1000)]
        idle_ms: u64,

        /// Device memory size in bytes
        #[arg(long, default_value_t = DEFAULT_MEMORY_CAPACITY)]
        capacity: usize,

        /// CSV output path (defaults to memdump-<timestamp>.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also save the raw bytes received
        #[arg(long)]
        raw: Option<PathBuf>,

        /// Do not acknowledge received chunks
        #[arg(long)]
        no_ack: bool,

        /// Decode cells with sign-extended bytes, as older captures were
        #[arg(long)]
        legacy_signed_cells: bool,
    },

    /// List serial ports
    Ports,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Column names and row count
    Summary,
    /// First rows as a tab-separated table
    Table,
    /// Full dataset as JSON
    Json,
}

fn cell_encoding(legacy_signed_cells: bool) -> CellEncoding {
    if legacy_signed_cells {
        CellEncoding::LegacySigned
    } else {
        CellEncoding::Unsigned
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Decode {
            input,
            csv,
            format,
            rows,
            legacy_signed_cells,
        } => {
            let dataset = decode_file(&input, cell_encoding(legacy_signed_cells))?;
            print_dataset(&dataset, format, rows)?;
            if let Some(path) = csv {
                export_csv(&dataset, &path, &CsvOptions::default())?;
            }
        }
        Commands::Capture {
            port,
            baud,
            connect,
            idle_ms,
            capacity,
            csv,
            raw,
            no_ack,
            legacy_signed_cells,
        } => {
            let config = CaptureConfig::default()
                .idle_timeout(Duration::from_millis(idle_ms))
                .memory_capacity(capacity)
                .acknowledge(!no_ack)
                .cell_encoding(cell_encoding(legacy_signed_cells));
            let dataset = match (port, connect) {
                (_, Some(addr)) => {
                    let stream = connect_bridge(&addr).await?;
                    capture(stream, config, raw.as_deref()).await?
                }
                (Some(path), None) => {
                    let stream = SerialConfig::new(&path)
                        .baud_rate(baud)
                        .open()
                        .with_context(|| format!("open serial port {}", path))?;
                    capture(stream, config, raw.as_deref()).await?
                }
                (None, None) => bail!("either --port or --connect is required"),
            };
            print_dataset(&dataset, Format::Summary, 0)?;
            let path = csv.unwrap_or_else(default_csv_path);
            export_csv(&dataset, &path, &CsvOptions::default())?;
        }
        Commands::Ports => print_ports()?,
    }

    Ok(())
}

fn decode_file(path: &Path, encoding: CellEncoding) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let len = file.metadata()?.len();
    info!("Decoding {} ({} bytes)", path.display(), len);
    if len == 0 {
        bail!("{} is empty", path.display());
    }

    // SAFETY: the dump file is only read, and is not expected to change
    // while it is mapped.
    let map = unsafe { Mmap::map(&file) }.with_context(|| format!("map {}", path.display()))?;
    let dataset = FrameDecoder::new()
        .cell_encoding(encoding)
        .decode_with_progress(&map[..], &mut LogProgress)
        .with_context(|| format!("decode {}", path.display()))?;

    if !dataset.is_complete() {
        warn!("Log-stop marker not found: the dump looks truncated, no rows decoded");
    }
    Ok(dataset)
}

async fn connect_bridge(addr: &str) -> Result<TcpStream> {
    let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
        .await
        .with_context(|| format!("connect to {} timed out", addr))?
        .with_context(|| format!("connect to {}", addr))?;
    stream.set_nodelay(true)?;
    info!("Connected to {}", addr);
    Ok(stream)
}

async fn capture<S>(stream: S, config: CaptureConfig, raw: Option<&Path>) -> Result<Dataset>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = DumpSession::new(stream, config);
    session.request_dump().await?;

    let result = tokio::select! {
        result = session.run_to_completion() => result.map_err(anyhow::Error::from),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, decoding what has been received");
            session.decode().map_err(anyhow::Error::from)
        }
    };

    if let Some(path) = raw {
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(session.buffer().as_slice())?;
        info!("Saved {} raw bytes to {}", session.buffer().len(), path.display());
    }
    result
}

fn print_ports() -> Result<()> {
    let ports = list_ports().context("list serial ports")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if ports.is_empty() {
        writeln!(out, "no serial ports found")?;
    }
    for port in ports {
        writeln!(out, "{}\t{}", port.name, port.description)?;
    }
    Ok(())
}

fn default_csv_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("memdump-{}.csv", stamp))
}

fn print_dataset(dataset: &Dataset, format: Format, max_rows: usize) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Summary => {
            writeln!(out, "columns: {}", dataset.columns().join(", "))?;
            writeln!(out, "rows:    {}", dataset.height())?;
            if dataset.discarded_bytes() > 0 {
                writeln!(out, "dropped: {} trailing bytes", dataset.discarded_bytes())?;
            }
        }
        Format::Table => {
            writeln!(out, "{}", dataset.columns().join("\t"))?;
            for row in dataset.rows().iter().take(max_rows) {
                let line: Vec<String> = row.cells().iter().map(ToString::to_string).collect();
                writeln!(out, "{}", line.join("\t"))?;
            }
            if dataset.height() > max_rows {
                writeln!(out, "... {} more rows", dataset.height() - max_rows)?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, dataset)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
