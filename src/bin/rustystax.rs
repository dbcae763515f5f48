//! rustystax - drain an XML stream and write it back out
//!
//! Reads a file (or stdin) event by event and re-serializes every event to
//! stdout. With `--events` a one-line description per event is printed
//! instead. Diagnostics go to stderr; set `RUST_LOG` to see scanner traces.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustystax::{EventWriter, ReaderOptions, XmlEvent, XmlInputFactory, DEFAULT_BUFFER_SIZE};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }

    pub fn peak() -> usize {
        PEAK_ALLOCATED.load(Ordering::SeqCst)
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "rustystax", version, about = "Stream XML events and write them back out")]
struct Cli {
    /// Input file, stdin when absent or "-"
    input: Option<PathBuf>,

    /// Capacity of the input buffer in bytes
    #[arg(long = "buffer-size", value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE as u64,
          value_parser = clap::value_parser!(u64).range(1..))]
    buffer_size: u64,

    /// Print one line per event instead of XML
    #[arg(long)]
    events: bool,

    /// Report event count and peak heap use on stderr
    #[arg(long)]
    stats: bool,

    /// Do not print the banner
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.quiet {
        eprintln!("rustystax {} - streaming XML event reader", env!("CARGO_PKG_VERSION"));
    }

    match run(&cli) {
        Ok(count) => {
            if cli.stats {
                report_stats(count);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\nerror: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Open the input named on the command line
fn open_input(path: Option<&PathBuf>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            debug!(path = %p.display(), "reading file");
            Ok(Box::new(File::open(p)?))
        }
        _ => {
            debug!("reading stdin");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

fn run(cli: &Cli) -> Result<usize, Box<dyn std::error::Error>> {
    let input = open_input(cli.input.as_ref())?;
    let capacity = usize::try_from(cli.buffer_size).unwrap_or(usize::MAX);
    let factory =
        XmlInputFactory::with_options(ReaderOptions::default().with_buffer_capacity(capacity));
    let mut reader = factory.create_buffered_event_reader(input);

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    let mut count = 0usize;

    if cli.events {
        while reader.has_next()? {
            let event = reader.next_event()?;
            writeln!(out, "{}", describe(&event))?;
            count += 1;
        }
        out.flush()?;
    } else {
        let mut writer = EventWriter::new(out);
        while reader.has_next()? {
            writer.write_event(&reader.next_event()?)?;
            count += 1;
        }
        writer.flush()?;
    }

    info!(events = count, bytes = reader.position(), "done");
    Ok(count)
}

/// One-line description of an event for `--events`
fn describe(event: &XmlEvent) -> String {
    match event {
        XmlEvent::StartElement(e) => {
            let attrs: Vec<String> = e
                .attributes()
                .iter()
                .map(|a| format!("{}={:?}", a.name(), a.value()))
                .collect();
            format!("StartElement {} [{}]", e.name(), attrs.join(", "))
        }
        XmlEvent::EndElement(e) => format!("EndElement {}", e.name()),
        XmlEvent::Characters(c) => format!("Characters {:?}", c.text()),
        XmlEvent::Comment(c) => format!("Comment {:?}", c.text()),
        XmlEvent::ProcessingInstruction(pi) => {
            format!("ProcessingInstruction {} {:?}", pi.target(), pi.data())
        }
    }
}

#[cfg(feature = "memory_tracking")]
fn report_stats(count: usize) {
    eprintln!("events: {count}, peak heap: {} bytes", tracking::peak());
}

#[cfg(not(feature = "memory_tracking"))]
fn report_stats(count: usize) {
    eprintln!("events: {count} (build with --features memory_tracking for heap stats)");
}
