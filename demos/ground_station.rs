//! Minimal ground station.
//!
//! Loads one or more JSON definition sets, prints a few frames created as
//! this station, then parses raw telemetry from a capture file or stdin and
//! logs what it sees.
//!
//! ```text
//! cargo run --example ground_station --features serde -- \
//!     --schema demos/common_subset.json --input flight.bin
//! ```

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skylink::{Engine, EngineConfig, Event, FieldValue, Fields, ProtocolVersion, SchemaDefinition};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Framing {
    V1,
    Legacy,
}

#[derive(Debug, Parser)]
#[command(author, about = "Decode vehicle telemetry from a capture or stdin", long_about = None)]
struct Cli {
    /// Definition set in JSON; repeat to merge several sets
    #[arg(long = "schema", value_name = "FILE", default_value = "demos/common_subset.json")]
    schemas: Vec<PathBuf>,

    /// Raw telemetry capture. Reads stdin when omitted.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Only accept frames from this system id (0 accepts all)
    #[arg(long, default_value_t = 0)]
    system_id: u8,

    /// Only accept frames from this component id (0 accepts all)
    #[arg(long, default_value_t = 0)]
    component_id: u8,

    /// Framing version on the link
    #[arg(long, value_enum, default_value_t = Framing::V1)]
    framing: Framing,

    /// Read buffer size, mimicking serial read granularity
    #[arg(long, default_value_t = 64)]
    chunk: usize,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let mut definitions = Vec::with_capacity(cli.schemas.len());
    for path in &cli.schemas {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let definition: SchemaDefinition =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        definitions.push(definition);
    }

    let mut engine = Engine::new(EngineConfig {
        system_id: cli.system_id,
        component_id: cli.component_id,
        version: match cli.framing {
            Framing::V1 => ProtocolVersion::V1,
            Framing::Legacy => ProtocolVersion::Legacy,
        },
        ..EngineConfig::default()
    });
    engine.load(definitions, &mut |event: Event| {
        if event == Event::Ready {
            info!("engine ready");
        }
    })?;

    print_samples(&engine)?;

    let mut reader: Box<dyn Read> = match &cli.input {
        Some(path) => {
            Box::new(File::open(path).with_context(|| format!("opening {}", path.display()))?)
        }
        None => Box::new(io::stdin()),
    };

    let mut buf = vec![0u8; cli.chunk.max(1)];
    loop {
        let n = reader.read(&mut buf).context("reading telemetry")?;
        if n == 0 {
            break;
        }
        engine.parse(&buf[..n], &mut report)?;
    }

    let metrics = engine.metrics();
    info!(
        accepted = metrics.frames_accepted,
        checksum_failures = metrics.checksum_failures,
        lost = metrics.frames_lost,
        discarded_bytes = metrics.bytes_discarded,
        "link summary"
    );
    Ok(())
}

fn report(event: Event) {
    match event {
        Event::Decoded(message) if message.name == "ATTITUDE" => {
            info!(
                roll = %message.fields["roll"],
                pitch = %message.fields["pitch"],
                "attitude"
            );
        }
        Event::Decoded(message) => {
            info!(name = %message.name, seq = message.frame.sequence(), "message");
        }
        Event::DecodeFailed { frame, error } => {
            warn!(id = frame.message_id(), %error, "undecodable frame");
        }
        Event::SequenceGap { gap } => warn!(gap, "frames lost"),
        Event::ChecksumFail(failure) => {
            warn!(
                id = failure.message_id,
                computed = failure.computed,
                received = failure.received,
                "bad checksum"
            );
        }
        Event::Message(_) | Event::Ready => {}
    }
}

fn print_samples(engine: &Engine) -> Result<()> {
    let samples: [(&str, Fields); 3] = [
        (
            "ATTITUDE",
            fields([
                ("time_boot_ms", 30u32.into()),
                ("roll", 0.1f32.into()),
                ("pitch", 0.2f32.into()),
                ("yaw", 0.3f32.into()),
                ("rollspeed", 0.4f32.into()),
                ("pitchspeed", 0.5f32.into()),
                ("yawspeed", 0.6f32.into()),
            ]),
        ),
        (
            "PARAM_VALUE",
            fields([
                ("param_id", "MY_PI".into()),
                ("param_value", 3.25f32.into()),
                ("param_type", 5u8.into()),
                ("param_count", 100u16.into()),
                ("param_index", 55u16.into()),
            ]),
        ),
        (
            "GPS_STATUS",
            fields([
                ("satellites_visible", 5u8.into()),
                ("satellite_prn", [1u8, 2, 3, 4, 5].into()),
                ("satellite_used", [2u8, 3, 4, 5, 6].into()),
                ("satellite_elevation", [3u8, 4, 5, 6, 7].into()),
                ("satellite_azimuth", [4u8, 5, 6, 7, 8].into()),
                ("satellite_snr", [5u8, 6, 7, 8, 9].into()),
            ]),
        ),
    ];

    for (name, values) in &samples {
        let frame = engine.create_message(*name, values, 0)?;
        let hex: Vec<String> = frame.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
        println!("{name}: {}", hex.join(" "));
    }
    Ok(())
}

fn fields<const N: usize>(values: [(&str, FieldValue); N]) -> Fields {
    values
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}
