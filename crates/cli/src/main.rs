use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use v2xrelay::{EnvelopeConfig, Relay, RelayConfig};

#[derive(Parser)]
#[command(
    name = "v2x-relay",
    about = "Aggregates RTP datagrams into periodic framed batches for a V2X OBU"
)]
struct Args {
    /// Local address receiving RTP datagrams from the video pipeline
    #[arg(long, short, default_value = "192.168.62.223:30300")]
    bind: SocketAddr,

    /// OBU address receiving framed batches
    #[arg(long, short, default_value = "192.168.62.199:30299")]
    remote: SocketAddr,

    /// Flush period in milliseconds
    #[arg(long, default_value_t = 80)]
    period_ms: u64,

    /// Ring buffer capacity in datagrams
    #[arg(long, default_value_t = 128)]
    capacity: usize,

    /// Wrap batches in the TLV broadcast envelope
    #[arg(long)]
    tlv: bool,

    /// Envelope application/channel id (TLV mode)
    #[arg(long, default_value_t = 0x70)]
    aid: u32,

    /// Envelope traffic period (TLV mode)
    #[arg(long, default_value_t = 0x0b)]
    traffic_period: u32,

    /// Envelope priority (TLV mode)
    #[arg(long, default_value_t = 0x7f)]
    priority: u32,

    /// Envelope traffic id (TLV mode)
    #[arg(long, default_value_t = 0xffff)]
    traffic_id: u32,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = RelayConfig {
        bind_addr: args.bind,
        remote_addr: args.remote,
        capacity: args.capacity,
        flush_period: Duration::from_millis(args.period_ms),
        envelope: args.tlv.then(|| EnvelopeConfig {
            aid: args.aid,
            traffic_period: args.traffic_period,
            priority: args.priority,
            traffic_id: args.traffic_id,
            new_message: true,
        }),
        ..RelayConfig::default()
    };

    let mut relay = match Relay::new(config) {
        Ok(relay) => relay,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Runs until a fatal transport failure; a broken socket on a live
    // feed is not recoverable locally.
    if let Err(e) = relay.run() {
        eprintln!("Relay terminated: {}", e);
        std::process::exit(1);
    }
}
