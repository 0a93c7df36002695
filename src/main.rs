//! Resolve the IP address currently bound to a MAC address on a local
//! network segment, probing the segment when the binding is not cached.
use std::process::exit;

use clap::error::ErrorKind;
use clap::Parser;
use ip_network::Ipv4Network;
use log::LevelFilter;
use mac2ip::interface::parse_network;
use mac2ip::models::AddressFamily;
use mac2ip::resolver::{Phase, Query, Resolver};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hardware address to resolve.
    mac: String,
    /// Interface whose segment is probed when the address is not cached.
    interface: String,
    /// Network to scan, in CIDR form; derived from the interface by default.
    network: Option<String>,
    /// Address family of the wanted binding.
    #[arg(short = 'f', long, default_value_t = AddressFamily::Ipv4)]
    family: AddressFamily,
    /// Minimum log level.
    #[arg(short = 'L', long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

/// Exit status for invalid invocations, which print usage on stdout.
/// Distinct from the not-found and command-failure statuses.
const EXIT_USAGE: i32 = 255;

/// Exit-status policy for external-command failures: 2 before the probe,
/// 1 after it (matching not-found).
fn exit_status(phase: Phase) -> i32 {
    match phase {
        Phase::InitialLookup | Phase::NetworkResolution => 2,
        Phase::RetryLookup => 1,
    }
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(error) if error.kind() == ErrorKind::DisplayHelp || error.kind() == ErrorKind::DisplayVersion => {
            let _ = error.print();
            exit(0);
        }
        Err(error) => {
            println!("{}", error.render());
            exit(EXIT_USAGE);
        }
    }
}

fn main() {
    let args = parse_args();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .init();

    let network: Option<Ipv4Network> = match args.network.as_deref().map(parse_network).transpose()
    {
        Ok(network) => network,
        Err(error) => {
            eprintln!("invalid network: {:#}", error);
            exit(EXIT_USAGE);
        }
    };

    let query = Query::new(&args.mac, &args.interface, network, args.family);
    let resolver = Resolver::default();

    match resolver.resolve(&query) {
        Ok(Some(addr)) => println!("{}", addr),
        Ok(None) => exit(1),
        Err(error) => {
            eprintln!("{}", error);
            exit(exit_status(error.phase));
        }
    }
}
