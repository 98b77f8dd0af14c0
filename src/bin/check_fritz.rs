use std::time::Duration;

use check_fritz::{
    Severity,
    checks::{check_downstream_current, check_downstream_max, check_downstream_usage},
    config::ProbeConfig,
    thresholds::Threshold,
};
use clap::{Parser, ValueEnum};
use tracing::{level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    #[value(name = "downstream_max")]
    DownstreamMax,
    #[value(name = "downstream_current")]
    DownstreamCurrent,
    #[value(name = "downstream_usage")]
    DownstreamUsage,
}

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Check downstream link statistics of a FRITZ!Box via TR-064")]
struct Args {
    /// Address of the FRITZ!Box
    #[arg(short = 'H', long, default_value = "fritz.box")]
    hostname: String,

    /// TR-064 control port
    #[arg(short = 'P', long, default_value_t = 49443)]
    port: u16,

    /// User to authenticate with
    #[arg(short, long)]
    username: String,

    /// Password; falls back to the FRITZ_PASSWORD environment variable
    #[arg(short, long)]
    password: Option<String>,

    /// Check to run
    #[arg(short, long, value_enum, default_value_t = Method::DownstreamMax)]
    method: Method,

    /// Model group of the box; "dsl" selects the DSL specific service
    #[arg(long, default_value = "dsl")]
    modelgroup: String,

    /// Timeout for one remote call, in seconds
    #[arg(short, long, default_value_t = 90)]
    timeout: u64,

    /// Divisor applied to the raw maximum rate (kbit/s -> Mbit/s)
    #[arg(long, default_value_t = 1000.0)]
    divisor_max: f64,

    /// Divisor applied to the current rate after the bytes-to-bits conversion
    #[arg(long, default_value_t = 1_000_000.0)]
    divisor_current: f64,

    /// Warning threshold expression (N, N:, :M or N:M)
    #[arg(short, long, value_parser = Threshold::parse)]
    warning: Option<Threshold>,

    /// Critical threshold expression (N, N:, :M or N:M)
    #[arg(short, long, value_parser = Threshold::parse)]
    critical: Option<Threshold>,

    /// Use plain HTTP instead of HTTPS towards the control endpoint
    #[arg(long)]
    no_tls: bool,

    /// Verbose tracing of the SOAP exchange
    #[arg(short, long)]
    debug: bool,
}

fn init(debug: bool) {
    let level = if debug {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };
    let filter = filter::Targets::new().with_target("check_fritz", level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init(args.debug);
    trace!("running {:?} against {}:{}", args.method, args.hostname, args.port);

    let Some(password) = args
        .password
        .clone()
        .or_else(|| std::env::var("FRITZ_PASSWORD").ok())
    else {
        println!("UNKNOWN - no password given (use --password or FRITZ_PASSWORD)");
        std::process::exit(Severity::Unknown.exit_code());
    };

    let config = ProbeConfig {
        hostname: args.hostname,
        port: args.port,
        username: args.username,
        password,
        modelgroup: args.modelgroup,
        tls: !args.no_tls,
        timeout: Duration::from_secs(args.timeout),
        divisor_max: args.divisor_max,
        divisor_current: args.divisor_current,
        warning: args.warning,
        critical: args.critical,
        debug: args.debug,
    };

    let result = match args.method {
        Method::DownstreamMax => check_downstream_max(&config).await,
        Method::DownstreamCurrent => check_downstream_current(&config).await,
        Method::DownstreamUsage => check_downstream_usage(&config).await,
    };

    println!("{}", result.status_line());
    std::process::exit(result.severity.exit_code());
}
