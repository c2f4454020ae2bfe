use clap::Parser;
use dnsforward_domain::{CliOverrides, ResolveMode};
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "dnsforward")]
#[command(version)]
#[command(about = "dnsforward - DNS forwarding proxy over classic DNS and DNS-over-HTTPS")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address, or SOCKET_ACTIVATION to adopt the socket handed over by the service manager
    #[arg(short = 'l', long, value_name = "ADDR")]
    listen: Option<String>,

    /// Backend dispatch mode (InOrder, Random, Concurrent)
    #[arg(long, value_name = "MODE")]
    resolve_mode: Option<ResolveMode>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write request and backend audit records, not only failures
    #[arg(long)]
    log_queries: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen_addr: cli.listen,
        resolve_mode: cli.resolve_mode,
        log_level: cli.log_level,
        log_queries: cli.log_queries,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dnsforward v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config)?;
    let socket = server::bind_listener(&config.server)?;

    tokio::select! {
        result = server::start_dns_server(socket, services.handler) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    let lost = services.emitter.lost();
    if lost > 0 {
        warn!(lost, queued = services.emitter.queued(), "Audit events lost after the writer stopped");
    }
    drop(services.emitter);
    if let Err(e) = services.audit_task.await {
        error!(error = %e, "Audit writer task failed");
    }

    info!("Server shutdown complete");
    Ok(())
}
