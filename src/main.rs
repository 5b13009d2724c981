use clap::Parser;
use tracing::error;

use geolookup::config::{DEFAULT_CONFIG_PATH, StaticConfig};
use geolookup::runtime::{lifetime::startup::prepare_server_startup, run_server};
use geolookup::system::init_logging;

/// GeoLookup - MaxMind backed IP geolocation HTTP service
#[derive(Parser, Debug)]
#[command(name = "geolookup")]
#[command(version)]
#[command(about = "IP geolocation lookup service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Force debug-level logging
    #[arg(long)]
    debug: bool,

    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long)]
    graceful_timeout: Option<u64>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.generate_config {
        println!("{}", StaticConfig::generate_sample_config());
        return;
    }

    println!("== Starting Service ==");

    let mut config = match StaticConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    if args.debug {
        config.logging.level = "debug".to_string();
    }
    if let Some(secs) = args.graceful_timeout {
        config.server.graceful_timeout_secs = secs;
    }

    // 日志系统必须在其他模块之前初始化，guard 需要存活到进程结束
    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let startup = match prepare_server_startup(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(service = "main", "Server startup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_server(&config, startup).await {
        error!(service = "main", "Server error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["geolookup"]);
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
        assert!(!args.debug);
        assert!(args.graceful_timeout.is_none());
        assert!(!args.generate_config);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "geolookup",
            "-c",
            "/etc/geolookup.toml",
            "--debug",
            "--graceful-timeout",
            "30",
        ]);
        assert_eq!(args.config, "/etc/geolookup.toml");
        assert!(args.debug);
        assert_eq!(args.graceful_timeout, Some(30));
    }
}
