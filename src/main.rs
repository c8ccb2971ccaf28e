//! Spark API 服务器入口

use spark_api::env::{load_dotenv, EnvConfig};
use spark_api::web::{WebConfig, WebServer};
use tracing_subscriber::EnvFilter;

/// 命令行覆盖项
#[derive(Default)]
struct CliArgs {
    bind_addr: Option<String>,
    port: Option<u16>,
}

/// 简单的命令行参数解析，`--help` 时返回 `None`
fn parse_args(args: &[String]) -> Option<CliArgs> {
    let mut cli = CliArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    cli.bind_addr = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    cli.port = Some(args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    }));
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => return None,
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }
    Some(cli)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(cli) = parse_args(&args) else {
        print_help();
        return Ok(());
    };

    let loaded = load_dotenv();

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置错误: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(file) = loaded {
        tracing::info!("已加载环境文件: {}", file);
    }
    tracing::info!("{}", env_config.summary());

    let mut web_config = WebConfig::from(env_config);
    if let Some(bind_addr) = cli.bind_addr {
        web_config.bind_addr = bind_addr;
    }
    if let Some(port) = cli.port {
        web_config.port = port;
    }

    WebServer::new(web_config).start().await?;

    Ok(())
}

fn print_help() {
    println!("Spark API");
    println!();
    println!("USAGE:");
    println!("    spark-api [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: SPARK_BIND_ADDRESS or 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: SPARK_PORT or 4343]");
    println!("    -h, --help               Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("{}", spark_api::env::generate_env_docs());
    println!();
    println!("EXAMPLES:");
    println!("    spark-api");
    println!("    spark-api --bind 0.0.0.0 --port 3000");
}
