use std::env;

use tracing::error;

#[tokio::main]
async fn main() {
    vn_salary::logging::init_logging();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = vn_salary::api::run_http_server(port).await {
                error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Some("calc") => std::process::exit(vn_salary::api::run_cli(&raw_args[1..])),
        _ => {
            eprintln!("Usage: vn-salary serve [port]");
            eprintln!("       vn-salary calc --amount <VND> [options]   (see calc --help)");
            std::process::exit(1);
        }
    }
}
