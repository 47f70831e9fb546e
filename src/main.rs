//! The interactive shell (spec §6): `trdb <config.toml>` opens the page
//! store environment named in the config file, then reads SQL from stdin at
//! a `SQL> ` prompt until `quit` or EOF.

use std::error::Error;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use trdb::config::EngineConfig;
use trdb::engine_environment::EngineEnvironment;
use trdb::parser;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "trdb.toml".to_string());

    let cfg = match EngineConfig::load_from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let _logging_guard = match init_logging(&cfg.storage.logs_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            std::process::exit(1);
        }
    };

    let mut env = match EngineEnvironment::new(cfg) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("failed to open environment: {e}");
            std::process::exit(1);
        }
    };

    run_repl(&mut env).await;
}

async fn run_repl(env: &mut EngineEnvironment) {
    use std::io::Write as _;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("SQL> ");
        std::io::stdout().flush().ok();

        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "error reading stdin");
                break;
            }
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.eq_ignore_ascii_case("test") {
            run_self_test(env).await;
            continue;
        }

        match parser::parse(query) {
            Err(e) => {
                println!("invalid SQL: {query}");
                println!("{e}");
            }
            Ok(stmt) => {
                println!("{stmt:?}");
                match env.sql_exec.execute(&stmt) {
                    Ok(result) => println!("{result}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
        }
    }
}

/// Runs the spec §8 end-to-end scenario against the live environment and
/// reports pass/fail for each step; invoked by the `test` REPL command.
async fn run_self_test(env: &mut EngineEnvironment) {
    let steps = [
        "CREATE TABLE _selftest_foo (a INT, b TEXT)",
        "SHOW TABLES",
        "SHOW COLUMNS FROM _selftest_foo",
        "CREATE INDEX _selftest_fx ON _selftest_foo (a) USING BTREE",
        "SHOW INDEX FROM _selftest_foo",
        "DROP INDEX _selftest_fx FROM _selftest_foo",
        "DROP TABLE _selftest_foo",
    ];

    for step in steps {
        match parser::parse(step) {
            Ok(stmt) => match env.sql_exec.execute(&stmt) {
                Ok(result) => println!("PASS: {step} -> {}", result.message),
                Err(e) => println!("FAIL: {step} -> {e}"),
            },
            Err(e) => println!("FAIL (parse): {step} -> {e}"),
        }
    }
}

/// Sets up logging: a compact stdout layer and a JSON-formatted rolling file
/// layer, both behind an `EnvFilter` defaulting to `INFO` (SPEC_FULL §10.2).
fn init_logging(log_dir: &PathBuf) -> Result<WorkerGuard, Box<dyn Error + Send + Sync>> {
    let file_appender = tracing_appender::rolling::daily(log_dir, "trdb.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_level(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
