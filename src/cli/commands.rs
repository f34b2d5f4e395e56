use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::dispatcher::DispatchOverride;
use crate::handler::compose;
use crate::manifest::Manifest;
use crate::method::parse_method;
use crate::{Context, RequestId};

/// Command-line interface for chainrouter
///
/// Inspects route manifests and dry-runs requests against them.
#[derive(Parser)]
#[command(name = "chainrouter")]
#[command(about = "Inspect and exercise route tables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for the `routes` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the route table of a manifest in dispatch order
    Routes {
        /// Path to the YAML route manifest
        #[arg(short, long)]
        manifest: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Dispatch one request through a manifest's router and print the outcome
    ///
    /// Routes answer with the echo handler, so the output shows which route
    /// won and which parameters it extracted.
    Match {
        /// Path to the YAML route manifest
        #[arg(short, long)]
        manifest: PathBuf,

        /// Serve the routes under this prefix instead of the configured one
        #[arg(long)]
        prefix: Option<String>,

        /// Correlation id (ULID) to dispatch with; a fresh one is minted otherwise
        #[arg(long)]
        request_id: Option<String>,

        /// HTTP method, e.g. GET
        method: String,

        /// Request path, e.g. /api/users/42
        path: String,
    },
}

/// Parse arguments and run against stdout
///
/// # Errors
///
/// Returns any manifest, registration or output error.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run a parsed command, writing its output to `out`
///
/// # Errors
///
/// Returns any manifest, registration or output error.
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Routes { manifest, format } => {
            let router = Manifest::load(manifest)?.build_router()?;
            let routes = router.get_routes();
            match format {
                OutputFormat::Text => {
                    writeln!(
                        out,
                        "[routes] prefix={} count={}",
                        router.prefix(),
                        routes.len()
                    )?;
                    for route in routes.iter() {
                        writeln!(
                            out,
                            "[route] {:<7} {} ({} handlers)",
                            route.method().as_str(),
                            route.path(),
                            route.middlewares().len()
                        )?;
                    }
                }
                OutputFormat::Json => {
                    let listing: Vec<_> = routes
                        .iter()
                        .map(|r| {
                            json!({
                                "method": r.method().as_str(),
                                "prefix": r.prefix(),
                                "route": r.route(),
                                "path": r.path(),
                                "handlers": r.middlewares().len(),
                            })
                        })
                        .collect();
                    serde_json::to_writer_pretty(&mut *out, &listing)?;
                    writeln!(out)?;
                }
            }
            Ok(())
        }
        Commands::Match {
            manifest,
            prefix,
            request_id,
            method,
            path,
        } => {
            let router = Manifest::load(manifest)?.build_router()?;
            let method =
                parse_method(method).ok_or_else(|| anyhow!("Unsupported HTTP method '{method}'"))?;

            let handler = match prefix {
                Some(prefix) => router
                    .middleware_with(DispatchOverride {
                        prefix: Some(prefix.clone()),
                        not_found: None,
                    })
                    .with_context(|| format!("Cannot serve routes under '{prefix}'"))?,
                None => router.handler(),
            };

            let mut ctx = Context::new(method, path.as_str());
            ctx.request_id = RequestId::from_header_or_new(request_id.as_deref());
            compose(&[handler]).run_to_end(&mut ctx)?;
            serde_json::to_writer_pretty(&mut *out, &ctx.summary())?;
            writeln!(out)?;
            Ok(())
        }
    }
}
