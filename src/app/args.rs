use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "ui-log-relay")]
#[command(about = "Relays application logs to connected UI clients")]
pub struct AppArgs {
    #[arg(long, help = "Port to listen on (random free port if not specified)")]
    pub port: Option<u16>,

    #[arg(
        long,
        default_value = "info",
        help = "Filter directive for stderr log output (env-filter syntax)"
    )]
    pub log_level: String,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}
