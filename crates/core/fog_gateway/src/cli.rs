use crate::config::DEFAULT_CONFIG_DIR;
use camino::Utf8PathBuf;

#[derive(Debug, clap::Parser)]
#[clap(
name = clap::crate_name!(),
version = clap::crate_version!(),
about = clap::crate_description!()
)]
pub struct GatewayOpt {
    /// Start the gateway with a custom configuration directory
    #[clap(long = "config-dir", default_value = DEFAULT_CONFIG_DIR, global = true)]
    pub config_dir: Utf8PathBuf,

    #[command(flatten)]
    pub log_args: LogConfigArgs,

    #[command(subcommand)]
    pub command: Option<GatewayCommand>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogConfigArgs {
    /// Turn-on the DEBUG log level.
    ///
    /// If off only reports ERROR, WARN, and INFO, unless `--log-level` is set
    #[clap(long, global = true)]
    pub debug: bool,

    /// Configures the logging level.
    ///
    /// One of error/warn/info/debug/trace.
    /// Overrides `--debug`, `RUST_LOG` and the `[log]` table of the configuration file
    #[clap(long, global = true)]
    pub log_level: Option<tracing::Level>,
}

#[derive(Debug, Clone, Default, clap::Subcommand)]
pub enum GatewayCommand {
    /// Serve the uplink translation endpoint (default)
    #[default]
    Run,

    /// Translate a single uplink message and print the result
    Translate(TranslateArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct TranslateArgs {
    /// The topic the message was published on
    #[clap(long)]
    pub topic: String,

    /// The JSON payload of the message
    #[clap(long)]
    pub payload: String,

    #[clap(long, default_value = "")]
    pub product_key: String,

    #[clap(long, default_value = "")]
    pub device_name: String,

    /// Device MQTT username, `<device_name>&<product_key>`, used when the product key or device name is missing
    #[clap(long)]
    pub username: Option<String>,

    #[clap(long, default_value = "")]
    pub device_id: String,
}
