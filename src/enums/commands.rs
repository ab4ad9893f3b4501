use clap::Subcommand;
use crate::config::constants::DEFAULT_BUDGET;

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the interactive form and open it in the browser
    Serve {
        /// Pin the port instead of probing the default range
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long, default_value_t = DEFAULT_BUDGET)]
        budget: f64,
        /// Do not open the browser automatically
        #[clap(long)]
        no_browser: bool,
    },
    /// Compute one split and print the table
    Split {
        #[clap(short, long, default_value_t = DEFAULT_BUDGET)]
        budget: f64,
        #[clap(long)]
        protein: Option<f64>,
        #[clap(long)]
        carbs: Option<f64>,
        #[clap(long)]
        fat: Option<f64>,
    },
}
