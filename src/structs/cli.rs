use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "macrosplit")]
#[clap(about = "Macro-nutrient calculator with lockable percentage redistribution", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
