//! CLI module for the Prediction Gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Prediction Gateway - Calibrated predictions and hybrid catalog search
#[derive(Parser)]
#[command(name = "prediction-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
