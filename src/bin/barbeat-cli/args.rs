// Copyright (c) 2023 Mike Tsao. All rights reserved.

// Shared with build.rs, which renders the man page from these definitions, so
// this file can depend on nothing but clap and std.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[clap(name = "barbeat-cli", author, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// YAML timeline file supplying the clock and any markers
    #[clap(short = 'c', long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    /// Tempo in beats per minute (overrides the config file)
    #[clap(short = 't', long, value_parser, global = true)]
    pub bpm: Option<u32>,

    /// Beats in each bar (overrides the config file)
    #[clap(short = 'b', long, value_parser, global = true)]
    pub beats_per_bar: Option<u32>,

    /// Subbeats in each beat (overrides the config file)
    #[clap(short = 's', long, value_parser, global = true)]
    pub subbeat_divisor: Option<u32>,

    /// Number bars, beats, and subbeats from one rather than zero
    #[clap(short = 'o', long, value_parser, global = true)]
    pub one_based: bool,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    pub version: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse raw values like 4:3/4.2/480@120₁ and describe them
    Parse {
        #[clap(required = true, allow_hyphen_values = true)]
        raw: Vec<String>,
    },
    /// Build a time from a signed subbeat count
    Ticks {
        #[clap(allow_negative_numbers = true)]
        ticks: i64,
    },
    /// Build a time from a signed number of seconds
    Seconds {
        #[clap(allow_negative_numbers = true)]
        seconds: f64,
    },
    /// Add two raw values
    Add {
        #[clap(allow_hyphen_values = true)]
        a: String,
        #[clap(allow_hyphen_values = true)]
        b: String,
    },
    /// Subtract the second raw value from the first
    Sub {
        #[clap(allow_hyphen_values = true)]
        a: String,
        #[clap(allow_hyphen_values = true)]
        b: String,
    },
    /// Print <, =, or > comparing two raw values
    Compare {
        #[clap(allow_hyphen_values = true)]
        a: String,
        #[clap(allow_hyphen_values = true)]
        b: String,
    },
    /// List the config file's markers in time order
    Markers,
}
