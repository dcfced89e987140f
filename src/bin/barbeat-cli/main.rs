// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The CLI (command-line interface) tool converts between bar-beat times,
//! ticks, and seconds, and does arithmetic on them.

mod args;

use anyhow::anyhow;
use args::{Args, Command};
use barbeat::{app_version, resolve_context, BarBeatTime, Base, TimeContext, TimelineSettings};
use clap::Parser;
use std::cmp::Ordering;

fn describe(t: &BarBeatTime) -> String {
    format!(
        "{}\tticks {}\tseconds {:.3}\t{}",
        t.raw_value(),
        t.ticks(),
        t.seconds(),
        t.display_string()
    )
}

fn parse(raw: &str) -> anyhow::Result<BarBeatTime> {
    raw.parse::<BarBeatTime>()
        .map_err(|e| anyhow!("{e} (expected something like 4:3/4.2/480@120₁)"))
}

fn run(args: &Args) -> anyhow::Result<Vec<String>> {
    let timeline = match &args.config {
        Some(path) => Some(TimelineSettings::new_from_yaml_file(path)?),
        None => None,
    };
    let clock = timeline.as_ref().map(|t| &t.context_settings);
    let context: TimeContext = resolve_context(
        clock,
        args.beats_per_bar,
        args.subbeat_divisor,
        args.bpm,
    )?;
    let base = if args.one_based {
        Base::One
    } else {
        clock.map(|c| c.base()).unwrap_or_default()
    };

    let Some(command) = &args.command else {
        return Err(anyhow!("nothing to do; try --help"));
    };
    let lines = match command {
        Command::Parse { raw } => raw
            .iter()
            .map(|r| parse(r).map(|t| describe(&t)))
            .collect::<anyhow::Result<Vec<_>>>()?,
        Command::Ticks { ticks } => {
            vec![describe(&BarBeatTime::try_new_with_ticks(*ticks, context, base)?)]
        }
        Command::Seconds { seconds } => {
            vec![describe(&BarBeatTime::new_with_seconds(*seconds, context, base)?)]
        }
        Command::Add { a, b } => vec![describe(&parse(a)?.checked_add(&parse(b)?)?)],
        Command::Sub { a, b } => vec![describe(&parse(a)?.checked_sub(&parse(b)?)?)],
        Command::Compare { a, b } => {
            let ordering = parse(a)?.try_cmp(&parse(b)?)?;
            vec![match ordering {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            }
            .to_string()]
        }
        Command::Markers => {
            let Some(timeline) = &timeline else {
                return Err(anyhow!("markers come from a timeline; pass --config"));
            };
            timeline
                .sorted_markers()?
                .iter()
                .map(|(name, t)| format!("{name}\t{}", describe(t)))
                .collect()
        }
    };
    Ok(lines)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.version {
        println!("barbeat-cli {}", app_version());
        return Ok(());
    }

    for line in run(&args)? {
        println!("{line}");
    }
    Ok(())
}
