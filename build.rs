// Copyright (c) 2023 Mike Tsao. All rights reserved.

use clap::CommandFactory;

include!("src/bin/barbeat-cli/args.rs");

// https://unix.stackexchange.com/questions/3586/what-do-the-numbers-in-a-man-page-mean
// Picking category 1 as a "user command"
fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/bin/barbeat-cli/args.rs");
    let out_dir =
        std::path::PathBuf::from(std::env::var_os("OUT_DIR").ok_or(std::io::ErrorKind::NotFound)?);
    let man = clap_mangen::Man::new(Args::command());
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;
    std::fs::write(out_dir.join("barbeat-cli.1"), buffer)?;
    Ok(())
}
