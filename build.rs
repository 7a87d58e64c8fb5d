//! Renders the `botrunner(1)` manual page into `OUT_DIR`.

use std::{env, fs::File, io::BufWriter, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return Ok(());
    };
    let command = cli::Cli::command();
    let page = out_dir.join(format!("{}.1", command.get_name()));

    let mut writer = BufWriter::new(File::create(&page)?);
    Man::new(command).render(&mut writer)
}
