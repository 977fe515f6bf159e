//! `td filters`: the values each listing filter can take.

use clap::Args;
use std::io::Write;
use std::path::Path;
use ticketdesk_core::listing;

use crate::cmd;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Args, Debug)]
pub struct FiltersArgs {
    /// Leave out the ticket type filter.
    #[arg(long)]
    pub without_type: bool,
}

pub fn run_filters(
    args: &FiltersArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = cmd::open_project(project_root, output)?;
    let options = if args.without_type {
        listing::list_filters_without_type(&project.conn)
    } else {
        listing::list_filters(&project.conn)
    }
    .map_err(|e| cmd::fail(output, e))?;

    render(output, &options, |options, mode, w| {
        if mode == OutputMode::Pretty {
            pretty_section(w, "Filters")?;
            for (name, values) in options.iter() {
                pretty_kv(w, name, values.join(", "))?;
            }
        } else {
            for (name, values) in options.iter() {
                writeln!(w, "{name}\t{}", values.join("\t"))?;
            }
        }
        Ok(())
    })
}
