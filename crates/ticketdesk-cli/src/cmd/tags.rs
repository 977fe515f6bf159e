//! `td tags`: tag usage counts, most used first.

use std::io::Write;
use std::path::Path;
use ticketdesk_core::list_tags;

use crate::cmd;
use crate::output::{OutputMode, pretty_section, render};

pub fn run_tags(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = cmd::open_project(project_root, output)?;
    let tags = list_tags(&project.conn).map_err(|e| cmd::fail(output, e))?;

    render(output, &tags, |tags, mode, w| {
        if mode == OutputMode::Pretty {
            pretty_section(w, &format!("{} tags", tags.len()))?;
            for entry in tags {
                writeln!(w, "{:<24} {}", entry.tag, entry.count)?;
            }
        } else {
            for entry in tags {
                writeln!(w, "{}\t{}", entry.tag, entry.count)?;
            }
        }
        Ok(())
    })
}
