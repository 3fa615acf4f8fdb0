use crate::output::print_json;
use clap::Subcommand;
use wge_core::version::resolve;

#[derive(Subcommand)]
pub enum VersionSubcommand {
    /// Resolve a version or range against the available versions
    Resolve {
        /// Concrete version (1.2.3, v1.2.3) or range (^1.2, ~2.0, >=1 <2)
        requested: String,
        /// Available version (repeatable)
        #[arg(long = "candidate", value_name = "VERSION")]
        candidates: Vec<String>,
        /// Version currently on display; kept when the request is invalid
        #[arg(long, default_value = "")]
        current: String,
    },
}

pub fn run(subcmd: VersionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        VersionSubcommand::Resolve {
            requested,
            candidates,
            current,
        } => resolve_cmd(&requested, &candidates, &current, json),
    }
}

fn resolve_cmd(requested: &str, candidates: &[String], current: &str, json: bool) -> anyhow::Result<()> {
    let resolution = resolve(candidates, requested, current);

    if json {
        print_json(&resolution)?;
    } else if resolution.valid {
        println!("{}", resolution.resolved);
    }

    if let Some(message) = resolution.error_message {
        anyhow::bail!("{message}");
    }
    Ok(())
}
