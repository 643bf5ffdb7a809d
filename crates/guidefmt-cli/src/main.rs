use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use guidefmt_config::Config;
use guidefmt_engine::{IndexOptions, io};

/// Formatter and link checker for NextGuide hypertext documents.
#[derive(Debug, Parser)]
#[command(name = "guidefmt", version)]
struct Args {
    /// NextGuide document(s) to read
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Directory to write out formatted guide files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Recreate index pages, consolidated across the whole set
    #[arg(short = 'i', long = "index")]
    index: bool,

    /// Leading string to ignore when sorting and grouping index terms,
    /// e.g. '.' groups '.term' under 't' (may be repeated)
    #[arg(short = 'I', long = "index-ignore", value_name = "PREFIX")]
    index_ignore: Vec<String>,

    /// Suppress printing of warnings to standard error
    #[arg(short = 'w', long = "no-warnings")]
    no_warnings: bool,

    /// Print a list of all nodes in the set to standard output
    #[arg(short = 'n', long = "nodes")]
    nodes: bool,

    /// Render a readable plain-text version of the set to standard output;
    /// only used when no output directory is given
    #[arg(short = 'r', long = "readable")]
    readable: bool,

    /// Column width to wrap to (overrides the config file)
    #[arg(long, value_name = "COLS")]
    width: Option<usize>,

    /// Path to an alternate config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn index_options(config: &Config, extra_ignores: &[String]) -> IndexOptions {
    let mut ignore_prefixes = config.index.ignore_prefixes.clone();
    ignore_prefixes.extend(extra_ignores.iter().cloned());
    IndexOptions {
        ignore_prefixes,
        subindexes: config.index.subindexes.clone(),
        refs_indent: config.index.refs_indent,
        refs_gap: config.index.refs_gap,
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?
            .with_context(|| format!("config file not found: {}", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    let width = args.width.unwrap_or(config.width);

    let mut set = io::load_set(&args.files)?;
    set.resolve();

    if args.index {
        set.consolidate_indices(width, &index_options(&config, &args.index_ignore));
    }

    if let Some(dir) = &args.output_dir {
        let outputs = set.format(width)?;
        io::write_documents(dir, &outputs)?;
    } else if args.readable {
        for line in set.readable(width)? {
            println!("{line}");
        }
    } else {
        for (name, lines) in set.format(width)? {
            println!("=> DOC: {name}");
            for line in lines {
                println!("{line}");
            }
        }
    }

    if args.nodes {
        for (node, doc) in set.node_listing() {
            println!("{node:20} {doc}");
        }
    }

    if !args.no_warnings {
        for warning in set.warnings() {
            eprintln!("{warning}");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_parse() {
        let args =
            Args::try_parse_from(["guidefmt", "-o", "out", "-i", "-I", ".", "-w", "a.gde"])
                .unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.index);
        assert_eq!(args.index_ignore, vec!["."]);
        assert!(args.no_warnings);
        assert_eq!(args.files, vec![PathBuf::from("a.gde")]);
    }

    #[test]
    fn at_least_one_file_is_required() {
        assert!(Args::try_parse_from(["guidefmt"]).is_err());
    }

    #[test]
    fn cli_ignores_extend_config_prefixes() {
        let mut config = Config::default();
        config.index.ignore_prefixes = vec![".".to_string()];
        let opts = index_options(&config, &["_".to_string()]);
        assert_eq!(opts.ignore_prefixes, vec![".", "_"]);
        assert_eq!(opts.refs_indent, 20);
    }
}
