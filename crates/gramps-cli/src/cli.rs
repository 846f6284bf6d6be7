use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gramps_types::Category;

#[derive(Parser)]
#[command(
    name = "gramps-tree",
    about = "Inspect, edit and compare Gramps family trees by struct path",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Split a path expression into segments
    Parse(ParseArgs),
    /// Compare two family tree files
    Diff(DiffArgs),
    /// Read the value at a path inside a record
    Get(GetArgs),
    /// Assign the value at a path inside a record and save the tree
    Set(SetArgs),
    /// List the records a record refers to
    Refs(RefsArgs),
}

#[derive(Args)]
pub struct ParseArgs {
    pub path: String,
}

#[derive(Args)]
pub struct DiffArgs {
    /// The tree taken as the old side
    pub old: PathBuf,
    /// The tree taken as the new side
    pub new: PathBuf,
    /// Only list changed records, without line diffs
    #[arg(long)]
    pub brief: bool,
}

/// A record inside a family tree file.
#[derive(Args)]
pub struct RecordArgs {
    /// Family tree file
    pub file: PathBuf,
    pub category: Category,
    pub handle: String,
}

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub record: RecordArgs,
    pub path: String,
}

#[derive(Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub record: RecordArgs,
    pub path: String,
    /// New value as JSON; anything that is not valid JSON is taken as a string
    pub value: String,
    /// Write the edited tree here instead of back into the input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct RefsArgs {
    #[command(flatten)]
    pub record: RecordArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_parse() {
        let cli = Cli::try_parse_from(["gramps-tree", "parse", "a.b('x.y')"]).unwrap();
        if let Command::Parse(args) = cli.command {
            assert_eq!(args.path, "a.b('x.y')");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["gramps-tree", "diff", "old.json", "new.json", "--brief"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.old, PathBuf::from("old.json"));
            assert_eq!(args.new, PathBuf::from("new.json"));
            assert!(args.brief);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_get() {
        let cli = Cli::try_parse_from([
            "gramps-tree", "get", "tree.json", "Person", "P1", "primary_name.first_name",
        ])
        .unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.record.category, Category::Person);
            assert_eq!(args.record.handle, "P1");
            assert_eq!(args.path, "primary_name.first_name");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_set_with_output() {
        let cli = Cli::try_parse_from([
            "gramps-tree", "set", "tree.json", "Person", "P1", "gramps_id", "\"I002\"", "-o", "out.jsonl",
        ])
        .unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.value, "\"I002\"");
            assert_eq!(args.output, Some(PathBuf::from("out.jsonl")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(Cli::try_parse_from(["gramps-tree", "refs", "tree.json", "Spaceship", "S1"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "gramps-tree", "--verbose", "--format", "json", "--config", "diff.toml", "parse", "a",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("diff.toml")));
    }
}
