use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use gramps_diff::{diff_db_to_file_with, diff_struct_text, ChangedRecord, DbDiff, DiffLine, MissingRecord};
use gramps_io::{export_json, ImporterRegistry};
use gramps_store::{InMemoryRecordStore, RecordStore};
use gramps_struct::{collect_references, parse, Node, Struct};
use gramps_types::{Handle, Progress, Record, Value};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Parse(args) => cmd_parse(args, cli.format),
        Command::Diff(args) => cmd_diff(args, cli.format, &config),
        Command::Get(args) => cmd_get(args, cli.format),
        Command::Set(args) => cmd_set(args),
        Command::Refs(args) => cmd_refs(args, cli.format),
    }
}

/// Reports progress phases as debug events.
#[derive(Default)]
struct LogProgress {
    message: String,
    total: usize,
    done: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, message: &str, total: usize) {
        self.message = message.to_string();
        self.total = total;
        self.done = 0;
        debug!(phase = %self.message, total, "started");
    }

    fn step(&mut self) {
        self.done += 1;
    }

    fn end(&mut self) {
        debug!(phase = %self.message, done = self.done, total = self.total, "finished");
    }
}

fn load_tree(registry: &ImporterRegistry, path: &Path) -> anyhow::Result<InMemoryRecordStore> {
    let store = InMemoryRecordStore::new();
    let imported = registry
        .import_file(path, &store, &mut LogProgress::default())
        .with_context(|| format!("loading {}", path.display()))?;
    if imported.is_none() {
        bail!("no importer handles {}", path.display());
    }
    Ok(store)
}

/// Interpret a command-line value: JSON when it parses, a plain string otherwise.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn record_label(record: &Record) -> String {
    match record.gramps_id() {
        Some(id) => format!("{} {} ({})", record.category(), record.handle(), id),
        None => format!("{} {}", record.category(), record.handle()),
    }
}

fn cmd_parse(args: ParseArgs, format: OutputFormat) -> anyhow::Result<()> {
    let segments = parse(&args.path);
    match format {
        OutputFormat::Json => print_json(&json!(segments))?,
        OutputFormat::Text => {
            for (i, segment) in segments.iter().enumerate() {
                println!("{:>3}  {}", i.to_string().dimmed(), segment);
            }
        }
    }
    Ok(())
}

fn cmd_diff(args: DiffArgs, format: OutputFormat, config: &CliConfig) -> anyhow::Result<()> {
    let registry = ImporterRegistry::default();
    let old = load_tree(&registry, &args.old)?;
    let Some(diff) = diff_db_to_file_with(&config.diff, &registry, &old, &args.new, &mut LogProgress::default())
        .with_context(|| format!("comparing against {}", args.new.display()))?
    else {
        bail!("no importer handles {}", args.new.display());
    };

    match format {
        OutputFormat::Json => print_json(&diff_to_json(&diff)),
        OutputFormat::Text => print_diff(&diff, args.brief),
    }
}

fn diff_to_json(diff: &DbDiff) -> serde_json::Value {
    let missing = |records: &[MissingRecord]| -> Vec<serde_json::Value> {
        records.iter().map(|m| m.record.to_struct().to_json()).collect()
    };
    let changed: Vec<serde_json::Value> = diff
        .diffs
        .iter()
        .map(|c| json!({"old": c.old.to_struct().to_json(), "new": c.new.to_struct().to_json()}))
        .collect();
    json!({
        "diffs": changed,
        "missing_from_new": missing(&diff.missing_from_new),
        "missing_from_old": missing(&diff.missing_from_old),
        "unchanged": diff.unchanged,
    })
}

fn print_diff(diff: &DbDiff, brief: bool) -> anyhow::Result<()> {
    if diff.is_empty() {
        println!("{} No differences ({} records compared).", "✓".green().bold(), diff.unchanged);
        return Ok(());
    }

    for changed in &diff.diffs {
        print_changed(changed, brief)?;
    }
    for missing in &diff.missing_from_new {
        println!("{} {}", "removed:".red().bold(), record_label(&missing.record));
    }
    for missing in &diff.missing_from_old {
        println!("{} {}", "added:".green().bold(), record_label(&missing.record));
    }

    println!(
        "\n{} changed, {} removed, {} added, {} unchanged",
        diff.diffs.len().to_string().yellow(),
        diff.missing_from_new.len().to_string().red(),
        diff.missing_from_old.len().to_string().green(),
        diff.unchanged,
    );
    Ok(())
}

fn print_changed(changed: &ChangedRecord, brief: bool) -> anyhow::Result<()> {
    println!("{} {}", "changed:".yellow().bold(), record_label(&changed.new));
    if brief {
        return Ok(());
    }
    let text = diff_struct_text(&changed.old.to_struct(), &changed.new.to_struct())?;
    for hunk in &text.hunks {
        println!("{}", format!("@@ -{} +{} @@", hunk.old_start, hunk.new_start).cyan());
        for line in &hunk.lines {
            match line {
                DiffLine::Context(s) => println!("  {s}"),
                DiffLine::Removed(s) => println!("{}", format!("- {s}").red()),
                DiffLine::Added(s) => println!("{}", format!("+ {s}").green()),
            }
        }
    }
    Ok(())
}

fn open_record<'a>(store: &'a InMemoryRecordStore, args: &RecordArgs) -> anyhow::Result<Struct<'a>> {
    let handle = Handle::new(args.handle.as_str())?;
    Struct::from_store(store, args.category, &handle)?
        .with_context(|| format!("no {} with handle {}", args.category, handle))
}

fn cmd_get(args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_tree(&ImporterRegistry::default(), &args.record.file)?;
    let record = open_record(&store, &args.record)?;
    let value = match record.get(&args.path)? {
        Some(Node::Method(method)) => {
            println!("{} {:?}; call it with arguments, e.g. {}", "method".cyan(), method.builtin(), "(...)".bold());
            return Ok(());
        }
        Some(node) => node.into_value(),
        None => None,
    };

    match (value, format) {
        (Some(value), OutputFormat::Json) => print_json(&value.to_json())?,
        (Some(Value::Str(s)), OutputFormat::Text) => println!("{s}"),
        (Some(value), OutputFormat::Text) => println!("{}", serde_json::to_string_pretty(&value.to_json())?),
        (None, OutputFormat::Json) => println!("null"),
        (None, OutputFormat::Text) => println!("{}", "(no value)".dimmed()),
    }
    Ok(())
}

fn cmd_set(args: SetArgs) -> anyhow::Result<()> {
    let store = load_tree(&ImporterRegistry::default(), &args.record.file)?;
    let mut record = open_record(&store, &args.record)?;
    if !record.try_set(&args.path, parse_value(&args.value))? {
        bail!(
            "{} on {} {} is not an assignable field; nothing written",
            args.path,
            args.record.category,
            args.record.handle
        );
    }

    let target = args.output.as_deref().unwrap_or(args.record.file.as_path());
    let written = write_tree(&store, target)?;
    println!(
        "{} Set {} on {} {}; wrote {} records to {}",
        "✓".green().bold(),
        args.path.bold(),
        args.record.category,
        args.record.handle.yellow(),
        written,
        target.display(),
    );
    Ok(())
}

/// Export `store` to `target` through a temporary file in the same
/// directory, so a failed write leaves `target` as it was.
fn write_tree(store: &InMemoryRecordStore, target: &Path) -> anyhow::Result<usize> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    let written = export_json(store, BufWriter::new(temp.as_file_mut()))?;
    temp.persist(target)
        .with_context(|| format!("replacing {}", target.display()))?;
    Ok(written)
}

fn cmd_refs(args: RefsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_tree(&ImporterRegistry::default(), &args.record.file)?;
    let record = open_record(&store, &args.record)?;
    let refs = collect_references(record.value());

    let mut rows = Vec::with_capacity(refs.len());
    for r in &refs {
        rows.push((r, store.contains(r.classname, &r.handle)?));
    }

    match format {
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = rows
                .iter()
                .map(|(r, present)| json!({"classname": r.classname, "handle": r.handle, "present": present}))
                .collect();
            print_json(&json!(items))?;
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No references.");
            }
            for (r, present) in rows {
                let status = if present { "✓".green() } else { "missing".red() };
                println!("  {} {} {}", r.classname, r.handle.as_str().yellow(), status);
            }
        }
    }
    Ok(())
}
