use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jlist_class_file::Class;
use jlist_jar::{ClassSummary, Jar};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the classes found in one or more jars
    List {
        /// paths to the jars
        #[arg(required = true)]
        jars: Vec<PathBuf>,
    },
    /// Describe a single class file
    Show {
        /// path to the class file
        class: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Args::parse().command {
        Command::List { jars } => list(&jars),
        Command::Show { class } => show(&class),
    }
}

fn list(jars: &[PathBuf]) -> Result<()> {
    println!(
        "{}",
        csv_record(&["file", "class_type", "name", "super_name", "interfaces"])
    );

    for path in jars {
        let mut jar =
            Jar::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        for summary in jar.list()? {
            println!("{}", row(&summary));
        }
    }

    Ok(())
}

fn row(summary: &ClassSummary) -> String {
    csv_record(&[
        summary.archive.as_str(),
        summary.kind.as_str(),
        summary.name.as_str(),
        summary.super_name.as_str(),
        summary.interfaces.join(", ").as_str(),
    ])
}

/// One comma-separated line, quoted the way RFC 4180 readers expect.
fn csv_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_field(field: &str) -> String {
    let needs_quotes = field == r"\."
        || field.contains(&[',', '"', '\r', '\n'][..])
        || field.starts_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

fn show(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let class = Class::read(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let class_file = class.class_file();
    let cp = &class_file.constant_pool;

    println!("{class}");
    println!(
        "version {}.{}, {} constant pool slots",
        class_file.major_version,
        class_file.minor_version,
        cp.len()
    );

    for field in &class_file.fields {
        println!(
            "  field {} {} [{}]",
            cp.text_at(field.name_index),
            cp.text_at(field.descriptor_index),
            field.access_flags
        );
    }
    for method in &class_file.methods {
        println!(
            "  method {}{} [{}]",
            cp.text_at(method.name_index),
            cp.text_at(method.descriptor_index),
            method.access_flags
        );
    }
    for attribute in &class_file.attributes {
        println!(
            "  attribute {} ({} bytes)",
            attribute.name(cp),
            attribute.info.len()
        );
    }

    Ok(())
}
