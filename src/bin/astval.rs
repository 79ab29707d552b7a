//! Command-line validator for ASTERIX record files.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use astval::{
    avec::{self, DecodedField, DecodedRecord, Options},
    schema::Catalog,
};
use clap::Parser;
use tracing::{Level, error};

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate the structure of ASTERIX record files", long_about = None)]
struct Args {
    /// ASTERIX record files to validate
    #[arg(value_name = "ASTERIX BLOB", required = true)]
    blobs: Vec<PathBuf>,

    /// Directory holding `cat_<N>.json` profile documents
    #[arg(long, default_value = "UAPs")]
    uaps: PathBuf,

    /// Tolerate trailing bytes after the last item
    #[arg(long)]
    lenient: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    // Profiles that fail to load are logged and skipped; only records of
    // their category fail.
    let catalog = match Catalog::load_dir(&args.uaps) {
        Ok((catalog, _)) => catalog,
        Err(err) => {
            error!(dir = %args.uaps.display(), "{err}");
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        exact_length: !args.lenient,
    };

    let mut failed = 0;
    for blob in &args.blobs {
        if !validate(blob, &catalog, options) {
            failed += 1;
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failed} of {} files failed validation", args.blobs.len());
        ExitCode::FAILURE
    }
}

fn validate(path: &Path, catalog: &Catalog, options: Options) -> bool {
    println!("{}:", path.display());

    // Fields decoded before a failure are still reported.
    let mut record = DecodedRecord::default();
    let result = avec::file::decode_with(path, catalog, &mut record, options);

    for item in &record.items {
        println!("Item {} defined in FSPEC", item.name);
        print_field(item, 1);
    }

    match result {
        Ok(position) if position < record.length => {
            println!(
                "Stream position {position} short of total blob size of {} -> Structure accepted",
                record.length
            );
            true
        }
        Ok(position) => {
            println!(
                "Stream position {position} matching total blob size of {} -> Structure valid",
                record.length
            );
            true
        }
        Err(err) => {
            println!("{err}");
            false
        }
    }
}

fn print_field(field: &DecodedField, depth: usize) {
    let indent = "   ".repeat(depth);

    println!(
        "{indent}{} at {}, {} bytes: {}",
        field.kind,
        field.offset,
        field.data.len(),
        hex(&field.data)
    );

    for subfield in &field.subfields {
        println!("{indent}Subfield {} defined in primary subfield", subfield.name);
        print_field(subfield, depth + 1);
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
