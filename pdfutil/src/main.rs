use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use pdfcos::{Document, EncryptionLevel, EncryptionSettings, SaveOptions};

#[derive(Parser)]
#[command(name = "pdfutil", version, about = "PDF utility program using the pdfcos library")]
struct Cli {
    #[arg(short, long, value_name = "input file", global = true)]
    input: Option<PathBuf>,

    #[arg(short, long, value_name = "output file", global = true)]
    output: Option<PathBuf>,

    /// Password of an encrypted input file
    #[arg(short, long, global = true, default_value = "")]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print version, object count, trailer and encryption status
    Info,
    /// Print one object
    Show {
        #[arg(long)]
        id: u32,
        #[arg(long = "gen", default_value_t = 0)]
        generation: u16,
    },
    /// Save the document again
    Rewrite {
        /// Indented output with comments and statistics
        #[arg(long)]
        verbose: bool,
        /// Compress unfiltered streams
        #[arg(long)]
        compress: bool,
    },
    /// Save the document encrypted with the standard security handler
    Encrypt {
        #[arg(long)]
        owner: String,
        #[arg(long, default_value = "")]
        user: String,
        /// 128-bit key instead of 40-bit
        #[arg(long)]
        strong: bool,
    },
    /// Save the document without encryption
    Decrypt,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let input = cli.input.ok_or("missing --input")?;
    info!("open {}", input.display());
    let mut doc = Document::load_with_password(&input, &cli.password)?;

    match cli.command {
        Command::Info => print_info(&mut doc),
        Command::Show { id, generation } => {
            let object = doc.get_or_resolve((id, generation))?;
            println!("{:?}", object);
            Ok(())
        }
        Command::Rewrite { verbose, compress } => {
            let options = SaveOptions::builder()
                .verbose(verbose)
                .compress_streams(compress)
                .build();
            save(&mut doc, cli.output, &options)
        }
        Command::Encrypt { owner, user, strong } => {
            let level = if strong {
                EncryptionLevel::Rc4_128
            } else {
                EncryptionLevel::Rc4_40
            };
            let settings = EncryptionSettings::new(owner, user).with_level(level);
            let options = SaveOptions::builder().encryption(settings).build();
            save(&mut doc, cli.output, &options)
        }
        Command::Decrypt => {
            doc.decrypt()?;
            save(&mut doc, cli.output, &SaveOptions::default())
        }
    }
}

fn print_info(doc: &mut Document) -> Result<(), Box<dyn Error>> {
    println!("Version: {}", doc.version);
    println!("Objects: {}", doc.reference_table.len());
    match doc.page_count() {
        Ok(count) => println!("Pages: {}", count),
        Err(_) => println!("Pages: unknown"),
    }
    println!("Trailer: {:?}", doc.trailer);
    match doc.security_handler() {
        Some(handler) => println!(
            "Encryption: revision {}, {}-bit key, opened with {:?}, permissions {:?}",
            handler.revision(),
            handler.key_length() * 8,
            handler.validity(),
            handler.permissions()
        ),
        None => println!("Encryption: none"),
    }
    Ok(())
}

fn save(doc: &mut Document, output: Option<PathBuf>, options: &SaveOptions) -> Result<(), Box<dyn Error>> {
    let output = output.ok_or("missing --output")?;
    info!("save to {}", output.display());
    let mut file = BufWriter::new(File::create(&output)?);
    doc.save_with_options(&mut file, options)?;
    Ok(())
}
