use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pictdb::header::MAX_PIC_ID;
use pictdb::{Container, CreateConfig, Error, JpegImageEngine, Resolution, Sha256Engine};

const DEFAULT_MAX_FILES: u32 = 10;
const DEFAULT_THUMB_RES: (u16, u16) = (64, 64);
const DEFAULT_SMALL_RES: (u16, u16) = (256, 256);

#[derive(Debug, Parser)]
#[clap(name = "pictdb", about = "An embedded JPEG image database")]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new, empty database.
    Create {
        file: PathBuf,
        #[clap(long = "max_files")]
        max_files: Option<u32>,
        #[clap(long = "thumb_res", number_of_values = 2)]
        thumb_res: Option<Vec<u16>>,
        #[clap(long = "small_res", number_of_values = 2)]
        small_res: Option<Vec<u16>>,
    },
    /// List the pictures in a database.
    List { file: PathBuf },
    /// Insert a JPEG file under a picture id.
    Insert { file: PathBuf, id: String, path: PathBuf },
    /// Read a picture out of a database, writing it to `<id>_<suffix>.jpg`.
    Read {
        file: PathBuf,
        id: String,
        #[clap(default_value = "original")]
        res: String,
    },
    /// Delete a picture by id.
    Delete { file: PathBuf, id: String },
    /// Compact a database, reclaiming space from deleted pictures.
    Gc { file: PathBuf, tmp_file: PathBuf },
}

fn main() -> ExitCode
{
    env_logger::init();

    let args = Args::parse();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.as_code() as u8)
        }
    }
}

fn run(command: Command) -> pictdb::Result<()>
{
    let digest = Sha256Engine;
    let image = JpegImageEngine;

    match command {
        Command::Create { file, max_files, thumb_res, small_res } => {
            let config = CreateConfig {
                max_files: max_files.unwrap_or(DEFAULT_MAX_FILES),
                thumb_res: pair_or(thumb_res, DEFAULT_THUMB_RES)?,
                small_res: pair_or(small_res, DEFAULT_SMALL_RES)?,
            };

            Container::create_from_config(&file, &config)?;

            println!("new database '{}' created", file.display());

            Ok(())
        }

        Command::List { file } => {
            let container = Container::open(&file)?;
            print!("{}", pictdb::list::format_stdout(&container));

            Ok(())
        }

        Command::Insert { file, id, path } => {
            check_pic_id(&id)?;

            let mut container = Container::open(&file)?;
            let bytes = fs::read(&path)?;

            pictdb::insert(&mut container, &digest, &image, &bytes, &id)?;

            println!("'{}' inserted", id);

            Ok(())
        }

        Command::Read { file, id, res } => {
            let mut container = Container::open(&file)?;
            let resolution = Resolution::from_name(&res)?;

            let bytes = pictdb::read(&mut container, &image, &id, resolution)?;

            let out_path = format!("{}_{}.jpg", id, resolution.suffix());
            fs::write(&out_path, &bytes)?;

            println!("wrote {}", out_path);

            Ok(())
        }

        Command::Delete { file, id } => {
            let mut container = Container::open(&file)?;
            pictdb::delete(&mut container, &id)?;

            println!("'{}' deleted", id);

            Ok(())
        }

        Command::Gc { file, tmp_file } => {
            pictdb::compact::compact(&file, &tmp_file, &digest, &image)?;

            println!("database compacted");

            Ok(())
        }
    }
}

fn pair_or(values: Option<Vec<u16>>, default: (u16, u16)) -> pictdb::Result<(u16, u16)>
{
    match values {
        None => Ok(default),
        Some(v) if v.len() == 2 => Ok((v[0], v[1])),
        Some(_) => Err(Error::InvalidArgument),
    }
}

/// The CLI's own precheck before calling into the core, mirroring
/// `pictDBM.c`'s length check ahead of `do_insert`. The core's
/// `set_pict_id` itself truncates unconditionally and never fails.
fn check_pic_id(id: &str) -> pictdb::Result<()>
{
    if id.is_empty() || id.len() > MAX_PIC_ID {
        return Err(Error::InvalidPicId);
    }

    Ok(())
}
