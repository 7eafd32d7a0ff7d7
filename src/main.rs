use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::LevelFilter;

use casl2asm::assemble;

/// Assembles a CASL2 source file into its COMET-II word listing.
#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Cli
{
	/// Path to the source file, or `-` to read from stdin.
	input: PathBuf,

	/// Write the listing here instead of stdout.
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Repeat for more detail: -v warnings, -vv info, -vvv debug/trace.
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn level_for(verbose: u8) -> LevelFilter
{
	match verbose
	{
		0 => LevelFilter::Error,
		1 => LevelFilter::Warn,
		2 => LevelFilter::Info,
		3 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

fn read_source(input: &PathBuf) -> io::Result<String>
{
	if input.as_os_str() == "-"
	{
		let mut buf = String::new();
		io::stdin().read_to_string(&mut buf)?;
		Ok(buf)
	}
	else
	{
		fs::read_to_string(input)
	}
}

fn main() -> ExitCode
{
	let cli = Cli::parse();
	simple_logger::SimpleLogger::new().with_level(level_for(cli.verbose)).init().unwrap();

	let source = match read_source(&cli.input)
	{
		Ok(source) => source,
		Err(err) =>
		{
			eprintln!("error: cannot read {}: {}", cli.input.display(), err);
			return ExitCode::FAILURE;
		},
	};

	match assemble(&source)
	{
		Ok(output) =>
		{
			for warning in &output.warnings
			{
				eprintln!("{}", warning);
			}

			let mut listing = String::new();

			for record in &output.records
			{
				listing.push_str(&format!("{:04X}: {:04X}\n", record.addr, record.code));
			}

			match cli.output
			{
				Some(path) =>
				{
					if let Err(err) = fs::write(&path, listing)
					{
						eprintln!("error: cannot write {}: {}", path.display(), err);
						return ExitCode::FAILURE;
					}
				},
				None => print!("{}", listing),
			}

			ExitCode::SUCCESS
		},
		Err(errors) =>
		{
			for error in &errors
			{
				eprintln!("{}", error);
			}

			ExitCode::FAILURE
		},
	}
}
