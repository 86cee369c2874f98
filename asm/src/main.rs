mod config;

use arch::OpTable;
use asm::{
    msg::{self, Msg},
    util, Encoder, Options, Progress,
};
use color_print::cprintln;
use config::{preprocessed_path, Config};
use prom::{codec, Blueprint};
use std::error::Error as _;
use thiserror::Error;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file [default: input.fal]
    input: Option<String>,

    /// Output file for the blueprint string [default: output.txt]
    #[clap(short, long)]
    output: Option<String>,

    /// Write the preprocessed listing, to PATH if given as `-p=PATH`
    #[clap(short, long, value_name = "PATH", require_equals = true, num_args = 0..=1)]
    preprocessed: Option<Option<String>>,

    /// YAML file with default settings
    #[clap(short, long)]
    config: Option<String>,

    /// Append HLTG after the last instruction
    #[clap(long)]
    append_halt: bool,

    /// Blueprint label [default: "Program - PROM"]
    #[clap(long)]
    label: Option<String>,

    /// Dump instructions with their signals
    #[clap(short, long)]
    dump: bool,

    /// Print the opcode table and exit
    #[clap(long)]
    opcodes: bool,

    /// Decode a blueprint string file, print its JSON and exit
    #[clap(long, value_name = "FILE")]
    import: Option<String>,
}

impl Args {
    fn overrides(&self) -> Config {
        Config {
            input: self.input.clone(),
            output: self.output.clone(),
            preprocessed: self.preprocessed.clone().flatten(),
            label: self.label.clone(),
            append_halt: self.append_halt.then_some(true),
            dump: self.dump.then_some(true),
        }
    }
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("{1}")]
    Asm(String, asm::Error),

    #[error(transparent)]
    Prom(#[from] prom::Error),
}

impl AppError {
    fn diag(&self) {
        match self {
            AppError::Asm(file, err) => err.diag(file),
            other => {
                let mut text = other.to_string();
                let mut source = other.source();
                while let Some(err) = source {
                    text += &format!(": {}", err);
                    source = err.source();
                }
                Msg::Error(None, text).print("", None);
            }
        }
    }
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    let result = if args.opcodes {
        println!("{}", OpTable::standard().listing());
        Ok(())
    } else if let Some(path) = &args.import {
        import(path)
    } else {
        run(&args)
    };
    if let Err(err) = result {
        err.diag();
        std::process::exit(1);
    }
}

fn read(path: &str) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|e| AppError::FileOpen(path.to_string(), e))
}

fn write(path: &str, text: &str) -> Result<(), AppError> {
    std::fs::write(path, text).map_err(|e| AppError::FileWrite(path.to_string(), e))
}

fn import(path: &str) -> Result<(), AppError> {
    let (version, json) = codec::decode(&read(path)?)?;
    if version != codec::VERSION {
        Msg::Warn(format!("Unknown blueprint version `{}`", version)).print(path, None);
    }
    println!("{}", json);
    Ok(())
}

fn run(args: &Args) -> Result<(), AppError> {
    let file_cfg = match &args.config {
        Some(path) => {
            Config::from_yaml(&read(path)?).map_err(|e| AppError::Config(path.clone(), e))?
        }
        None => Config::default(),
    };
    let cfg = file_cfg.overlay(args.overrides());
    let input = cfg.input();
    let opts = Options {
        append_halt: cfg.append_halt(),
    };
    let fail = |err: asm::Error| AppError::Asm(input.to_string(), err);

    cprintln!("<s>PROM Assembler</>");

    msg::step(1, "Read File");
    println!("  < {}", input);
    let code = read(input)?;

    let (insts, warning) = asm::preprocess_with(&code, &opts, |progress| match progress {
        Progress::Tokenized { lines } => {
            msg::step(2, "Tokenize");
            msg::detail(&format!("{} lines", lines));
        }
        Progress::Expanded { lines } => {
            msg::step(3, "Expand Macros");
            msg::detail(&format!("{} lines", lines));
        }
        Progress::Substituted { lines } => {
            msg::step(4, "Apply Definitions");
            msg::detail(&format!("{} lines", lines));
        }
        Progress::Resolved {
            labels,
            instructions,
        } => {
            msg::step(5, "Resolve Labels");
            msg::detail(&format!("{} labels, {} instructions", labels, instructions));
        }
    })
    .map_err(fail)?;
    if let Some(warning) = warning {
        warning.diag(input);
    }
    let preprocessed = match (&args.preprocessed, &cfg.preprocessed) {
        (Some(None), None) => Some(preprocessed_path(input)),
        (_, path) => path.clone(),
    };
    if let Some(path) = &preprocessed {
        println!("  > {}", path);
        write(path, &util::listing(&insts))?;
    }

    msg::step(6, "Encode Instructions");
    let signals = Encoder::new(OpTable::standard())
        .encode_all(&insts)
        .map_err(fail)?;

    msg::step(7, "Generate Blueprint");
    let bp = Blueprint::rom(cfg.label(), &signals)?;
    msg::detail(&format!("{}: {} entities", bp.label(), bp.entities().len()));
    let text = codec::encode(&bp.to_json()?)?;
    let output = cfg.output();
    println!("  > {}", output);
    write(output, &format!("{}\n", text))?;

    if cfg!(windows) {
        // best effort
        let _ = std::process::Command::new("cmd")
            .args(["/C", &format!("clip < {}", output)])
            .status();
    }

    if cfg.dump() {
        util::print_dump(&insts, &signals);
    }
    Ok(())
}
