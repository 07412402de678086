use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use ssr_buffer::{prelude, stringify, Segment, SourceBuffer, SourceExpr, Value};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ssr-buffer compile [--version-stamp <id>] [--bare] [--out <path>]\n       ssr-buffer stringify";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompileInput {
    segments: Vec<Segment<String>>,
    #[serde(default)]
    data_access: Option<String>,
}

#[derive(Debug, Default)]
struct CompileArgs {
    version_stamp: Option<String>,
    bare: bool,
    out: Option<PathBuf>,
}

#[derive(Debug)]
enum Command {
    Compile(CompileArgs),
    Stringify,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("[ssr-buffer] {:#}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let command = parse_args(env::args().skip(1))?;

    let mut stdin_payload = String::new();
    io::stdin()
        .read_to_string(&mut stdin_payload)
        .context("failed to read stdin")?;

    if stdin_payload.trim().is_empty() {
        bail!("stdin payload is empty");
    }

    match command {
        Command::Compile(args) => compile(&stdin_payload, args),
        Command::Stringify => {
            let json: serde_json::Value =
                serde_json::from_str(&stdin_payload).context("invalid input JSON")?;
            let literal = stringify::any(&Value::from(json))?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", literal).context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let command = args
        .next()
        .ok_or_else(|| anyhow!("missing command\n{}", USAGE))?;

    match command.as_str() {
        "compile" => {
            let mut parsed = CompileArgs::default();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--version-stamp" => {
                        let value = args
                            .next()
                            .ok_or_else(|| anyhow!("missing value for --version-stamp"))?;
                        parsed.version_stamp = Some(value);
                    }
                    "--out" => {
                        let value = args
                            .next()
                            .ok_or_else(|| anyhow!("missing value for --out"))?;
                        parsed.out = Some(PathBuf::from(value));
                    }
                    "--bare" => parsed.bare = true,
                    _ => bail!("unknown argument '{}'\n{}", arg, USAGE),
                }
            }
            Ok(Command::Compile(parsed))
        }
        "stringify" => match args.next() {
            Some(arg) => bail!("unknown argument '{}'\n{}", arg, USAGE),
            None => Ok(Command::Stringify),
        },
        _ => bail!("unknown command '{}'\n{}", command, USAGE),
    }
}

fn compile(payload: &str, args: CompileArgs) -> Result<()> {
    let input: CompileInput = serde_json::from_str(payload).context("invalid input JSON")?;

    let compiler = match input.data_access {
        Some(access) => SourceExpr::new(access),
        None => SourceExpr::default(),
    };

    let mut buffer = SourceBuffer::new();
    if !args.bare {
        buffer.append_renderer_start();
    }
    for segment in input.segments {
        match segment {
            Segment::RawCode { text } => buffer.append_raw(text),
            Segment::JoinRawCode { text } => buffer.append_join_raw(text),
            Segment::JoinLiteral { text } => buffer.append_literal(text),
            Segment::JoinDataSerialization => buffer.append_data_serialization(),
            Segment::JoinExpression { expr } => buffer.append_expression(expr),
        }
    }
    if !args.bare {
        buffer.append_renderer_end();
    }

    let mut code = buffer
        .linearize(&compiler)
        .context("failed to linearize segments")?;

    if let Some(version) = &args.version_stamp {
        code = prelude::stamp_version(&code, version)?;
    }

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output dir '{}'", parent.display())
                })?;
            }
            fs::write(path, &code)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", code).context("failed to write stdout")?;
        }
    }

    Ok(())
}
