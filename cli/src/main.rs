use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Once;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use nv_core::{
    compile_source, interpret_source,
    token::Tokenizer,
    vm::{Vm, disassemble},
};

#[cfg(test)]
mod main_test;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "nv_core=debug,nv::vm=debug,nv::interp=debug,nv_cli=info";

#[derive(Debug, Parser)]
#[command(
    name = "nv",
    author,
    version,
    about = "Compile nv programs to stack bytecode and run them",
    long_about = None
)]
struct CliArgs {
    /// Subcommands like `compile FILE`
    #[command(subcommand)]
    command: Option<Commands>,

    /// If no subcommand, treat as a source file to compile and run
    #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
    file: Option<PathBuf>,

    /// Skip constant folding before compiling
    #[arg(long)]
    no_opt: bool,

    /// Walk the syntax tree instead of compiling to bytecode (runs `for` loops)
    #[arg(long)]
    interp: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpKind {
    Tokens,
    Ast,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a source file and print the instruction listing.
    Compile {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
        /// Listing format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Skip constant folding before compiling
        #[arg(long)]
        no_opt: bool,
    },
    /// Print the token stream or syntax tree of a source file.
    Dump {
        #[arg(value_enum)]
        what: DumpKind,
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
        /// Emit JSON instead of the human-readable form
        #[arg(long)]
        json: bool,
    },
}

fn read_file_content(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path.display()))
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow::anyhow!(
                "Parent directory components ('..') are not allowed in file paths."
            ));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Install a stderr subscriber when `NV_TRACE` is set. Program output goes to
/// stdout, so traces never interleave with it.
fn maybe_init_tracing() {
    let raw = match std::env::var("NV_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn debug_bytecode_enabled() -> bool {
    std::env::var("NV_DEBUG_BYTECODE").is_ok_and(|v| env_toggle_enabled(&v))
}

fn run_file(path: &Path, optimize: bool) -> anyhow::Result<()> {
    let src = read_file_content(path)?;
    let code = compile_source(&src, optimize)?;
    if debug_bytecode_enabled() {
        eprintln!("-- bytecode for {} --", path.display());
        eprint!("{}", disassemble(&code));
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut vm = Vm::new(&code)?;
    vm.run(&mut out)?;
    Ok(())
}

fn interpret_file(path: &Path, optimize: bool) -> anyhow::Result<()> {
    let src = read_file_content(path)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    interpret_source(&src, optimize, &mut out)
}

fn compile_file(path: &Path, format: OutputFormat, optimize: bool) -> anyhow::Result<()> {
    let src = read_file_content(path)?;
    let code = compile_source(&src, optimize)?;
    let listing = match format {
        OutputFormat::Text => disassemble(&code),
        OutputFormat::Json => serde_json::to_string_pretty(&code).context("serialize bytecode")? + "\n",
    };
    write_stdout(&listing)
}

fn dump_file(path: &Path, what: DumpKind, json: bool) -> anyhow::Result<()> {
    let src = read_file_content(path)?;
    let tokens = Tokenizer::tokenize(&src)?;
    let text = match (what, json) {
        (DumpKind::Tokens, false) => tokens.iter().map(|t| format!("{t}\n")).collect::<String>(),
        (DumpKind::Tokens, true) => serde_json::to_string_pretty(&tokens).context("serialize tokens")? + "\n",
        (DumpKind::Ast, json) => {
            let program = nv_core::ast::parse_tokens(&tokens)?;
            if json {
                serde_json::to_string_pretty(&program).context("serialize syntax tree")? + "\n"
            } else {
                format!("{program:#?}\n")
            }
        }
    };
    write_stdout(&text)
}

fn write_stdout(text: &str) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes()).context("write to stdout")?;
    out.flush().context("flush stdout")
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs {
        command,
        file,
        no_opt,
        interp,
    } = CliArgs::parse();

    match (command, file) {
        (Some(Commands::Compile { file, format, no_opt }), _) => compile_file(&file, format, !no_opt),
        (Some(Commands::Dump { what, file, json }), _) => dump_file(&file, what, json),
        (None, Some(file)) if interp => interpret_file(&file, !no_opt),
        (None, Some(file)) => run_file(&file, !no_opt),
        (None, None) => {
            CliArgs::command().print_help().context("print help")?;
            Ok(())
        }
    }
}
