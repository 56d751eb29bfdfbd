//! luvion-drv - compiler driver.
//!
//! Orchestrates the pipeline a single invocation runs end to end: read the
//! source file, lex and parse it into an AST (`luvion-lex`/`luvion-par`),
//! run semantic preparation (`luvion-sem`), then emit x86-64 assembly text
//! (`luvion-gen`) to the requested output path. Diagnostics collected along
//! the way are printed through the shared [`luvion_util::Handler`]; a
//! non-empty diagnostic set fails the compilation without panicking.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;

use luvion_par::Parser;
use luvion_sem::prepare_module;
use luvion_util::Handler;

/// Compiles one `.lv` source file to x86-64 assembly text.
#[derive(Debug, ClapParser)]
#[command(name = "luvion", about = "Compiles a Luvion source file to x86-64 assembly")]
pub struct Cli {
    /// Source file to compile.
    pub input: PathBuf,

    /// Output assembly path. Defaults to the input file with a `.s` extension.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Print the token stream instead of compiling.
    #[arg(long)]
    pub emit_tokens: bool,

    /// Print the parsed AST instead of compiling.
    #[arg(long)]
    pub emit_ast: bool,

    /// Print progress between pipeline stages.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.input.with_extension("s"),
        }
    }
}

/// Runs the pipeline described by `cli`, returning an error for IO failures
/// or a non-empty diagnostic set. This is the entry point both the binary
/// and the integration tests call.
pub fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let filename = cli.input.display().to_string();

    let handler = Handler::new();

    if cli.emit_tokens {
        let lexer_handler = Handler::new();
        let mut lexer = luvion_lex::Lexer::new(&source, &lexer_handler);
        loop {
            let tok = lexer.next_token();
            if tok == luvion_lex::Token::Eof {
                break;
            }
            println!("{:?}", tok);
        }
        return report(&lexer_handler);
    }

    if cli.verbose {
        eprintln!("parsing {}", filename);
    }
    let mut parser = Parser::new(&source, &handler);
    let module = parser.parse_module(&filename);

    if cli.emit_ast {
        println!("{:#?}", module);
        return report(&handler);
    }

    if cli.verbose {
        eprintln!("preparing {}", filename);
    }
    let prepared = prepare_module(&module, &mut parser.symbols, &handler);

    if handler.has_errors() {
        return report(&handler);
    }

    if cli.verbose {
        eprintln!("generating code for {}", filename);
    }
    let asm = luvion_gen::generate_module(&module, &prepared, &mut parser.symbols)?;

    let output = cli.output_path();
    fs::write(&output, asm).with_context(|| format!("writing {}", output.display()))?;
    if cli.verbose {
        eprintln!("wrote {}", output.display());
    }

    report(&handler)
}

fn report(handler: &Handler) -> Result<()> {
    if handler.has_errors() {
        bail!("compilation failed");
    }
    Ok(())
}
