//! Compiles every description in `machines/` into `OUT_DIR`.

use std::error::Error;
use std::path::PathBuf;

use fsmgen_codegen::compiler::discover;
use fsmgen_codegen::{CompileOptions, Compiler, Parser};

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let machines = manifest_dir.join("machines");

    println!("cargo::rerun-if-changed={}", machines.display());

    let compiler = Compiler::new(CompileOptions {
        output_dir: out_dir,
        ..Default::default()
    });
    let parser = Parser::new();

    for input in discover(&machines)? {
        println!("cargo::rerun-if-changed={}", input.display());

        let desc = parser.parse_file(&input)?;
        let source = compiler.compile_description(&desc)?;
        std::fs::write(compiler.output_path_for(&input), source)?;
    }

    Ok(())
}

