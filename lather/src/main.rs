use std::{fs, path::PathBuf};

use structopt::StructOpt;
use thiserror::Error;

use lather_codegen as codegen;
use lather_codegen::ArtifactKind;
use lather_wsdl as wsdl;

#[derive(Debug, Error)]
enum Error {
    #[error("Error loading WSDL")]
    Load(#[from] wsdl::error::Error),

    #[error("Error interpreting WSDL")]
    Interpret(#[from] codegen::Error),

    #[error("Error")]
    Io(#[from] std::io::Error),

    #[error("Generated artifact {0} did not parse as Rust")]
    Render(String),

    #[error("No artifacts could be written")]
    NoOutput,
}

#[derive(StructOpt)]
struct Args {
    /// Directory to write generated sources into.
    #[structopt(short, long, default_value = "./generated")]
    output: PathBuf,

    /// Print progress while loading and generating.
    #[structopt(short, long)]
    verbose: bool,

    input: String,
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    if args.verbose {
        println!("loading wsdl: {}", args.input);
    }

    let document = wsdl::parse(&args.input)?;

    if args.verbose {
        println!(
            "interpreting {} classes, {} services",
            document.classes.len(),
            document.services.len()
        );
    }

    let artifacts = codegen::interpret(&document)?;

    fs::create_dir_all(args.output.join("classes"))?;

    let mut written = 0usize;
    for artifact in &artifacts {
        let file = syn::parse2::<syn::File>(artifact.tokens.clone())
            .map_err(|_| Error::Render(artifact.name.clone()))?;
        let rendered = prettyplease::unparse(&file);

        let path = match artifact.kind {
            ArtifactKind::Class => args
                .output
                .join("classes")
                .join(format!("{}.rs", artifact.name)),
            ArtifactKind::Service => args.output.join(format!("{}.rs", artifact.name)),
        };

        if args.verbose {
            println!("writing {}", path.display());
        }

        fs::write(&path, rendered)?;
        written += 1;
    }

    if written == 0 {
        return Err(Error::NoOutput);
    }

    Ok(())
}
