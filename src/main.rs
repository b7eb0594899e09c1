//! Command-line interface for xmlmapper

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xmlmapper::{SerializerConfig, Value, XmlMapper};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmlmapper")]
#[command(author, version, about = "Generate XML shaped after an example or an XSD", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Path to an XML example document
    #[arg(short, long, value_name = "FILE")]
    example: Option<PathBuf>,

    /// Path to an XSD schema document
    #[arg(short = 's', long, value_name = "FILE")]
    xsd: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the field schema inferred from the source document
    Fields {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print a sample JSON input matching the inferred fields
    Template {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Generate XML from a JSON input file
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Path to the JSON input
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Write everything on one line without declaration
        #[arg(short, long)]
        compact: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fields { source, pretty } => cmd_fields(source, pretty),
        Commands::Template { source } => cmd_template(source),
        Commands::Generate {
            source,
            input,
            compact,
            output,
        } => cmd_generate(source, input, compact, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_mapper(source: &SourceArgs) -> Result<XmlMapper, Box<dyn std::error::Error>> {
    match (&source.example, &source.xsd) {
        (Some(path), _) => Ok(XmlMapper::from_example(&fs::read_to_string(path)?)?),
        (None, Some(path)) => Ok(XmlMapper::from_schema(&fs::read_to_string(path)?)?),
        (None, None) => Err("one of --example or --xsd is required".into()),
    }
}

#[cfg(feature = "cli")]
fn cmd_fields(source: SourceArgs, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mapper = load_mapper(&source)?;

    let json_str = if pretty {
        serde_json::to_string_pretty(mapper.fields())?
    } else {
        serde_json::to_string(mapper.fields())?
    };
    println!("{}", json_str);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_template(source: SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mapper = load_mapper(&source)?;
    println!("{}", serde_json::to_string_pretty(&mapper.template())?);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_generate(
    source: SourceArgs,
    input: PathBuf,
    compact: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mapper = load_mapper(&source)?;
    if compact {
        mapper = mapper.with_serializer_config(SerializerConfig::new());
    }

    let value = Value::from_json(&fs::read_to_string(&input)?)?;
    let result = mapper.generate(&value)?;

    if let Some(output_path) = output {
        fs::write(output_path, &result.xml_output)?;
    } else {
        println!("{}", result.xml_output);
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
