use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cohql2redis",
    about = "Translate SQL-style filter conditions into RediSearch queries",
    version
)]
pub struct Cli {
    /// YAML or JSON file with `fields` (name -> TEXT/TAG/NUMERIC) and `options`
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Register or override a field type, e.g. --field role=TAG
    #[arg(long = "field", short = 'f', value_name = "NAME=TYPE")]
    pub fields: Vec<String>,

    /// Merge same-field tag alternatives into one {a,b} clause
    #[arg(long)]
    pub coalesce: bool,

    /// Keep parentheses that wrap the whole query
    #[arg(long)]
    pub keep_parens: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Conditions to translate; read one per line from stdin when omitted
    pub queries: Vec<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
