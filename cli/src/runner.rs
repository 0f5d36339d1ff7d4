use crate::argparse::Cli;
use crate::CliError;
use anyhow::{Context, Result};
use cohql_redis::{Config, FieldTypeRegistry, Translator};
use std::io::{BufRead, Write};

/// Split a `NAME=TYPE` field override into its name and type name.
pub fn split_field_spec(spec: &str) -> Result<(&str, &str), CliError> {
    let (name, type_name) = spec
        .split_once('=')
        .ok_or_else(|| CliError::InvalidFieldSpec(spec.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidFieldSpec(spec.to_string()));
    }
    Ok((name, type_name))
}

/// Registry built from `--field NAME=TYPE` overrides.
pub fn field_overrides(specs: &[String]) -> Result<FieldTypeRegistry, CliError> {
    let pairs = specs
        .iter()
        .map(|spec| split_field_spec(spec))
        .collect::<Result<Vec<_>, CliError>>()?;
    FieldTypeRegistry::from_type_names(pairs).map_err(CliError::InvalidFieldType)
}

/// Config file (if any), then `--field` overrides, then flag overrides.
pub fn build_translator(cli: &Cli) -> Result<Translator, CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).map_err(CliError::ConfigLoad)?,
        None => Config::default(),
    };

    let overrides = field_overrides(&cli.fields)?;
    config.fields = config.fields.merged(overrides);

    if cli.coalesce {
        config.options.coalesce_tag_ors = true;
    }
    if cli.keep_parens {
        config.options.strip_redundant_parens = false;
    }

    if config.fields.is_empty() {
        log::warn!("No field types registered; only IS NULL and BETWEEN conditions will translate");
    }
    for (name, field_type) in config.fields.entries() {
        log::debug!("Field {} -> {}", name, field_type);
    }
    Ok(config.translator())
}

/// Translate each query, writing results to `out` and failures to `err`.
/// Returns the number of queries that failed.
pub fn translate_all<'a, I, W, E>(
    translator: &Translator,
    queries: I,
    out: &mut W,
    err: &mut E,
) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
    W: Write,
    E: Write,
{
    let mut failures = 0;
    for query in queries {
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        log::debug!("Input: {}", query);
        match translator.translate_str(query) {
            Ok(translated) => {
                log::debug!("Output: {}", translated);
                writeln!(out, "{}", translated).context("Failed to write output")?;
            }
            Err(e) => {
                failures += 1;
                writeln!(err, "Error: {}: {}", query, e).context("Failed to write error")?;
            }
        }
    }
    Ok(failures)
}

/// Translate one condition per line of `input`.
pub fn translate_lines<R, W, E>(
    translator: &Translator,
    input: R,
    out: &mut W,
    err: &mut E,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let lines = input
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .context("Failed to read queries from stdin")?;
    translate_all(translator, lines.iter().map(String::as_str), out, err)
}

pub fn run(cli: &Cli) -> Result<usize> {
    let translator = build_translator(cli)?;
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    if cli.queries.is_empty() {
        let stdin = std::io::stdin();
        translate_lines(&translator, stdin.lock(), &mut out, &mut err)
    } else {
        translate_all(
            &translator,
            cli.queries.iter().map(String::as_str),
            &mut out,
            &mut err,
        )
    }
}
