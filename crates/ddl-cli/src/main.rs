use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use ddl_ast::Statement;
use ddl_error::{DdlError, Result};
use ddl_parser::{try_parse_ddl, ParseOptions};
use serde::Deserialize;
use tracing::{debug, info};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    #[default]
    Json,
    Ddl,
}

/// Contents of the `--config` file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CliConfig {
    parse: ParseOptions,
    log_level: String,
    output: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            log_level: String::from(DEFAULT_LOG_LEVEL),
            output: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliOptions {
    input_path: Option<String>,
    command: Option<String>,
    config_path: Option<String>,
    output: Option<OutputFormat>,
    log_level: Option<String>,
    pretty: bool,
    strict: bool,
    show_help: bool,
}

fn main() {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let exit_code = run(std::env::args_os(), &mut input, &mut stdout, &mut stderr);
    drop(input);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run<I, R, W, E>(args: I, input: &mut R, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if options.show_help {
        if write_usage(out).is_err() {
            return 1;
        }
        return 0;
    }

    match execute(&options, input, out) {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(err, "error: {error}");
            if error.is_user_recoverable() {
                if let Some(hint) = error.suggestion() {
                    let _ = writeln!(err, "hint: {hint}");
                }
            }
            error.exit_code()
        }
    }
}

fn execute<R, W>(options: &CliOptions, input: &mut R, out: &mut W) -> Result<()>
where
    R: Read,
    W: Write,
{
    let mut config = match options.config_path.as_deref() {
        Some(path) => load_config(Path::new(path))?,
        None => CliConfig::default(),
    };
    if let Some(level) = &options.log_level {
        config.log_level.clone_from(level);
    }
    if let Some(output) = options.output {
        config.output = output;
    }
    if options.strict {
        config.parse.strict_lexing = true;
    }
    init_tracing(&config.log_level);

    let sql = read_sql(options, input)?;
    let statements = try_parse_ddl(&sql, &config.parse)?;
    info!(
        statements = statements.len(),
        output = ?config.output,
        "parsed DDL input"
    );

    match config.output {
        OutputFormat::Json => write_json(&statements, options.pretty, out),
        OutputFormat::Ddl => write_ddl(&statements, out),
    }
}

// RUST_LOG wins over the configured level. A second call is a no-op.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_lowercase())),
        )
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn load_config(path: &Path) -> Result<CliConfig> {
    let contents = fs::read_to_string(path).map_err(|source| DdlError::ConfigUnreadable {
        path: PathBuf::from(path),
        source,
    })?;
    let config: CliConfig = serde_json::from_str(&contents)
        .map_err(|error| DdlError::config(format!("{}: {error}", path.display())))?;
    debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

fn read_sql<R>(options: &CliOptions, input: &mut R) -> Result<String>
where
    R: Read,
{
    if let Some(command) = &options.command {
        return Ok(command.clone());
    }
    match options.input_path.as_deref() {
        Some(path) if path != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut sql = String::new();
            input.read_to_string(&mut sql)?;
            Ok(sql)
        }
    }
}

fn write_json<W>(statements: &[Statement], pretty: bool, out: &mut W) -> Result<()>
where
    W: Write,
{
    let rendered = if pretty {
        serde_json::to_string_pretty(statements)
    } else {
        serde_json::to_string(statements)
    }
    .map_err(|error| DdlError::json(error.to_string()))?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

fn write_ddl<W>(statements: &[Statement], out: &mut W) -> Result<()>
where
    W: Write,
{
    for statement in statements {
        writeln!(out, "{statement};")?;
    }
    Ok(())
}

fn parse_args<I>(args: I) -> std::result::Result<CliOptions, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let _argv0 = iter.next();

    let mut options = CliOptions::default();

    while let Some(argument) = iter.next() {
        let arg = argument.to_string_lossy();
        let arg_str = arg.as_ref();

        match arg_str {
            "-h" | "--help" => options.show_help = true,
            "--pretty" => options.pretty = true,
            "--strict" => options.strict = true,
            "--ddl" => set_output(&mut options, OutputFormat::Ddl)?,
            "--json" => set_output(&mut options, OutputFormat::Json)?,
            "-c" | "--command" => {
                let next = iter
                    .next()
                    .ok_or_else(|| String::from("missing SQL argument for `-c/--command`"))?;
                set_command(&mut options, next.to_string_lossy().into_owned())?;
            }
            "--config" => {
                let next = iter
                    .next()
                    .ok_or_else(|| String::from("missing file path for `--config`"))?;
                options.config_path = Some(next.to_string_lossy().into_owned());
            }
            "--log-level" => {
                let next = iter
                    .next()
                    .ok_or_else(|| String::from("missing level for `--log-level`"))?;
                options.log_level = Some(next.to_string_lossy().into_owned());
            }
            _ => {
                if let Some(value) = arg_str.strip_prefix("--command=") {
                    set_command(&mut options, value.to_owned())?;
                    continue;
                }
                if let Some(value) = arg_str.strip_prefix("--config=") {
                    options.config_path = Some(value.to_owned());
                    continue;
                }
                if let Some(value) = arg_str.strip_prefix("--log-level=") {
                    options.log_level = Some(value.to_owned());
                    continue;
                }

                if arg_str.starts_with('-') && arg_str != "-" {
                    return Err(format!("unknown option `{arg_str}`"));
                }
                if options.command.is_some() {
                    return Err(String::from(
                        "input FILE cannot be combined with `-c/--command`",
                    ));
                }
                if options.input_path.is_some() {
                    return Err(String::from(
                        "too many positional arguments; expected at most one FILE",
                    ));
                }
                options.input_path = Some(arg_str.to_owned());
            }
        }
    }

    Ok(options)
}

fn set_command(options: &mut CliOptions, sql: String) -> std::result::Result<(), String> {
    if options.command.is_some() {
        return Err(String::from("`-c/--command` may only be provided once"));
    }
    if options.input_path.is_some() {
        return Err(String::from(
            "`-c/--command` cannot be combined with an input FILE",
        ));
    }
    options.command = Some(sql);
    Ok(())
}

fn set_output(options: &mut CliOptions, output: OutputFormat) -> std::result::Result<(), String> {
    match options.output {
        Some(previous) if previous != output => {
            Err(String::from("`--ddl` and `--json` are mutually exclusive"))
        }
        _ => {
            options.output = Some(output);
            Ok(())
        }
    }
}

fn write_usage<W>(out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "Usage: ddl-schema [OPTIONS] [FILE]\n\
         \n\
         Reads CREATE TABLE statements from FILE (or stdin when FILE is absent\n\
         or `-`) and prints the parsed schema.\n\
         \n\
         Options:\n\
         -c, --command SQL   Parse SQL given on the command line\n\
             --json          Print the schema as JSON (default)\n\
             --ddl           Print canonical CREATE TABLE statements\n\
             --pretty        Pretty-print JSON output\n\
             --strict        Fail on characters the lexer cannot classify\n\
             --config PATH   Read options from a JSON configuration file\n\
             --log-level LVL Log filter when RUST_LOG is unset (default: warn)\n\
         -h, --help          Show this help\n\
         \n\
         Examples:\n\
         \n\
         ddl-schema schema.sql\n\
         ddl-schema --pretty -c \"CREATE TABLE t (id INT PRIMARY KEY);\"\n\
         mysqldump --no-data app | ddl-schema --ddl\n",
    )
}
