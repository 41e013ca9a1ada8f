//! CLI entry point for `smtpcap`.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

use smtpcap::config::Config;
use smtpcap::error::CaptureError;
use smtpcap::parser::{mime, normalize_line_endings};
use smtpcap::{Content, Message, MessageParser, SmtpMessage};

/// Parse raw SMTP transactions into structured messages.
#[derive(Parser)]
#[command(name = "smtpcap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DATA payload as if it had arrived in an SMTP transaction
    Parse {
        /// File holding the DATA payload ("-" for stdin)
        #[arg(value_name = "FILE")]
        data: PathBuf,
        /// Envelope sender (MAIL FROM); empty for the null reverse-path
        #[arg(long, default_value = "")]
        from: String,
        /// Envelope recipient (RCPT TO); repeat for several
        #[arg(long = "to", value_name = "ADDR")]
        to: Vec<String>,
        /// Client identity from HELO/EHLO
        #[arg(long, default_value = "localhost")]
        helo: String,
        /// Hostname of the capturing server
        #[arg(long, env = "SMTPCAP_HOSTNAME")]
        hostname: Option<String>,
        /// Convert bare LF line endings to CRLF before parsing
        #[arg(long)]
        crlf: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Also list envelope recipients missing from To/Cc
        #[arg(long)]
        bcc: bool,
    },
    /// Print the MIME boundary declared in a Content-Type value
    Boundary {
        content_type: String,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        init: bool,
        /// Overwrite an existing config file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Pretty-printed JSON of the whole message
    Json,
    /// Indented outline of headers and MIME parts
    Tree,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = smtpcap::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Parse {
            data,
            from,
            to,
            helo,
            hostname,
            crlf,
            format,
            bcc,
        } => {
            let payload = read_payload(&data)?;
            let payload = if crlf {
                normalize_line_endings(&payload).into_owned()
            } else {
                payload
            };
            let raw = SmtpMessage {
                from,
                to,
                data: payload,
                helo,
            };
            let hostname = hostname.unwrap_or_else(|| config.hostname());
            cmd_parse(&raw, &hostname, &config, format, bcc)
        }
        Commands::Boundary { content_type } => cmd_boundary(&content_type),
        Commands::Config { init, force } => cmd_config(&config, init, force),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = smtpcap::config::log_file_path(config);
    let log_target = split_log_path(&log_path)
        .filter(|(dir, _)| std::fs::create_dir_all(dir).is_ok());
    if let Some((log_dir, log_name)) = log_target {
        let file_appender = tracing_appender::rolling::never(log_dir, log_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Split a log file path into the directory and file name the appender wants.
fn split_log_path(path: &Path) -> Option<(&Path, &OsStr)> {
    Some((path.parent()?, path.file_name()?))
}

/// Read the DATA payload from a file, or from stdin for `-`.
fn read_payload(path: &Path) -> anyhow::Result<String> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(path).map_err(|e| CaptureError::io(path, e))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Assemble the message and print it.
fn cmd_parse(
    raw: &SmtpMessage,
    hostname: &str,
    config: &Config,
    format: Format,
    bcc: bool,
) -> anyhow::Result<()> {
    let parser = MessageParser::with_config(hostname, &config.parser);
    let msg = parser.parse(raw);

    match format {
        Format::Json => {
            let mut value = serde_json::to_value(&msg)?;
            if bcc {
                value["Bcc"] = serde_json::to_value(msg.bcc())?;
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Format::Tree => print_tree(&msg, bcc),
    }

    Ok(())
}

/// Print the message as an indented outline.
fn print_tree(msg: &Message, bcc: bool) {
    println!("ID:      {}", msg.id);
    println!("Created: {}", msg.created.to_rfc3339());
    println!("From:    {}", msg.from);
    for to in &msg.to {
        println!("To:      {to}");
    }
    if bcc {
        for hidden in msg.bcc() {
            println!("Bcc:     {hidden}");
        }
    }
    println!();
    print_content(&msg.content, 0);
}

fn print_content(content: &Content, depth: usize) {
    let indent = "  ".repeat(depth);
    let content_type = content.header("Content-Type").unwrap_or("(none)");
    println!(
        "{indent}[{content_type}] {} bytes, {} headers",
        content.size,
        content.headers.len()
    );
    if depth == 0 {
        for (name, values) in &content.headers {
            for value in values {
                println!("{indent}  {name}: {}", value.replace("\r\n", " "));
            }
        }
    }
    if let Some(ref mime) = content.mime {
        for part in &mime.parts {
            print_content(part, depth + 1);
        }
    }
}

/// Print the boundary of a Content-Type value.
fn cmd_boundary(content_type: &str) -> anyhow::Result<()> {
    match mime::extract_boundary(content_type) {
        Some(boundary) => {
            println!("{boundary}");
            Ok(())
        }
        None => anyhow::bail!("No boundary found in: {content_type}"),
    }
}

/// Print the config path and effective settings, optionally saving them.
fn cmd_config(config: &Config, init: bool, force: bool) -> anyhow::Result<()> {
    let path = smtpcap::config::config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if init {
        if path.exists() && !force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        let saved = smtpcap::config::save_config(config)?;
        println!("Wrote {}", saved.display());
        return Ok(());
    }

    let status = if path.exists() { "" } else { " (not present, using defaults)" };
    println!("# {}{status}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "smtpcap", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
