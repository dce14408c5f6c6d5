//! # basalt CLI entry point
//!
//! Converts between bytes and the encodings in the registry from the command
//! line. Byte arguments and byte output are written as hex.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use basalt::{bytes_to_string, string_to_bytes, Bech32, CodecResult, Encoding, BECH32, BECH32M};

/// Byte/string codec toolbox
#[derive(Parser, Debug)]
#[command(name = "basalt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode bytes with a registered encoding.
    Encode {
        /// Registry name of the encoding, see `list`.
        encoding: Encoding,
        /// Input bytes as hex.
        input: String,
        /// Take the input as UTF-8 text instead of hex.
        #[arg(long)]
        utf8: bool,
    },

    /// Decode a string with a registered encoding, printing the bytes as hex.
    Decode {
        /// Registry name of the encoding, see `list`.
        encoding: Encoding,
        input: String,
    },

    /// Encode bytes (as hex) into a bech32 string with the given prefix.
    #[command(name = "bech32-encode")]
    Bech32Encode {
        prefix: String,
        /// Payload bytes as hex.
        bytes: String,
        /// Use the bech32m checksum.
        #[arg(long)]
        m: bool,
        /// Do not enforce the 90-character length limit.
        #[arg(long)]
        no_limit: bool,
    },

    /// Decode and verify a bech32 string.
    #[command(name = "bech32-decode")]
    Bech32Decode {
        input: String,
        /// Use the bech32m checksum.
        #[arg(long)]
        m: bool,
        /// Do not enforce the 90-character length limit.
        #[arg(long)]
        no_limit: bool,
    },

    /// List the registered encodings.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

fn variant(m: bool) -> &'static Bech32 {
    if m {
        &BECH32M
    } else {
        &BECH32
    }
}

/// Executes one subcommand, returning the lines to print.
fn run(command: Commands) -> CodecResult<Vec<String>> {
    match command {
        Commands::Encode {
            encoding,
            input,
            utf8,
        } => {
            let bytes = if utf8 {
                input.into_bytes()
            } else {
                string_to_bytes(Encoding::Hex, &input)?
            };
            Ok(vec![bytes_to_string(encoding, &bytes)?])
        }
        Commands::Decode { encoding, input } => {
            let bytes = string_to_bytes(encoding, &input)?;
            Ok(vec![bytes_to_string(Encoding::Hex, &bytes)?])
        }
        Commands::Bech32Encode {
            prefix,
            bytes,
            m,
            no_limit,
        } => {
            let coder = variant(m);
            let words = coder.to_words(&string_to_bytes(Encoding::Hex, &bytes)?)?;
            let limit = (!no_limit).then_some(basalt::bech32::DEFAULT_LIMIT);
            Ok(vec![coder.encode_with_limit(&prefix, &words, limit)?])
        }
        Commands::Bech32Decode { input, m, no_limit } => {
            let coder = variant(m);
            let limit = (!no_limit).then_some(basalt::bech32::DEFAULT_LIMIT);
            let decoded = coder.decode_with_limit(&input, limit)?;
            let words: Vec<String> = decoded.words.iter().map(u8::to_string).collect();
            let mut lines = vec![
                format!("prefix: {}", decoded.prefix),
                format!("words: [{}]", words.join(", ")),
            ];
            match coder.from_words_opt(&decoded.words) {
                Some(bytes) => {
                    lines.push(format!("bytes: {}", bytes_to_string(Encoding::Hex, &bytes)?))
                }
                None => tracing::debug!("payload words do not regroup into whole bytes"),
            }
            Ok(lines)
        }
        Commands::List => Ok(Encoding::ALL.iter().map(|enc| enc.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> CodecResult<Vec<String>> {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        run(cli.command)
    }

    #[test]
    fn cli_parse_encode() {
        let cli = Cli::try_parse_from(["basalt", "encode", "base58", "0001"]).unwrap();
        if let Commands::Encode {
            encoding,
            input,
            utf8,
        } = cli.command
        {
            assert_eq!(encoding, Encoding::Base58);
            assert_eq!(input, "0001");
            assert!(!utf8);
        } else {
            panic!("expected encode subcommand");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_encoding() {
        assert!(Cli::try_parse_from(["basalt", "encode", "base99", "00"]).is_err());
    }

    #[test]
    fn cli_parse_verbosity() {
        let cli = Cli::try_parse_from(["basalt", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn cli_parse_bech32_flags() {
        let cli =
            Cli::try_parse_from(["basalt", "bech32-encode", "bc", "00", "--m", "--no-limit"])
                .unwrap();
        if let Commands::Bech32Encode { m, no_limit, .. } = cli.command {
            assert!(m);
            assert!(no_limit);
        } else {
            panic!("expected bech32-encode subcommand");
        }
    }

    #[test]
    fn run_encode_and_decode() {
        assert_eq!(
            run_args(&["basalt", "encode", "base58", "000001"]).unwrap(),
            vec!["112"]
        );
        assert_eq!(
            run_args(&["basalt", "encode", "base64", "hello", "--utf8"]).unwrap(),
            vec!["aGVsbG8="]
        );
        assert_eq!(
            run_args(&["basalt", "decode", "base64", "aGVsbG8="]).unwrap(),
            vec!["68656c6c6f"]
        );
    }

    #[test]
    fn run_bech32_roundtrip() {
        let encoded = run_args(&["basalt", "bech32-encode", "test", "deadbeef"]).unwrap();
        assert_eq!(encoded.len(), 1);
        let decoded = run_args(&["basalt", "bech32-decode", &encoded[0]]).unwrap();
        assert_eq!(decoded[0], "prefix: test");
        assert_eq!(decoded[2], "bytes: deadbeef");
        assert!(run_args(&["basalt", "bech32-decode", &encoded[0], "--m"]).is_err());
    }

    #[test]
    fn run_list() {
        let names = run_args(&["basalt", "list"]).unwrap();
        assert_eq!(names.len(), Encoding::ALL.len());
        assert!(names.iter().any(|name| name == "base32crockford"));
    }
}
