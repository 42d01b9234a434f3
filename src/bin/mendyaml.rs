use std::env;
use std::io::{self, Read};

use yaml_mend::types::RepairOptions;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut entry_key: Option<String> = None;
    let mut content_key: Option<String> = None;
    let mut no_strict = false;
    let mut input_path: Option<String> = None;

    fn required(args: &[String], i: usize, flag: &str) -> String {
        match args.get(i) {
            Some(v) => v.to_string(),
            None => {
                eprintln!("missing value for {flag}");
                std::process::exit(2);
            }
        }
    }

    let args = env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        match a.as_str() {
            "--input" | "-i" => {
                i += 1;
                input_path = Some(required(&args, i, "--input"));
            }
            "--entry-key" => {
                i += 1;
                entry_key = Some(required(&args, i, "--entry-key"));
            }
            "--content-key" => {
                i += 1;
                content_key = Some(required(&args, i, "--content-key"));
            }
            "--no-strict" => no_strict = true,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: mendyaml [--input FILE|-] [--entry-key KEY] [--content-key KEY] [--no-strict]\n\
                     Reads stdin if no --input.\n\
                     Writes repaired YAML to stdout; diagnostics go to stderr (RUST_LOG)."
                );
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown arg: {a}");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let buf: Vec<u8> = match input_path.as_deref() {
        Some(p) if p != "-" => match std::fs::read(p) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("failed to read {p}: {e}");
                std::process::exit(2);
            }
        },
        _ => {
            let mut b = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut b) {
                eprintln!("failed to read stdin: {e}");
                std::process::exit(2);
            }
            b
        }
    };
    let text = String::from_utf8_lossy(&buf);

    let mut opt = RepairOptions::default();
    if let Some(k) = entry_key {
        opt.entry_key = k;
    }
    if let Some(k) = content_key {
        opt.content_key = k;
    }
    opt.strict_fast_path = !no_strict;

    match yaml_mend::repair(&text, &opt) {
        Ok(result) => {
            print!("{}", result.output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("mendyaml: {e}");
            std::process::exit(2);
        }
    }
}
