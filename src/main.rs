//! policy-trie: match candidate keywords against a configured word policy.
//!
//! Reads one candidate per line from stdin and writes one JSON object per
//! candidate to stdout.
//!
//! Flags:
//!   --config <path>  load this config file instead of defaults + user overlay
//!   --debug          log at debug level
//!   --dump           print the loaded tree and exit

use policy_trie::config::Config;
use policy_trie::{CommandPolicy, logging};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    debug: bool,
    dump: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--debug" => parsed.debug = true,
            "--dump" => parsed.dump = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(parsed)
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("policy-trie: {e}");
            std::process::exit(1);
        }
    };

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("policy-trie: {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Config::load(),
    };

    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        config.log_level()
    };
    logging::init(level);

    let policy = match CommandPolicy::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("policy-trie: failed to load policy: {e}");
            std::process::exit(1);
        }
    };

    if args.dump {
        for line in policy.dump() {
            println!("{line}");
        }
        return;
    }

    let match_log = config.match_log_path();
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("policy-trie: failed to read stdin: {e}");
                std::process::exit(1);
            }
        };
        let candidate = line.strip_suffix('\r').unwrap_or(&line);
        if candidate.is_empty() {
            continue;
        }

        let result = policy.evaluate(candidate);
        if let Some(path) = &match_log {
            logging::log_match(path, candidate, &result);
        }

        let output = serde_json::json!({
            "candidate": candidate,
            "matched": result.matched,
            "reason": result.reason,
        });
        println!("{output}");
    }
}
