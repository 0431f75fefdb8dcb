//! Command-line parsing for the `port` binary.

use std::env;
use std::path::PathBuf;

use agv_core::EnergyPolicy;

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub policy:   Option<EnergyPolicy>,
    pub seed:     Option<u64>,
    pub days:     Option<f64>,
    pub out:      Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str, expected: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag} (expected {expected})"))
}

pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions { scenario: None, policy: None, seed: None, days: None, out: None };
    let mut i = 0usize;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--scenario" => {
                i += 1;
                let path = value(args, i, flag, "a TOML file path")?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--policy" => {
                i += 1;
                let policy = match value(args, i, flag, "`swapping` or `direct`")? {
                    "swapping" => EnergyPolicy::Swapping,
                    "direct" => EnergyPolicy::DirectCharging,
                    other => return Err(format!("unknown policy `{other}` (expected `swapping` or `direct`)")),
                };
                opts.policy = Some(policy);
            }
            "--seed" => {
                i += 1;
                let raw = value(args, i, flag, "an unsigned integer")?;
                opts.seed = Some(raw.parse().map_err(|_| format!("invalid --seed `{raw}`"))?);
            }
            "--days" => {
                i += 1;
                let raw = value(args, i, flag, "a number of days")?;
                let days: f64 = raw.parse().map_err(|_| format!("invalid --days `{raw}`"))?;
                if !(days > 0.0) {
                    return Err(format!("--days must be positive (got {days})"));
                }
                opts.days = Some(days);
            }
            "--out" => {
                i += 1;
                opts.out = Some(PathBuf::from(value(args, i, flag, "a directory")?));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(opts)
}

pub fn print_usage() {
    println!("usage: port [--scenario FILE.toml] [--policy swapping|direct] [--seed N] [--days D] [--out DIR]");
    println!();
    println!("  --scenario  TOML scenario; omitted values keep their defaults");
    println!("  --policy    start from the swapping (default) or direct-charging preset");
    println!("  --seed      override run.seed");
    println!("  --days      override the horizon, in days");
    println!("  --out       write CSV output to DIR");
    println!();
    println!("Log verbosity follows RUST_LOG (default `info`).");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_overrides() {
        let o = parse_options(&args(&["--seed", "7", "--days", "2.5", "--policy", "direct"])).unwrap();
        assert_eq!(o.seed, Some(7));
        assert_eq!(o.days, Some(2.5));
        assert_eq!(o.policy, Some(EnergyPolicy::DirectCharging));
        assert!(o.scenario.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_options(&args(&["--seed"])).is_err());
        assert!(parse_options(&args(&["--days", "-1"])).is_err());
        assert!(parse_options(&args(&["--policy", "solar"])).is_err());
        assert!(parse_options(&args(&["--bogus"])).is_err());
        assert!(parse_options(&args(&["--scenario", "a.toml", "--scenario", "b.toml"])).is_err());
    }
}
