use anyhow::{anyhow, Result};
use clap::{arg, Arg, ArgAction, ArgMatches, Command};
use knap_algorithms::knapsack::{batch::solve_batch, dynamic, Params, Solver};
use knap_challenges::knapsack::{Challenge, Solution};
use knap_structs::{
    config::RuntimeConfig,
    core::{GenerateSettings, OutputData},
};
use knap_utils::{compress_obj, dejsonify, init_logger, jsonify};
use log::{info, warn, LevelFilter};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::{
    fs,
    io::Read,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

fn cli() -> Command {
    Command::new("knap-runtime")
        .about("Solves, verifies and generates 0/1 knapsack instances")
        .arg_required_else_help(true)
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .value_name("[off, error, warn, info, debug, trace]")
                .help("Log level for records written to stderr")
                .global(true)
                .default_value("warn")
                .value_parser(clap::value_parser!(LevelFilter)),
        )
        .subcommand(
            Command::new("solve")
                .about("Computes the optimal selection for an instance")
                .arg(
                    arg!(<INSTANCE> "Instance json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--config [CONFIG] "Path to a runtime config json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the output data will be saved to this file path (default json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress "If output file is set, the output data will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--timeout [TIMEOUT] "Seconds after which the solve is interrupted")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Solves a json array of independent instances")
                .arg(
                    arg!(<INSTANCES> "Instances json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--config [CONFIG] "Path to a runtime config json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--sequential "Solve the instances one after another on this thread")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Verifies a selection and reports its gap to the optimum")
                .arg(
                    arg!(<INSTANCE> "Instance json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--config [CONFIG] "Path to a runtime config json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generates a random instance")
                .arg(
                    arg!(<SETTINGS> "Settings json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(<NONCE> "Nonce value").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the instance will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("demo").about("Solves the textbook three item instance"))
        .subcommand(Command::new("params").about("Lists the solver hyperparameters"))
}

fn log_level(matches: &ArgMatches) -> LevelFilter {
    let matches = match matches.subcommand() {
        Some((_, sub_m)) => sub_m,
        None => matches,
    };
    matches
        .get_one::<LevelFilter>("log_level")
        .copied()
        .unwrap_or(LevelFilter::Warn)
}

fn main() {
    let matches = cli().get_matches();
    if let Err(e) = init_logger(log_level(&matches)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<String>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<PathBuf>("config").cloned(),
            sub_m.get_one::<PathBuf>("output").cloned(),
            sub_m.get_flag("compress"),
            sub_m.get_one::<u64>("timeout").cloned(),
        ),
        Some(("batch", sub_m)) => batch(
            sub_m.get_one::<String>("INSTANCES").unwrap().clone(),
            sub_m.get_one::<PathBuf>("config").cloned(),
            sub_m.get_flag("sequential"),
        ),
        Some(("verify", sub_m)) => verify(
            sub_m.get_one::<String>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
            sub_m.get_one::<PathBuf>("config").cloned(),
        ),
        Some(("generate", sub_m)) => generate(
            sub_m.get_one::<String>("SETTINGS").unwrap().clone(),
            *sub_m.get_one::<u64>("NONCE").unwrap(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("demo", _)) => demo(),
        Some(("params", _)) => {
            dynamic::help();
            Ok(())
        }
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn solve(
    instance: String,
    config_path: Option<PathBuf>,
    output_file: Option<PathBuf>,
    compress: bool,
    timeout: Option<u64>,
) -> Result<()> {
    let challenge: Challenge = load_json(&instance, "instance")?;
    let config = load_config(config_path)?;
    let params = Params::initialize(&config.hyperparameters);
    let stop_flag = Arc::new(AtomicBool::new(false));
    if let Some(secs) = timeout.or(config.timeout_secs().copied()) {
        arm_timeout(stop_flag.clone(), secs);
    }

    let start = Instant::now();
    let optimum = Solver::solve(&challenge, &params, Some(stop_flag.as_ref()))?;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    info!(
        "[RUNTIME] optimum {} over {} items in {}ms",
        optimum.value,
        challenge.num_items(),
        elapsed_ms
    );

    let output_data = OutputData {
        num_items: challenge.num_items(),
        capacity: challenge.capacity(),
        value: optimum.value,
        items: optimum.solution.items,
        elapsed_ms,
    };
    if let Some(path) = output_file {
        if compress {
            fs::write(&path, compress_obj(&output_data)?)?;
        } else {
            fs::write(&path, jsonify(&output_data))?;
        }
        println!("output_data written to: {:?}", path);
    } else {
        println!("{}", jsonify(&output_data));
    }
    Ok(())
}

pub fn batch(instances: String, config_path: Option<PathBuf>, sequential: bool) -> Result<()> {
    let entries: Vec<Value> = load_json(&instances, "instances")?;
    let num_entries = entries.len();
    let config = load_config(config_path)?;
    let params = Params::initialize(&config.hyperparameters);
    let stop_flag = Arc::new(AtomicBool::new(false));
    if let Some(&secs) = config.timeout_secs() {
        arm_timeout(stop_flag.clone(), secs);
    }

    let parallel = !sequential && config.is_parallel();
    let (output, num_failed) = solve_entries(entries, &params, parallel, Some(stop_flag.as_ref()))?;
    println!("{}", jsonify(&output));

    if num_failed > 0 {
        return Err(anyhow!("{} of {} instances failed", num_failed, num_entries));
    }
    Ok(())
}

/// Validates each entry on its own and solves the valid ones. Every entry,
/// valid or not, gets a result or an `{"error": ...}` object in its slot.
fn solve_entries(
    entries: Vec<Value>,
    params: &Params,
    parallel: bool,
    stop_flag: Option<&AtomicBool>,
) -> Result<(Vec<Value>, usize)> {
    let mut invalid = Vec::with_capacity(entries.len());
    let mut challenges = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Challenge>(entry) {
            Ok(challenge) => {
                invalid.push(None);
                challenges.push(challenge);
            }
            Err(e) => {
                warn!("[RUNTIME] instance {} is invalid: {}", index, e);
                invalid.push(Some(e.to_string()));
            }
        }
    }

    let mut results = solve_batch(&challenges, params, parallel, stop_flag).into_iter();
    let mut num_failed = 0;
    let mut output = Vec::with_capacity(invalid.len());
    for (index, error) in invalid.into_iter().enumerate() {
        let error = match error {
            Some(error) => error,
            None => match results.next() {
                Some(Ok(optimum)) => {
                    output.push(serde_json::to_value(&optimum)?);
                    continue;
                }
                Some(Err(e)) => e.to_string(),
                None => return Err(anyhow!("Missing result for instance {}", index)),
            },
        };
        num_failed += 1;
        output.push(json!({ "error": error }));
    }
    Ok((output, num_failed))
}

pub fn verify(instance: String, solution: String, config_path: Option<PathBuf>) -> Result<()> {
    let challenge: Challenge = load_json(&instance, "instance")?;
    let solution: Map<String, Value> = load_json(&solution, "solution")?;
    let solution = Solution::try_from(solution)
        .map_err(|_| anyhow!("Invalid solution. Cannot convert to knapsack::Solution"))?;
    let config = load_config(config_path)?;
    let params = Params::initialize(&config.hyperparameters);

    let (value, optimum) = evaluate_selection(&challenge, &solution, &params)?;
    println!("Solution is valid");
    match optimum {
        Some(optimum) => {
            println!("value: {}, optimum: {}, gap: {}", value, optimum, optimum - value)
        }
        None => println!("value: {}, optimum: unavailable", value),
    }
    Ok(())
}

/// Value of a feasible selection, paired with the optimum when the table fits
/// within `params`.
fn evaluate_selection(
    challenge: &Challenge,
    solution: &Solution,
    params: &Params,
) -> Result<(u64, Option<u64>)> {
    let value = challenge
        .evaluate_total_value(solution)
        .map_err(|e| anyhow!("Invalid solution: {}", e))?;
    match Solver::solve(challenge, params, None) {
        Ok(optimum) => Ok((value, Some(optimum.value))),
        Err(e) if e.is_resource_exhausted() => {
            warn!("[RUNTIME] optimum unavailable: {}", e);
            Ok((value, None))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn generate(settings: String, nonce: u64, output_file: Option<PathBuf>) -> Result<()> {
    let settings: GenerateSettings = load_json(&settings, "settings")?;
    let seed = settings.calc_seed(nonce);
    let challenge = Challenge::generate_instance(&seed, settings.track())?;
    info!(
        "[RUNTIME] generated {} items with capacity {}",
        challenge.num_items(),
        challenge.capacity()
    );

    if let Some(path) = output_file {
        fs::write(&path, jsonify(&challenge))?;
        println!("instance written to: {:?}", path);
    } else {
        println!("{}", jsonify(&challenge));
    }
    Ok(())
}

pub fn demo() -> Result<()> {
    let optimum = knap_algorithms::solve(&[60, 100, 120], &[10, 20, 30], 50)?;
    println!("Maximum value that can be carried: {}", optimum.value);
    println!("Selected item indices (0-based): {:?}", optimum.items());
    Ok(())
}

fn arm_timeout(stop_flag: Arc<AtomicBool>, secs: u64) {
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(secs));
        warn!("[RUNTIME] timeout of {}s reached, interrupting", secs);
        stop_flag.store(true, Ordering::Relaxed);
    });
}

fn load_config(path: Option<PathBuf>) -> Result<RuntimeConfig> {
    match path {
        None => Ok(RuntimeConfig::default()),
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
            dejsonify::<RuntimeConfig>(&content)
                .map_err(|e| anyhow!("Failed to parse config: {}", e))
        }
    }
}

fn load_json<T: DeserializeOwned>(input: &str, what: &str) -> Result<T> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read {} from stdin: {}", what, e))?;
        buffer
    } else if input.ends_with(".json") {
        fs::read_to_string(input)
            .map_err(|e| anyhow!("Failed to read {} file {}: {}", what, input, e))?
    } else {
        input.to_string()
    };

    dejsonify::<T>(&content).map_err(|e| anyhow!("Failed to parse {}: {}", what, e))
}
