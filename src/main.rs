use clap::CommandFactory;
use colored::*;
use env_logger::{Builder, Env, Target};
use log::{info, warn};
use std::fs;
use std::time::Instant;
use techfind::cli::{Cli, Commands};
use techfind::config::Config;
use techfind::error::{Result as TechfindResult, TechfindError};
use techfind::output_formats::OutputFormatter;
use techfind::report::{default_report_name, resolve_techniques, solutions_csv, split_names};
use techfind::{load_or_empty, Parser, SearchEngine};

fn main() -> TechfindResult<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let start_time = Instant::now();
    info!("Application started with command: {:?}", cli.command);

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "techfind", &mut std::io::stdout());
        return Ok(());
    }

    let config = build_config(&cli)?;
    let store = load_or_empty(&config.corpus.path);
    if store.is_empty() {
        warn!("No techniques available from {}", config.corpus.path.display());
    }
    let engine = SearchEngine::new(config.engine, store)?;

    run_command(&cli.command, &engine)?;

    if cli.metrics {
        println!("\n{}", engine.metrics().gather());
    }

    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

/// Config file values, overridden by whatever was given on the command line.
fn build_config(cli: &Cli) -> TechfindResult<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(path) = &cli.corpus {
        config.corpus.path = path.clone();
    }
    if let Some(algorithm) = cli.algorithm {
        config.engine.algorithm = algorithm;
    }
    if let Some(max_results) = cli.max_results {
        config.engine.max_results = max_results;
    }
    if let Some(min_query_length) = cli.min_query_length {
        config.engine.min_query_length = min_query_length;
    }
    if let Some(threshold) = cli.fuzzy_threshold {
        config.engine.fuzzy_threshold = threshold;
    }

    config.engine.validate()?;
    Ok(config)
}

fn run_command(command: &Commands, engine: &SearchEngine) -> TechfindResult<()> {
    match command {
        Commands::Search { query, format } => {
            if query.trim().is_empty() {
                println!("{}", "Please enter search keywords".yellow());
                return Ok(());
            }
            let results = engine.search(query);
            println!("{}", OutputFormatter::new(*format).format_results(&results, query));
        }
        Commands::Describe { names, format } => {
            let names = split_names(names);
            if names.is_empty() {
                println!("{}", "Please enter a technique name".yellow());
                return Ok(());
            }
            let formatter = OutputFormatter::new(*format);
            for name in names {
                match engine.search(&name).into_iter().next() {
                    Some(hit) => println!("{}", formatter.format_technique(&hit.technique)),
                    None => println!("{} {}", "Technique not found:".yellow(), name),
                }
            }
        }
        Commands::Show { id, format } => match engine.get_by_id(id) {
            Some(technique) => {
                println!("{}", OutputFormatter::new(*format).format_technique(&technique))
            }
            None => println!("{} {}", "No technique with id".yellow(), id),
        },
        Commands::Categories { format } => {
            let categories = engine.get_categories();
            println!("{}", OutputFormatter::new(*format).format_categories(&categories));
        }
        Commands::Category { name, format } => {
            let techniques = engine.get_by_category(name);
            println!(
                "{}",
                OutputFormatter::new(*format).format_category_listing(name, &techniques)
            );
        }
        Commands::Export { names, output } => {
            let names = split_names(names);
            if names.is_empty() {
                return Err(TechfindError::Other(
                    "no technique names given for the report".to_string(),
                ));
            }
            let techniques = resolve_techniques(engine, &names)?;
            let path = output
                .clone()
                .unwrap_or_else(|| default_report_name(chrono::Local::now()).into());
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, solutions_csv(&techniques))?;

            let exported: Vec<&str> = techniques.iter().map(|t| t.name.as_str()).collect();
            println!(
                "{} {} ({})",
                "Solutions report written to".green(),
                path.display(),
                exported.join(", ")
            );
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}

fn setup_logging(cli: &Cli) -> TechfindResult<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| TechfindError::Other(e.to_string()))?;
    Ok(())
}
