//! Command-line interface for lexmatch
//! Runs preprocessing and pattern search over token lists produced by an external scanner.
//!
//! Usage:
//!   lexmatch preprocess `<tokens.json>` [--config `<file>`] [--format json|yaml]
//!   lexmatch search `<tokens.json>` [--config `<file>`] [--pattern `<expr>`]... [--group `<name>`]
//!   lexmatch explain `<expr>` [--class]                   - Show the compiled synthetic expression

use clap::{Arg, ArgAction, ArgMatches, Command};
use lexmatch::pattern::{TokenClassPattern, TokenTypePattern};
use lexmatch::settings::{Loader, Settings};
use lexmatch::Token;
use serde::Serialize;
use std::fs;

fn main() {
    env_logger::init();

    let input = |about: &'static str| {
        Arg::new("tokens")
            .help(about)
            .required(true)
            .index(1)
    };
    let config = || {
        Arg::new("config")
            .long("config")
            .short('c')
            .help("Settings file layered over the built-in defaults")
    };
    let format = || {
        Arg::new("format")
            .long("format")
            .short('f')
            .help("Output format: json or yaml")
            .default_value("json")
    };

    let matches = Command::new("lexmatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Token-stream pattern matching and preprocessing")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("preprocess")
                .about("Preprocess a token list and print the result")
                .arg(input("Token list (JSON array of tokens)"))
                .arg(config())
                .arg(format()),
        )
        .subcommand(
            Command::new("search")
                .about("Run patterns over a preprocessed token list and print the hits")
                .arg(input("Token list (JSON array of tokens)"))
                .arg(config())
                .arg(format())
                .arg(
                    Arg::new("pattern")
                        .long("pattern")
                        .short('p')
                        .help("Pattern expression, in addition to the configured ones")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .short('g')
                        .help("Group name for --pattern hits")
                        .default_value("cli"),
                ),
        )
        .subcommand(
            Command::new("explain")
                .about("Compile a pattern and show its synthetic expression")
                .arg(Arg::new("expression").required(true).index(1))
                .arg(
                    Arg::new("class")
                        .long("class")
                        .help("Resolve literals as token classes instead of token types")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("preprocess", args)) => handle_preprocess_command(args),
        Some(("search", args)) => handle_search_command(args),
        Some(("explain", args)) => handle_explain_command(args),
        _ => unreachable!("subcommand is required"),
    }
}

/// Handle the preprocess command
fn handle_preprocess_command(args: &ArgMatches) {
    let settings = load_settings(args);
    let tokens = read_tokens(args);

    let preprocessor = settings.preprocessor.build().unwrap_or_else(|e| {
        eprintln!("Preprocessor configuration error: {}", e);
        std::process::exit(1);
    });
    let result = preprocessor.preprocess_with_diagnostics(&tokens);
    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }

    print_output(&result.tokens, args);
}

/// Handle the search command
fn handle_search_command(args: &ArgMatches) {
    let settings = load_settings(args);
    let tokens = read_tokens(args);

    let preprocessor = settings.preprocessor.build().unwrap_or_else(|e| {
        eprintln!("Preprocessor configuration error: {}", e);
        std::process::exit(1);
    });
    let mut search = settings.build_search().unwrap_or_else(|e| {
        eprintln!("Invalid configured pattern: {}", e);
        std::process::exit(1);
    });

    let group = args
        .get_one::<String>("group")
        .map(String::as_str)
        .unwrap_or("cli");
    for expression in args.get_many::<String>("pattern").into_iter().flatten() {
        let added = if settings.search.by_class {
            search.add_class_pattern(expression, group).map(|_| ())
        } else {
            search.add_type_pattern(expression, group).map(|_| ())
        };
        if let Err(e) = added {
            eprintln!("Invalid pattern: {}", e);
            std::process::exit(1);
        }
    }

    if search.is_empty() {
        eprintln!("No patterns: pass --pattern or configure search.patterns");
        std::process::exit(1);
    }

    let tokens = preprocessor.preprocess(&tokens);
    let hits = search.search(&tokens);
    print_output(&hits, args);
}

/// Handle the explain command
fn handle_explain_command(args: &ArgMatches) {
    let Some(expression) = args.get_one::<String>("expression") else {
        eprintln!("Missing expression");
        std::process::exit(1);
    };

    let compiled = if args.get_flag("class") {
        TokenClassPattern::new(expression)
            .map(|p| (p.literal_count(), p.synthetic_expression().to_string()))
    } else {
        TokenTypePattern::new(expression)
            .map(|p| (p.literal_count(), p.synthetic_expression().to_string()))
    };

    match compiled {
        Ok((literals, synthetic)) => {
            println!("expression: {}", expression);
            println!("literals:   {}", literals);
            println!("synthetic:  {}", escape_private_use(&synthetic));
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_settings(args: &ArgMatches) -> Settings {
    let mut loader = Loader::new();
    if let Some(path) = args.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Settings error: {}", e);
        std::process::exit(1);
    })
}

fn read_tokens(args: &ArgMatches) -> Vec<Token> {
    let Some(path) = args.get_one::<String>("tokens") else {
        eprintln!("Missing token list");
        std::process::exit(1);
    };
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });
    serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing token list {}: {}", path, e);
        std::process::exit(1);
    })
}

fn print_output<T: Serialize + ?Sized>(value: &T, args: &ArgMatches) {
    let format = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");
    let formatted = match format {
        "json" => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        other => {
            eprintln!("Format '{}' not supported", other);
            eprintln!("Available formats: json, yaml");
            std::process::exit(1);
        }
    };
    match formatted {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("Error formatting output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Synthetic characters are private-use code points; show them as escapes.
fn escape_private_use(text: &str) -> String {
    text.chars()
        .map(|c| {
            if ('\u{E000}'..='\u{F8FF}').contains(&c) {
                format!("\\x{{{:X}}}", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect()
}
