//! Inspect the built-in grammar: first/follow sets, the LL(1) table, parse traces and random
//! sentences.

#[macro_use]
extern crate log;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use predictive_parser::{builtin, Action, Configuration, Ll1, RejectReason};

fn app() -> App<'static, 'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase message verbosity"),
        )
        .subcommand(SubCommand::with_name("sets").about("Print the first and follow sets"))
        .subcommand(SubCommand::with_name("table").about("Print the parse table"))
        .subcommand(
            SubCommand::with_name("parse")
                .about("Parse a sentence")
                .arg(
                    Arg::with_name("trace")
                        .long("trace")
                        .help("Print every step of the parser"),
                )
                .arg(
                    Arg::with_name("INPUT")
                        .help("The sentence to parse")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("generate")
                .about("Generate a random sentence")
                .arg(
                    Arg::with_name("max_length")
                        .short("n")
                        .long("max-length")
                        .value_name("N")
                        .takes_value(true)
                        .default_value("15")
                        .help("Maximum number of terminals"),
                )
                .arg(
                    Arg::with_name("parse")
                        .long("parse")
                        .help("Parse the generated sentence"),
                ),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = app().get_matches();

    // Configure the logger, `RUST_LOG` takes precedence over the verbosity flags.
    let level = match matches.occurrences_of("verbosity") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_default())
        .init();

    let parser = Ll1::from_grammar(builtin::grammar());
    info!(
        "loaded grammar with {} productions",
        parser.grammar().productions().count()
    );

    match matches.subcommand() {
        ("sets", _) => print_sets(&parser),
        ("table", _) => print_table(&parser),
        ("parse", Some(matches)) => parse(&parser, matches)?,
        ("generate", Some(matches)) => generate(&parser, matches)?,
        _ => unreachable!("a subcommand is required"),
    }

    Ok(())
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_sets(parser: &Ll1<char, char>) {
    println!("FIRST");
    for variable in parser.grammar().variables() {
        let first = parser
            .first_sets()
            .get(variable)
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>();
        println!("  {} = {{ {} }}", variable, join(first));
    }

    println!("FOLLOW");
    for variable in parser.grammar().variables() {
        let follow = parser
            .follow_sets()
            .get(variable)
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>();
        println!("  {} = {{ {} }}", variable, join(follow));
    }
}

fn print_table(parser: &Ll1<char, char>) {
    let Some(table) = parser.table() else {
        println!("parse table not ready");
        return;
    };

    let mut rows = BTreeMap::new();
    for (variable, lookahead, id) in table.iter() {
        rows.entry(variable.to_string())
            .or_insert_with(BTreeMap::new)
            .insert(lookahead.to_string(), parser.grammar().production(id).to_string());
    }

    for variable in parser.grammar().variables() {
        for (lookahead, production) in rows.remove(&variable.to_string()).unwrap_or_default() {
            println!("  [{}, {}] {}", variable, lookahead, production);
        }
    }

    for conflict in table.conflicts() {
        println!(
            "conflict at [{}, {}]: `{}` replaced `{}`",
            conflict.variable,
            conflict.lookahead,
            parser.grammar().production(conflict.chosen),
            parser.grammar().production(conflict.overwritten),
        );
    }
}

fn parse(
    parser: &Ll1<char, char>,
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = matches.value_of("INPUT").unwrap_or_default();
    let result = parser.parse(input)?;

    if matches.is_present("trace") {
        for (i, step) in result.trace.iter().enumerate() {
            println!(
                "{:>4}  {:<24} {:<24} {}",
                i + 1,
                join(step.stack_before_pop().iter()),
                join(step.input.iter()),
                describe(parser, step)
            );
        }
    }

    println!("{:?} after {} steps", result.verdict, result.steps);
    Ok(())
}

/// Action column of a trace line.
fn describe(parser: &Ll1<char, char>, step: &Configuration<char, char>) -> String {
    match step.action {
        Action::Match => format!("match {}", step.current),
        Action::Expand(id) => parser.grammar().production(id).to_string(),
        Action::Reject(RejectReason::Mismatch) => format!("error: expected {}", step.top),
        Action::Reject(RejectReason::NoEntry) => "error: no production".to_string(),
    }
}

fn max_length(matches: &ArgMatches) -> Result<usize, std::num::ParseIntError> {
    matches.value_of("max_length").unwrap_or("15").parse()
}

fn generate(
    parser: &Ll1<char, char>,
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_length = max_length(matches)?;
    let sentence = parser.generate_sentence(&mut rand::thread_rng(), max_length)?;
    println!("{}", sentence);

    if matches.is_present("parse") {
        let result = parser.parse(&sentence)?;
        println!("{:?} after {} steps", result.verdict, result.steps);
    }

    Ok(())
}
