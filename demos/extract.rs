use clap::{value_parser, Arg, ArgAction, Command};
use php_array_parser::Extractor;
use std::path::PathBuf;

fn main() -> miette::Result<()> {
    let matches = Command::new("extract")
        .about("Extract statically defined php arrays from a source file")
        .arg(
            Arg::new("pattern")
                .required(true)
                .help("Regular expression locating the arrays"),
        )
        .arg(
            Arg::new("file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Php file to read"),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .short('g')
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Capture group holding the array"),
        )
        .arg(
            Arg::new("literal")
                .long("literal")
                .action(ArgAction::SetTrue)
                .help("Captures are complete array literals instead of element lists"),
        )
        .get_matches();

    let pattern = matches.get_one::<String>("pattern").expect("required");
    let file = matches.get_one::<PathBuf>("file").expect("required");
    let group = *matches.get_one::<usize>("group").expect("has default");

    let values = Extractor::new(pattern)?
        .group(group)
        .literal(matches.get_flag("literal"))
        .parse_file(file)?;

    for value in values {
        println!("{}", value);
    }
    Ok(())
}
