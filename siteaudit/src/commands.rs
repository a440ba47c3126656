use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("siteaudit")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("siteaudit")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log crawl decisions to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("audit")
                .about(
                    "Crawl a site (or every site in a hosts file) and report on its structure, \
                contact details and SEO findings.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The site to audit. A missing scheme defaults to https://")
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of sites to audit")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(--"max-pages" <NUM>)
                        .required(false)
                        .help("Maximum number of pages to record per site")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("25"),
                )
                .arg(
                    arg!(--"include-subdomains")
                        .required(false)
                        .help("Treat subdomains of the root's registrable domain as the same site")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request fetch timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("15"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to screen)"),
                )
                .arg(
                    arg!(-j --"jobs" <NUM>)
                        .required(false)
                        .help("How many sites from a hosts file to audit at once")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                ),
        )
        .subcommand(
            command!("request")
                .about(
                    "Run a single audit request through the POST /audit contract and print the \
                JSON response.",
                )
                .arg(
                    arg!(--"method" <METHOD>)
                        .required(false)
                        .help("HTTP method of the simulated request")
                        .default_value("POST"),
                )
                .arg(
                    arg!(--"body" <FILE>)
                        .required(false)
                        .help("File holding the JSON request body, or - for stdin"),
                ),
        )
}
