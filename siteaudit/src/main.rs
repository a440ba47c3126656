use colored::Colorize;
use siteaudit::commands::command_argument_builder;
use siteaudit::handlers::{handle_audit, handle_request};
use siteaudit::print_banner;
use tracing::Level;

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_logging(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("audit", primary_command)) => match handle_audit(primary_command, quiet).await {
            Ok(0) => {}
            Ok(failures) => {
                eprintln!("{} {} site(s) failed", "✗".red().bold(), failures);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
        Some(("request", primary_command)) => match handle_request(primary_command).await {
            Ok(status) if (200..300).contains(&status) => {}
            Ok(_) => std::process::exit(1),
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
