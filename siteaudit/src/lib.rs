pub mod commands;
pub mod handlers;

pub use handlers::{load_urls_from_file, load_urls_from_source, parse_url_line};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

const BANNER: &str = r#"
  ███████╗██╗████████╗███████╗ █████╗ ██╗   ██╗██████╗ ██╗████████╗
  ██╔════╝██║╚══██╔══╝██╔════╝██╔══██╗██║   ██║██╔══██╗██║╚══██╔══╝
  ███████╗██║   ██║   █████╗  ███████║██║   ██║██║  ██║██║   ██║
  ╚════██║██║   ██║   ██╔══╝  ██╔══██║██║   ██║██║  ██║██║   ██║
  ███████║██║   ██║   ███████╗██║  ██║╚██████╔╝██████╔╝██║   ██║
  ╚══════╝╚═╝   ╚═╝   ╚══════╝╚═╝  ╚═╝ ╚═════╝ ╚═════╝ ╚═╝   ╚═╝
"#;

/// Printed to stderr, never stdout.
pub fn print_banner() {
    use colored::Colorize;

    eprintln!("{}", BANNER.bright_cyan());
    eprintln!(
        "  {} {}\n",
        "siteaudit".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
