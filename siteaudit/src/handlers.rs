use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use siteaudit_core::api::handle_audit_request;
use siteaudit_core::config::AuditConfig;
use siteaudit_core::model::AuditResult;
use siteaudit_core::report::{ReportFormat, generate_report, save_report};
use siteaudit_core::run_audit;
use siteaudit_scanner::url_utils::normalize_url;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

// Helper functions for the audit handler

/// Load sites from either a hosts file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        parse_url_line(url)
            .map(|u| vec![u])
            .ok_or_else(|| format!("Invalid URL '{}'", url))
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse sites from a hosts file. Blank lines and `#` comments are ignored.
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let mut urls: Vec<String> = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(url) = parse_url_line(line)
            && !urls.contains(&url)
        {
            urls.push(url);
        }
    }

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line into a normalized site root
pub fn parse_url_line(line: &str) -> Option<String> {
    match normalize_url(line) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Skipping invalid URL '{}': {}", line, e);
            None
        }
    }
}

pub fn parse_format(value: Option<&String>) -> ReportFormat {
    value
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

/// Build the audit settings from `audit` subcommand flags.
pub fn audit_config_from_args(args: &ArgMatches, show_progress: bool) -> AuditConfig {
    let mut config = AuditConfig::default()
        .with_include_subdomains(args.get_flag("include-subdomains"))
        .with_progress(show_progress);

    if let Some(max_pages) = args.get_one::<usize>("max-pages") {
        config = config.with_max_pages(*max_pages);
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config = config.with_timeout(*timeout);
    }

    config
}

/// Where the report for `site` goes. A single site writes to `base` as given;
/// in batch mode each site gets `<stem>-<host>.<ext>` next to it.
pub fn output_path_for(base: &Path, site: &str, batch: bool, format: ReportFormat) -> PathBuf {
    if !batch {
        return base.to_path_buf();
    }

    let host = Url::parse(site)
        .ok()
        .and_then(|u| {
            u.host_str().map(|h| match u.port() {
                Some(port) => format!("{}_{}", h, port),
                None => h.to_string(),
            })
        })
        .unwrap_or_else(|| "site".to_string());

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let extension = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| format.extension().to_string());

    base.with_file_name(format!("{}-{}.{}", stem, host, extension))
}

/// Read a request body from a file, `-` for stdin, or nothing.
pub fn read_request_body(source: Option<&String>) -> Result<String> {
    match source.map(String::as_str) {
        None => Ok(String::new()),
        Some("-") => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request body from stdin")?;
            Ok(body)
        }
        Some(path) => {
            let expanded = shellexpand::tilde(path);
            fs::read_to_string(expanded.as_ref())
                .with_context(|| format!("Failed to read request body from {}", path))
        }
    }
}

fn print_audit_summary(audit: &AuditResult) {
    let site = &audit.site;
    let sitemap = if site.technical.has_sitemap {
        "yes".green()
    } else {
        "no".yellow()
    };

    println!(
        "{} {}  pages: {}  sitemap: {}  findings: {}",
        "✓".green().bold(),
        site.root_url.bright_white(),
        audit.pages.len(),
        sitemap,
        audit.findings.len()
    );
}

fn emit_report(audit: &AuditResult, format: ReportFormat, output: Option<&Path>) -> Result<()> {
    let report = generate_report(audit, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }

    Ok(())
}

/// Run the `audit` subcommand. Returns how many sites failed.
pub async fn handle_audit(args: &ArgMatches, quiet: bool) -> Result<usize> {
    let urls = match load_urls_from_source(
        args.get_one::<String>("url"),
        args.get_one::<PathBuf>("hosts-file"),
    ) {
        Ok(urls) => urls,
        Err(e) => bail!(e),
    };

    let batch = args.get_one::<PathBuf>("hosts-file").is_some();
    let format = parse_format(args.get_one::<String>("format"));
    let jobs = args.get_one::<usize>("jobs").copied().unwrap_or(4).max(1);
    let output = args
        .get_one::<String>("output")
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()));

    let config = audit_config_from_args(args, !quiet && !batch);

    if batch && !quiet {
        println!(
            "{} Auditing {} sites ({} at a time)\n",
            "→".blue(),
            urls.len(),
            jobs
        );
    }

    let config_ref = &config;
    let mut results: Vec<(usize, String, siteaudit_core::Result<AuditResult>)> =
        stream::iter(urls.into_iter().enumerate())
            .map(|(idx, url)| async move {
                let result = run_audit(config_ref, &url).await;
                (idx, url, result)
            })
            .buffer_unordered(jobs)
            .collect()
            .await;
    results.sort_by_key(|(idx, _, _)| *idx);

    let mut failures = 0;
    for (_, url, result) in results {
        match result {
            Ok(audit) => {
                let path = output
                    .as_deref()
                    .map(|base| output_path_for(base, &audit.site.root_url, batch, format));

                if batch && path.is_none() && format == ReportFormat::Text {
                    print_audit_summary(&audit);
                } else {
                    emit_report(&audit, format, path.as_deref())?;
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red().bold(), url, e);
            }
        }
    }

    Ok(failures)
}

/// Run the `request` subcommand. Returns the response status.
pub async fn handle_request(args: &ArgMatches) -> Result<u16> {
    let method = args
        .get_one::<String>("method")
        .map(String::as_str)
        .unwrap_or("POST");
    let body = read_request_body(args.get_one::<String>("body"))?;

    let response = handle_audit_request(method, &body, &AuditConfig::default()).await;

    eprintln!("HTTP {}", response.status);
    println!(
        "{}",
        serde_json::to_string_pretty(&response.body).context("Failed to encode response")?
    );

    Ok(response.status)
}
