//! Resolver config (Corefile) generation.
//!
//! The output is built as a fixed sequence of guarded directives. A guard
//! that does not hold still leaves its indented line behind; a final pass
//! collapses every run of whitespace-only lines, so the result never
//! contains blank lines and surviving lines keep their indentation.
//!
//! Output for a fixed input is byte-identical across calls.

use std::fmt::{self, Display, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{FilterEntry, RenderError, ResolverConfig};
use crate::filter::user_filter;

/// Runs of one or more whitespace-only line endings.
static BLANK_RUNS: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"([\t ]*\n)+"));

/// Renders the resolver config.
///
/// The user rules become filter 0 and are listed ahead of `filters`.
/// A filter is referenced only when it is enabled and has non-empty
/// contents; its path is `<filters_dir>/<id>.txt`.
///
/// # Errors
///
/// Returns [`RenderError`] only on internal failure.
pub fn render(
    resolver: &ResolverConfig,
    filters: &[FilterEntry],
    user_rules: &[String],
    filters_dir: &Path,
) -> Result<String, RenderError> {
    let user = user_filter(user_rules);
    let listed: Vec<&FilterEntry> = std::iter::once(&user).chain(filters).collect();

    let mut out = String::new();
    writeln!(out, ".:{} {{", resolver.port)?;
    write_filtering_block(&mut out, resolver, &listed, filters_dir)?;
    directive(&mut out, 1, Some(&resolver.pprof))?;
    directive(&mut out, 1, resolver.refuse_any.then_some("refuseany"))?;
    directive(
        &mut out,
        1,
        (resolver.ratelimit > 0).then(|| format!("ratelimit {}", resolver.ratelimit)),
    )?;
    directive(&mut out, 1, Some("hosts {"))?;
    directive(&mut out, 2, Some("fallthrough"))?;
    directive(&mut out, 1, Some("}"))?;
    directive(&mut out, 1, upstream_directive(resolver))?;
    directive(&mut out, 1, Some(&resolver.cache))?;
    directive(&mut out, 1, Some(&resolver.prometheus))?;
    out.push_str("}\n");

    collapse_blank_lines(&out)
}

fn write_filtering_block(
    out: &mut String,
    resolver: &ResolverConfig,
    filters: &[&FilterEntry],
    filters_dir: &Path,
) -> Result<(), RenderError> {
    if !resolver.protection_enabled {
        directive(out, 1, None::<&str>)?;
        return Ok(());
    }

    directive(out, 1, Some("dnsfilter {"))?;
    directive(out, 2, resolver.safebrowsing_enabled.then_some("safebrowsing"))?;
    directive(
        out,
        2,
        resolver
            .parental_enabled
            .then(|| format!("parental {}", resolver.parental_sensitivity)),
    )?;
    directive(out, 2, resolver.safesearch_enabled.then_some("safesearch"))?;
    directive(out, 2, resolver.querylog_enabled.then_some("querylog"))?;
    directive(
        out,
        2,
        Some(format!("blocked_ttl {}", resolver.blocked_response_ttl)),
    )?;
    if resolver.filtering_enabled {
        for filter in filters.iter().filter(|f| f.is_active()) {
            let path = filter.path(filters_dir);
            directive(
                out,
                2,
                Some(format!("filter {} \"{}\"", filter.id, path.display())),
            )?;
        }
    }
    directive(out, 1, Some("}"))?;
    Ok(())
}

fn upstream_directive(resolver: &ResolverConfig) -> Option<String> {
    if resolver.upstream_dns.is_empty() {
        return None;
    }
    Some(format!(
        "upstream {} {{ bootstrap {} }}",
        resolver.upstream_dns.join(" "),
        resolver.bootstrap_dns
    ))
}

/// Writes one indented line, leaving only the indentation when `text` is `None`.
fn directive(out: &mut String, depth: usize, text: Option<impl Display>) -> fmt::Result {
    for _ in 0..depth {
        out.push('\t');
    }
    if let Some(text) = text {
        write!(out, "{text}")?;
    }
    out.push('\n');
    Ok(())
}

fn collapse_blank_lines(text: &str) -> Result<String, RenderError> {
    let pattern = BLANK_RUNS.as_ref().map_err(|e| RenderError::Pattern(e.clone()))?;
    Ok(pattern.replace_all(text, "\n").into_owned())
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
