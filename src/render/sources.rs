use super::heading;
use crate::core::types::Source;
use colored::*;
use url::Url;

pub fn sources(sources: &[Source]) -> String {
    let mut out = heading("Data Sources");
    out.push_str(&format!(
        "{}\n",
        "The summary above was generated using information from the following web pages."
            .dimmed()
    ));
    for (i, source) in sources.iter().enumerate() {
        let title = if source.title.is_empty() {
            "Untitled Source"
        } else {
            source.title.as_str()
        };
        out.push_str(&format!(
            "{:>3}. {} {}\n     {}\n",
            i + 1,
            title.bold(),
            format!("({})", display_host(&source.uri)).dimmed(),
            source.uri.blue().underline()
        ));
    }
    out
}

/// Host name of `uri`, or the URI itself when it does not parse.
pub fn display_host(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| uri.to_string())
}
