//! HTTP file generator - converts failed scenarios to .http format

use crate::report::ScenarioResult;
use crate::verdict::RequestSnapshot;

/// Generate .http file content from the failed scenarios in `results`.
///
/// Scenarios that failed before sending a request are listed as comments only.
pub fn to_http_file<'a>(results: impl IntoIterator<Item = &'a ScenarioResult>) -> String {
    let failed: Vec<&ScenarioResult> = results.into_iter().filter(|r| !r.passed()).collect();

    let mut lines = Vec::new();
    lines.push(format!(
        "# Auto-generated reproduction cases ({} failures)",
        failed.len()
    ));
    lines.push(String::new());

    for (idx, result) in failed.iter().enumerate() {
        let Some(failure) = &result.failure else {
            continue;
        };
        let status = failure
            .status_code()
            .map_or_else(|| "no response".to_string(), |s| s.to_string());
        lines.push(format!(
            "### [{idx}] {} - {} ({status})",
            result.name, failure.kind
        ));
        lines.push(format!("# {}", failure.message.replace('\n', " ")));

        match &failure.request {
            Some(request) => lines.push(request_to_http(request, None)),
            None => lines.push("# (no request captured)".to_string()),
        }

        lines.push(String::new());
        lines.push("###".to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Generate a single request as .http format
pub fn request_to_http(request: &RequestSnapshot, comment: Option<&str>) -> String {
    let mut lines = Vec::new();

    if let Some(c) = comment {
        lines.push(format!("### {c}"));
    }

    lines.push(format!("{} {}", request.method, request.url));

    let mut headers: Vec<_> = request
        .headers
        .iter()
        .filter(|(k, _)| !matches!(k.to_lowercase().as_str(), "host" | "content-length"))
        .collect();
    headers.sort();
    for (key, value) in headers {
        lines.push(format!("{key}: {value}"));
    }

    if let Some(body) = &request.body {
        if !request
            .headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("content-type"))
        {
            lines.push("Content-Type: application/json".to_string());
        }
        lines.push(String::new());
        lines.push(body.clone());
    }

    lines.join("\n")
}
