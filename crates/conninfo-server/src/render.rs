use chrono::SecondsFormat;

use crate::types::{ConnectionReport, HeaderEntry};

const PAGE_STYLE: &str = r#"
        * {
            box-sizing: border-box;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: #f5f5f5;
            color: #333;
        }
        h1 {
            color: #2c3e50;
            border-bottom: 2px solid #3498db;
            padding-bottom: 10px;
        }
        h2 {
            color: #34495e;
            margin-top: 30px;
            font-size: 1.2em;
        }
        section {
            background: white;
            padding: 20px;
            margin: 20px 0;
            border-radius: 8px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        .ip-address {
            font-size: 2em;
            font-weight: bold;
            color: #3498db;
            font-family: monospace;
            margin: 10px 0;
        }
        dl {
            display: grid;
            grid-template-columns: auto 1fr;
            gap: 8px 16px;
            margin: 0;
        }
        dt {
            font-weight: 600;
            color: #555;
        }
        dd {
            margin: 0;
            font-family: monospace;
            word-break: break-all;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            font-size: 0.9em;
        }
        th, td {
            text-align: left;
            padding: 8px 12px;
            border-bottom: 1px solid #eee;
        }
        th {
            background: #f8f9fa;
            font-weight: 600;
            color: #555;
        }
        td:first-child {
            font-weight: 500;
            white-space: nowrap;
        }
        td:last-child {
            font-family: monospace;
            word-break: break-all;
        }
        .timestamp {
            font-family: monospace;
            color: #666;
        }
        .raw-ua {
            font-size: 0.85em;
            color: #666;
            word-break: break-all;
        }
        @media (max-width: 600px) {
            body {
                padding: 10px;
            }
            dl {
                grid-template-columns: 1fr;
            }
            dt {
                margin-top: 10px;
            }
            .ip-address {
                font-size: 1.5em;
            }
        }
    "#;

/// Render the full HTML page for a connection report. Infallible: every
/// interpolated value is escaped, so any report renders.
pub fn render_page(report: &ConnectionReport) -> String {
    let browser = match &report.user_agent.browser_version {
        Some(version) => format!("{} {}", report.user_agent.browser, version),
        None => report.user_agent.browser.to_string(),
    };
    let raw_user_agent = if report.user_agent.raw.is_empty() {
        "(not provided)".to_string()
    } else {
        escape_html(&report.user_agent.raw)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Connection Info</title>
    <style>{style}</style>
</head>
<body>
    <h1>Connection Information</h1>

    <section id="ip">
        <h2>Your IP Address</h2>
        <p class="ip-address">{client_ip}</p>
    </section>

    <section id="request">
        <h2>Request Details</h2>
        <dl>
            <dt>Method</dt>
            <dd>{method}</dd>
            <dt>Path</dt>
            <dd>{path}</dd>
            <dt>Query Parameters</dt>
            <dd>{query_params}</dd>
        </dl>
    </section>

    <section id="useragent">
        <h2>Your Browser</h2>
        <dl>
            <dt>Browser</dt>
            <dd>{browser}</dd>
            <dt>Operating System</dt>
            <dd>{os}</dd>
            <dt>Raw User-Agent</dt>
            <dd class="raw-ua">{raw_user_agent}</dd>
        </dl>
    </section>

    <section id="headers">
        <h2>Request Headers</h2>
        <table>
            <thead>
                <tr>
                    <th>Header</th>
                    <th>Value</th>
                </tr>
            </thead>
            <tbody>
{header_rows}            </tbody>
        </table>
    </section>

    <section id="timestamp">
        <h2>Server Timestamp</h2>
        <p class="timestamp">{timestamp}</p>
    </section>
</body>
</html>"#,
        style = PAGE_STYLE,
        client_ip = escape_html(&report.client_ip),
        method = escape_html(&report.method),
        path = escape_html(&report.path),
        query_params = render_query_params(report),
        browser = escape_html(&browser),
        os = escape_html(&report.user_agent.os.to_string()),
        raw_user_agent = raw_user_agent,
        header_rows = render_header_rows(&report.headers),
        timestamp = report.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// `key=v1, v2` per key with a trailing space, sorted key order;
/// `(none)` when the query string was empty.
fn render_query_params(report: &ConnectionReport) -> String {
    if report.query_params.is_empty() {
        return "(none)".to_string();
    }
    let mut rendered = String::new();
    for (key, values) in &report.query_params {
        rendered.push_str(&escape_html(key));
        rendered.push('=');
        rendered.push_str(&escape_html(&values.join(", ")));
        rendered.push(' ');
    }
    rendered
}

fn render_header_rows(headers: &[HeaderEntry]) -> String {
    headers
        .iter()
        .map(|header| {
            format!(
                "                <tr>\n                    <td>{}</td>\n                    <td>{}</td>\n                </tr>\n",
                escape_html(&header.name),
                escape_html(&header.value)
            )
        })
        .collect()
}

/// Escape a value for interpolation into HTML text or attribute context.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use conninfo_core::{AddressSource, BrowserClassification};
    use std::collections::BTreeMap;

    fn sample_report() -> ConnectionReport {
        ConnectionReport {
            client_ip: "192.168.1.100".to_string(),
            address_source: AddressSource::Transport,
            remote_addr: "192.168.1.100:12345".to_string(),
            method: "GET".to_string(),
            path: "/".to_string(),
            query_params: BTreeMap::from([("test".to_string(), vec!["value".to_string()])]),
            headers: vec![
                HeaderEntry {
                    name: "accept".to_string(),
                    value: "text/html".to_string(),
                },
                HeaderEntry {
                    name: "host".to_string(),
                    value: "localhost".to_string(),
                },
            ],
            user_agent: BrowserClassification::from_user_agent(Some(
                "Mozilla/5.0 (Windows NT 10.0) Chrome/120.0",
            )),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap(),
        }
    }

    #[test]
    fn test_render_contains_report_contents() {
        let body = render_page(&sample_report());

        for expected in [
            "<!DOCTYPE html>",
            "Connection Information",
            "192.168.1.100",
            "GET",
            "Chrome",
            "120.0",
            "Windows 10",
            "accept",
            "text/html",
            "test=value",
            "2024-01-15T12:30:45Z",
        ] {
            assert!(body.contains(expected), "missing {expected:?} in page");
        }
    }

    #[test]
    fn test_render_escapes_hostile_values() {
        let mut report = sample_report();
        report.client_ip = "<script>alert('xss')</script>".to_string();
        report.query_params =
            BTreeMap::from([("<key>".to_string(), vec!["<value>".to_string()])]);
        report.headers = vec![HeaderEntry {
            name: "<header>".to_string(),
            value: "<script>bad</script>".to_string(),
        }];
        report.user_agent = BrowserClassification::from_user_agent(Some("<script>ua</script>"));

        let body = render_page(&report);

        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
        assert!(body.contains("&lt;key&gt;=&lt;value&gt;"));
    }

    #[test]
    fn test_render_empty_query_params() {
        let mut report = sample_report();
        report.query_params = BTreeMap::new();

        let body = render_page(&report);
        assert!(body.contains("(none)"));
    }

    #[test]
    fn test_render_missing_user_agent() {
        let mut report = sample_report();
        report.user_agent = BrowserClassification::from_user_agent(None);

        let body = render_page(&report);
        assert!(body.contains("(not provided)"));
        assert!(body.contains("Unknown"));
    }

    #[test]
    fn test_render_multiple_query_values_joined() {
        let mut report = sample_report();
        report.query_params = BTreeMap::from([(
            "tag".to_string(),
            vec!["a".to_string(), "b".to_string()],
        )]);

        let body = render_page(&report);
        assert!(body.contains("tag=a, b"));
    }

    #[test]
    fn test_escape_html_entities() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&#34;x&#34;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
