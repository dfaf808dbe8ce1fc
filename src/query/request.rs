//! REST request bodies for query execution

use quick_xml::escape::escape;

/// Content type of query and script requests
pub const QUERY_CONTENT_TYPE: &str = "application/query+xml";

/// Collapse line breaks so the query travels as a single line.
pub fn normalize_query_text(query: &str) -> String {
    query.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Inline form: `<query><text>…</text></query>`.
pub fn query_request_body(query: &str) -> String {
    format!(
        "<query><text>{}</text></query>",
        escape(normalize_query_text(query).as_str())
    )
}

/// Script form naming a query stored on the server, with bound external variables.
pub fn script_request_body(script_name: &str, variables: &[(&str, &str)]) -> String {
    let mut body = String::from("<run>");
    for (name, value) in variables {
        body.push_str(&format!(
            "<variable name=\"{}\" value=\"{}\"/>",
            escape(*name),
            escape(*value)
        ));
    }
    body.push_str(&format!("<text>{}</text></run>", escape(script_name)));
    body
}
