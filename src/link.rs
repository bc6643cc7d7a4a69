use crate::error::AnalyzerError;

/// Extract the playlist id from a sharable link of the form
/// `https://<host>/playlist/<id>?si=<token>`.
///
/// This is the lenient parser: only the `/playlist/<id>` path segment is
/// required, and any query string is ignored.
pub fn parse_playlist_url(url: &str) -> Result<String, AnalyzerError> {
    let (_, rest) = url.split_once("/playlist/").ok_or_else(|| {
        AnalyzerError::Validation(format!("'{url}' does not contain a /playlist/ segment"))
    })?;

    let id = rest.split(['?', '/', '#']).next().unwrap_or("");
    if id.is_empty() {
        return Err(AnalyzerError::Validation(format!(
            "'{url}' has an empty playlist id"
        )));
    }

    Ok(id.to_string())
}

/// Strict variant: additionally requires a non-empty `si=` share token in
/// the query string, the form the catalog's share button produces.
pub fn parse_playlist_url_strict(url: &str) -> Result<String, AnalyzerError> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
    let has_share_token = query
        .split('&')
        .any(|pair| pair.starts_with("si=") && pair.len() > "si=".len());

    if !has_share_token {
        return Err(AnalyzerError::Validation(format!(
            "'{url}' is missing the si= share token required in strict mode"
        )));
    }

    parse_playlist_url(url)
}
