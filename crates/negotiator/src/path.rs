/// A request path split along the on-disk naming grammar
/// `<dir><base_name>(.<segment>)*<query>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// Always starts and ends with `/`.
    pub dir_name: String,
    /// Percent-decoded; `"index"` when the path names a directory.
    pub base_name: String,
    /// Percent-decoded; empty or starting with `.`.
    pub extension_string: String,
    /// `base_name` + `extension_string`, the literally requested file name.
    pub file_name: String,
    /// Empty or starting with `?`.
    pub query_string: String,
}

/// The character set allowed in path and file name segments (dots and slashes
/// act as structure, not content). Kept identical to the historical grammar
/// for compatibility: word characters plus `-~%!$&'()*+,;=:@`.
pub fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '-' | '~' | '%' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';'
                | '=' | ':' | '@'
        )
}

/// Splits a request path into directory, base name, extension segments and
/// query string. Returns `None` when the path falls outside the grammar, in
/// which case the request is passed through untouched.
pub fn parse_request_path(path_and_query: &str) -> Option<ParsedPath> {
    let (path, query) = match path_and_query.find('?') {
        Some(mark) => path_and_query.split_at(mark),
        None => (path_and_query, ""),
    };
    if !path.starts_with('/') {
        return None;
    }
    let last_slash = path.rfind('/')?;
    let (dir_name, file_part) = path.split_at(last_slash + 1);
    for segment in dir_name[1..].split_terminator('/') {
        if segment.is_empty() || !segment.chars().all(|c| is_segment_char(c) || c == '.') {
            return None;
        }
    }
    if !file_part.chars().all(|c| is_segment_char(c) || c == '.') {
        return None;
    }
    let (base, extensions) = match file_part.find('.') {
        Some(dot) => file_part.split_at(dot),
        None => (file_part, ""),
    };
    let base_name = if base.is_empty() {
        "index".to_string()
    } else {
        percent_decode(base)
    };
    let extension_string = percent_decode(extensions);
    let file_name = format!("{base_name}{extension_string}");
    Some(ParsedPath {
        dir_name: dir_name.to_string(),
        base_name,
        extension_string,
        file_name,
        query_string: query.to_string(),
    })
}

/// Lenient `%XX` decoding: malformed escapes are kept verbatim instead of
/// failing the request.
pub fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push(high * 16 + low);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(decoded).unwrap_or_else(|_| input.to_string())
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
