// Start of file: /src/problem/status.rs

// * Status normalization and the default title / type tables.

/// Title used when a status code has no entry in the table.
pub const UNKNOWN_TITLE: &str = "Unknown Error";

/// Any status outside the client/server error classes becomes 500.
pub fn normalize_status(status: i64) -> u16 {
    match status {
        400..=599 => status as u16,
        _ => 500,
    }
}

/// Canonical title for every standard 4xx/5xx status (plus 444, 499 and 599).
pub fn title_for_status(status: u16) -> Option<&'static str> {
    let title: &'static str = match status {
        // 4xx Client Error
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "Request-URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        444 => "Connection Closed Without Response",
        451 => "Unavailable For Legal Reasons",
        499 => "Client Closed Request",
        // 5xx Server Error
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        599 => "Network Connect Timeout Error",
        _ => return None,
    };

    Some(title)
}

/// Default title, falling back to [`UNKNOWN_TITLE`] for table misses.
pub fn default_title(status: u16) -> &'static str {
    title_for_status(status).unwrap_or(UNKNOWN_TITLE)
}

/// Default documentation URI for a status.
pub fn default_type(status: u16) -> String {
    format!("https://httpstatus.es/{status}")
}


// End of file: /src/problem/status.rs
