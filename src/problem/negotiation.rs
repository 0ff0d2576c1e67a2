// Start of file: /src/problem/negotiation.rs

/*
    * Accept header negotiation for problem representations.
    *
    * The client's media ranges are matched against `NEGOTIATION_PRIORITIES`:
    *
    * - a range matches a priority when type and subtype are equal, or the range
    *   uses `*` for them; `+suffix` subtypes also match when either side
    *   wildcards the part before the `+` (`vnd.api+json` matches the `*+json`
    *   wildcard subtype)
    * - every parameter of the range (other than `q`) must be present on the
    *   priority
    * - for each priority, the most specific matching range decides its quality
    * - the highest quality wins, ties go to the earlier priority
    * - a quality of `0` means "not acceptable"
*/

use std::cmp::Ordering;

use axum::http::{header::ACCEPT, HeaderMap};

/// Media types a problem can be rendered as, in order of preference.
pub const NEGOTIATION_PRIORITIES: [&str; 4] = [
    "application/json",
    "application/*+json",
    "application/xml",
    "application/*+xml",
];

/// Wire format of a problem response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemFormat {
    Json,
    Xml,
}

impl ProblemFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/problem+json",
            Self::Xml => "application/problem+xml",
        }
    }
}

/// A single media range from an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub type_: String,
    pub subtype: String,
    pub params: Vec<(String, String)>,
    pub quality: f32,
}

impl MediaRange {
    /// Parses `type/subtype;param=value;q=0.5`. A bare `*` means `*/*`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(';');

        let essence: &str = parts.next()?.trim();
        let essence: &str = if essence == "*" { "*/*" } else { essence };
        let (type_, subtype) = essence.split_once('/')?;
        let (type_, subtype) = (type_.trim(), subtype.trim());
        if type_.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }

        let mut params: Vec<(String, String)> = Vec::new();
        let mut quality: f32 = 1.0;

        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let key: String = key.trim().to_ascii_lowercase();
            let value: &str = value.trim().trim_matches('"');

            if key == "q" {
                // Unparseable qualities count as 0.
                quality = value.parse::<f32>().unwrap_or(0.0).clamp(0.0, 1.0);
            } else {
                params.push((key, value.to_owned()));
            }
        }

        Some(Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params,
            quality,
        })
    }

    fn has_params_of(&self, other: &MediaRange) -> bool {
        other.params.iter().all(|param| self.params.contains(param))
    }
}

/// Splits an `Accept` value into its media ranges, skipping malformed ones.
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(MediaRange::parse)
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Match {
    quality: f32,
    score: u32,
    index: usize,
}

fn split_suffix(subtype: &str) -> (&str, &str) {
    subtype.split_once('+').unwrap_or((subtype, ""))
}

fn match_range(accept: &MediaRange, priority: &MediaRange, index: usize) -> Option<Match> {
    if !priority.has_params_of(accept) {
        return None;
    }

    let base_equal: bool = accept.type_ == priority.type_;
    let sub_equal: bool = accept.subtype == priority.subtype;
    let base_matches: bool = accept.type_ == "*" || base_equal;
    let shared_params: u32 = accept.params.len() as u32;
    let quality: f32 = accept.quality * priority.quality;

    if base_matches && (accept.subtype == "*" || sub_equal) {
        return Some(Match {
            quality,
            score: 100 * u32::from(base_equal) + 10 * u32::from(sub_equal) + shared_params,
            index,
        });
    }

    if !accept.subtype.contains('+') || !priority.subtype.contains('+') {
        return None;
    }

    let (accept_sub, accept_plus) = split_suffix(&accept.subtype);
    let (priority_sub, priority_plus) = split_suffix(&priority.subtype);
    let any_wildcard: bool =
        accept_sub == "*" || priority_sub == "*" || accept_plus == "*" || priority_plus == "*";

    if !base_matches || !any_wildcard {
        return None;
    }

    let sub_equal: bool = accept_sub == priority_sub;
    let plus_equal: bool = accept_plus == priority_plus;

    let sub_matches: bool = accept_sub == "*" || priority_sub == "*" || sub_equal;
    let plus_matches: bool = accept_plus == "*" || priority_plus == "*" || plus_equal;

    (sub_matches && plus_matches).then_some(Match {
        quality,
        score: 100 * u32::from(base_equal)
            + 10 * u32::from(sub_equal)
            + u32::from(plus_equal)
            + shared_params,
        index,
    })
}

/// Picks the best of `priorities` for an `Accept` value; `None` when nothing is
/// acceptable.
pub fn negotiate<'a>(accept: &str, priorities: &[&'a str]) -> Option<&'a str> {
    let ranges: Vec<MediaRange> = parse_accept(accept);
    let parsed: Vec<Option<MediaRange>> = priorities.iter().map(|p| MediaRange::parse(p)).collect();

    // Most specific matching range per priority.
    let mut best_per_priority: Vec<Option<Match>> = vec![None; priorities.len()];
    for range in &ranges {
        for (index, priority) in parsed.iter().enumerate() {
            let Some(priority) = priority else {
                continue;
            };
            let Some(found) = match_range(range, priority, index) else {
                continue;
            };
            match best_per_priority[index] {
                Some(current) if current.score >= found.score => {}
                _ => best_per_priority[index] = Some(found),
            }
        }
    }

    best_per_priority
        .into_iter()
        .flatten()
        .filter(|m| m.quality > 0.0)
        .min_by(|a, b| {
            b.quality
                .partial_cmp(&a.quality)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        })
        .map(|m| priorities[m.index])
}

/// The request's `Accept` value; all header lines joined, `*/*` when absent or empty.
pub fn accept_value(headers: &HeaderMap) -> String {
    let joined: String = headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<&str>>()
        .join(", ");

    if joined.trim().is_empty() {
        "*/*".to_owned()
    } else {
        joined
    }
}

/// Whether any problem representation is acceptable to the client.
pub fn can_negotiate(headers: &HeaderMap) -> bool {
    negotiate(&accept_value(headers), &NEGOTIATION_PRIORITIES).is_some()
}

/// Representation for a problem response. Anything that does not negotiate to a
/// JSON type, including a failed negotiation, is rendered as XML.
pub fn negotiate_format(headers: &HeaderMap) -> ProblemFormat {
    match negotiate(&accept_value(headers), &NEGOTIATION_PRIORITIES) {
        Some(media_type) if media_type.contains("json") => ProblemFormat::Json,
        _ => ProblemFormat::Xml,
    }
}


// End of file: /src/problem/negotiation.rs
