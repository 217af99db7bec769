//! Physical-line assembly and header decoding.
//!
//! CHAT files are line-oriented: `@` introduces metadata, `*` a main tier,
//! `%` a dependent tier. A physical line starting with none of these
//! continues the previous logical line.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    sequence::delimited,
    IResult,
};
use once_cell::sync::Lazy;
use regex::Regex;

use lalia_protocol::{Age, Headers, ParseWarning};

/// One logical line with the physical line number it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub number: usize,
    pub text: String,
}

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([^@:]+)(:\s+(\S[\S\s]*))?$").unwrap());

fn is_marker_char(c: char) -> bool {
    !c.is_whitespace() && c != ':'
}

/// `*CHI:` at the start of a main-tier line.
pub fn main_marker(input: &str) -> IResult<&str, &str> {
    delimited(char('*'), take_while1(is_marker_char), char(':'))(input)
}

/// `%mor:` at the start of a dependent-tier line.
pub fn tier_marker(input: &str) -> IResult<&str, &str> {
    let (rest, name) = delimited(char('%'), take_while1(is_marker_char), char(':'))(input)?;
    Ok((rest, name))
}

/// Merge continuation lines into their parent and drop blank lines.
/// A continuation with no parent is an unrecognized line.
pub fn assemble(text: &str) -> (Vec<LogicalLine>, Vec<ParseWarning>) {
    let mut lines: Vec<LogicalLine> = Vec::new();
    let mut warnings = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let mut line = raw.trim().to_string();
        if line.is_empty() {
            continue;
        }

        // Some corpora use %xpho/%xmod for the model tiers.
        if line.starts_with("%xpho:") || line.starts_with("%xmod:") {
            line = line.replacen("%x", "%", 1);
        }

        if line.starts_with(['@', '*', '%']) {
            lines.push(LogicalLine {
                number: i + 1,
                text: line,
            });
        } else if let Some(previous) = lines.last_mut() {
            previous.text.push(' ');
            previous.text.push_str(&line);
        } else {
            warnings.push(ParseWarning::UnrecognizedLine {
                line: i + 1,
                text: line,
            });
        }
    }

    (lines, warnings)
}

/// `DD-MMM-YYYY`, month case-insensitive (`01-FEB-1995`).
pub fn parse_chat_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().splitn(3, '-');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    let mut month_norm = String::with_capacity(month.len());
    for (i, c) in month.chars().enumerate() {
        if i == 0 {
            month_norm.extend(c.to_uppercase());
        } else {
            month_norm.extend(c.to_lowercase());
        }
    }
    let normalized = format!("{day}-{month_norm}-{year}");
    NaiveDate::parse_from_str(&normalized, "%d-%b-%Y")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%d-%B-%Y"))
        .ok()
}

/// Decode one `@` line into the running header state.
pub fn decode_header_line(
    line: &LogicalLine,
    headers: &mut Headers,
    warnings: &mut Vec<ParseWarning>,
) {
    let captures = match HEADER.captures(&line.text) {
        Some(c) => c,
        None => return,
    };
    let name = captures.get(1).map_or("", |m| m.as_str()).trim();
    let value = captures.get(3).map_or("", |m| m.as_str()).trim();

    if name == "Begin" || name == "End" || name == "UTF8" {
        return;
    }

    match name {
        "Participants" => {
            for entry in value.split(',') {
                let mut fields = entry.split_whitespace();
                let code = match fields.next() {
                    Some(c) => c,
                    None => continue,
                };
                let participant = headers.participants.entry(code.to_string()).or_default();
                if let Some(name) = fields.next() {
                    participant.name = name.to_string();
                }
                if let Some(role) = fields.next() {
                    participant.role = role.to_string();
                }
            }
        }
        "ID" => decode_id_line(value, headers),
        "Date" => match parse_chat_date(value) {
            Some(date) => {
                if !headers.dates_of_recording.contains(&date) {
                    headers.dates_of_recording.push(date);
                }
            }
            None => warnings.push(ParseWarning::BadHeaderDate {
                line: line.number,
                text: value.to_string(),
            }),
        },
        "Languages" => {
            headers.languages = value
                .split(',')
                .flat_map(str::split_whitespace)
                .map(str::to_string)
                .collect();
        }
        _ if name.starts_with("Birth of ") => {
            let code = name.trim_start_matches("Birth of ").trim();
            match parse_chat_date(value) {
                Some(date) => {
                    headers
                        .participants
                        .entry(code.to_string())
                        .or_default()
                        .birth = Some(date);
                }
                None => warnings.push(ParseWarning::BadHeaderDate {
                    line: line.number,
                    text: value.to_string(),
                }),
            }
        }
        _ => {
            headers.extra.insert(name.to_string(), value.to_string());
        }
    }
}

// @ID: language|corpus|code|age|sex|group|ses|role|education|custom|
fn decode_id_line(value: &str, headers: &mut Headers) {
    let columns: Vec<&str> = value.split('|').collect();
    if columns.len() < 8 {
        return;
    }
    let code = columns[2];
    let participant = headers.participants.entry(code.to_string()).or_default();

    participant.age = Age::parse(columns[3]);
    if !columns[7].is_empty() {
        participant.role = columns[7].to_string();
    }

    let mut fields = BTreeMap::new();
    for (key, index) in [
        ("language", 0),
        ("corpus", 1),
        ("sex", 4),
        ("group", 5),
        ("ses", 6),
        ("education", 8),
        ("custom", 9),
    ] {
        if let Some(v) = columns.get(index) {
            if !v.is_empty() {
                fields.insert(key.to_string(), v.to_string());
            }
        }
    }
    participant.fields.extend(fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_lines_merge() {
        let (lines, warnings) = assemble("*CHI:\tthis is a\n\tlong utterance .\n%mor:\tx\n");
        assert!(warnings.is_empty());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "*CHI:\tthis is a long utterance .");
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn leading_continuation_warns() {
        let (lines, warnings) = assemble("orphan text\n@Begin\n");
        assert_eq!(lines.len(), 1);
        assert!(matches!(
            warnings[0],
            ParseWarning::UnrecognizedLine { line: 1, .. }
        ));
    }

    #[test]
    fn markers_parse() {
        assert_eq!(main_marker("*CHI:\thi ."), Ok(("\thi .", "CHI")));
        assert_eq!(tier_marker("%mor:\tco|hi ."), Ok(("\tco|hi .", "mor")));
        assert!(main_marker("%mor:\tx").is_err());
    }

    #[test]
    fn dates_parse_case_insensitively() {
        assert_eq!(
            parse_chat_date("01-FEB-1995"),
            NaiveDate::from_ymd_opt(1995, 2, 1)
        );
        assert_eq!(
            parse_chat_date("25-Dec-2001"),
            NaiveDate::from_ymd_opt(2001, 12, 25)
        );
        assert_eq!(parse_chat_date("not a date"), None);
    }

    #[test]
    fn participants_and_id_merge() {
        let mut headers = Headers::default();
        let mut warnings = Vec::new();
        for text in [
            "@Participants:\tCHI Eve Target_Child , MOT Sue Mother",
            "@ID:\teng|Brown|CHI|1;6.|female|||Target_Child||",
            "@Birth of CHI:\t01-JAN-1960",
        ] {
            decode_header_line(
                &LogicalLine {
                    number: 1,
                    text: text.to_string(),
                },
                &mut headers,
                &mut warnings,
            );
        }
        assert!(warnings.is_empty());
        let chi = &headers.participants["CHI"];
        assert_eq!(chi.name, "Eve");
        assert_eq!(chi.role, "Target_Child");
        assert_eq!(chi.age.unwrap().to_months(), 18.0);
        assert_eq!(chi.birth, NaiveDate::from_ymd_opt(1960, 1, 1));
        assert_eq!(chi.fields["sex"], "female");
        assert_eq!(headers.participants["MOT"].role, "Mother");
    }

    #[test]
    fn unknown_header_goes_to_extra() {
        let mut headers = Headers::default();
        let mut warnings = Vec::new();
        decode_header_line(
            &LogicalLine {
                number: 4,
                text: "@Situation:\tbreakfast table".to_string(),
            },
            &mut headers,
            &mut warnings,
        );
        assert_eq!(headers.extra["Situation"], "breakfast table");
    }

    #[test]
    fn bad_date_warns() {
        let mut headers = Headers::default();
        let mut warnings = Vec::new();
        decode_header_line(
            &LogicalLine {
                number: 7,
                text: "@Date:\tsometime in spring".to_string(),
            },
            &mut headers,
            &mut warnings,
        );
        assert!(matches!(
            warnings[0],
            ParseWarning::BadHeaderDate { line: 7, .. }
        ));
    }
}
