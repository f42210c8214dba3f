//! Best-effort cleanup of model text into something `serde_json` can read.
//!
//! This is a heuristic and not a parser. Fences tagged with other languages or
//! prose around the array are not handled and will surface as a parse error later.

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Removal repeats until nothing changes, since dropping one token can join its
/// neighbours into another (`jsjsonon`, or a fence split by a newline).
pub fn sanitize_completion(raw: &str) -> String {
    let mut flattened = raw.to_string();
    loop {
        let next = flattened.replace(FENCE, "").replace(JSON_TAG, "").replace('\n', "");
        if next == flattened {
            break;
        }
        flattened = next;
    }
    strip_comments(&flattened)
}

/// Replaces `//` and `/* */` comments outside string literals with spaces.
/// An unterminated comment runs to the end of input.
pub fn strip_comments(input: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str,
        StrEscape,
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(input.len());
    let mut state = State::Code;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => {
                let next = chars.peek().copied();
                match (c, next) {
                    ('"', _) => {
                        state = State::Str;
                        out.push(c);
                    }
                    ('/', Some('/')) => {
                        chars.next();
                        out.push_str("  ");
                        state = State::LineComment;
                    }
                    ('/', Some('*')) => {
                        chars.next();
                        out.push_str("  ");
                        state = State::BlockComment;
                    }
                    _ => out.push(c),
                }
            }
            State::Str => {
                match c {
                    '\\' => {
                        state = State::StrEscape;
                    }
                    '"' => {
                        state = State::Code;
                    }
                    _ => {}
                }
                out.push(c);
            }
            State::StrEscape => {
                state = State::Str;
                out.push(c);
            }
            State::LineComment => {
                if c == '\n' || c == '\r' {
                    state = State::Code;
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek().copied() == Some('/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' || c == '\r' {
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_tag_and_newlines() {
        let raw = "```json\n[{\"name\":\"RustConf\"}]\n```";
        assert_eq!(sanitize_completion(raw), "[{\"name\":\"RustConf\"}]");
    }

    #[test]
    fn keeps_urls_inside_strings() {
        let raw = "[{\"eventUrl\":\"https://rustconf.com/2025\"}]";
        assert_eq!(sanitize_completion(raw), raw);
    }

    #[test]
    fn blanks_block_comments() {
        let cleaned = sanitize_completion("[1, /* second */ 2]");
        let parsed: Vec<u32> = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed, vec![1, 2]);
    }

    #[test]
    fn line_comment_runs_to_end_once_newlines_are_gone() {
        let cleaned = sanitize_completion("[1, 2]\n// trailing note");
        let parsed: Vec<u32> = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed, vec![1, 2]);
    }

    #[test]
    fn escaped_quotes_do_not_end_the_string() {
        let raw = r#"["say \"//hi\""]"#;
        assert_eq!(strip_comments(raw), raw);
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        let inputs = [
            "```json\n[{\"name\":\"X\"}]\n```",
            "[1, /* c */ 2] // done",
            "[\"a//b\", \"c/*d*/\"]",
            "not json at all",
            "[\"jsjsonon\"]",
            "[1]`\n``",
        ];
        for raw in inputs {
            let once = sanitize_completion(raw);
            assert_eq!(sanitize_completion(&once), once, "input: {}", raw);
        }
    }

    #[test]
    fn removal_that_forms_a_new_token_is_repeated() {
        assert_eq!(sanitize_completion("[\"jsjsonon\"]"), "[\"\"]");
        assert_eq!(sanitize_completion("[1]`\n``"), "[1]");
    }
}
