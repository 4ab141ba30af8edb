//! Printf-style directive expansion for console format strings.
//!
//! When the first argument is a string containing `%s %d %i %f %o %O %c`
//! (optionally with a `.N` precision) or `%%`, the following arguments are
//! consumed left to right:
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `%s` | argument text |
//! | `%d`, `%i` | integer part of a number or numeric string, else `NaN` |
//! | `%f` | number, `%.Nf` fixes N decimals, non-numbers give `NaN` |
//! | `%o`, `%O` | objects become their own parameter, anything else its text |
//! | `%c` | argument goes to `styles` and styles the text that follows |
//! | `%%` | a literal `%` |
//!
//! Directives without an argument left render literally; arguments left
//! over after the template are appended, space separated. Anything else
//! after a `%` is ordinary text.
//!
//! Styles stay aligned with the text segments they apply to, the way the
//! producer splits them: text before the first `%c` gets an empty style, and
//! a `%c` whose segment turns out empty is superseded by the next `%c` (or
//! dropped at the end of the template).

use std::sync::OnceLock;

use regex::Regex;

use crate::prepare::Parameter;
use crate::types::{format_number, Literal};

fn directive_re() -> &'static Regex {
    static DIRECTIVE_RE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE_RE.get_or_init(|| {
        Regex::new(r"%%|%(?:\.(\d+))?([sdifoOc])").expect("valid directive regex")
    })
}

/// Whether `template` contains at least one directive.
pub fn has_directives(template: &str) -> bool {
    directive_re().is_match(template)
}

/// Result of formatting an argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatted {
    pub parameters: Vec<Parameter>,
    /// One entry per leading parameter produced by the template when the
    /// template contained a `%c`; empty otherwise. Unstyled leading text
    /// gets `""`.
    pub styles: Vec<String>,
    pub text: String,
}

impl Formatted {
    /// Arguments shown as-is, space separated.
    pub fn plain(parameters: Vec<Parameter>) -> Formatted {
        let text = parameters
            .iter()
            .map(Parameter::to_text)
            .collect::<Vec<_>>()
            .join(" ");
        Formatted {
            parameters,
            styles: Vec::new(),
            text,
        }
    }

    /// Arguments whose `%c` styles were already split out by the producer:
    /// the first `styles.len()` parameters are styled segments shown back to
    /// back, the rest follow space separated.
    pub fn pre_styled(parameters: Vec<Parameter>, styles: Vec<String>) -> Formatted {
        let styled = styles.len().min(parameters.len());
        let head: String = parameters[..styled].iter().map(Parameter::to_text).collect();
        let text = join_texts(&parameters[styled..], head);
        Formatted {
            parameters,
            styles,
            text,
        }
    }
}

fn join_texts(parameters: &[Parameter], mut text: String) -> String {
    for parameter in parameters {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&parameter.to_text());
    }
    text
}

/// Expand directives in the first argument if it is a template; otherwise
/// show the arguments as-is.
pub fn format_arguments(arguments: Vec<Parameter>) -> Formatted {
    let mut rest = arguments.into_iter();
    let template = match rest.next() {
        Some(Parameter::Text(s)) if has_directives(&s) => s,
        first => return Formatted::plain(first.into_iter().chain(rest).collect()),
    };

    let mut segments = Segments::default();
    let mut last = 0;
    for caps in directive_re().captures_iter(&template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        segments.push_str(&template[last..whole.start()]);
        last = whole.end();

        if whole.as_str() == "%%" {
            segments.push_str("%");
            continue;
        }
        // Precision beyond what `format!` accepts leaves the directive literal.
        let precision = match caps.get(1).map(|m| m.as_str().parse::<u16>()) {
            None => None,
            Some(Ok(digits)) => Some(usize::from(digits)),
            Some(Err(_)) => {
                segments.push_str(whole.as_str());
                continue;
            }
        };
        let Some(argument) = rest.next() else {
            segments.push_str(whole.as_str());
            continue;
        };
        match caps.get(2).map_or("", |m| m.as_str()) {
            "c" => segments.set_style(match argument {
                Parameter::Text(css) => css,
                _ => String::new(),
            }),
            "s" => segments.push_str(&argument.to_text()),
            "d" | "i" => segments.push_str(&as_integer(&argument)),
            "f" => segments.push_str(&as_float(&argument, precision)),
            "o" | "O" => match argument {
                Parameter::Front(_) => segments.push_parameter(argument),
                other => segments.push_str(&other.to_text()),
            },
            _ => segments.push_str(whole.as_str()),
        }
    }
    segments.push_str(&template[last..]);

    let mut formatted = segments.finish();
    let leftovers: Vec<Parameter> = rest.collect();
    formatted.text = join_texts(&leftovers, formatted.text);
    formatted.parameters.extend(leftovers);
    formatted
}

#[derive(Default)]
struct Segments {
    parts: Vec<(Parameter, Option<String>)>,
    current: String,
    style: Option<String>,
    styled: bool,
}

impl Segments {
    fn push_str(&mut self, s: &str) {
        self.current.push_str(s);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let text = std::mem::take(&mut self.current);
            self.parts.push((Parameter::Text(text), self.style.clone()));
        }
    }

    fn set_style(&mut self, css: String) {
        self.flush();
        self.style = Some(css);
        self.styled = true;
    }

    fn push_parameter(&mut self, parameter: Parameter) {
        self.flush();
        self.parts.push((parameter, self.style.clone()));
    }

    fn finish(mut self) -> Formatted {
        self.flush();
        let text = self.parts.iter().map(|(p, _)| p.to_text()).collect();
        let styles = if self.styled {
            self.parts
                .iter()
                .map(|(_, style)| style.clone().unwrap_or_default())
                .collect()
        } else {
            Vec::new()
        };
        Formatted {
            parameters: self.parts.into_iter().map(|(p, _)| p).collect(),
            styles,
            text,
        }
    }
}

fn as_integer(argument: &Parameter) -> String {
    let value = match argument {
        Parameter::Number(n) => Some(*n),
        Parameter::Text(s) => parse_leading_number(s, false),
        Parameter::Literal(Literal::BigInt { text }) => return text.clone(),
        Parameter::Literal(Literal::NegativeZero) => Some(0.0),
        _ => None,
    };
    match value {
        Some(n) if n.is_finite() => format_number(n.trunc() + 0.0),
        _ => "NaN".to_string(),
    }
}

fn as_float(argument: &Parameter, precision: Option<usize>) -> String {
    let value = match argument {
        Parameter::Number(n) => Some(*n),
        Parameter::Text(s) => parse_leading_number(s, true),
        Parameter::Literal(Literal::Infinity) => Some(f64::INFINITY),
        Parameter::Literal(Literal::NegativeInfinity) => Some(f64::NEG_INFINITY),
        Parameter::Literal(Literal::NegativeZero) => Some(-0.0),
        _ => None,
    };
    match (value, precision) {
        (Some(n), Some(digits)) if n.is_finite() => format!("{n:.digits$}"),
        (Some(n), _) => format_number(n),
        (None, _) => "NaN".to_string(),
    }
}

/// Parse the numeric prefix of `s` (after leading whitespace), the way
/// `parseInt` / `parseFloat` do.
fn parse_leading_number(s: &str, fractional: bool) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if fractional && !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
