use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Character offsets `start..end` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

/// Where in the token stream a parse error was detected.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    End,
    Lexeme(String),
}

impl Location {
    pub fn of(token: &Token) -> Self {
        if token.token_type == TokenType::Eof {
            Location::End
        } else {
            Location::Lexeme(token.lexeme.clone())
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Location::End => write!(f, " at end"),
            Location::Lexeme(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PloxError {
    #[error("[line {line}] Error: {message}")]
    Scan {
        line: usize,
        span: Span,
        message: String,
    },
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        line: usize,
        span: Span,
        location: Location,
        message: String,
        help: Option<String>,
    },
    #[error("{message}\n[line {line}]")]
    Runtime {
        line: usize,
        span: Span,
        message: String,
        help: Option<String>,
    },
}

impl PloxError {
    pub fn scan_error(line: usize, span: Span, message: impl Into<String>) -> Self {
        PloxError::Scan {
            line,
            span,
            message: message.into(),
        }
    }

    pub fn parse_error(token: &Token, message: impl Into<String>) -> Self {
        PloxError::Parse {
            line: token.line,
            span: token.span,
            location: Location::of(token),
            message: message.into(),
            help: None,
        }
    }

    pub fn parse_error_with_help(
        token: &Token,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        PloxError::Parse {
            line: token.line,
            span: token.span,
            location: Location::of(token),
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn runtime_error(token: &Token, message: impl Into<String>) -> Self {
        PloxError::Runtime {
            line: token.line,
            span: token.span,
            message: message.into(),
            help: None,
        }
    }

    pub fn runtime_error_with_help(
        token: &Token,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        PloxError::Runtime {
            line: token.line,
            span: token.span,
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            PloxError::Scan { line, .. }
            | PloxError::Parse { line, .. }
            | PloxError::Runtime { line, .. } => *line,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            PloxError::Scan { span, .. }
            | PloxError::Parse { span, .. }
            | PloxError::Runtime { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            PloxError::Scan { message, .. }
            | PloxError::Parse { message, .. }
            | PloxError::Runtime { message, .. } => message,
        }
    }

    pub fn help(&self) -> Option<&str> {
        match self {
            PloxError::Scan { .. } => None,
            PloxError::Parse { help, .. } | PloxError::Runtime { help, .. } => help.as_deref(),
        }
    }

    /// Scan and parse errors gate execution; runtime errors do not.
    pub fn is_compile_time(&self) -> bool {
        !matches!(self, PloxError::Runtime { .. })
    }

    /// Renders a colored report with the offending span labelled, to stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) -> std::io::Result<()> {
        let filename = filename.unwrap_or("<repl>");

        let (color, kind_str) = match self {
            PloxError::Scan { .. } => (Color::Red, "Lexical Error"),
            PloxError::Parse { .. } => (Color::Yellow, "Parse Error"),
            PloxError::Runtime { .. } => (Color::Magenta, "Runtime Error"),
        };

        // An EOF span sits past the last character; point at that character instead.
        let length = source.chars().count();
        let span = self.span();
        let start = span.start.min(length.saturating_sub(1));
        let end = span.end.max(start + 1).min(length);

        let mut report_builder = Report::build(ReportKind::Error, filename, start)
            .with_message(format!(
                "{} [line {}]: {}",
                kind_str.fg(color),
                self.line(),
                self.message()
            ))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(self.message())
                    .with_color(color),
            );

        if let Some(help_text) = self.help() {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .eprint((filename, Source::from(source)))
    }
}
