use crate::span::Span;
use thiserror::Error;

/// Failure taxonomy for one refactor invocation. Every variant is terminal:
/// no retry, no internal recovery, and a failed refactor queues zero edits.
#[derive(Debug, Error)]
pub enum RefactorError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("{msg}")]
    NotFound { msg: String },

    #[error("'{name}' is already in use in this scope")]
    Collision { name: String, span: Span },

    #[error("implementations are already in declaration order")]
    AlreadyInOrder,

    #[error("{msg}")]
    Malformed { msg: String },
}

impl RefactorError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound { msg: msg.into() }
    }

    pub fn collision(name: impl Into<String>, span: Span) -> Self {
        Self::Collision { name: name.into(), span }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed { msg: msg.into() }
    }
}

/// Render a RefactorError with ariadne for nice terminal output.
pub fn render_error(source: &str, _filename: &str, err: &RefactorError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        RefactorError::Syntax { msg, span } => {
            Report::build(ReportKind::Error, (), span.start)
                .with_message("syntax error")
                .with_label(Label::new(span.start..span.end).with_message(msg))
                .finish()
                .eprint(Source::from(source))
                .unwrap();
        }
        RefactorError::Collision { name, span } => {
            Report::build(ReportKind::Error, (), span.start)
                .with_message("name collision")
                .with_label(
                    Label::new(span.start..span.end)
                        .with_message(format!("'{name}' is already bound here")),
                )
                .finish()
                .eprint(Source::from(source))
                .unwrap();
        }
        RefactorError::NotFound { msg } | RefactorError::Malformed { msg } => {
            eprintln!("error: {msg}");
        }
        RefactorError::AlreadyInOrder => {
            eprintln!("error: {err}");
        }
    }
}
