/// Translation-time failures. Any of these aborts the whole translation.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationError {
    UnknownField(String),
    UnsupportedConstruct(String),
    InvalidRangeValue(String),
    // IN list with no elements at all, under the reject policy
    EmptyValueList(String),
    ExpressionTooDeep(usize),
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::UnknownField(field) => {
                write!(f, "Unknown field: {} is not in the field type registry", field)
            }
            TranslationError::UnsupportedConstruct(kind) => {
                write!(f, "Unsupported construct: {}", kind)
            }
            TranslationError::InvalidRangeValue(value) => {
                write!(f, "Range argument must be a number, yet it is: {}", value)
            }
            TranslationError::EmptyValueList(field) => {
                write!(f, "Empty value list: IN () on field {} has no values", field)
            }
            TranslationError::ExpressionTooDeep(limit) => {
                write!(f, "Expression too deep: nesting exceeds {} levels", limit)
            }
        }
    }
}

impl std::error::Error for TranslationError {}

/// Failure to turn condition text into an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    // Character offset into the condition text
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at position {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Either stage of text-to-query translation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    Parse(ParseError),
    Translation(TranslationError),
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        QueryError::Parse(err)
    }
}

impl From<TranslationError> for QueryError {
    fn from(err: TranslationError) -> Self {
        QueryError::Translation(err)
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Parse(err) => write!(f, "{}", err),
            QueryError::Translation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Parse(err) => Some(err),
            QueryError::Translation(err) => Some(err),
        }
    }
}
