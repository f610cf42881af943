use std::fmt;

use lalrpop_util::ParseError as LalrpopError;

use crate::meta::Meta;

/// every diagnostic the reader and the semantic analysis can report,
/// Display renders the exact message printed for the user
#[derive(Debug, PartialEq, Clone)]
pub enum FrontendErrorKind {
    ParseError { message: String },
    SystemError { message: String },

    // class hierarchy
    BasicClassRedefined { class: String },
    ClassRedefined { class: String },
    IllegalParent { class: String, parent: String },
    UndefinedParent { class: String, parent: String },
    InheritanceCycle,
    MainClassMissing,
    MainMethodMissing,
    MainMethodArguments,

    // declarations
    SelfAttribute,
    AttributeRedefined { attr: String },
    AttributeInherited { attr: String },
    UndefinedAttributeType { attr: String, t: String },
    MethodRedefined { method: String },
    OverrideReturnType { method: String, actual: String, expected: String },
    OverrideArity { method: String },
    OverrideParamType { method: String, actual: String, expected: String },
    UndefinedReturnType { method: String, t: String },
    SelfFormal,
    SelfTypeFormal { formal: String },
    FormalRedefined { formal: String },
    UndefinedFormalType { formal: String, t: String },

    // expressions
    UndeclaredIdentifier { ident: String },
    AssignToSelf,
    AssignToUndeclared { ident: String },
    AssignmentMismatch { ident: String, declared: String, actual: String },
    InitializerMismatch { ident: String, declared: String, actual: String },
    ReturnMismatch { method: String, declared: String, actual: String },
    NonBoolPredicate { construct: &'static str },
    NonIntArguments { left: String, op: &'static str, right: String },
    NonIntArgument { actual: String },
    NonBoolArgument { actual: String },
    IllegalComparison,
    UndefinedNew { t: String },
    UndefinedDispatchClass { t: String },
    UndefinedMethod { method: String },
    StaticDispatchMismatch { actual: String, expected: String },
    WrongArgumentCount { method: String },
    ArgumentMismatch { method: String, actual: String, formal: String, expected: String },
    SelfLetBinding,
    UndefinedLetType { ident: String, t: String },
    SelfCaseBinding,
    UndefinedBranchType { t: String },
    DuplicateBranch { t: String },
}

impl FrontendErrorKind {
    /// false for failures of reading the input, which happen before any semantic check
    pub fn is_semantic(&self) -> bool {
        match self {
            FrontendErrorKind::ParseError { .. } | FrontendErrorKind::SystemError { .. } => false,
            _ => true,
        }
    }
}

impl fmt::Display for FrontendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use FrontendErrorKind::*;
        match self {
            ParseError { message } => write!(f, "syntax error in ast dump: {}", message),
            SystemError { message } => write!(f, "{}", message),

            BasicClassRedefined { class } => write!(f, "Redefinition of basic class {}.", class),
            ClassRedefined { class } => write!(f, "Class {} was previously defined.", class),
            IllegalParent { class, parent } => {
                write!(f, "Class {} cannot inherit class {}.", class, parent)
            }
            UndefinedParent { class, parent } => {
                write!(f, "Class {} inherits from an undefined class {}.", class, parent)
            }
            InheritanceCycle => write!(f, "The inheritance graph is not acyclic."),
            MainClassMissing => write!(f, "Class Main is not defined."),
            MainMethodMissing => write!(f, "No 'main' method in class Main."),
            MainMethodArguments => write!(f, "'main' method in class Main should have no arguments."),

            SelfAttribute => write!(f, "'self' cannot be the name of an attribute."),
            AttributeRedefined { attr } => {
                write!(f, "Attribute {} is multiply defined in class.", attr)
            }
            AttributeInherited { attr } => {
                write!(f, "Attribute {} is an attribute of an inherited class.", attr)
            }
            UndefinedAttributeType { attr, t } => {
                write!(f, "Class {} of attribute {} is undefined.", t, attr)
            }
            MethodRedefined { method } => {
                write!(f, "Method {} is redefined in the current class.", method)
            }
            OverrideReturnType { method, actual, expected } => write!(
                f,
                "In redefined method {}, return type {} is different from original return type {}.",
                method, actual, expected
            ),
            OverrideArity { method } => {
                write!(f, "Incompatible number of formal parameters in redefined method {}.", method)
            }
            OverrideParamType { method, actual, expected } => write!(
                f,
                "In redefined method {}, parameter type {} is different from original type {}",
                method, actual, expected
            ),
            UndefinedReturnType { method, t } => {
                write!(f, "Undefined return type {} in method {}.", t, method)
            }
            SelfFormal => write!(f, "'self' cannot be the name of a formal parameter."),
            SelfTypeFormal { formal } => {
                write!(f, "Formal parameter {} cannot have type SELF_TYPE.", formal)
            }
            FormalRedefined { formal } => {
                write!(f, "Formal parameter {} is multiply defined.", formal)
            }
            UndefinedFormalType { formal, t } => {
                write!(f, "Class {} of formal parameter {} is undefined.", t, formal)
            }

            UndeclaredIdentifier { ident } => write!(f, "Undeclared identifier {}.", ident),
            AssignToSelf => write!(f, "Cannot assign to 'self'."),
            AssignToUndeclared { ident } => {
                write!(f, "Assignment to undeclared variable {}.", ident)
            }
            AssignmentMismatch { ident, declared, actual } => write!(
                f,
                "Type {} of assigned expression does not conform to declared type {} of identifier {}.",
                actual, declared, ident
            ),
            InitializerMismatch { ident, declared, actual } => write!(
                f,
                "Inferred type {} of initialization of {} does not conform to declared type {}.",
                actual, ident, declared
            ),
            ReturnMismatch { method, declared, actual } => write!(
                f,
                "Inferred return type {} of method {} does not conform to declared return type {}.",
                actual, method, declared
            ),
            NonBoolPredicate { construct } => {
                write!(f, "Predicate of '{}' does not have type Bool.", construct)
            }
            NonIntArguments { left, op, right } => {
                write!(f, "non-Int arguments: {} {} {}", left, op, right)
            }
            NonIntArgument { actual } => {
                write!(f, "Argument of '~' has type {} instead of Int.", actual)
            }
            NonBoolArgument { actual } => {
                write!(f, "Argument of 'not' has type {} instead of Bool.", actual)
            }
            IllegalComparison => write!(f, "Illegal comparison with a basic type."),
            UndefinedNew { t } => write!(f, "'new' used with undefined class {}.", t),
            UndefinedDispatchClass { t } => write!(f, "Dispatch on undefined class {}.", t),
            UndefinedMethod { method } => write!(f, "Dispatch to undefined method {}.", method),
            StaticDispatchMismatch { actual, expected } => write!(
                f,
                "Expression type {} does not conform to declared static dispatch type {}.",
                actual, expected
            ),
            WrongArgumentCount { method } => {
                write!(f, "Method {} called with wrong number of arguments.", method)
            }
            ArgumentMismatch { method, actual, formal, expected } => write!(
                f,
                "In call of method {}, type {} of parameter {} does not conform to declared type {}.",
                method, actual, formal, expected
            ),
            SelfLetBinding => write!(f, "'self' cannot be bound in a 'let' expression."),
            UndefinedLetType { ident, t } => {
                write!(f, "Class {} of let-bound identifier {} is undefined.", t, ident)
            }
            SelfCaseBinding => write!(f, "'self' bound in 'case'."),
            UndefinedBranchType { t } => write!(f, "Class {} of case branch is undefined.", t),
            DuplicateBranch { t } => write!(f, "Duplicate branch {} in case statement.", t),
        }
    }
}

/// where a diagnostic points to: a line of a source file, or the whole program
#[derive(Debug, PartialEq, Clone)]
pub enum ErrorLocation {
    Program,
    Source { file: String, line: usize },
}

/// standardized type to remember all frontend errors
pub type FrontendError<LocationT> = Meta<FrontendErrorKind, LocationT>;

/// fully located diagnostic, as printed for the user
pub type Diagnostic = FrontendError<ErrorLocation>;

impl fmt::Display for Meta<FrontendErrorKind, ErrorLocation> {
    /// location is displayed before the message itself: `<file>:<line>: <message>`
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get_meta() {
            ErrorLocation::Program => write!(f, "{}", self.item),
            ErrorLocation::Source { file, line } => write!(f, "{}:{}: {}", file, line, self.item),
        }
    }
}

impl<T: fmt::Debug, E: fmt::Display> From<LalrpopError<usize, T, E>> for FrontendError<usize> {
    fn from(err: LalrpopError<usize, T, E>) -> Self {
        let (location, message) = match &err {
            LalrpopError::InvalidToken { location } => {
                (*location, String::from("invalid token"))
            }
            LalrpopError::UnrecognizedEof { location, expected: _ } => {
                (*location, String::from("unexpected end of file"))
            }
            LalrpopError::ExtraToken { token } => {
                (token.0, format!("extra token {:?}", token.1))
            }
            LalrpopError::UnrecognizedToken { token, expected: _ } => {
                (token.0, format!("unrecognized token {:?}", token.1))
            }
            LalrpopError::User { error } => {
                (0, error.to_string())
            }
        };
        FrontendError::new(FrontendErrorKind::ParseError { message }, location)
    }
}

/// accumulates diagnostics of the semantic analysis in the order they are found
#[derive(Debug, Default)]
pub struct ErrorReporter {
    errors: Vec<Diagnostic>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a diagnostic pointing to a line of a source file
    pub fn error_at(&mut self, file: &str, line: usize, kind: FrontendErrorKind) {
        tracing::trace!(file, line, %kind, "semantic error");
        let location = ErrorLocation::Source { file: String::from(file), line };
        self.errors.push(FrontendError::new(kind, location));
    }

    /// record a diagnostic that concerns the whole program
    pub fn error(&mut self, kind: FrontendErrorKind) {
        tracing::trace!(%kind, "semantic error");
        self.errors.push(FrontendError::new(kind, ErrorLocation::Program));
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// pipeline checkpoint: fails with every diagnostic recorded so far, if any
    pub fn checkpoint(&self) -> Result<(), Vec<Diagnostic>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }
}
