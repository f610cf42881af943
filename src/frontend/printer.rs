use std::fmt;

use crate::frontend::ast::*;
use crate::meta::{GetType, TypeMeta};
use crate::util::symbol::{sym, Interner, Symbol};

/// typed program printed in the same textual format the reader accepts,
/// with every expression followed by its inferred type
pub struct AstDump<'a> {
    program: &'a Program<TypeMeta>,
    interner: &'a Interner,
}

impl<'a> AstDump<'a> {
    pub fn new(program: &'a Program<TypeMeta>, interner: &'a Interner) -> Self {
        Self { program, interner }
    }
}

impl fmt::Display for AstDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut printer = Printer { f, interner: self.interner };
        printer.program(self.program)
    }
}

/// escape a string constant so that the reader gets back the same value
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\{:03o}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

struct Printer<'f, 'w, 'a> {
    f: &'f mut fmt::Formatter<'w>,
    interner: &'a Interner,
}

impl Printer<'_, '_, '_> {
    fn line(&mut self, n: usize, text: &str) -> fmt::Result {
        writeln!(self.f, "{:width$}{}", "", text, width = n)
    }

    fn symbol(&mut self, n: usize, s: Symbol) -> fmt::Result {
        let name = self.interner.resolve(s);
        self.line(n, name)
    }

    fn location(&mut self, n: usize, meta: &TypeMeta) -> fmt::Result {
        self.line(n, &format!("#{}", meta.line))
    }

    fn type_annotation(&mut self, n: usize, t: Symbol) -> fmt::Result {
        let name = if t == sym::NO_TYPE { "_no_type" } else { self.interner.resolve(t) };
        self.line(n, &format!(": {}", name))
    }

    fn program(&mut self, program: &Program<TypeMeta>) -> fmt::Result {
        self.location(0, program.get_meta())?;
        self.line(0, "_program")?;
        for cls in program.item.classes.iter() {
            self.class(2, cls)?;
        }
        Ok(())
    }

    fn class(&mut self, n: usize, cls: &Class<TypeMeta>) -> fmt::Result {
        self.location(n, cls.get_meta())?;
        self.line(n, "_class")?;
        self.symbol(n + 2, cls.item.ident)?;
        self.symbol(n + 2, cls.item.parent)?;
        let file = escape(self.interner.resolve(cls.item.file));
        self.line(n + 2, &format!("\"{}\"", file))?;
        self.line(n + 2, "(")?;
        for feature in cls.item.features.iter() {
            self.feature(n + 2, feature)?;
        }
        self.line(n + 2, ")")
    }

    fn feature(&mut self, n: usize, feature: &Feature<TypeMeta>) -> fmt::Result {
        self.location(n, feature.get_meta())?;
        match &feature.item {
            FeatureKind::Attribute { ident, t, init } => {
                self.line(n, "_attr")?;
                self.symbol(n + 2, *ident)?;
                self.symbol(n + 2, *t)?;
                self.expression(n + 2, init)
            }
            FeatureKind::Method { ident, formals, ret, body } => {
                self.line(n, "_method")?;
                self.symbol(n + 2, *ident)?;
                for formal in formals.iter() {
                    self.location(n + 2, formal.get_meta())?;
                    self.line(n + 2, "_formal")?;
                    self.symbol(n + 4, formal.item.ident)?;
                    self.symbol(n + 4, formal.item.t)?;
                }
                self.symbol(n + 2, *ret)?;
                self.expression(n + 2, body)
            }
        }
    }

    fn expressions(&mut self, n: usize, exprs: &[Expression<TypeMeta>]) -> fmt::Result {
        for expr in exprs.iter() {
            self.expression(n, expr)?;
        }
        Ok(())
    }

    fn expression(&mut self, n: usize, expr: &Expression<TypeMeta>) -> fmt::Result {
        self.location(n, expr.get_meta())?;
        match &expr.item {
            ExpressionKind::Assign { ident, expr } => {
                self.line(n, "_assign")?;
                self.symbol(n + 2, *ident)?;
                self.expression(n + 2, expr)?;
            }
            ExpressionKind::StaticDispatch { expr, type_name, method, args } => {
                self.line(n, "_static_dispatch")?;
                self.expression(n + 2, expr)?;
                self.symbol(n + 2, *type_name)?;
                self.symbol(n + 2, *method)?;
                self.line(n + 2, "(")?;
                self.expressions(n + 2, args)?;
                self.line(n + 2, ")")?;
            }
            ExpressionKind::Dispatch { expr, method, args } => {
                self.line(n, "_dispatch")?;
                self.expression(n + 2, expr)?;
                self.symbol(n + 2, *method)?;
                self.line(n + 2, "(")?;
                self.expressions(n + 2, args)?;
                self.line(n + 2, ")")?;
            }
            ExpressionKind::Cond { pred, then_expr, else_expr } => {
                self.line(n, "_cond")?;
                self.expression(n + 2, pred)?;
                self.expression(n + 2, then_expr)?;
                self.expression(n + 2, else_expr)?;
            }
            ExpressionKind::Loop { pred, body } => {
                self.line(n, "_loop")?;
                self.expression(n + 2, pred)?;
                self.expression(n + 2, body)?;
            }
            ExpressionKind::Case { expr, branches } => {
                self.line(n, "_typcase")?;
                self.expression(n + 2, expr)?;
                for branch in branches.iter() {
                    self.location(n + 2, branch.get_meta())?;
                    self.line(n + 2, "_branch")?;
                    self.symbol(n + 4, branch.item.ident)?;
                    self.symbol(n + 4, branch.item.t)?;
                    self.expression(n + 4, &branch.item.body)?;
                }
            }
            ExpressionKind::Block { body } => {
                self.line(n, "_block")?;
                self.expressions(n + 2, body)?;
            }
            ExpressionKind::Let { ident, t, init, body } => {
                self.line(n, "_let")?;
                self.symbol(n + 2, *ident)?;
                self.symbol(n + 2, *t)?;
                self.expression(n + 2, init)?;
                self.expression(n + 2, body)?;
            }
            ExpressionKind::Binary { left, op, right } => {
                let tag = match op {
                    BinaryOperator::Plus => "_plus",
                    BinaryOperator::Minus => "_sub",
                    BinaryOperator::Times => "_mul",
                    BinaryOperator::Divide => "_divide",
                    BinaryOperator::Less => "_lt",
                    BinaryOperator::LessEqual => "_leq",
                    BinaryOperator::Equal => "_eq",
                };
                self.line(n, tag)?;
                self.expression(n + 2, left)?;
                self.expression(n + 2, right)?;
            }
            ExpressionKind::Unary { op, arg } => {
                let tag = match op {
                    UnaryOperator::Neg => "_neg",
                    UnaryOperator::Not => "_comp",
                    UnaryOperator::IsVoid => "_isvoid",
                };
                self.line(n, tag)?;
                self.expression(n + 2, arg)?;
            }
            ExpressionKind::LitInt { val } => {
                self.line(n, "_int")?;
                self.line(n + 2, &val.to_string())?;
            }
            ExpressionKind::LitBool { val } => {
                self.line(n, "_bool")?;
                self.line(n + 2, if *val { "1" } else { "0" })?;
            }
            ExpressionKind::LitStr { val } => {
                self.line(n, "_string")?;
                self.line(n + 2, &format!("\"{}\"", escape(val)))?;
            }
            ExpressionKind::New { t } => {
                self.line(n, "_new")?;
                self.symbol(n + 2, *t)?;
            }
            ExpressionKind::Object { ident } => {
                self.line(n, "_object")?;
                self.symbol(n + 2, *ident)?;
            }
            ExpressionKind::NoExpr => {
                self.line(n, "_no_expr")?;
            }
        }
        self.type_annotation(n, expr.get_type())
    }
}
