use crate::frontend::ast::*;
use crate::frontend::error::FrontendErrorKind;
use crate::frontend::typechecker::graph::MethodSig;
use crate::frontend::typechecker::typechecker::TypeChecker;
use crate::meta::{GetLocation, GetType, TypeMeta};
use crate::util::mapper::AstMapper;
use crate::util::symbol::{sym, Symbol};

/// mapped expression kind with its inferred type
type Checked = (ExpressionKind<TypeMeta>, Symbol);

impl<'t, 'i, M: GetLocation> AstMapper<M, TypeMeta> for TypeChecker<'t, 'i> {
    fn map_expression(&mut self, expr: &Expression<M>) -> Expression<TypeMeta> {
        let line = expr.get_location().line;
        let (kind, t) = match &expr.item {
            ExpressionKind::LitInt { val } => (ExpressionKind::LitInt { val: *val }, sym::INT),
            ExpressionKind::LitBool { val } => (ExpressionKind::LitBool { val: *val }, sym::BOOL),
            ExpressionKind::LitStr { val } => {
                (ExpressionKind::LitStr { val: val.clone() }, sym::STRING)
            }
            ExpressionKind::NoExpr => (ExpressionKind::NoExpr, sym::NO_TYPE),
            ExpressionKind::Object { ident } => self.check_object(line, *ident),
            ExpressionKind::New { t } => self.check_new(line, *t),
            ExpressionKind::Assign { ident, expr } => self.check_assign(line, *ident, expr),
            ExpressionKind::Binary { left, op, right } => self.check_binary(line, left, *op, right),
            ExpressionKind::Unary { op, arg } => self.check_unary(line, *op, arg),
            ExpressionKind::Cond { pred, then_expr, else_expr } => {
                self.check_cond(line, pred, then_expr, else_expr)
            }
            ExpressionKind::Loop { pred, body } => self.check_loop(line, pred, body),
            ExpressionKind::Block { body } => {
                let body: Vec<_> = body.iter()
                    .map(|expr| self.map_expression(expr))
                    .collect();
                let t = body.last().map(|expr| expr.get_type()).unwrap_or(sym::OBJECT);
                (ExpressionKind::Block { body }, t)
            }
            ExpressionKind::Let { ident, t, init, body } => self.check_let(line, *ident, *t, init, body),
            ExpressionKind::Case { expr, branches } => self.check_case(expr, branches),
            ExpressionKind::StaticDispatch { expr, type_name, method, args } => {
                self.check_static_dispatch(line, expr, *type_name, *method, args)
            }
            ExpressionKind::Dispatch { expr, method, args } => {
                self.check_dispatch(line, expr, *method, args)
            }
        };
        Expression::new(kind, TypeMeta { line, t })
    }

    fn map_formal(&mut self, formal: &Formal<M>) -> Formal<TypeMeta> {
        let line = formal.get_location().line;
        Formal::new(formal.item.clone(), TypeMeta { line, t: formal.item.t })
    }

    fn map_feature(&mut self, feature: &Feature<M>) -> Feature<TypeMeta> {
        let line = feature.get_location().line;
        let kind = match &feature.item {
            FeatureKind::Attribute { ident, t, init } => {
                let init = self.map_expression(init);
                if !matches!(init.item, ExpressionKind::NoExpr)
                    && self.is_type_defined(*t, true)
                    && !self.conforms_resolved(init.get_type(), *t) {
                    let kind = FrontendErrorKind::InitializerMismatch {
                        ident: self.name(*ident),
                        declared: self.name(*t),
                        actual: self.name(init.get_type()),
                    };
                    self.error(line, kind);
                }
                FeatureKind::Attribute { ident: *ident, t: *t, init }
            }
            FeatureKind::Method { ident, formals, ret, body } => {
                let bindings = formals.iter()
                    .map(|formal| (formal.item.ident, formal.item.t))
                    .collect();
                let body = self.with_nested_scope(bindings).map_expression(body);
                if self.is_type_defined(*ret, true) && !self.conforms_resolved(body.get_type(), *ret) {
                    let kind = FrontendErrorKind::ReturnMismatch {
                        method: self.name(*ident),
                        declared: self.name(*ret),
                        actual: self.name(body.get_type()),
                    };
                    self.error(line, kind);
                }
                let formals = formals.iter()
                    .map(|formal| self.map_formal(formal))
                    .collect();
                FeatureKind::Method { ident: *ident, formals, ret: *ret, body }
            }
        };
        Feature::new(kind, TypeMeta { line, t: feature.item.get_type() })
    }

    fn map_class(&mut self, class: &Class<M>) -> Class<TypeMeta> {
        let _span = tracing::debug_span!("class", name = %self.name(class.item.ident)).entered();
        self.enter_class(class.item.ident);
        let features = class.item.features.iter()
            .map(|feature| self.map_feature(feature))
            .collect();
        let item = ClassItem {
            ident: class.item.ident,
            parent: class.item.parent,
            features,
            file: class.item.file,
        };
        Class::new(item, TypeMeta { line: class.get_location().line, t: class.item.ident })
    }

    fn map_program_meta(&mut self, program: &Program<M>) -> TypeMeta {
        TypeMeta { line: program.get_location().line, t: sym::NO_TYPE }
    }
}

impl<'t, 'i> TypeChecker<'t, 'i> {
    fn check_object(&mut self, line: usize, ident: Symbol) -> Checked {
        let t = if ident == sym::SELF {
            sym::SELF_TYPE
        } else if let Some(t) = self.get_variable(ident) {
            t
        } else {
            self.error(line, FrontendErrorKind::UndeclaredIdentifier { ident: self.name(ident) });
            sym::OBJECT
        };
        (ExpressionKind::Object { ident }, t)
    }

    fn check_new(&mut self, line: usize, t: Symbol) -> Checked {
        let new_t = if self.is_type_defined(t, true) {
            t
        } else {
            self.error(line, FrontendErrorKind::UndefinedNew { t: self.name(t) });
            sym::OBJECT
        };
        (ExpressionKind::New { t }, new_t)
    }

    fn check_assign<M: GetLocation>(&mut self, line: usize, ident: Symbol, expr: &Expression<M>) -> Checked {
        let expr = self.map_expression(expr);
        let actual = expr.get_type();
        let t = if ident == sym::SELF {
            self.error(line, FrontendErrorKind::AssignToSelf);
            sym::OBJECT
        } else {
            match self.get_variable(ident) {
                None => {
                    self.error(line, FrontendErrorKind::AssignToUndeclared { ident: self.name(ident) });
                    sym::OBJECT
                }
                Some(declared) if !self.conforms(actual, declared) => {
                    let kind = FrontendErrorKind::AssignmentMismatch {
                        ident: self.name(ident),
                        declared: self.name(declared),
                        actual: self.name(actual),
                    };
                    self.error(line, kind);
                    sym::OBJECT
                }
                Some(_) => self.resolve(actual),
            }
        };
        (ExpressionKind::Assign { ident, expr: Box::new(expr) }, t)
    }

    fn check_binary<M: GetLocation>(
        &mut self, line: usize, left: &Expression<M>, op: BinaryOperator, right: &Expression<M>,
    ) -> Checked {
        let left = self.map_expression(left);
        let right = self.map_expression(right);
        let (lt, rt) = (left.get_type(), right.get_type());
        let t = match op {
            BinaryOperator::Equal => {
                let basic = [sym::INT, sym::BOOL, sym::STRING];
                if (basic.contains(&lt) || basic.contains(&rt)) && lt != rt {
                    self.error(line, FrontendErrorKind::IllegalComparison);
                }
                sym::BOOL
            }
            _ => {
                if lt != sym::INT || rt != sym::INT {
                    let kind = FrontendErrorKind::NonIntArguments {
                        left: self.name(lt),
                        op: op.symbol(),
                        right: self.name(rt),
                    };
                    self.error(line, kind);
                }
                match op {
                    BinaryOperator::Less | BinaryOperator::LessEqual => sym::BOOL,
                    _ => sym::INT,
                }
            }
        };
        (ExpressionKind::Binary { left: Box::new(left), op, right: Box::new(right) }, t)
    }

    fn check_unary<M: GetLocation>(&mut self, line: usize, op: UnaryOperator, arg: &Expression<M>) -> Checked {
        let arg = self.map_expression(arg);
        let actual = arg.get_type();
        let t = match op {
            UnaryOperator::Neg => {
                if actual != sym::INT {
                    self.error(line, FrontendErrorKind::NonIntArgument { actual: self.name(actual) });
                }
                sym::INT
            }
            UnaryOperator::Not => {
                if actual != sym::BOOL {
                    self.error(line, FrontendErrorKind::NonBoolArgument { actual: self.name(actual) });
                }
                sym::BOOL
            }
            UnaryOperator::IsVoid => sym::BOOL,
        };
        (ExpressionKind::Unary { op, arg: Box::new(arg) }, t)
    }

    fn check_cond<M: GetLocation>(
        &mut self, line: usize, pred: &Expression<M>, then_expr: &Expression<M>, else_expr: &Expression<M>,
    ) -> Checked {
        let pred = self.map_expression(pred);
        let then_expr = self.map_expression(then_expr);
        let else_expr = self.map_expression(else_expr);
        let t = if pred.get_type() != sym::BOOL {
            self.error(line, FrontendErrorKind::NonBoolPredicate { construct: "if" });
            sym::OBJECT
        } else {
            self.join(then_expr.get_type(), else_expr.get_type())
        };
        let kind = ExpressionKind::Cond {
            pred: Box::new(pred),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        };
        (kind, t)
    }

    fn check_loop<M: GetLocation>(&mut self, line: usize, pred: &Expression<M>, body: &Expression<M>) -> Checked {
        let pred = self.map_expression(pred);
        let body = self.map_expression(body);
        if pred.get_type() != sym::BOOL {
            self.error(line, FrontendErrorKind::NonBoolPredicate { construct: "loop" });
        }
        (ExpressionKind::Loop { pred: Box::new(pred), body: Box::new(body) }, sym::OBJECT)
    }

    fn check_let<M: GetLocation>(
        &mut self, line: usize, ident: Symbol, t: Symbol, init: &Expression<M>, body: &Expression<M>,
    ) -> Checked {
        // the initializer does not see the new binding
        let init = self.map_expression(init);

        let binds_self = ident == sym::SELF;
        if binds_self {
            self.error(line, FrontendErrorKind::SelfLetBinding);
        }
        let bound_t = if self.is_type_defined(t, true) {
            if !matches!(init.item, ExpressionKind::NoExpr) && !self.conforms_resolved(init.get_type(), t) {
                let kind = FrontendErrorKind::InitializerMismatch {
                    ident: self.name(ident),
                    declared: self.name(t),
                    actual: self.name(init.get_type()),
                };
                self.error(line, kind);
            }
            t
        } else {
            let kind = FrontendErrorKind::UndefinedLetType { ident: self.name(ident), t: self.name(t) };
            self.error(line, kind);
            sym::OBJECT
        };

        let body = self.with_nested_scope(vec![(ident, bound_t)]).map_expression(body);
        let let_t = if binds_self { t } else { body.get_type() };
        let kind = ExpressionKind::Let { ident, t, init: Box::new(init), body: Box::new(body) };
        (kind, let_t)
    }

    fn check_case<M: GetLocation>(&mut self, expr: &Expression<M>, branches: &[Branch<M>]) -> Checked {
        let expr = self.map_expression(expr);
        let mut mapped: Vec<Branch<TypeMeta>> = Vec::with_capacity(branches.len());
        let mut seen: Vec<Symbol> = Vec::with_capacity(branches.len());
        let mut case_t: Option<Symbol> = None;

        for (i, branch) in branches.iter().enumerate() {
            let line = branch.get_location().line;
            let BranchItem { ident, t, body } = &branch.item;
            if *ident == sym::SELF {
                self.error(line, FrontendErrorKind::SelfCaseBinding);
            }
            if !self.is_type_defined(*t, false) {
                self.error(line, FrontendErrorKind::UndefinedBranchType { t: self.name(*t) });
            }
            if seen.contains(t) {
                // remaining branches are left without types
                self.error(line, FrontendErrorKind::DuplicateBranch { t: self.name(*t) });
                let mut unchecked = Unchecked;
                mapped.extend(branches[i..].iter().map(|branch| unchecked.map_branch(branch)));
                let kind = ExpressionKind::Case { expr: Box::new(expr), branches: mapped };
                return (kind, sym::OBJECT);
            }
            seen.push(*t);

            let body = self.with_nested_scope(vec![(*ident, *t)]).map_expression(body);
            case_t = Some(match case_t {
                None => body.get_type(),
                Some(acc) => self.join(acc, body.get_type()),
            });
            let item = BranchItem { ident: *ident, t: *t, body };
            mapped.push(Branch::new(item, TypeMeta { line, t: *t }));
        }

        let kind = ExpressionKind::Case { expr: Box::new(expr), branches: mapped };
        (kind, case_t.unwrap_or(sym::OBJECT))
    }

    /// check number and types of actual arguments, returns false if the call is unusable
    fn check_arguments(&mut self, line: usize, sig: &MethodSig, args: &[Expression<TypeMeta>]) -> bool {
        if sig.formals.len() != args.len() {
            self.error(line, FrontendErrorKind::WrongArgumentCount { method: self.name(sig.ident) });
            return false;
        }
        for (arg, formal) in args.iter().zip(sig.formals.iter()) {
            if !self.conforms(arg.get_type(), formal.t) {
                let kind = FrontendErrorKind::ArgumentMismatch {
                    method: self.name(sig.ident),
                    actual: self.name(arg.get_type()),
                    formal: self.name(formal.ident),
                    expected: self.name(formal.t),
                };
                self.error(line, kind);
            }
        }
        true
    }

    fn check_static_dispatch<M: GetLocation>(
        &mut self, line: usize, expr: &Expression<M>, type_name: Symbol, method: Symbol, args: &[Expression<M>],
    ) -> Checked {
        let expr = self.map_expression(expr);
        let args: Vec<_> = args.iter().map(|arg| self.map_expression(arg)).collect();
        let receiver_t = expr.get_type();

        let t = if !self.is_type_defined(type_name, true) {
            self.error(line, FrontendErrorKind::UndefinedDispatchClass { t: self.name(type_name) });
            sym::OBJECT
        } else {
            match self.get_method(self.resolve(type_name), method) {
                None => {
                    self.error(line, FrontendErrorKind::UndefinedMethod { method: self.name(method) });
                    sym::OBJECT
                }
                Some(sig) => {
                    if !self.conforms(receiver_t, type_name) {
                        let kind = FrontendErrorKind::StaticDispatchMismatch {
                            actual: self.name(receiver_t),
                            expected: self.name(type_name),
                        };
                        self.error(line, kind);
                    }
                    if !self.check_arguments(line, sig, &args) {
                        sym::OBJECT
                    } else if sig.ret == sym::SELF_TYPE {
                        receiver_t
                    } else {
                        sig.ret
                    }
                }
            }
        };
        (ExpressionKind::StaticDispatch { expr: Box::new(expr), type_name, method, args }, t)
    }

    fn check_dispatch<M: GetLocation>(
        &mut self, line: usize, expr: &Expression<M>, method: Symbol, args: &[Expression<M>],
    ) -> Checked {
        let expr = self.map_expression(expr);
        let args: Vec<_> = args.iter().map(|arg| self.map_expression(arg)).collect();
        let receiver_t = expr.get_type();
        let class = self.resolve(receiver_t);

        let t = match self.get_method_table(class) {
            None => {
                self.error(line, FrontendErrorKind::UndefinedDispatchClass { t: self.name(class) });
                sym::OBJECT
            }
            Some(methods) => match methods.lookup(&method) {
                None => {
                    self.error(line, FrontendErrorKind::UndefinedMethod { method: self.name(method) });
                    sym::OBJECT
                }
                Some(sig) => {
                    if !self.check_arguments(line, sig, &args) {
                        sym::OBJECT
                    } else if sig.ret == sym::SELF_TYPE {
                        receiver_t
                    } else {
                        sig.ret
                    }
                }
            },
        };
        (ExpressionKind::Dispatch { expr: Box::new(expr), method, args }, t)
    }
}

/// maps nodes that are never checked (after an error that aborts checking of the
/// enclosing construct), every node gets the "no type" annotation
pub struct Unchecked;

impl Unchecked {
    fn meta<N: GetLocation>(node: &N) -> TypeMeta {
        TypeMeta { line: node.get_location().line, t: sym::NO_TYPE }
    }

    pub fn map_branch<M: GetLocation>(&mut self, branch: &Branch<M>) -> Branch<TypeMeta> {
        let item = BranchItem {
            ident: branch.item.ident,
            t: branch.item.t,
            body: self.map_expression(&branch.item.body),
        };
        Branch::new(item, Self::meta(branch))
    }
}

impl<M: GetLocation> AstMapper<M, TypeMeta> for Unchecked {
    fn map_expression(&mut self, expr: &Expression<M>) -> Expression<TypeMeta> {
        let mut map = |e: &Expression<M>| Box::new(self.map_expression(e));
        let kind = match &expr.item {
            ExpressionKind::Assign { ident, expr } => ExpressionKind::Assign { ident: *ident, expr: map(expr) },
            ExpressionKind::StaticDispatch { expr, type_name, method, args } => ExpressionKind::StaticDispatch {
                expr: map(expr),
                type_name: *type_name,
                method: *method,
                args: args.iter().map(|arg| *map(arg)).collect(),
            },
            ExpressionKind::Dispatch { expr, method, args } => ExpressionKind::Dispatch {
                expr: map(expr),
                method: *method,
                args: args.iter().map(|arg| *map(arg)).collect(),
            },
            ExpressionKind::Cond { pred, then_expr, else_expr } => ExpressionKind::Cond {
                pred: map(pred),
                then_expr: map(then_expr),
                else_expr: map(else_expr),
            },
            ExpressionKind::Loop { pred, body } => ExpressionKind::Loop { pred: map(pred), body: map(body) },
            ExpressionKind::Case { expr, branches } => {
                let expr = map(expr);
                ExpressionKind::Case {
                    expr,
                    branches: branches.iter().map(|branch| self.map_branch(branch)).collect(),
                }
            }
            ExpressionKind::Block { body } => ExpressionKind::Block {
                body: body.iter().map(|e| *map(e)).collect(),
            },
            ExpressionKind::Let { ident, t, init, body } => ExpressionKind::Let {
                ident: *ident,
                t: *t,
                init: map(init),
                body: map(body),
            },
            ExpressionKind::Binary { left, op, right } => ExpressionKind::Binary {
                left: map(left),
                op: *op,
                right: map(right),
            },
            ExpressionKind::Unary { op, arg } => ExpressionKind::Unary { op: *op, arg: map(arg) },
            ExpressionKind::LitInt { val } => ExpressionKind::LitInt { val: *val },
            ExpressionKind::LitBool { val } => ExpressionKind::LitBool { val: *val },
            ExpressionKind::LitStr { val } => ExpressionKind::LitStr { val: val.clone() },
            ExpressionKind::New { t } => ExpressionKind::New { t: *t },
            ExpressionKind::Object { ident } => ExpressionKind::Object { ident: *ident },
            ExpressionKind::NoExpr => ExpressionKind::NoExpr,
        };
        Expression::new(kind, Self::meta(expr))
    }

    fn map_formal(&mut self, formal: &Formal<M>) -> Formal<TypeMeta> {
        Formal::new(formal.item.clone(), Self::meta(formal))
    }

    fn map_feature(&mut self, feature: &Feature<M>) -> Feature<TypeMeta> {
        let kind = match &feature.item {
            FeatureKind::Attribute { ident, t, init } => {
                FeatureKind::Attribute { ident: *ident, t: *t, init: self.map_expression(init) }
            }
            FeatureKind::Method { ident, formals, ret, body } => FeatureKind::Method {
                ident: *ident,
                formals: formals.iter().map(|formal| self.map_formal(formal)).collect(),
                ret: *ret,
                body: self.map_expression(body),
            },
        };
        Feature::new(kind, Self::meta(feature))
    }

    fn map_class(&mut self, class: &Class<M>) -> Class<TypeMeta> {
        let item = ClassItem {
            ident: class.item.ident,
            parent: class.item.parent,
            features: class.item.features.iter().map(|feature| self.map_feature(feature)).collect(),
            file: class.item.file,
        };
        Class::new(item, Self::meta(class))
    }

    fn map_program_meta(&mut self, program: &Program<M>) -> TypeMeta {
        Self::meta(program)
    }
}
