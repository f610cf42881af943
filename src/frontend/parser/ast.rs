use crate::meta::Meta;
use crate::util::symbol::Symbol;

/// trait for marking ast items that can searched by key (in an environment)
pub trait Keyed {
    fn get_key(&self) -> Symbol;
}

/// alias for all metadata containers attached to ast items
pub type AstItem<ItemT, MetaT> = Meta<ItemT, MetaT>;

impl<ItemT: Keyed, MetaT> Keyed for AstItem<ItemT, MetaT> {
    /// if item is keyed, the whole wrapper can also be keyed using same key
    fn get_key(&self) -> Symbol {
        self.item.get_key()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Divide,
    Less,
    LessEqual,
    Equal,
}

impl BinaryOperator {
    /// operator as written in cool source code
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Equal => "=",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Neg,
    Not,
    IsVoid,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind<MetaT> {
    Assign { ident: Symbol, expr: Box<Expression<MetaT>> },
    StaticDispatch {
        expr: Box<Expression<MetaT>>,
        type_name: Symbol,
        method: Symbol,
        args: Vec<Expression<MetaT>>,
    },
    Dispatch {
        expr: Box<Expression<MetaT>>,
        method: Symbol,
        args: Vec<Expression<MetaT>>,
    },
    Cond {
        pred: Box<Expression<MetaT>>,
        then_expr: Box<Expression<MetaT>>,
        else_expr: Box<Expression<MetaT>>,
    },
    Loop { pred: Box<Expression<MetaT>>, body: Box<Expression<MetaT>> },
    Case { expr: Box<Expression<MetaT>>, branches: Vec<Branch<MetaT>> },
    Block { body: Vec<Expression<MetaT>> },
    Let {
        ident: Symbol,
        t: Symbol,
        init: Box<Expression<MetaT>>,
        body: Box<Expression<MetaT>>,
    },
    Binary {
        left: Box<Expression<MetaT>>,
        op: BinaryOperator,
        right: Box<Expression<MetaT>>,
    },
    Unary { op: UnaryOperator, arg: Box<Expression<MetaT>> },
    LitInt { val: i32 },
    LitBool { val: bool },
    LitStr { val: String },
    New { t: Symbol },
    Object { ident: Symbol },
    NoExpr,
}

pub type Expression<MetaT> = AstItem<ExpressionKind<MetaT>, MetaT>;

#[derive(Debug, PartialEq, Clone)]
pub struct BranchItem<MetaT> {
    pub ident: Symbol,
    pub t: Symbol,
    pub body: Expression<MetaT>,
}

pub type Branch<MetaT> = AstItem<BranchItem<MetaT>, MetaT>;

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FormalItem {
    pub ident: Symbol,
    pub t: Symbol,
}

pub type Formal<MetaT> = AstItem<FormalItem, MetaT>;

impl Keyed for FormalItem {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum FeatureKind<MetaT> {
    Attribute { ident: Symbol, t: Symbol, init: Expression<MetaT> },
    Method {
        ident: Symbol,
        formals: Vec<Formal<MetaT>>,
        ret: Symbol,
        body: Expression<MetaT>,
    },
}

pub type Feature<MetaT> = AstItem<FeatureKind<MetaT>, MetaT>;

impl<MetaT> Keyed for FeatureKind<MetaT> {
    fn get_key(&self) -> Symbol {
        match self {
            FeatureKind::Attribute { ident, .. } => *ident,
            FeatureKind::Method { ident, .. } => *ident,
        }
    }
}

impl<MetaT> FeatureKind<MetaT> {
    /// declared type of an attribute, return type of a method
    pub fn get_type(&self) -> Symbol {
        match self {
            FeatureKind::Attribute { t, .. } => *t,
            FeatureKind::Method { ret, .. } => *ret,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassItem<MetaT> {
    pub ident: Symbol,
    pub parent: Symbol,
    pub features: Vec<Feature<MetaT>>,
    /// name of the source file the class was parsed from
    pub file: Symbol,
}

pub type Class<MetaT> = AstItem<ClassItem<MetaT>, MetaT>;

impl<MetaT> Keyed for ClassItem<MetaT> {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

/// the result of parsing and all subsequent operations (ast root)
#[derive(Debug, PartialEq, Clone)]
pub struct ProgramItem<MetaT> {
    pub classes: Vec<Class<MetaT>>,
}

pub type Program<MetaT> = AstItem<ProgramItem<MetaT>, MetaT>;
