//! Abstract Syntax Tree definitions for Tarn
//!
//! Every node family (statements, expressions, patterns, call arguments, dict entries, f-string parts) is a closed
//! enum. Nodes carry their source span through [`Spanned`].
//!
//! The canonical textual rendering lives in the `display` submodule; [`Visitor`] walks the tree.

use std::fmt;
use std::sync::Arc;

mod display;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether `other` lies entirely inside this span.
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A parsed source file: the statements of its top level, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub body: Vec<Spanned<Statement>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expression statement, `yield` statements included
    Expr(Spanned<Expr>),
    /// `target = value`; chained assignments produce one of these per target
    Assign(AssignStmt),
    /// `target: annotation [= value]`
    AnnAssign(AnnAssignStmt),
    Return(Option<Spanned<Expr>>),
    Raise(RaiseStmt),
    Pass,
    Break,
    Continue,
    Del(Vec<Spanned<Expr>>),
    Global(Vec<Spanned<Ident>>),
    Nonlocal(Vec<Spanned<Ident>>),
    Assert(AssertStmt),
    /// `import a.b as c, d`
    Import(Vec<Spanned<ImportAlias>>),
    /// `from ..pkg import name as alias`
    ImportFrom(ImportFromStmt),
    FunctionDef(Box<FunctionDef>),
    ClassDef(Box<ClassDef>),
    /// `elif` chains nest as a single `If` inside `orelse`
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    With(WithStmt),
    Try(TryStmt),
    Match(MatchStmt),
    /// `type Name[T] = value`
    TypeAlias(TypeAliasStmt),
}

/// One assignment target bound to a value.
///
/// `a = b = f()` yields two statements whose `value` is the same allocation, so the right-hand side is evaluated
/// once however many targets it feeds. Augmented assignment `x += 1` is stored as `x = x + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Spanned<Expr>,
    pub value: Arc<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnAssignStmt {
    pub target: Spanned<Expr>,
    pub annotation: Spanned<Expr>,
    pub value: Option<Spanned<Expr>>,
    /// The target is a bare, unparenthesized name
    pub simple: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaiseStmt {
    pub exception: Option<Spanned<Expr>>,
    pub cause: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStmt {
    pub test: Spanned<Expr>,
    pub message: Option<Spanned<Expr>>,
}

/// A dotted module path with an optional alias, or a single imported name in `from ... import`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportAlias {
    pub path: Vec<Ident>,
    pub alias: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportFromStmt {
    /// `None` for `from . import x`
    pub module: Option<Vec<Ident>>,
    /// Number of leading dots
    pub level: usize,
    pub names: ImportNames,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportNames {
    /// `from m import *`
    Wildcard,
    Names(Vec<Spanned<ImportAlias>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub decorators: Vec<Spanned<Expr>>,
    pub is_async: bool,
    pub name: Ident,
    pub type_params: Vec<Spanned<TypeParam>>,
    pub params: Vec<Spanned<Param>>,
    pub returns: Option<Spanned<Expr>>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub decorators: Vec<Spanned<Expr>>,
    pub name: Ident,
    pub type_params: Vec<Spanned<TypeParam>>,
    /// Bases and keywords such as `metaclass=`
    pub arguments: Vec<Spanned<CallArg>>,
    pub body: Vec<Spanned<Statement>>,
}

/// A function or lambda parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub kind: ParamKind,
    pub annotation: Option<Spanned<Expr>>,
    pub default: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Before a `/` marker
    PositionalOnly,
    Regular,
    /// `*args`
    VarPositional,
    /// After `*` or `*args`
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Ident,
    pub kind: TypeParamKind,
    pub bound: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeParamKind {
    /// `T` or `T: bound`
    TypeVar,
    /// `*Ts`
    TypeVarTuple,
    /// `**P`
    ParamSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
    pub orelse: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
    pub orelse: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub is_async: bool,
    pub target: Spanned<Expr>,
    pub iter: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
    pub orelse: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithStmt {
    pub is_async: bool,
    pub items: Vec<Spanned<WithItem>>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithItem {
    pub context: Spanned<Expr>,
    pub target: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub body: Vec<Spanned<Statement>>,
    pub handlers: Vec<Spanned<ExceptHandler>>,
    pub orelse: Vec<Spanned<Statement>>,
    pub finalbody: Vec<Spanned<Statement>>,
    /// Handlers are `except*` clauses
    pub is_star: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    pub kind: Option<Spanned<Expr>>,
    pub name: Option<Ident>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchStmt {
    pub subject: Spanned<Expr>,
    pub cases: Vec<Spanned<MatchCase>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Spanned<Pattern>,
    pub guard: Option<Spanned<Expr>>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasStmt {
    pub name: Spanned<Ident>,
    pub type_params: Vec<Spanned<TypeParam>>,
    pub value: Spanned<Expr>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(Ident),
    Literal(Literal),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    /// `body if condition else orelse`
    Ternary(Box<TernaryExpr>),
    Lambda(Box<LambdaExpr>),
    /// `target := value`
    NamedExpr(Spanned<Ident>, Box<Spanned<Expr>>),
    Await(Box<Spanned<Expr>>),
    Yield(Option<Box<Spanned<Expr>>>),
    YieldFrom(Box<Spanned<Expr>>),
    /// `*value` in collections, targets, subscripts
    Starred(Box<Spanned<Expr>>),
    Call(Box<Spanned<Expr>>, Vec<Spanned<CallArg>>),
    Attribute(Box<Spanned<Expr>>, Ident),
    /// `value[entries]`; each entry is an expression, a starred expression, or a slice
    Subscript(Box<Spanned<Expr>>, Vec<Spanned<Expr>>),
    /// `start:end:step`, only as a subscript entry
    Slice(SliceExpr),
    /// Explicit parentheses around a single expression
    Group(Box<Spanned<Expr>>),
    Tuple(Vec<Spanned<Expr>>),
    List(Vec<Spanned<Expr>>),
    Set(Vec<Spanned<Expr>>),
    Dict(Vec<Spanned<DictEntry>>),
    ListComp(Box<Comprehension>),
    SetComp(Box<Comprehension>),
    GenExpr(Box<Comprehension>),
    DictComp(Box<DictComprehension>),
    FString(Vec<Spanned<FStringPart>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    /// Imaginary part of a complex literal, e.g. `2j`
    Imaginary(f64),
    String(String),
    Bytes(Vec<u8>),
    Bool(bool),
    None,
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    pub condition: Spanned<Expr>,
    pub body: Spanned<Expr>,
    pub orelse: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub params: Vec<Spanned<Param>>,
    pub body: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub start: Option<Box<Spanned<Expr>>>,
    pub end: Option<Box<Spanned<Expr>>>,
    pub step: Option<Box<Spanned<Expr>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    Positional(Spanned<Expr>),
    Keyword(Ident, Spanned<Expr>),
    /// `*iterable`
    Starred(Spanned<Expr>),
    /// `**mapping`
    DoubleStarred(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DictEntry {
    Pair(Spanned<Expr>, Spanned<Expr>),
    /// `**mapping`
    Unpack(Spanned<Expr>),
}

/// Shared body of list, set and generator comprehensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub element: Spanned<Expr>,
    pub clauses: Vec<Spanned<ComprehensionClause>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictComprehension {
    pub key: Spanned<Expr>,
    pub value: Spanned<Expr>,
    pub clauses: Vec<Spanned<ComprehensionClause>>,
}

/// `[async] for target in iter [if cond]*`
#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensionClause {
    pub is_async: bool,
    pub target: Spanned<Expr>,
    pub iter: Spanned<Expr>,
    pub ifs: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FStringPart {
    Literal(String),
    Field(Box<ReplacementField>),
}

/// `{expr[=][!conv][:spec]}` inside an f-string.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementField {
    pub expr: Spanned<Expr>,
    /// `=` after the expression (self-documenting field)
    pub debug: bool,
    pub conversion: Option<Conversion>,
    /// `Some` as soon as a `:` is present, even for an empty spec
    pub format_spec: Option<Vec<Spanned<FStringPart>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `!s`
    Str,
    /// `!r`
    Repr,
    /// `!a`
    Ascii,
}

impl Conversion {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Conversion::Str),
            'r' => Some(Conversion::Repr),
            'a' => Some(Conversion::Ascii),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Conversion::Str => 's',
            Conversion::Repr => 'r',
            Conversion::Ascii => 'a',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    MatMul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Is,
    IsNot,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::In
                | BinaryOp::NotIn
                | BinaryOp::Is
                | BinaryOp::IsNot
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::MatMul => "@",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "not in",
            BinaryOp::Is => "is",
            BinaryOp::IsNot => "is not",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Invert,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Pos => write!(f, "+"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Invert => write!(f, "~"),
            UnaryOp::Not => write!(f, "not "),
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// A bare name that binds the subject
    Capture(Ident),
    /// Number, string, `None`, `True`, `False`; signed and complex numbers included
    Literal(Box<Spanned<Expr>>),
    /// Dotted name compared by equality, e.g. `Color.RED`
    Value(Box<Spanned<Expr>>),
    /// `(pattern)`
    Group(Box<Spanned<Pattern>>),
    Sequence(SequenceKind, Vec<Spanned<Pattern>>),
    /// `*name`; `None` for `*_`
    Star(Option<Ident>),
    Mapping(MappingPattern),
    Class(ClassPattern),
    /// Two or more alternatives; a single alternative is never wrapped
    Or(Vec<Spanned<Pattern>>),
    /// `pattern as name`
    As(Box<Spanned<Pattern>>, Ident),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// `[a, b]`
    List,
    /// `(a, b)` or an open `a, b`
    Tuple,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingPattern {
    pub entries: Vec<Spanned<MappingEntry>>,
    /// `**rest`
    pub rest: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: Spanned<Expr>,
    pub pattern: Spanned<Pattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassPattern {
    pub class: Spanned<Expr>,
    pub patterns: Vec<Spanned<Pattern>>,
    pub keywords: Vec<Spanned<KeywordPattern>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordPattern {
    pub name: Ident,
    pub pattern: Spanned<Pattern>,
}

// ============================================================================
// Visitor trait for AST traversal
// ============================================================================

/// Depth-first traversal over a [`Module`].
///
/// Every `visit_*` method defaults to the matching `walk_*` function, so an implementor overrides only the nodes it
/// cares about and calls `walk_*` to keep descending.
pub trait Visitor {
    fn visit_module(&mut self, module: &Module) {
        for stmt in &module.body {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Spanned<Statement>) {
        walk_statement(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &Spanned<Pattern>) {
        walk_pattern(self, pattern);
    }
}

fn walk_body<V: Visitor + ?Sized>(visitor: &mut V, body: &[Spanned<Statement>]) {
    for stmt in body {
        visitor.visit_statement(stmt);
    }
}

fn walk_params<V: Visitor + ?Sized>(visitor: &mut V, params: &[Spanned<Param>]) {
    for param in params {
        if let Some(annotation) = &param.node.annotation {
            visitor.visit_expr(annotation);
        }
        if let Some(default) = &param.node.default {
            visitor.visit_expr(default);
        }
    }
}

fn walk_type_params<V: Visitor + ?Sized>(visitor: &mut V, params: &[Spanned<TypeParam>]) {
    for param in params {
        if let Some(bound) = &param.node.bound {
            visitor.visit_expr(bound);
        }
    }
}

fn walk_args<V: Visitor + ?Sized>(visitor: &mut V, args: &[Spanned<CallArg>]) {
    for arg in args {
        match &arg.node {
            CallArg::Positional(e) | CallArg::Keyword(_, e) | CallArg::Starred(e) | CallArg::DoubleStarred(e) => {
                visitor.visit_expr(e)
            }
        }
    }
}

fn walk_clauses<V: Visitor + ?Sized>(visitor: &mut V, clauses: &[Spanned<ComprehensionClause>]) {
    for clause in clauses {
        visitor.visit_expr(&clause.node.target);
        visitor.visit_expr(&clause.node.iter);
        for cond in &clause.node.ifs {
            visitor.visit_expr(cond);
        }
    }
}

fn walk_fstring<V: Visitor + ?Sized>(visitor: &mut V, parts: &[Spanned<FStringPart>]) {
    for part in parts {
        if let FStringPart::Field(field) = &part.node {
            visitor.visit_expr(&field.expr);
            if let Some(spec) = &field.format_spec {
                walk_fstring(visitor, spec);
            }
        }
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Spanned<Statement>) {
    match &stmt.node {
        Statement::Expr(e) => visitor.visit_expr(e),
        Statement::Assign(a) => {
            visitor.visit_expr(&a.target);
            visitor.visit_expr(&a.value);
        }
        Statement::AnnAssign(a) => {
            visitor.visit_expr(&a.target);
            visitor.visit_expr(&a.annotation);
            if let Some(v) = &a.value {
                visitor.visit_expr(v);
            }
        }
        Statement::Return(value) => {
            if let Some(v) = value {
                visitor.visit_expr(v);
            }
        }
        Statement::Raise(r) => {
            for e in r.exception.iter().chain(&r.cause) {
                visitor.visit_expr(e);
            }
        }
        Statement::Pass
        | Statement::Break
        | Statement::Continue
        | Statement::Global(_)
        | Statement::Nonlocal(_)
        | Statement::Import(_)
        | Statement::ImportFrom(_) => {}
        Statement::Del(targets) => {
            for t in targets {
                visitor.visit_expr(t);
            }
        }
        Statement::Assert(a) => {
            visitor.visit_expr(&a.test);
            if let Some(m) = &a.message {
                visitor.visit_expr(m);
            }
        }
        Statement::FunctionDef(def) => {
            for d in &def.decorators {
                visitor.visit_expr(d);
            }
            walk_type_params(visitor, &def.type_params);
            walk_params(visitor, &def.params);
            if let Some(r) = &def.returns {
                visitor.visit_expr(r);
            }
            walk_body(visitor, &def.body);
        }
        Statement::ClassDef(class) => {
            for d in &class.decorators {
                visitor.visit_expr(d);
            }
            walk_type_params(visitor, &class.type_params);
            walk_args(visitor, &class.arguments);
            walk_body(visitor, &class.body);
        }
        Statement::If(s) => {
            visitor.visit_expr(&s.condition);
            walk_body(visitor, &s.body);
            walk_body(visitor, &s.orelse);
        }
        Statement::While(s) => {
            visitor.visit_expr(&s.condition);
            walk_body(visitor, &s.body);
            walk_body(visitor, &s.orelse);
        }
        Statement::For(s) => {
            visitor.visit_expr(&s.target);
            visitor.visit_expr(&s.iter);
            walk_body(visitor, &s.body);
            walk_body(visitor, &s.orelse);
        }
        Statement::With(s) => {
            for item in &s.items {
                visitor.visit_expr(&item.node.context);
                if let Some(t) = &item.node.target {
                    visitor.visit_expr(t);
                }
            }
            walk_body(visitor, &s.body);
        }
        Statement::Try(s) => {
            walk_body(visitor, &s.body);
            for h in &s.handlers {
                if let Some(kind) = &h.node.kind {
                    visitor.visit_expr(kind);
                }
                walk_body(visitor, &h.node.body);
            }
            walk_body(visitor, &s.orelse);
            walk_body(visitor, &s.finalbody);
        }
        Statement::Match(m) => {
            visitor.visit_expr(&m.subject);
            for case in &m.cases {
                visitor.visit_pattern(&case.node.pattern);
                if let Some(g) = &case.node.guard {
                    visitor.visit_expr(g);
                }
                walk_body(visitor, &case.node.body);
            }
        }
        Statement::TypeAlias(t) => {
            walk_type_params(visitor, &t.type_params);
            visitor.visit_expr(&t.value);
        }
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Name(_) | Expr::Literal(_) => {}
        Expr::Unary(_, e)
        | Expr::NamedExpr(_, e)
        | Expr::Await(e)
        | Expr::YieldFrom(e)
        | Expr::Starred(e)
        | Expr::Attribute(e, _)
        | Expr::Group(e) => visitor.visit_expr(e),
        Expr::Yield(value) => {
            if let Some(v) = value {
                visitor.visit_expr(v);
            }
        }
        Expr::Binary(l, _, r) => {
            visitor.visit_expr(l);
            visitor.visit_expr(r);
        }
        Expr::Ternary(t) => {
            visitor.visit_expr(&t.body);
            visitor.visit_expr(&t.condition);
            visitor.visit_expr(&t.orelse);
        }
        Expr::Lambda(l) => {
            walk_params(visitor, &l.params);
            visitor.visit_expr(&l.body);
        }
        Expr::Call(callee, args) => {
            visitor.visit_expr(callee);
            walk_args(visitor, args);
        }
        Expr::Subscript(value, entries) => {
            visitor.visit_expr(value);
            for e in entries {
                visitor.visit_expr(e);
            }
        }
        Expr::Slice(s) => {
            for part in [&s.start, &s.end, &s.step].into_iter().flatten() {
                visitor.visit_expr(part);
            }
        }
        Expr::Tuple(items) | Expr::List(items) | Expr::Set(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        Expr::Dict(entries) => {
            for entry in entries {
                match &entry.node {
                    DictEntry::Pair(k, v) => {
                        visitor.visit_expr(k);
                        visitor.visit_expr(v);
                    }
                    DictEntry::Unpack(m) => visitor.visit_expr(m),
                }
            }
        }
        Expr::ListComp(c) | Expr::SetComp(c) | Expr::GenExpr(c) => {
            visitor.visit_expr(&c.element);
            walk_clauses(visitor, &c.clauses);
        }
        Expr::DictComp(c) => {
            visitor.visit_expr(&c.key);
            visitor.visit_expr(&c.value);
            walk_clauses(visitor, &c.clauses);
        }
        Expr::FString(parts) => walk_fstring(visitor, parts),
    }
}

pub fn walk_pattern<V: Visitor + ?Sized>(visitor: &mut V, pattern: &Spanned<Pattern>) {
    match &pattern.node {
        Pattern::Wildcard | Pattern::Capture(_) | Pattern::Star(_) => {}
        Pattern::Literal(e) | Pattern::Value(e) => visitor.visit_expr(e),
        Pattern::Group(p) | Pattern::As(p, _) => visitor.visit_pattern(p),
        Pattern::Sequence(_, items) | Pattern::Or(items) => {
            for p in items {
                visitor.visit_pattern(p);
            }
        }
        Pattern::Mapping(m) => {
            for entry in &m.entries {
                visitor.visit_expr(&entry.node.key);
                visitor.visit_pattern(&entry.node.pattern);
            }
        }
        Pattern::Class(c) => {
            visitor.visit_expr(&c.class);
            for p in &c.patterns {
                visitor.visit_pattern(p);
            }
            for kw in &c.keywords {
                visitor.visit_pattern(&kw.node.pattern);
            }
        }
    }
}
