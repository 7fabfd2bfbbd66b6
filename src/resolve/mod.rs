//! Scope-aware symbol resolution.
//!
//! One pre-order traversal of the parsed program builds a [`ScopeTree`]:
//! every lexical scope (program root, method/function/getter/setter bodies,
//! statement blocks), every declaration (locals, parameters, instance
//! variables, constants, private methods), and every reference back to its
//! declaration. The tree is an index-based arena — scopes and symbols live in
//! flat vectors, parent links are plain indices — so ancestor search needs no
//! ownership cycles.
//!
//! Declarations are registered before any reference in the same scope is
//! considered. Class-header members hoist: instance variables, constants and
//! private methods land in the root scope no matter where traversal finds
//! them, while locals and parameters bind into the innermost open scope.
//! Name lookup is case-insensitive, innermost-out (shadowing).
//!
//! The tree is read-only after `resolve` returns and is discarded at the end
//! of the invocation; nothing is cached across refactors.

use std::collections::{HashMap, HashSet};

use crate::parser::ast::*;
use crate::span::{Span, Spanned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Method,
    Function,
    Getter,
    Setter,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Local,
    Parameter,
    Instance,
    Constant,
    PrivateMethod,
}

impl SymbolKind {
    /// Kinds whose names carry the `&` sigil.
    pub fn requires_sigil(&self) -> bool {
        !matches!(self, SymbolKind::PrivateMethod)
    }
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub span: Span,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Declared names (case-folded) to symbols.
    symbols: HashMap<String, SymbolId>,
}

#[derive(Debug)]
pub struct SymbolInfo {
    /// The name as declared, sigil included for variables.
    pub name: String,
    pub kind: SymbolKind,
    pub declared_type: Option<String>,
    pub declaration_span: Span,
    /// Every recorded occurrence; always includes the declaration span.
    pub references: Vec<Span>,
    pub owner: ScopeId,
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<SymbolInfo>,
    /// Root-level names that are bound but not renameable through this
    /// engine (the class itself, public/protected methods, properties,
    /// top-level functions). Collision checks must still see them.
    reserved: HashSet<String>,
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl ScopeTree {
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolInfo {
        &self.symbols[id.0]
    }

    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.symbols.len()).map(SymbolId)
    }

    /// The innermost scope whose span contains `offset`.
    pub fn scope_at(&self, offset: usize) -> ScopeId {
        let mut current = self.root();
        'descend: loop {
            for &child in &self.scopes[current.0].children {
                if self.scopes[child.0].span.contains(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// The symbol whose declaration span contains `offset`, if any.
    pub fn symbol_at(&self, offset: usize) -> Option<SymbolId> {
        self.symbols()
            .find(|&id| self.symbol(id).declaration_span.contains(offset))
    }

    /// The symbol whose declaration *or any reference* contains `offset`.
    ///
    /// Searches the scope chain from the innermost scope containing the
    /// offset outward, declarations before references at each level, so a
    /// declaration match always wins over a reference match. Falls back to a
    /// whole-tree scan for declarations positioned outside their owning
    /// scope's span (a method parameter is declared in the class header but
    /// owned by the method body scope).
    pub fn symbol_at_reference(&self, offset: usize) -> Option<SymbolId> {
        let mut scope = Some(self.scope_at(offset));
        while let Some(id) = scope {
            let here = &self.scopes[id.0];
            let mut ids: Vec<SymbolId> = here.symbols.values().copied().collect();
            ids.sort_by_key(|id| id.0);
            if let Some(&found) = ids
                .iter()
                .find(|&&sym| self.symbol(sym).declaration_span.contains(offset))
            {
                return Some(found);
            }
            if let Some(&found) = ids.iter().find(|&&sym| {
                self.symbol(sym)
                    .references
                    .iter()
                    .any(|r| r.contains(offset))
            }) {
                return Some(found);
            }
            scope = here.parent;
        }

        self.symbol_at(offset).or_else(|| {
            self.symbols().find(|&id| {
                self.symbol(id)
                    .references
                    .iter()
                    .any(|r| r.contains(offset))
            })
        })
    }

    /// Every recorded reference of `symbol`, declaration included.
    pub fn references_of(&self, symbol: SymbolId) -> &[Span] {
        &self.symbol(symbol).references
    }

    /// True if `name` is visible from `scope` (the scope or an ancestor
    /// binds it), bound in any scope nested inside `scope`, or reserved at
    /// the root. Used for rename collision checks: a hit anywhere here means
    /// the rename could capture or be captured.
    pub fn is_name_bound(&self, scope: ScopeId, name: &str) -> bool {
        let folded = fold(name);

        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scopes[id.0].symbols.contains_key(&folded) {
                return true;
            }
            current = self.scopes[id.0].parent;
        }

        let mut stack: Vec<ScopeId> = self.scopes[scope.0].children.clone();
        while let Some(id) = stack.pop() {
            if self.scopes[id.0].symbols.contains_key(&folded) {
                return true;
            }
            stack.extend(self.scopes[id.0].children.iter().copied());
        }

        self.reserved.contains(&folded)
    }

    /// Look a name up from `scope` outward, shadowing honored.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let folded = fold(name);
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(&sym) = self.scopes[id.0].symbols.get(&folded) {
                return Some(sym);
            }
            current = self.scopes[id.0].parent;
        }
        None
    }
}

/// Build the scope tree for one program. Infallible: unresolved references
/// are simply not recorded, and callers decide whether a missing symbol is
/// an error.
pub fn resolve(program: &Program) -> ScopeTree {
    let mut resolver = Resolver::new();
    resolver.run(program);
    resolver.tree
}

/// Traversal state: the tree under construction plus the stack of open
/// scopes. The stack is explicit so the single-pass contract is visible in
/// the code rather than hidden in visitor object fields.
struct Resolver {
    tree: ScopeTree,
    stack: Vec<ScopeId>,
}

impl Resolver {
    fn new() -> Self {
        let root = Scope {
            kind: ScopeKind::Program,
            span: Span::new(0, usize::MAX),
            parent: None,
            children: Vec::new(),
            symbols: HashMap::new(),
        };
        Self {
            tree: ScopeTree {
                scopes: vec![root],
                symbols: Vec::new(),
                reserved: HashSet::new(),
            },
            stack: vec![ScopeId(0)],
        }
    }

    fn current(&self) -> ScopeId {
        *self.stack.last().expect("scope stack is never empty")
    }

    fn push_scope(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let parent = self.current();
        let id = ScopeId(self.tree.scopes.len());
        self.tree.scopes.push(Scope {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
            symbols: HashMap::new(),
        });
        self.tree.scopes[parent.0].children.push(id);
        self.stack.push(id);
        id
    }

    fn pop_scope(&mut self) {
        self.stack.pop();
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        name: &Spanned<String>,
        kind: SymbolKind,
        declared_type: Option<String>,
    ) {
        let folded = fold(&name.node);
        if self.tree.scopes[scope.0].symbols.contains_key(&folded) {
            // Redeclaration in the same scope; the first declaration wins
            // and this occurrence counts as a reference of it.
            self.record_use_in(scope, &name.node, name.span);
            return;
        }
        let id = SymbolId(self.tree.symbols.len());
        self.tree.symbols.push(SymbolInfo {
            name: name.node.clone(),
            kind,
            declared_type,
            declaration_span: name.span,
            references: vec![name.span],
            owner: scope,
        });
        self.tree.scopes[scope.0].symbols.insert(folded, id);
    }

    fn reserve(&mut self, name: &str) {
        self.tree.reserved.insert(fold(name));
    }

    /// Record a use of `name` resolved from the current scope outward.
    fn record_use(&mut self, name: &str, span: Span) {
        self.record_use_in(self.current(), name, span);
    }

    fn record_use_in(&mut self, scope: ScopeId, name: &str, span: Span) {
        if let Some(sym) = self.tree.lookup(scope, name) {
            self.tree.symbols[sym.0].references.push(span);
        }
    }

    /// Record a call or `%This.` reference that may target a private method.
    fn record_member_use(&mut self, name: &str, span: Span) {
        let root = self.tree.root();
        if let Some(sym) = self.tree.lookup(root, name)
            && self.tree.symbol(sym).kind == SymbolKind::PrivateMethod
        {
            self.tree.symbols[sym.0].references.push(span);
        }
    }

    // ====================================================================
    // Traversal
    // ====================================================================

    fn run(&mut self, program: &Program) {
        // Header declarations first: hoisted members must be registered
        // before any implementation body references them.
        if let Some(class) = &program.class {
            self.class_header(&class.node);
        }

        for member in &program.implementations {
            self.member_impl(program, member);
        }

        for func in &program.functions {
            self.function(func);
        }

        if !program.stmts.is_empty() {
            let first = program.stmts.first().map(|s| s.span.start).unwrap_or(0);
            let last = program.stmts.last().map(|s| s.span.end).unwrap_or(first);
            self.push_scope(ScopeKind::Block, Span::new(first, last));
            for stmt in &program.stmts {
                self.stmt(stmt);
            }
            self.pop_scope();
        }
    }

    fn class_header(&mut self, class: &ClassDecl) {
        let root = self.tree.root();
        self.reserve(&class.name.node);

        for section in &class.sections {
            for member in &section.members {
                match &member.node {
                    MemberDecl::Method(decl) => {
                        if section.visibility == Visibility::Private {
                            let returns = decl.returns.as_ref().map(|t| t.node.full_path());
                            self.declare(root, &decl.name, SymbolKind::PrivateMethod, returns);
                        } else {
                            self.reserve(&decl.name.node);
                        }
                    }
                    MemberDecl::Property(decl) => {
                        self.reserve(&decl.name.node);
                    }
                    MemberDecl::Instance(decl) => {
                        let ty = decl.ty.node.full_path();
                        for name in &decl.names {
                            self.declare(root, name, SymbolKind::Instance, Some(ty.clone()));
                        }
                    }
                    MemberDecl::Constant(decl) => {
                        self.declare(root, &decl.name, SymbolKind::Constant, None);
                        self.expr(&decl.value);
                    }
                }
            }
        }
    }

    fn member_impl(&mut self, program: &Program, member: &Spanned<MemberImpl>) {
        let class = program.class.as_ref().map(|c| &c.node);
        match &member.node {
            MemberImpl::Method(m) => {
                // The implementation's name is itself a reference of a
                // private method symbol.
                self.record_member_use(&m.name.node, m.name.span);

                self.push_scope(ScopeKind::Method, member.span);
                if let Some(decl) = class.and_then(|c| find_method_decl(c, &m.name.node)) {
                    for param in &decl.params {
                        let ty = param.ty.as_ref().map(|t| t.node.full_path());
                        self.declare(self.current(), &param.name, SymbolKind::Parameter, ty);
                    }
                }
                self.block_stmts(&m.body);
                self.pop_scope();
            }
            MemberImpl::Getter(a) => {
                self.push_scope(ScopeKind::Getter, member.span);
                self.block_stmts(&a.body);
                self.pop_scope();
            }
            MemberImpl::Setter(a) => {
                self.push_scope(ScopeKind::Setter, member.span);
                self.block_stmts(&a.body);
                self.pop_scope();
            }
        }
    }

    fn function(&mut self, func: &Spanned<FunctionDecl>) {
        self.reserve(&func.node.name.node);
        self.push_scope(ScopeKind::Function, func.span);
        for param in &func.node.params {
            let ty = param.ty.as_ref().map(|t| t.node.full_path());
            self.declare(self.current(), &param.name, SymbolKind::Parameter, ty);
        }
        self.block_stmts(&func.node.body);
        self.pop_scope();
    }

    /// Visit a body's statements without opening another scope: the caller
    /// already pushed the body scope.
    fn block_stmts(&mut self, block: &Spanned<Block>) {
        for stmt in &block.node.stmts {
            self.stmt(stmt);
        }
    }

    /// Nested statement blocks (then/else branches, loop bodies) each get a
    /// Block scope of their own.
    fn nested_block(&mut self, block: &Spanned<Block>) {
        self.push_scope(ScopeKind::Block, block.span);
        self.block_stmts(block);
        self.pop_scope();
    }

    fn stmt(&mut self, stmt: &Spanned<Stmt>) {
        match &stmt.node {
            Stmt::LocalDecl { ty, names, init } => {
                let declared = ty.node.full_path();
                for name in names {
                    self.declare(
                        self.current(),
                        name,
                        SymbolKind::Local,
                        Some(declared.clone()),
                    );
                }
                if let Some(init) = init {
                    self.expr(init);
                }
            }
            Stmt::Assign { target, value } => {
                self.expr(target);
                self.expr(value);
            }
            Stmt::If { condition, then_block, else_block } => {
                self.expr(condition);
                self.nested_block(then_block);
                if let Some(else_block) = else_block {
                    self.nested_block(else_block);
                }
            }
            Stmt::For { var, from, to, step, body } => {
                // The loop variable is an ordinary reference when already
                // declared, and an implicit local of the enclosing scope
                // otherwise.
                if self.tree.lookup(self.current(), &var.node).is_some() {
                    self.record_use(&var.node, var.span);
                } else {
                    self.declare(self.current(), var, SymbolKind::Local, None);
                }
                self.expr(from);
                self.expr(to);
                if let Some(step) = step {
                    self.expr(step);
                }
                self.nested_block(body);
            }
            Stmt::While { condition, body } => {
                self.expr(condition);
                self.nested_block(body);
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            Stmt::Expr(expr) => self.expr(expr),
        }
    }

    fn expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::NumberLit(_)
            | Expr::StringLit(_)
            | Expr::BoolLit(_)
            | Expr::Null
            | Expr::SystemVar(_)
            | Expr::Path(_) => {}
            Expr::UserVar(name) => self.record_use(name, expr.span),
            Expr::Ident(_) => {
                // A bare non-call name is a property or an unresolved global;
                // neither is a symbol this engine tracks.
            }
            Expr::Create { args, .. } => {
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Call { callee, args } => {
                match &callee.node {
                    Expr::Ident(name) => {
                        self.record_member_use(name, callee.span);
                    }
                    Expr::Member { object, name }
                        if matches!(&object.node, Expr::SystemVar(v) if fold(v) == "%this") =>
                    {
                        self.record_member_use(&name.node, name.span);
                    }
                    _ => self.expr(callee),
                }
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Member { object, name } => {
                if matches!(&object.node, Expr::SystemVar(v) if fold(v) == "%this") {
                    self.record_member_use(&name.node, name.span);
                }
                self.expr(object);
            }
            Expr::BinOp { lhs, rhs, .. } => {
                self.expr(lhs);
                self.expr(rhs);
            }
            Expr::UnaryOp { operand, .. } => self.expr(operand),
        }
    }
}

fn find_method_decl<'a>(class: &'a ClassDecl, name: &str) -> Option<&'a MethodDecl> {
    let folded = fold(name);
    class.sections.iter().flat_map(|s| &s.members).find_map(|m| {
        if let MemberDecl::Method(decl) = &m.node
            && fold(&decl.name.node) == folded
        {
            Some(decl)
        } else {
            None
        }
    })
}
