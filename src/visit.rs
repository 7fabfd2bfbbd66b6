//! AST visitor infrastructure
//!
//! A read-only `Visitor` trait plus `walk_*` free functions for traversing
//! the parsed program. Implement the trait for a pass, override only the
//! methods you need, and call the corresponding `walk_*` function inside an
//! override to get default recursion. Omit the walk call to prune traversal
//! at that node.
//!
//! ```rust
//! use recast::visit::{Visitor, walk_expr};
//! use recast::parser::ast::Expr;
//! use recast::span::Spanned;
//! use std::collections::HashSet;
//!
//! struct VarCollector {
//!     names: HashSet<String>,
//! }
//!
//! impl Visitor for VarCollector {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if let Expr::UserVar(name) = &expr.node {
//!             self.names.insert(name.clone());
//!         }
//!         walk_expr(self, expr); // Continue recursion
//!     }
//! }
//! ```
//!
//! Passes where most match arms would carry custom logic (like the scope
//! resolver) traverse manually instead; the visitor is for collection passes
//! that care about a handful of node kinds.

use crate::parser::ast::*;
use crate::span::Spanned;

/// Read-only AST visitor. Default implementations recurse into all children.
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_import(&mut self, import: &Spanned<ImportDecl>) {
        walk_import(self, import);
    }

    fn visit_class(&mut self, class: &Spanned<ClassDecl>) {
        walk_class(self, class);
    }

    fn visit_member_decl(&mut self, member: &Spanned<MemberDecl>) {
        walk_member_decl(self, member);
    }

    fn visit_member_impl(&mut self, member: &Spanned<MemberImpl>) {
        walk_member_impl(self, member);
    }

    fn visit_function(&mut self, func: &Spanned<FunctionDecl>) {
        walk_function(self, func);
    }

    fn visit_block(&mut self, block: &Spanned<Block>) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_type_path(&mut self, ty: &Spanned<TypePath>) {
        walk_type_path(self, ty);
    }
}

pub fn walk_program<V: Visitor>(v: &mut V, program: &Program) {
    for import in &program.imports {
        v.visit_import(import);
    }
    if let Some(class) = &program.class {
        v.visit_class(class);
    }
    for member in &program.implementations {
        v.visit_member_impl(member);
    }
    for func in &program.functions {
        v.visit_function(func);
    }
    for stmt in &program.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_import<V: Visitor>(_v: &mut V, _import: &Spanned<ImportDecl>) {
    // Import paths are plain segment lists, not TypePath nodes; passes that
    // collect qualified references never see them through this walker.
}

pub fn walk_class<V: Visitor>(v: &mut V, class: &Spanned<ClassDecl>) {
    if let Some(extends) = &class.node.extends {
        v.visit_type_path(extends);
    }
    for section in &class.node.sections {
        for member in &section.members {
            v.visit_member_decl(member);
        }
    }
}

pub fn walk_member_decl<V: Visitor>(v: &mut V, member: &Spanned<MemberDecl>) {
    match &member.node {
        MemberDecl::Method(decl) => {
            for param in &decl.params {
                if let Some(ty) = &param.ty {
                    v.visit_type_path(ty);
                }
            }
            if let Some(returns) = &decl.returns {
                v.visit_type_path(returns);
            }
        }
        MemberDecl::Property(decl) => v.visit_type_path(&decl.ty),
        MemberDecl::Instance(decl) => v.visit_type_path(&decl.ty),
        MemberDecl::Constant(decl) => v.visit_expr(&decl.value),
    }
}

pub fn walk_member_impl<V: Visitor>(v: &mut V, member: &Spanned<MemberImpl>) {
    match &member.node {
        MemberImpl::Method(m) => v.visit_block(&m.body),
        MemberImpl::Getter(a) | MemberImpl::Setter(a) => v.visit_block(&a.body),
    }
}

pub fn walk_function<V: Visitor>(v: &mut V, func: &Spanned<FunctionDecl>) {
    for param in &func.node.params {
        if let Some(ty) = &param.ty {
            v.visit_type_path(ty);
        }
    }
    if let Some(returns) = &func.node.returns {
        v.visit_type_path(returns);
    }
    v.visit_block(&func.node.body);
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Spanned<Block>) {
    for stmt in &block.node.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::LocalDecl { ty, init, .. } => {
            v.visit_type_path(ty);
            if let Some(init) = init {
                v.visit_expr(init);
            }
        }
        Stmt::Assign { target, value } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Stmt::If { condition, then_block, else_block } => {
            v.visit_expr(condition);
            v.visit_block(then_block);
            if let Some(else_block) = else_block {
                v.visit_block(else_block);
            }
        }
        Stmt::For { from, to, step, body, .. } => {
            v.visit_expr(from);
            v.visit_expr(to);
            if let Some(step) = step {
                v.visit_expr(step);
            }
            v.visit_block(body);
        }
        Stmt::While { condition, body } => {
            v.visit_expr(condition);
            v.visit_block(body);
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::NumberLit(_)
        | Expr::StringLit(_)
        | Expr::BoolLit(_)
        | Expr::Null
        | Expr::UserVar(_)
        | Expr::SystemVar(_)
        | Expr::Ident(_)
        | Expr::Path(_) => {}
        Expr::Create { path, args } => {
            v.visit_type_path(path);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Call { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Member { object, .. } => v.visit_expr(object),
        Expr::BinOp { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::UnaryOp { operand, .. } => v.visit_expr(operand),
    }
}

pub fn walk_type_path<V: Visitor>(_v: &mut V, _ty: &Spanned<TypePath>) {
    // Leaf node; segments carry no nested structure.
}
