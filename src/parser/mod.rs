pub mod ast;

use crate::diagnostics::RefactorError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    prev_end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0, prev_end: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek2(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos + 1)
    }

    fn at(&self, token: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(&t.node) == std::mem::discriminant(token))
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            self.prev_end = tok.span.end;
            Some(tok)
        } else {
            None
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span, RefactorError> {
        match self.peek() {
            Some(tok)
                if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) =>
            {
                let span = tok.span;
                self.advance();
                Ok(span)
            }
            Some(tok) => Err(RefactorError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(RefactorError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, RefactorError> {
        match self.peek() {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                let span = tok.span;
                self.advance();
                Ok(Spanned::new(name, span))
            }
            Some(tok) => Err(RefactorError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(RefactorError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn expect_user_var(&mut self) -> Result<Spanned<String>, RefactorError> {
        match self.peek() {
            Some(tok) if matches!(tok.node, Token::UserVar) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                let span = tok.span;
                self.advance();
                Ok(Spanned::new(name, span))
            }
            Some(tok) => Err(RefactorError::syntax(
                format!("expected &variable, found {}", tok.node),
                tok.span,
            )),
            None => Err(RefactorError::syntax(
                "expected &variable, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // ========================================================================
    // Program structure
    // ========================================================================

    pub fn parse_program(&mut self) -> Result<Program, RefactorError> {
        let mut program = Program {
            imports: Vec::new(),
            class: None,
            implementations: Vec::new(),
            functions: Vec::new(),
            stmts: Vec::new(),
        };

        while self.at(&Token::Import) {
            program.imports.push(self.parse_import()?);
        }

        if self.at(&Token::Class) {
            program.class = Some(self.parse_class()?);
            while !self.is_at_end() {
                program.implementations.push(self.parse_member_impl()?);
            }
        } else {
            while !self.is_at_end() {
                if self.at(&Token::Function) {
                    program.functions.push(self.parse_function()?);
                } else {
                    program.stmts.push(self.parse_stmt()?);
                }
            }
        }

        Ok(program)
    }

    fn parse_import(&mut self) -> Result<Spanned<ImportDecl>, RefactorError> {
        let start = self.expect(&Token::Import)?.start;
        let mut path = vec![self.expect_ident()?];
        let mut wildcard = false;
        while self.eat(&Token::Colon) {
            if self.eat(&Token::Star) {
                wildcard = true;
                break;
            }
            path.push(self.expect_ident()?);
        }
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            ImportDecl { path, wildcard },
            self.span_from(start),
        ))
    }

    fn parse_type(&mut self) -> Result<Spanned<TypePath>, RefactorError> {
        let first = self.expect_ident()?;
        let start = first.span.start;
        let mut segments = vec![first];
        while self.at(&Token::Colon) && matches!(self.peek2().map(|t| &t.node), Some(Token::Ident))
        {
            self.advance(); // ':'
            segments.push(self.expect_ident()?);
        }
        Ok(Spanned::new(TypePath { segments }, self.span_from(start)))
    }

    // ========================================================================
    // Class header
    // ========================================================================

    fn parse_class(&mut self) -> Result<Spanned<ClassDecl>, RefactorError> {
        let start = self.expect(&Token::Class)?.start;
        let name = self.expect_ident()?;
        let extends = if self.eat(&Token::Extends) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut sections = vec![MemberSection {
            visibility: Visibility::Public,
            members: Vec::new(),
        }];

        loop {
            match self.peek().map(|t| &t.node) {
                Some(Token::EndClass) => break,
                Some(Token::Public) => {
                    self.advance();
                    sections.push(MemberSection {
                        visibility: Visibility::Public,
                        members: Vec::new(),
                    });
                }
                Some(Token::Protected) => {
                    self.advance();
                    sections.push(MemberSection {
                        visibility: Visibility::Protected,
                        members: Vec::new(),
                    });
                }
                Some(Token::Private) => {
                    self.advance();
                    sections.push(MemberSection {
                        visibility: Visibility::Private,
                        members: Vec::new(),
                    });
                }
                Some(_) => {
                    let member = self.parse_member_decl()?;
                    sections
                        .last_mut()
                        .expect("sections is never empty")
                        .members
                        .push(member);
                }
                None => {
                    return Err(RefactorError::syntax(
                        "expected 'end-class', found end of file",
                        self.eof_span(),
                    ));
                }
            }
        }

        self.expect(&Token::EndClass)?;
        self.expect(&Token::Semicolon)?;

        // Drop the implicit public section if nothing landed in it.
        if sections.len() > 1 && sections[0].members.is_empty() {
            sections.remove(0);
        }

        Ok(Spanned::new(
            ClassDecl { name, extends, sections },
            self.span_from(start),
        ))
    }

    fn parse_member_decl(&mut self) -> Result<Spanned<MemberDecl>, RefactorError> {
        match self.peek().map(|t| &t.node) {
            Some(Token::Method) => self.parse_method_decl(),
            Some(Token::Property) => self.parse_property_decl(),
            Some(Token::Instance) => self.parse_instance_decl(),
            Some(Token::Constant) => self.parse_constant_decl(),
            Some(other) => Err(RefactorError::syntax(
                format!("expected a class member declaration, found {other}"),
                self.peek().map(|t| t.span).unwrap_or_else(Span::dummy),
            )),
            None => Err(RefactorError::syntax(
                "expected a class member declaration, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn parse_method_decl(&mut self) -> Result<Spanned<MemberDecl>, RefactorError> {
        let start = self.expect(&Token::Method)?.start;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(&Token::RParen)?;
        let returns = if self.eat(&Token::Returns) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let is_abstract = self.eat(&Token::Abstract);
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            MemberDecl::Method(MethodDecl { name, params, returns, is_abstract }),
            self.span_from(start),
        ))
    }

    fn parse_property_decl(&mut self) -> Result<Spanned<MemberDecl>, RefactorError> {
        let start = self.expect(&Token::Property)?.start;
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let mut has_get = false;
        let mut has_set = false;
        let mut readonly = false;
        loop {
            if self.eat(&Token::Get) {
                has_get = true;
            } else if self.eat(&Token::Set) {
                has_set = true;
            } else if self.eat(&Token::ReadOnly) {
                readonly = true;
            } else if self.eat(&Token::Abstract) {
                // Abstract properties have no implementation; nothing to track.
            } else {
                break;
            }
        }
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            MemberDecl::Property(PropertyDecl { ty, name, has_get, has_set, readonly }),
            self.span_from(start),
        ))
    }

    fn parse_instance_decl(&mut self) -> Result<Spanned<MemberDecl>, RefactorError> {
        let start = self.expect(&Token::Instance)?.start;
        let ty = self.parse_type()?;
        let mut names = vec![self.expect_user_var()?];
        while self.eat(&Token::Comma) {
            names.push(self.expect_user_var()?);
        }
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            MemberDecl::Instance(InstanceDecl { ty, names }),
            self.span_from(start),
        ))
    }

    fn parse_constant_decl(&mut self) -> Result<Spanned<MemberDecl>, RefactorError> {
        let start = self.expect(&Token::Constant)?.start;
        let name = self.expect_user_var()?;
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            MemberDecl::Constant(ConstantDecl { name, value }),
            self.span_from(start),
        ))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, RefactorError> {
        let mut params = Vec::new();
        if self.at(&Token::RParen) {
            return Ok(params);
        }
        loop {
            let name = self.expect_user_var()?;
            let ty = if self.eat(&Token::As) {
                Some(self.parse_type()?)
            } else {
                None
            };
            let is_out = self.eat(&Token::Out);
            params.push(Param { name, ty, is_out });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(params)
    }

    // ========================================================================
    // Implementations
    // ========================================================================

    fn parse_member_impl(&mut self) -> Result<Spanned<MemberImpl>, RefactorError> {
        match self.peek().map(|t| &t.node) {
            Some(Token::Method) => {
                let start = self.expect(&Token::Method)?.start;
                let name = self.expect_ident()?;
                let body = self.parse_block_until(&[Token::EndMethod])?;
                self.expect(&Token::EndMethod)?;
                self.expect(&Token::Semicolon)?;
                Ok(Spanned::new(
                    MemberImpl::Method(MethodImpl { name, body }),
                    self.span_from(start),
                ))
            }
            Some(Token::Get) => {
                let start = self.expect(&Token::Get)?.start;
                let name = self.expect_ident()?;
                let body = self.parse_block_until(&[Token::EndGet])?;
                self.expect(&Token::EndGet)?;
                self.expect(&Token::Semicolon)?;
                Ok(Spanned::new(
                    MemberImpl::Getter(AccessorImpl { name, body }),
                    self.span_from(start),
                ))
            }
            Some(Token::Set) => {
                let start = self.expect(&Token::Set)?.start;
                let name = self.expect_ident()?;
                let body = self.parse_block_until(&[Token::EndSet])?;
                self.expect(&Token::EndSet)?;
                self.expect(&Token::Semicolon)?;
                Ok(Spanned::new(
                    MemberImpl::Setter(AccessorImpl { name, body }),
                    self.span_from(start),
                ))
            }
            Some(other) => Err(RefactorError::syntax(
                format!("expected 'method', 'get' or 'set', found {other}"),
                self.peek().map(|t| t.span).unwrap_or_else(Span::dummy),
            )),
            None => Err(RefactorError::syntax(
                "expected an implementation, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn parse_function(&mut self) -> Result<Spanned<FunctionDecl>, RefactorError> {
        let start = self.expect(&Token::Function)?.start;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(&Token::RParen)?;
        let returns = if self.eat(&Token::Returns) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block_until(&[Token::EndFunction])?;
        self.expect(&Token::EndFunction)?;
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            FunctionDecl { name, params, returns, body },
            self.span_from(start),
        ))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse statements until one of `terminators` (not consumed).
    fn parse_block_until(&mut self, terminators: &[Token]) -> Result<Spanned<Block>, RefactorError> {
        let start = self.peek().map(|t| t.span.start).unwrap_or(self.prev_end);
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(tok) if terminators.iter().any(|t| {
                    std::mem::discriminant(&tok.node) == std::mem::discriminant(t)
                }) => break,
                Some(_) => stmts.push(self.parse_stmt()?),
            }
        }
        Ok(Spanned::new(Block { stmts }, self.span_from(start)))
    }

    fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        match self.peek().map(|t| &t.node) {
            Some(Token::Local) => self.parse_local_stmt(),
            Some(Token::If) => self.parse_if_stmt(),
            Some(Token::For) => self.parse_for_stmt(),
            Some(Token::While) => self.parse_while_stmt(),
            Some(Token::Return) => self.parse_return_stmt(),
            Some(_) => self.parse_expr_or_assign_stmt(),
            None => Err(RefactorError::syntax(
                "expected a statement, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn parse_local_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        let start = self.expect(&Token::Local)?.start;
        let ty = self.parse_type()?;
        let mut names = vec![self.expect_user_var()?];
        while self.eat(&Token::Comma) {
            names.push(self.expect_user_var()?);
        }
        let init = if self.eat(&Token::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            Stmt::LocalDecl { ty, names, init },
            self.span_from(start),
        ))
    }

    fn parse_if_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        let start = self.expect(&Token::If)?.start;
        let condition = self.parse_expr()?;
        self.expect(&Token::Then)?;
        let then_block = self.parse_block_until(&[Token::Else, Token::EndIf])?;
        let else_block = if self.eat(&Token::Else) {
            Some(self.parse_block_until(&[Token::EndIf])?)
        } else {
            None
        };
        self.expect(&Token::EndIf)?;
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            Stmt::If { condition, then_block, else_block },
            self.span_from(start),
        ))
    }

    fn parse_for_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        let start = self.expect(&Token::For)?.start;
        let var = self.expect_user_var()?;
        self.expect(&Token::Eq)?;
        let from = self.parse_expr()?;
        self.expect(&Token::To)?;
        let to = self.parse_expr()?;
        let step = if self.eat(&Token::Step) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&Token::Semicolon)?;
        let body = self.parse_block_until(&[Token::EndFor])?;
        self.expect(&Token::EndFor)?;
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            Stmt::For { var, from, to, step, body },
            self.span_from(start),
        ))
    }

    fn parse_while_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        let start = self.expect(&Token::While)?.start;
        let condition = self.parse_expr()?;
        let body = self.parse_block_until(&[Token::EndWhile])?;
        self.expect(&Token::EndWhile)?;
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(
            Stmt::While { condition, body },
            self.span_from(start),
        ))
    }

    fn parse_return_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        let start = self.expect(&Token::Return)?.start;
        let value = if self.at(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(Stmt::Return(value), self.span_from(start)))
    }

    /// `=` after a postfix expression at statement level is assignment; in
    /// every other position it parses as the equality operator.
    fn parse_expr_or_assign_stmt(&mut self) -> Result<Spanned<Stmt>, RefactorError> {
        let start = self.peek().map(|t| t.span.start).unwrap_or(self.prev_end);
        let lhs = self.parse_postfix()?;
        if self.eat(&Token::Eq) {
            let value = self.parse_expr()?;
            self.expect(&Token::Semicolon)?;
            return Ok(Spanned::new(
                Stmt::Assign { target: lhs, value },
                self.span_from(start),
            ));
        }
        let expr = self.parse_binary_from(lhs, 0)?;
        self.expect(&Token::Semicolon)?;
        Ok(Spanned::new(Stmt::Expr(expr), self.span_from(start)))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn parse_expr(&mut self) -> Result<Spanned<Expr>, RefactorError> {
        let lhs = self.parse_unary()?;
        self.parse_binary_from(lhs, 0)
    }

    fn binding_power(token: &Token) -> Option<(BinOp, u8)> {
        match token {
            Token::Or => Some((BinOp::Or, 1)),
            Token::And => Some((BinOp::And, 2)),
            Token::Eq => Some((BinOp::Eq, 3)),
            Token::Ne => Some((BinOp::Ne, 3)),
            Token::Lt => Some((BinOp::Lt, 3)),
            Token::Gt => Some((BinOp::Gt, 3)),
            Token::Le => Some((BinOp::Le, 3)),
            Token::Ge => Some((BinOp::Ge, 3)),
            Token::Pipe => Some((BinOp::Concat, 4)),
            Token::Plus => Some((BinOp::Add, 5)),
            Token::Minus => Some((BinOp::Sub, 5)),
            Token::Star => Some((BinOp::Mul, 6)),
            Token::Slash => Some((BinOp::Div, 6)),
            _ => None,
        }
    }

    fn parse_binary_from(
        &mut self,
        mut lhs: Spanned<Expr>,
        min_bp: u8,
    ) -> Result<Spanned<Expr>, RefactorError> {
        while let Some(tok) = self.peek() {
            let Some((op, bp)) = Self::binding_power(&tok.node) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.advance();
            let rhs_first = self.parse_unary()?;
            let rhs = self.parse_binary_from(rhs_first, bp + 1)?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>, RefactorError> {
        match self.peek().map(|t| &t.node) {
            Some(Token::Not) => {
                let start = self.expect(&Token::Not)?.start;
                let operand = self.parse_unary()?;
                let span = self.span_from(start);
                Ok(Spanned::new(
                    Expr::UnaryOp { op: UnaryOp::Not, operand: Box::new(operand) },
                    span,
                ))
            }
            Some(Token::Minus) => {
                let start = self.expect(&Token::Minus)?.start;
                let operand = self.parse_unary()?;
                let span = self.span_from(start);
                Ok(Spanned::new(
                    Expr::UnaryOp { op: UnaryOp::Neg, operand: Box::new(operand) },
                    span,
                ))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Spanned<Expr>, RefactorError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.at(&Token::Dot) {
                self.advance();
                let name = self.expect_ident()?;
                let span = expr.span.to(name.span);
                expr = Spanned::new(
                    Expr::Member { object: Box::new(expr), name },
                    span,
                );
            } else if self.at(&Token::LParen) {
                self.advance();
                let args = self.parse_args()?;
                let rparen = self.expect(&Token::RParen)?;
                let span = expr.span.to(rparen);
                expr = Spanned::new(
                    Expr::Call { callee: Box::new(expr), args },
                    span,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Spanned<Expr>>, RefactorError> {
        let mut args = Vec::new();
        if self.at(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, RefactorError> {
        let Some(tok) = self.peek() else {
            return Err(RefactorError::syntax(
                "expected an expression, found end of file",
                self.eof_span(),
            ));
        };
        let span = tok.span;
        match &tok.node {
            Token::NumberLit(value) => {
                let value = *value;
                self.advance();
                Ok(Spanned::new(Expr::NumberLit(value), span))
            }
            Token::StringLit => {
                let raw = &self.source[span.start + 1..span.end - 1];
                let value = raw.replace("\"\"", "\"");
                self.advance();
                Ok(Spanned::new(Expr::StringLit(value), span))
            }
            Token::True => {
                self.advance();
                Ok(Spanned::new(Expr::BoolLit(true), span))
            }
            Token::False => {
                self.advance();
                Ok(Spanned::new(Expr::BoolLit(false), span))
            }
            Token::Null => {
                self.advance();
                Ok(Spanned::new(Expr::Null, span))
            }
            Token::UserVar => {
                let name = self.source[span.start..span.end].to_string();
                self.advance();
                Ok(Spanned::new(Expr::UserVar(name), span))
            }
            Token::SystemVar => {
                let name = self.source[span.start..span.end].to_string();
                self.advance();
                Ok(Spanned::new(Expr::SystemVar(name), span))
            }
            Token::Create => {
                let start = span.start;
                self.advance();
                let path = self.parse_type()?;
                self.expect(&Token::LParen)?;
                let args = self.parse_args()?;
                self.expect(&Token::RParen)?;
                Ok(Spanned::new(
                    Expr::Create { path, args },
                    self.span_from(start),
                ))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident => {
                // A bare name, or the head of a qualified path.
                if matches!(self.peek2().map(|t| &t.node), Some(Token::Colon)) {
                    let path = self.parse_type()?;
                    let span = path.span;
                    Ok(Spanned::new(Expr::Path(path.node), span))
                } else {
                    let name = self.source[span.start..span.end].to_string();
                    self.advance();
                    Ok(Spanned::new(Expr::Ident(name), span))
                }
            }
            other => Err(RefactorError::syntax(
                format!("expected an expression, found {other}"),
                span,
            )),
        }
    }
}
