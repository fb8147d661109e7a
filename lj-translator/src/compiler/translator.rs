use tracing::{debug, trace};

use super::js::{JsExpr, JsStmt, PropertyKey};
use super::literals;
use super::reserved;
use super::scope::{BlockKind, LoopScope, Resolution, ScopeStack};
use super::{TranslateError, TranslateOptions, UnsupportedConstruct};
use crate::ast::Node;
use crate::runtime::{GLOBAL_ALIAS, NAMESPACE_ALIAS, RuntimeHelper};

/// Single-pass tree walker from the Lua AST to JavaScript statements.
///
/// One instance owns all compile-time state for one translation unit: the
/// lexical scope stack, the innermost block wrapper, the active vararg frame
/// and the temp counter shared by every synthesized name.
pub struct Translator {
    scopes: ScopeStack,
    loop_scope: Option<LoopScope>,
    vararg: Option<VarargFrame>,
    var_counter: usize,
    /// Temps needed inside expressions, declared at the top of the current
    /// JavaScript function body.
    hoisted: Vec<String>,
}

/// Vararg parameters of the innermost function literal. `args_name` aliases
/// that function's `arguments`, which block wrappers would otherwise hide.
#[derive(Clone, Debug)]
struct VarargFrame {
    spread_index: usize,
    args_name: String,
}

/// Right-hand side of a multi-value assignment after vararg expansion.
enum AssignSource<'a> {
    Expr(&'a Node),
    VarargSlot(usize),
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            loop_scope: None,
            vararg: None,
            var_counter: 0,
            hoisted: Vec::new(),
        }
    }

    pub fn translate_program(&mut self, nodes: &[Node]) -> Result<Vec<JsStmt>, TranslateError> {
        debug!(statements = nodes.len(), "translating program");
        let saved_hoisted = std::mem::take(&mut self.hoisted);
        let result = self.translate_stmts(nodes);
        let hoisted = std::mem::replace(&mut self.hoisted, saved_hoisted);
        let mut stmts = declare_hoisted(hoisted);
        stmts.extend(result?);
        Ok(stmts)
    }

    /// Binds `_G` and `__lua`, then runs the chunk as the body of an
    /// immediately invoked function so its locals and returns stay inside it.
    pub fn translate_bootstrapped(
        &mut self,
        nodes: &[Node],
        options: &TranslateOptions,
    ) -> Result<Vec<JsStmt>, TranslateError> {
        let mut stmts = vec![
            JsStmt::Var {
                name: GLOBAL_ALIAS.to_string(),
                init: Some(JsExpr::ident(&options.global_object)),
            },
            JsStmt::Var {
                name: NAMESPACE_ALIAS.to_string(),
                init: Some(JsExpr::ident(&options.runtime_namespace)),
            },
        ];
        self.scopes.current_mut().declare(GLOBAL_ALIAS);
        let entry = self.translate_function(&[], nodes)?;
        stmts.push(JsStmt::Expr(JsExpr::call(entry, Vec::new())));
        debug!(temps = self.var_counter, "translated chunk");
        Ok(stmts)
    }

    fn translate_stmts(&mut self, nodes: &[Node]) -> Result<Vec<JsStmt>, TranslateError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.translate_stmt(node, &mut out)?;
        }
        Ok(out)
    }

    fn translate_stmt(&mut self, node: &Node, out: &mut Vec<JsStmt>) -> Result<(), TranslateError> {
        match node {
            Node::Semicolon | Node::Newline => {}
            Node::LocalDecl { name } => {
                let name = self.declare_local(name);
                out.push(JsStmt::Var {
                    name,
                    init: Some(JsExpr::Null),
                });
            }
            Node::Return { expr } => self.translate_return(expr, out)?,
            Node::Block { stmts } => {
                for stmt in stmts {
                    self.translate_stmt(stmt, out)?;
                }
            }
            Node::Assign { targets, exprs } => self.translate_assign(targets, exprs, false, out)?,
            Node::LocalAssign { targets, exprs } => {
                self.translate_assign(targets, exprs, true, out)?
            }
            Node::Repeat { cond, body } => self.translate_repeat(cond, body, out)?,
            Node::While { cond, body } => self.translate_while(cond, body, out)?,
            Node::Do { body } => self.translate_do(body, out)?,
            Node::If {
                cond,
                body,
                elifs,
                else_body,
            } => self.translate_if(cond, body, elifs, else_body, out)?,
            Node::Break => self.translate_break(out)?,
            Node::KeyValue { .. } => {
                return Err(TranslateError::UnexpectedNode {
                    kind: node.kind_name(),
                    context: "statement position",
                });
            }
            Node::VarRef { .. }
            | Node::FunctionCall { .. }
            | Node::FunctionLit { .. }
            | Node::Nil
            | Node::False
            | Node::True
            | Node::BinOp { .. }
            | Node::UnOp { .. }
            | Node::Number { .. }
            | Node::StringLit { .. }
            | Node::Table { .. }
            | Node::Index { .. }
            | Node::Ellipsis => {
                let expr = self.translate_expr(node)?;
                out.push(JsStmt::Expr(expr));
            }
        }
        Ok(())
    }

    fn translate_expr(&mut self, node: &Node) -> Result<JsExpr, TranslateError> {
        match node {
            Node::VarRef { name } => Ok(JsExpr::Ident(self.read_var(name))),
            Node::FunctionCall { callee, args } => self.translate_call(callee, args),
            Node::FunctionLit { params, body } => self.translate_function(params, body),
            Node::Nil => Ok(JsExpr::Null),
            Node::False => Ok(JsExpr::Bool(false)),
            Node::True => Ok(JsExpr::Bool(true)),
            Node::BinOp { op, lhs, rhs } => self.translate_binop(op, lhs, rhs),
            Node::UnOp { op, expr } => self.translate_unop(op, expr),
            Node::Number { literal } => Ok(JsExpr::Raw(literals::number_literal(literal))),
            Node::StringLit { literal } => Ok(JsExpr::Raw(literal.clone())),
            Node::Table { entries } => self.translate_table(entries),
            Node::Index { object, key } => {
                let object = self.translate_expr(object)?;
                let key = self.translate_expr(key)?;
                Ok(JsExpr::call(
                    runtime_helper(RuntimeHelper::Index),
                    vec![object, key],
                ))
            }
            Node::Ellipsis => {
                let frame = self
                    .vararg
                    .as_ref()
                    .ok_or(UnsupportedConstruct::VarargOutsideVarargFunction)?;
                Ok(vararg_value(&frame.args_name, frame.spread_index))
            }
            Node::LocalDecl { .. }
            | Node::Semicolon
            | Node::Newline
            | Node::Return { .. }
            | Node::Block { .. }
            | Node::Assign { .. }
            | Node::LocalAssign { .. }
            | Node::KeyValue { .. }
            | Node::Repeat { .. }
            | Node::While { .. }
            | Node::Do { .. }
            | Node::If { .. }
            | Node::Break => Err(TranslateError::UnexpectedNode {
                kind: node.kind_name(),
                context: "expression position",
            }),
        }
    }

    /// Translates a call or parameter-style list, skipping line separators.
    fn translate_args(&mut self, args: &[Node]) -> Result<Vec<JsExpr>, TranslateError> {
        args.iter()
            .filter(|arg| !arg.is_separator())
            .map(|arg| self.translate_expr(arg))
            .collect()
    }

    fn create_temp_var(&mut self) -> String {
        let temp = format!("__lvar{}", self.var_counter);
        self.var_counter += 1;
        trace!(name = %temp, "allocated temp");
        temp
    }

    fn hoisted_temp(&mut self) -> String {
        let temp = self.create_temp_var();
        self.hoisted.push(temp.clone());
        temp
    }

    // ---- scope & shadowing ----

    fn declare_local(&mut self, name: &str) -> String {
        let scope = self.scopes.current();
        if scope.has_read(name) || scope.renames_all() {
            let temp = self.create_temp_var();
            debug!(local = name, renamed = %temp, "shadowing local");
            self.scopes.current_mut().shadow(name, temp.clone());
            temp
        } else {
            self.scopes.current_mut().declare(name);
            js_name(name)
        }
    }

    fn read_var(&mut self, name: &str) -> String {
        match self.scopes.resolve_read(name) {
            Resolution::Renamed(renamed) => renamed,
            Resolution::Local | Resolution::Global => js_name(name),
        }
    }

    fn with_fresh_scope<T>(
        &mut self,
        renames_all: bool,
        emit: impl FnOnce(&mut Self) -> Result<T, TranslateError>,
    ) -> Result<T, TranslateError> {
        self.scopes.push();
        self.scopes.current_mut().set_renames_all(renames_all);
        let result = emit(self);
        self.scopes.pop();
        result
    }

    // ---- block wrappers ----

    /// Runs `emit` as the body of an immediately invoked closure with its own
    /// scope, then emits whatever is needed to forward a `return` or `break`
    /// that happened inside it.
    fn translate_block(
        &mut self,
        kind: BlockKind,
        out: &mut Vec<JsStmt>,
        emit: impl FnOnce(&mut Self) -> Result<Vec<JsStmt>, TranslateError>,
    ) -> Result<(), TranslateError> {
        let saved_loop = self.loop_scope.replace(LoopScope::new(kind));
        let saved_hoisted = std::mem::take(&mut self.hoisted);
        let result = self.with_fresh_scope(false, emit);
        let hoisted = std::mem::replace(&mut self.hoisted, saved_hoisted);
        let block_scope = std::mem::replace(&mut self.loop_scope, saved_loop);
        let mut body = declare_hoisted(hoisted);
        body.extend(result?);

        let wrapper = JsExpr::immediately_invoked(body);
        let (returned, broke) = block_scope
            .map(|scope| (scope.returned, scope.broke))
            .unwrap_or((false, false));
        if !returned && !broke {
            out.push(JsStmt::Expr(wrapper));
            return Ok(());
        }

        let result_name = self.create_temp_var();
        out.push(JsStmt::Var {
            name: result_name.clone(),
            init: Some(wrapper),
        });
        if returned {
            out.push(self.forward_return(&result_name));
        }
        if broke {
            out.push(self.forward_break(&result_name)?);
        }
        Ok(())
    }

    fn forward_return(&mut self, result_name: &str) -> JsStmt {
        let condition = JsExpr::instance_of(
            JsExpr::ident(result_name),
            runtime_helper(RuntimeHelper::ReturnValue),
        );
        let value = match self.loop_scope.as_mut() {
            Some(outer) => {
                outer.returned = true;
                JsExpr::ident(result_name)
            }
            None => JsExpr::member(JsExpr::ident(result_name), "value"),
        };
        JsStmt::If {
            condition,
            then_branch: vec![JsStmt::Return(value)],
            else_branch: Vec::new(),
        }
    }

    fn forward_break(&mut self, result_name: &str) -> Result<JsStmt, TranslateError> {
        let condition = JsExpr::binary(
            "===",
            JsExpr::ident(result_name),
            runtime_helper(RuntimeHelper::Break),
        );
        let action = match self.loop_scope.as_mut() {
            None => return Err(TranslateError::BreakOutsideLoop),
            Some(outer) if outer.kind == BlockKind::Loop => JsStmt::Break,
            Some(outer) => {
                outer.broke = true;
                JsStmt::Return(JsExpr::ident(result_name))
            }
        };
        Ok(JsStmt::If {
            condition,
            then_branch: vec![action],
            else_branch: Vec::new(),
        })
    }

    fn translate_return(&mut self, expr: &Node, out: &mut Vec<JsStmt>) -> Result<(), TranslateError> {
        let value = self.translate_expr(expr)?;
        match self.loop_scope.as_mut() {
            Some(scope) => {
                scope.returned = true;
                out.push(JsStmt::Return(JsExpr::new_instance(
                    runtime_helper(RuntimeHelper::ReturnValue),
                    vec![value],
                )));
            }
            None => out.push(JsStmt::Return(value)),
        }
        Ok(())
    }

    fn translate_break(&mut self, out: &mut Vec<JsStmt>) -> Result<(), TranslateError> {
        match self.loop_scope.as_mut() {
            None => return Err(TranslateError::BreakOutsideLoop),
            Some(scope) if scope.kind == BlockKind::Loop => out.push(JsStmt::Break),
            Some(scope) => {
                scope.broke = true;
                out.push(JsStmt::Return(runtime_helper(RuntimeHelper::Break)));
            }
        }
        Ok(())
    }

    // ---- control flow ----

    fn translate_while(
        &mut self,
        cond: &Node,
        body: &[Node],
        out: &mut Vec<JsStmt>,
    ) -> Result<(), TranslateError> {
        self.translate_block(BlockKind::Loop, out, |this| {
            let condition = truthy(this.translate_expr(cond)?);
            let body = this.translate_stmts(body)?;
            Ok(vec![JsStmt::While { condition, body }])
        })
    }

    fn translate_repeat(
        &mut self,
        cond: &Node,
        body: &[Node],
        out: &mut Vec<JsStmt>,
    ) -> Result<(), TranslateError> {
        self.translate_block(BlockKind::Loop, out, |this| {
            let body = this.translate_stmts(body)?;
            let condition = JsExpr::call(
                runtime_helper(RuntimeHelper::IsFalse),
                vec![this.translate_expr(cond)?],
            );
            Ok(vec![JsStmt::DoWhile { body, condition }])
        })
    }

    fn translate_do(&mut self, body: &[Node], out: &mut Vec<JsStmt>) -> Result<(), TranslateError> {
        self.translate_block(BlockKind::Plain, out, |this| this.translate_stmts(body))
    }

    /// Every branch shares the wrapper's function scope in JavaScript, so
    /// branch locals always get fresh names; otherwise a hoisted `var` from one
    /// branch would hide a global read in a sibling branch or condition.
    fn translate_if(
        &mut self,
        cond: &Node,
        body: &[Node],
        elifs: &[(Node, Vec<Node>)],
        else_body: &[Node],
        out: &mut Vec<JsStmt>,
    ) -> Result<(), TranslateError> {
        self.translate_block(BlockKind::Plain, out, |this| {
            let mut clauses = Vec::with_capacity(elifs.len() + 1);
            let condition = truthy(this.translate_expr(cond)?);
            let branch = this.with_fresh_scope(true, |this| this.translate_stmts(body))?;
            clauses.push((condition, branch));
            for (elif_cond, elif_body) in elifs {
                let condition = truthy(this.translate_expr(elif_cond)?);
                let branch = this.with_fresh_scope(true, |this| this.translate_stmts(elif_body))?;
                clauses.push((condition, branch));
            }
            let mut else_branch = if else_body.is_empty() {
                Vec::new()
            } else {
                this.with_fresh_scope(true, |this| this.translate_stmts(else_body))?
            };
            while let Some((condition, then_branch)) = clauses.pop() {
                else_branch = vec![JsStmt::If {
                    condition,
                    then_branch,
                    else_branch,
                }];
            }
            Ok(else_branch)
        })
    }

    // ---- assignment ----

    fn translate_assign(
        &mut self,
        targets: &[Node],
        exprs: &[Node],
        local: bool,
        out: &mut Vec<JsStmt>,
    ) -> Result<(), TranslateError> {
        let targets = targets
            .iter()
            .filter(|target| !target.is_separator())
            .map(|target| if local { as_local_decl(target) } else { Ok(target.clone()) })
            .collect::<Result<Vec<_>, _>>()?;
        let exprs = exprs
            .iter()
            .filter(|expr| !expr.is_separator())
            .collect::<Vec<_>>();
        let sources = self.expand_varargs(targets.len(), &exprs);

        if targets.len() == 1 && sources.len() == 1 {
            let value = self.translate_source(&sources[0])?;
            return self.assign_target(&targets[0], value, out);
        }

        let matched = targets.len().min(sources.len());
        let mut temps = Vec::with_capacity(matched);
        for source in &sources[..matched] {
            let value = self.translate_source(source)?;
            let temp = self.create_temp_var();
            out.push(JsStmt::Var {
                name: temp.clone(),
                init: Some(value),
            });
            temps.push(temp);
        }
        for source in &sources[matched..] {
            let value = self.translate_source(source)?;
            out.push(JsStmt::Expr(value));
        }
        for (target, temp) in targets.iter().zip(temps) {
            self.assign_target(target, JsExpr::Ident(temp), out)?;
        }
        for target in &targets[matched..] {
            self.assign_target(target, JsExpr::Null, out)?;
        }
        Ok(())
    }

    /// Spreads the last `...` over the targets the other expressions leave
    /// uncovered. Without an active vararg frame the marker stays in place and
    /// fails when translated.
    fn expand_varargs<'a>(&self, target_count: usize, exprs: &[&'a Node]) -> Vec<AssignSource<'a>> {
        let position = exprs.iter().rposition(|expr| matches!(expr, Node::Ellipsis));
        let (Some(frame), Some(position)) = (self.vararg.as_ref(), position) else {
            return exprs.iter().copied().map(AssignSource::Expr).collect();
        };
        let covered = exprs.len() - 1;
        if target_count <= covered + 1 {
            return exprs.iter().copied().map(AssignSource::Expr).collect();
        }
        let count = target_count - covered;
        let mut sources = Vec::with_capacity(target_count);
        sources.extend(exprs[..position].iter().copied().map(AssignSource::Expr));
        sources.extend((0..count).map(|offset| AssignSource::VarargSlot(frame.spread_index + offset)));
        sources.extend(exprs[position + 1..].iter().copied().map(AssignSource::Expr));
        sources
    }

    fn translate_source(&mut self, source: &AssignSource<'_>) -> Result<JsExpr, TranslateError> {
        match source {
            AssignSource::Expr(node) => self.translate_expr(node),
            AssignSource::VarargSlot(index) => {
                let frame = self
                    .vararg
                    .as_ref()
                    .ok_or(UnsupportedConstruct::VarargOutsideVarargFunction)?;
                Ok(vararg_value(&frame.args_name, *index))
            }
        }
    }

    fn assign_target(
        &mut self,
        target: &Node,
        value: JsExpr,
        out: &mut Vec<JsStmt>,
    ) -> Result<(), TranslateError> {
        match target {
            Node::LocalDecl { name } => {
                let name = self.declare_local(name);
                out.push(JsStmt::Var {
                    name,
                    init: Some(value),
                });
            }
            Node::VarRef { name } => {
                let name = self.read_var(name);
                out.push(JsStmt::Assign {
                    target: JsExpr::Ident(name),
                    value,
                });
            }
            Node::Index { object, key } => {
                let object = self.translate_expr(object)?;
                let key = self.translate_expr(key)?;
                out.push(JsStmt::Assign {
                    target: JsExpr::index(object, key),
                    value,
                });
            }
            other => {
                return Err(TranslateError::UnexpectedNode {
                    kind: other.kind_name(),
                    context: "assignment target",
                });
            }
        }
        Ok(())
    }

    // ---- functions ----

    fn translate_function(&mut self, params: &[Node], body: &[Node]) -> Result<JsExpr, TranslateError> {
        let params = params
            .iter()
            .filter(|param| !param.is_separator())
            .collect::<Vec<_>>();
        let mut names = Vec::with_capacity(params.len());
        let mut has_vararg = false;
        for (position, param) in params.iter().enumerate() {
            match param {
                Node::VarRef { name } | Node::LocalDecl { name } => names.push(name.as_str()),
                Node::Ellipsis if position + 1 == params.len() => has_vararg = true,
                other => {
                    return Err(TranslateError::UnexpectedNode {
                        kind: other.kind_name(),
                        context: "parameter list",
                    });
                }
            }
        }

        let saved_loop = self.loop_scope.take();
        let saved_vararg = self.vararg.take();
        let saved_hoisted = std::mem::take(&mut self.hoisted);
        let result = self.with_fresh_scope(false, |this| {
            let params = names
                .iter()
                .map(|name| this.declare_local(name))
                .collect::<Vec<_>>();
            let mut prologue = Vec::new();
            if has_vararg {
                let args_name = this.create_temp_var();
                prologue.push(JsStmt::Var {
                    name: args_name.clone(),
                    init: Some(JsExpr::ident("arguments")),
                });
                this.vararg = Some(VarargFrame {
                    spread_index: params.len(),
                    args_name,
                });
            }
            let mut stmts = this.translate_stmts(body)?;
            let ends_with_return = body
                .iter()
                .rev()
                .find(|stmt| !stmt.is_separator())
                .is_some_and(|stmt| matches!(stmt, Node::Return { .. }));
            if !ends_with_return {
                stmts.push(JsStmt::Return(JsExpr::Null));
            }
            Ok((params, prologue, stmts))
        });
        let hoisted = std::mem::replace(&mut self.hoisted, saved_hoisted);
        self.vararg = saved_vararg;
        self.loop_scope = saved_loop;

        let (params, prologue, stmts) = result?;
        let mut body = prologue;
        body.extend(declare_hoisted(hoisted));
        body.extend(stmts);
        Ok(JsExpr::Function { params, body })
    }

    fn translate_call(&mut self, callee: &Node, args: &[Node]) -> Result<JsExpr, TranslateError> {
        let callee = self.translate_expr(callee)?;
        let Some(position) = args.iter().rposition(|arg| matches!(arg, Node::Ellipsis)) else {
            let args = self.translate_args(args)?;
            return Ok(JsExpr::call(callee, args));
        };
        let frame = self
            .vararg
            .clone()
            .ok_or(UnsupportedConstruct::VarargSpreadOutsideVarargFunction)?;
        let before = self.translate_args(&args[..position])?;
        let after = self.translate_args(&args[position + 1..])?;
        let spread = JsExpr::call(
            runtime_helper(RuntimeHelper::Spread),
            vec![
                JsExpr::ident(frame.args_name),
                JsExpr::Raw(frame.spread_index.to_string()),
                JsExpr::Array(before),
                JsExpr::Array(after),
            ],
        );
        Ok(JsExpr::call(
            JsExpr::member(callee, "apply"),
            vec![JsExpr::Null, spread],
        ))
    }

    // ---- leaves ----

    fn translate_binop(&mut self, op: &str, lhs: &Node, rhs: &Node) -> Result<JsExpr, TranslateError> {
        let left = self.translate_expr(lhs)?;
        let right = self.translate_expr(rhs)?;
        let expr = match op {
            "and" | "or" => {
                let temp = self.hoisted_temp();
                let test = truthy(JsExpr::assign(JsExpr::ident(&temp), left));
                if op == "and" {
                    JsExpr::conditional(test, right, JsExpr::ident(temp))
                } else {
                    JsExpr::conditional(test, JsExpr::ident(temp), right)
                }
            }
            ".." => JsExpr::call(runtime_helper(RuntimeHelper::Concat), vec![left, right]),
            "//" => JsExpr::call(
                runtime_helper(RuntimeHelper::IntegerDivide),
                vec![left, right],
            ),
            // nil and an absent value compare equal, like Lua's single nil
            "===" | "!==" if matches!(lhs, Node::Nil) || matches!(rhs, Node::Nil) => {
                JsExpr::binary(&op[..2], left, right)
            }
            "===" => JsExpr::call(runtime_helper(RuntimeHelper::Equal), vec![left, right]),
            "!==" => JsExpr::unary(
                "!",
                JsExpr::call(runtime_helper(RuntimeHelper::Equal), vec![left, right]),
            ),
            _ => JsExpr::binary(op, left, right),
        };
        Ok(expr)
    }

    fn translate_unop(&mut self, op: &str, expr: &Node) -> Result<JsExpr, TranslateError> {
        let operand = self.translate_expr(expr)?;
        Ok(match op {
            "not" => JsExpr::call(runtime_helper(RuntimeHelper::IsFalse), vec![operand]),
            "#" => JsExpr::call(runtime_helper(RuntimeHelper::Len), vec![operand]),
            _ => JsExpr::unary(op, operand),
        })
    }

    /// Positional entries get keys 1, 2, ... in order of appearance; keyed
    /// entries do not advance the counter. A trailing `...` fills the keys
    /// after the last positional entry at runtime.
    fn translate_table(&mut self, entries: &[Node]) -> Result<JsExpr, TranslateError> {
        let entries = entries
            .iter()
            .filter(|entry| !entry.is_separator())
            .collect::<Vec<_>>();
        let (entries, trailing_vararg) = match entries.split_last() {
            Some((last, rest)) if matches!(last, Node::Ellipsis) => (rest, true),
            _ => (entries.as_slice(), false),
        };
        let mut properties = Vec::with_capacity(entries.len());
        let mut next_index = 1usize;
        for entry in entries.iter().copied() {
            match entry {
                Node::KeyValue { key, value } => {
                    let key = match key.as_ref() {
                        Node::StringLit { literal } => PropertyKey::Literal(literal.clone()),
                        Node::Number { literal } => {
                            PropertyKey::Literal(literals::number_literal(literal))
                        }
                        other => PropertyKey::Computed(self.translate_expr(other)?),
                    };
                    let value = self.translate_expr(value)?;
                    properties.push((key, value));
                }
                positional => {
                    let value = self.translate_expr(positional)?;
                    properties.push((PropertyKey::Literal(next_index.to_string()), value));
                    next_index += 1;
                }
            }
        }
        let table = JsExpr::Object(properties);
        if !trailing_vararg {
            return Ok(table);
        }
        let frame = self
            .vararg
            .as_ref()
            .ok_or(UnsupportedConstruct::VarargOutsideVarargFunction)?;
        Ok(JsExpr::call(
            runtime_helper(RuntimeHelper::Pack),
            vec![
                table,
                JsExpr::Raw(next_index.to_string()),
                JsExpr::ident(&frame.args_name),
                JsExpr::Raw(frame.spread_index.to_string()),
            ],
        ))
    }
}

fn runtime_helper(helper: RuntimeHelper) -> JsExpr {
    JsExpr::member(JsExpr::ident(NAMESPACE_ALIAS), helper.js_name())
}

/// JavaScript spelling of a user identifier that kept its own name.
fn js_name(name: &str) -> String {
    reserved::alias_for(name).unwrap_or_else(|| name.to_string())
}

fn truthy(expr: JsExpr) -> JsExpr {
    JsExpr::call(runtime_helper(RuntimeHelper::IsTrue), vec![expr])
}

fn vararg_value(args_name: &str, index: usize) -> JsExpr {
    JsExpr::call(
        runtime_helper(RuntimeHelper::Arg),
        vec![JsExpr::ident(args_name), JsExpr::Raw(index.to_string())],
    )
}

fn declare_hoisted(names: Vec<String>) -> Vec<JsStmt> {
    names
        .into_iter()
        .map(|name| JsStmt::Var { name, init: None })
        .collect()
}

fn as_local_decl(target: &Node) -> Result<Node, TranslateError> {
    match target {
        Node::VarRef { name } | Node::LocalDecl { name } => Ok(Node::local(name.clone())),
        other => Err(TranslateError::UnexpectedNode {
            kind: other.kind_name(),
            context: "local declaration",
        }),
    }
}
