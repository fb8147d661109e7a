/// Lua syntax tree produced by the parser and consumed by the translator.
///
/// Operator nodes carry the operator text the translator should emit. The
/// parser maps Lua operators to their JavaScript spelling where one exists
/// (`==` becomes `===`, `~=` becomes `!==`, `^` becomes `**`) and keeps the
/// Lua spelling for operators that need runtime support (`and`, `or`, `not`,
/// `..`, `#`, `//`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Node {
    LocalDecl {
        name: String,
    },
    VarRef {
        name: String,
    },
    Semicolon,
    Newline,
    FunctionCall {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    FunctionLit {
        params: Vec<Node>,
        body: Vec<Node>,
    },
    Return {
        expr: Box<Node>,
    },
    Block {
        stmts: Vec<Node>,
    },
    Assign {
        targets: Vec<Node>,
        exprs: Vec<Node>,
    },
    LocalAssign {
        targets: Vec<Node>,
        exprs: Vec<Node>,
    },
    Nil,
    False,
    True,
    BinOp {
        op: String,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    UnOp {
        op: String,
        expr: Box<Node>,
    },
    Number {
        literal: String,
    },
    StringLit {
        literal: String,
    },
    Table {
        entries: Vec<Node>,
    },
    KeyValue {
        key: Box<Node>,
        value: Box<Node>,
    },
    Index {
        object: Box<Node>,
        key: Box<Node>,
    },
    Ellipsis,
    Repeat {
        cond: Box<Node>,
        body: Vec<Node>,
    },
    While {
        cond: Box<Node>,
        body: Vec<Node>,
    },
    Do {
        body: Vec<Node>,
    },
    If {
        cond: Box<Node>,
        body: Vec<Node>,
        elifs: Vec<(Node, Vec<Node>)>,
        else_body: Vec<Node>,
    },
    Break,
}

impl Node {
    pub fn local(name: impl Into<String>) -> Self {
        Node::LocalDecl { name: name.into() }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Node::VarRef { name: name.into() }
    }

    pub fn number(literal: impl Into<String>) -> Self {
        Node::Number {
            literal: literal.into(),
        }
    }

    pub fn string(literal: impl Into<String>) -> Self {
        Node::StringLit {
            literal: literal.into(),
        }
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Self {
        Node::FunctionCall {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn function(params: Vec<Node>, body: Vec<Node>) -> Self {
        Node::FunctionLit { params, body }
    }

    pub fn ret(expr: Node) -> Self {
        Node::Return {
            expr: Box::new(expr),
        }
    }

    pub fn assign(targets: Vec<Node>, exprs: Vec<Node>) -> Self {
        Node::Assign { targets, exprs }
    }

    pub fn local_assign(targets: Vec<Node>, exprs: Vec<Node>) -> Self {
        Node::LocalAssign { targets, exprs }
    }

    pub fn binop(op: impl Into<String>, lhs: Node, rhs: Node) -> Self {
        Node::BinOp {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unop(op: impl Into<String>, expr: Node) -> Self {
        Node::UnOp {
            op: op.into(),
            expr: Box::new(expr),
        }
    }

    pub fn index(object: Node, key: Node) -> Self {
        Node::Index {
            object: Box::new(object),
            key: Box::new(key),
        }
    }

    pub fn key_value(key: Node, value: Node) -> Self {
        Node::KeyValue {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn while_loop(cond: Node, body: Vec<Node>) -> Self {
        Node::While {
            cond: Box::new(cond),
            body,
        }
    }

    pub fn repeat(cond: Node, body: Vec<Node>) -> Self {
        Node::Repeat {
            cond: Box::new(cond),
            body,
        }
    }

    /// Tag used in error messages and debug logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::LocalDecl { .. } => "LocalDecl",
            Node::VarRef { .. } => "VarRef",
            Node::Semicolon => "Semicolon",
            Node::Newline => "Newline",
            Node::FunctionCall { .. } => "FunctionCall",
            Node::FunctionLit { .. } => "FunctionLit",
            Node::Return { .. } => "Return",
            Node::Block { .. } => "Block",
            Node::Assign { .. } => "Assign",
            Node::LocalAssign { .. } => "LocalAssign",
            Node::Nil => "Nil",
            Node::False => "False",
            Node::True => "True",
            Node::BinOp { .. } => "BinOp",
            Node::UnOp { .. } => "UnOp",
            Node::Number { .. } => "Number",
            Node::StringLit { .. } => "StringLit",
            Node::Table { .. } => "Table",
            Node::KeyValue { .. } => "KeyValue",
            Node::Index { .. } => "Index",
            Node::Ellipsis => "Ellipsis",
            Node::Repeat { .. } => "Repeat",
            Node::While { .. } => "While",
            Node::Do { .. } => "Do",
            Node::If { .. } => "If",
            Node::Break => "Break",
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Node::Semicolon | Node::Newline)
    }
}
