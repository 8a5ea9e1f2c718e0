//! `--dump-tree` output: node kinds, indented by nesting depth.

use std::fmt::Write;

use wyx_parser::{
    ElseClause, ForInitializer, FunctionBody, Member, MemberKind, PropertyBody, Stmt, StmtKind,
    SyntaxTree, UsingResource,
};

pub fn dump_tree(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    let root = tree.root();
    let _ = writeln!(out, "CompilationUnit");
    for member in root.members {
        dump_member(&mut out, member, 1);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn dump_member(out: &mut String, member: &Member<'_>, depth: usize) {
    indent(out, depth);
    let _ = writeln!(out, "{:?}", member.kind());
    match member.kind {
        MemberKind::Namespace { members, .. } | MemberKind::TypeDecl { members, .. } => {
            for child in members {
                dump_member(out, child, depth + 1);
            }
        }
        MemberKind::GlobalStatement { statement } => dump_stmt(out, statement, depth + 1),
        MemberKind::Method { body, .. } | MemberKind::Constructor { body, .. } => {
            dump_body(out, &body, depth + 1);
        }
        MemberKind::Property { body, .. } | MemberKind::Indexer { body, .. } => {
            if let PropertyBody::Accessors(list) = body {
                for accessor in list.accessors {
                    indent(out, depth + 1);
                    let _ = writeln!(out, "{:?}", accessor.kind);
                    dump_body(out, &accessor.body, depth + 2);
                }
            }
        }
        _ => {}
    }
}

fn dump_body(out: &mut String, body: &FunctionBody<'_>, depth: usize) {
    match body {
        FunctionBody::Block(block) => dump_stmt(out, block, depth),
        FunctionBody::Arrow { clause, .. } => {
            indent(out, depth);
            let _ = writeln!(out, "{:?}", clause.expr.kind());
        }
        FunctionBody::None { .. } => {}
    }
}

fn dump_stmt(out: &mut String, stmt: &Stmt<'_>, depth: usize) {
    indent(out, depth);
    let _ = writeln!(out, "{:?}", stmt.kind());
    let child_depth = depth + 1;
    match stmt.kind {
        StmtKind::Block { statements, .. } => {
            for child in statements {
                dump_stmt(out, child, child_depth);
            }
        }
        StmtKind::Expression { expr, .. } => {
            indent(out, child_depth);
            let _ = writeln!(out, "{:?}", expr.kind());
        }
        StmtKind::If { condition, statement, else_clause, .. } => {
            indent(out, child_depth);
            let _ = writeln!(out, "{:?}", condition.kind());
            dump_stmt(out, statement, child_depth);
            if let Some(ElseClause { statement, .. }) = else_clause {
                dump_stmt(out, statement, child_depth);
            }
        }
        StmtKind::While { body, .. }
        | StmtKind::Do { body, .. }
        | StmtKind::ForEach { body, .. } => dump_stmt(out, body, child_depth),
        StmtKind::Using { resource, body, .. } => {
            if let UsingResource::Expression(expr) = resource {
                indent(out, child_depth);
                let _ = writeln!(out, "{:?}", expr.kind());
            }
            dump_stmt(out, body, child_depth);
        }
        StmtKind::For { initializer, body, .. } => {
            if let Some(ForInitializer::Declaration(_)) = initializer {
                indent(out, child_depth);
                let _ = writeln!(out, "VariableDeclaration");
            }
            dump_stmt(out, body, child_depth);
        }
        StmtKind::Switch { sections, .. } => {
            for section in sections {
                indent(out, child_depth);
                let _ = writeln!(out, "SwitchSection");
                for child in section.statements {
                    dump_stmt(out, child, child_depth + 1);
                }
            }
        }
        StmtKind::Try { block, catches, finally, .. } => {
            dump_stmt(out, block, child_depth);
            for catch in catches {
                indent(out, child_depth);
                let _ = writeln!(out, "CatchClause");
                dump_stmt(out, catch.block, child_depth + 1);
            }
            if let Some(finally) = finally {
                dump_stmt(out, finally.block, child_depth);
            }
        }
        StmtKind::Labeled { statement, .. } => dump_stmt(out, statement, child_depth),
        StmtKind::LocalFunction { body, .. } => dump_body(out, &body, child_depth),
        StmtKind::Return { expr: Some(expr), .. } | StmtKind::Throw { expr: Some(expr), .. } => {
            indent(out, child_depth);
            let _ = writeln!(out, "{:?}", expr.kind());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_nests_by_depth() {
        let tree = SyntaxTree::parse(
            "class C { int Run() { if (x) { return 1; } return 0; } }",
        );
        let dump = dump_tree(&tree);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "CompilationUnit");
        assert_eq!(lines[1], "  ClassDeclaration");
        assert_eq!(lines[2], "    MethodDeclaration");
        assert!(dump.contains("IfStatement"));
        assert!(dump.contains("ReturnStatement"));
    }
}
