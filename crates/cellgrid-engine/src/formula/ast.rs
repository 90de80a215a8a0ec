//! The formula AST and its canonical (normalized) pretty-printer.

use crate::position::Position;
use crate::value::format_number;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A parsed formula expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    Num(f64),
    Ref(Position),
    Unary(UnaryOp, Box<Ast>),
    Binary(BinaryOp, Box<Ast>, Box<Ast>),
}

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(node: &Ast) -> u8 {
    match node {
        Ast::Num(_) | Ast::Ref(_) => PREC_ATOM,
        Ast::Unary(..) => PREC_UNARY,
        Ast::Binary(op, ..) => match op {
            BinaryOp::Add | BinaryOp::Sub => PREC_ADD,
            BinaryOp::Mul | BinaryOp::Div => PREC_MUL,
        },
    }
}

/// A redundant leading `+` never changes meaning, so the canonical form drops
/// it entirely rather than print it.
fn strip_unary_plus(node: &Ast) -> &Ast {
    match node {
        Ast::Unary(UnaryOp::Plus, inner) => strip_unary_plus(inner),
        other => other,
    }
}

/// Render `ast` as the canonical, whitespace-free expression string used for
/// `Cell::get_text`. Parentheses are kept only where dropping them would
/// change the result.
pub fn print_ast(ast: &Ast) -> String {
    print_child(ast, 0)
}

fn print_child(node: &Ast, min_prec: u8) -> String {
    let node = strip_unary_plus(node);
    let prec = precedence(node);
    let body = match node {
        Ast::Num(n) => format_number(*n),
        Ast::Ref(p) => p.format(),
        Ast::Unary(UnaryOp::Minus, child) => format!("-{}", print_child(child, PREC_UNARY + 1)),
        Ast::Unary(UnaryOp::Plus, _) => unreachable!("stripped by strip_unary_plus"),
        Ast::Binary(op, left, right) => {
            let sym = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
            };
            // Left operand never needs parens beyond its own precedence: the
            // parser is left-associative, so same-precedence chains print
            // correctly without them.
            let left_str = print_child(left, prec);
            // A commutative op (+, *) tolerates a same-precedence right
            // operand without parens; a non-commutative one (-, /) needs the
            // right operand to bind strictly tighter.
            let right_min = match op {
                BinaryOp::Add | BinaryOp::Mul => prec,
                BinaryOp::Sub | BinaryOp::Div => prec + 1,
            };
            let right_str = print_child(right, right_min);
            format!("{left_str}{sym}{right_str}")
        }
    };
    if prec < min_prec {
        format!("({body})")
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parser::parse;

    fn roundtrip(src: &str) -> String {
        print_ast(&parse(src).unwrap())
    }

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(roundtrip("1+ 2"), "1+2");
        assert_eq!(roundtrip(" 2 *( 3 + 4 ) "), "2*(3+4)");
    }

    #[test]
    fn drops_redundant_parens() {
        assert_eq!(roundtrip("(1+2)+3"), "1+2+3");
        assert_eq!(roundtrip("1+(2+3)"), "1+2+3");
        assert_eq!(roundtrip("(1*2)*3"), "1*2*3");
    }

    #[test]
    fn keeps_parens_that_change_meaning() {
        assert_eq!(roundtrip("1-(2-3)"), "1-(2-3)");
        assert_eq!(roundtrip("1/(2/3)"), "1/(2/3)");
        assert_eq!(roundtrip("(1+2)*3"), "(1+2)*3");
        assert_eq!(roundtrip("-(1+2)"), "-(1+2)");
    }

    #[test]
    fn drops_parens_that_dont_change_meaning() {
        assert_eq!(roundtrip("1-(2*3)"), "1-2*3");
        assert_eq!(roundtrip("1-(2+3)*4"), "1-(2+3)*4");
    }

    #[test]
    fn drops_leading_unary_plus() {
        assert_eq!(roundtrip("+5"), "5");
    }

    #[test]
    fn uppercases_cell_refs() {
        assert_eq!(roundtrip("b3+a1"), "B3+A1");
    }

    #[test]
    fn is_idempotent() {
        let once = roundtrip("=2*(3+4)".trim_start_matches('='));
        let twice = print_ast(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }
}
