//! Renderer from the Alloy AST to concrete Alloy 6 syntax.
//!
//! The renderer is a serialization boundary: it performs no semantic
//! validation and assumes the model was assembled through the checked
//! builder helpers.

use crate::ast::{AlloyExpr, Assertion, Model, Pred, Sig};
use std::fmt::Write;

/// Number of clauses above which a conjunction is rendered as an indented
/// block instead of an inline parenthesized form.
const INLINE_AND_LIMIT: usize = 3;

/// Render a complete model to Alloy source text.
pub fn render_model(model: &Model) -> String {
    let mut r = Renderer::new();
    r.model(model);
    r.out
}

/// Render a single expression. Mostly useful in tests and debug output.
pub fn render_expr(expr: &AlloyExpr) -> String {
    let mut r = Renderer::new();
    r.expr(expr);
    r.out
}

struct Renderer {
    out: String,
    indent: usize,
}

impl Renderer {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn write(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Line break followed by the current indentation.
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn model(&mut self, model: &Model) {
        let mut first = true;
        for sig in model.sigs.values() {
            if !first {
                self.write("\n\n");
            }
            first = false;
            self.sig(sig);
        }
        for pred in model.preds.values() {
            if !first {
                self.write("\n\n");
            }
            first = false;
            self.pred(pred);
        }
        for assertion in model.asserts.values() {
            if !first {
                self.write("\n\n");
            }
            first = false;
            self.assertion(assertion);
        }
        self.out.push('\n');
    }

    fn sig(&mut self, sig: &Sig) {
        match sig {
            Sig::Object(s) => {
                if s.one {
                    self.write("one ");
                }
                self.write("sig ");
                self.write(&s.name);
                self.write(" {");
                self.indent += 1;
                for (i, field) in s.fields.values().enumerate() {
                    if i > 0 {
                        self.write(",");
                    }
                    self.newline();
                    if field.var {
                        self.write("var ");
                    }
                    self.write(&field.name);
                    self.write(": ");
                    self.write(&field.ty);
                }
                self.indent -= 1;
                self.newline();
                self.write("}");
            }
            Sig::Enum(s) => {
                self.write("enum ");
                self.write(&s.name);
                self.write(" { ");
                self.write(&s.variants.join(", "));
                self.write(" }");
            }
        }
    }

    fn pred(&mut self, pred: &Pred) {
        self.write("pred ");
        self.write(&pred.name);
        if !pred.params.is_empty() {
            self.write("[");
            for (i, (name, ty)) in pred.params.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(name);
                self.write(": ");
                self.write(ty);
            }
            self.write("]");
        }
        self.write(" {");
        self.indent += 1;
        for clause in &pred.clauses {
            self.newline();
            self.expr(clause);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn assertion(&mut self, assertion: &Assertion) {
        self.write("assert ");
        self.write(&assertion.name);
        self.write(" {");
        self.indent += 1;
        self.newline();
        self.expr(&assertion.body);
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn expr(&mut self, expr: &AlloyExpr) {
        match expr {
            AlloyExpr::Ident(id) => self.write(id),
            AlloyExpr::Int(n) => {
                let _ = write!(self.out, "{}", n);
            }
            AlloyExpr::Access { base, field } => {
                self.expr(base);
                self.write(".");
                self.write(field);
            }
            AlloyExpr::Call { pred, args } => {
                self.write(pred);
                if !args.is_empty() {
                    self.write("[");
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.expr(arg);
                    }
                    self.write("]");
                }
            }
            AlloyExpr::And(clauses) => {
                if clauses.len() > INLINE_AND_LIMIT {
                    self.write("{");
                    self.indent += 1;
                    for clause in clauses {
                        self.newline();
                        self.expr(clause);
                    }
                    self.indent -= 1;
                    self.newline();
                    self.write("}");
                } else {
                    self.connective("and", clauses);
                }
            }
            AlloyExpr::Or(clauses) => self.connective("or", clauses),
            AlloyExpr::Prime(inner) => {
                self.expr(inner);
                self.write("'");
            }
            AlloyExpr::Binary { op, lhs, rhs } => {
                self.expr(lhs);
                self.write(" ");
                self.write(op.symbol());
                self.write(" ");
                self.expr(rhs);
            }
            AlloyExpr::Quant {
                kind,
                var,
                set,
                body,
            } => {
                self.write(kind.keyword());
                self.write(" ");
                self.write(var);
                self.write(": ");
                self.write(set);
                self.write(" | ");
                self.expr(body);
            }
            AlloyExpr::Temporal { kind, body } => {
                self.write(kind.keyword());
                self.write(" ");
                self.expr(body);
            }
        }
    }

    fn connective(&mut self, word: &str, clauses: &[AlloyExpr]) {
        self.write("(");
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                self.write(" ");
                self.write(word);
                self.write(" ");
            }
            self.expr(clause);
        }
        self.write(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{EnumSig, Field, ObjectSig};
    use crate::builder::{
        access, always, and, call, call0, eq, eventually, ident, implies, int, or, prime, quant,
        update,
    };
    use crate::ast::QuantKind;

    #[test]
    fn renders_enum_inline() {
        let sig = Sig::Enum(EnumSig {
            name: "IncrPC".to_string(),
            variants: vec!["P0".to_string(), "P1".to_string(), "end".to_string()],
        });
        let mut r = Renderer::new();
        r.sig(&sig);
        assert_eq!(r.out, "enum IncrPC { P0, P1, end }");
    }

    #[test]
    fn renders_object_sig_with_var_fields() {
        let mut sig = ObjectSig::new("IncrOp");
        sig.add_field(Field {
            name: "x".to_string(),
            ty: "Int".to_string(),
            var: true,
        });
        sig.add_field(Field {
            name: "pc".to_string(),
            ty: "IncrPC".to_string(),
            var: true,
        });
        let mut r = Renderer::new();
        r.sig(&Sig::Object(sig));
        assert_eq!(r.out, "sig IncrOp {\n  var x: Int,\n  var pc: IncrPC\n}");
    }

    #[test]
    fn singleton_sig_gets_one_prefix() {
        let mut sig = ObjectSig::new("Globals");
        sig.one = true;
        let mut r = Renderer::new();
        r.sig(&Sig::Object(sig));
        assert!(r.out.starts_with("one sig Globals {"));
    }

    #[test]
    fn renders_pred_with_params_and_clauses() {
        let pred = Pred {
            name: "incr_init".to_string(),
            params: vec![("st".to_string(), "IncrOp".to_string())],
            clauses: vec![
                eq(access(ident("st"), "x"), int(0)),
                eq(access(ident("st"), "pc"), ident("P0")),
            ],
        };
        let mut r = Renderer::new();
        r.pred(&pred);
        assert_eq!(
            r.out,
            "pred incr_init[st: IncrOp] {\n  st.x = 0\n  st.pc = P0\n}"
        );
    }

    #[test]
    fn short_conjunction_is_inline() {
        let expr = and(vec![ident("a"), ident("b")]).unwrap();
        assert_eq!(render_expr(&expr), "(a and b)");
    }

    #[test]
    fn long_conjunction_becomes_block() {
        let expr = and(vec![ident("a"), ident("b"), ident("c"), ident("d")]).unwrap();
        assert_eq!(render_expr(&expr), "{\n  a\n  b\n  c\n  d\n}");
    }

    #[test]
    fn disjunction_stays_inline() {
        let expr = or(vec![ident("a"), ident("b"), ident("c"), ident("d")]).unwrap();
        assert_eq!(render_expr(&expr), "(a or b or c or d)");
    }

    #[test]
    fn renders_update_macro() {
        let expr = update(ident("x"), ident("st"), int(3));
        assert_eq!(render_expr(&expr), "x' = x ++ st -> 3");
    }

    #[test]
    fn renders_quantifier_and_temporal() {
        let expr = quant(
            QuantKind::All,
            "x",
            "IncrOp",
            call("incr_init", vec![ident("x")]),
        );
        assert_eq!(render_expr(&expr), "all x: IncrOp | incr_init[x]");

        assert_eq!(render_expr(&always(call0("step"))), "always step");
        assert_eq!(
            render_expr(&eventually(call0("allEnd"))),
            "eventually allEnd"
        );

        let one = quant(QuantKind::One, "g", "Globals", ident("true"));
        assert_eq!(render_expr(&one), "one g: Globals | true");
    }

    #[test]
    fn renders_set_membership() {
        use crate::ast::AlloyBinOp;
        use crate::builder::binop;
        let expr = binop(AlloyBinOp::In, ident("x"), ident("IncrOp"));
        assert_eq!(render_expr(&expr), "x in IncrOp");
    }

    #[test]
    fn renders_theorem_shape() {
        let body = implies(
            and(vec![call0("init"), always(call0("step"))]).unwrap(),
            always(call0("satisfyAssertions")),
        );
        assert_eq!(
            render_expr(&body),
            "(init and always step) => always satisfyAssertions"
        );
    }

    #[test]
    fn primes_render_postfix() {
        assert_eq!(render_expr(&eq(prime(ident("pc")), ident("pc"))), "pc' = pc");
    }
}
