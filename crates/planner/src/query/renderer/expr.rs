use crate::query::{ast::expr::Expr, renderer::Render};

impl Render for Expr {
    fn render(&self, r: &mut super::Renderer) {
        match self {
            Expr::Identifier(ident) => {
                if let Some(qualifier) = &ident.qualifier {
                    r.push_identifier(qualifier);
                    r.sql.push('.');
                }
                r.push_identifier(&ident.name);
            }
            Expr::Value(value) => r.add_param(value.clone()),
            Expr::Placeholder => r.add_placeholder(),
        }
    }
}
