use crate::query::{
    ast::cursor::{CloseCursor, DeclareCursor, FetchForward},
    renderer::Render,
};

impl Render for DeclareCursor {
    fn render(&self, r: &mut super::Renderer) {
        r.sql.push_str("DECLARE ");
        r.push_identifier(&self.name);
        r.sql.push_str(" NO SCROLL CURSOR FOR ");
        self.query.render(r);
    }
}

impl Render for FetchForward {
    fn render(&self, r: &mut super::Renderer) {
        // Row counts cannot be bound in FETCH
        r.sql.push_str(&format!("FETCH FORWARD {} FROM ", self.count));
        r.push_identifier(&self.name);
    }
}

impl Render for CloseCursor {
    fn render(&self, r: &mut super::Renderer) {
        r.sql.push_str("CLOSE ");
        r.push_identifier(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{
            ast::{
                cursor::{CloseCursor, DeclareCursor, FetchForward},
                select::{FromClause, Select},
            },
            dialect::Postgres,
            ident,
            renderer::{Render, Renderer},
        },
        table_ref,
    };

    fn render(node: &dyn Render) -> String {
        let dialect = Postgres;
        let mut renderer = Renderer::new(&dialect);
        node.render(&mut renderer);
        renderer.finish().0
    }

    #[test]
    fn test_render_cursor_lifecycle() {
        let declare = DeclareCursor {
            name: "tablecopy_1".to_string(),
            query: Select {
                columns: vec![ident("id")],
                from: Some(FromClause {
                    table: table_ref!("public", "t"),
                    alias: None,
                }),
                order_by: vec![],
            },
        };

        assert_eq!(
            render(&declare),
            r#"DECLARE "tablecopy_1" NO SCROLL CURSOR FOR SELECT "id" FROM "public"."t""#
        );
        assert_eq!(
            render(&FetchForward {
                name: "tablecopy_1".to_string(),
                count: 500,
            }),
            r#"FETCH FORWARD 500 FROM "tablecopy_1""#
        );
        assert_eq!(
            render(&CloseCursor {
                name: "tablecopy_1".to_string(),
            }),
            r#"CLOSE "tablecopy_1""#
        );
    }
}
